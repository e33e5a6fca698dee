use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;

use crate::config::RelayConfig;
use crate::provider::{ChatCompletionProvider, Completion, CompletionRequest, ProviderError};

/// OpenAI-compatible chat-completion client.
///
/// The API key is looked up in the environment on every call rather than at
/// construction, so a missing key fails the request instead of start-up.
#[derive(Debug)]
pub struct OpenAiProvider {
  api_base: String,
  api_key_env: String,
  client: reqwest::Client,
}

impl OpenAiProvider {
  pub fn new(config: &RelayConfig) -> Self {
    Self {
      api_base: config.api_base.trim_end_matches('/').to_string(),
      api_key_env: config.api_key_env.clone(),
      client: reqwest::Client::new(),
    }
  }

  fn api_key(&self) -> Result<String, ProviderError> {
    match std::env::var(&self.api_key_env) {
      Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
      _ => Err(ProviderError::MissingCredential(self.api_key_env.clone())),
    }
  }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
  #[serde(default)]
  choices: Vec<Choice>,
  #[serde(default)]
  usage: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
  content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
  error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
  message: String,
}

#[async_trait]
impl ChatCompletionProvider for OpenAiProvider {
  async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
    let key = self.api_key()?;

    let mut headers = HeaderMap::new();
    headers.insert(
      AUTHORIZATION,
      HeaderValue::from_str(&format!("Bearer {}", key))
        .map_err(|err| ProviderError::Request(err.to_string()))?,
    );

    let resp = self
      .client
      .post(format!("{}/chat/completions", self.api_base))
      .headers(headers)
      .json(&request)
      .send()
      .await
      .map_err(|err| ProviderError::Request(err.to_string()))?;

    let status = resp.status();
    tracing::debug!(status = %status, model = %request.model, "chat completion returned");

    if !status.is_success() {
      let text = resp
        .text()
        .await
        .unwrap_or_else(|_| "Chat completion request failed.".to_string());
      let message = serde_json::from_str::<ApiErrorResponse>(&text)
        .map(|body| body.error.message)
        .unwrap_or(text);
      return Err(ProviderError::Api {
        status: status.as_u16(),
        message,
      });
    }

    let body = resp
      .json::<ChatCompletionResponse>()
      .await
      .map_err(|err| ProviderError::InvalidResponse(err.to_string()))?;

    let choice = body
      .choices
      .into_iter()
      .next()
      .ok_or_else(|| ProviderError::InvalidResponse("no choices returned".to_string()))?;

    Ok(Completion {
      content: choice.message.content.unwrap_or_default(),
      usage: body.usage,
    })
  }

  fn provider_name(&self) -> &'static str {
    "openai"
  }
}
