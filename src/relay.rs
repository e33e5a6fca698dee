use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::header::{
  ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::models::{ChatRequest, ChatResponse, ErrorBody};
use crate::prompt::build_messages;
use crate::provider::{ChatCompletionProvider, CompletionRequest};

/// The chat relay endpoint: method gate, prompt assembly, one upstream call.
#[derive(Debug, Clone)]
pub struct ChatRelay {
  config: RelayConfig,
  provider: Arc<dyn ChatCompletionProvider>,
}

impl ChatRelay {
  pub fn new(config: RelayConfig, provider: Arc<dyn ChatCompletionProvider>) -> Self {
    Self { config, provider }
  }

  /// The body is only read for POST, so preflight and rejected methods never
  /// touch the size cap.
  pub async fn handle(&self, method: &Method, body: Body) -> Response {
    if method == Method::OPTIONS {
      return preflight_response();
    }

    if method != Method::POST {
      let body = ErrorBody {
        error: "Method not allowed".to_string(),
        details: None,
      };
      return (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response();
    }

    match self.relay(body).await {
      Ok(res) => (StatusCode::OK, [(ACCESS_CONTROL_ALLOW_ORIGIN, "*")], Json(res)).into_response(),
      Err(err) => {
        tracing::error!(kind = err.kind(), error = %err, "chat relay failed");
        err.into_response()
      }
    }
  }

  async fn read_body(&self, body: Body) -> Result<Bytes, RelayError> {
    let limit = self.config.max_body_bytes;
    match Limited::new(body, limit).collect().await {
      Ok(collected) => Ok(collected.to_bytes()),
      Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
        Err(RelayError::PayloadTooLarge(limit))
      }
      Err(err) => Err(RelayError::BodyRead(err.to_string())),
    }
  }

  async fn relay(&self, body: Body) -> Result<ChatResponse, RelayError> {
    let body = self.read_body(body).await?;
    let req: ChatRequest = serde_json::from_slice(&body)?;
    let messages = build_messages(&req);

    tracing::info!(
      messages = messages.len(),
      provider = self.provider.provider_name(),
      "sending chat completion request"
    );

    let completion = self
      .provider
      .complete(CompletionRequest {
        model: self.config.model.clone(),
        messages,
        max_tokens: self.config.max_tokens,
        temperature: self.config.temperature,
      })
      .await?;

    Ok(ChatResponse {
      response: completion.content,
      usage: completion.usage,
    })
  }
}

fn preflight_response() -> Response {
  (
    StatusCode::OK,
    [
      (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
      (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
      (ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
    ],
  )
    .into_response()
}
