//! Chat-completion provider abstraction.
//!
//! The relay only ever needs one upstream operation: submit a message list and
//! get back either a completion or a failure. Production uses
//! [`crate::openai::OpenAiProvider`]; tests swap in a stub.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::OutboundMessage;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
  #[error("{0} environment variable is missing or empty")]
  MissingCredential(String),

  #[error("API request failed: {0}")]
  Request(String),

  #[error("{status} {message}")]
  Api { status: u16, message: String },

  #[error("Invalid API response: {0}")]
  InvalidResponse(String),
}

/// Body sent to the chat-completion endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletionRequest {
  pub model: String,
  pub messages: Vec<OutboundMessage>,
  pub max_tokens: u32,
  pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
  pub content: String,
  /// Token accounting as reported upstream; relayed without interpretation.
  pub usage: serde_json::Value,
}

#[async_trait]
pub trait ChatCompletionProvider: Send + Sync + fmt::Debug {
  async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError>;

  fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub use stub::StaticProvider;
