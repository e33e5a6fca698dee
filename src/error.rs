use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::models::ErrorBody;
use crate::provider::ProviderError;

pub const FAILED_RESPONSE: &str = "Failed to get AI response";

/// Failures on the POST path. Bad input and upstream trouble are kept apart
/// here and in the logs, but callers see the same 500 body for both. Only an
/// oversized body gets its own status.
#[derive(Debug, Error)]
pub enum RelayError {
  #[error("request body exceeds {0} bytes")]
  PayloadTooLarge(usize),

  #[error("failed to read request body: {0}")]
  BodyRead(String),

  #[error("{0}")]
  InvalidBody(#[from] serde_json::Error),

  #[error("{0}")]
  Upstream(#[from] ProviderError),
}

impl RelayError {
  pub fn kind(&self) -> &'static str {
    match self {
      RelayError::PayloadTooLarge(_) => "payload_too_large",
      RelayError::BodyRead(_) | RelayError::InvalidBody(_) => "invalid_body",
      RelayError::Upstream(_) => "upstream",
    }
  }
}

impl IntoResponse for RelayError {
  fn into_response(self) -> Response {
    let (status, error) = match &self {
      RelayError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large"),
      _ => (StatusCode::INTERNAL_SERVER_ERROR, FAILED_RESPONSE),
    };
    let body = ErrorBody {
      error: error.to_string(),
      details: Some(self.to_string()),
    };
    (
      status,
      [(ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
      Json(body),
    )
      .into_response()
  }
}
