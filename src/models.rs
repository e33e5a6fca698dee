use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  System,
  User,
  Assistant,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ImageUrl {
  pub url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
  Text { text: String },
  ImageUrl { image_url: ImageUrl },
}

/// Either plain text or a list of typed parts (text + image).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
  Text(String),
  Parts(Vec<ContentPart>),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Turn {
  pub role: Role,
  pub content: MessageContent,
}

impl Turn {
  pub fn system(content: impl Into<String>) -> Self {
    Self {
      role: Role::System,
      content: MessageContent::Text(content.into()),
    }
  }

  pub fn user(content: MessageContent) -> Self {
    Self {
      role: Role::User,
      content,
    }
  }
}

/// A message as sent upstream. Turns the relay writes itself are typed;
/// caller history is forwarded exactly as received.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum OutboundMessage {
  Typed(Turn),
  Raw(serde_json::Value),
}

impl From<Turn> for OutboundMessage {
  fn from(turn: Turn) -> Self {
    OutboundMessage::Typed(turn)
  }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
  pub message: String,
  #[serde(default)]
  pub conversation_history: Vec<serde_json::Value>,
  #[serde(default)]
  pub image_data: Option<String>,
  #[serde(default)]
  pub context: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatResponse {
  pub response: String,
  pub usage: serde_json::Value,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorBody {
  pub error: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<String>,
}
