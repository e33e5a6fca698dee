//! ForestWise system prompt and message list assembly.

use crate::models::{ChatRequest, ContentPart, ImageUrl, MessageContent, OutboundMessage, Turn};

const PERSONA: &str = "You are ForestWise AI, an expert forestry and ecological restoration assistant. You provide accurate, scientifically-grounded information about trees, planting, soil health, and ecosystem restoration.";

const GUIDELINES: &str = "CRITICAL GUIDELINES:
- Focus on tree species in the tree species database species.json
- Be extremely accurate and fact-based
- If you're unsure about something, say so rather than guessing
- Focus on practical, actionable advice
- Reference scientific consensus when possible
- For tree identification from images, be cautious and suggest verification
- When discussing medicinal uses, include appropriate warnings
- Always consider local context and conditions
- Prioritize native species and sustainable practices";

const SPECIALTIES: &str = "Specialize in:
- Tree species identification and characteristics
- Planting guides and seasonal advice
- Soil health assessment and improvement
- Pest and disease management
- Ecological restoration techniques
- Agroforestry practices
- Climate-appropriate species selection";

/// Builds the system prompt, adding a `Current Context:` line only for non-empty context.
pub fn compose_system_prompt(context: Option<&str>) -> String {
  let mut sections = vec![PERSONA.to_string(), GUIDELINES.to_string()];
  if let Some(context) = context.filter(|c| !c.is_empty()) {
    sections.push(format!("Current Context: {context}"));
  }
  sections.push(SPECIALTIES.to_string());
  sections.join("\n\n")
}

/// `[system] ++ history ++ [current user turn]`. History entries go out untouched.
pub fn build_messages(req: &ChatRequest) -> Vec<OutboundMessage> {
  let mut messages = Vec::with_capacity(req.conversation_history.len() + 2);
  messages.push(Turn::system(compose_system_prompt(req.context.as_deref())).into());
  messages.extend(req.conversation_history.iter().cloned().map(OutboundMessage::Raw));

  let content = match req.image_data.as_deref().filter(|url| !url.is_empty()) {
    Some(url) => MessageContent::Parts(vec![
      ContentPart::Text {
        text: req.message.clone(),
      },
      ContentPart::ImageUrl {
        image_url: ImageUrl {
          url: url.to_string(),
        },
      },
    ]),
    None => MessageContent::Text(req.message.clone()),
  };
  messages.push(Turn::user(content).into());

  messages
}
