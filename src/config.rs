use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH_ENV: &str = "FORESTWISE_CONFIG";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RelayConfig {
  pub model: String,
  pub max_tokens: u32,
  pub temperature: f64,
  pub api_base: String,
  /// Name of the environment variable holding the upstream API key.
  pub api_key_env: String,
  pub bind_addr: String,
  pub endpoint_path: String,
  /// Request bodies above this size are rejected before reaching the relay.
  pub max_body_bytes: usize,
}

impl Default for RelayConfig {
  fn default() -> Self {
    Self {
      model: "gpt-4o-mini".to_string(),
      max_tokens: 1000,
      temperature: 0.2,
      api_base: "https://api.openai.com/v1".to_string(),
      api_key_env: "OPENAI_API_KEY".to_string(),
      bind_addr: "0.0.0.0:8888".to_string(),
      endpoint_path: "/.netlify/functions/forestwise-ai".to_string(),
      max_body_bytes: 6 * 1024 * 1024,
    }
  }
}

impl RelayConfig {
  /// Rejects values the router would otherwise panic on at start-up.
  pub fn validate(&self) -> anyhow::Result<()> {
    anyhow::ensure!(
      self.endpoint_path.starts_with('/'),
      "endpoint_path must start with '/', got {:?}",
      self.endpoint_path
    );
    anyhow::ensure!(
      self.endpoint_path != "/health",
      "endpoint_path must not shadow /health"
    );
    Ok(())
  }
}

pub fn load_or_init(path: &Path) -> anyhow::Result<RelayConfig> {
  if path.exists() {
    let data = std::fs::read_to_string(path)?;
    let config: RelayConfig = serde_json::from_str(&data)?;
    config
      .validate()
      .with_context(|| format!("invalid config in {}", path.display()))?;
    Ok(config)
  } else {
    let config = RelayConfig::default();
    save_config(path, &config)?;
    Ok(config)
  }
}

pub fn save_config(path: &Path, config: &RelayConfig) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(config)?;
  std::fs::write(path, json)?;
  Ok(())
}

/// Reads the config file named by `FORESTWISE_CONFIG`, or falls back to defaults.
pub fn from_env() -> anyhow::Result<RelayConfig> {
  match std::env::var(CONFIG_PATH_ENV) {
    Ok(path) if !path.trim().is_empty() => load_or_init(Path::new(path.trim())),
    _ => Ok(RelayConfig::default()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scratch_path(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("forestwise-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir.join(name)
  }

  #[test]
  fn defaults_match_relay_constants() {
    let config = RelayConfig::default();
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.max_tokens, 1000);
    assert!((config.temperature - 0.2).abs() < f64::EPSILON);
    assert_eq!(config.api_key_env, "OPENAI_API_KEY");
  }

  #[test]
  fn load_or_init_writes_defaults_when_missing() {
    let path = scratch_path("config.json");
    let config = load_or_init(&path).expect("init should succeed");
    assert_eq!(config, RelayConfig::default());
    assert!(path.exists());

    let reloaded = load_or_init(&path).expect("reload should succeed");
    assert_eq!(reloaded, config);
  }

  #[test]
  fn partial_file_keeps_remaining_defaults() {
    let path = scratch_path("partial.json");
    std::fs::write(&path, r#"{ "model": "gpt-4o", "max_tokens": 250 }"#).expect("write config");

    let config = load_or_init(&path).expect("partial config should load");
    assert_eq!(config.model, "gpt-4o");
    assert_eq!(config.max_tokens, 250);
    assert_eq!(config.endpoint_path, RelayConfig::default().endpoint_path);
  }

  #[test]
  fn endpoint_path_without_leading_slash_is_an_error() {
    let path = scratch_path("relative.json");
    std::fs::write(&path, r#"{ "endpoint_path": "api/chat" }"#).expect("write config");

    let err = load_or_init(&path).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("invalid config"), "{message}");
    assert!(message.contains("endpoint_path must start with '/'"), "{message}");
  }

  #[test]
  fn default_config_is_valid() {
    assert!(RelayConfig::default().validate().is_ok());
  }

  #[test]
  fn malformed_file_is_an_error() {
    let path = scratch_path("broken.json");
    std::fs::write(&path, "{ model").expect("write config");
    assert!(load_or_init(&path).is_err());
  }
}
