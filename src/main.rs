mod config;
mod error;
mod logger;
mod models;
mod openai;
mod prompt;
mod provider;
mod relay;
mod router;

use std::{sync::Arc, time::Instant};

use anyhow::Context;

use openai::OpenAiProvider;
use relay::ChatRelay;
use router::{build_router, run_router, RouterState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  logger::init();

  let config = config::from_env().context("failed to load relay config")?;

  let listener = std::net::TcpListener::bind(&config.bind_addr)
    .with_context(|| format!("failed to bind {}", config.bind_addr))?;
  let addr = listener.local_addr()?;

  let provider = Arc::new(OpenAiProvider::new(&config));
  let endpoint_path = config.endpoint_path.clone();

  let state = RouterState {
    started_at: Instant::now(),
    relay: ChatRelay::new(config, provider),
  };
  let app = build_router(state, &endpoint_path);

  tracing::info!(%addr, endpoint = %endpoint_path, "ForestWise relay listening");

  run_router(listener, app).await
}
