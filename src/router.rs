use std::net::TcpListener;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{MatchedPath, State};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::routing::{any, get};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::relay::ChatRelay;

pub struct RouterState {
  pub started_at: Instant,
  pub relay: ChatRelay,
}

pub fn build_router(state: RouterState, endpoint_path: &str) -> Router {
  Router::new()
    .route("/health", get(health))
    .route(endpoint_path, any(chat))
    .layer(
      TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
          let path = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str)
            .unwrap_or(request.uri().path());
          tracing::info_span!(
            "http_request",
            method = %request.method(),
            path = %path,
            request_id = %uuid::Uuid::new_v4(),
          )
        })
        .on_request(|_request: &Request<_>, _span: &Span| {})
        .on_response(|response: &Response, latency: std::time::Duration, _span: &Span| {
          tracing::info!(
            status = response.status().as_u16(),
            latency_ms = latency.as_millis() as u64,
            "request completed"
          );
        }),
    )
    .with_state(Arc::new(state))
}

pub async fn run_router(listener: TcpListener, app: Router) -> anyhow::Result<()> {
  listener.set_nonblocking(true)?;
  let listener = tokio::net::TcpListener::from_std(listener)?;
  axum::serve(listener, app).await?;
  Ok(())
}

async fn health(State(state): State<Arc<RouterState>>) -> Json<serde_json::Value> {
  let uptime = state.started_at.elapsed().as_millis();
  Json(serde_json::json!({
    "status": "ok",
    "version": env!("CARGO_PKG_VERSION"),
    "uptime_ms": uptime
  }))
}

async fn chat(State(state): State<Arc<RouterState>>, method: Method, body: Body) -> Response {
  state.relay.handle(&method, body).await
}
