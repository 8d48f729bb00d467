//! QuizFlow · Programming Quiz Backend
//!
//! - Axum HTTP API serving synthesized multiple-choice quizzes
//! - StackExchange as the upstream Q&A source
//! - In-memory TTL caching of synthesis results
//!
//! Important env variables:
//!   PORT          : u16 (default 3000)
//!   QUIZ_CONFIG_PATH      : path to TOML config (upstream + cache tuning)
//!   STACKEXCHANGE_API_KEY : optional upstream API key (raises quota)
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

mod telemetry;
mod domain;
mod config;
mod text;
mod distractors;
mod synth;
mod cache;
mod stackexchange;
mod state;
mod assembly;
mod protocol;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::config::load_config_from_env;
use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (caches, upstream client) from config.
  let config = load_config_from_env();
  let state = Arc::new(AppState::new(config));

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "quizflow_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
