//! HTTP endpoint handlers. These are thin wrappers that forward to assembly.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::{Query, State},
  response::{IntoResponse, Response},
  Json,
};
use tracing::{error, info, instrument};

use crate::assembly::assemble_quiz;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_root() -> impl IntoResponse {
  Json(RootOut { message: "QuizFlow backend is running" })
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state), fields(tag = ?q.tag, limit = ?q.limit))]
pub async fn http_get_quiz(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuizQuery>,
) -> Response {
  let tag = q
    .tag
    .filter(|t| !t.trim().is_empty())
    .unwrap_or_else(|| state.config.default_tag.clone());
  let limit = q
    .limit
    .unwrap_or(state.config.default_limit)
    .clamp(state.config.min_limit, state.config.max_limit);

  // Run assembly in its own task so an unexpected panic surfaces as a
  // structured error payload instead of a transport-level failure.
  let task_state = state.clone();
  let task_tag = tag.clone();
  let joined =
    tokio::spawn(async move { assemble_quiz(&task_state, &task_tag, limit).await }).await;

  match joined {
    Ok(set) => {
      info!(target: "quiz", %tag, limit, count = set.items.len(), cached = set.served_from_cache, "HTTP quiz served");
      Json(to_out(set)).into_response()
    }
    Err(e) => {
      error!(target: "quizflow_backend", %tag, error = %e, "Quiz assembly faulted");
      Json(ErrorOut::internal("quiz assembly failed")).into_response()
    }
  }
}
