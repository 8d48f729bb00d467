//! Domain models: upstream records as StackExchange returns them, and the
//! synthesized quiz item we serve.

use serde::{Deserialize, Serialize};

/// One question record from the upstream "list questions by tag" call.
/// Fields are optional on purpose: the synthesizer rejects records that lack
/// a usable id or title instead of failing deserialization of the whole batch.
#[derive(Clone, Debug, Deserialize)]
pub struct UpstreamQuestion {
  #[serde(default)] pub question_id: Option<u64>,
  #[serde(default)] pub title: Option<String>,
}

/// One answer record for a question. Upstream returns these sorted by votes
/// (descending), which the fallback-selection logic relies on.
#[derive(Clone, Debug, Deserialize)]
pub struct UpstreamAnswer {
  #[serde(default)] pub body: Option<String>,
  #[serde(default)] pub is_accepted: bool,
}

/// Which form a quiz item took after synthesis.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuizKind {
  /// 4 options, exactly one correct.
  Mcq,
  /// Degraded single-answer form used when distractor synthesis or
  /// validation fails.
  Qa,
}

/// The synthesized quiz entity. Built once per (tag, question id), cached,
/// and never mutated afterwards (shuffling happens before construction).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizItem {
  pub id: u64,
  pub question: String,
  pub options: Vec<String>,
  pub correct_index: usize,
  #[serde(rename = "type")]
  pub kind: QuizKind,
}
