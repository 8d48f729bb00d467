//! Quiz assembly: the per-request orchestration of fetch, synthesis, caching
//! and integrity checks.
//!
//! The chain is strictly sequential (one questions-fetch, then one
//! answers-fetch per question) and absorbs failures as close to their source
//! as possible: a failed upstream call becomes an empty batch, a failed
//! synthesis becomes a skipped question. Zero items is a valid quiz.

use tracing::{debug, error, info, instrument};

use crate::domain::{QuizItem, QuizKind, UpstreamQuestion};
use crate::stackexchange::StackExchange;
use crate::state::AppState;
use crate::synth::{synthesize, SynthOutcome};

/// Assembled response set for one (tag, limit) request.
#[derive(Clone, Debug)]
pub struct QuizSet {
  pub tag: String,
  pub items: Vec<QuizItem>,
  pub served_from_cache: bool,
}

fn item_key(tag: &str, question_id: u64) -> String {
  // Tag is part of the key: the same question id can surface under several
  // tags and the cached item must not leak across them.
  format!("{}:{}", tag, question_id)
}

/// Final integrity re-check before an item enters the response set. Returns
/// the sanitized item, or None when it must be discarded.
fn sanitize_item(item: QuizItem) -> Option<QuizItem> {
  let question = item.question.trim().to_string();
  if question.is_empty() {
    return None;
  }

  let options: Vec<String> = item
    .options
    .iter()
    .map(|o| o.trim().to_string())
    .filter(|o| !o.is_empty())
    .collect();
  if options.is_empty() {
    return None;
  }
  // Q&A fallback (single option) is allowed; the full MCQ form is not
  // negotiable about its shape.
  if item.kind == QuizKind::Mcq && options.len() != 4 {
    return None;
  }
  if item.correct_index >= options.len() {
    return None;
  }

  Some(QuizItem {
    id: item.id,
    question,
    options,
    correct_index: item.correct_index,
    kind: item.kind,
  })
}

/// Produce the quiz item for one upstream question: item-cache lookup first,
/// then answers-fetch + synthesis on a miss. Returns None for skips.
async fn build_item(
  state: &AppState,
  upstream: &StackExchange,
  tag: &str,
  question: &UpstreamQuestion,
) -> Option<QuizItem> {
  let key = question.question_id.map(|id| item_key(tag, id));
  if let Some(key) = &key {
    if let Some(item) = state.item_cache.get(key).await {
      debug!(target: "quiz", %key, "Per-question cache hit");
      return Some(item);
    }
  }

  let question_id = question.question_id?;
  let answers = match upstream.fetch_answers(question_id).await {
    Ok(a) => a,
    Err(e) => {
      error!(target: "quiz", question_id, error = %e, "Answers fetch failed; skipping question");
      Vec::new()
    }
  };

  let item = match synthesize(question, &answers) {
    SynthOutcome::Mcq(item) => item,
    SynthOutcome::Degraded(item) => {
      debug!(target: "quiz", id = item.id, "Serving Q&A fallback form");
      item
    }
    SynthOutcome::Skipped(reason) => {
      debug!(target: "quiz", question_id, ?reason, "Question skipped");
      return None;
    }
  };

  if let Some(key) = &key {
    state.item_cache.set(key, item.clone()).await;
  }
  Some(item)
}

/// Assemble up to `limit` quiz items for `tag`.
///
/// Aggregate-cache hits bypass all per-question work. On a miss we overfetch
/// upstream questions (synthesis can fail per question), accumulate accepted
/// items in upstream order, and short-circuit once `limit` is reached.
#[instrument(level = "info", skip(state), fields(%tag, limit))]
pub async fn assemble_quiz(state: &AppState, tag: &str, limit: usize) -> QuizSet {
  if let Some(items) = state.set_cache.get(tag).await {
    info!(target: "quiz", %tag, count = items.len(), "Aggregate cache hit");
    return QuizSet {
      tag: tag.to_string(),
      items,
      served_from_cache: true,
    };
  }

  let mut items: Vec<QuizItem> = Vec::with_capacity(limit);

  if let Some(upstream) = &state.upstream {
    let pagesize = limit * state.config.overfetch_multiplier;
    let questions = match upstream.fetch_questions(tag, pagesize).await {
      Ok(q) => q,
      Err(e) => {
        error!(target: "quiz", %tag, error = %e, "Questions fetch failed; serving empty quiz");
        Vec::new()
      }
    };

    for question in &questions {
      if items.len() == limit {
        break;
      }
      let Some(item) = build_item(state, upstream, tag, question).await else {
        continue;
      };
      match sanitize_item(item) {
        Some(item) => items.push(item),
        None => {
          debug!(target: "quiz", question_id = ?question.question_id, "Item failed integrity check; discarded");
        }
      }
    }
  } else {
    error!(target: "quiz", %tag, "No upstream client; serving empty quiz");
  }

  if !items.is_empty() {
    state.set_cache.set(tag, items.clone()).await;
  }

  info!(target: "quiz", %tag, count = items.len(), "Quiz assembled");
  QuizSet {
    tag: tag.to_string(),
    items,
    served_from_cache: false,
  }
}
