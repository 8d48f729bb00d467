//! Minimal StackExchange API client for our two read-only calls.
//!
//! We only hit "questions by tag" and "answers for a question". Calls are
//! instrumented and log counts and latencies, never response bodies.
//!
//! StackExchange quirk: the API can wrap an error INSIDE a 200-status JSON
//! body that simply lacks the `items` field. Both fetchers treat that as
//! "zero results" rather than a parse failure.

use std::time::Duration;

use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::config::UpstreamConfig;
use crate::domain::{UpstreamAnswer, UpstreamQuestion};

/// Filter that makes the questions endpoint include what we need and nothing
/// more. Opaque token minted in the StackExchange filter editor.
const QUESTIONS_FILTER: &str = "!9_bDDxJY5";

#[derive(Clone)]
pub struct StackExchange {
  client: reqwest::Client,
  base_url: String,
  site: String,
  api_key: Option<String>,
}

/// Envelope both endpoints share. `items` defaults to empty so an error body
/// without the field deserializes cleanly into zero results.
#[derive(Deserialize)]
struct Envelope<T> {
  #[serde(default = "Vec::new")]
  items: Vec<T>,
  #[serde(default)]
  error_message: Option<String>,
}

impl StackExchange {
  /// Build the client from config. Timeout applies per call.
  pub fn new(cfg: &UpstreamConfig) -> Result<Self, String> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(cfg.timeout_secs))
      .build()
      .map_err(|e| e.to_string())?;

    Ok(Self {
      client,
      base_url: cfg.base_url.clone(),
      site: cfg.site.clone(),
      api_key: cfg.api_key.clone(),
    })
  }

  /// List answered questions for a tag, sorted by votes descending.
  /// `pagesize` already includes any overfetch the caller wants.
  #[instrument(level = "info", skip(self), fields(%tag, pagesize))]
  pub async fn fetch_questions(
    &self,
    tag: &str,
    pagesize: usize,
  ) -> Result<Vec<UpstreamQuestion>, String> {
    let url = format!("{}/questions", self.base_url);
    let pagesize = pagesize.to_string();
    let mut params: Vec<(&str, &str)> = vec![
      ("site", &self.site),
      ("tagged", tag),
      ("is_answered", "true"),
      ("sort", "votes"),
      ("order", "desc"),
      ("pagesize", &pagesize),
      ("filter", QUESTIONS_FILTER),
    ];
    if let Some(key) = &self.api_key {
      params.push(("key", key));
    }

    let start = std::time::Instant::now();
    let res = self
      .client
      .get(&url)
      .header(USER_AGENT, "quizflow-backend/0.1")
      .query(&params)
      .send()
      .await
      .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      return Err(format!("StackExchange HTTP {}", res.status()));
    }

    let body: Envelope<UpstreamQuestion> = res.json().await.map_err(|e| e.to_string())?;
    if let Some(msg) = &body.error_message {
      warn!(target: "quizflow_backend", %tag, error = %msg, "StackExchange returned an in-body error; treating as zero results");
    }
    info!(target: "quizflow_backend", %tag, count = body.items.len(), elapsed = ?start.elapsed(), "Fetched questions");
    Ok(body.items)
  }

  /// List answers for a question, bodies included, sorted by votes descending.
  #[instrument(level = "info", skip(self), fields(%question_id))]
  pub async fn fetch_answers(&self, question_id: u64) -> Result<Vec<UpstreamAnswer>, String> {
    let url = format!("{}/questions/{}/answers", self.base_url, question_id);
    let mut params: Vec<(&str, &str)> = vec![
      ("order", "desc"),
      ("sort", "votes"),
      ("site", &self.site),
      ("filter", "withbody"),
    ];
    if let Some(key) = &self.api_key {
      params.push(("key", key));
    }

    let start = std::time::Instant::now();
    let res = self
      .client
      .get(&url)
      .header(USER_AGENT, "quizflow-backend/0.1")
      .query(&params)
      .send()
      .await
      .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      return Err(format!("StackExchange HTTP {}", res.status()));
    }

    let body: Envelope<UpstreamAnswer> = res.json().await.map_err(|e| e.to_string())?;
    if let Some(msg) = &body.error_message {
      warn!(target: "quizflow_backend", %question_id, error = %msg, "StackExchange returned an in-body error; treating as zero results");
    }
    info!(target: "quizflow_backend", %question_id, count = body.items.len(), elapsed = ?start.elapsed(), "Fetched answers");
    Ok(body.items)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn envelope_without_items_field_is_zero_results() {
    let body = r#"{"error_id":502,"error_message":"too many requests","error_name":"throttle_violation"}"#;
    let env: Envelope<UpstreamQuestion> = serde_json::from_str(body).unwrap();
    assert!(env.items.is_empty());
    assert_eq!(env.error_message.as_deref(), Some("too many requests"));
  }

  #[test]
  fn envelope_parses_question_items() {
    let body = r#"{"items":[{"question_id":7,"title":"How?"},{"title":"no id"}],"has_more":false}"#;
    let env: Envelope<UpstreamQuestion> = serde_json::from_str(body).unwrap();
    assert_eq!(env.items.len(), 2);
    assert_eq!(env.items[0].question_id, Some(7));
    assert_eq!(env.items[1].question_id, None);
  }

  #[test]
  fn envelope_parses_answer_items() {
    let body = r#"{"items":[{"body":"<p>x</p>","is_accepted":true},{"body":"y"}]}"#;
    let env: Envelope<UpstreamAnswer> = serde_json::from_str(body).unwrap();
    assert!(env.items[0].is_accepted);
    assert!(!env.items[1].is_accepted);
  }
}
