//! Loading service configuration (upstream endpoint + cache tuning) from TOML.
//!
//! See `QuizConfig` for the expected schema. Everything has a default, so the
//! service runs with no config file at all.

use serde::Deserialize;
use tracing::{error, info};

/// Top-level configuration. Loaded from `QUIZ_CONFIG_PATH` if set; any field
/// can be omitted in the TOML and falls back to its default.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
  pub upstream: UpstreamConfig,
  /// Seconds a cached synthesis result (per-question or aggregate) stays live.
  pub cache_ttl_secs: u64,
  /// Tag used when the request doesn't name one.
  pub default_tag: String,
  /// Item count used when the request doesn't name one.
  pub default_limit: usize,
  /// Requested item count is clamped into this range.
  pub min_limit: usize,
  pub max_limit: usize,
  /// How many upstream questions to request per accepted item, to compensate
  /// for per-question synthesis failures.
  pub overfetch_multiplier: usize,
}

/// Where and how to reach the StackExchange API.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
  pub base_url: String,
  pub site: String,
  /// Optional API key; also settable via STACKEXCHANGE_API_KEY.
  pub api_key: Option<String>,
  pub timeout_secs: u64,
}

impl Default for QuizConfig {
  fn default() -> Self {
    Self {
      upstream: UpstreamConfig::default(),
      cache_ttl_secs: 60 * 60,
      default_tag: "flutter".into(),
      default_limit: 5,
      min_limit: 3,
      max_limit: 15,
      overfetch_multiplier: 3,
    }
  }
}

impl Default for UpstreamConfig {
  fn default() -> Self {
    Self {
      base_url: "https://api.stackexchange.com/2.3".into(),
      site: "stackoverflow".into(),
      api_key: None,
      timeout_secs: 10,
    }
  }
}

/// Load `QuizConfig` from QUIZ_CONFIG_PATH, falling back to defaults on any
/// IO/parse error. STACKEXCHANGE_API_KEY overrides the file's key either way.
pub fn load_config_from_env() -> QuizConfig {
  let mut cfg = match std::env::var("QUIZ_CONFIG_PATH") {
    Ok(path) => match std::fs::read_to_string(&path) {
      Ok(s) => match toml::from_str::<QuizConfig>(&s) {
        Ok(cfg) => {
          info!(target: "quizflow_backend", %path, "Loaded config (TOML)");
          cfg
        }
        Err(e) => {
          error!(target: "quizflow_backend", %path, error = %e, "Failed to parse TOML config; using defaults");
          QuizConfig::default()
        }
      },
      Err(e) => {
        error!(target: "quizflow_backend", %path, error = %e, "Failed to read TOML config file; using defaults");
        QuizConfig::default()
      }
    },
    Err(_) => QuizConfig::default(),
  };

  if let Ok(key) = std::env::var("STACKEXCHANGE_API_KEY") {
    if !key.is_empty() {
      cfg.upstream.api_key = Some(key);
    }
  }
  cfg
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_sane() {
    let cfg = QuizConfig::default();
    assert_eq!(cfg.cache_ttl_secs, 3600);
    assert_eq!(cfg.default_tag, "flutter");
    assert!(cfg.min_limit <= cfg.max_limit);
    assert_eq!(cfg.upstream.timeout_secs, 10);
  }

  #[test]
  fn partial_toml_fills_in_defaults() {
    let cfg: QuizConfig = toml::from_str(
      r#"
        default_tag = "android"
        [upstream]
        site = "askubuntu"
      "#,
    )
    .unwrap();
    assert_eq!(cfg.default_tag, "android");
    assert_eq!(cfg.upstream.site, "askubuntu");
    assert_eq!(cfg.cache_ttl_secs, 3600);
    assert_eq!(cfg.upstream.base_url, "https://api.stackexchange.com/2.3");
  }
}
