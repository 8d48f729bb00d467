//! Application state: config, the upstream client, and the two caches.
//!
//! This module owns:
//!   - the per-question item cache (key = "{tag}:{question_id}")
//!   - the per-tag aggregate cache (key = tag)
//!   - the optional StackExchange client
//!
//! Both caches share the same TTL but are separate instances, so their key
//! spaces cannot collide. State is built once at startup and handed to the
//! router; assembly receives the caches through it rather than touching any
//! module-level storage.

use std::time::Duration;

use tracing::{error, info, instrument};

use crate::cache::TtlCache;
use crate::config::QuizConfig;
use crate::domain::QuizItem;
use crate::stackexchange::StackExchange;

pub struct AppState {
    pub config: QuizConfig,
    /// None when the HTTP client could not be built; every fetch then
    /// degrades to zero results and the service serves empty quizzes.
    pub upstream: Option<StackExchange>,
    pub item_cache: TtlCache<QuizItem>,
    pub set_cache: TtlCache<Vec<QuizItem>>,
}

impl AppState {
    /// Build state from config: caches sized by TTL, upstream client ready.
    #[instrument(level = "info", skip_all)]
    pub fn new(config: QuizConfig) -> Self {
        let upstream = match StackExchange::new(&config.upstream) {
            Ok(client) => {
                info!(
                    target: "quizflow_backend",
                    base_url = %config.upstream.base_url,
                    site = %config.upstream.site,
                    has_api_key = config.upstream.api_key.is_some(),
                    "StackExchange client ready"
                );
                Some(client)
            }
            Err(e) => {
                error!(target: "quizflow_backend", error = %e, "Failed to build StackExchange client; serving empty quizzes");
                None
            }
        };

        let ttl = Duration::from_secs(config.cache_ttl_secs);
        info!(target: "quiz", ttl_secs = config.cache_ttl_secs, "Result caches initialized");

        Self {
            upstream,
            item_cache: TtlCache::new(ttl),
            set_cache: TtlCache::new(ttl),
            config,
        }
    }
}
