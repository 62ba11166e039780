use crate::error::{ExamCoreError, Result};

/// Runtime tunables for the core, read from the environment with explicit
/// parse errors instead of silent fallbacks.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Capacity of the broadcast channel behind the event publisher.
    pub event_channel_capacity: usize,
    /// How long generated paper sets stay cached.
    pub paper_cache_ttl_secs: u64,
    /// Number of questions drawn for an online attempt when the exam has no
    /// pre-assigned paper.
    pub fallback_question_count: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: 1000,
            paper_cache_ttl_secs: 300,
            fallback_question_count: 10,
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(capacity) = std::env::var("EXAMCORE_EVENT_CAPACITY") {
            config.event_channel_capacity = capacity.parse().map_err(|e| {
                ExamCoreError::Configuration(format!("Invalid event_channel_capacity: {e}"))
            })?;
        }

        if let Ok(ttl) = std::env::var("EXAMCORE_PAPER_CACHE_TTL_SECS") {
            config.paper_cache_ttl_secs = ttl.parse().map_err(|e| {
                ExamCoreError::Configuration(format!("Invalid paper_cache_ttl_secs: {e}"))
            })?;
        }

        if let Ok(count) = std::env::var("EXAMCORE_FALLBACK_QUESTION_COUNT") {
            config.fallback_question_count = count.parse().map_err(|e| {
                ExamCoreError::Configuration(format!("Invalid fallback_question_count: {e}"))
            })?;
        }

        Ok(config)
    }
}
