//! Structured logging initialization.
//!
//! Environment-aware tracing setup shared by embeddings and the test
//! suites. Safe to call more than once; the first caller wins.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let json_output = matches!(
            std::env::var("EXAMCORE_LOG_FORMAT").as_deref(),
            Ok("json")
        );

        let subscriber = tracing_subscriber::registry().with(if json_output {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .json()
                .with_filter(EnvFilter::new(log_level))
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_filter(EnvFilter::new(log_level))
                .boxed()
        });

        // Another subscriber may already be installed by the host process.
        if subscriber.try_init().is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }

        tracing::info!(environment = %environment, "structured logging initialized");
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("EXAMCORE_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    std::env::var("EXAMCORE_LOG").unwrap_or_else(|_| match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        std::env::remove_var("EXAMCORE_LOG");
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("test"), "debug");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_structured_logging();
        init_structured_logging();
    }
}
