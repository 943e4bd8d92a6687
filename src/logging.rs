//! # Structured Logging Module
//!
//! Environment-aware structured logging for applications embedding the client.
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the caller, and this module offers a sensible default.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
///
/// Safe to call more than once. `RUST_LOG` overrides the environment default
/// and `LOG_FORMAT=json` switches the console output to JSON lines.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));

        let layer = if json_output_requested() {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // Use try_init to avoid panic if global subscriber already set
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        tracing::info!(environment = %environment, "Structured logging initialized");
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("PIPEDREAM_CONNECT_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

fn json_output_requested() -> bool {
    std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Log a failed API operation with its context
pub fn log_api_failure(operation: &str, status: Option<u16>, error: &str) {
    tracing::error!(
        operation = %operation,
        status = status,
        error = %error,
        "Connect API request failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_environment_detection() {
        std::env::set_var("PIPEDREAM_CONNECT_ENV", "production");
        assert_eq!(get_environment(), "production");
        std::env::remove_var("PIPEDREAM_CONNECT_ENV");

        std::env::set_var("APP_ENV", "staging");
        assert_eq!(get_environment(), "staging");
        std::env::remove_var("APP_ENV");

        assert_eq!(get_environment(), "development");
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("test"), "debug");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("unknown"), "debug");
    }

    #[test]
    #[serial]
    fn test_json_format_flag() {
        std::env::set_var("LOG_FORMAT", "JSON");
        assert!(json_output_requested());
        std::env::set_var("LOG_FORMAT", "pretty");
        assert!(!json_output_requested());
        std::env::remove_var("LOG_FORMAT");
        assert!(!json_output_requested());
    }

    #[test]
    #[serial]
    fn test_init_is_idempotent() {
        init_structured_logging();
        init_structured_logging();
        assert!(LOGGER_INITIALIZED.get().is_some());
    }
}
