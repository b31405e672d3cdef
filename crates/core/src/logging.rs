//! Logging and observability
//!
//! Structured logging via tracing, with text or JSON formatting selected at
//! runtime. All output goes to stderr so stdout stays free for run results.
//!
//! Environment variables:
//! * `REMBENCH_LOG_FORMAT` — "json" for JSON output, anything else for text
//! * `REMBENCH_LOG` — logging filter specification
//! * `RUST_LOG` — standard fallback filter

use anyhow::Result;
use std::{io, sync::Once};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the logging system with an optional format override.
///
/// Accepts `None`/`"text"` for human-readable output or `"json"` for
/// structured output; the `REMBENCH_LOG_FORMAT` environment variable is
/// consulted when no override is given. Safe to call multiple times —
/// subsequent calls are no-ops.
pub fn init(format: Option<&str>) -> Result<()> {
    INIT.call_once(|| {
        let filter = create_env_filter();

        let env_format = std::env::var("REMBENCH_LOG_FORMAT").ok();
        let effective_format = format.or(env_format.as_deref()).unwrap_or("text");

        match effective_format {
            "json" => {
                tracing_subscriber::registry()
                    .with(fmt::layer().json().with_target(true).with_writer(io::stderr))
                    .with(filter)
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(fmt::layer().with_target(true).with_writer(io::stderr))
                    .with(filter)
                    .init();
            }
        }

        tracing::debug!("Logging initialized with format: {}", effective_format);
    });

    Ok(())
}

/// Create an EnvFilter based on environment variables
fn create_env_filter() -> EnvFilter {
    if let Ok(spec) = std::env::var("REMBENCH_LOG") {
        EnvFilter::try_new(&spec).unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid REMBENCH_LOG specification '{}', using default 'info'",
                spec
            );
            EnvFilter::new("info")
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Check if logging has been initialized
pub fn is_initialized() -> bool {
    INIT.is_completed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Init touches global subscriber state; serialize the tests.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_init_multiple_calls_safe() {
        let _guard = TEST_MUTEX.lock().unwrap();

        assert!(init(None).is_ok());
        assert!(init(Some("json")).is_ok());
        assert!(init(Some("text")).is_ok());
    }

    #[test]
    fn test_is_initialized() {
        let _guard = TEST_MUTEX.lock().unwrap();

        let _ = init(None);
        assert!(is_initialized());
    }

    #[test]
    fn test_env_filter_with_env_vars() {
        let _guard = TEST_MUTEX.lock().unwrap();

        std::env::set_var("REMBENCH_LOG", "trace");
        let _filter = create_env_filter();
        std::env::remove_var("REMBENCH_LOG");

        std::env::set_var("REMBENCH_LOG", "not a !! filter ~~ spec");
        let _filter = create_env_filter();
        std::env::remove_var("REMBENCH_LOG");
    }
}
