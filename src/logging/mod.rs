//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - JSON-formatted local log files with rotation
//!
//! # Example
//!
//! ```no_run
//! use ersd_import::logging::init_logging;
//! use ersd_import::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(chunk = 3, "Chunk committed");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the outcome of one committed chunk
///
/// # Example
///
/// ```no_run
/// use ersd_import::log_chunk_committed;
/// use std::time::Duration;
///
/// log_chunk_committed!(0, 74, Duration::from_millis(850));
/// ```
#[macro_export]
macro_rules! log_chunk_committed {
    ($index:expr, $entries:expr, $duration:expr) => {
        tracing::info!(
            chunk = $index,
            entries = $entries,
            duration_ms = $duration.as_millis() as u64,
            "Chunk committed"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use ersd_import::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying request"
        );
    };
}
