//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted logs
//! - Configurable log levels
//! - Local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use bulkward::logging::init_logging;
//! use bulkward::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a file build
///
/// # Example
///
/// ```no_run
/// use bulkward::log_build_start;
/// use bulkward::domain::ids::{FileId, PublicationId};
///
/// let publication_id = PublicationId::new("july-2025-full").unwrap();
/// let file_id = FileId::new("Patient-0001").unwrap();
/// log_build_start!(&publication_id, &file_id);
/// ```
#[macro_export]
macro_rules! log_build_start {
    ($publication_id:expr, $file_id:expr) => {
        tracing::info!(
            publication_id = %$publication_id,
            file_id = %$file_id,
            "Starting file build"
        );
    };
}

/// Log the completion of a file build
#[macro_export]
macro_rules! log_build_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            records = $count,
            duration_ms = $duration.as_millis(),
            "File build completed"
        );
    };
}

/// Log a retry attempt
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = $reason,
            "Retrying operation"
        );
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_compile() {
        // Logging output itself is not asserted in unit tests.
    }
}
