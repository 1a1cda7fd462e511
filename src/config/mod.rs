//! Configuration management for Bulkward.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Bulkward uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment variable overrides (`BULKWARD_*` prefix)
//! - Default values for optional settings
//! - Comprehensive validation
//! - Type-safe configuration structs
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bulkward::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Load configuration from file
//! let config = load_config("bulkward.toml")?;
//!
//! // Access configuration sections
//! println!("Provider URL: {}", config.provider.base_url);
//! println!("Workers: {}", config.build.worker_count);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! The configuration is organized into sections:
//!
//! - [`ApplicationConfig`] - Application settings (log level, instance id)
//! - [`ProviderConfig`] - Upstream record provider connection
//! - [`AnonymizationConfig`] - Salt, name corpus, and date truncation
//! - [`BuildConfig`] - Worker pool sizing
//! - [`RecoveryConfig`] - Hung-claim recovery sweep
//! - [`SinkConfig`] - Bulk file destination
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [provider]
//! base_url = "https://records.example.com/api"
//! access_key = "${BULKWARD_PROVIDER_ACCESS_KEY}"
//!
//! [anonymization]
//! salt_key = "${BULKWARD_ANONYMIZATION_SALT_KEY}"
//! date_truncation_years = 90
//!
//! [build]
//! worker_count = 3
//! backlog_capacity = 5000
//!
//! [recovery]
//! allowed_hang_minutes = 30
//!
//! [sink]
//! output_dir = "/var/bulk"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    AnonymizationConfig, ApplicationConfig, BuildConfig, BulkwardConfig, LoggingConfig,
    ProviderConfig, RecoveryConfig, RetryConfig, SinkConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
