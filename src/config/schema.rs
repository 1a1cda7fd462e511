//! Configuration schema types
//!
//! This module defines the configuration structure for Bulkward.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main Bulkward configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkwardConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Upstream record provider configuration
    pub provider: ProviderConfig,

    /// Anonymization configuration
    pub anonymization: AnonymizationConfig,

    /// File build worker pool configuration
    #[serde(default)]
    pub build: BuildConfig,

    /// Hung-claim recovery configuration
    #[serde(default)]
    pub recovery: RecoveryConfig,

    /// Bulk file sink configuration
    #[serde(default)]
    pub sink: SinkConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BulkwardConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.provider.validate()?;
        self.anonymization.validate()?;
        self.build.validate()?;
        self.recovery.validate()?;
        self.sink.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Identity this instance stamps on claims. Defaults to the hostname
    /// when absent.
    #[serde(default)]
    pub instance_id: Option<String>,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            instance_id: None,
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Upstream record provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the record provider
    pub base_url: String,

    /// Access key sent with every request
    /// Stored securely in memory and automatically zeroized on drop
    pub access_key: SecretString,

    /// Header name the access key is sent in
    #[serde(default = "default_access_key_header")]
    pub access_key_header: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl ProviderConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("provider.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("provider.base_url must start with http:// or https://".to_string());
        }

        if self.access_key.expose_secret().is_empty() {
            return Err("provider.access_key cannot be empty".to_string());
        }

        if self.access_key_header.is_empty() {
            return Err("provider.access_key_header cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("provider.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

/// Anonymization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Salt mixed into every anonymized identifier
    /// Stored securely in memory and automatically zeroized on drop
    pub salt_key: SecretString,

    /// Optional path to a name corpus file, one name per line. When absent
    /// the embedded corpus is used.
    #[serde(default)]
    pub names_file: Option<String>,

    /// Offset into the corpus for family name selection
    #[serde(default = "default_family_name_offset")]
    pub family_name_offset: u64,

    /// Dates older than this many years collapse to the cap year
    #[serde(default = "default_date_truncation_years")]
    pub date_truncation_years: i32,
}

impl AnonymizationConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.salt_key.expose_secret().is_empty() {
            return Err("anonymization.salt_key cannot be empty".to_string());
        }

        if self.date_truncation_years <= 0 {
            return Err(format!(
                "anonymization.date_truncation_years must be > 0, got {}",
                self.date_truncation_years
            ));
        }

        Ok(())
    }
}

/// File build worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Number of concurrent file build workers
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Queued builds accepted beyond the running ones. Submissions past
    /// this are rejected, not blocked.
    #[serde(default = "default_backlog_capacity")]
    pub backlog_capacity: usize,

    /// Maximum files handed out per scheduling pass
    #[serde(default = "default_schedule_batch_size")]
    pub schedule_batch_size: usize,
}

impl BuildConfig {
    fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 || self.worker_count > 64 {
            return Err(format!(
                "build.worker_count must be between 1 and 64, got {}",
                self.worker_count
            ));
        }

        if self.backlog_capacity == 0 {
            return Err("build.backlog_capacity must be > 0".to_string());
        }

        if self.schedule_batch_size == 0 {
            return Err("build.schedule_batch_size must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            backlog_capacity: default_backlog_capacity(),
            schedule_batch_size: default_schedule_batch_size(),
        }
    }
}

/// Hung-claim recovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Enable the periodic hung-claim sweep
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// How long a build may run before it is considered hung. Must be at
    /// least one minute; anything shorter would race healthy builds.
    #[serde(default = "default_allowed_hang_minutes")]
    pub allowed_hang_minutes: i64,

    /// Minutes between sweeps
    #[serde(default = "default_sweep_interval_minutes")]
    pub sweep_interval_minutes: u64,
}

impl RecoveryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.allowed_hang_minutes < 1 {
            return Err(format!(
                "recovery.allowed_hang_minutes must be >= 1, got {}",
                self.allowed_hang_minutes
            ));
        }

        if self.sweep_interval_minutes == 0 {
            return Err("recovery.sweep_interval_minutes must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_hang_minutes: default_allowed_hang_minutes(),
            sweep_interval_minutes: default_sweep_interval_minutes(),
        }
    }
}

/// Bulk file sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Directory bulk files are written under
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl SinkConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.is_empty() {
            return Err("sink.output_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_access_key_header() -> String {
    "client-key".to_string()
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_family_name_offset() -> u64 {
    1000
}

fn default_date_truncation_years() -> i32 {
    90
}

fn default_worker_count() -> usize {
    3
}

fn default_backlog_capacity() -> usize {
    5000
}

fn default_schedule_batch_size() -> usize {
    10
}

fn default_allowed_hang_minutes() -> i64 {
    60
}

fn default_sweep_interval_minutes() -> u64 {
    15
}

fn default_output_dir() -> String {
    "./bulk".to_string()
}

fn default_local_path() -> String {
    "/var/log/bulkward".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
