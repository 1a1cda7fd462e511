//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use bulkward::config::load_config;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("BULKWARD_APPLICATION_LOG_LEVEL");
    std::env::remove_var("BULKWARD_PROVIDER_BASE_URL");
    std::env::remove_var("BULKWARD_PROVIDER_ACCESS_KEY");
    std::env::remove_var("BULKWARD_BUILD_WORKER_COUNT");
    std::env::remove_var("BULKWARD_RECOVERY_ALLOWED_HANG_MINUTES");
    std::env::remove_var("BULKWARD_SINK_OUTPUT_DIR");
    std::env::remove_var("TEST_PROVIDER_KEY");
    std::env::remove_var("TEST_SALT_KEY");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

const COMPLETE_CONFIG: &str = r#"
[application]
log_level = "debug"
instance_id = "coordinator-1"

[provider]
base_url = "https://records.example.com/api"
access_key = "inline-key"
access_key_header = "client-key"
timeout_seconds = 45

[provider.retry]
max_retries = 5
initial_delay_ms = 500

[anonymization]
salt_key = "inline-salt"
family_name_offset = 2000
date_truncation_years = 80

[build]
worker_count = 6
backlog_capacity = 1000
schedule_batch_size = 25

[recovery]
enabled = true
allowed_hang_minutes = 45
sweep_interval_minutes = 10

[sink]
output_dir = "/var/bulk"

[logging]
local_enabled = false
local_path = "/var/log/bulkward"
local_rotation = "hourly"
"#;

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(COMPLETE_CONFIG);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.application.instance_id.as_deref(), Some("coordinator-1"));
    assert_eq!(config.provider.base_url, "https://records.example.com/api");
    assert_eq!(config.provider.timeout_seconds, 45);
    assert_eq!(config.provider.retry.max_retries, 5);
    assert_eq!(config.anonymization.family_name_offset, 2000);
    assert_eq!(config.anonymization.date_truncation_years, 80);
    assert_eq!(config.build.worker_count, 6);
    assert_eq!(config.build.schedule_batch_size, 25);
    assert_eq!(config.recovery.allowed_hang_minutes, 45);
    assert_eq!(config.recovery.sweep_interval_minutes, 10);
    assert_eq!(config.sink.output_dir, "/var/bulk");
    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_minimal_config_gets_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[provider]
base_url = "https://records.example.com/api"
access_key = "inline-key"

[anonymization]
salt_key = "inline-salt"
"#,
    );
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.provider.access_key_header, "client-key");
    assert_eq!(config.build.worker_count, 3);
    assert_eq!(config.build.backlog_capacity, 5000);
    assert!(config.recovery.enabled);
    assert_eq!(config.recovery.allowed_hang_minutes, 60);
    assert_eq!(config.recovery.sweep_interval_minutes, 15);
    assert_eq!(config.sink.output_dir, "./bulk");
}

#[test]
fn test_env_var_substitution() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("TEST_PROVIDER_KEY", "substituted-key");
    std::env::set_var("TEST_SALT_KEY", "substituted-salt");

    let file = write_config(
        r#"
[provider]
base_url = "https://records.example.com/api"
access_key = "${TEST_PROVIDER_KEY}"

[anonymization]
salt_key = "${TEST_SALT_KEY}"
"#,
    );
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.provider.access_key.expose_secret(), "substituted-key");
    assert_eq!(
        config.anonymization.salt_key.expose_secret(),
        "substituted-salt"
    );
    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_fails() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[provider]
base_url = "https://records.example.com/api"
access_key = "${TEST_PROVIDER_KEY}"

[anonymization]
salt_key = "inline-salt"
"#,
    );
    let result = load_config(file.path());
    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("TEST_PROVIDER_KEY"));
}

#[test]
fn test_env_overrides_take_precedence() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("BULKWARD_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("BULKWARD_BUILD_WORKER_COUNT", "12");
    std::env::set_var("BULKWARD_RECOVERY_ALLOWED_HANG_MINUTES", "5");
    std::env::set_var("BULKWARD_SINK_OUTPUT_DIR", "/override/bulk");

    let file = write_config(COMPLETE_CONFIG);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.build.worker_count, 12);
    assert_eq!(config.recovery.allowed_hang_minutes, 5);
    assert_eq!(config.sink.output_dir, "/override/bulk");
    cleanup_env_vars();
}

#[test]
fn test_invalid_override_fails_validation() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    // The hang floor applies to overrides too.
    std::env::set_var("BULKWARD_RECOVERY_ALLOWED_HANG_MINUTES", "0");

    let file = write_config(COMPLETE_CONFIG);
    let result = load_config(file.path());
    assert!(result.is_err());
    cleanup_env_vars();
}

#[test]
fn test_secret_not_exposed_in_debug() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(COMPLETE_CONFIG);
    let config = load_config(file.path()).unwrap();

    let debug_output = format!("{config:?}");
    assert!(!debug_output.contains("inline-key"));
    assert!(!debug_output.contains("inline-salt"));
}
