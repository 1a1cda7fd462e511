//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BulkwardConfig;
use crate::config::secret_string;
use crate::domain::errors::BulkwardError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into BulkwardConfig
/// 4. Applies environment variable overrides (BULKWARD_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use bulkward::config::loader::load_config;
///
/// let config = load_config("bulkward.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BulkwardConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BulkwardError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BulkwardError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    // Perform environment variable substitution
    let contents = substitute_env_vars(&contents)?;

    // Parse TOML
    let mut config: BulkwardConfig = toml::from_str(&contents)
        .map_err(|e| BulkwardError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config);

    // Validate configuration
    config.validate().map_err(|e| {
        BulkwardError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| {
        BulkwardError::Configuration(format!("Invalid substitution pattern: {e}"))
    })?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(BulkwardError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using BULKWARD_* prefix
///
/// Environment variables follow the pattern: BULKWARD_<SECTION>_<KEY>
/// For example: BULKWARD_PROVIDER_BASE_URL, BULKWARD_BUILD_WORKER_COUNT
fn apply_env_overrides(config: &mut BulkwardConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("BULKWARD_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("BULKWARD_APPLICATION_INSTANCE_ID") {
        config.application.instance_id = Some(val);
    }

    // Provider overrides
    if let Ok(val) = std::env::var("BULKWARD_PROVIDER_BASE_URL") {
        config.provider.base_url = val;
    }
    if let Ok(val) = std::env::var("BULKWARD_PROVIDER_ACCESS_KEY") {
        config.provider.access_key = secret_string(val);
    }
    if let Ok(val) = std::env::var("BULKWARD_PROVIDER_ACCESS_KEY_HEADER") {
        config.provider.access_key_header = val;
    }
    if let Ok(val) = std::env::var("BULKWARD_PROVIDER_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.provider.timeout_seconds = timeout;
        }
    }

    // Anonymization overrides
    if let Ok(val) = std::env::var("BULKWARD_ANONYMIZATION_SALT_KEY") {
        config.anonymization.salt_key = secret_string(val);
    }
    if let Ok(val) = std::env::var("BULKWARD_ANONYMIZATION_NAMES_FILE") {
        config.anonymization.names_file = Some(val);
    }

    // Build overrides
    if let Ok(val) = std::env::var("BULKWARD_BUILD_WORKER_COUNT") {
        if let Ok(count) = val.parse() {
            config.build.worker_count = count;
        }
    }
    if let Ok(val) = std::env::var("BULKWARD_BUILD_BACKLOG_CAPACITY") {
        if let Ok(capacity) = val.parse() {
            config.build.backlog_capacity = capacity;
        }
    }

    // Recovery overrides
    if let Ok(val) = std::env::var("BULKWARD_RECOVERY_ENABLED") {
        config.recovery.enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("BULKWARD_RECOVERY_ALLOWED_HANG_MINUTES") {
        if let Ok(minutes) = val.parse() {
            config.recovery.allowed_hang_minutes = minutes;
        }
    }

    // Sink overrides
    if let Ok(val) = std::env::var("BULKWARD_SINK_OUTPUT_DIR") {
        config.sink.output_dir = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("BULKWARD_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("BULKWARD_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("BULKWARD_TEST_SUBST_VAR", "test_value");
        let input = "salt_key = \"${BULKWARD_TEST_SUBST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "salt_key = \"test_value\"\n");
        std::env::remove_var("BULKWARD_TEST_SUBST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("BULKWARD_TEST_MISSING_VAR");
        let input = "salt_key = \"${BULKWARD_TEST_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        let input = "# reference ${BULKWARD_TEST_COMMENT_VAR} in docs\nworker_count = 3";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${BULKWARD_TEST_COMMENT_VAR}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "info"

[provider]
base_url = "https://records.example.com/api"
access_key = "test-key"

[anonymization]
salt_key = "test-salt"

[build]
worker_count = 3
backlog_capacity = 5000

[recovery]
allowed_hang_minutes = 30

[sink]
output_dir = "/tmp/bulk"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config.provider.base_url, "https://records.example.com/api");
        assert_eq!(config.build.worker_count, 3);
        assert_eq!(config.sink.output_dir, "/tmp/bulk");
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let toml_content = r#"
[provider]
base_url = "records.example.com"
access_key = "test-key"

[anonymization]
salt_key = "test-salt"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
