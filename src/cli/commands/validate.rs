//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Bulkward configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // Load configuration (loading already validates)
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        match config.validate() {
            Ok(_) => {
                println!("Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  Provider: {}", config.provider.base_url);
                println!("  Access Key Header: {}", config.provider.access_key_header);
                println!("  Workers: {}", config.build.worker_count);
                println!("  Backlog Capacity: {}", config.build.backlog_capacity);
                println!("  Recovery Enabled: {}", config.recovery.enabled);
                println!(
                    "  Allowed Hang: {} minute(s)",
                    config.recovery.allowed_hang_minutes
                );
                println!("  Output Directory: {}", config.sink.output_dir);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}
