//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "bulkward.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("Initializing Bulkward configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_sample_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set BULKWARD_PROVIDER_ACCESS_KEY");
                println!("     - Set BULKWARD_ANONYMIZATION_SALT_KEY");
                println!("  3. Validate configuration: bulkward validate-config");
                println!("  4. Run an export: bulkward export --publication-id <id> --records-per-file <n>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate a commented sample configuration
    fn generate_sample_config() -> String {
        r#"# Bulkward Configuration File
# Anonymized Bulk Patient Export Coordinator

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Identity stamped on claims taken by this instance.
# Defaults to the hostname when omitted.
# instance_id = "coordinator-1"

[provider]
# Base URL of the upstream patient record provider
base_url = "https://records.example.com/api"

# Access key sent with every request (use environment variable)
access_key = "${BULKWARD_PROVIDER_ACCESS_KEY}"

# Header name the access key is sent in
access_key_header = "client-key"

# Request timeout in seconds
timeout_seconds = 60

[provider.retry]
# Retry policy for transient provider failures
max_retries = 3
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[anonymization]
# Salt mixed into every anonymized identifier (use environment variable).
# Changing the salt changes every anonymized id and name.
salt_key = "${BULKWARD_ANONYMIZATION_SALT_KEY}"

# Optional path to a name corpus file, one name per line.
# The embedded corpus is used when omitted.
# names_file = "/etc/bulkward/names.txt"

# Offset into the corpus for family name selection
family_name_offset = 1000

# Dates older than this many years collapse to the cap year
date_truncation_years = 90

[build]
# Number of concurrent file build workers (1-64)
worker_count = 3

# Queued builds accepted beyond the running ones
backlog_capacity = 5000

# Maximum files handed out per scheduling pass
schedule_batch_size = 10

[recovery]
# Periodically reset claims whose build has hung
enabled = true

# How long a build may run before it is considered hung (minimum 1)
allowed_hang_minutes = 60

# Minutes between sweeps
sweep_interval_minutes = 15

[sink]
# Directory bulk files are written under
output_dir = "./bulk"

[logging]
# Enable local file logging
local_enabled = true

# Local log file path
local_path = "/var/log/bulkward"

# Log rotation (daily, hourly, or never)
local_rotation = "daily"
"#
        .to_string()
    }
}
