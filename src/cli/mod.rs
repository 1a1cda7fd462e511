//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Bulkward using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Bulkward - Anonymized Bulk Patient Export Coordinator
#[derive(Parser, Debug)]
#[command(name = "bulkward")]
#[command(version, about, long_about = None)]
#[command(author = "Bulkward Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "bulkward.toml", env = "BULKWARD_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "BULKWARD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a publication and build all of its files
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
