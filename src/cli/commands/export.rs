//! Export command implementation
//!
//! This module implements the `export` command: create a publication from
//! the provider's current record population, then build every file of it
//! locally with the configured worker pool.

use crate::adapters::provider::RestRecordProvider;
use crate::adapters::sink::LocalFileSink;
use crate::adapters::store::{MemoryWorkItemStore, WorkItemStore};
use crate::anonymization::identifier::SaltedType5Generator;
use crate::anonymization::names::NameCorpus;
use crate::anonymization::patient::PatientAnonymizer;
use crate::anonymization::synthetic::SyntheticData;
use crate::config::{load_config, BulkwardConfig};
use crate::core::build::{BuildPool, FileBuildWorker, FileBuilder};
use crate::core::claim::{default_processor_id, OptimisticClaimant};
use crate::core::publication::PublicationManager;
use crate::core::recovery::HungClaimSweeper;
use crate::core::schedule::OldestFirstScheduler;
use crate::domain::build::PublicationRequest;
use crate::domain::{BuildStatus, PublicationId};
use clap::Args;
use secrecy::ExposeSecret;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Identifier for the new publication (8-64 chars, letters, digits, '-')
    #[arg(long)]
    pub publication_id: String,

    /// Records per bulk file
    #[arg(long)]
    pub records_per_file: u32,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        // Load configuration
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let publication_id = match PublicationId::new(self.publication_id.as_str()) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Invalid publication id: {e}");
                return Ok(2);
            }
        };

        // Confirmation prompt (unless --yes)
        if !self.yes {
            println!("Export Configuration:");
            println!("  Publication: {publication_id}");
            println!("  Records per file: {}", self.records_per_file);
            println!("  Provider: {}", config.provider.base_url);
            println!("  Output: {}", config.sink.output_dir);
            println!("  Workers: {}", config.build.worker_count);
            println!();
            print!("Proceed with export? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(0);
            }
        }

        // Wire up the coordinator
        let (manager, builder) = match build_coordinator(&config).await {
            Ok(parts) => parts,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize export");
                eprintln!("Failed to initialize export: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        // Create the publication
        let request = PublicationRequest {
            publication_id: publication_id.clone(),
            records_per_file: self.records_per_file,
            automatic: true,
        };
        let files = match manager.create(&request).await {
            Ok(files) => files,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create publication");
                eprintln!("Failed to create publication: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        if files.is_empty() {
            println!("Provider reports zero records; nothing to build.");
            return Ok(0);
        }

        println!("Building {} file(s)...", files.len());
        println!();

        // Drain the backlog, stopping early on a shutdown signal. Claims a
        // cancelled drain leaves behind are reset by the hung-claim sweep.
        let summary = tokio::select! {
            result = builder.drain() => match result {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Export failed");
                    eprintln!("Export failed: {e}");
                    return Ok(5);
                }
            },
            _ = shutdown_signal.changed() => {
                tracing::info!("Export interrupted by shutdown signal");
                println!();
                println!("Export interrupted.");
                return Ok(130); // SIGINT exit code (standard Unix convention)
            }
        };

        // Display summary
        let status = manager.status(&publication_id).await?;
        println!();
        println!("Export Summary:");
        println!("  Publication: {}", status.publication_id);
        println!("  Status: {}", status.overall_status);
        println!("  Files built: {}", summary.built);
        println!("  Files failed: {}", summary.failed);
        println!("  Files skipped: {}", summary.skipped);
        println!();
        for file in &status.files {
            println!(
                "  {}  records {}-{}  {}",
                file.file_id, file.first_record, file.last_record, file.status
            );
        }
        println!();

        let exit_code = if status.overall_status == BuildStatus::Complete {
            println!("Export completed successfully.");
            0
        } else {
            println!("Export completed with unbuilt files.");
            1 // Partial success
        };

        Ok(exit_code)
    }
}

/// Assemble the publication manager and file builder from configuration.
async fn build_coordinator(
    config: &BulkwardConfig,
) -> anyhow::Result<(PublicationManager, FileBuilder)> {
    let store: Arc<dyn WorkItemStore> = Arc::new(MemoryWorkItemStore::new());
    let provider = Arc::new(RestRecordProvider::new(config.provider.clone())?);
    let sink = Arc::new(LocalFileSink::new(config.sink.output_dir.as_str()));

    let processor_id = config
        .application
        .instance_id
        .clone()
        .unwrap_or_else(default_processor_id);
    let claimant = Arc::new(OptimisticClaimant::new(store.clone(), processor_id));

    let names = match &config.anonymization.names_file {
        Some(path) => Arc::new(NameCorpus::from_file(path)?),
        None => NameCorpus::shared(),
    };
    let anonymizer = PatientAnonymizer::new(
        SyntheticData::new(
            names,
            config.anonymization.family_name_offset,
            config.anonymization.date_truncation_years,
        ),
        SaltedType5Generator::new(
            config.anonymization.salt_key.expose_secret().as_ref(),
            "Patient",
        ),
    );

    let worker = Arc::new(FileBuildWorker::new(
        provider.clone(),
        sink,
        claimant.clone(),
        anonymizer,
    ));
    let pool = BuildPool::start(
        config.build.worker_count,
        config.build.backlog_capacity,
        worker,
    );

    if config.recovery.enabled {
        let sweeper = HungClaimSweeper::new(
            store.clone(),
            chrono::Duration::minutes(config.recovery.allowed_hang_minutes),
        )?;
        let interval = std::time::Duration::from_secs(config.recovery.sweep_interval_minutes * 60);
        tokio::spawn(sweeper.run(interval));
    }

    let builder = FileBuilder::new(
        claimant,
        OldestFirstScheduler::new(store.clone(), config.build.schedule_batch_size),
        pool,
    );
    let manager = PublicationManager::new(store, provider);

    Ok((manager, builder))
}
