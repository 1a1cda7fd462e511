// Bulkward - Anonymized Bulk Patient Export Coordinator
// Copyright (c) 2025 Bulkward Contributors
// Licensed under the MIT License

//! # Bulkward - Anonymized Bulk Patient Export Coordinator
//!
//! Bulkward coordinates the production of large, anonymized, newline-delimited
//! JSON export files ("publications") for patient records across one or more
//! cooperating application instances, with no central lock manager.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Claiming** exclusive rights to build a file via optimistic concurrency
//! - **Scheduling** the next file to build, oldest publication first
//! - **Anonymizing** each record deterministically (synthetic names, truncated
//!   dates, salted pseudo-UUID identifiers) before it is written out
//! - **Aggregating** per-file build state into an overall publication status
//! - **Recovering** hung claims whose owner crashed or stalled
//!
//! ## Architecture
//!
//! Bulkward follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (claim, schedule, status, recovery, build,
//!   publication lifecycle)
//! - [`anonymization`] - Deterministic record anonymization pipeline
//! - [`adapters`] - External collaborators (work-item store, record provider,
//!   bulk file sink)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Coordination model
//!
//! The work-item store is the only shared mutable resource. Every cross-worker
//! and cross-process decision flows through its conditional (version-checked)
//! update: a claim is an update that only succeeds if nobody else updated the
//! item first. Losers of that race receive `AlreadyClaimed`; there are no
//! distributed locks. Hung claims are swept back to `NOT_STARTED` after a
//! configurable elapsed time by [`core::recovery::HungClaimSweeper`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bulkward::adapters::store::MemoryWorkItemStore;
//! use bulkward::core::claim::OptimisticClaimant;
//! use bulkward::domain::FileBuildRequest;
//!
//! # async fn example() -> bulkward::domain::Result<()> {
//! let store = Arc::new(MemoryWorkItemStore::new());
//! let claimant = OptimisticClaimant::new(store, "worker-1");
//!
//! let claim = claimant
//!     .try_claim(&FileBuildRequest::new("july-2025-full", "Patient-0001")?)
//!     .await?;
//! println!("claimed page {} ({} records)", claim.page, claim.record_count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`], with the contention
//! outcome `AlreadyClaimed` kept distinct from infrastructure failures so
//! callers can tell "someone else has it" from "the store is broken".
//!
//! ## Logging
//!
//! Bulkward uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(publication_id = "july-2025-full", "Starting build");
//! warn!(file_id = "Patient-0007", "Claim already held");
//! ```

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
