//! Domain models and types for Bulkward.
//!
//! This module contains the core domain models, types, and business rules.
//! All errors are domain-specific and don't expose third-party types.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PublicationId`], [`FileId`])
//! - **Work tracking models** ([`FileWorkItem`], [`BuildStatus`])
//! - **Build protocol types** ([`FileBuildRequest`], [`FileClaim`],
//!   [`FileBuildResponse`])
//! - **Patient records** ([`PatientRecord`], [`HumanName`])
//! - **Error types** ([`BulkwardError`] and friends)
//! - **Result type alias** ([`Result`])
//!
//! # Derived status
//!
//! A file's [`BuildStatus`] is never stored. It is always derived from the
//! two optional build timestamps on [`FileWorkItem`], which keeps a single
//! source of truth:
//!
//! ```rust
//! use bulkward::domain::BuildStatus;
//! use chrono::Utc;
//!
//! # let mut item = bulkward::domain::FileWorkItem::sample();
//! item.build_start_time = Some(Utc::now());
//! item.build_complete_time = None;
//! assert_eq!(item.status(), BuildStatus::InProgress);
//! ```

pub mod build;
pub mod errors;
pub mod ids;
pub mod patient;
pub mod result;
pub mod status;
pub mod work_item;

// Re-export commonly used types for convenience
pub use build::{FileBuildRequest, FileBuildResponse, FileClaim, PublicationRequest};
pub use errors::{
    BuildError, BulkwardError, ClaimError, ProviderError, PublicationError, SinkError, StoreError,
};
pub use ids::{FileId, PublicationId};
pub use patient::{HumanName, PatientRecord};
pub use result::Result;
pub use status::{FileStatus, PublicationStatus};
pub use work_item::{BuildStatus, FileWorkItem};
