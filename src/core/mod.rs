//! Core coordination logic for Bulkward.
//!
//! This module contains the coordinator's business logic, independent of any
//! particular store, provider, or sink implementation:
//!
//! - [`claim`] - Optimistic-concurrency claim protocol
//! - [`schedule`] - Oldest-first selection of pending files
//! - [`status`] - Derived per-file status and publication aggregation
//! - [`recovery`] - Hung-claim detection and reset
//! - [`build`] - Bounded worker pool and the file build pipeline
//! - [`publication`] - Publication lifecycle (create, delete, list, status)

pub mod build;
pub mod claim;
pub mod publication;
pub mod recovery;
pub mod schedule;
pub mod status;
