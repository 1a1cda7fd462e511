//! Optimistic-concurrency claim protocol
//!
//! Multiple coordinators may race to build the same file. Claims are decided
//! by the store's conditional update: the winner's write lands, every loser
//! gets a version conflict and reports the file as already claimed. No locks
//! are held anywhere.

pub mod claimant;

pub use claimant::{default_processor_id, OptimisticClaimant};
