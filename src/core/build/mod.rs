//! File build pipeline
//!
//! Claims are taken synchronously by the [`orchestrator`]; the actual
//! fetch-anonymize-write work runs on the bounded [`pool`], one
//! [`worker`] pipeline per job.

pub mod orchestrator;
pub mod pool;
pub mod worker;

pub use orchestrator::{DrainSummary, FileBuilder};
pub use pool::{BuildHandle, BuildPool};
pub use worker::FileBuildWorker;
