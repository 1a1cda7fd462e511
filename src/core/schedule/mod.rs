//! Pending file selection

pub mod oldest_first;

pub use oldest_first::OldestFirstScheduler;
