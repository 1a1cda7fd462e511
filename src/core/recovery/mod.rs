//! Hung-claim recovery

pub mod sweeper;

pub use sweeper::HungClaimSweeper;
