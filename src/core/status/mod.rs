//! Derived status and publication aggregation

pub mod aggregator;

pub use aggregator::aggregate;
