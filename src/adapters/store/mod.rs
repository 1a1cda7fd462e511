//! Work-item state storage
//!
//! The store is the single shared state between coordinators. All claim
//! safety rests on the conditional [`update`](traits::WorkItemStore::update):
//! writes carry the version the caller read, and the store rejects the write
//! if the stored version has moved.

pub mod memory;
pub mod traits;

pub use memory::MemoryWorkItemStore;
pub use traits::WorkItemStore;
