//! External system integrations for Bulkward.
//!
//! This module provides adapters for the three surfaces the coordinator
//! touches:
//!
//! - [`store`] - Work-item state storage (trait-based, with an in-memory
//!   implementation)
//! - [`provider`] - Upstream patient record source (REST data-query service)
//! - [`sink`] - Bulk file destination (local filesystem)
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies
//! and enable testing with in-memory or mock implementations. Core
//! coordination code depends only on the traits defined here.

pub mod provider;
pub mod sink;
pub mod store;
