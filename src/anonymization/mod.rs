//! Anonymization module for Bulkward
//!
//! This module provides the deterministic anonymization pipeline applied to
//! each patient record before it is written to a bulk file.
//!
//! # Architecture
//!
//! The pipeline composes three pieces:
//! - **Name corpus** ([`names`]): an immutable, shared, pre-loaded ordered
//!   sequence of names used as a synthesis source
//! - **Synthetic data transform** ([`synthetic`]): deterministic
//!   date/datetime truncation and seed-driven name selection
//! - **Identifier anonymizer** ([`identifier`]): deterministic,
//!   non-reversible, salted pseudo-UUID generation
//!
//! [`patient::PatientAnonymizer`] ties them together, rewriting one source
//! record into an anonymized one with field-level redaction and merge rules.
//!
//! Everything here is a pure function of its inputs: the same source record,
//! salt, corpus, and offsets always produce the same anonymized record, so
//! a rebuilt file is byte-identical to the original build.
//!
//! # Usage
//!
//! ```rust
//! use bulkward::anonymization::identifier::SaltedType5Generator;
//! use bulkward::anonymization::names::NameCorpus;
//! use bulkward::anonymization::patient::PatientAnonymizer;
//! use bulkward::anonymization::synthetic::SyntheticData;
//!
//! let synthetic = SyntheticData::new(NameCorpus::shared(), 1000, 90);
//! let generator = SaltedType5Generator::new("my-salt", "Patient");
//! let anonymizer = PatientAnonymizer::new(synthetic, generator);
//! ```

pub mod identifier;
pub mod names;
pub mod patient;
pub mod synthetic;

// Re-export main types
pub use identifier::{AnonymizedIdGenerator, SaltedType5Generator};
pub use names::NameCorpus;
pub use patient::PatientAnonymizer;
pub use synthetic::SyntheticData;
