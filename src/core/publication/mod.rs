//! Publication lifecycle

pub mod manager;

pub use manager::PublicationManager;
