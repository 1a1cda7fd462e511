//! Bulk file destination

pub mod local;
pub mod traits;

pub use local::LocalFileSink;
pub use traits::FileSink;
