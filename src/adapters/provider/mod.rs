//! Upstream patient record source
//!
//! Publications are sliced against the provider's count at creation time and
//! workers later fetch the same slices page by page. The provider must page
//! deterministically for a rebuilt file to match the original.

pub mod rest;
pub mod traits;

pub use rest::RestRecordProvider;
pub use traits::{RecordProvider, ResourceCount};
