//! Result type alias for Bulkward
//!
//! This module provides a convenient Result type alias that uses
//! `BulkwardError` as the error type.

use super::errors::BulkwardError;

/// Result type alias for Bulkward operations
///
/// This is a convenience type alias that uses `BulkwardError` as the error
/// type. Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use bulkward::domain::result::Result;
/// use bulkward::domain::errors::BulkwardError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(BulkwardError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, BulkwardError>;
