//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for publication and file
//! identifiers. Each type ensures type safety and validates the shared
//! identifier format: 8 to 64 characters of `[-A-Za-z0-9]`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MIN_LEN: usize = 8;
const MAX_LEN: usize = 64;

fn validate_token(kind: &str, value: &str) -> Result<(), String> {
    if value.len() < MIN_LEN || value.len() > MAX_LEN {
        return Err(format!(
            "{kind} must be {MIN_LEN}-{MAX_LEN} characters, got {}",
            value.len()
        ));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(format!(
            "{kind} may only contain letters, digits, and '-': {value}"
        ));
    }
    Ok(())
}

/// Publication identifier newtype wrapper
///
/// An opaque token naming one bulk-export job, globally unique among active
/// publications.
///
/// # Examples
///
/// ```
/// use bulkward::domain::ids::PublicationId;
/// use std::str::FromStr;
///
/// let id = PublicationId::from_str("july-2025-full").unwrap();
/// assert_eq!(id.as_str(), "july-2025-full");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicationId(String);

impl PublicationId {
    /// Creates a new PublicationId from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not 8-64 chars of `[-A-Za-z0-9]`.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        validate_token("Publication id", &id)?;
        Ok(Self(id))
    }

    /// Returns the publication id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PublicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PublicationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PublicationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// File identifier newtype wrapper
///
/// The derived, extension-less name of one file-sized slice of a
/// publication, e.g. `Patient-0005`.
///
/// # Examples
///
/// ```
/// use bulkward::domain::ids::FileId;
///
/// let id = FileId::new("Patient-0005").unwrap();
/// assert_eq!(id.as_str(), "Patient-0005");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(String);

impl FileId {
    /// Creates a new FileId from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not 8-64 chars of `[-A-Za-z0-9]`.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        validate_token("File id", &id)?;
        Ok(Self(id))
    }

    /// Returns the file id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FileId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for FileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
