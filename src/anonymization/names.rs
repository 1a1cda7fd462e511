//! Shared name corpus for synthetic name selection
//!
//! The synthesis process needs a static set of names to choose from. The
//! corpus is large and anonymizers are fleeting (one per file build), so the
//! default corpus is loaded once per process and shared behind an `Arc`.
//! Thread safety falls out of immutability after load.

use crate::domain::errors::BulkwardError;
use crate::domain::Result;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// The default corpus compiled into the binary. One entry per line; only the
/// first comma-separated field of each line is used, which also accepts the
/// SSA `name,sex,count` year-of-birth format.
const EMBEDDED_NAMES: &str = include_str!("data/names.txt");

static SHARED: OnceLock<Arc<NameCorpus>> = OnceLock::new();

/// An immutable, ordered sequence of names.
#[derive(Debug)]
pub struct NameCorpus {
    names: Vec<String>,
}

impl NameCorpus {
    /// The process-wide shared corpus, loaded from the embedded list on
    /// first use.
    pub fn shared() -> Arc<NameCorpus> {
        SHARED
            .get_or_init(|| Arc::new(Self::parse(EMBEDDED_NAMES)))
            .clone()
    }

    /// Load a corpus from a file, one name per line (first comma field).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains no names.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BulkwardError::Configuration(format!(
                "Failed to read names file {}: {e}",
                path.display()
            ))
        })?;
        let corpus = Self::parse(&contents);
        if corpus.is_empty() {
            return Err(BulkwardError::Configuration(format!(
                "Names file {} contains no names",
                path.display()
            )));
        }
        Ok(corpus)
    }

    fn parse(contents: &str) -> Self {
        let names = contents
            .lines()
            .filter_map(|line| line.split(',').next())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    /// Acquire a name from the set given a seed, wrapping index bounds.
    /// Repeatable: the same seed always yields the same name.
    pub fn name(&self, seed: u64) -> &str {
        let index = (seed % self.names.len() as u64) as usize;
        &self.names[index]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_embedded_corpus_loads() {
        let corpus = NameCorpus::shared();
        assert!(corpus.len() > 100);
    }

    #[test]
    fn test_shared_returns_same_instance() {
        let a = NameCorpus::shared();
        let b = NameCorpus::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_index_wraps() {
        let corpus = NameCorpus::parse("Alice\nBob\nCarol\n");
        assert_eq!(corpus.name(0), "Alice");
        assert_eq!(corpus.name(3), "Alice");
        assert_eq!(corpus.name(4), "Bob");
        assert_eq!(corpus.name(u64::MAX), corpus.name(u64::MAX % 3));
    }

    #[test]
    fn test_parse_takes_first_comma_field() {
        let corpus = NameCorpus::parse("Emily,F,25494\nJacob,M,25830\n");
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.name(0), "Emily");
        assert_eq!(corpus.name(1), "Jacob");
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Ada\nGrace\nKatherine").unwrap();
        file.flush().unwrap();

        let corpus = NameCorpus::from_file(file.path()).unwrap();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.name(1), "Grace");
    }

    #[test]
    fn test_from_file_missing() {
        assert!(NameCorpus::from_file("/nonexistent/names.txt").is_err());
    }

    #[test]
    fn test_from_file_empty_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "\n\n").unwrap();
        file.flush().unwrap();
        assert!(NameCorpus::from_file(file.path()).is_err());
    }
}
