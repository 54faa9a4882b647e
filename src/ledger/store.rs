//! Durable storage backends for the ledger.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LetterError, Result};

/// A single durable slot holding the serialized ledger.
pub trait LedgerStore {
    /// Return the stored document, or `None` if there is none or it
    /// cannot be read.
    fn read(&self) -> Option<String>;

    /// Replace the stored document.
    fn write(&mut self, contents: &str) -> Result<()>;
}

/// Ledger kept in a JSON file (usually `<data dir>/letterdesk/ledger.json`).
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for FileStore {
    fn read(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Some(contents),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No readable ledger file");
                None
            }
        }
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LetterError::io(parent, e))?;
        }
        std::fs::write(&self.path, contents).map_err(|e| LetterError::io(&self.path, e))
    }
}

/// In-process store for `--ephemeral` sessions and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Option<String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `contents` already stored.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
            fail_writes: false,
        }
    }

    /// Make every write fail, like a full or disabled storage area.
    pub fn failing(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl LedgerStore for MemoryStore {
    fn read(&self) -> Option<String> {
        self.contents.clone()
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        if self.fail_writes {
            return Err(LetterError::io(
                "<memory>",
                std::io::Error::new(std::io::ErrorKind::Other, "storage quota exceeded"),
            ));
        }
        self.contents = Some(contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested").join("ledger.json"));
        assert!(store.read().is_none());
        store.write("{}").unwrap();
        assert_eq!(store.read().as_deref(), Some("{}"));
    }

    #[test]
    fn test_memory_store_failing() {
        let mut store = MemoryStore::with_contents("{}").failing();
        assert!(store.write("{\"a\":1}").is_err());
        assert_eq!(store.contents(), Some("{}"));
    }
}
