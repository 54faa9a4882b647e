//! Letters from a local JSON document.

use std::path::Path;

use crate::error::{LetterError, Result};
use crate::model::letter::Letter;

/// Read and decode a letters document from disk.
pub fn read(path: &Path) -> Result<Vec<Letter>> {
    if !path.exists() {
        return Err(LetterError::FileNotFound(path.to_path_buf()));
    }
    let body = std::fs::read_to_string(path).map_err(|e| LetterError::io(path, e))?;
    super::parse_document(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = read(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, LetterError::FileNotFound(_)));
    }

    #[test]
    fn test_read_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letters.json");
        std::fs::write(&path, r#"{"letters":[{"id":"x","text":"hello"}]}"#).unwrap();
        let letters = read(&path).unwrap();
        assert_eq!(letters.len(), 1);
        assert_eq!(letters[0].text, "hello");
    }
}
