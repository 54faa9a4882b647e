//! The immutable letter record.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// One letter as shown on the desk.
///
/// Letters are loaded once at startup and never mutated afterwards; all
/// per-letter state lives in the [`ActionLedger`](crate::ledger::ActionLedger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Letter {
    /// Stable identifier, used as the ledger key.
    pub id: String,

    /// Number shown to the reader ("Letter #12").
    pub number: u32,

    /// Free-text category from the spreadsheet.
    pub tag: String,

    /// Body text.
    pub text: String,

    /// Audio clip URL or path, if the letter has one.
    pub audio: Option<String>,
}

impl Letter {
    /// Whether this letter carries a playable clip.
    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// First line of the body, cut to `max_chars` characters.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let first = self.text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
        let first = first.trim();
        if first.chars().count() <= max_chars {
            first.to_string()
        } else {
            let cut: String = first.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{cut}...")
        }
    }
}

/// Derive a stable id from a letter's position and content.
///
/// Format: `"{position}-{8 hex chars of sha256(tag \n text)}"`.
pub fn derive_id(position: usize, tag: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(tag.as_bytes());
    hasher.update(b"\n");
    hasher.update(text.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{position}-{}", &digest[..8])
}
