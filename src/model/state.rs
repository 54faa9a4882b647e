//! Per-letter status and timestamps kept in the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the reader has done with a letter.
///
/// There is no implicit rank between statuses; recency is only ever
/// decided by [`LetterState::updated_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Read,
    Hearted,
    Archived,
}

impl Status {
    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Hearted => "hearted",
            Self::Archived => "archived",
        }
    }
}

/// Ledger entry for one letter. A letter without an entry is unseen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterState {
    pub status: Status,

    /// First time the letter was opened. Never changes once set; older
    /// documents may lack it.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub seen_at: Option<DateTime<Utc>>,

    /// Last status write.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wire_format_is_camel_case_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let state = LetterState {
            status: Status::Hearted,
            seen_at: Some(at),
            updated_at: at,
        };
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["status"], "hearted");
        assert_eq!(json["seenAt"], 1_700_000_000_123i64);
        assert_eq!(json["updatedAt"], 1_700_000_000_123i64);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let raw = r#"{"status":"read","seenAt":5,"updatedAt":9,"mood":"sunny"}"#;
        let state: LetterState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.status, Status::Read);
        assert_eq!(state.updated_at.timestamp_millis(), 9);
    }

    #[test]
    fn test_missing_seen_at_decodes_as_none() {
        let raw = r#"{"status":"archived","updatedAt":9}"#;
        let state: LetterState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.status, Status::Archived);
        assert_eq!(state.seen_at, None);
        let json = serde_json::to_value(state).unwrap();
        assert!(json.get("seenAt").is_none());
    }
}
