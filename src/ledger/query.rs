//! Archive view selection: search text, filter and sort order.

use crate::model::letter::Letter;
use crate::model::state::{LetterState, Status};

/// Order of the archive by last status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Most recently updated first.
    #[default]
    Newest,
    /// Least recently updated first.
    Oldest,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Newest => Self::Oldest,
            Self::Oldest => Self::Newest,
        }
    }

    /// Parse "desc"/"newest" or "asc"/"oldest".
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "desc" | "newest" => Some(Self::Newest),
            "asc" | "oldest" => Some(Self::Oldest),
            _ => None,
        }
    }
}

/// Which archived letters to show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ArchiveFilter {
    #[default]
    All,
    /// Only letters whose tag equals this one.
    Tag(String),
    /// Only hearted letters. Ignores tag and search text.
    Favorites,
}

/// Full selection for the archive gallery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveQuery {
    /// Case-insensitive substring matched against the body text.
    pub search: String,
    pub filter: ArchiveFilter,
    pub sort: SortOrder,
}

impl ArchiveQuery {
    /// Whether a seen letter with `state` belongs in the result.
    pub fn matches(&self, letter: &Letter, state: &LetterState) -> bool {
        match &self.filter {
            ArchiveFilter::Favorites => return state.status == Status::Hearted,
            ArchiveFilter::Tag(tag) if letter.tag != *tag => return false,
            _ => {}
        }
        let needle = self.search.trim();
        needle.is_empty() || letter.text.to_lowercase().contains(&needle.to_lowercase())
    }
}
