//! The action ledger: letter id → status and timestamps.
//!
//! The ledger is read once at startup and rewritten in full after every
//! mutation. Storage trouble never reaches the caller: a missing or
//! corrupt document loads as an empty ledger, and failed writes are
//! logged and otherwise ignored.

pub mod query;
pub mod store;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::letter::Letter;
use crate::model::state::{LetterState, Status};

use self::query::{ArchiveQuery, SortOrder};
use self::store::LedgerStore;

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Per-status totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerCounts {
    pub read: usize,
    pub hearted: usize,
    pub archived: usize,
}

impl LedgerCounts {
    pub fn total(&self) -> usize {
        self.read + self.hearted + self.archived
    }
}

/// In-memory ledger backed by a [`LedgerStore`].
pub struct ActionLedger {
    entries: BTreeMap<String, LetterState>,
    store: Box<dyn LedgerStore>,
    clock: Clock,
    writes: usize,
}

impl ActionLedger {
    /// Restore the ledger from `store`. Never fails.
    pub fn load(store: impl LedgerStore + 'static) -> Self {
        let entries = store.read().map(|raw| decode(&raw)).unwrap_or_default();
        debug!(entries = entries.len(), "Ledger restored");
        Self {
            entries,
            store: Box::new(store),
            clock: Box::new(Utc::now),
            writes: 0,
        }
    }

    /// Replace the wall clock, mostly for tests.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Record the first open of `id`. Returns `true` if an entry was created.
    pub fn mark_read(&mut self, id: &str) -> bool {
        if self.entries.contains_key(id) {
            return false;
        }
        let now = (self.clock)();
        self.entries.insert(
            id.to_string(),
            LetterState {
                status: Status::Read,
                seen_at: Some(now),
                updated_at: now,
            },
        );
        self.persist();
        true
    }

    /// Set the status of `id`. Returns `true` if anything changed.
    ///
    /// `seen_at` is carried over from an existing entry; a letter that was
    /// never opened, or whose entry lacks it, gets `seen_at = now`.
    pub fn set_status(&mut self, id: &str, status: Status) -> bool {
        let existing = self.entries.get(id).copied();
        if existing.is_some_and(|e| e.status == status) {
            return false;
        }
        let now = (self.clock)();
        self.entries.insert(
            id.to_string(),
            LetterState {
                status,
                seen_at: Some(existing.and_then(|e| e.seen_at).unwrap_or(now)),
                updated_at: now,
            },
        );
        self.persist();
        true
    }

    pub fn get(&self, id: &str) -> Option<&LetterState> {
        self.entries.get(id)
    }

    pub fn status(&self, id: &str) -> Option<Status> {
        self.entries.get(id).map(|e| e.status)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of persistence attempts since load.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn store(&self) -> &dyn LedgerStore {
        self.store.as_ref()
    }

    pub fn counts(&self) -> LedgerCounts {
        let mut counts = LedgerCounts::default();
        for state in self.entries.values() {
            match state.status {
                Status::Read => counts.read += 1,
                Status::Hearted => counts.hearted += 1,
                Status::Archived => counts.archived += 1,
            }
        }
        counts
    }

    /// Indices of letters that have no entry.
    pub fn unseen(&self, letters: &[Letter]) -> Vec<usize> {
        letters
            .iter()
            .enumerate()
            .filter(|(_, l)| !self.entries.contains_key(&l.id))
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of letters that have an entry and match `query`, ordered
    /// by `updated_at` in the query's direction.
    pub fn seen(&self, letters: &[Letter], query: &ArchiveQuery) -> Vec<usize> {
        let mut found: Vec<(usize, &LetterState)> = letters
            .iter()
            .enumerate()
            .filter_map(|(i, l)| self.entries.get(&l.id).map(|s| (i, l, s)))
            .filter(|(_, l, s)| query.matches(l, s))
            .map(|(i, _, s)| (i, s))
            .collect();

        found.sort_by(|(ia, a), (ib, b)| {
            let cmp = a
                .updated_at
                .cmp(&b.updated_at)
                .then_with(|| letters[*ia].number.cmp(&letters[*ib].number));
            match query.sort {
                SortOrder::Oldest => cmp,
                SortOrder::Newest => cmp.reverse(),
            }
        });

        found.into_iter().map(|(i, _)| i).collect()
    }

    /// Serialize the whole mapping as a JSON object.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "{}".to_string())
    }

    fn persist(&mut self) {
        self.writes += 1;
        let doc = self.to_json();
        if let Err(e) = self.store.write(&doc) {
            warn!(error = %e, "Could not persist ledger; keeping changes in memory only");
        }
    }
}

/// Decode a stored document, dropping anything that does not fit.
fn decode(raw: &str) -> BTreeMap<String, LetterState> {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) else {
        debug!("Stored ledger is not a JSON object; starting empty");
        return BTreeMap::new();
    };

    map.into_iter()
        .filter_map(|(id, value)| match serde_json::from_value::<LetterState>(value) {
            Ok(state) => Some((id, state)),
            Err(e) => {
                debug!(id = %id, error = %e, "Dropping unreadable ledger entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::TimeZone;

    use super::query::ArchiveFilter;
    use super::store::MemoryStore;

    /// A clock that advances one second per reading.
    fn ticking_clock() -> (Rc<Cell<i64>>, impl Fn() -> DateTime<Utc>) {
        let t = Rc::new(Cell::new(1_000));
        let handle = t.clone();
        let clock = move || {
            let now = handle.get();
            handle.set(now + 1);
            Utc.timestamp_opt(now, 0).unwrap()
        };
        (t, clock)
    }

    fn letter(id: &str, number: u32, tag: &str) -> Letter {
        Letter {
            id: id.into(),
            number,
            tag: tag.into(),
            text: format!("letter {number}"),
            audio: None,
        }
    }

    #[test]
    fn test_load_garbage_yields_empty() {
        for raw in ["not json", "[1,2,3]", "42", "null", "\"text\""] {
            let ledger = ActionLedger::load(MemoryStore::with_contents(raw));
            assert!(ledger.is_empty(), "input {raw:?} should load empty");
        }
    }

    #[test]
    fn test_load_skips_bad_entries_keeps_good() {
        let raw = r#"{"a":{"status":"hearted","seenAt":1,"updatedAt":2},"b":{"status":"lost"},"c":7}"#;
        let ledger = ActionLedger::load(MemoryStore::with_contents(raw));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.status("a"), Some(Status::Hearted));
    }

    #[test]
    fn test_entry_without_seen_at_is_kept() {
        let (_, clock) = ticking_clock();
        let raw = r#"{"a":{"status":"hearted","updatedAt":1700000000000}}"#;
        let mut ledger = ActionLedger::load(MemoryStore::with_contents(raw)).with_clock(clock);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.status("a"), Some(Status::Hearted));
        assert!(ledger.unseen(&[letter("a", 1, "x")]).is_empty());
        assert!(!ledger.mark_read("a"));

        assert!(ledger.set_status("a", Status::Archived));
        let state = ledger.get("a").unwrap();
        assert_eq!(state.seen_at, Some(state.updated_at));
        assert_eq!(state.seen_at, Some(Utc.timestamp_opt(1_000, 0).unwrap()));
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let (_, clock) = ticking_clock();
        let mut ledger = ActionLedger::load(MemoryStore::new()).with_clock(clock);
        assert!(ledger.mark_read("a"));
        let first = *ledger.get("a").unwrap();
        assert!(!ledger.mark_read("a"));
        assert_eq!(ledger.writes(), 1);
        assert_eq!(*ledger.get("a").unwrap(), first);
    }

    #[test]
    fn test_same_status_is_a_noop() {
        let (_, clock) = ticking_clock();
        let mut ledger = ActionLedger::load(MemoryStore::new()).with_clock(clock);
        ledger.mark_read("a");
        ledger.set_status("a", Status::Hearted);
        let before = *ledger.get("a").unwrap();
        let writes = ledger.writes();
        assert!(!ledger.set_status("a", Status::Hearted));
        assert_eq!(ledger.writes(), writes);
        assert_eq!(ledger.get("a").unwrap().updated_at, before.updated_at);
    }

    #[test]
    fn test_seen_at_survives_status_changes() {
        let (_, clock) = ticking_clock();
        let mut ledger = ActionLedger::load(MemoryStore::new()).with_clock(clock);
        ledger.mark_read("a");
        let seen_at = ledger.get("a").unwrap().seen_at;
        for status in [Status::Hearted, Status::Archived, Status::Read, Status::Hearted] {
            ledger.set_status("a", status);
            assert_eq!(ledger.get("a").unwrap().seen_at, seen_at);
        }
        let state = ledger.get("a").unwrap();
        assert!(Some(state.updated_at) > seen_at);
        assert_eq!(state.status, Status::Hearted);
    }

    #[test]
    fn test_set_status_without_prior_entry_sets_seen_at() {
        let (_, clock) = ticking_clock();
        let mut ledger = ActionLedger::load(MemoryStore::new()).with_clock(clock);
        assert!(ledger.set_status("z", Status::Archived));
        let state = ledger.get("z").unwrap();
        assert_eq!(state.seen_at, Some(state.updated_at));
    }

    #[test]
    fn test_failed_write_keeps_memory_state() {
        let mut ledger = ActionLedger::load(MemoryStore::new().failing());
        assert!(ledger.mark_read("a"));
        assert_eq!(ledger.status("a"), Some(Status::Read));
        assert_eq!(ledger.writes(), 1);
        assert!(ledger.store().read().is_none());
    }

    #[test]
    fn test_every_mutation_rewrites_store() {
        let mut ledger = ActionLedger::load(MemoryStore::new());
        ledger.mark_read("a");
        ledger.mark_read("b");
        let stored = ledger.store().read().unwrap();
        let restored = ActionLedger::load(MemoryStore::with_contents(stored));
        assert_eq!(restored.len(), 2);
    }

    #[test]
    fn test_unseen_and_seen_partition_letters() {
        let letters = vec![letter("a", 1, "x"), letter("b", 2, "y"), letter("c", 3, "x")];
        let mut ledger = ActionLedger::load(MemoryStore::new());
        assert_eq!(ledger.unseen(&letters), vec![0, 1, 2]);
        assert!(ledger.seen(&letters, &ArchiveQuery::default()).is_empty());

        ledger.mark_read("b");
        assert_eq!(ledger.unseen(&letters), vec![0, 2]);
        assert_eq!(ledger.seen(&letters, &ArchiveQuery::default()), vec![1]);
    }

    #[test]
    fn test_seen_sorted_by_updated_at() {
        let (_, clock) = ticking_clock();
        let letters = vec![letter("a", 1, "x"), letter("b", 2, "y"), letter("c", 3, "x")];
        let mut ledger = ActionLedger::load(MemoryStore::new()).with_clock(clock);
        ledger.mark_read("c");
        ledger.mark_read("a");
        ledger.mark_read("b");
        ledger.set_status("c", Status::Hearted);

        let mut q = ArchiveQuery::default();
        assert_eq!(ledger.seen(&letters, &q), vec![2, 1, 0]);
        q.sort = SortOrder::Oldest;
        assert_eq!(ledger.seen(&letters, &q), vec![0, 1, 2]);
    }

    #[test]
    fn test_favorites_and_tag_filters() {
        let letters = vec![letter("a", 1, "x"), letter("b", 2, "y"), letter("c", 3, "x")];
        let mut ledger = ActionLedger::load(MemoryStore::new());
        for id in ["a", "b", "c"] {
            ledger.mark_read(id);
        }
        ledger.set_status("b", Status::Hearted);

        let favorites = ArchiveQuery {
            filter: ArchiveFilter::Favorites,
            search: "no such text".into(),
            ..Default::default()
        };
        assert_eq!(ledger.seen(&letters, &favorites), vec![1]);

        let tagged = ArchiveQuery {
            filter: ArchiveFilter::Tag("x".into()),
            sort: SortOrder::Oldest,
            ..Default::default()
        };
        let mut got = ledger.seen(&letters, &tagged);
        got.sort();
        assert_eq!(got, vec![0, 2]);
    }

    #[test]
    fn test_counts() {
        let mut ledger = ActionLedger::load(MemoryStore::new());
        ledger.mark_read("a");
        ledger.mark_read("b");
        ledger.set_status("b", Status::Archived);
        ledger.set_status("c", Status::Hearted);
        let counts = ledger.counts();
        assert_eq!(counts, LedgerCounts { read: 1, hearted: 1, archived: 1 });
        assert_eq!(counts.total(), 3);
    }
}
