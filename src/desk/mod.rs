//! The view controller.
//!
//! [`Desk`] owns every piece of state the screens read: the letters, the
//! ledger, the audio slot, navigation and the archive query. Each user
//! intent is one method; the unseen and archive sets are recomputed after
//! every method that can change them, so readers never see stale sets.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::audio::AudioController;
use crate::error::Result;
use crate::ledger::query::{ArchiveFilter, ArchiveQuery};
use crate::ledger::{ActionLedger, LedgerCounts};
use crate::model::letter::Letter;
use crate::model::state::Status;

/// Progress of the startup fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Failed(String),
    Ready,
}

/// Which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    LoadFailed,
    /// The cover card over the pile of unseen letters.
    Desk,
    Letter,
    Archive,
}

/// Generation number handed out by [`Desk::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

pub struct Desk {
    letters: Vec<Letter>,
    ledger: ActionLedger,
    audio: AudioController,
    current: Option<String>,
    archive_visible: bool,
    load: LoadState,
    query: ArchiveQuery,
    reveal_delay: Duration,
    reveal_until: Option<Instant>,
    card_token: u64,
    load_generation: u64,
    torn_down: bool,
    unseen: Vec<usize>,
    archive: Vec<usize>,
}

impl Desk {
    /// `reveal_delay` is how long the open animation runs.
    pub fn new(ledger: ActionLedger, audio: AudioController, reveal_delay: Duration) -> Self {
        Self {
            letters: Vec::new(),
            ledger,
            audio,
            current: None,
            archive_visible: false,
            load: LoadState::Loading,
            query: ArchiveQuery::default(),
            reveal_delay,
            reveal_until: None,
            card_token: 0,
            load_generation: 0,
            torn_down: false,
            unseen: Vec::new(),
            archive: Vec::new(),
        }
    }

    // ── Loading ────────────────────────────────────────────────────

    /// Start a fetch. Only the result carrying the returned ticket is
    /// accepted later.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        self.load = LoadState::Loading;
        LoadTicket(self.load_generation)
    }

    /// Apply a fetch result. Returns `false` when it was stale or the desk
    /// has been torn down; the state is left untouched in that case.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<Letter>>) -> bool {
        if self.torn_down || ticket.0 != self.load_generation {
            debug!(ticket = ticket.0, current = self.load_generation, "Ignoring late load result");
            return false;
        }
        match result {
            Ok(letters) => {
                info!(count = letters.len(), "Letters ready");
                self.letters = letters;
                self.load = LoadState::Ready;
            }
            Err(e) => {
                warn!(error = %e, "Letters could not be loaded");
                self.letters.clear();
                self.load = LoadState::Failed(e.to_string());
            }
        }
        self.current = None;
        self.refresh();
        true
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_ready(&self) -> bool {
        self.load == LoadState::Ready
    }

    // ── Navigation ─────────────────────────────────────────────────

    /// Open a uniformly random unseen letter. No-op when none is left.
    pub fn open_random_unseen<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        now: Instant,
    ) -> Option<String> {
        let &index = self.unseen.choose(rng)?;
        let id = self.letters[index].id.clone();
        self.show_letter(&id, now);
        Some(id)
    }

    /// Open a specific letter, typically from the archive.
    pub fn open(&mut self, id: &str, now: Instant) -> bool {
        if self.letter(id).is_none() {
            return false;
        }
        self.show_letter(id, now);
        true
    }

    fn show_letter(&mut self, id: &str, now: Instant) {
        if self.current.as_deref() != Some(id) {
            self.audio.stop();
        }
        self.ledger.mark_read(id);
        self.current = Some(id.to_string());
        self.archive_visible = false;
        self.reveal_until = Some(now + self.reveal_delay);
        self.card_token += 1;
        debug!(letter = %id, "Letter opened");
        self.refresh();
    }

    /// Back to the desk.
    pub fn close_letter(&mut self) {
        self.audio.stop();
        self.current = None;
        self.reveal_until = None;
    }

    pub fn show_archive(&mut self) {
        self.audio.stop();
        self.current = None;
        self.reveal_until = None;
        self.archive_visible = true;
    }

    pub fn hide_archive(&mut self) {
        self.archive_visible = false;
    }

    pub fn screen(&self) -> Screen {
        match self.load {
            LoadState::Loading => Screen::Loading,
            LoadState::Failed(_) => Screen::LoadFailed,
            LoadState::Ready if self.archive_visible => Screen::Archive,
            LoadState::Ready if self.current.is_some() => Screen::Letter,
            LoadState::Ready => Screen::Desk,
        }
    }

    // ── Letter actions ─────────────────────────────────────────────

    /// Set the status of the open letter.
    pub fn set_status(&mut self, status: Status) -> bool {
        let Some(id) = self.current.clone() else {
            return false;
        };
        let changed = self.ledger.set_status(&id, status);
        if changed {
            self.refresh();
        }
        changed
    }

    /// Play or stop the open letter's clip.
    pub fn toggle_audio(&mut self) {
        let Some(index) = self.current_index() else {
            return;
        };
        self.audio.toggle(&self.letters[index]);
    }

    /// Whether the open letter's clip is playing.
    pub fn is_playing(&self) -> bool {
        self.current.is_some() && self.audio.active_id() == self.current.as_deref()
    }

    // ── Archive query ──────────────────────────────────────────────

    pub fn query(&self) -> &ArchiveQuery {
        &self.query
    }

    pub fn set_search(&mut self, text: &str) {
        self.query.search = text.to_string();
        self.refresh();
    }

    pub fn set_filter(&mut self, filter: ArchiveFilter) {
        self.query.filter = filter;
        self.refresh();
    }

    pub fn toggle_sort(&mut self) {
        self.query.sort = self.query.sort.toggled();
        self.refresh();
    }

    /// Distinct non-empty tags among all letters, sorted.
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .letters
            .iter()
            .map(|l| l.tag.clone())
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort_by_key(|t| t.to_lowercase());
        tags.dedup();
        tags
    }

    // ── Timers and teardown ────────────────────────────────────────

    /// Expire the open animation and notice clips that ended.
    pub fn tick(&mut self, now: Instant) {
        if self.reveal_until.is_some_and(|until| now >= until) {
            self.reveal_until = None;
        }
        self.audio.poll();
    }

    /// Whether the open animation is still running.
    pub fn is_revealing(&self) -> bool {
        self.reveal_until.is_some()
    }

    /// Fraction of the open animation that has elapsed, 1.0 when idle.
    pub fn reveal_progress(&self, now: Instant) -> f32 {
        match self.reveal_until {
            None => 1.0,
            Some(_) if self.reveal_delay.is_zero() => 1.0,
            Some(until) => {
                let left = until.saturating_duration_since(now).as_secs_f32();
                (1.0 - left / self.reveal_delay.as_secs_f32()).clamp(0.0, 1.0)
            }
        }
    }

    /// Stop audio, drop timers and refuse any pending load result.
    pub fn teardown(&mut self) {
        self.audio.stop();
        self.reveal_until = None;
        self.load_generation += 1;
        self.torn_down = true;
    }

    // ── Reads ──────────────────────────────────────────────────────

    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    pub fn letter(&self, id: &str) -> Option<&Letter> {
        self.letters.iter().find(|l| l.id == id)
    }

    pub fn current_letter(&self) -> Option<&Letter> {
        self.current_index().map(|i| &self.letters[i])
    }

    fn current_index(&self) -> Option<usize> {
        let id = self.current.as_deref()?;
        self.letters.iter().position(|l| l.id == id)
    }

    pub fn current_status(&self) -> Option<Status> {
        self.current.as_deref().and_then(|id| self.ledger.status(id))
    }

    pub fn unseen_letters(&self) -> impl Iterator<Item = &Letter> {
        self.unseen.iter().map(|&i| &self.letters[i])
    }

    pub fn unseen_count(&self) -> usize {
        self.unseen.len()
    }

    /// Archive letters matching the current query, in query order.
    pub fn archive_letters(&self) -> Vec<&Letter> {
        self.archive.iter().map(|&i| &self.letters[i]).collect()
    }

    pub fn archive_len(&self) -> usize {
        self.archive.len()
    }

    pub fn ledger(&self) -> &ActionLedger {
        &self.ledger
    }

    pub fn counts(&self) -> LedgerCounts {
        self.ledger.counts()
    }

    /// Changes whenever a letter is opened, so the cover card can reset.
    pub fn card_token(&self) -> u64 {
        self.card_token
    }

    fn refresh(&mut self) {
        self.unseen = self.ledger.unseen(&self.letters);
        self.archive = self.ledger.seen(&self.letters, &self.query);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::FakePlayer;
    use crate::error::LetterError;
    use crate::ledger::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn letter(n: u32, tag: &str, audio: Option<&str>) -> Letter {
        Letter {
            id: format!("l{n}"),
            number: n,
            tag: tag.to_string(),
            text: format!("letter number {n}"),
            audio: audio.map(str::to_string),
        }
    }

    fn desk_with(letters: Vec<Letter>) -> (Desk, FakePlayer) {
        let player = FakePlayer::default();
        let mut desk = Desk::new(
            ActionLedger::load(MemoryStore::new()),
            AudioController::new(player.clone()),
            Duration::from_millis(700),
        );
        let ticket = desk.begin_load();
        assert!(desk.finish_load(ticket, Ok(letters)));
        (desk, player)
    }

    #[test]
    fn test_open_random_with_nothing_unseen_is_noop() {
        let (mut desk, _) = desk_with(Vec::new());
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(desk.open_random_unseen(&mut rng, Instant::now()), None);
        assert_eq!(desk.screen(), Screen::Desk);
        assert_eq!(desk.ledger().writes(), 0);
        assert_eq!(desk.card_token(), 0);
    }

    #[test]
    fn test_open_random_moves_letter_to_archive() {
        let (mut desk, _) = desk_with(vec![letter(1, "a", None), letter(2, "b", None)]);
        desk.show_archive();
        let mut rng = StdRng::seed_from_u64(3);
        let id = desk.open_random_unseen(&mut rng, Instant::now()).unwrap();
        assert_eq!(desk.screen(), Screen::Letter);
        assert_eq!(desk.unseen_count(), 1);
        assert!(desk.unseen_letters().all(|l| l.id != id));
        assert_eq!(desk.archive_letters()[0].id, id);
        assert!(desk.is_revealing());
        assert_eq!(desk.current_status(), Some(Status::Read));
    }

    #[test]
    fn test_every_letter_is_eventually_drawn() {
        let (mut desk, _) = desk_with((1..=5).map(|n| letter(n, "", None)).collect());
        let mut rng = StdRng::seed_from_u64(42);
        let now = Instant::now();
        let mut drawn: Vec<String> = (0..5)
            .filter_map(|_| desk.open_random_unseen(&mut rng, now))
            .collect();
        drawn.sort();
        assert_eq!(drawn, vec!["l1", "l2", "l3", "l4", "l5"]);
        assert_eq!(desk.open_random_unseen(&mut rng, now), None);
    }

    #[test]
    fn test_animation_expires_on_tick() {
        let (mut desk, _) = desk_with(vec![letter(1, "", None)]);
        let start = Instant::now();
        desk.open("l1", start);
        assert!(desk.reveal_progress(start) < 0.01);
        desk.tick(start + Duration::from_millis(300));
        assert!(desk.is_revealing());
        desk.tick(start + Duration::from_millis(700));
        assert!(!desk.is_revealing());
        assert_eq!(desk.reveal_progress(start), 1.0);
        assert_eq!(desk.screen(), Screen::Letter);
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let player = FakePlayer::default();
        let mut desk = Desk::new(
            ActionLedger::load(MemoryStore::new()),
            AudioController::new(player),
            Duration::ZERO,
        );
        let first = desk.begin_load();
        let second = desk.begin_load();
        assert!(!desk.finish_load(first, Ok(vec![letter(1, "", None)])));
        assert_eq!(desk.screen(), Screen::Loading);
        assert!(desk.finish_load(second, Err(LetterError::Shape("nope".into()))));
        assert_eq!(desk.screen(), Screen::LoadFailed);
    }

    #[test]
    fn test_result_after_teardown_is_ignored() {
        let player = FakePlayer::default();
        let mut desk = Desk::new(
            ActionLedger::load(MemoryStore::new()),
            AudioController::new(player),
            Duration::ZERO,
        );
        let ticket = desk.begin_load();
        desk.teardown();
        assert!(!desk.finish_load(ticket, Ok(vec![letter(1, "", None)])));
        assert!(desk.letters().is_empty());
        assert_eq!(desk.screen(), Screen::Loading);
    }

    #[test]
    fn test_leaving_letter_stops_audio() {
        let (mut desk, player) = desk_with(vec![
            letter(1, "", Some("one.mp3")),
            letter(2, "", Some("two.mp3")),
        ]);
        let now = Instant::now();
        desk.open("l1", now);
        desk.toggle_audio();
        assert!(desk.is_playing());
        desk.open("l2", now);
        assert!(!desk.is_playing());
        desk.toggle_audio();
        desk.show_archive();
        assert!(!desk.is_playing());
        assert_eq!(player.journal.borrow().stopped, vec!["one.mp3", "two.mp3"]);
    }

    #[test]
    fn test_status_changes_and_favorites_filter() {
        let (mut desk, _) = desk_with(vec![
            letter(1, "love", None),
            letter(2, "love", None),
            letter(3, "daily", None),
        ]);
        let now = Instant::now();
        desk.open("l1", now);
        assert!(desk.set_status(Status::Hearted));
        assert!(!desk.set_status(Status::Hearted));
        desk.open("l3", now);
        desk.set_status(Status::Archived);

        desk.set_search("no such words");
        desk.set_filter(ArchiveFilter::Favorites);
        let favorites: Vec<&str> = desk.archive_letters().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(favorites, vec!["l1"]);

        desk.set_search("");
        desk.set_filter(ArchiveFilter::Tag("daily".into()));
        assert_eq!(desk.archive_len(), 1);
        assert_eq!(desk.counts().archived, 1);
    }

    #[test]
    fn test_screen_switch() {
        let (mut desk, _) = desk_with(vec![letter(1, "", None)]);
        assert_eq!(desk.screen(), Screen::Desk);
        desk.open("l1", Instant::now());
        assert_eq!(desk.screen(), Screen::Letter);
        desk.show_archive();
        assert_eq!(desk.screen(), Screen::Archive);
        desk.hide_archive();
        assert_eq!(desk.screen(), Screen::Desk);
        assert!(!desk.open("missing", Instant::now()));
    }

    #[test]
    fn test_all_tags_sorted_and_distinct() {
        let (desk, _) = desk_with(vec![
            letter(1, "Travel", None),
            letter(2, "", None),
            letter(3, "daily", None),
            letter(4, "Travel", None),
        ]);
        assert_eq!(desk.all_tags(), vec!["daily", "Travel"]);
    }
}
