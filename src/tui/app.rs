//! Global application state for the TUI (the "Model" in Elm architecture).

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::layout::Rect;

use crate::desk::{Desk, LoadTicket, Screen};
use crate::error::{LetterError, Result};
use crate::i18n;
use crate::ledger::query::{ArchiveFilter, SortOrder};
use crate::model::letter::Letter;
use crate::model::state::Status;
use crate::reveal::config::RevealConfig;
use crate::reveal::surface::Point;
use crate::reveal::{RevealEngine, Viewport};
use crate::source::{self, LetterSource};

/// Which archive panel has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    List,
    Sidebar,
}

/// Complete TUI state.
pub struct App {
    // ── Core ──────────────────────────────────
    pub desk: Desk,
    pub engine: RevealEngine,
    /// Colors and texts of the cover card.
    pub reveal: RevealConfig,
    /// Surface pixels per terminal cell (width, height).
    pub cell_px: (u32, u32),
    /// Human-readable letter source for the header.
    pub source_label: String,
    rng: StdRng,
    loader: Option<(LoadTicket, Receiver<Result<Vec<Letter>>>)>,

    // ── Archive navigation ────────────────────
    /// Index within the archive list of the selected letter.
    pub selected: usize,
    /// Scroll offset for the archive table.
    pub list_scroll_offset: usize,
    /// Cached viewport height for the archive table (set during render).
    pub list_viewport_height: usize,
    pub focus: PanelFocus,
    /// Index into [`App::filter_options`] highlighted in the sidebar.
    pub sidebar_selected: usize,

    // ── Letter view ───────────────────────────
    pub letter_scroll: u16,

    // ── Search ────────────────────────────────
    /// Is the search bar active (accepting input)?
    pub search_active: bool,
    /// Current search query text.
    pub search_query: String,

    // ── Lifecycle ─────────────────────────────
    pub show_help: bool,
    pub should_quit: bool,
    /// Transient status message and the instant it was set.
    pub status_message: Option<(String, Instant)>,
    /// Where the cover card was last drawn (set during render).
    card_area: Option<Rect>,
}

impl App {
    pub fn new(
        desk: Desk,
        reveal: RevealConfig,
        cell_px: (u32, u32),
        source_label: String,
    ) -> Self {
        let mut engine = RevealEngine::new(&reveal);
        engine.on_reveal(|| tracing::debug!("Cover card revealed"));
        Self {
            desk,
            engine,
            reveal,
            cell_px: (cell_px.0.max(1), cell_px.1.max(1)),
            source_label,
            rng: StdRng::from_entropy(),
            loader: None,
            selected: 0,
            list_scroll_offset: 0,
            list_viewport_height: 20,
            focus: PanelFocus::List,
            sidebar_selected: 0,
            letter_scroll: 0,
            search_active: false,
            search_query: String::new(),
            show_help: false,
            should_quit: false,
            status_message: None,
            card_area: None,
        }
    }

    /// Fetch letters on a worker thread. The result is picked up by
    /// [`tick`](Self::tick).
    pub fn start_loading(&mut self, source: LetterSource, timeout: Duration) {
        let ticket = self.desk.begin_load();
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            // The receiver is gone if the app quit first.
            let _ = tx.send(source::load_letters(&source, timeout));
        });
        self.loader = Some((ticket, rx));
    }

    /// Apply letters that were loaded in-process.
    pub fn load_now(&mut self, result: Result<Vec<Letter>>) {
        let ticket = self.desk.begin_load();
        self.desk.finish_load(ticket, result);
    }

    fn poll_loader(&mut self) {
        let Some((ticket, rx)) = &self.loader else {
            return;
        };
        let ticket = *ticket;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(LetterError::Transport(
                "the loader stopped before answering".to_string(),
            )),
        };
        self.loader = None;
        self.desk.finish_load(ticket, result);
    }

    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some((msg.to_string(), Instant::now()));
    }

    /// Periodic housekeeping: expire messages, pick up the fetch result,
    /// advance timers.
    pub fn tick(&mut self) {
        if let Some((_, when)) = &self.status_message {
            if when.elapsed().as_secs() >= 5 {
                self.status_message = None;
            }
        }
        self.poll_loader();
        self.desk.tick(Instant::now());
    }

    // ── Desk and cover card ──────────────────────────────────────

    pub fn open_random(&mut self) {
        match self.desk.open_random_unseen(&mut self.rng, Instant::now()) {
            Some(_) => self.letter_scroll = 0,
            None => self.set_status(i18n::tui_status_nothing_unseen()),
        }
    }

    /// Record where the card is drawn and rebuild it when the letter pile
    /// or the card size changed.
    pub fn place_card(&mut self, area: Rect) {
        let (cw, ch) = self.cell_px;
        let (w, h) = (
            (area.width as u32).saturating_mul(cw),
            (area.height as u32).saturating_mul(ch),
        );
        let resized = self
            .card_area
            .is_some_and(|old| (old.width, old.height) != (area.width, area.height));
        if !self.engine.reset(self.desk.card_token(), w, h) && resized {
            self.engine.mount(w, h);
        }
        if self.card_area != Some(area) {
            self.engine.set_viewport(Viewport::new(
                area.x as f32,
                area.y as f32,
                area.width as f32,
                area.height as f32,
            ));
        }
        self.card_area = Some(area);
    }

    pub fn card_area(&self) -> Option<Rect> {
        self.card_area
    }

    /// Cell centers, so a click lands inside the cell it names.
    fn cell_point(column: u16, row: u16) -> Point {
        Point::new(column as f32 + 0.5, row as f32 + 0.5)
    }

    fn card_ready(&self) -> bool {
        self.desk.screen() == Screen::Desk
            && self.card_area.is_some()
            && self.desk.unseen_count() > 0
    }

    pub fn pointer_down(&mut self, column: u16, row: u16) {
        if self.card_ready() && self.engine.pointer_down(Self::cell_point(column, row)) {
            self.open_random();
        }
    }

    pub fn pointer_move(&mut self, column: u16, row: u16) {
        if self.card_ready() && self.engine.pointer_move(Self::cell_point(column, row)) {
            self.open_random();
        }
    }

    pub fn pointer_up(&mut self) {
        if self.card_ready() && self.engine.pointer_up() {
            self.open_random();
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.card_ready() && self.engine.pointer_leave() {
            self.open_random();
        }
    }

    // ── Letter actions ───────────────────────────────────────────

    pub fn set_letter_status(&mut self, status: Status) {
        let msg = if !self.desk.set_status(status) {
            i18n::tui_status_unchanged()
        } else if status == Status::Hearted {
            i18n::tui_status_hearted()
        } else {
            i18n::tui_status_archived()
        };
        self.set_status(msg);
    }

    pub fn toggle_audio(&mut self) {
        match self.desk.current_letter() {
            Some(letter) if letter.has_audio() => self.desk.toggle_audio(),
            Some(_) => self.set_status(i18n::tui_status_no_audio()),
            None => {}
        }
    }

    pub fn close_letter(&mut self) {
        self.desk.close_letter();
        self.letter_scroll = 0;
    }

    // ── Archive ──────────────────────────────────────────────────

    pub fn show_archive(&mut self) {
        self.desk.show_archive();
        self.selected = 0;
        self.list_scroll_offset = 0;
    }

    pub fn hide_archive(&mut self) {
        self.desk.hide_archive();
        self.search_active = false;
        self.focus = PanelFocus::List;
    }

    /// Sidebar entries: everything, favorites, then each tag.
    pub fn filter_options(&self) -> Vec<ArchiveFilter> {
        let mut options = vec![ArchiveFilter::All, ArchiveFilter::Favorites];
        options.extend(self.desk.all_tags().into_iter().map(ArchiveFilter::Tag));
        options
    }

    pub fn filter_label(filter: &ArchiveFilter) -> String {
        match filter {
            ArchiveFilter::All => i18n::tui_filter_all().to_string(),
            ArchiveFilter::Favorites => i18n::tui_filter_favorites().to_string(),
            ArchiveFilter::Tag(tag) => tag.clone(),
        }
    }

    /// Apply the filter highlighted in the sidebar.
    pub fn apply_sidebar_filter(&mut self) {
        let options = self.filter_options();
        let Some(filter) = options.get(self.sidebar_selected).cloned() else {
            return;
        };
        self.apply_filter(filter);
    }

    /// Move to the next filter and apply it.
    pub fn cycle_filter(&mut self) {
        let options = self.filter_options();
        let position = options
            .iter()
            .position(|f| f == &self.desk.query().filter)
            .unwrap_or(0);
        self.sidebar_selected = (position + 1) % options.len();
        self.apply_filter(options[self.sidebar_selected].clone());
    }

    fn apply_filter(&mut self, filter: ArchiveFilter) {
        let label = Self::filter_label(&filter);
        self.desk.set_filter(filter);
        self.selected = 0;
        self.list_scroll_offset = 0;
        self.set_status(&format!("{}: {label}", i18n::tui_status_filter()));
    }

    pub fn toggle_sort(&mut self) {
        self.desk.toggle_sort();
        self.selected = 0;
        self.list_scroll_offset = 0;
        let order = match self.desk.query().sort {
            SortOrder::Newest => i18n::tui_sort_newest(),
            SortOrder::Oldest => i18n::tui_sort_oldest(),
        };
        self.set_status(&format!("{}: {order}", i18n::tui_status_sort()));
    }

    /// Re-run the archive query with the typed search text.
    pub fn execute_search(&mut self) {
        self.desk.set_search(&self.search_query);
        self.selected = 0;
        self.list_scroll_offset = 0;
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.desk.archive_len() {
            self.selected += 1;
            self.ensure_selected_visible();
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.ensure_selected_visible();
        }
    }

    /// Adjust the scroll offset so the selected row is on screen.
    pub fn ensure_selected_visible(&mut self) {
        if self.selected < self.list_scroll_offset {
            self.list_scroll_offset = self.selected;
        } else if self.selected >= self.list_scroll_offset + self.list_viewport_height {
            self.list_scroll_offset = self.selected + 1 - self.list_viewport_height.max(1);
        }
    }

    pub fn open_selected(&mut self) {
        let Some(id) = self
            .desk
            .archive_letters()
            .get(self.selected)
            .map(|l| l.id.clone())
        else {
            return;
        };
        self.desk.open(&id, Instant::now());
        self.letter_scroll = 0;
    }

    /// Stop audio and timers before the terminal is restored.
    pub fn teardown(&mut self) {
        self.engine.teardown();
        self.desk.teardown();
        self.loader = None;
    }
}
