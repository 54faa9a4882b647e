//! Color themes for the TUI.
//!
//! Each theme also fixes how long the letter takes to unfold after it is
//! opened.

use std::sync::OnceLock;
use std::time::Duration;

use ratatui::style::{Color, Modifier, Style};

use crate::reveal::surface::Rgb;

static CURRENT_THEME: OnceLock<ThemeName> = OnceLock::new();

/// Available themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Paper,
    Night,
    Rose,
}

impl ThemeName {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "paper" => Some(Self::Paper),
            "night" => Some(Self::Night),
            "rose" => Some(Self::Rose),
            _ => None,
        }
    }

    /// Length of the open animation.
    pub fn reveal_delay(self) -> Duration {
        match self {
            Self::Paper => Duration::from_millis(700),
            Self::Night => Duration::from_millis(900),
            Self::Rose => Duration::from_millis(600),
        }
    }
}

/// A complete color theme for the TUI.
pub struct Theme {
    pub header_bar: Style,
    pub status_bar: Style,
    pub desk: Style,
    pub list_selected: Style,
    pub list_header: Style,
    pub list_normal: Style,
    pub sidebar: Style,
    pub sidebar_selected: Style,
    pub letter_label: Style,
    pub letter_body: Style,
    pub hearted: Style,
    pub border: Style,
    pub border_focused: Style,
    pub popup: Style,
    pub popup_title: Style,
    pub help_section: Style,
    pub help_dim: Style,
    pub search_prompt: Style,
    pub error: Style,
}

impl Theme {
    /// Warm light theme (default).
    pub fn paper() -> Self {
        let ink = Color::Rgb(70, 56, 44);
        let sheet = Color::Rgb(246, 239, 226);
        let band = Color::Rgb(226, 214, 192);
        Self {
            header_bar: Style::default().fg(ink).bg(band),
            status_bar: Style::default().fg(Color::Rgb(110, 94, 78)).bg(band),
            desk: Style::default().fg(ink).bg(sheet),
            list_selected: Style::default().fg(sheet).bg(Color::Rgb(150, 110, 80)),
            list_header: Style::default()
                .fg(ink)
                .bg(band)
                .add_modifier(Modifier::BOLD),
            list_normal: Style::default().fg(ink),
            sidebar: Style::default().fg(Color::Rgb(110, 94, 78)),
            sidebar_selected: Style::default()
                .fg(Color::Rgb(150, 80, 50))
                .add_modifier(Modifier::BOLD),
            letter_label: Style::default()
                .fg(Color::Rgb(150, 80, 50))
                .add_modifier(Modifier::BOLD),
            letter_body: Style::default().fg(ink).bg(sheet),
            hearted: Style::default().fg(Color::Rgb(190, 60, 70)),
            border: Style::default().fg(Color::Rgb(190, 175, 150)),
            border_focused: Style::default()
                .fg(Color::Rgb(150, 110, 80))
                .add_modifier(Modifier::BOLD),
            popup: Style::default().fg(ink).bg(Color::Rgb(252, 248, 240)),
            popup_title: Style::default()
                .fg(Color::Rgb(150, 80, 50))
                .add_modifier(Modifier::BOLD),
            help_section: Style::default().fg(ink).add_modifier(Modifier::BOLD),
            help_dim: Style::default().fg(Color::Rgb(150, 135, 115)),
            search_prompt: Style::default()
                .fg(Color::Rgb(150, 80, 50))
                .add_modifier(Modifier::BOLD),
            error: Style::default()
                .fg(Color::Rgb(170, 40, 40))
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Dark theme with a slower unfold.
    pub fn night() -> Self {
        let ink = Color::Rgb(214, 214, 228);
        let sheet = Color::Rgb(24, 26, 38);
        let band = Color::Rgb(34, 36, 54);
        Self {
            header_bar: Style::default().fg(ink).bg(band),
            status_bar: Style::default().fg(Color::Rgb(150, 150, 170)).bg(band),
            desk: Style::default().fg(ink).bg(sheet),
            list_selected: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(60, 60, 100)),
            list_header: Style::default()
                .fg(Color::Rgb(180, 180, 200))
                .bg(Color::Rgb(40, 40, 60))
                .add_modifier(Modifier::BOLD),
            list_normal: Style::default().fg(ink),
            sidebar: Style::default().fg(Color::Rgb(180, 180, 200)),
            sidebar_selected: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            letter_label: Style::default()
                .fg(Color::Rgb(130, 170, 255))
                .add_modifier(Modifier::BOLD),
            letter_body: Style::default().fg(ink).bg(sheet),
            hearted: Style::default().fg(Color::Rgb(255, 120, 150)),
            border: Style::default().fg(Color::Rgb(80, 80, 100)),
            border_focused: Style::default()
                .fg(Color::Rgb(130, 170, 255))
                .add_modifier(Modifier::BOLD),
            popup: Style::default().fg(ink).bg(Color::Rgb(20, 20, 35)),
            popup_title: Style::default()
                .fg(Color::Rgb(130, 170, 255))
                .add_modifier(Modifier::BOLD),
            help_section: Style::default().fg(ink).add_modifier(Modifier::BOLD),
            help_dim: Style::default().fg(Color::Rgb(110, 110, 130)),
            search_prompt: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            error: Style::default()
                .fg(Color::Rgb(255, 110, 110))
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Pink stationery with a quick unfold.
    pub fn rose() -> Self {
        let ink = Color::Rgb(92, 40, 58);
        let sheet = Color::Rgb(252, 236, 240);
        let band = Color::Rgb(240, 200, 212);
        Self {
            header_bar: Style::default().fg(ink).bg(band),
            status_bar: Style::default().fg(Color::Rgb(130, 70, 90)).bg(band),
            desk: Style::default().fg(ink).bg(sheet),
            list_selected: Style::default().fg(sheet).bg(Color::Rgb(200, 90, 120)),
            list_header: Style::default()
                .fg(ink)
                .bg(band)
                .add_modifier(Modifier::BOLD),
            list_normal: Style::default().fg(ink),
            sidebar: Style::default().fg(Color::Rgb(130, 70, 90)),
            sidebar_selected: Style::default()
                .fg(Color::Rgb(200, 60, 100))
                .add_modifier(Modifier::BOLD),
            letter_label: Style::default()
                .fg(Color::Rgb(200, 60, 100))
                .add_modifier(Modifier::BOLD),
            letter_body: Style::default().fg(ink).bg(sheet),
            hearted: Style::default().fg(Color::Rgb(220, 30, 80)),
            border: Style::default().fg(Color::Rgb(225, 170, 185)),
            border_focused: Style::default()
                .fg(Color::Rgb(200, 90, 120))
                .add_modifier(Modifier::BOLD),
            popup: Style::default().fg(ink).bg(Color::Rgb(255, 245, 248)),
            popup_title: Style::default()
                .fg(Color::Rgb(200, 60, 100))
                .add_modifier(Modifier::BOLD),
            help_section: Style::default().fg(ink).add_modifier(Modifier::BOLD),
            help_dim: Style::default().fg(Color::Rgb(180, 130, 145)),
            search_prompt: Style::default()
                .fg(Color::Rgb(200, 60, 100))
                .add_modifier(Modifier::BOLD),
            error: Style::default()
                .fg(Color::Rgb(180, 20, 40))
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// Select the theme. Call once at startup; later calls are ignored.
pub fn set_theme(name: ThemeName) {
    let _ = CURRENT_THEME.set(name);
}

pub fn theme_name() -> ThemeName {
    CURRENT_THEME.get().copied().unwrap_or(ThemeName::Paper)
}

/// Return the active theme.
pub fn current_theme() -> Theme {
    match theme_name() {
        ThemeName::Paper => Theme::paper(),
        ThemeName::Night => Theme::night(),
        ThemeName::Rose => Theme::rose(),
    }
}

/// Terminal color for a surface color.
pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}
