//! Internationalization (i18n) module.
//!
//! Provides localized strings for the application UI and CLI output.
//! English is the default language; Spanish is available as an alternative.
//! The architecture supports adding more languages in the future.

use std::sync::OnceLock;

static CURRENT_LANG: OnceLock<Lang> = OnceLock::new();

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// English (default)
    En,
    /// Spanish
    Es,
}

impl Lang {
    /// Parse a language code string (e.g. "en", "es", "en_US", "es_ES").
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.to_lowercase();
        let prefix = normalized.split(['_', '-']).next().unwrap_or("");
        match prefix {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    /// Return the ISO 639-1 code for this language.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

/// Initialize the global language. Call once at startup.
/// If already initialized, this is a no-op.
pub fn set_lang(lang: Lang) {
    let _ = CURRENT_LANG.set(lang);
}

/// Get the currently configured language (defaults to English).
pub fn lang() -> Lang {
    CURRENT_LANG.get().copied().unwrap_or(Lang::En)
}

/// Detect language from `LETTERDESK_LANG`, then `LC_MESSAGES` / `LANG`.
pub fn detect_system_lang() -> Lang {
    std::env::var("LETTERDESK_LANG")
        .ok()
        .and_then(|v| Lang::from_code(&v))
        .or_else(|| {
            std::env::var("LC_MESSAGES")
                .ok()
                .and_then(|v| Lang::from_code(&v))
        })
        .or_else(|| std::env::var("LANG").ok().and_then(|v| Lang::from_code(&v)))
        .unwrap_or(Lang::En)
}

/// Macro for defining translatable message functions.
/// Each function returns a `&'static str` based on the current language.
macro_rules! msg {
    ($name:ident, $en:expr, $es:expr) => {
        /// Returns a localized string for the current language.
        pub fn $name() -> &'static str {
            match lang() {
                Lang::En => $en,
                Lang::Es => $es,
            }
        }
    };
}

// ── General ──────────────────────────────────────────────────────

msg!(app_name, "letterdesk", "letterdesk");
msg!(
    app_about,
    "letterdesk: open letters one at a time by scratching, hovering or clicking a card.",
    "letterdesk: abre cartas de una en una rascando, pasando el cursor o pulsando una tarjeta."
);
msg!(
    app_long_about,
    "letterdesk: a small desk of letters in your terminal.\nLetters come from a spreadsheet endpoint or a JSON file; each one is\nopened through a scratch card and remembered as read, hearted or archived.",
    "letterdesk: un peque\u{f1}o escritorio de cartas en tu terminal.\nLas cartas llegan de una hoja de c\u{e1}lculo o de un fichero JSON; cada una\nse abre con una tarjeta para rascar y se recuerda como le\u{ed}da, favorita o archivada."
);
msg!(
    app_after_help,
    "Run without a subcommand to open the desk. Configuration: $LETTERDESK_CONFIG or ~/.config/letterdesk/config.toml",
    "Sin subcomando se abre el escritorio. Configuraci\u{f3}n: $LETTERDESK_CONFIG o ~/.config/letterdesk/config.toml"
);

// ── CLI help strings ─────────────────────────────────────────────

msg!(
    help_source,
    "Letters endpoint URL or JSON file (overrides the config file)",
    "URL del servicio de cartas o fichero JSON (sustituye al fichero de configuraci\u{f3}n)"
);
msg!(
    help_mode,
    "Reveal mode: scratch, hover or click",
    "Modo de revelado: scratch, hover o click"
);
msg!(
    help_theme,
    "Theme: paper, night or rose",
    "Tema: paper, night o rose"
);
msg!(
    help_ephemeral,
    "Keep the ledger in memory only; nothing is written to disk",
    "Mantener el registro solo en memoria; no se escribe nada en disco"
);
msg!(
    help_verbose,
    "Verbose logging (-v info, -vv debug, -vvv trace)",
    "Registro detallado (-v info, -vv debug, -vvv trace)"
);
msg!(
    help_lang,
    "Language (en, es). Defaults to system locale",
    "Idioma (en, es). Por defecto usa el idioma del sistema"
);
msg!(
    help_cmd_open,
    "Open the desk in the TUI (default if no subcommand given)",
    "Abrir el escritorio en la TUI (por defecto si no se da subcomando)"
);
msg!(
    help_cmd_list,
    "List opened letters from the archive",
    "Listar las cartas abiertas del archivo"
);
msg!(
    help_cmd_stats,
    "Show how many letters are unseen, read, hearted and archived",
    "Mostrar cu\u{e1}ntas cartas hay sin abrir, le\u{ed}das, favoritas y archivadas"
);
msg!(help_output_json, "Output as JSON", "Salida en formato JSON");
msg!(help_filter_tag, "Only letters with this tag", "Solo cartas con esta etiqueta");
msg!(help_favorites, "Only hearted letters", "Solo cartas favoritas");
msg!(help_sort, "Order: newest or oldest", "Orden: newest u oldest");
msg!(help_search, "Only letters whose text contains this", "Solo cartas cuyo texto contenga esto");
msg!(
    help_cmd_completions,
    "Generate shell completions",
    "Generar autocompletado para la shell"
);
msg!(
    help_cmd_manpage,
    "Generate a man page",
    "Generar una p\u{e1}gina de manual"
);

// ── CLI output ───────────────────────────────────────────────────

msg!(msg_fetching, "Fetching letters...", "Obteniendo cartas...");
msg!(msg_source, "Source", "Origen");
msg!(msg_ledger, "Ledger", "Registro");
msg!(msg_in_memory, "(in memory)", "(en memoria)");
msg!(msg_total, "Letters", "Cartas");
msg!(msg_unseen, "Unseen", "Sin abrir");
msg!(msg_read, "Read", "Le\u{ed}das");
msg!(msg_hearted, "Hearted", "Favoritas");
msg!(msg_archived, "Archived", "Archivadas");
msg!(
    msg_results,
    "letter(s)",
    "carta(s)"
);
msg!(
    err_no_source,
    "No letter source configured. Pass --source or set 'location' under [source] in the config file.",
    "No hay origen de cartas. Usa --source o define 'location' en [source] del fichero de configuraci\u{f3}n."
);

msg!(err_bad_mode, "Unknown reveal mode", "Modo de revelado desconocido");
msg!(err_bad_theme, "Unknown theme", "Tema desconocido");
msg!(err_bad_sort, "Unknown sort order", "Orden desconocido");

// ── Status names ─────────────────────────────────────────────────

msg!(status_read, "read", "le\u{ed}da");
msg!(status_hearted, "hearted", "favorita");
msg!(status_archived, "archived", "archivada");

// ── TUI: screens ─────────────────────────────────────────────────

msg!(tui_loading, "Fetching letters...", "Obteniendo cartas...");
msg!(
    tui_load_failed,
    "The letters could not be loaded",
    "No se pudieron cargar las cartas"
);
msg!(
    tui_load_failed_hint,
    "Check the source and start again. Press q to quit.",
    "Revisa el origen y vuelve a empezar. Pulsa q para salir."
);
msg!(tui_no_entries, "No letters yet.", "A\u{fa}n no hay cartas.");
msg!(
    tui_all_opened,
    "Every letter has been opened. Press A for the archive.",
    "Ya se abrieron todas las cartas. Pulsa A para ver el archivo."
);
msg!(tui_unseen_left, "waiting", "esperando");
msg!(tui_opened, "opened", "abiertas");
msg!(tui_letter, "Letter", "Carta");
msg!(tui_archive, "Archive", "Archivo");
msg!(tui_archive_empty, "Nothing here yet.", "Aqu\u{ed} no hay nada a\u{fa}n.");
msg!(tui_filters, "Filters", "Filtros");
msg!(tui_filter_all, "All", "Todas");
msg!(tui_filter_favorites, "Favorites", "Favoritas");
msg!(tui_sort_newest, "newest first", "m\u{e1}s recientes primero");
msg!(tui_sort_oldest, "oldest first", "m\u{e1}s antiguas primero");
msg!(tui_col_number, "#", "#");
msg!(tui_col_tag, "Tag", "Etiqueta");
msg!(tui_col_status, "Status", "Estado");
msg!(tui_col_updated, "Updated", "Actualizada");
msg!(tui_col_letter, "Letter", "Carta");
msg!(tui_audio, "audio", "audio");
msg!(tui_audio_playing, "playing", "sonando");

// ── TUI: status messages ─────────────────────────────────────────

msg!(tui_status_hearted, "Added to favorites", "A\u{f1}adida a favoritas");
msg!(tui_status_archived, "Archived", "Archivada");
msg!(tui_status_unchanged, "Nothing to change", "Nada que cambiar");
msg!(
    tui_status_nothing_unseen,
    "No unseen letters left",
    "No quedan cartas sin abrir"
);
msg!(tui_status_no_audio, "This letter has no audio", "Esta carta no tiene audio");
msg!(tui_status_filter, "Filter", "Filtro");
msg!(tui_status_sort, "Sort", "Orden");

// ── TUI: hints ───────────────────────────────────────────────────

msg!(tui_hint_open, "open", "abrir");
msg!(tui_hint_archive, "archive", "archivo");
msg!(tui_hint_back, "back", "volver");
msg!(tui_hint_heart, "heart", "favorita");
msg!(tui_hint_store, "archive letter", "archivar carta");
msg!(tui_hint_audio, "audio", "audio");
msg!(tui_hint_nav, "navigate", "navegar");
msg!(tui_hint_search, "search", "buscar");
msg!(tui_hint_filter, "filter", "filtrar");
msg!(tui_hint_sort, "sort", "ordenar");
msg!(tui_hint_scroll, "scroll", "desplazar");
msg!(tui_hint_help, "help", "ayuda");
msg!(tui_hint_quit, "quit", "salir");
msg!(tui_hint_apply, "apply", "aplicar");
msg!(tui_hint_cancel, "cancel", "cancelar");
msg!(tui_hint_panel, "panel", "panel");
msg!(tui_hint_scratch, "drag the mouse over the card", "arrastra el rat\u{f3}n sobre la tarjeta");

// ── TUI: help popup ──────────────────────────────────────────────

msg!(tui_help_title, " Help ", " Ayuda ");
msg!(
    tui_help_description,
    "Open one letter at a time; the ledger remembers what you did.",
    "Abre una carta cada vez; el registro recuerda lo que hiciste."
);
msg!(tui_help_desk, "Desk", "Escritorio");
msg!(tui_help_letter, "Letter", "Carta");
msg!(tui_help_archive, "Archive", "Archivo");
msg!(tui_help_general, "General", "General");
msg!(tui_help_open_random, "Open a random unseen letter", "Abrir una carta al azar");
msg!(tui_help_mouse, "Scratch, hover or click the card", "Rascar, pasar o pulsar la tarjeta");
msg!(tui_help_show_archive, "Show the archive", "Mostrar el archivo");
msg!(tui_help_heart, "Heart this letter", "Marcar como favorita");
msg!(tui_help_store, "Archive this letter", "Archivar esta carta");
msg!(tui_help_audio, "Play / stop audio", "Reproducir / parar audio");
msg!(tui_help_scroll, "Scroll the letter", "Desplazar la carta");
msg!(tui_help_back, "Back", "Volver");
msg!(tui_help_next_prev, "Next / previous", "Siguiente / anterior");
msg!(tui_help_open_selected, "Open selected letter", "Abrir la carta seleccionada");
msg!(tui_help_search, "Search letter text", "Buscar en el texto");
msg!(tui_help_filter, "Cycle filter (all, favorites, tags)", "Cambiar filtro (todas, favoritas, etiquetas)");
msg!(tui_help_sort, "Toggle newest / oldest", "Alternar recientes / antiguas");
msg!(tui_help_this_help, "This help", "Esta ayuda");
msg!(tui_help_quit, "Quit", "Salir");
msg!(tui_help_force_quit, "Quit from anywhere", "Salir desde cualquier sitio");
