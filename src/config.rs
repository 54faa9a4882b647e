//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$LETTERDESK_CONFIG` (environment variable)
//! 2. `~/.config/letterdesk/config.toml` (Linux)
//!    `~/Library/Application Support/letterdesk/config.toml` (macOS)
//!    `%APPDATA%\letterdesk\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LetterError, Result};
use crate::reveal::config::{BottomContent, ModeTexts, RevealConfig, RevealMode};
use crate::reveal::surface::Rgb;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Where letters come from.
    pub source: SourceConfig,
    /// The cover card.
    pub reveal: RevealSection,
    /// Theme and animation.
    pub display: DisplayConfig,
    /// External audio player.
    pub audio: AudioConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override the directory holding the ledger.
    pub data_dir: Option<PathBuf>,
    /// Override the directory holding logs.
    pub cache_dir: Option<PathBuf>,
}

/// Letter source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Endpoint URL (`http://`, `https://`) or path to a JSON file.
    pub location: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Cover card settings, as written in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSection {
    /// "scratch", "hover" or "click".
    pub mode: String,
    /// Brush diameter in surface pixels.
    pub brush_size: f32,
    /// Erased fraction that opens the letter (0.0–1.0).
    pub threshold: f64,
    /// Erase operations between reveal checks.
    pub sample_interval: u32,
    /// Colors as `#rrggbb`.
    pub cover_color: String,
    pub text_color: String,
    pub background: String,
    /// Prompt per mode.
    pub scratch_text: String,
    pub hover_text: String,
    pub click_text: String,
    /// Corner rounding in cells (0 = square).
    pub corner_radius: u16,
    /// Surface pixels covered by one terminal cell.
    pub cell_width_px: u32,
    pub cell_height_px: u32,
    /// Largest surface a mask snapshot is taken of.
    pub mask_pixel_limit: usize,
    /// Show the image label instead of the plain background.
    pub use_image: bool,
    pub image_source: Option<String>,
    pub image_label: String,
}

/// Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Color theme: "paper", "night" or "rose".
    pub theme: String,
    /// Override the theme's open animation length, in milliseconds.
    pub animation_ms: Option<u64>,
}

/// Audio player settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Player executable.
    pub program: String,
    /// Arguments; `{source}` is replaced with the clip location.
    pub args: Vec<String>,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            data_dir: None,
            cache_dir: None,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: None,
            timeout_secs: 15,
        }
    }
}

impl Default for RevealSection {
    fn default() -> Self {
        let base = RevealConfig::default();
        let texts = ModeTexts::default();
        Self {
            mode: base.mode.name().to_string(),
            brush_size: base.brush_size,
            threshold: base.threshold,
            sample_interval: base.sample_interval,
            cover_color: base.cover_color.to_hex(),
            text_color: base.text_color.to_hex(),
            background: base.background.to_hex(),
            scratch_text: texts.scratch,
            hover_text: texts.hover,
            click_text: texts.click,
            corner_radius: base.corner_radius,
            cell_width_px: 4,
            cell_height_px: 8,
            mask_pixel_limit: base.mask_pixel_limit,
            use_image: false,
            image_source: None,
            image_label: base.bottom.label,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: "paper".to_string(),
            animation_ms: None,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            program: "mpv".to_string(),
            args: vec![
                "--no-video".to_string(),
                "--really-quiet".to_string(),
                "{source}".to_string(),
            ],
        }
    }
}

// ── Conversions ─────────────────────────────────────────────────

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Largest number of surface pixels one terminal cell may stand for.
pub const MAX_CELL_PX: u32 = 32;

impl RevealSection {
    /// Validate the section and turn it into an engine configuration.
    pub fn to_reveal_config(&self) -> Result<RevealConfig> {
        let mode = RevealMode::from_name(&self.mode).ok_or_else(|| LetterError::Config {
            key: "reveal.mode".to_string(),
            reason: format!("'{}' is not one of scratch, hover, click", self.mode),
        })?;
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(LetterError::Config {
                key: "reveal.threshold".to_string(),
                reason: format!("{} is outside 0.0–1.0", self.threshold),
            });
        }
        for (key, value) in [
            ("reveal.cell_width_px", self.cell_width_px),
            ("reveal.cell_height_px", self.cell_height_px),
        ] {
            if !(1..=MAX_CELL_PX).contains(&value) {
                return Err(LetterError::Config {
                    key: key.to_string(),
                    reason: format!("{value} is outside 1–{MAX_CELL_PX}"),
                });
            }
        }
        let config = RevealConfig {
            mode,
            bottom: BottomContent {
                source: self.image_source.clone(),
                label: self.image_label.clone(),
            },
            background: color("reveal.background", &self.background)?,
            use_image: self.use_image,
            texts: ModeTexts {
                scratch: self.scratch_text.clone(),
                hover: self.hover_text.clone(),
                click: self.click_text.clone(),
            },
            text_color: color("reveal.text_color", &self.text_color)?,
            cover_color: color("reveal.cover_color", &self.cover_color)?,
            brush_size: self.brush_size,
            corner_radius: self.corner_radius,
            threshold: self.threshold,
            sample_interval: self.sample_interval,
            mask_pixel_limit: self.mask_pixel_limit,
        };
        Ok(config.normalized())
    }

    /// Surface pixels per terminal cell, kept within `1..=MAX_CELL_PX`.
    pub fn cell_pixels(&self) -> (u32, u32) {
        (
            self.cell_width_px.clamp(1, MAX_CELL_PX),
            self.cell_height_px.clamp(1, MAX_CELL_PX),
        )
    }
}

fn color(key: &str, value: &str) -> Result<Rgb> {
    Rgb::parse_hex(value).ok_or_else(|| LetterError::Config {
        key: key.to_string(),
        reason: format!("'{value}' is not a #rrggbb color"),
    })
}

// ── Load / paths ────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("LETTERDESK_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("letterdesk").join("config.toml"))
}

/// Return the directory holding the ledger.
pub fn data_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.data_dir {
        return dir.clone();
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("letterdesk")
}

/// Return the ledger file path.
pub fn ledger_path(config: &Config) -> PathBuf {
    data_dir(config).join("ledger.json")
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("letterdesk")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("letterdesk.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.general.log_level, "warn");
        assert_eq!(cfg.display.theme, "paper");
        assert_eq!(cfg.reveal.mode, "scratch");
        assert_eq!(cfg.reveal.sample_interval, 7);
        assert_eq!(cfg.audio.program, "mpv");
        assert!(cfg.source.location.is_none());
    }

    #[test]
    fn test_default_reveal_section_matches_engine_defaults() {
        let converted = RevealSection::default()
            .to_reveal_config()
            .expect("defaults are valid");
        assert_eq!(converted, RevealConfig::default());
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.reveal.cover_color, cfg.reveal.cover_color);
        assert_eq!(parsed.display.theme, cfg.display.theme);
        assert_eq!(parsed.audio.args, cfg.audio.args);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[source]
location = "https://example.org/letters"

[reveal]
mode = "click"
threshold = 0.6

[display]
theme = "night"
"#;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert_eq!(
            cfg.source.location.as_deref(),
            Some("https://example.org/letters")
        );
        assert_eq!(cfg.display.theme, "night");
        // Other fields use defaults
        assert_eq!(cfg.source.timeout_secs, 15);
        assert_eq!(cfg.reveal.brush_size, 14.0);

        let reveal = cfg.reveal.to_reveal_config().expect("valid");
        assert_eq!(reveal.mode, RevealMode::Click);
        assert_eq!(reveal.threshold, 0.6);
    }

    #[test]
    fn test_invalid_reveal_values_are_reported() {
        let bad_mode = RevealSection {
            mode: "wipe".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            bad_mode.to_reveal_config(),
            Err(LetterError::Config { ref key, .. }) if key == "reveal.mode"
        ));

        let bad_color = RevealSection {
            cover_color: "beige".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            bad_color.to_reveal_config(),
            Err(LetterError::Config { ref key, .. }) if key == "reveal.cover_color"
        ));

        let bad_threshold = RevealSection {
            threshold: 1.5,
            ..Default::default()
        };
        assert!(bad_threshold.to_reveal_config().is_err());
    }

    #[test]
    fn test_cell_size_out_of_range_is_rejected() {
        let huge = RevealSection {
            cell_width_px: 100_000,
            ..Default::default()
        };
        assert!(matches!(
            huge.to_reveal_config(),
            Err(LetterError::Config { ref key, .. }) if key == "reveal.cell_width_px"
        ));
        assert_eq!(huge.cell_pixels(), (MAX_CELL_PX, 8));

        let zero = RevealSection {
            cell_height_px: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero.to_reveal_config(),
            Err(LetterError::Config { ref key, .. }) if key == "reveal.cell_height_px"
        ));
        assert_eq!(zero.cell_pixels(), (4, 1));

        let edge = RevealSection {
            cell_width_px: MAX_CELL_PX,
            cell_height_px: 1,
            ..Default::default()
        };
        assert!(edge.to_reveal_config().is_ok());
    }

    #[test]
    fn test_paths_follow_overrides() {
        let mut cfg = Config::default();
        cfg.general.data_dir = Some(PathBuf::from("/tmp/ld-data"));
        cfg.general.cache_dir = Some(PathBuf::from("/tmp/ld-cache"));
        assert_eq!(ledger_path(&cfg), PathBuf::from("/tmp/ld-data/ledger.json"));
        assert_eq!(
            log_file_path(&cfg),
            PathBuf::from("/tmp/ld-cache/letterdesk.log")
        );
    }
}
