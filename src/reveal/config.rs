//! Options recognized by the reveal engine.

use super::surface::Rgb;

/// How the hidden content is uncovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealMode {
    /// Erase an opaque layer with the pointer.
    #[default]
    Scratch,
    /// Reveal while the pointer is over the card.
    Hover,
    /// Toggle on every tap.
    Click,
}

impl RevealMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "scratch" => Some(Self::Scratch),
            "hover" => Some(Self::Hover),
            "click" => Some(Self::Click),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Scratch => "scratch",
            Self::Hover => "hover",
            Self::Click => "click",
        }
    }
}

/// What lies under the occlusion layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BottomContent {
    /// Image location, if any.
    pub source: Option<String>,
    /// Accessible label, also shown in place of the image.
    pub label: String,
}

/// Prompt shown on the card, one per mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeTexts {
    pub scratch: String,
    pub hover: String,
    pub click: String,
}

impl ModeTexts {
    pub fn for_mode(&self, mode: RevealMode) -> &str {
        match mode {
            RevealMode::Scratch => &self.scratch,
            RevealMode::Hover => &self.hover,
            RevealMode::Click => &self.click,
        }
    }
}

impl Default for ModeTexts {
    fn default() -> Self {
        Self {
            scratch: "scratch to open".to_string(),
            hover: "hover to peek".to_string(),
            click: "click to open".to_string(),
        }
    }
}

/// Full configuration of one reveal card.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealConfig {
    pub mode: RevealMode,
    pub bottom: BottomContent,
    /// Shown under the layer when no image is used.
    pub background: Rgb,
    pub use_image: bool,
    pub texts: ModeTexts,
    pub text_color: Rgb,
    /// Color of the occlusion layer.
    pub cover_color: Rgb,
    /// Brush diameter in surface pixels.
    pub brush_size: f32,
    /// Corner rounding in terminal cells.
    pub corner_radius: u16,
    /// Erased fraction that counts as revealed, 0–1.
    pub threshold: f64,
    /// Erase operations between two reveal checks.
    pub sample_interval: u32,
    /// Largest surface (in pixels) a mask snapshot may be taken of.
    pub mask_pixel_limit: usize,
}

impl RevealConfig {
    /// Clamp values into their meaningful ranges.
    pub fn normalized(mut self) -> Self {
        self.threshold = if self.threshold.is_finite() {
            self.threshold.clamp(0.0, 1.0)
        } else {
            Self::default().threshold
        };
        self.brush_size = self.brush_size.max(1.0);
        self.sample_interval = self.sample_interval.max(1);
        self
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            mode: RevealMode::Scratch,
            bottom: BottomContent {
                source: None,
                label: "a letter is waiting".to_string(),
            },
            background: Rgb::new(0xf6, 0xef, 0xe2),
            use_image: false,
            texts: ModeTexts::default(),
            text_color: Rgb::new(0x5b, 0x4a, 0x3a),
            cover_color: Rgb::new(0xc9, 0xb8, 0x9c),
            brush_size: 14.0,
            corner_radius: 1,
            threshold: 0.4,
            sample_interval: 7,
            mask_pixel_limit: 4 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_roundtrip() {
        for mode in [RevealMode::Scratch, RevealMode::Hover, RevealMode::Click] {
            assert_eq!(RevealMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(RevealMode::from_name(" HOVER "), Some(RevealMode::Hover));
        assert_eq!(RevealMode::from_name("wipe"), None);
    }

    #[test]
    fn test_normalized_clamps() {
        let cfg = RevealConfig {
            threshold: 3.0,
            brush_size: 0.0,
            sample_interval: 0,
            ..Default::default()
        }
        .normalized();
        assert_eq!(cfg.threshold, 1.0);
        assert_eq!(cfg.brush_size, 1.0);
        assert_eq!(cfg.sample_interval, 1);

        let nan = RevealConfig {
            threshold: f64::NAN,
            ..Default::default()
        }
        .normalized();
        assert_eq!(nan.threshold, 0.4);
    }
}
