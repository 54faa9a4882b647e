//! RGBA occlusion surface with cut-out erasing.
//!
//! Pixels are stored row-major as `[r, g, b, a]`. Erasing always writes
//! fully transparent pixels, so "erased" is exactly `alpha == 0`.

use crate::error::{LetterError, Result};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Source-over blend of `top` at `opacity` onto `self`.
    pub fn blend(self, top: Rgb, opacity: f32) -> Rgb {
        let o = opacity.clamp(0.0, 1.0);
        let mix = |under: u8, over: u8| -> u8 {
            (under as f32 * (1.0 - o) + over as f32 * o).round() as u8
        };
        Rgb::new(mix(self.r, top.r), mix(self.g, top.g), mix(self.b, top.b))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A point in surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The erasable layer.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl PixelSurface {
    /// A fully transparent surface of at least 1×1.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn area(&self) -> usize {
        self.pixels.len()
    }

    /// Reallocate to `width × height` (at least 1×1), fully transparent.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Paint every pixel with an opaque color.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill([color.r, color.g, color.b, 255]);
    }

    /// Blend `color` at `opacity` over a rectangle, clipped to the surface.
    /// Transparent pixels stay transparent.
    pub fn blend_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Rgb, opacity: f32) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, w as i64, h as i64) else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                let idx = self.index(px, py);
                let [r, g, b, a] = self.pixels[idx];
                if a == 0 {
                    continue;
                }
                let mixed = Rgb::new(r, g, b).blend(color, opacity);
                self.pixels[idx] = [mixed.r, mixed.g, mixed.b, a];
            }
        }
    }

    /// Cut a filled disc out of the surface.
    pub fn erase_disc(&mut self, center: Point, radius: f32) {
        self.erase_segment(center, center, radius * 2.0);
    }

    /// Cut out a line of `width` with round caps and joins.
    ///
    /// A pixel is erased when its center lies within `width / 2` of the
    /// segment `from`–`to`.
    pub fn erase_segment(&mut self, from: Point, to: Point, width: f32) {
        let half = (width / 2.0).max(0.5);
        let min_x = (from.x.min(to.x) - half).floor() as i64;
        let min_y = (from.y.min(to.y) - half).floor() as i64;
        let max_x = (from.x.max(to.x) + half).ceil() as i64;
        let max_y = (from.y.max(to.y) + half).ceil() as i64;
        let Some((x0, y0, x1, y1)) = self.clip(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
        else {
            return;
        };

        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len_sq = dx * dx + dy * dy;
        let half_sq = half * half;

        for py in y0..y1 {
            for px in x0..x1 {
                let cx = px as f32 + 0.5;
                let cy = py as f32 + 0.5;
                let t = if len_sq == 0.0 {
                    0.0
                } else {
                    (((cx - from.x) * dx + (cy - from.y) * dy) / len_sq).clamp(0.0, 1.0)
                };
                let nx = from.x + t * dx - cx;
                let ny = from.y + t * dy - cy;
                if nx * nx + ny * ny <= half_sq {
                    let idx = self.index(px, py);
                    self.pixels[idx] = [0; 4];
                }
            }
        }
    }

    /// Cut out an axis-aligned rectangle.
    pub fn erase_rect(&mut self, x: i64, y: i64, w: u32, h: u32) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, w as i64, h as i64) else {
            return;
        };
        for py in y0..y1 {
            let start = self.index(x0, py);
            let end = self.index(x1 - 1, py) + 1;
            self.pixels[start..end].fill([0; 4]);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.pixel(x, y).map_or(0, |p| p[3])
    }

    /// Raw alpha channel, row-major.
    pub fn alpha_channel(&self) -> Vec<u8> {
        self.pixels.iter().map(|p| p[3]).collect()
    }

    /// Number of fully transparent pixels.
    pub fn erased_count(&self) -> usize {
        self.pixels.iter().filter(|p| p[3] == 0).count()
    }

    /// Fraction of fully transparent pixels, 0 for an empty surface.
    pub fn erased_ratio(&self) -> f64 {
        let total = self.pixels.len();
        if total == 0 {
            return 0.0;
        }
        self.erased_count() as f64 / total as f64
    }

    /// Opaque fraction and average opaque color of a block, clipped to the
    /// surface. The color is `None` when the block is fully erased.
    pub fn sample_block(&self, x: u32, y: u32, w: u32, h: u32) -> (f32, Option<Rgb>) {
        let Some((x0, y0, x1, y1)) = self.clip(x as i64, y as i64, w as i64, h as i64) else {
            return (0.0, None);
        };
        let (mut opaque, mut r, mut g, mut b) = (0u32, 0u32, 0u32, 0u32);
        for py in y0..y1 {
            for px in x0..x1 {
                let [pr, pg, pb, pa] = self.pixels[self.index(px, py)];
                if pa > 0 {
                    opaque += 1;
                    r += pr as u32;
                    g += pg as u32;
                    b += pb as u32;
                }
            }
        }
        let total = (x1 - x0) * (y1 - y0);
        let color = (opaque > 0).then(|| {
            Rgb::new(
                (r / opaque) as u8,
                (g / opaque) as u8,
                (b / opaque) as u8,
            )
        });
        (opaque as f32 / total as f32, color)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Clip a rectangle to the surface; returns half-open bounds.
    fn clip(&self, x: i64, y: i64, w: i64, h: i64) -> Option<(u32, u32, u32, u32)> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i64);
        let y1 = (y + h).min(self.height as i64);
        (x0 < x1 && y0 < y1).then_some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

/// Alpha snapshot of a surface, used to clip overlay text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl AlphaMask {
    /// Copy the alpha channel of `surface`.
    ///
    /// Refused when the surface has more than `pixel_limit` pixels.
    pub fn capture(surface: &PixelSurface, pixel_limit: usize) -> Result<Self> {
        if surface.area() > pixel_limit {
            return Err(LetterError::Snapshot(format!(
                "{}x{} exceeds the {pixel_limit}-pixel export limit",
                surface.width(),
                surface.height()
            )));
        }
        Ok(Self {
            width: surface.width(),
            height: surface.height(),
            alpha: surface.alpha_channel(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fraction of non-transparent pixels in a block, clipped to the mask.
    pub fn coverage(&self, x: u32, y: u32, w: u32, h: u32) -> f32 {
        let x1 = (x + w).min(self.width);
        let y1 = (y + h).min(self.height);
        if x >= x1 || y >= y1 {
            return 0.0;
        }
        let mut covered = 0u32;
        for py in y..y1 {
            let row = py as usize * self.width as usize;
            covered += self.alpha[row + x as usize..row + x1 as usize]
                .iter()
                .filter(|&&a| a > 0)
                .count() as u32;
        }
        covered as f32 / ((x1 - x) * (y1 - y)) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse_hex("#1a2B3c"), Some(Rgb::new(0x1a, 0x2b, 0x3c)));
        assert_eq!(Rgb::parse_hex("ffffff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::parse_hex("#fff"), None);
        assert_eq!(Rgb::parse_hex("#gggggg"), None);
        assert_eq!(Rgb::new(1, 2, 3).to_hex(), "#010203");
    }

    #[test]
    fn test_blend_ten_percent() {
        let c = Rgb::new(200, 200, 200).blend(Rgb::BLACK, 0.1);
        assert_eq!(c, Rgb::new(180, 180, 180));
    }

    #[test]
    fn test_new_surface_is_at_least_one_pixel() {
        let s = PixelSurface::new(0, 0);
        assert_eq!((s.width(), s.height()), (1, 1));
        assert_eq!(s.area(), 1);
    }

    #[test]
    fn test_ratio_full_and_empty() {
        let mut s = PixelSurface::new(30, 20);
        s.fill(Rgb::WHITE);
        assert_eq!(s.erased_ratio(), 0.0);
        s.erase_rect(0, 0, 30, 20);
        assert_eq!(s.erased_ratio(), 1.0);
    }

    #[test]
    fn test_erase_disc_is_round() {
        let mut s = PixelSurface::new(21, 21);
        s.fill(Rgb::WHITE);
        s.erase_disc(Point::new(10.5, 10.5), 5.0);
        assert_eq!(s.alpha(10, 10), 0);
        assert_eq!(s.alpha(15, 10), 0);
        assert_eq!(s.alpha(16, 10), 255);
        // corner of the bounding box stays opaque
        assert_eq!(s.alpha(14, 14), 255);
        let erased = s.erased_count() as f32;
        let expected = std::f32::consts::PI * 25.0;
        assert!((erased - expected).abs() < expected * 0.15);
    }

    #[test]
    fn test_erase_segment_has_round_caps() {
        let mut s = PixelSurface::new(40, 20);
        s.fill(Rgb::WHITE);
        s.erase_segment(Point::new(10.0, 10.0), Point::new(30.0, 10.0), 6.0);
        assert_eq!(s.alpha(20, 10), 0);
        assert_eq!(s.alpha(20, 12), 0);
        assert_eq!(s.alpha(20, 14), 255);
        // past the end point, within the cap radius
        assert_eq!(s.alpha(31, 9), 0);
        assert_eq!(s.alpha(34, 10), 255);
    }

    #[test]
    fn test_erasing_outside_is_clipped() {
        let mut s = PixelSurface::new(10, 10);
        s.fill(Rgb::WHITE);
        s.erase_segment(Point::new(-50.0, -50.0), Point::new(-40.0, -40.0), 4.0);
        assert_eq!(s.erased_count(), 0);
        s.erase_rect(8, 8, 10, 10);
        assert_eq!(s.erased_count(), 4);
    }

    #[test]
    fn test_blend_rect_keeps_alpha() {
        let mut s = PixelSurface::new(4, 4);
        s.fill(Rgb::new(120, 120, 120));
        s.erase_rect(0, 0, 1, 1);
        s.blend_rect(0, 0, 2, 2, Rgb::BLACK, 0.1);
        assert_eq!(s.alpha(0, 0), 0);
        assert_eq!(s.pixel(1, 1), Some([108, 108, 108, 255]));
        assert_eq!(s.pixel(3, 3), Some([120, 120, 120, 255]));
    }

    #[test]
    fn test_mask_capture_limit() {
        let mut s = PixelSurface::new(10, 10);
        s.fill(Rgb::WHITE);
        assert!(AlphaMask::capture(&s, 99).is_err());
        let mask = AlphaMask::capture(&s, 100).unwrap();
        assert_eq!(mask.coverage(0, 0, 10, 10), 1.0);
        s.erase_rect(0, 0, 5, 10);
        let mask = AlphaMask::capture(&s, 100).unwrap();
        assert_eq!(mask.coverage(0, 0, 10, 10), 0.5);
        assert_eq!(mask.coverage(20, 20, 2, 2), 0.0);
    }

    #[test]
    fn test_sample_block() {
        let mut s = PixelSurface::new(8, 8);
        s.fill(Rgb::new(100, 50, 10));
        s.erase_rect(0, 0, 2, 4);
        assert_eq!(s.sample_block(0, 0, 4, 4), (0.5, Some(Rgb::new(100, 50, 10))));
        assert_eq!(s.sample_block(0, 0, 2, 2), (0.0, None));
        assert_eq!(s.sample_block(4, 4, 8, 8).0, 1.0);
        assert_eq!(s.sample_block(9, 9, 2, 2), (0.0, None));
    }
}
