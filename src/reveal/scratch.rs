//! Scratch-off card: an erasable occlusion layer with reveal detection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::config::RevealConfig;
use super::surface::{AlphaMask, PixelSurface, Point, Rgb};
use super::{RevealLatch, Viewport};

/// Number of texture speckles painted on a fresh layer.
pub const SPECKLE_COUNT: usize = 100;
/// Edge length of one speckle, in surface pixels.
const SPECKLE_SIZE: u32 = 2;
const SPECKLE_TONES: [Rgb; 2] = [Rgb::WHITE, Rgb::BLACK];
const SPECKLE_OPACITY: f32 = 0.1;

/// Lifecycle of a scratch card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScratchPhase {
    /// Not mounted yet; input is ignored.
    Uninitialized,
    /// Layer painted, nothing erased since (re)initialization.
    Ready,
    /// A stroke is in progress.
    Scratching,
    /// Between strokes.
    Idle,
    /// Threshold crossed and the callback fired. Input still erases.
    Revealed,
}

/// One scratch-off surface and its transient interaction state.
pub struct ScratchCard {
    surface: PixelSurface,
    mask: Option<AlphaMask>,
    phase: ScratchPhase,
    cover: Rgb,
    brush_size: f32,
    threshold: f64,
    sample_interval: u32,
    mask_pixel_limit: usize,
    erase_ops: u32,
    stroking: bool,
    last_point: Option<Point>,
    viewport: Option<Viewport>,
    token: Option<u64>,
    latch: RevealLatch,
    rng: StdRng,
}

impl ScratchCard {
    pub fn new(config: &RevealConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic texture, for tests and benchmarks.
    pub fn with_seed(config: &RevealConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &RevealConfig, rng: StdRng) -> Self {
        let config = config.clone().normalized();
        Self {
            surface: PixelSurface::new(1, 1),
            mask: None,
            phase: ScratchPhase::Uninitialized,
            cover: config.cover_color,
            brush_size: config.brush_size,
            threshold: config.threshold,
            sample_interval: config.sample_interval,
            mask_pixel_limit: config.mask_pixel_limit,
            erase_ops: 0,
            stroking: false,
            last_point: None,
            viewport: None,
            token: None,
            latch: RevealLatch::default(),
            rng,
        }
    }

    /// Register the reveal callback.
    pub fn on_reveal(&mut self, callback: impl FnMut() + 'static) {
        self.latch.set_callback(callback);
    }

    /// Paint the layer at the container's rendered size.
    pub fn mount(&mut self, width: u32, height: u32) {
        self.initialize(width, height);
    }

    /// Reinitialize for a new hidden item when `token` differs from the
    /// last one seen. Returns `true` if the card was rebuilt.
    pub fn reset(&mut self, token: u64, width: u32, height: u32) -> bool {
        if self.token == Some(token) {
            return false;
        }
        self.token = Some(token);
        self.initialize(width, height);
        true
    }

    fn initialize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        self.surface.fill(self.cover);
        self.paint_speckles();
        self.erase_ops = 0;
        self.stroking = false;
        self.last_point = None;
        self.latch.rearm();
        self.phase = ScratchPhase::Ready;
        self.capture_mask();
        debug!(
            width = self.surface.width(),
            height = self.surface.height(),
            "Scratch card initialized"
        );
    }

    fn paint_speckles(&mut self) {
        let (w, h) = (self.surface.width(), self.surface.height());
        for _ in 0..SPECKLE_COUNT {
            let x = self.rng.gen_range(0..w) as i64;
            let y = self.rng.gen_range(0..h) as i64;
            let tone = SPECKLE_TONES[self.rng.gen_range(0..SPECKLE_TONES.len())];
            self.surface
                .blend_rect(x, y, SPECKLE_SIZE, SPECKLE_SIZE, tone, SPECKLE_OPACITY);
        }
    }

    /// Refresh the overlay-text mask. A refused snapshot disables the mask.
    fn capture_mask(&mut self) {
        self.mask = match AlphaMask::capture(&self.surface, self.mask_pixel_limit) {
            Ok(mask) => Some(mask),
            Err(e) => {
                if self.mask.is_some() || self.erase_ops == 0 {
                    debug!(error = %e, "Overlay mask disabled");
                }
                None
            }
        };
    }

    /// Where the card is displayed, in screen units.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    /// Map a screen point into surface pixels, scaling by the ratio of
    /// surface resolution to displayed size.
    pub fn to_surface(&self, screen: Point) -> Point {
        let Some(vp) = self.viewport else {
            return screen;
        };
        let sx = if vp.width > 0.0 {
            self.surface.width() as f32 / vp.width
        } else {
            1.0
        };
        let sy = if vp.height > 0.0 {
            self.surface.height() as f32 / vp.height
        } else {
            1.0
        };
        Point::new((screen.x - vp.x) * sx, (screen.y - vp.y) * sy)
    }

    /// Start a stroke. Returns `true` if this input fired the reveal.
    pub fn pointer_down(&mut self, screen: Point) -> bool {
        if self.phase == ScratchPhase::Uninitialized {
            return false;
        }
        self.stroking = true;
        self.last_point = None;
        if self.phase != ScratchPhase::Revealed {
            self.phase = ScratchPhase::Scratching;
        }
        let p = self.to_surface(screen);
        self.erase_to(p)
    }

    /// Continue the active stroke, if any.
    pub fn pointer_move(&mut self, screen: Point) -> bool {
        if !self.stroking {
            return false;
        }
        let p = self.to_surface(screen);
        self.erase_to(p)
    }

    /// End the stroke and run an unthrottled reveal check.
    pub fn pointer_up(&mut self) -> bool {
        if !self.stroking {
            return false;
        }
        self.stroking = false;
        self.last_point = None;
        if self.phase == ScratchPhase::Scratching {
            self.phase = ScratchPhase::Idle;
        }
        self.capture_mask();
        self.check_reveal()
    }

    /// Same as [`pointer_up`](Self::pointer_up).
    pub fn pointer_cancel(&mut self) -> bool {
        self.pointer_up()
    }

    fn erase_to(&mut self, p: Point) -> bool {
        match self.last_point {
            None => self.surface.erase_disc(p, self.brush_size / 2.0),
            Some(prev) => self.surface.erase_segment(prev, p, self.brush_size),
        }
        self.last_point = Some(p);
        self.erase_ops += 1;
        trace!(x = p.x, y = p.y, ops = self.erase_ops, "Erased");

        if self.erase_ops % self.sample_interval == 0 {
            self.capture_mask();
            self.check_reveal()
        } else {
            false
        }
    }

    /// Compare the erased ratio with the threshold and fire the latch once.
    pub fn check_reveal(&mut self) -> bool {
        if self.phase == ScratchPhase::Uninitialized || self.latch.has_fired() {
            return false;
        }
        let ratio = self.surface.erased_ratio();
        if ratio < self.threshold {
            return false;
        }
        debug!(ratio, threshold = self.threshold, "Reveal threshold crossed");
        self.phase = ScratchPhase::Revealed;
        self.latch.fire()
    }

    /// Drop transient input state and the callback.
    pub fn teardown(&mut self) {
        self.stroking = false;
        self.last_point = None;
        self.latch.clear_callback();
    }

    pub fn phase(&self) -> ScratchPhase {
        self.phase
    }

    pub fn is_stroking(&self) -> bool {
        self.stroking
    }

    pub fn has_fired(&self) -> bool {
        self.latch.has_fired()
    }

    pub fn reveal_ratio(&self) -> f64 {
        self.surface.erased_ratio()
    }

    pub fn erase_ops(&self) -> u32 {
        self.erase_ops
    }

    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut PixelSurface {
        &mut self.surface
    }

    pub fn mask(&self) -> Option<&AlphaMask> {
        self.mask.as_ref()
    }

    pub fn cover_color(&self) -> Rgb {
        self.cover
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn card(threshold: f64) -> (ScratchCard, Rc<Cell<u32>>) {
        let config = RevealConfig {
            threshold,
            brush_size: 10.0,
            ..Default::default()
        };
        let mut card = ScratchCard::with_seed(&config, 7);
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        card.on_reveal(move || counter.set(counter.get() + 1));
        (card, fired)
    }

    #[test]
    fn test_uninitialized_ignores_input() {
        let (mut c, fired) = card(0.4);
        assert!(!c.pointer_down(Point::new(1.0, 1.0)));
        assert!(!c.pointer_up());
        assert_eq!(c.phase(), ScratchPhase::Uninitialized);
        assert_eq!(c.erase_ops(), 0);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_mount_paints_opaque_layer_with_mask() {
        let (mut c, _) = card(0.4);
        c.mount(60, 40);
        assert_eq!(c.phase(), ScratchPhase::Ready);
        assert_eq!(c.surface().width(), 60);
        assert_eq!(c.reveal_ratio(), 0.0);
        assert!(c.mask().is_some());
    }

    #[test]
    fn test_speckles_tint_some_pixels() {
        let (mut c, _) = card(0.4);
        c.mount(60, 40);
        let cover = c.cover_color();
        let plain = [cover.r, cover.g, cover.b, 255];
        let tinted = (0..40)
            .flat_map(|y| (0..60).map(move |x| (x, y)))
            .filter(|&(x, y)| c.surface().pixel(x, y) != Some(plain))
            .count();
        assert!(tinted > 0);
        assert!(tinted <= SPECKLE_COUNT * 4);
    }

    #[test]
    fn test_mount_zero_size_is_one_pixel() {
        let (mut c, _) = card(0.4);
        c.mount(0, 0);
        assert_eq!(c.surface().area(), 1);
    }

    #[test]
    fn test_stroke_phases() {
        let (mut c, _) = card(0.99);
        c.mount(100, 100);
        c.pointer_down(Point::new(10.0, 10.0));
        assert_eq!(c.phase(), ScratchPhase::Scratching);
        c.pointer_move(Point::new(50.0, 10.0));
        assert_eq!(c.erase_ops(), 2);
        c.pointer_up();
        assert_eq!(c.phase(), ScratchPhase::Idle);
        assert!(!c.is_stroking());
        // moves without a stroke erase nothing
        c.pointer_move(Point::new(90.0, 90.0));
        assert_eq!(c.erase_ops(), 2);
        assert_eq!(c.surface().alpha(90, 90), 255);
    }

    #[test]
    fn test_new_stroke_does_not_connect_to_old_one() {
        let (mut c, _) = card(0.99);
        c.mount(100, 100);
        c.pointer_down(Point::new(10.0, 50.0));
        c.pointer_up();
        c.pointer_down(Point::new(90.0, 50.0));
        c.pointer_up();
        assert_eq!(c.surface().alpha(50, 50), 255);
    }

    #[test]
    fn test_segment_erases_between_points() {
        let (mut c, _) = card(0.99);
        c.mount(100, 100);
        c.pointer_down(Point::new(10.0, 50.0));
        c.pointer_move(Point::new(90.0, 50.0));
        assert_eq!(c.surface().alpha(50, 50), 0);
    }

    #[test]
    fn test_check_is_throttled_until_release() {
        let config = RevealConfig {
            threshold: 0.01,
            brush_size: 30.0,
            sample_interval: 7,
            ..Default::default()
        };
        let mut c = ScratchCard::with_seed(&config, 1);
        c.mount(100, 100);
        assert!(!c.pointer_down(Point::new(50.0, 50.0)));
        for i in 1..6 {
            assert!(!c.pointer_move(Point::new(50.0 + i as f32, 50.0)));
        }
        assert_eq!(c.erase_ops(), 6);
        assert!(c.reveal_ratio() >= 0.01);
        assert!(!c.has_fired());
        assert!(c.pointer_up());
        assert!(c.has_fired());
    }

    #[test]
    fn test_seventh_erase_checks() {
        let config = RevealConfig {
            threshold: 0.01,
            brush_size: 30.0,
            sample_interval: 7,
            ..Default::default()
        };
        let mut c = ScratchCard::with_seed(&config, 1);
        c.mount(100, 100);
        let mut fired_at = None;
        if c.pointer_down(Point::new(50.0, 50.0)) {
            fired_at = Some(1);
        }
        for op in 2..=7 {
            if c.pointer_move(Point::new(50.0, 50.0)) {
                fired_at = Some(op);
            }
        }
        assert_eq!(fired_at, Some(7));
    }

    #[test]
    fn test_fires_once_per_lifetime() {
        let (mut c, fired) = card(0.4);
        c.mount(300, 200);
        c.surface_mut().erase_rect(0, 0, 300, 80);
        assert!(c.check_reveal());
        c.surface_mut().erase_rect(0, 0, 300, 200);
        assert!(!c.check_reveal());
        c.pointer_down(Point::new(5.0, 5.0));
        c.pointer_up();
        assert_eq!(fired.get(), 1);
        assert_eq!(c.phase(), ScratchPhase::Revealed);
    }

    #[test]
    fn test_reset_rearms_with_new_token_only() {
        let (mut c, fired) = card(0.4);
        assert!(c.reset(1, 50, 50));
        c.surface_mut().erase_rect(0, 0, 50, 50);
        assert!(c.check_reveal());
        assert!(!c.reset(1, 50, 50));
        assert_eq!(c.reveal_ratio(), 1.0);

        assert!(c.reset(2, 40, 30));
        assert_eq!(c.phase(), ScratchPhase::Ready);
        assert_eq!(c.reveal_ratio(), 0.0);
        assert_eq!(c.erase_ops(), 0);
        assert!(!c.has_fired());
        c.surface_mut().erase_rect(0, 0, 40, 30);
        assert!(c.check_reveal());
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn test_viewport_scaling() {
        let (mut c, _) = card(0.99);
        c.mount(200, 100);
        c.set_viewport(Viewport::new(10.0, 5.0, 50.0, 25.0));
        let p = c.to_surface(Point::new(35.0, 17.5));
        assert_eq!(p, Point::new(100.0, 50.0));
        c.pointer_down(Point::new(35.0, 17.5));
        assert_eq!(c.surface().alpha(100, 50), 0);
    }

    #[test]
    fn test_refused_snapshot_disables_mask_but_still_reveals() {
        let config = RevealConfig {
            mask_pixel_limit: 10,
            threshold: 0.5,
            ..Default::default()
        };
        let mut c = ScratchCard::with_seed(&config, 3);
        c.mount(20, 20);
        assert!(c.mask().is_none());
        c.surface_mut().erase_rect(0, 0, 20, 10);
        assert!(c.check_reveal());
    }

    #[test]
    fn test_teardown_drops_callback() {
        let (mut c, fired) = card(0.4);
        c.mount(10, 10);
        c.pointer_down(Point::new(1.0, 1.0));
        c.teardown();
        assert!(!c.is_stroking());
        c.surface_mut().erase_rect(0, 0, 10, 10);
        assert!(c.check_reveal());
        assert_eq!(fired.get(), 0);
    }
}
