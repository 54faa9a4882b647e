//! Reveal engine: the interaction that uncovers the next letter.
//!
//! Three modes share one input API:
//!
//! - **scratch** erases an opaque pixel layer and fires once the erased
//!   fraction reaches a threshold ([`scratch::ScratchCard`]);
//! - **hover** fires on the first pointer enter;
//! - **click** fires on the first tap that turns the card over.
//!
//! Every input method returns `true` when that input fired the reveal,
//! and the optional callback registered with [`RevealEngine::on_reveal`]
//! runs at the same moment. Each instance fires at most once until it is
//! reset with a new token.

pub mod config;
pub mod scratch;
pub mod surface;
pub mod toggle;

use self::config::{RevealConfig, RevealMode};
use self::scratch::ScratchCard;
use self::surface::Point;
use self::toggle::{ClickReveal, HoverReveal};

/// Fire-once guard plus the callback it notifies.
#[derive(Default)]
pub struct RevealLatch {
    fired: bool,
    callback: Option<Box<dyn FnMut()>>,
}

impl RevealLatch {
    pub fn set_callback(&mut self, callback: impl FnMut() + 'static) {
        self.callback = Some(Box::new(callback));
    }

    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    /// Fire if not fired yet. Returns `true` only on the firing call.
    pub fn fire(&mut self) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        if let Some(callback) = self.callback.as_mut() {
            callback();
        }
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    fn rearm(&mut self) {
        self.fired = false;
    }
}

/// Screen-space rectangle the card is drawn in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.width && p.y < self.y + self.height
    }
}

/// The mode-specific state of a card.
pub enum RevealKind {
    Scratch(ScratchCard),
    Hover(HoverReveal),
    Click(ClickReveal),
}

/// A reveal card in one of the three modes, with its on-screen placement.
pub struct RevealEngine {
    kind: RevealKind,
    viewport: Option<Viewport>,
}

impl RevealEngine {
    pub fn new(config: &RevealConfig) -> Self {
        let kind = match config.mode {
            RevealMode::Scratch => RevealKind::Scratch(ScratchCard::new(config)),
            RevealMode::Hover => RevealKind::Hover(HoverReveal::default()),
            RevealMode::Click => RevealKind::Click(ClickReveal::default()),
        };
        Self {
            kind,
            viewport: None,
        }
    }

    pub fn mode(&self) -> RevealMode {
        match self.kind {
            RevealKind::Scratch(_) => RevealMode::Scratch,
            RevealKind::Hover(_) => RevealMode::Hover,
            RevealKind::Click(_) => RevealMode::Click,
        }
    }

    pub fn kind(&self) -> &RevealKind {
        &self.kind
    }

    /// The scratch card, when in scratch mode.
    pub fn scratch(&self) -> Option<&ScratchCard> {
        match &self.kind {
            RevealKind::Scratch(card) => Some(card),
            _ => None,
        }
    }

    pub fn on_reveal(&mut self, callback: impl FnMut() + 'static) {
        match &mut self.kind {
            RevealKind::Scratch(card) => card.on_reveal(callback),
            RevealKind::Hover(hover) => hover.on_reveal(callback),
            RevealKind::Click(click) => click.on_reveal(callback),
        }
    }

    /// Prepare the card at the container's size in surface pixels.
    pub fn mount(&mut self, width: u32, height: u32) {
        if let RevealKind::Scratch(card) = &mut self.kind {
            card.mount(width, height);
        }
    }

    /// Rebuild the card when `token` changed.
    pub fn reset(&mut self, token: u64, width: u32, height: u32) -> bool {
        match &mut self.kind {
            RevealKind::Scratch(card) => card.reset(token, width, height),
            RevealKind::Hover(hover) => hover.reset(token),
            RevealKind::Click(click) => click.reset(token),
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        if let RevealKind::Scratch(card) = &mut self.kind {
            card.set_viewport(viewport);
        }
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Without a known placement every point counts as inside.
    fn hit(&self, p: Point) -> bool {
        self.viewport.map_or(true, |v| v.contains(p))
    }

    /// Pointer pressed at a screen point.
    pub fn pointer_down(&mut self, p: Point) -> bool {
        if !self.hit(p) {
            return false;
        }
        match &mut self.kind {
            RevealKind::Scratch(card) => card.pointer_down(p),
            RevealKind::Click(click) => click.tap(),
            RevealKind::Hover(hover) => hover.pointer_enter(),
        }
    }

    /// Pointer moved, with or without a button held.
    pub fn pointer_move(&mut self, p: Point) -> bool {
        let inside = self.hit(p);
        match &mut self.kind {
            RevealKind::Scratch(card) => card.pointer_move(p),
            RevealKind::Hover(hover) if inside => hover.pointer_enter(),
            RevealKind::Hover(hover) => {
                hover.pointer_leave();
                false
            }
            RevealKind::Click(_) => false,
        }
    }

    pub fn pointer_up(&mut self) -> bool {
        match &mut self.kind {
            RevealKind::Scratch(card) => card.pointer_up(),
            RevealKind::Hover(_) | RevealKind::Click(_) => false,
        }
    }

    /// Pointer left the screen or input was interrupted.
    pub fn pointer_leave(&mut self) -> bool {
        match &mut self.kind {
            RevealKind::Scratch(card) => card.pointer_cancel(),
            RevealKind::Hover(hover) => {
                hover.pointer_leave();
                false
            }
            RevealKind::Click(_) => false,
        }
    }

    /// Whether the hidden content is currently showing.
    pub fn is_uncovered(&self) -> bool {
        match &self.kind {
            RevealKind::Scratch(card) => card.has_fired(),
            RevealKind::Hover(hover) => hover.is_hovering(),
            RevealKind::Click(click) => click.is_revealed(),
        }
    }

    pub fn has_fired(&self) -> bool {
        match &self.kind {
            RevealKind::Scratch(card) => card.has_fired(),
            RevealKind::Hover(hover) => hover.has_fired(),
            RevealKind::Click(click) => click.has_fired(),
        }
    }

    pub fn teardown(&mut self) {
        match &mut self.kind {
            RevealKind::Scratch(card) => card.teardown(),
            RevealKind::Hover(hover) => hover.teardown(),
            RevealKind::Click(click) => click.teardown(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(mode: RevealMode) -> RevealEngine {
        let mut engine = RevealEngine::new(&RevealConfig {
            mode,
            ..Default::default()
        });
        engine.set_viewport(Viewport::new(10.0, 10.0, 20.0, 5.0));
        engine
    }

    #[test]
    fn test_viewport_contains() {
        let vp = Viewport::new(10.0, 10.0, 20.0, 5.0);
        assert!(vp.contains(Point::new(10.0, 10.0)));
        assert!(vp.contains(Point::new(29.9, 14.9)));
        assert!(!vp.contains(Point::new(30.0, 12.0)));
        assert!(!vp.contains(Point::new(9.9, 12.0)));
    }

    #[test]
    fn test_click_outside_is_ignored() {
        let mut e = engine(RevealMode::Click);
        assert!(!e.pointer_down(Point::new(0.0, 0.0)));
        assert!(!e.is_uncovered());
        assert!(e.pointer_down(Point::new(12.0, 12.0)));
        assert!(e.is_uncovered());
        assert!(!e.pointer_down(Point::new(12.0, 12.0)));
        assert!(!e.is_uncovered());
        assert!(e.has_fired());
    }

    #[test]
    fn test_hover_tracks_enter_and_leave() {
        let mut e = engine(RevealMode::Hover);
        assert!(!e.pointer_move(Point::new(0.0, 0.0)));
        assert!(e.pointer_move(Point::new(15.0, 12.0)));
        assert!(e.is_uncovered());
        assert!(!e.pointer_move(Point::new(16.0, 12.0)));
        e.pointer_move(Point::new(50.0, 50.0));
        assert!(!e.is_uncovered());
        assert!(e.has_fired());
    }

    #[test]
    fn test_scratch_needs_mount_and_inside_press() {
        let mut e = engine(RevealMode::Scratch);
        assert!(e.scratch().is_some());
        e.mount(80, 40);
        assert!(!e.pointer_down(Point::new(0.0, 0.0)));
        assert_eq!(e.scratch().map(|c| c.erase_ops()), Some(0));
        e.pointer_down(Point::new(20.0, 12.0));
        assert_eq!(e.scratch().map(|c| c.erase_ops()), Some(1));
        e.pointer_up();
    }

    #[test]
    fn test_mode_reported() {
        assert_eq!(engine(RevealMode::Hover).mode(), RevealMode::Hover);
        assert!(engine(RevealMode::Click).scratch().is_none());
    }
}
