//! Integration tests for the reveal engine.

use std::cell::Cell;
use std::rc::Rc;

use letterdesk::reveal::config::{RevealConfig, RevealMode};
use letterdesk::reveal::scratch::{ScratchCard, ScratchPhase};
use letterdesk::reveal::surface::Point;
use letterdesk::reveal::{RevealEngine, Viewport};

fn counting(card: &mut ScratchCard) -> Rc<Cell<u32>> {
    let fired = Rc::new(Cell::new(0));
    let counter = Rc::clone(&fired);
    card.on_reveal(move || counter.set(counter.get() + 1));
    fired
}

// ─── Test 1: Threshold is crossed at exactly 40% of 300x200 ─────────

#[test]
fn test_threshold_boundary_fires_once() {
    let config = RevealConfig::default();
    assert_eq!(config.threshold, 0.4);
    let mut card = ScratchCard::with_seed(&config, 1);
    let fired = counting(&mut card);
    card.mount(300, 200);

    // 79 full rows plus 299 pixels: one short of 24,000
    card.surface_mut().erase_rect(0, 0, 300, 79);
    card.surface_mut().erase_rect(0, 79, 299, 1);
    assert_eq!(card.surface().erased_count(), 23_999);
    assert!(!card.check_reveal());
    assert_eq!(fired.get(), 0);

    card.surface_mut().erase_rect(299, 79, 1, 1);
    assert_eq!(card.surface().erased_count(), 24_000);
    assert!(card.check_reveal());
    assert_eq!(fired.get(), 1);
    assert_eq!(card.phase(), ScratchPhase::Revealed);

    // Further erasure never fires again
    card.surface_mut().erase_rect(0, 100, 300, 100);
    assert!(!card.check_reveal());
    assert_eq!(fired.get(), 1);
}

// ─── Test 2: A reset with a new token rearms the card ───────────────

#[test]
fn test_reset_rearms_and_keeps_callback() {
    let mut card = ScratchCard::with_seed(&RevealConfig::default(), 2);
    let fired = counting(&mut card);
    assert!(card.reset(1, 100, 50));
    card.surface_mut().erase_rect(0, 0, 100, 50);
    assert!(card.check_reveal());

    assert!(!card.reset(1, 100, 50));
    assert!(card.has_fired());

    assert!(card.reset(2, 100, 50));
    assert!(!card.has_fired());
    assert_eq!(card.surface().erased_count(), 0);
    card.surface_mut().erase_rect(0, 0, 100, 50);
    assert!(card.check_reveal());
    assert_eq!(fired.get(), 2);
}

// ─── Test 3: Refused mask snapshot leaves scratching intact ─────────

#[test]
fn test_refused_mask_still_reveals() {
    let config = RevealConfig {
        mask_pixel_limit: 100,
        brush_size: 40.0,
        ..Default::default()
    };
    let mut card = ScratchCard::with_seed(&config, 3);
    card.mount(40, 20);
    assert!(card.mask().is_none());

    card.pointer_down(Point::new(0.0, 10.0));
    for x in 1..=40 {
        card.pointer_move(Point::new(x as f32, 10.0));
    }
    card.pointer_up();
    assert!(card.has_fired());
    assert!(card.mask().is_none());
}

// ─── Test 4: Screen points are scaled into surface pixels ───────────

#[test]
fn test_viewport_scaling() {
    let mut card = ScratchCard::with_seed(&RevealConfig::default(), 4);
    card.mount(300, 200);
    card.set_viewport(Viewport::new(10.0, 5.0, 150.0, 100.0));
    let p = card.to_surface(Point::new(85.0, 55.0));
    assert_eq!((p.x, p.y), (150.0, 100.0));
}

// ─── Test 5: Input before mount is ignored ──────────────────────────

#[test]
fn test_input_before_mount_is_ignored() {
    let mut card = ScratchCard::with_seed(&RevealConfig::default(), 5);
    assert!(!card.pointer_down(Point::new(1.0, 1.0)));
    assert!(!card.is_stroking());
    assert!(!card.check_reveal());
    assert_eq!(card.phase(), ScratchPhase::Uninitialized);
}

// ─── Test 6: Hover and click modes through the engine ───────────────

#[test]
fn test_hover_engine_fires_on_first_enter_only() {
    let config = RevealConfig {
        mode: RevealMode::Hover,
        ..Default::default()
    };
    let mut engine = RevealEngine::new(&config);
    engine.reset(1, 0, 0);
    engine.set_viewport(Viewport::new(0.0, 0.0, 10.0, 10.0));

    assert!(!engine.pointer_move(Point::new(20.0, 20.0)));
    assert!(engine.pointer_move(Point::new(5.0, 5.0)));
    assert!(engine.is_uncovered());
    assert!(!engine.pointer_leave());
    assert!(!engine.is_uncovered());
    assert!(!engine.pointer_move(Point::new(5.0, 5.0)));
    assert!(engine.has_fired());
}

#[test]
fn test_click_engine_toggles_and_fires_once() {
    let config = RevealConfig {
        mode: RevealMode::Click,
        ..Default::default()
    };
    let mut engine = RevealEngine::new(&config);
    let p = Point::new(1.0, 1.0);
    assert!(engine.pointer_down(p));
    assert!(engine.is_uncovered());
    assert!(!engine.pointer_down(p));
    assert!(!engine.is_uncovered());
    assert!(!engine.pointer_down(p));
    assert!(engine.is_uncovered());
}
