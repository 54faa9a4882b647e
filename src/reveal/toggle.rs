//! Hover and click reveals: boolean toggles without pixel tracking.

use super::RevealLatch;

/// Uncovered while the pointer is over the card.
#[derive(Default)]
pub struct HoverReveal {
    hovering: bool,
    token: Option<u64>,
    latch: RevealLatch,
}

impl HoverReveal {
    pub fn on_reveal(&mut self, callback: impl FnMut() + 'static) {
        self.latch.set_callback(callback);
    }

    /// Pointer entered. Fires on the first enter of the instance.
    pub fn pointer_enter(&mut self) -> bool {
        if self.hovering {
            return false;
        }
        self.hovering = true;
        self.latch.fire()
    }

    pub fn pointer_leave(&mut self) {
        self.hovering = false;
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn has_fired(&self) -> bool {
        self.latch.has_fired()
    }

    pub fn reset(&mut self, token: u64) -> bool {
        if self.token == Some(token) {
            return false;
        }
        self.token = Some(token);
        self.hovering = false;
        self.latch.rearm();
        true
    }

    pub fn teardown(&mut self) {
        self.hovering = false;
        self.latch.clear_callback();
    }
}

/// Toggled by each tap; fires on the first transition into revealed.
#[derive(Default)]
pub struct ClickReveal {
    revealed: bool,
    token: Option<u64>,
    latch: RevealLatch,
}

impl ClickReveal {
    pub fn on_reveal(&mut self, callback: impl FnMut() + 'static) {
        self.latch.set_callback(callback);
    }

    /// Flip the revealed flag. Returns `true` if this tap fired the reveal.
    pub fn tap(&mut self) -> bool {
        self.revealed = !self.revealed;
        self.revealed && self.latch.fire()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn has_fired(&self) -> bool {
        self.latch.has_fired()
    }

    pub fn reset(&mut self, token: u64) -> bool {
        if self.token == Some(token) {
            return false;
        }
        self.token = Some(token);
        self.revealed = false;
        self.latch.rearm();
        true
    }

    pub fn teardown(&mut self) {
        self.latch.clear_callback();
    }
}
