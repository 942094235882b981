//! Long-press vs tap disambiguation for action buttons.
//!
//! This is input-layer plumbing, deliberately outside the engine: the engine
//! only exposes `record_action` (tap) and `toggle_action_timing` (hold).
//! A press released before the 600 ms threshold yields exactly one
//! [`Gesture::Tap`]; a press held to the threshold yields exactly one
//! [`Gesture::Hold`] and suppresses the tap. `cancel()` (pointer left the
//! button) ends the cycle with no gesture.

use chrono::{DateTime, Utc};

use crate::taxonomy::ActionId;

/// Hold threshold in milliseconds.
pub const LONG_PRESS_MS: i64 = 600;

/// Outcome of one press-release cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Short press: map to `record_action`.
    Tap(ActionId),
    /// Held past the threshold: map to `toggle_action_timing`.
    Hold(ActionId),
}

/// Per-input-surface press tracker. One instance per pointer is enough;
/// presses on a second button implicitly end the first cycle.
#[derive(Debug, Default)]
pub struct PressTracker {
    pressed: Option<Press>,
}

#[derive(Debug)]
struct Press {
    action: ActionId,
    at: DateTime<Utc>,
    hold_fired: bool,
}

impl PressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer went down on an action button.
    pub fn press(&mut self, action: ActionId, now: DateTime<Utc>) {
        self.pressed = Some(Press {
            action,
            at: now,
            hold_fired: false,
        });
    }

    /// Call periodically while a press is held. Fires the hold gesture once
    /// when the threshold elapses.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<Gesture> {
        let press = self.pressed.as_mut()?;
        if press.hold_fired || elapsed_ms(press.at, now) < LONG_PRESS_MS {
            return None;
        }
        press.hold_fired = true;
        Some(Gesture::Hold(press.action))
    }

    /// Pointer went up. A short press taps; a long press that already fired
    /// (or fires right now, if `poll` never ran) yields nothing further
    /// beyond the single hold gesture.
    pub fn release(&mut self, now: DateTime<Utc>) -> Option<Gesture> {
        let press = self.pressed.take()?;
        if press.hold_fired {
            return None;
        }
        if elapsed_ms(press.at, now) >= LONG_PRESS_MS {
            Some(Gesture::Hold(press.action))
        } else {
            Some(Gesture::Tap(press.action))
        }
    }

    /// Pointer left the button: abandon the cycle.
    pub fn cancel(&mut self) {
        self.pressed = None;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.is_some()
    }
}

fn elapsed_ms(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    to.signed_duration_since(from).num_milliseconds()
}
