//! Edge-triggered button events.
//!
//! Raw keyboard signals repeat: holding a key makes the OS emit key-down over
//! and over.  [`KeyEdgeState`] remembers the last logical level of every
//! button and only reports a change of level, so one physical press becomes
//! exactly one `Down` event followed by exactly one `Up` event.

use crate::domain::buttons::Button;

/// Direction of a button transition.
///
/// The discriminant is the value the peer expects in the request path
/// (`0` = released, `1` = pressed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Polarity {
    Up = 0,
    Down = 1,
}

impl Polarity {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Polarity::Up),
            1 => Some(Polarity::Down),
            _ => None,
        }
    }
}

/// One button transition waiting to be sent to the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutboundEvent {
    pub polarity: Polarity,
    pub button: Button,
}

impl OutboundEvent {
    pub const fn new(polarity: Polarity, button: Button) -> Self {
        Self { polarity, button }
    }

    pub const fn down(button: Button) -> Self {
        Self::new(Polarity::Down, button)
    }

    pub const fn up(button: Button) -> Self {
        Self::new(Polarity::Up, button)
    }

    pub const fn bitmask(&self) -> u8 {
        self.button.bitmask()
    }
}

/// Last-known logical level per button.  Every button starts `Up`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEdgeState {
    down: [bool; 8],
}

impl KeyEdgeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level of `button`.
    pub fn level(&self, button: Button) -> Polarity {
        if self.down[button.index()] {
            Polarity::Down
        } else {
            Polarity::Up
        }
    }

    /// Applies a raw signal.  Returns the event to emit when the level
    /// changes, `None` when the signal repeats the current level.
    pub fn apply(&mut self, button: Button, signal: Polarity) -> Option<OutboundEvent> {
        if self.level(button) == signal {
            return None;
        }
        self.down[button.index()] = signal == Polarity::Down;
        Some(OutboundEvent::new(signal, button))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
