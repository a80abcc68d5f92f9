//! Joypad buttons and the physical key table.
//!
//! The remote peer numbers its joypad buttons as one-hot bits, and the
//! request path carries that number verbatim, so the discriminants below must
//! match the peer's enum bit for bit:
//!
//! | Key (DOM `code`) | Button   | Bit    |
//! |------------------|----------|--------|
//! | `ArrowRight`     | Right    | `0x01` |
//! | `ArrowLeft`      | Left     | `0x02` |
//! | `ArrowUp`        | Up       | `0x04` |
//! | `ArrowDown`      | Down     | `0x08` |
//! | `KeyA`           | A        | `0x10` |
//! | `KeyB`           | B        | `0x20` |
//! | `KeyF`           | Select   | `0x40` |
//! | `Space`          | Start    | `0x80` |
//!
//! Any other key code is not part of the table and is ignored by the input
//! path.

/// A joypad button, encoded as its one-hot bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Button {
    Right = 0x01,
    Left = 0x02,
    Up = 0x04,
    Down = 0x08,
    A = 0x10,
    B = 0x20,
    Select = 0x40,
    Start = 0x80,
}

impl Button {
    /// All buttons in bit order.
    pub const ALL: [Button; 8] = [
        Button::Right,
        Button::Left,
        Button::Up,
        Button::Down,
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
    ];

    /// The one-hot bitmask sent to the peer.
    pub const fn bitmask(self) -> u8 {
        self as u8
    }

    /// Position of the set bit, `0..8`.  Used to index per-button state.
    pub const fn index(self) -> usize {
        (self as u8).trailing_zeros() as usize
    }

    /// Looks up a button by its bitmask.
    pub fn from_bitmask(bitmask: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.bitmask() == bitmask)
    }
}

/// The static key-to-button table.
pub struct ButtonMap;

impl ButtonMap {
    /// Maps a physical key identifier (`KeyboardEvent.code` spelling) to a
    /// button.  Returns `None` for keys outside the table.
    pub fn lookup(code: &str) -> Option<Button> {
        match code {
            "KeyA" => Some(Button::A),
            "KeyB" => Some(Button::B),
            "KeyF" => Some(Button::Select),
            "Space" => Some(Button::Start),
            "ArrowRight" => Some(Button::Right),
            "ArrowLeft" => Some(Button::Left),
            "ArrowUp" => Some(Button::Up),
            "ArrowDown" => Some(Button::Down),
            _ => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_remote_numbering() {
        assert_eq!(ButtonMap::lookup("KeyA").map(Button::bitmask), Some(0x10));
        assert_eq!(ButtonMap::lookup("KeyB").map(Button::bitmask), Some(0x20));
        assert_eq!(ButtonMap::lookup("KeyF").map(Button::bitmask), Some(0x40));
        assert_eq!(ButtonMap::lookup("Space").map(Button::bitmask), Some(0x80));
        assert_eq!(ButtonMap::lookup("ArrowRight").map(Button::bitmask), Some(0x01));
        assert_eq!(ButtonMap::lookup("ArrowLeft").map(Button::bitmask), Some(0x02));
        assert_eq!(ButtonMap::lookup("ArrowUp").map(Button::bitmask), Some(0x04));
        assert_eq!(ButtonMap::lookup("ArrowDown").map(Button::bitmask), Some(0x08));
    }

    #[test]
    fn test_unrecognised_keys_are_not_mapped() {
        for code in ["KeyC", "Enter", "keya", "", "ShiftLeft", "Digit1"] {
            assert_eq!(ButtonMap::lookup(code), None, "{code} must not map");
        }
    }

    #[test]
    fn test_bitmasks_are_distinct_single_bits() {
        let mut seen = 0u8;
        for button in Button::ALL {
            let bit = button.bitmask();
            assert_eq!(bit.count_ones(), 1);
            assert_eq!(seen & bit, 0, "{button:?} overlaps another button");
            seen |= bit;
        }
        assert_eq!(seen, 0xFF);
    }

    #[test]
    fn test_index_is_bit_position() {
        assert_eq!(Button::Right.index(), 0);
        assert_eq!(Button::Start.index(), 7);
    }

    #[test]
    fn test_from_bitmask() {
        assert_eq!(Button::from_bitmask(0x10), Some(Button::A));
        assert_eq!(Button::from_bitmask(0x03), None);
        assert_eq!(Button::from_bitmask(0), None);
    }
}
