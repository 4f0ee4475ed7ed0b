use std::fmt;

/// Number of keys on the hexadecimal keypad.
pub const NUM_KEYS: usize = 16;

/// Pressed state of the 16-key keypad, indexed by logical key code 0x0-0xF.
///
/// The mapping from physical keys to logical codes belongs to the input
/// collaborator; the interpreter only ever sees down/up transitions.
pub struct Keyboard {
    pressed: [bool; NUM_KEYS],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            pressed: [false; NUM_KEYS],
        }
    }

    /// Records a key transition. Key codes outside 0x0-0xF are ignored.
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        if let Some(slot) = self.pressed.get_mut(usize::from(key)) {
            *slot = pressed;
        }
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.pressed
            .get(usize::from(key))
            .copied()
            .unwrap_or(false)
    }

    /// The lowest-indexed key currently held down, if any.
    pub fn first_pressed(&self) -> Option<u8> {
        self.pressed.iter().position(|&down| down).map(|key| key as u8)
    }
}

impl fmt::Display for Keyboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.pressed.map(|k| if k { "o" } else { " " }).join("")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_none, assert_some_eq};

    #[test]
    fn test_set_key() {
        let mut keyboard = Keyboard::new();

        keyboard.set_key(0x4, true);
        assert!(keyboard.is_pressed(0x4));
        assert!(!keyboard.is_pressed(0x5));

        keyboard.set_key(0x4, false);
        assert!(!keyboard.is_pressed(0x4));
    }

    #[test]
    fn test_out_of_range_keys_are_ignored() {
        let mut keyboard = Keyboard::new();

        keyboard.set_key(16, true);
        keyboard.set_key(0xFF, true);

        assert!(!keyboard.is_pressed(16));
        assert!(!keyboard.is_pressed(0xFF));
        assert_none!(keyboard.first_pressed());
    }

    #[test]
    fn test_first_pressed_is_lowest_indexed() {
        let mut keyboard = Keyboard::new();

        assert_none!(keyboard.first_pressed());

        keyboard.set_key(0xB, true);
        keyboard.set_key(0x3, true);

        assert_some_eq!(keyboard.first_pressed(), 0x3);

        keyboard.set_key(0x3, false);
        assert_some_eq!(keyboard.first_pressed(), 0xB);
    }
}
