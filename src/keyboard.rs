use std::collections::HashSet;
use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

/// Key's variants are the 16 keys from the CHIP-8's hexadecimal keyboard, and each variant's
/// discriminant is the nibble the interpreter compares against. The recommended key mapping is:
///
/// Keypad                   Keyboard
/// +-+-+-+-+                +-+-+-+-+
/// |1|2|3|C|                |1|2|3|4|
/// +-+-+-+-+                +-+-+-+-+
/// |4|5|6|D|                |Q|W|E|R|
/// +-+-+-+-+       =>       +-+-+-+-+
/// |7|8|9|E|                |A|S|D|F|
/// +-+-+-+-+                +-+-+-+-+
/// |A|0|B|F|                |Z|X|C|V|
/// +-+-+-+-+                +-+-+-+-+
#[repr(u8)]
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum Key {
    Key0 = 0x0,
    Key1 = 0x1,
    Key2 = 0x2,
    Key3 = 0x3,
    Key4 = 0x4,
    Key5 = 0x5,
    Key6 = 0x6,
    Key7 = 0x7,
    Key8 = 0x8,
    Key9 = 0x9,
    A = 0xA,
    B = 0xB,
    C = 0xC,
    D = 0xD,
    E = 0xE,
    F = 0xF,
}

const ALL_KEYS: [Key; 16] = [
    Key::Key0,
    Key::Key1,
    Key::Key2,
    Key::Key3,
    Key::Key4,
    Key::Key5,
    Key::Key6,
    Key::Key7,
    Key::Key8,
    Key::Key9,
    Key::A,
    Key::B,
    Key::C,
    Key::D,
    Key::E,
    Key::F,
];

impl Key {
    pub fn nibble(self) -> u8 {
        self as u8
    }

    pub fn from_nibble(nibble: u8) -> Option<Key> {
        ALL_KEYS.get(nibble as usize).copied()
    }
}

impl TryFrom<u8> for Key {
    type Error = u8;

    fn try_from(nibble: u8) -> Result<Self, Self::Error> {
        Key::from_nibble(nibble).ok_or(nibble)
    }
}

/// Anything that can report which of the 16 keys are currently held down. Implement this over
/// whatever input library the frontend uses.
pub trait AsKeyboard {
    fn keys_down(&self) -> Vec<Key>;
}

/// Tracks which keys are held and the single key the interpreter sees (the latch). Like the
/// original hardware only one key is visible at a time: a new press overwrites the latch.
#[derive(Debug, Default)]
pub struct Keyboard {
    held: HashSet<Key>,
    latch: Option<Key>,
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard::default()
    }

    /// The most recently pressed key that hasn't been released, if any
    pub fn latch(&self) -> Option<Key> {
        self.latch
    }

    /// Set the latch directly, bypassing the held-key tracking
    pub fn set_latch(&mut self, key: Option<Key>) {
        self.latch = key;
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
        self.latch = Some(key);
    }

    /// Releasing the latched key empties the latch, even if other keys are still held
    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
        if self.latch == Some(key) {
            self.latch = None;
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Given the keys currently down on the system keyboard, fire the appropriate
    /// press and release handlers
    pub fn update_with_keys(&mut self, keys_down: &[Key]) {
        let set: HashSet<Key> = keys_down.iter().copied().collect();

        // releases first, so a key pressed in the same poll ends up in the latch
        for key in ALL_KEYS.iter().copied() {
            if !set.contains(&key) && self.is_held(key) {
                self.release(key);
            }
        }
        for key in keys_down.iter().copied() {
            if !self.is_held(key) {
                self.press(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nibble_round_trip() {
        for nibble in 0..16u8 {
            assert_eq!(Key::from_nibble(nibble).unwrap().nibble(), nibble);
        }
        assert_eq!(Key::from_nibble(0x10), None);
        assert_eq!(Key::try_from(0xFFu8), Err(0xFF));
        assert_eq!(Key::try_from(0xAu8), Ok(Key::A));
    }

    #[test]
    fn press_and_release() {
        let mut keyboard = Keyboard::new();
        assert_eq!(keyboard.latch(), None);

        keyboard.press(Key::Key5);
        assert_eq!(keyboard.latch(), Some(Key::Key5));
        assert!(keyboard.is_held(Key::Key5));

        keyboard.release(Key::Key5);
        assert_eq!(keyboard.latch(), None);
        assert!(!keyboard.is_held(Key::Key5));
    }

    #[test]
    fn second_press_overwrites_latch() {
        let mut keyboard = Keyboard::new();

        keyboard.press(Key::Key1);
        keyboard.press(Key::C);
        assert_eq!(keyboard.latch(), Some(Key::C));

        // releasing the key that is no longer latched leaves the latch alone
        keyboard.release(Key::Key1);
        assert_eq!(keyboard.latch(), Some(Key::C));

        keyboard.release(Key::C);
        assert_eq!(keyboard.latch(), None);
    }

    #[test]
    fn update_with_keys() {
        let mut keyboard = Keyboard::new();

        keyboard.update_with_keys(&[Key::Key1]);
        assert_eq!(keyboard.latch(), Some(Key::Key1));

        // still held, a new key joins it
        keyboard.update_with_keys(&[Key::Key1, Key::F]);
        assert_eq!(keyboard.latch(), Some(Key::F));

        keyboard.update_with_keys(&[Key::Key1]);
        assert_eq!(keyboard.latch(), None);
        assert!(keyboard.is_held(Key::Key1));

        keyboard.update_with_keys(&[]);
        assert_eq!(keyboard.latch(), None);
        assert!(!keyboard.is_held(Key::Key1));
    }

    #[test]
    fn set_latch_directly() {
        let mut keyboard = Keyboard::new();

        keyboard.set_latch(Some(Key::B));
        assert_eq!(keyboard.latch(), Some(Key::B));
        assert!(!keyboard.is_held(Key::B));

        keyboard.set_latch(None);
        assert_eq!(keyboard.latch(), None);
    }
}
