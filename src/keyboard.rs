//! Keyboard key codes and two-frame held state.
//!
//! Key codes follow the GLFW numbering (printable keys use their ASCII value,
//! named keys start at 256). Persisted mapping files store these numbers, so
//! they must stay stable.
//!
//! [`KeyboardState`] keeps the held flag of every key for the current and the
//! previous frame. The UI shell forwards press/release notifications with
//! [`KeyboardState::press`] / [`KeyboardState::release`]; the engine calls
//! [`KeyboardState::latch`] once at the end of every tick.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest valid key code.
pub const KEY_LAST: u16 = 348;

/// Number of tracked key slots (`0..=KEY_LAST`).
pub const KEY_COUNT: usize = KEY_LAST as usize + 1;

/// A keyboard key code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const SPACE: KeyCode = KeyCode(32);
    pub const NUM_1: KeyCode = KeyCode(49);
    pub const NUM_6: KeyCode = KeyCode(54);
    pub const A: KeyCode = KeyCode(65);
    pub const D: KeyCode = KeyCode(68);
    pub const J: KeyCode = KeyCode(74);
    pub const K: KeyCode = KeyCode(75);
    pub const M: KeyCode = KeyCode(77);
    pub const N: KeyCode = KeyCode(78);
    pub const S: KeyCode = KeyCode(83);
    pub const W: KeyCode = KeyCode(87);
    pub const ESCAPE: KeyCode = KeyCode(256);
    pub const TAB: KeyCode = KeyCode(258);
    pub const BACKSPACE: KeyCode = KeyCode(259);
    pub const RIGHT: KeyCode = KeyCode(262);
    pub const LEFT: KeyCode = KeyCode(263);
    pub const DOWN: KeyCode = KeyCode(264);
    pub const UP: KeyCode = KeyCode(265);
    pub const F1: KeyCode = KeyCode(290);
    pub const F2: KeyCode = KeyCode(291);
    pub const F5: KeyCode = KeyCode(294);
    pub const F9: KeyCode = KeyCode(298);

    /// `true` when the code addresses a tracked key slot.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 <= KEY_LAST
    }

    /// Short label for well-known keys.
    fn label(self) -> Option<&'static str> {
        Some(match self {
            KeyCode::SPACE => "Space",
            KeyCode::ESCAPE => "Esc",
            KeyCode::TAB => "Tab",
            KeyCode::BACKSPACE => "Backspace",
            KeyCode::RIGHT => "Right",
            KeyCode::LEFT => "Left",
            KeyCode::DOWN => "Down",
            KeyCode::UP => "Up",
            _ => return None,
        })
    }
}

impl fmt::Display for KeyCode {
    /// Letters and digits print as themselves, a few named keys by name,
    /// everything else by number.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = self.label() {
            return f.write_str(label);
        }
        match u8::try_from(self.0) {
            Ok(b) if b.is_ascii_uppercase() || b.is_ascii_digit() => write!(f, "{}", b as char),
            _ => write!(f, "#{}", self.0),
        }
    }
}

/// Held state of every key for this frame and the previous one.
#[derive(Clone, Debug)]
pub struct KeyboardState {
    down: Box<[bool]>,
    down_prev: Box<[bool]>,
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self {
            down: vec![false; KEY_COUNT].into_boxed_slice(),
            down_prev: vec![false; KEY_COUNT].into_boxed_slice(),
        }
    }
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down notification. Out-of-range codes are ignored.
    pub fn press(&mut self, key: KeyCode) {
        self.set(key, true);
    }

    /// Record a key-up notification. Out-of-range codes are ignored.
    pub fn release(&mut self, key: KeyCode) {
        self.set(key, false);
    }

    pub fn set(&mut self, key: KeyCode, held: bool) {
        if let Some(slot) = self.down.get_mut(key.0 as usize) {
            *slot = held;
        }
    }

    /// Is the key held this frame?
    #[inline]
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.down.get(key.0 as usize).copied().unwrap_or(false)
    }

    /// Held this frame but not the previous one.
    #[inline]
    pub fn pressed_edge(&self, key: KeyCode) -> bool {
        let i = key.0 as usize;
        match (self.down.get(i), self.down_prev.get(i)) {
            (Some(&cur), Some(&prev)) => cur && !prev,
            _ => false,
        }
    }

    /// All keys with a press edge this frame, in ascending code order.
    pub fn pressed_edges(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.down
            .iter()
            .zip(self.down_prev.iter())
            .enumerate()
            .filter(|(_, (&cur, &prev))| cur && !prev)
            .map(|(i, _)| KeyCode(i as u16))
    }

    /// All keys currently held, in ascending code order.
    pub fn held(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.down
            .iter()
            .enumerate()
            .filter(|(_, &held)| held)
            .map(|(i, _)| KeyCode(i as u16))
    }

    /// Close the frame: the current held flags become the previous ones.
    pub fn latch(&mut self) {
        self.down_prev.copy_from_slice(&self.down);
    }
}
