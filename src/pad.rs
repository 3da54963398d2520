//! Virtual pads and their 6-bit code.
//!
//! Bit layout (bit set = pressed):
//!
//! | bit | control |
//! |-----|---------|
//! | 0   | Up      |
//! | 1   | Down    |
//! | 2   | Left    |
//! | 3   | Right   |
//! | 4   | Button1 |
//! | 5   | Button2 |
//!
//! Bits 6 and 7 are always zero. This is the on-wire layout for the hardware
//! link and must not change.

use crate::binding::{Binding, Control};
use crate::keyboard::KeyboardState;
use crate::snapshot::DeviceCache;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of virtual pads.
pub const PAD_COUNT: usize = 2;

/// Packed digital state of one pad.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PadBits(u8);

impl PadBits {
    pub const MASK: u8 = 0b0011_1111;

    /// Pack six flags given in [`Control::ALL`] order.
    pub fn pack(pressed: [bool; Control::COUNT]) -> Self {
        let bits = pressed
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, &on)| acc | ((on as u8) << i));
        PadBits(bits)
    }

    /// Keeps only the six defined bits.
    pub fn from_raw(raw: u8) -> Self {
        PadBits(raw & Self::MASK)
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_pressed(self, control: Control) -> bool {
        self.0 & (1 << control.index()) != 0
    }
}

impl fmt::Display for PadBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Six binding slots, one per control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualPad {
    bindings: [Binding; Control::COUNT],
}

impl VirtualPad {
    pub fn new(bindings: [Binding; Control::COUNT]) -> Self {
        Self {
            bindings: bindings.map(Binding::normalized),
        }
    }

    pub fn binding(&self, control: Control) -> &Binding {
        &self.bindings[control.index()]
    }

    /// Replace a slot wholesale. Axis thresholds are rounded to stored
    /// precision.
    pub fn set_binding(&mut self, control: Control, binding: Binding) {
        self.bindings[control.index()] = binding.normalized();
    }

    pub fn clear(&mut self, control: Control) {
        self.set_binding(control, Binding::None);
    }

    /// `(control, binding)` pairs in bit order.
    pub fn bindings(&self) -> impl Iterator<Item = (Control, &Binding)> {
        Control::ALL.into_iter().zip(self.bindings.iter())
    }

    /// Sample all six bindings and pack them.
    pub fn sample(&self, devices: &DeviceCache, keyboard: &KeyboardState) -> PadBits {
        PadBits::pack(self.bindings.map(|b| b.sample(devices, keyboard)))
    }
}
