//! Bindings: one physical input read as a digital on/off.
//!
//! A [`Binding`] names a single source (a key, a gamepad button, one direction
//! of a gamepad axis, or the raw-joystick equivalents) and knows how to sample
//! it against the current frame. Sampling never fails: a missing device, a
//! device without the gamepad abstraction, or an out-of-range index all read
//! as "not pressed".

use crate::device::{DeviceId, GAMEPAD_AXIS_COUNT, GAMEPAD_BUTTON_COUNT};
use crate::keyboard::{KeyCode, KeyboardState};
use crate::snapshot::DeviceCache;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Threshold given to axis bindings produced by learning.
pub const DEFAULT_AXIS_THRESHOLD: f32 = 0.45;

/// Round an axis threshold to the six decimals the mapping file stores.
/// Values already at that precision come back unchanged.
pub fn stored_threshold(threshold: f32) -> f32 {
    format!("{threshold:.6}").parse().unwrap_or(threshold)
}

/// The six controls of a virtual pad, in bit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Button1,
    Button2,
}

impl Control {
    pub const COUNT: usize = 6;

    pub const ALL: [Control; Control::COUNT] = [
        Control::Up,
        Control::Down,
        Control::Left,
        Control::Right,
        Control::Button1,
        Control::Button2,
    ];

    /// Position in the fixed enumeration; also the bit index in a pad code.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Control::Up => "Up",
            Control::Down => "Down",
            Control::Left => "Left",
            Control::Right => "Right",
            Control::Button1 => "B1",
            Control::Button2 => "B2",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Which half of an axis counts as "pressed".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisDirection {
    Negative,
    Positive,
}

impl AxisDirection {
    /// `-1` or `+1`, as stored in mapping files.
    pub fn sign(self) -> i32 {
        match self {
            AxisDirection::Negative => -1,
            AxisDirection::Positive => 1,
        }
    }

    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign {
            -1 => Some(AxisDirection::Negative),
            1 => Some(AxisDirection::Positive),
            _ => None,
        }
    }

    /// `value < -threshold` for negative, `value > threshold` for positive.
    #[inline]
    pub fn exceeds(self, value: f32, threshold: f32) -> bool {
        match self {
            AxisDirection::Negative => value < -threshold,
            AxisDirection::Positive => value > threshold,
        }
    }

    fn arrow(self) -> &'static str {
        match self {
            AxisDirection::Negative => "<-",
            AxisDirection::Positive => "->",
        }
    }
}

/// One physical input source interpreted as on/off.
///
/// `None` is the cleared state and never reads as pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Binding {
    #[default]
    None,
    Key {
        key: KeyCode,
    },
    GamepadButton {
        device: DeviceId,
        button: u8,
    },
    GamepadAxis {
        device: DeviceId,
        axis: u8,
        direction: AxisDirection,
        threshold: f32,
    },
    JoyButton {
        device: DeviceId,
        button: u16,
    },
    JoyAxis {
        device: DeviceId,
        axis: u16,
        direction: AxisDirection,
        threshold: f32,
    },
}

impl Binding {
    pub fn key(key: KeyCode) -> Self {
        Binding::Key { key }
    }

    /// The same binding with its axis threshold at stored precision.
    pub fn normalized(self) -> Self {
        match self {
            Binding::GamepadAxis {
                device,
                axis,
                direction,
                threshold,
            } => Binding::GamepadAxis {
                device,
                axis,
                direction,
                threshold: stored_threshold(threshold),
            },
            Binding::JoyAxis {
                device,
                axis,
                direction,
                threshold,
            } => Binding::JoyAxis {
                device,
                axis,
                direction,
                threshold: stored_threshold(threshold),
            },
            other => other,
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Binding::None)
    }

    /// Device slot the binding reads from, if any.
    pub fn device(&self) -> Option<DeviceId> {
        match *self {
            Binding::None | Binding::Key { .. } => None,
            Binding::GamepadButton { device, .. }
            | Binding::GamepadAxis { device, .. }
            | Binding::JoyButton { device, .. }
            | Binding::JoyAxis { device, .. } => Some(device),
        }
    }

    /// Read the binding against this frame's state.
    pub fn sample(&self, devices: &DeviceCache, keyboard: &KeyboardState) -> bool {
        match *self {
            Binding::None => false,
            Binding::Key { key } => keyboard.is_down(key),
            Binding::GamepadButton { device, button } => {
                let button = button as usize;
                button < GAMEPAD_BUTTON_COUNT
                    && devices
                        .gamepad(device)
                        .is_some_and(|pad| pad.buttons[button])
            }
            Binding::GamepadAxis {
                device,
                axis,
                direction,
                threshold,
            } => {
                let axis = axis as usize;
                axis < GAMEPAD_AXIS_COUNT
                    && devices
                        .gamepad(device)
                        .is_some_and(|pad| direction.exceeds(pad.axes[axis], threshold))
            }
            Binding::JoyButton { device, button } => devices
                .device(device)
                .and_then(|snap| snap.buttons().get(button as usize))
                .copied()
                .unwrap_or(false),
            Binding::JoyAxis {
                device,
                axis,
                direction,
                threshold,
            } => devices
                .device(device)
                .and_then(|snap| snap.axes().get(axis as usize))
                .is_some_and(|&value| direction.exceeds(value, threshold)),
        }
    }
}

impl fmt::Display for Binding {
    /// Stable, human-readable form for on-screen display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Binding::None => f.write_str("None"),
            Binding::Key { key } => write!(f, "Key({key})"),
            Binding::GamepadButton { device, button } => {
                write!(f, "GP(jid={device}) Btn({button})")
            }
            Binding::GamepadAxis {
                device,
                axis,
                direction,
                threshold,
            } => write!(
                f,
                "GP(jid={device}) Axis({axis}){}{threshold:.2}",
                direction.arrow()
            ),
            Binding::JoyButton { device, button } => {
                write!(f, "Joy(jid={device}) Btn({button})")
            }
            Binding::JoyAxis {
                device,
                axis,
                direction,
                threshold,
            } => write!(
                f,
                "Joy(jid={device}) Axis({axis}){}{threshold:.2}",
                direction.arrow()
            ),
        }
    }
}
