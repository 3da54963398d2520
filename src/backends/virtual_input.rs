//! Scriptable in-memory devices.
//!
//! [`VirtualDevice`] holds a raw button/axis layout and, optionally, a gamepad
//! abstraction. Tests and demos plug them into a
//! [`DeviceSlots`](crate::device::DeviceSlots) and flip inputs between ticks.

use crate::device::{Device, DeviceReading, GamepadState, GAMEPAD_AXIS_COUNT, GAMEPAD_BUTTON_COUNT};

#[derive(Clone, Debug, Default)]
pub struct VirtualDevice {
    name: String,
    buttons: Vec<bool>,
    axes: Vec<f32>,
    gamepad: Option<GamepadState>,
    gamepad_read_fails: bool,
}

impl VirtualDevice {
    /// A raw joystick without the gamepad abstraction.
    pub fn joystick(name: &str, buttons: usize, axes: usize) -> Self {
        Self {
            name: name.to_string(),
            buttons: vec![false; buttons],
            axes: vec![0.0; axes],
            gamepad: None,
            gamepad_read_fails: false,
        }
    }

    /// A recognized gamepad with the given raw layout.
    pub fn gamepad(name: &str, buttons: usize, axes: usize) -> Self {
        Self {
            gamepad: Some(GamepadState::default()),
            ..Self::joystick(name, buttons, axes)
        }
    }

    /// Raw button `button` held. Out-of-range indices are ignored.
    pub fn press_button(&mut self, button: usize) {
        if let Some(b) = self.buttons.get_mut(button) {
            *b = true;
        }
    }

    pub fn release_button(&mut self, button: usize) {
        if let Some(b) = self.buttons.get_mut(button) {
            *b = false;
        }
    }

    pub fn set_axis(&mut self, axis: usize, value: f32) {
        if let Some(a) = self.axes.get_mut(axis) {
            *a = value;
        }
    }

    /// Gamepad-abstraction button. No-op on plain joysticks.
    pub fn press_gamepad_button(&mut self, button: usize) {
        self.set_gamepad_button(button, true);
    }

    pub fn release_gamepad_button(&mut self, button: usize) {
        self.set_gamepad_button(button, false);
    }

    fn set_gamepad_button(&mut self, button: usize, held: bool) {
        if button >= GAMEPAD_BUTTON_COUNT {
            return;
        }
        if let Some(pad) = self.gamepad.as_mut() {
            pad.buttons[button] = held;
        }
    }

    pub fn set_gamepad_axis(&mut self, axis: usize, value: f32) {
        if axis >= GAMEPAD_AXIS_COUNT {
            return;
        }
        if let Some(pad) = self.gamepad.as_mut() {
            pad.axes[axis] = value;
        }
    }

    /// Change the raw layout, as when a different controller takes the slot.
    /// All raw inputs return to rest.
    pub fn reshape(&mut self, buttons: usize, axes: usize) {
        self.buttons = vec![false; buttons];
        self.axes = vec![0.0; axes];
    }

    /// Make gamepad reads fail while the device stays connected.
    pub fn set_gamepad_read_failing(&mut self, failing: bool) {
        self.gamepad_read_fails = failing;
    }
}

impl Device for VirtualDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn poll(&mut self) -> DeviceReading {
        DeviceReading {
            is_gamepad: self.gamepad.is_some(),
            buttons: self.buttons.clone(),
            axes: self.axes.clone(),
            gamepad: if self.gamepad_read_fails {
                None
            } else {
                self.gamepad
            },
        }
    }
}
