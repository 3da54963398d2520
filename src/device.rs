//! Device polling seam.
//!
//! The engine never talks to an OS input API directly. Whoever owns the event
//! loop supplies a [`DeviceSource`] that answers, for each slot `0..MAX_DEVICES`,
//! "is something connected here, and what does it read right now?".
//!
//! Two views of a device are reported:
//! - the **raw joystick** arrays, whose length depends on the device model, and
//! - the optional **gamepad abstraction** ([`GamepadState`]), a fixed
//!   15-button / 6-axis layout available only for recognized controllers.
//!
//! Raw index `n` and gamepad index `n` are unrelated; nothing here assumes
//! they name the same physical control.

/// Number of device slots the engine tracks.
pub const MAX_DEVICES: usize = 16;

/// Buttons in the gamepad abstraction.
pub const GAMEPAD_BUTTON_COUNT: usize = 15;

/// Axes in the gamepad abstraction.
pub const GAMEPAD_AXIS_COUNT: usize = 6;

/// Slot index of a device (`0..MAX_DEVICES`).
pub type DeviceId = u8;

/// Gamepad-abstraction state of one device.
///
/// Axes are normalized to `[-1.0, 1.0]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GamepadState {
    pub buttons: [bool; GAMEPAD_BUTTON_COUNT],
    pub axes: [f32; GAMEPAD_AXIS_COUNT],
}

/// What a connected device reports for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceReading {
    /// Device is recognized as a standard gamepad.
    pub is_gamepad: bool,
    /// Raw joystick buttons (device-native order).
    pub buttons: Vec<bool>,
    /// Raw joystick axes, roughly `[-1.0, 1.0]`.
    pub axes: Vec<f32>,
    /// Gamepad-abstraction state. `None` when the device is not a gamepad or
    /// the gamepad read failed this frame.
    pub gamepad: Option<GamepadState>,
}

/// One physical input device.
pub trait Device {
    fn name(&self) -> &str;
    fn poll(&mut self) -> DeviceReading;
}

impl<D: Device + ?Sized> Device for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn poll(&mut self) -> DeviceReading {
        (**self).poll()
    }
}

/// Slot-indexed device polling, implemented by the UI shell.
pub trait DeviceSource {
    /// Poll the device in `slot`. `None` means nothing is connected there;
    /// that is not an error.
    fn poll_slot(&mut self, slot: DeviceId) -> Option<DeviceReading>;

    /// Friendly name of the device in `slot`, if known.
    fn slot_name(&self, _slot: DeviceId) -> Option<&str> {
        None
    }
}

/// Fixed arena of device slots.
pub struct DeviceSlots<D = Box<dyn Device>> {
    slots: Vec<Option<D>>,
}

impl<D> Default for DeviceSlots<D> {
    fn default() -> Self {
        Self {
            slots: (0..MAX_DEVICES).map(|_| None).collect(),
        }
    }
}

impl<D: Device> DeviceSlots<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plug a device into `slot`, returning whatever was there before.
    /// Slots past [`MAX_DEVICES`] are rejected and the device handed back.
    pub fn attach(&mut self, slot: DeviceId, device: D) -> Result<Option<D>, D> {
        match self.slots.get_mut(slot as usize) {
            Some(entry) => Ok(entry.replace(device)),
            None => Err(device),
        }
    }

    /// Unplug the device in `slot`.
    pub fn detach(&mut self, slot: DeviceId) -> Option<D> {
        self.slots.get_mut(slot as usize).and_then(Option::take)
    }

    pub fn get(&self, slot: DeviceId) -> Option<&D> {
        self.slots.get(slot as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: DeviceId) -> Option<&mut D> {
        self.slots.get_mut(slot as usize).and_then(Option::as_mut)
    }
}

impl<D: Device> DeviceSource for DeviceSlots<D> {
    fn poll_slot(&mut self, slot: DeviceId) -> Option<DeviceReading> {
        self.get_mut(slot).map(|device| device.poll())
    }

    fn slot_name(&self, slot: DeviceId) -> Option<&str> {
        self.get(slot).map(|device| device.name())
    }
}
