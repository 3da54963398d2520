//! Per-frame device snapshots with one frame of history.
//!
//! [`DeviceCache`] holds a [`DeviceSnapshot`] for every slot `0..MAX_DEVICES`.
//! Each [`DeviceCache::refresh`] shifts "current" into "previous" and stores
//! the newly polled values as "current", so edge detectors can compare the two.
//!
//! # Edge-state rules
//! - A slot that reads as disconnected loses all history; nothing can fire
//!   across a disconnect.
//! - If either raw array changes length between frames (for example a
//!   different controller was plugged into the slot), the new values become
//!   current and the whole device, gamepad abstraction included, has no
//!   previous frame. Every edge query for that device returns `None` until the
//!   next refresh.
//! - Gamepad-abstraction history only exists when both this frame and the last
//!   one produced a gamepad read.

use crate::device::{DeviceId, DeviceReading, DeviceSource, GamepadState, MAX_DEVICES};

/// A value for this frame plus the one from the frame before.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frames<T> {
    current: Option<T>,
    previous: Option<T>,
}

impl<T> Frames<T> {
    fn advance(&mut self, next: Option<T>) {
        self.previous = self.current.take();
        self.current = next;
    }

    fn clear(&mut self) {
        self.current = None;
        self.previous = None;
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// `(current, previous)` when both frames exist.
    pub fn pair(&self) -> Option<(&T, &T)> {
        Some((self.current.as_ref()?, self.previous.as_ref()?))
    }
}

impl<E> Frames<Vec<E>> {
    /// Whether `next` has a different length than the current frame.
    fn reshapes(&self, next: &[E]) -> bool {
        self.current.as_ref().is_some_and(|cur| cur.len() != next.len())
    }

    /// `(current, previous)` slices when both exist with equal length.
    pub fn matched(&self) -> Option<(&[E], &[E])> {
        let (cur, prev) = self.pair()?;
        (cur.len() == prev.len()).then_some((cur.as_slice(), prev.as_slice()))
    }
}

/// Tracked state of one device slot.
#[derive(Clone, Debug, Default)]
pub struct DeviceSnapshot {
    present: bool,
    is_gamepad: bool,
    name: String,
    buttons: Frames<Vec<bool>>,
    axes: Frames<Vec<f32>>,
    gamepad: Frames<GamepadState>,
}

impl DeviceSnapshot {
    #[inline]
    pub fn is_present(&self) -> bool {
        self.present
    }

    #[inline]
    pub fn is_gamepad(&self) -> bool {
        self.is_gamepad
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw buttons this frame (empty when absent).
    pub fn buttons(&self) -> &[bool] {
        self.buttons.current().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Raw axes this frame (empty when absent).
    pub fn axes(&self) -> &[f32] {
        self.axes.current().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Raw button history; see [`Frames::matched`].
    pub fn button_frames(&self) -> Option<(&[bool], &[bool])> {
        self.buttons.matched()
    }

    /// Raw axis history; see [`Frames::matched`].
    pub fn axis_frames(&self) -> Option<(&[f32], &[f32])> {
        self.axes.matched()
    }

    /// Gamepad-abstraction state this frame, if the read succeeded.
    pub fn gamepad(&self) -> Option<&GamepadState> {
        if self.is_gamepad {
            self.gamepad.current()
        } else {
            None
        }
    }

    /// `(current, previous)` gamepad-abstraction states.
    pub fn gamepad_frames(&self) -> Option<(&GamepadState, &GamepadState)> {
        if self.is_gamepad {
            self.gamepad.pair()
        } else {
            None
        }
    }

    fn update(&mut self, reading: DeviceReading) {
        let reshaped =
            self.buttons.reshapes(&reading.buttons) || self.axes.reshapes(&reading.axes);

        self.present = true;
        self.is_gamepad = reading.is_gamepad;
        self.buttons.advance(Some(reading.buttons));
        self.axes.advance(Some(reading.axes));
        let gamepad = if reading.is_gamepad {
            reading.gamepad
        } else {
            None
        };
        self.gamepad.advance(gamepad);

        if reshaped {
            self.buttons.previous = None;
            self.axes.previous = None;
            self.gamepad.previous = None;
        }
    }

    fn reset(&mut self) {
        self.present = false;
        self.is_gamepad = false;
        self.name.clear();
        self.buttons.clear();
        self.axes.clear();
        self.gamepad.clear();
    }
}

/// Connection change observed by a refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceChange {
    Connected {
        slot: DeviceId,
        name: String,
        gamepad: bool,
    },
    Disconnected {
        slot: DeviceId,
    },
}

/// Snapshots for every device slot.
#[derive(Clone, Debug)]
pub struct DeviceCache {
    slots: Vec<DeviceSnapshot>,
}

impl Default for DeviceCache {
    fn default() -> Self {
        Self {
            slots: vec![DeviceSnapshot::default(); MAX_DEVICES],
        }
    }
}

impl DeviceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll every slot and shift history. Returns the connection changes seen.
    pub fn refresh(&mut self, source: &mut dyn DeviceSource) -> Vec<DeviceChange> {
        let mut changes = Vec::new();

        for (slot, snap) in self.slots.iter_mut().enumerate() {
            let id = slot as DeviceId;
            let was_present = snap.present;

            match source.poll_slot(id) {
                Some(reading) => {
                    snap.update(reading);
                    if !was_present {
                        snap.name = source.slot_name(id).unwrap_or("(unknown)").to_string();
                        changes.push(DeviceChange::Connected {
                            slot: id,
                            name: snap.name.clone(),
                            gamepad: snap.is_gamepad,
                        });
                    }
                }
                None => {
                    snap.reset();
                    if was_present {
                        changes.push(DeviceChange::Disconnected { slot: id });
                    }
                }
            }
        }

        changes
    }

    /// Snapshot of a connected device.
    pub fn device(&self, id: DeviceId) -> Option<&DeviceSnapshot> {
        self.slots.get(id as usize).filter(|snap| snap.present)
    }

    /// Current gamepad-abstraction state of a connected gamepad.
    pub fn gamepad(&self, id: DeviceId) -> Option<&GamepadState> {
        self.device(id).and_then(DeviceSnapshot::gamepad)
    }

    /// Connected devices in ascending slot order.
    pub fn present(&self) -> impl Iterator<Item = (DeviceId, &DeviceSnapshot)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, snap)| snap.present)
            .map(|(slot, snap)| (slot as DeviceId, snap))
    }
}
