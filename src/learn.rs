//! Interactive rebinding ("learning").
//!
//! While armed, every tick runs an ordered chain of [`Detector`]s over the
//! refreshed frame. The first detector that reports a qualifying event wins,
//! its [`Binding`] replaces the selected slot, and learning disarms. No event
//! means no change: the learner stays armed indefinitely until a match or a
//! cancel.
//!
//! Detector order:
//! 1. keyboard press edge
//! 2. gamepad-abstraction button press edge
//! 3. gamepad-abstraction axis leaving rest
//! 4. raw joystick button press edge
//! 5. raw joystick axis leaving rest
//!
//! Devices are scanned in slot order and inputs in index order, so the result
//! for a given frame is deterministic.
//!
//! An axis "leaves rest" when its previous reading was inside the rest margin
//! (`|prev| < rest`) and its current reading is beyond the trigger level. The
//! resulting binding fires at the lower `bound` threshold, giving some
//! hysteresis between learning and playing.

use crate::binding::{stored_threshold, AxisDirection, Binding, Control};
use crate::keyboard::{KeyCode, KeyboardState};
use crate::pad::{VirtualPad, PAD_COUNT};
use crate::snapshot::DeviceCache;
use serde::{Deserialize, Serialize};

/// Axis levels used while learning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnThresholds {
    /// An axis must pass this magnitude to be learned.
    pub trigger: f32,
    /// An axis must start inside this magnitude to be learned.
    pub rest: f32,
    /// Threshold stored in learned axis bindings.
    pub bound: f32,
}

impl Default for LearnThresholds {
    fn default() -> Self {
        Self {
            trigger: 0.55,
            rest: 0.20,
            bound: crate::binding::DEFAULT_AXIS_THRESHOLD,
        }
    }
}

/// Which pad/control is selected for editing, and whether learning is armed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LearnCursor {
    pad: usize,
    control: Control,
    armed: bool,
}

impl Default for LearnCursor {
    fn default() -> Self {
        Self {
            pad: 0,
            control: Control::Up,
            armed: false,
        }
    }
}

impl LearnCursor {
    #[inline]
    pub fn pad(&self) -> usize {
        self.pad
    }

    #[inline]
    pub fn control(&self) -> Control {
        self.control
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Everything a detector may look at for one tick.
pub struct FrameInput<'a> {
    pub devices: &'a DeviceCache,
    pub keyboard: &'a KeyboardState,
    /// Keys held when learning was armed and not released since.
    pub held_at_arm: &'a [KeyCode],
    pub thresholds: &'a LearnThresholds,
}

/// One tier of the learning scan. Produces at most one candidate per frame.
pub trait Detector {
    fn name(&self) -> &'static str;
    fn detect(&self, input: &FrameInput<'_>) -> Option<Binding>;
}

pub struct KeyPress;
pub struct GamepadButtonPress;
pub struct GamepadAxisSwing;
pub struct JoyButtonPress;
pub struct JoyAxisSwing;

/// The scan, highest priority first.
pub const DETECTORS: &[&dyn Detector] = &[
    &KeyPress,
    &GamepadButtonPress,
    &GamepadAxisSwing,
    &JoyButtonPress,
    &JoyAxisSwing,
];

fn first_press(cur: &[bool], prev: &[bool]) -> Option<usize> {
    cur.iter().zip(prev).position(|(&c, &p)| c && !p)
}

fn first_swing(cur: &[f32], prev: &[f32], t: &LearnThresholds) -> Option<(usize, AxisDirection)> {
    cur.iter().zip(prev).enumerate().find_map(|(i, (&c, &p))| {
        if p.abs() >= t.rest {
            None
        } else if c > t.trigger {
            Some((i, AxisDirection::Positive))
        } else if c < -t.trigger {
            Some((i, AxisDirection::Negative))
        } else {
            None
        }
    })
}

impl Detector for KeyPress {
    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn detect(&self, input: &FrameInput<'_>) -> Option<Binding> {
        input
            .keyboard
            .pressed_edges()
            .find(|key| !input.held_at_arm.contains(key))
            .map(Binding::key)
    }
}

impl Detector for GamepadButtonPress {
    fn name(&self) -> &'static str {
        "gamepad button"
    }

    fn detect(&self, input: &FrameInput<'_>) -> Option<Binding> {
        input.devices.present().find_map(|(device, snap)| {
            let (cur, prev) = snap.gamepad_frames()?;
            let button = first_press(&cur.buttons, &prev.buttons)?;
            Some(Binding::GamepadButton {
                device,
                button: button as u8,
            })
        })
    }
}

impl Detector for GamepadAxisSwing {
    fn name(&self) -> &'static str {
        "gamepad axis"
    }

    fn detect(&self, input: &FrameInput<'_>) -> Option<Binding> {
        input.devices.present().find_map(|(device, snap)| {
            let (cur, prev) = snap.gamepad_frames()?;
            let (axis, direction) = first_swing(&cur.axes, &prev.axes, input.thresholds)?;
            Some(Binding::GamepadAxis {
                device,
                axis: axis as u8,
                direction,
                threshold: input.thresholds.bound,
            })
        })
    }
}

impl Detector for JoyButtonPress {
    fn name(&self) -> &'static str {
        "joystick button"
    }

    fn detect(&self, input: &FrameInput<'_>) -> Option<Binding> {
        input.devices.present().find_map(|(device, snap)| {
            let (cur, prev) = snap.button_frames()?;
            let button = first_press(cur, prev)?;
            Some(Binding::JoyButton {
                device,
                button: u16::try_from(button).ok()?,
            })
        })
    }
}

impl Detector for JoyAxisSwing {
    fn name(&self) -> &'static str {
        "joystick axis"
    }

    fn detect(&self, input: &FrameInput<'_>) -> Option<Binding> {
        input.devices.present().find_map(|(device, snap)| {
            let (cur, prev) = snap.axis_frames()?;
            let (axis, direction) = first_swing(cur, prev, input.thresholds)?;
            Some(Binding::JoyAxis {
                device,
                axis: u16::try_from(axis).ok()?,
                direction,
                threshold: input.thresholds.bound,
            })
        })
    }
}

/// A binding committed by learning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Learned {
    pub pad: usize,
    pub control: Control,
    pub binding: Binding,
    /// Name of the detector that fired.
    pub source: &'static str,
}

/// The learning state machine plus the edit cursor.
#[derive(Clone, Debug, Default)]
pub struct Learner {
    cursor: LearnCursor,
    thresholds: LearnThresholds,
    held_at_arm: Vec<KeyCode>,
}

impl Learner {
    /// The learned-binding `bound` is rounded to stored precision.
    pub fn new(thresholds: LearnThresholds) -> Self {
        Self {
            thresholds: LearnThresholds {
                bound: stored_threshold(thresholds.bound),
                ..thresholds
            },
            ..Self::default()
        }
    }

    pub fn cursor(&self) -> LearnCursor {
        self.cursor
    }

    pub fn thresholds(&self) -> &LearnThresholds {
        &self.thresholds
    }

    /// Select a pad. Returns `false` (and changes nothing) if out of range.
    pub fn select_pad(&mut self, pad: usize) -> bool {
        if pad >= PAD_COUNT {
            return false;
        }
        self.cursor.pad = pad;
        true
    }

    /// Switch to the other pad.
    pub fn cycle_pad(&mut self) {
        self.cursor.pad = (self.cursor.pad + 1) % PAD_COUNT;
    }

    pub fn select_control(&mut self, control: Control) {
        self.cursor.control = control;
    }

    /// Arm learning. Keys already held are ignored until released, so the
    /// key that triggered arming cannot bind itself.
    pub fn arm(&mut self, keyboard: &KeyboardState) {
        self.cursor.armed = true;
        self.held_at_arm = keyboard.held().collect();
    }

    /// Disarm without committing anything.
    pub fn cancel(&mut self) {
        self.cursor.armed = false;
        self.held_at_arm.clear();
    }

    /// Run the detector chain once. On a match the selected slot is replaced,
    /// learning disarms and the commit is returned.
    pub fn poll(
        &mut self,
        devices: &DeviceCache,
        keyboard: &KeyboardState,
        pads: &mut [VirtualPad; PAD_COUNT],
    ) -> Option<Learned> {
        if !self.cursor.armed {
            return None;
        }
        self.held_at_arm.retain(|&key| keyboard.is_down(key));

        let input = FrameInput {
            devices,
            keyboard,
            held_at_arm: &self.held_at_arm,
            thresholds: &self.thresholds,
        };
        let (source, binding) = DETECTORS
            .iter()
            .find_map(|detector| detector.detect(&input).map(|b| (detector.name(), b)))?;

        let LearnCursor { pad, control, .. } = self.cursor;
        pads[pad].set_binding(control, binding);
        self.cancel();

        Some(Learned {
            pad,
            control,
            binding,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::VirtualDevice;
    use crate::device::{DeviceId, DeviceSlots};

    struct Rig {
        slots: DeviceSlots<VirtualDevice>,
        cache: DeviceCache,
        keyboard: KeyboardState,
        pads: [VirtualPad; PAD_COUNT],
        learner: Learner,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                slots: DeviceSlots::new(),
                cache: DeviceCache::new(),
                keyboard: KeyboardState::new(),
                pads: Default::default(),
                learner: Learner::default(),
            }
        }

        fn tick(&mut self) -> Option<Learned> {
            self.cache.refresh(&mut self.slots);
            let out = self.learner.poll(&self.cache, &self.keyboard, &mut self.pads);
            self.keyboard.latch();
            out
        }

        fn dev(&mut self, slot: DeviceId) -> &mut VirtualDevice {
            self.slots.get_mut(slot).unwrap()
        }
    }

    #[test]
    fn idle_learner_commits_nothing() {
        let mut rig = Rig::new();
        rig.keyboard.press(KeyCode::W);
        assert!(rig.tick().is_none());
        assert!(rig.pads[0].binding(Control::Up).is_none());
    }

    #[test]
    fn armed_without_events_stays_armed() {
        let mut rig = Rig::new();
        let _ = rig.slots.attach(0, VirtualDevice::gamepad("pad", 4, 2));
        rig.learner.arm(&rig.keyboard);
        for _ in 0..50 {
            assert!(rig.tick().is_none());
        }
        assert!(rig.learner.cursor().is_armed());
        assert!(rig.pads.iter().all(|p| p.bindings().all(|(_, b)| b.is_none())));
    }

    #[test]
    fn keyboard_beats_gamepad_in_same_tick() {
        let mut rig = Rig::new();
        let _ = rig.slots.attach(0, VirtualDevice::gamepad("pad", 4, 2));
        rig.tick();
        rig.learner.arm(&rig.keyboard);

        rig.keyboard.press(KeyCode::J);
        rig.dev(0).press_gamepad_button(1);
        let learned = rig.tick().unwrap();
        assert_eq!(learned.binding, Binding::key(KeyCode::J));
        assert_eq!(learned.source, "keyboard");
        assert!(!rig.learner.cursor().is_armed());
    }

    #[test]
    fn gamepad_button_beats_raw_button() {
        let mut rig = Rig::new();
        let _ = rig.slots.attach(0, VirtualDevice::gamepad("pad", 4, 2));
        rig.tick();
        rig.learner.arm(&rig.keyboard);
        rig.dev(0).press_gamepad_button(3);
        rig.dev(0).press_button(0);
        let learned = rig.tick().unwrap();
        assert_eq!(learned.binding, Binding::GamepadButton { device: 0, button: 3 });
    }

    #[test]
    fn arming_key_does_not_bind_itself() {
        let mut rig = Rig::new();
        rig.keyboard.press(KeyCode::SPACE);
        rig.learner.arm(&rig.keyboard);
        assert!(rig.tick().is_none());

        rig.keyboard.release(KeyCode::SPACE);
        assert!(rig.tick().is_none());
        rig.keyboard.press(KeyCode::SPACE);
        let learned = rig.tick().unwrap();
        assert_eq!(learned.binding, Binding::key(KeyCode::SPACE));
    }

    #[test]
    fn axis_must_start_at_rest() {
        let mut rig = Rig::new();
        let _ = rig.slots.attach(1, VirtualDevice::joystick("stick", 0, 3));
        rig.dev(1).set_axis(2, 0.3);
        rig.tick();
        rig.learner.arm(&rig.keyboard);

        rig.dev(1).set_axis(2, 0.9);
        assert!(rig.tick().is_none());

        rig.dev(1).set_axis(2, 0.0);
        assert!(rig.tick().is_none());
        rig.dev(1).set_axis(2, -0.6);
        let learned = rig.tick().unwrap();
        assert_eq!(
            learned.binding,
            Binding::JoyAxis {
                device: 1,
                axis: 2,
                direction: AxisDirection::Negative,
                threshold: 0.45
            }
        );
    }

    #[test]
    fn axis_below_trigger_is_ignored() {
        let mut rig = Rig::new();
        let _ = rig.slots.attach(0, VirtualDevice::gamepad("pad", 0, 0));
        rig.tick();
        rig.learner.arm(&rig.keyboard);
        rig.dev(0).set_gamepad_axis(0, 0.5);
        assert!(rig.tick().is_none());
        assert!(rig.learner.cursor().is_armed());
    }

    #[test]
    fn gamepad_axis_learns_with_bound_threshold() {
        let mut rig = Rig::new();
        let _ = rig.slots.attach(4, VirtualDevice::gamepad("pad", 0, 0));
        rig.tick();
        rig.learner.select_pad(1);
        rig.learner.select_control(Control::Right);
        rig.learner.arm(&rig.keyboard);
        rig.dev(4).set_gamepad_axis(0, 0.8);
        let learned = rig.tick().unwrap();
        assert_eq!((learned.pad, learned.control), (1, Control::Right));
        assert_eq!(
            *rig.pads[1].binding(Control::Right),
            Binding::GamepadAxis {
                device: 4,
                axis: 0,
                direction: AxisDirection::Positive,
                threshold: 0.45
            }
        );
    }

    #[test]
    fn reshaped_device_cannot_fire_on_change_tick() {
        let mut rig = Rig::new();
        let _ = rig.slots.attach(0, VirtualDevice::joystick("a", 2, 0));
        rig.tick();
        rig.learner.arm(&rig.keyboard);

        rig.dev(0).reshape(6, 0);
        rig.dev(0).press_button(4);
        assert!(rig.tick().is_none());

        rig.dev(0).release_button(4);
        assert!(rig.tick().is_none());
        rig.dev(0).press_button(4);
        let learned = rig.tick().unwrap();
        assert_eq!(learned.binding, Binding::JoyButton { device: 0, button: 4 });
    }

    #[test]
    fn gamepad_reshape_suppresses_gamepad_tier() {
        let mut rig = Rig::new();
        let _ = rig.slots.attach(0, VirtualDevice::gamepad("pad", 4, 2));
        rig.tick();
        rig.tick();
        rig.learner.arm(&rig.keyboard);

        rig.dev(0).reshape(10, 2);
        rig.dev(0).press_gamepad_button(2);
        assert!(rig.tick().is_none());
        assert!(rig.learner.cursor().is_armed());

        rig.dev(0).release_gamepad_button(2);
        assert!(rig.tick().is_none());
        rig.dev(0).press_gamepad_button(2);
        let learned = rig.tick().unwrap();
        assert_eq!(learned.binding, Binding::GamepadButton { device: 0, button: 2 });
    }

    #[test]
    fn button_reshape_suppresses_axis_swing() {
        let mut rig = Rig::new();
        let _ = rig.slots.attach(0, VirtualDevice::joystick("stick", 4, 2));
        rig.tick();
        rig.tick();
        rig.learner.arm(&rig.keyboard);

        rig.dev(0).reshape(10, 2);
        rig.dev(0).set_axis(1, 0.9);
        assert!(rig.tick().is_none());
        assert!(rig.learner.cursor().is_armed());
        assert!(rig.pads[0].binding(Control::Up).is_none());
    }

    #[test]
    fn gamepad_connecting_with_button_held_does_not_commit() {
        let mut rig = Rig::new();
        rig.learner.arm(&rig.keyboard);

        let mut pad = VirtualDevice::gamepad("pad", 4, 2);
        pad.press_gamepad_button(1);
        pad.press_button(1);
        let _ = rig.slots.attach(0, pad);
        assert!(rig.tick().is_none());
        assert!(rig.tick().is_none());
        assert!(rig.learner.cursor().is_armed());
    }

    #[test]
    fn reconnect_tick_does_not_commit() {
        let mut rig = Rig::new();
        let _ = rig.slots.attach(0, VirtualDevice::gamepad("pad", 4, 2));
        rig.tick();
        rig.tick();
        rig.learner.arm(&rig.keyboard);

        rig.slots.detach(0);
        assert!(rig.tick().is_none());

        let mut pad = VirtualDevice::gamepad("pad", 4, 2);
        pad.press_gamepad_button(3);
        pad.press_button(3);
        pad.set_gamepad_axis(0, 0.9);
        let _ = rig.slots.attach(0, pad);
        assert!(rig.tick().is_none());
        assert!(rig.learner.cursor().is_armed());
    }

    #[test]
    fn bound_is_rounded_to_stored_precision() {
        let mut rig = Rig::new();
        rig.learner = Learner::new(LearnThresholds {
            bound: 1.0 / 3.0,
            ..LearnThresholds::default()
        });
        assert_eq!(rig.learner.thresholds().bound, 0.333333);

        let _ = rig.slots.attach(0, VirtualDevice::joystick("stick", 0, 1));
        rig.tick();
        rig.learner.arm(&rig.keyboard);
        rig.dev(0).set_axis(0, 0.7);
        let learned = rig.tick().unwrap();
        assert_eq!(*rig.pads[0].binding(Control::Up), learned.binding);
        assert_eq!(
            learned.binding,
            Binding::JoyAxis {
                device: 0,
                axis: 0,
                direction: AxisDirection::Positive,
                threshold: 0.333333
            }
        );
    }

    #[test]
    fn lower_slot_wins() {
        let mut rig = Rig::new();
        let _ = rig.slots.attach(3, VirtualDevice::joystick("b", 2, 0));
        let _ = rig.slots.attach(5, VirtualDevice::joystick("a", 2, 0));
        rig.tick();
        rig.learner.arm(&rig.keyboard);
        rig.dev(5).press_button(0);
        rig.dev(3).press_button(1);
        let learned = rig.tick().unwrap();
        assert_eq!(learned.binding, Binding::JoyButton { device: 3, button: 1 });
        assert_eq!(learned.binding.device(), Some(3));
    }

    #[test]
    fn cancel_disarms() {
        let mut rig = Rig::new();
        rig.learner.arm(&rig.keyboard);
        rig.learner.cancel();
        rig.keyboard.press(KeyCode::W);
        assert!(rig.tick().is_none());
    }

    #[test]
    fn select_pad_rejects_out_of_range() {
        let mut learner = Learner::default();
        assert!(!learner.select_pad(2));
        assert!(learner.select_pad(1));
        learner.cycle_pad();
        assert_eq!(learner.cursor().pad(), 0);
    }
}
