//! Mapping persistence.
//!
//! The canonical format is plain text, one record per line:
//!
//! ```text
//! pad control kind device code direction threshold
//! 0 0 1 -1 87 0 0.450000
//! 1 5 5 2 1 1 0.450000
//! ```
//!
//! All fields are integers except `threshold` (six decimals). `kind` is
//! `0` none, `1` key, `2` gamepad button, `3` gamepad axis, `4` joystick
//! button, `5` joystick axis. Fields a kind does not use are written as
//! `-1` (device, code), `0` (direction) and `0.450000` (threshold).
//!
//! Records are written in `(pad, control)` order but each line identifies
//! itself, so order does not matter on load. Loading is forgiving:
//! - blank lines are ignored;
//! - a line with the wrong number of fields, an out-of-range pad/control, or
//!   field values that do not form a valid binding is skipped;
//! - a field that is not a number ends the read (trailing garbage).
//!
//! A [`MappingSet`] can also be exported to / imported from JSON for sharing
//! profiles between tools.

use crate::binding::{AxisDirection, Binding, Control, DEFAULT_AXIS_THRESHOLD};
use crate::device::{DeviceId, MAX_DEVICES};
use crate::error::StoreError;
use crate::keyboard::KeyCode;
use crate::pad::{VirtualPad, PAD_COUNT};
use serde::{Deserialize, Serialize};
use std::path::Path;

const FIELD_COUNT: usize = 7;

/// Outcome of a successful load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records that replaced a slot.
    pub applied: usize,
    /// Records ignored as malformed or out of range.
    pub skipped: usize,
}

/// All twelve bindings: two pads of six controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingSet {
    pads: [VirtualPad; PAD_COUNT],
}

impl MappingSet {
    /// Every slot `None`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pad 1: W/S/A/D + J/K. Pad 2: arrow keys + N/M.
    pub fn keyboard_defaults() -> Self {
        let keys = |k: [KeyCode; Control::COUNT]| VirtualPad::new(k.map(Binding::key));
        Self {
            pads: [
                keys([
                    KeyCode::W,
                    KeyCode::S,
                    KeyCode::A,
                    KeyCode::D,
                    KeyCode::J,
                    KeyCode::K,
                ]),
                keys([
                    KeyCode::UP,
                    KeyCode::DOWN,
                    KeyCode::LEFT,
                    KeyCode::RIGHT,
                    KeyCode::N,
                    KeyCode::M,
                ]),
            ],
        }
    }

    pub fn pad(&self, pad: usize) -> Option<&VirtualPad> {
        self.pads.get(pad)
    }

    pub fn pads(&self) -> &[VirtualPad; PAD_COUNT] {
        &self.pads
    }

    pub fn pads_mut(&mut self) -> &mut [VirtualPad; PAD_COUNT] {
        &mut self.pads
    }

    pub fn get(&self, pad: usize, control: Control) -> Option<&Binding> {
        self.pad(pad).map(|p| p.binding(control))
    }

    /// Replace one slot. Returns `false` if `pad` is out of range.
    pub fn set(&mut self, pad: usize, control: Control, binding: Binding) -> bool {
        match self.pads.get_mut(pad) {
            Some(p) => {
                p.set_binding(control, binding);
                true
            }
            None => false,
        }
    }

    /// `(pad, control, binding)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Control, &Binding)> {
        self.pads
            .iter()
            .enumerate()
            .flat_map(|(pad, p)| p.bindings().map(move |(control, b)| (pad, control, b)))
    }

    /// Render the text format.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (pad, control, binding) in self.iter() {
            let r = Record::from_binding(binding);
            out.push_str(&format!(
                "{} {} {} {} {} {} {:.6}\n",
                pad,
                control.index(),
                r.kind,
                r.device,
                r.code,
                r.direction,
                r.threshold
            ));
        }
        out
    }

    /// Parse the text format into a fresh set (unlisted slots stay `None`).
    pub fn parse_text(text: &str) -> (Self, LoadReport) {
        let mut set = Self::empty();
        let mut report = LoadReport::default();

        for line in text.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != FIELD_COUNT {
                report.skipped += 1;
                continue;
            }
            let Some((pad, control, record)) = parse_fields(&fields) else {
                break;
            };

            let slot = usize::try_from(pad)
                .ok()
                .filter(|&p| p < PAD_COUNT)
                .zip(usize::try_from(control).ok().and_then(Control::from_index));
            match (slot, record.to_binding()) {
                (Some((pad, control)), Some(binding)) => {
                    set.set(pad, control, binding);
                    report.applied += 1;
                }
                _ => report.skipped += 1,
            }
        }

        (set, report)
    }

    /// Write the text format to `path`.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        std::fs::write(path, self.to_text()).map_err(|e| StoreError::io(path, e))
    }

    /// Read the text format from `path`. Nothing is returned (and so nothing
    /// can be partially applied) unless the whole file could be read.
    pub fn load(path: &Path) -> Result<(Self, LoadReport), StoreError> {
        let text = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        Ok(Self::parse_text(&text))
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let mut set: Self = serde_json::from_str(json)?;
        set.pads = set
            .pads
            .map(|pad| VirtualPad::new(Control::ALL.map(|control| *pad.binding(control))));
        Ok(set)
    }
}

fn parse_fields(fields: &[&str]) -> Option<(i32, i32, Record)> {
    let int = |i: usize| fields[i].parse::<i32>().ok();
    Some((
        int(0)?,
        int(1)?,
        Record {
            kind: int(2)?,
            device: int(3)?,
            code: int(4)?,
            direction: int(5)?,
            threshold: fields[6].parse::<f32>().ok()?,
        },
    ))
}

/// The flat field set of one binding.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Record {
    kind: i32,
    device: i32,
    code: i32,
    direction: i32,
    threshold: f32,
}

impl Record {
    fn from_binding(binding: &Binding) -> Self {
        let plain = |kind, device: i32, code: i32| Record {
            kind,
            device,
            code,
            direction: 0,
            threshold: DEFAULT_AXIS_THRESHOLD,
        };
        let axis = |kind, device: DeviceId, code: i32, direction: AxisDirection, threshold| Record {
            kind,
            device: device as i32,
            code,
            direction: direction.sign(),
            threshold,
        };

        match *binding {
            Binding::None => plain(0, -1, -1),
            Binding::Key { key } => plain(1, -1, key.0 as i32),
            Binding::GamepadButton { device, button } => plain(2, device as i32, button as i32),
            Binding::GamepadAxis {
                device,
                axis: a,
                direction,
                threshold,
            } => axis(3, device, a as i32, direction, threshold),
            Binding::JoyButton { device, button } => plain(4, device as i32, button as i32),
            Binding::JoyAxis {
                device,
                axis: a,
                direction,
                threshold,
            } => axis(5, device, a as i32, direction, threshold),
        }
    }

    fn to_binding(self) -> Option<Binding> {
        let device = || {
            DeviceId::try_from(self.device)
                .ok()
                .filter(|&d| (d as usize) < MAX_DEVICES)
        };
        let direction = || AxisDirection::from_sign(self.direction);
        let threshold = || Some(self.threshold).filter(|t| t.is_finite());

        Some(match self.kind {
            0 => Binding::None,
            1 => {
                let key = KeyCode(u16::try_from(self.code).ok()?);
                key.is_valid().then_some(Binding::Key { key })?
            }
            2 => Binding::GamepadButton {
                device: device()?,
                button: u8::try_from(self.code).ok()?,
            },
            3 => Binding::GamepadAxis {
                device: device()?,
                axis: u8::try_from(self.code).ok()?,
                direction: direction()?,
                threshold: threshold()?,
            },
            4 => Binding::JoyButton {
                device: device()?,
                button: u16::try_from(self.code).ok()?,
            },
            5 => Binding::JoyAxis {
                device: device()?,
                axis: u16::try_from(self.code).ok()?,
                direction: direction()?,
                threshold: threshold()?,
            },
            _ => return None,
        })
    }
}
