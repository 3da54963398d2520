//! The engine context.
//!
//! [`Engine`] owns everything a frame touches: the device cache, keyboard
//! state, the twelve bindings, the learning state machine and the listener
//! bus. Nothing is global, so several engines can run side by side.
//!
//! # Frame protocol
//! The host drives the engine from its event loop:
//! 1. forward key notifications with [`Engine::key_down`] / [`Engine::key_up`];
//! 2. handle its own hotkeys (edge queries through [`Engine::keyboard`]) and
//!    call control-surface operations such as [`Engine::start_learning`];
//! 3. call [`Engine::tick`], which refreshes devices, runs learning if armed,
//!    samples both pads, then closes the keyboard frame;
//! 4. render from [`Engine::view`].
//!
//! Save and load are synchronous and must be called between ticks.

use crate::binding::{Binding, Control};
use crate::config::EngineConfig;
use crate::device::DeviceSource;
use crate::error::EngineError;
use crate::event::EngineEvent;
use crate::eventbus::EventBus;
use crate::keyboard::{KeyCode, KeyboardState};
use crate::learn::{LearnCursor, Learner};
use crate::pad::{PadBits, PAD_COUNT};
use crate::snapshot::{DeviceCache, DeviceChange};
use crate::store::{LoadReport, MappingSet};

/// One control as the renderer should draw it.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlView {
    pub control: Control,
    pub pressed: bool,
    /// Human-readable binding, e.g. `"GP(jid=0) Btn(3)"`.
    pub description: String,
    /// Selected for editing (on the selected pad).
    pub selected: bool,
}

/// One pad as the renderer should draw it.
#[derive(Clone, Debug, PartialEq)]
pub struct PadView {
    pub index: usize,
    pub bits: PadBits,
    pub controls: [ControlView; Control::COUNT],
    pub selected: bool,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameView {
    pub pads: [PadView; PAD_COUNT],
    pub cursor: LearnCursor,
}

pub struct Engine {
    config: EngineConfig,
    devices: DeviceCache,
    keyboard: KeyboardState,
    mappings: MappingSet,
    learner: Learner,
    codes: [PadBits; PAD_COUNT],
    bus: EventBus,
    ticks: u64,
}

impl Engine {
    /// New engine with the keyboard default bindings.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_mappings(config, MappingSet::keyboard_defaults())
    }

    pub fn with_mappings(config: EngineConfig, mappings: MappingSet) -> Self {
        Self {
            learner: Learner::new(config.learn),
            config,
            devices: DeviceCache::new(),
            keyboard: KeyboardState::new(),
            mappings,
            codes: [PadBits::default(); PAD_COUNT],
            bus: EventBus::new(),
            ticks: 0,
        }
    }

    /// Load the mapping file over the current bindings if the config asks
    /// for it. A missing or unreadable file leaves the bindings untouched.
    pub fn restore_mappings(&mut self) -> Option<LoadReport> {
        if !self.config.load_on_start {
            return None;
        }
        self.load_mappings().ok()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn listeners_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn key_down(&mut self, key: KeyCode) {
        self.keyboard.press(key);
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.keyboard.release(key);
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    pub fn devices(&self) -> &DeviceCache {
        &self.devices
    }

    pub fn mappings(&self) -> &MappingSet {
        &self.mappings
    }

    /// Latest pad codes (from the last tick).
    pub fn codes(&self) -> [PadBits; PAD_COUNT] {
        self.codes
    }

    pub fn cursor(&self) -> LearnCursor {
        self.learner.cursor()
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one frame: refresh devices, learn if armed, sample both pads.
    pub fn tick(&mut self, source: &mut dyn DeviceSource) -> [PadBits; PAD_COUNT] {
        let mut events: Vec<EngineEvent> = self
            .devices
            .refresh(source)
            .into_iter()
            .map(|change| match change {
                DeviceChange::Connected {
                    slot,
                    name,
                    gamepad,
                } => EngineEvent::DeviceConnected {
                    slot,
                    name,
                    gamepad,
                },
                DeviceChange::Disconnected { slot } => EngineEvent::DeviceDisconnected { slot },
            })
            .collect();

        if let Some(learned) =
            self.learner
                .poll(&self.devices, &self.keyboard, self.mappings.pads_mut())
        {
            events.push(EngineEvent::BindingLearned {
                pad: learned.pad,
                control: learned.control,
                binding: learned.binding,
                source: learned.source,
            });
        }

        let pads = self.mappings.pads();
        self.codes = std::array::from_fn(|i| pads[i].sample(&self.devices, &self.keyboard));

        #[cfg(feature = "debug-log")]
        eprintln!(
            "[TICK] n={} pad1={} pad2={} learning={}",
            self.ticks,
            self.codes[0],
            self.codes[1],
            self.learner.cursor().is_armed()
        );

        self.keyboard.latch();
        self.ticks += 1;
        self.bus.emit_all(&events);
        self.codes
    }

    pub fn select_pad(&mut self, pad: usize) -> Result<(), EngineError> {
        if self.learner.select_pad(pad) {
            Ok(())
        } else {
            Err(EngineError::PadOutOfRange(pad))
        }
    }

    /// Switch the edit cursor to the other pad.
    pub fn cycle_pad(&mut self) {
        self.learner.cycle_pad();
    }

    pub fn select_control(&mut self, control: Control) {
        self.learner.select_control(control);
    }

    /// Arm learning for the selected pad/control. The next qualifying input
    /// replaces its binding.
    ///
    /// Every key held at the moment of this call is ignored by the keyboard
    /// tier until it is released, not only the hotkey that armed learning.
    /// Forward a key press after calling this if it should be learnable.
    pub fn start_learning(&mut self) {
        self.learner.arm(&self.keyboard);
        let cursor = self.learner.cursor();
        self.bus.emit(&EngineEvent::LearningArmed {
            pad: cursor.pad(),
            control: cursor.control(),
        });
    }

    pub fn cancel_learning(&mut self) {
        if self.learner.cursor().is_armed() {
            self.learner.cancel();
            self.bus.emit(&EngineEvent::LearningCanceled);
        }
    }

    /// Reset one slot to `None`. Also disarms learning.
    pub fn clear_binding(&mut self, pad: usize, control: Control) -> Result<(), EngineError> {
        if !self.mappings.set(pad, control, Binding::None) {
            return Err(EngineError::PadOutOfRange(pad));
        }
        self.learner.cancel();
        self.bus.emit(&EngineEvent::BindingCleared { pad, control });
        Ok(())
    }

    /// Write all twelve bindings to the configured mapping file.
    pub fn save_mappings(&mut self) -> Result<(), EngineError> {
        let path = self.config.mapping_path.clone();
        match self.mappings.save(&path) {
            Ok(()) => {
                self.bus.emit(&EngineEvent::MappingsSaved { path });
                Ok(())
            }
            Err(e) => {
                self.bus.emit(&EngineEvent::MappingsSaveFailed { path });
                Err(e.into())
            }
        }
    }

    /// Replace all twelve bindings from the configured mapping file. On
    /// failure the current bindings are kept.
    pub fn load_mappings(&mut self) -> Result<LoadReport, EngineError> {
        let path = self.config.mapping_path.clone();
        match MappingSet::load(&path) {
            Ok((mappings, report)) => {
                self.mappings = mappings;
                self.bus.emit(&EngineEvent::MappingsLoaded {
                    path,
                    applied: report.applied,
                    skipped: report.skipped,
                });
                Ok(report)
            }
            Err(e) => {
                self.bus.emit(&EngineEvent::MappingsLoadFailed { path });
                Err(e.into())
            }
        }
    }

    /// Render-ready view of both pads and the cursor.
    pub fn view(&self) -> FrameView {
        let cursor = self.learner.cursor();
        let pads = std::array::from_fn(|index| {
            let pad = &self.mappings.pads()[index];
            let bits = self.codes[index];
            let selected = cursor.pad() == index;
            PadView {
                index,
                bits,
                selected,
                controls: Control::ALL.map(|control| ControlView {
                    control,
                    pressed: bits.is_pressed(control),
                    description: pad.binding(control).to_string(),
                    selected: selected && cursor.control() == control,
                }),
            }
        });
        FrameView { pads, cursor }
    }
}
