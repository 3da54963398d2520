//! padmap — learnable input bindings for two 6-bit virtual pads.
//!
//! Reads keyboard, recognized gamepads and raw joysticks through one
//! [`Binding`] abstraction, lets the user rebind any of twelve controls by
//! pressing the input they want, and reduces each virtual pad to a 6-bit code
//! ready for a hardware link.
//!
//! The crate owns no window, event loop or OS input API: a host feeds it key
//! notifications and a [`DeviceSource`] once per frame, then calls
//! [`Engine::tick`].

pub mod backends;
pub mod binding;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod keyboard;
pub mod learn;
pub mod logger;
pub mod manager;
pub mod pad;
pub mod snapshot;
pub mod store;

pub use binding::*;
pub use config::EngineConfig;
pub use device::*;
pub use error::*;
pub use event::*;
pub use eventbus::*;
pub use keyboard::{KeyCode, KeyboardState};
pub use learn::{LearnCursor, LearnThresholds, Learner};
pub use logger::Logger;
pub use manager::*;
pub use pad::{PadBits, VirtualPad, PAD_COUNT};
pub use snapshot::{DeviceCache, DeviceSnapshot};
pub use store::{LoadReport, MappingSet};
