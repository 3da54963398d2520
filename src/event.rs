//! Engine notifications.
//!
//! [`EngineEvent`]s describe things a user-facing shell may want to report:
//! devices coming and going, learning being armed or committing, and mapping
//! file activity. They are delivered through the
//! [`EventBus`](crate::eventbus::EventBus) after the operation that caused them
//! has completed.

use crate::binding::{Binding, Control};
use crate::device::DeviceId;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// A device slot became occupied.
    DeviceConnected {
        slot: DeviceId,
        name: String,
        gamepad: bool,
    },

    /// A device slot became empty.
    DeviceDisconnected { slot: DeviceId },

    /// Learning was armed for the selected control.
    LearningArmed { pad: usize, control: Control },

    /// Learning was disarmed without a commit.
    LearningCanceled,

    /// Learning committed a new binding.
    BindingLearned {
        pad: usize,
        control: Control,
        binding: Binding,
        /// Detector tier that fired (e.g. `"keyboard"`).
        source: &'static str,
    },

    /// A slot was reset to `None`.
    BindingCleared { pad: usize, control: Control },

    MappingsSaved { path: PathBuf },

    /// The write failed; the caller received the error.
    MappingsSaveFailed { path: PathBuf },

    MappingsLoaded {
        path: PathBuf,
        applied: usize,
        skipped: usize,
    },

    MappingsLoadFailed { path: PathBuf },
}

/// Coarse grouping used by listener filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Device,
    Learning,
    Mappings,
}

impl EngineEvent {
    pub fn category(&self) -> EventCategory {
        match self {
            EngineEvent::DeviceConnected { .. } | EngineEvent::DeviceDisconnected { .. } => {
                EventCategory::Device
            }
            EngineEvent::LearningArmed { .. }
            | EngineEvent::LearningCanceled
            | EngineEvent::BindingLearned { .. }
            | EngineEvent::BindingCleared { .. } => EventCategory::Learning,
            EngineEvent::MappingsSaved { .. }
            | EngineEvent::MappingsSaveFailed { .. }
            | EngineEvent::MappingsLoaded { .. }
            | EngineEvent::MappingsLoadFailed { .. } => EventCategory::Mappings,
        }
    }
}
