use crate::event::EngineEvent;
use crate::eventbus::EngineListener;

/// A listener that writes engine notifications to stderr.
#[derive(Default)]
pub struct Logger;

impl Logger {
    pub fn new() -> Self {
        Logger
    }

    /// One log line per event.
    pub fn format(event: &EngineEvent) -> String {
        match event {
            EngineEvent::DeviceConnected {
                slot,
                name,
                gamepad,
            } => format!(
                "[joy] CONNECT jid={slot} name={name} gamepad={}",
                *gamepad as u8
            ),
            EngineEvent::DeviceDisconnected { slot } => format!("[joy] DISCONNECT jid={slot}"),
            EngineEvent::LearningArmed { pad, control } => {
                format!("[learn] armed pad={} target={control}", pad + 1)
            }
            EngineEvent::LearningCanceled => "[learn] canceled".to_string(),
            EngineEvent::BindingLearned {
                pad,
                control,
                binding,
                source,
            } => format!(
                "[learn] pad={} target={control} <- {binding} ({source})",
                pad + 1
            ),
            EngineEvent::BindingCleared { pad, control } => {
                format!("[learn] cleared pad={} target={control}", pad + 1)
            }
            EngineEvent::MappingsSaved { path } => format!("[map] saved to {}", path.display()),
            EngineEvent::MappingsSaveFailed { path } => {
                format!("[map] save failed: {}", path.display())
            }
            EngineEvent::MappingsLoaded {
                path,
                applied,
                skipped,
            } => format!(
                "[map] loaded from {} ({applied} applied, {skipped} skipped)",
                path.display()
            ),
            EngineEvent::MappingsLoadFailed { path } => {
                format!("[map] load failed: {}", path.display())
            }
        }
    }
}

impl EngineListener for Logger {
    fn on_event(&mut self, event: &EngineEvent) {
        eprintln!("{}", Self::format(event));
    }
}
