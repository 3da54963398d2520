//! Error types.
//!
//! Only persistence and configuration can fail. Sampling and learning never
//! return errors: missing devices and bad indices read as "not pressed".

use std::path::PathBuf;
use thiserror::Error;

/// Mapping file / profile failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mapping file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("mapping file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mapping profile JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound { path }
        } else {
            StoreError::Io { path, source }
        }
    }
}

/// Engine configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid learn thresholds: trigger={trigger} rest={rest} bound={bound}")]
    InvalidThresholds { trigger: f32, rest: f32, bound: f32 },
}

/// Control-surface failures.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("pad index {0} out of range")]
    PadOutOfRange(usize),

    #[error(transparent)]
    Store(#[from] StoreError),
}
