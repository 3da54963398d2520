//! Engine configuration (TOML).
//!
//! ```toml
//! mapping_path = "padmap.txt"
//! load_on_start = true
//!
//! [learn]
//! trigger = 0.55
//! rest = 0.20
//! bound = 0.45
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use crate::error::ConfigError;
use crate::learn::LearnThresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Where save/load read and write the mapping file.
    pub mapping_path: PathBuf,
    /// Load the mapping file over the defaults when the engine starts.
    pub load_on_start: bool,
    pub learn: LearnThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mapping_path: PathBuf::from("padmap.txt"),
            load_on_start: true,
            learn: LearnThresholds::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Require `0 <= rest < trigger <= 1` and `0 <= bound <= 1`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let LearnThresholds {
            trigger,
            rest,
            bound,
        } = self.learn;
        let ok = (0.0..trigger).contains(&rest)
            && trigger <= 1.0
            && (0.0..=1.0).contains(&bound);
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidThresholds {
                trigger,
                rest,
                bound,
            })
        }
    }
}
