//! Engine configuration.
//!
//! ```toml
//! # hotwork.toml
//! remove_extra_items = false
//! skip_non_hot_work = true
//! parallel = true
//! ```
//!
//! Every field is optional; missing fields keep their default.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

/// Switches for the stage pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Put recorded EPI items that the plan does not list on the remove
    /// list. Off means divergences are only reported.
    pub remove_extra_items: bool,
    /// Skip stages whose work type is known and is not hot work.
    pub skip_non_hot_work: bool,
    /// Evaluate batches of stages on the rayon thread pool.
    pub parallel: bool,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            remove_extra_items: false,
            skip_non_hot_work: true,
            parallel: true,
        }
    }

    /// Parse a TOML document. `origin` names the source in errors.
    pub fn from_toml_str(content: &str, origin: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Load from a TOML file. A file that does not exist yields the defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };
        Self::from_toml_str(&content, &path.display().to_string())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
