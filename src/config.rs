//! Codetour configuration.
//!
//! Loaded from `~/.codetour/config.toml`. Every key is optional, and a
//! missing file means defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discovery::DEFAULT_TOUR_DIRS;

/// Codetour configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Repository identity used when `--repo` and `--root-uri` are absent
    /// (e.g. `github.com/acme/widgets`).
    pub repository: Option<String>,

    /// Directories searched for `.tour` files, relative to the workspace root.
    pub tour_dirs: Option<Vec<String>>,

    /// Default tracing filter, overridden by `CODETOUR_LOG`.
    pub log: Option<String>,
}

impl Config {
    /// Load config from `~/.codetour/config.toml`, or defaults if there is none.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from an explicit path, or defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.codetour/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".codetour").join("config.toml"))
    }

    /// Configured tour directories, or the defaults.
    pub fn tour_dirs(&self) -> Vec<String> {
        match &self.tour_dirs {
            Some(dirs) if !dirs.is_empty() => dirs.clone(),
            _ => DEFAULT_TOUR_DIRS.iter().map(ToString::to_string).collect(),
        }
    }
}
