//! User configuration, loaded from a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Editor settings. Every field has a default, so a partial config file (or
/// none at all) is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Columns per tab stop.
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,

    /// Show the line-number gutter.
    #[serde(default = "default_true")]
    pub line_numbers: bool,
}

fn default_tab_width() -> usize {
    8
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_width: default_tab_width(),
            line_numbers: default_true(),
        }
    }
}

impl Config {
    /// The default config file location: `<config dir>/ked/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ked").join("config.json"))
    }

    /// Load from `path`, falling back to defaults if the file is missing.
    /// A file that exists but fails to parse is an error, not a silent
    /// fallback.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let config: Config = serde_json::from_str(&text)?;
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(config)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Config::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}
