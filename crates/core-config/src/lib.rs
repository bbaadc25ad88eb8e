//! Configuration loading and parsing.
//!
//! Parses `refile.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [files]
//! use_version_control = true   # delegate rename/delete of tracked files to the VCS
//! verbose = false              # report each rename/delete when it completes
//!
//! [hooks]                      # shell commands run around each command
//! before_rename = []
//! after_rename = []
//! before_delete = []
//! after_delete = []
//! ```
//!
//! Every field has a default. Unknown fields are ignored (TOML deserialization
//! tolerance) so newer files still load. A file that exists but fails to parse
//! falls back to defaults with a warning on the `config` target rather than
//! refusing to run.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "refile.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FilesConfig {
    #[serde(default = "FilesConfig::default_use_version_control")]
    pub use_version_control: bool,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            use_version_control: Self::default_use_version_control(),
            verbose: false,
        }
    }
}

impl FilesConfig {
    const fn default_use_version_control() -> bool {
        true
    }
}

/// Shell commands registered at each hook point, in run order.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct HooksConfig {
    #[serde(default)]
    pub before_rename: Vec<String>,
    #[serde(default)]
    pub after_rename: Vec<String>,
    #[serde(default)]
    pub before_delete: Vec<String>,
    #[serde(default)]
    pub after_delete: Vec<String>,
}

impl HooksConfig {
    pub fn is_empty(&self) -> bool {
        self.before_rename.is_empty()
            && self.after_rename.is_empty()
            && self.before_delete.is_empty()
            && self.after_delete.is_empty()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub hooks: HooksConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub source: Option<PathBuf>,
    pub file: ConfigFile, // parsed (or default) data
}

impl Config {
    pub fn use_version_control(&self) -> bool {
        self.file.files.use_version_control
    }

    pub fn verbose(&self) -> bool {
        self.file.files.verbose
    }

    /// Defaults with version-control delegation switched on or off.
    pub fn with_version_control(mut self, enabled: bool) -> Self {
        self.file.files.use_version_control = enabled;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.file.files.verbose = verbose;
        self
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    // Prefer a `refile.toml` in the working directory before the platform
    // config dir.
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("refile").join(CONFIG_FILE_NAME);
    }
    // Final fallback relative filename.
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                use_version_control = file.files.use_version_control,
                verbose = file.files.verbose,
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                source: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}
