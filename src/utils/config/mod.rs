use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard},
};

use super::{
    errors::{PurpleError, PurpleErrorType},
    files::{absolute_path, expand_path, home_dir},
};
use crate::{purple_error, CONFIG};

mod defaults;
mod flags;
mod imp;

pub use defaults::{FileDefaults, OtherDefaults};
pub use flags::PurpleFlags;

/// Configuration sections:
///
/// - **presets**: Where preset files are saved and scanned.
/// - **scan**: Background scan behavior (e.g., how long to wait for a stop).
/// - **launch**: How the engine process is spawned.
/// - **debug**: Logging and warning preferences.
/// - **files**: User-specified overrides for default file paths.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct PurpleConfig {
    #[serde(default)]
    pub presets: ConfigPresets,

    #[serde(default)]
    pub scan: ConfigScan,

    #[serde(default)]
    pub launch: ConfigLaunch,

    #[serde(default)]
    pub debug: ConfigDebug,

    #[serde(default)]
    pub files: ConfigFiles,
}
impl PurpleConfig {
    /// Loads the config file named by the flags (or the default location)
    /// and applies flag overrides. A missing or malformed file falls back to
    /// defaults and is returned as a non-breaking error.
    pub fn from_flags(
        flags: &PurpleFlags,
    ) -> Result<(PurpleConfig, Vec<PurpleError>), PurpleError> {
        flags.to_config()
    }

    /// # Arguments
    /// loc: directory the `config.toml` is written into
    pub fn to_file(loc: &Path) -> Result<PathBuf, PurpleError> {
        let home = home_dir()?;
        let dir = expand_path(loc, &home);

        fs::create_dir_all(&dir).map_err(|e| {
            purple_error!(PurpleErrorType::DirCreateError(dir.clone()), e.to_string())
        })?;

        let path = dir.join("config.toml");
        if path.exists() {
            println!("↷ Skipping '{}' since file exists already.", path.display());
            return Ok(path);
        }

        let toml_str = toml::to_string(&PurpleConfig::default()).map_err(|e| {
            purple_error!(PurpleErrorType::FileWriteError(path.clone()), e.to_string())
        })?;
        fs::write(&path, toml_str).map_err(|e| {
            purple_error!(PurpleErrorType::FileWriteError(path.clone()), e.to_string())
        })?;
        println!("✓ Created '{}'", path.display());
        Ok(path)
    }

    pub fn apply_flags(flags: &PurpleFlags, mut config: PurpleConfig) -> PurpleConfig {
        if let Some(root) = &flags.presets {
            config.presets.root = root.clone();
        }

        // Make paths that contain the ~ dir use the correct path
        if let Ok(home) = home_dir() {
            config.files.log = expand_path(&config.files.log, &home);
            config.presets.root = expand_path(&config.presets.root, &home);
        }
        config.presets.root = absolute_path(&config.presets.root);
        config
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ConfigPresets {
    #[serde(default = "FileDefaults::preset_root")]
    pub root: PathBuf,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ConfigScan {
    /// Milliseconds to wait for a cancelled scan before moving on
    #[serde(default = "OtherDefaults::stop_timeout_ms")]
    pub stop_timeout_ms: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ConfigLaunch {
    /// Start the engine in its own session with stdio detached
    #[serde(default = "OtherDefaults::bool_true")]
    pub detach: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ConfigDebug {
    #[serde(default = "OtherDefaults::log_level")]
    pub log_level: String,
    #[serde(default)]
    pub try_suppress_warnings: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ConfigFiles {
    #[serde(default = "FileDefaults::log")]
    pub log: PathBuf,
}

pub struct ConfigGuard;
impl<'g> ConfigGuard {
    fn get_config() -> Result<&'g RwLock<PurpleConfig>, PurpleError> {
        CONFIG.get().ok_or_else(|| {
            purple_error!(
                PurpleErrorType::ConfigError(None),
                "Config not initialized".to_string()
            )
        })
    }

    fn get_read() -> Result<RwLockReadGuard<'g, PurpleConfig>, PurpleError> {
        Self::get_config()?.read().map_err(|_| {
            purple_error!(
                PurpleErrorType::ConfigError(None),
                "Failed to acquire read lock on config".to_string()
            )
        })
    }

    pub fn read() -> Result<RwLockReadGuard<'g, PurpleConfig>, PurpleError> {
        Self::get_read()
    }
}
