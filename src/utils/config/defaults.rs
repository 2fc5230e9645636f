use std::path::PathBuf;

use crate::utils::paths;

pub struct FileDefaults;
impl FileDefaults {
    pub fn preset_root() -> PathBuf {
        PathBuf::from("./presets")
    }
    pub fn config() -> PathBuf {
        paths::get_config_dir()
            .map(|dir| dir.join("config.toml"))
            .unwrap_or_else(|_| PathBuf::from("~/.config/purple/config.toml"))
    }
    pub fn log() -> PathBuf {
        paths::get_cache_dir()
            .map(|dir| dir.join("purple.log"))
            .unwrap_or_else(|_| PathBuf::from("~/.cache/purple/purple.log"))
    }
}

pub struct OtherDefaults;
impl OtherDefaults {
    pub fn bool_true() -> bool {
        true
    }
    pub fn stop_timeout_ms() -> u64 {
        200
    }
    pub fn log_level() -> String {
        String::from("info")
    }
}
