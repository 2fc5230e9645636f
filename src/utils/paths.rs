use std::env;
use std::path::PathBuf;

use crate::utils::errors::PurpleError;
use crate::utils::files::home_dir;

/// `$XDG_CONFIG_HOME/purple`, falling back to `~/.config/purple`.
pub fn get_config_dir() -> Result<PathBuf, PurpleError> {
    xdg_or_home("XDG_CONFIG_HOME", ".config")
}

/// `$XDG_CACHE_HOME/purple`, falling back to `~/.cache/purple`.
pub fn get_cache_dir() -> Result<PathBuf, PurpleError> {
    xdg_or_home("XDG_CACHE_HOME", ".cache")
}

fn xdg_or_home(var: &str, fallback: &str) -> Result<PathBuf, PurpleError> {
    match env::var(var) {
        Ok(base) if !base.is_empty() => Ok(PathBuf::from(base).join("purple")),
        _ => Ok(home_dir()?.join(fallback).join("purple")),
    }
}
