use crate::utils::config::{
    defaults::{FileDefaults, OtherDefaults},
    ConfigDebug, ConfigFiles, ConfigLaunch, ConfigPresets, ConfigScan,
};

impl Default for ConfigPresets {
    fn default() -> Self {
        Self {
            root: FileDefaults::preset_root(),
        }
    }
}

impl Default for ConfigScan {
    fn default() -> Self {
        Self {
            stop_timeout_ms: OtherDefaults::stop_timeout_ms(),
        }
    }
}

impl Default for ConfigLaunch {
    fn default() -> Self {
        Self { detach: true }
    }
}

impl Default for ConfigDebug {
    fn default() -> Self {
        Self {
            log_level: OtherDefaults::log_level(),
            try_suppress_warnings: false,
        }
    }
}

impl Default for ConfigFiles {
    fn default() -> Self {
        Self {
            log: FileDefaults::log(),
        }
    }
}
