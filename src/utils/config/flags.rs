use std::path::PathBuf;

use crate::{
    purple_error,
    utils::{
        config::{FileDefaults, PurpleConfig},
        errors::{PurpleError, PurpleErrorType},
        files::{expand_path, home_dir},
    },
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PurpleFlags {
    pub config: Option<PathBuf>,
    pub presets: Option<PathBuf>,
    pub engine: Option<String>,
    pub iwad: Option<String>,
    pub mod_file: Option<String>,
    pub map: Option<String>,
    pub preset: Vec<PathBuf>,
    pub command: Option<String>,
    pub operands: Vec<String>,
    pub help: bool,
    pub version: bool,
}

impl PurpleFlags {
    pub fn to_config(&self) -> Result<(PurpleConfig, Vec<PurpleError>), PurpleError> {
        // Get location of config file
        let mut path = match &self.config {
            Some(path) => expand_path(path, &home_dir()?),
            None => FileDefaults::config(),
        };

        // logic to either use json or toml
        let filetype = match path.extension().map(|e| e.to_string_lossy().to_lowercase()) {
            Some(ext) if ext == "json" => {
                if !path.exists() {
                    path.set_extension("toml");
                    "toml"
                } else {
                    "json"
                }
            }
            Some(ext) if ext == "toml" => {
                if !path.exists() {
                    path.set_extension("json");
                    "json"
                } else {
                    "toml"
                }
            }
            _ => {
                return Err(purple_error!(
                    PurpleErrorType::FileParseError(path.clone()),
                    format!(
                        "The file \"{}\" is not in a valid format.",
                        path.to_string_lossy()
                    )
                ))
            }
        };

        match std::fs::read_to_string(&path) {
            Ok(config_str) => {
                let config_res: Result<PurpleConfig, PurpleError> = match filetype {
                    "json" => {
                        let mut bytes = config_str.into_bytes();
                        simd_json::from_slice(&mut bytes).map_err(|e| {
                            purple_error!(
                                PurpleErrorType::FileParseError(path.clone()),
                                e.to_string()
                            )
                        })
                    }
                    _ => toml::de::from_str(&config_str).map_err(|e| {
                        purple_error!(
                            PurpleErrorType::FileParseError(path.clone()),
                            e.to_string()
                        )
                    }),
                };
                match config_res {
                    Ok(config) => Ok((PurpleConfig::apply_flags(self, config), vec![])),
                    Err(e) => {
                        let config = PurpleConfig::apply_flags(self, PurpleConfig::default());
                        Ok((config, vec![e]))
                    }
                }
            }
            Err(e) => {
                let config = PurpleConfig::apply_flags(self, PurpleConfig::default());
                // A missing default config is normal; only an explicit one is worth a warning
                if self.config.is_none() && e.kind() == std::io::ErrorKind::NotFound {
                    return Ok((config, vec![]));
                }
                let e = purple_error!(PurpleErrorType::FileReadError(path), e.to_string());
                Ok((config, vec![e]))
            }
        }
    }
}
