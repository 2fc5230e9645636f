use std::fmt;
use std::path::PathBuf;

#[macro_export]
macro_rules! purple_error {
    ($errtype:expr, $source:expr) => {
        $crate::utils::errors::PurpleError {
            error: $errtype,
            traceback: format!("{}:{}\n{}", file!(), line!(), $source),
        }
    };
}

#[derive(Clone, Debug)]
pub struct PurpleError {
    pub error: PurpleErrorType,
    pub traceback: String,
}
impl PurpleError {
    /// Logs the error and returns it, for call sites that only report.
    pub fn report(self) -> Self {
        let (title, detail) = self.error.get_message();
        log::error!("{}: {} ({})", title, detail, self.traceback.replace('\n', " | "));
        self
    }
    /// Message shown to the user. The traceback stays in the log.
    pub fn user_message(&self) -> String {
        let (title, detail) = self.error.get_message();
        let source = self.traceback.lines().skip(1).collect::<Vec<_>>().join(" ");
        if source.trim().is_empty() {
            format!("{}: {}", title, detail)
        } else {
            format!("{}: {}\n{}", title, detail, source)
        }
    }
}
impl fmt::Display for PurpleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}
impl std::error::Error for PurpleError {}

#[derive(Clone, Debug, PartialEq)]
pub enum PurpleErrorType {
    // Selection
    NoEngineSelected,
    NoPresetsSelected,

    // Processes
    CommandExecutionError(String),

    // Files
    FileReadError(PathBuf),
    FileWriteError(PathBuf),
    FileRemoveError(PathBuf),
    FileParseError(PathBuf),

    // Directories
    DirCreateError(PathBuf),

    // Config and startup
    ConfigError(Option<String>),
    EnvVarNotFoundError(String),
    FlagLoadError(String),
    LoggerError,
}

impl PurpleErrorType {
    pub fn get_message(&self) -> (String, String) {
        fn file_msg(action: &str, path: &PathBuf) -> String {
            format!(r#"Failed to {} file "{}""#, action, path.to_string_lossy())
        }
        fn dir_msg(action: &str, path: &PathBuf) -> String {
            format!(r#"Failed to {} directory "{}""#, action, path.to_string_lossy())
        }
        let title = match self {
            PurpleErrorType::NoEngineSelected | PurpleErrorType::CommandExecutionError(_) => {
                "Launch Failed"
            }
            PurpleErrorType::NoPresetsSelected => "No Selection",
            PurpleErrorType::FileWriteError(_) | PurpleErrorType::DirCreateError(_) => {
                "Save Failed"
            }
            PurpleErrorType::FileRemoveError(_) => "Delete Failed",
            PurpleErrorType::ConfigError(_)
            | PurpleErrorType::FlagLoadError(_)
            | PurpleErrorType::EnvVarNotFoundError(_)
            | PurpleErrorType::LoggerError => "Startup Error",
            _ => "Error",
        };
        let message = match self {
            PurpleErrorType::NoEngineSelected => "No source port selected.".to_string(),
            PurpleErrorType::NoPresetsSelected => "No presets selected.".to_string(),
            PurpleErrorType::CommandExecutionError(cmd) => {
                format!(r#"Failed to execute command "{}""#, cmd)
            }
            PurpleErrorType::FileReadError(path) => file_msg("read", path),
            PurpleErrorType::FileWriteError(path) => file_msg("write", path),
            PurpleErrorType::FileRemoveError(path) => file_msg("remove", path),
            PurpleErrorType::FileParseError(path) => file_msg("parse", path),
            PurpleErrorType::DirCreateError(path) => dir_msg("create", path),
            PurpleErrorType::ConfigError(detail) => match detail {
                Some(d) => format!("Config error: {}", d),
                None => "Config error".to_string(),
            },
            PurpleErrorType::EnvVarNotFoundError(var) => {
                format!(r#"Environment variable "{}" is not set"#, var)
            }
            PurpleErrorType::FlagLoadError(flag) => format!(r#"Invalid argument "{}""#, flag),
            PurpleErrorType::LoggerError => "Failed to initialize the logger".to_string(),
        };
        (title.to_string(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_records_call_site() {
        let err = purple_error!(PurpleErrorType::NoEngineSelected, "");
        assert!(err.traceback.starts_with(file!()));
        assert_eq!(err.error, PurpleErrorType::NoEngineSelected);
    }

    #[test]
    fn user_message_hides_location() {
        let err = purple_error!(
            PurpleErrorType::CommandExecutionError("doom".into()),
            "No such file or directory"
        );
        let msg = err.user_message();
        assert!(msg.starts_with(r#"Launch Failed: Failed to execute command "doom""#));
        assert!(msg.ends_with("No such file or directory"));
        assert!(!msg.contains("errors.rs"));
    }
}
