// File logger behind the `log` facade. Every enabled record is appended to
// the log file; PURPLE_LOG_STDERR=1 mirrors records to stderr as well.

use log::{LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use crate::purple_error;
use crate::utils::errors::{PurpleError, PurpleErrorType};

static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));
static MIRROR_STDERR: Lazy<bool> = Lazy::new(|| {
    let v = std::env::var("PURPLE_LOG_STDERR").unwrap_or_default();
    matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
});

struct PurpleLogger;

impl Log for PurpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:>5}] {}: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        );

        if *MIRROR_STDERR {
            eprintln!("{}", line);
        }
        write_line(&line);
    }

    fn flush(&self) {
        if let Ok(mut lf) = LOG_FILE.lock() {
            if let Some(f) = lf.as_mut() {
                let _ = f.flush();
            }
        }
    }
}

fn write_line(line: &str) {
    if let Ok(mut lf) = LOG_FILE.lock() {
        if let Some(f) = lf.as_mut() {
            let _ = writeln!(f, "{}", line);
        }
    }
}

pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Installs the logger and opens `log_path` for appending. `RUST_LOG`
/// overrides the configured level.
pub fn init(log_path: &Path, level: &str) -> Result<(), PurpleError> {
    let level = std::env::var("RUST_LOG")
        .map(|v| parse_level(&v))
        .unwrap_or_else(|_| parse_level(level));

    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            purple_error!(
                PurpleErrorType::DirCreateError(parent.to_path_buf()),
                e.to_string()
            )
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|e| {
            purple_error!(
                PurpleErrorType::FileWriteError(log_path.to_path_buf()),
                e.to_string()
            )
        })?;
    if let Ok(mut lf) = LOG_FILE.lock() {
        *lf = Some(file);
    }

    log::set_boxed_logger(Box::new(PurpleLogger))
        .map_err(|e| purple_error!(PurpleErrorType::LoggerError, e.to_string()))?;
    log::set_max_level(level);
    log::debug!("Logger initialized at level {}", level);
    Ok(())
}

/// Fallback used when the log file cannot be opened: records only reach
/// stderr, and only when mirroring is enabled.
pub fn init_stderr(level: &str) {
    if log::set_boxed_logger(Box::new(PurpleLogger)).is_ok() {
        log::set_max_level(parse_level(level));
    }
}
