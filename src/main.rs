use once_cell::sync::OnceCell;
use std::process;
use std::sync::RwLock;
use std::time::Duration;

mod actions;
mod launcher;
mod loader;
mod presets;
mod ui;
mod utils;

use loader::Loader;
use presets::PresetBrowser;
use ui::Shell;
use utils::{
    config::{ConfigGuard, PurpleConfig, PurpleFlags},
    errors::{PurpleError, PurpleErrorType},
    logging,
};

static CONFIG: OnceCell<RwLock<PurpleConfig>> = OnceCell::new();

#[tokio::main]
async fn main() {
    let flags = match Loader::load_flags() {
        Ok(flags) => flags,
        Err(e) => {
            eprintln!("{}", e.user_message());
            process::exit(2);
        }
    };

    let (startup_errors, warnings) = startup_loading(&flags);
    for e in startup_errors {
        eprintln!("{}", e.report().user_message());
    }
    let suppress = ConfigGuard::read()
        .map(|c| c.debug.try_suppress_warnings)
        .unwrap_or(false);
    for w in warnings {
        let (_, detail) = w.error.get_message();
        log::warn!("{}", detail);
        if !suppress {
            eprintln!("Warning: {}", detail);
        }
    }

    let (root, stop_timeout) = match ConfigGuard::read() {
        Ok(c) => (
            c.presets.root.clone(),
            Duration::from_millis(c.scan.stop_timeout_ms),
        ),
        Err(e) => {
            eprintln!("{}", e.report().user_message());
            process::exit(1);
        }
    };

    let mut shell = Shell::new(flags, PresetBrowser::new(root, stop_timeout));
    let code = match shell.run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", e.report().user_message());
            1
        }
    };
    log::logger().flush();
    process::exit(code);
}

/// Loads the config and installs the logger. Returns (errors, non-breaking
/// warnings); the config is always set, falling back to defaults.
fn startup_loading(flags: &PurpleFlags) -> (Vec<PurpleError>, Vec<PurpleError>) {
    let mut startup_errors = Vec::new();
    let mut non_breaking = Vec::new();

    let app_config = PurpleConfig::from_flags(flags).map_or_else(
        |e| {
            startup_errors.push(e);
            PurpleConfig::apply_flags(flags, PurpleConfig::default())
        },
        |(cfg, non_crit)| {
            non_breaking.extend(non_crit);
            cfg
        },
    );

    if let Err(e) = logging::init(&app_config.files.log, &app_config.debug.log_level) {
        logging::init_stderr(&app_config.debug.log_level);
        non_breaking.push(e);
    }

    if CONFIG.set(RwLock::new(app_config)).is_err() {
        startup_errors.push(purple_error!(
            PurpleErrorType::ConfigError(None),
            "Config was already initialized"
        ));
    }

    (startup_errors, non_breaking)
}
