use std::{env, path::PathBuf};

use super::Loader;
use crate::purple_error;
use crate::utils::{
    config::PurpleFlags,
    errors::{PurpleError, PurpleErrorType},
};

impl Loader {
    pub fn load_flags() -> Result<PurpleFlags, PurpleError> {
        let flags = PurpleFlags::new(env::args().collect())?;
        if flags.help {
            flag_documentation();
            std::process::exit(0);
        }
        if flags.version {
            print_version();
            std::process::exit(0);
        }
        Ok(flags)
    }
}

fn next_value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String, PurpleError> {
    args.next().ok_or_else(|| {
        purple_error!(
            PurpleErrorType::FlagLoadError(flag.to_string()),
            format!("The flag \"{}\" expects a value.", flag)
        )
    })
}

impl PurpleFlags {
    /// Parses the full argument list, program name included.
    pub fn new(args: Vec<String>) -> Result<Self, PurpleError> {
        let mut flags = PurpleFlags::default();
        let mut args = args.into_iter().skip(1);
        let mut only_operands = false;

        while let Some(arg) = args.next() {
            if only_operands {
                flags.push_operand(arg);
                continue;
            }
            match arg.as_str() {
                "--" => only_operands = true,
                "--help" | "-h" => flags.help = true,
                "--version" => flags.version = true,
                "--config" | "-c" => flags.config = Some(PathBuf::from(next_value(&mut args, &arg)?)),
                "--presets" => flags.presets = Some(PathBuf::from(next_value(&mut args, &arg)?)),
                "--engine" | "-e" => flags.engine = Some(next_value(&mut args, &arg)?),
                "--iwad" | "-i" => flags.iwad = Some(next_value(&mut args, &arg)?),
                "--mod" | "-m" => flags.mod_file = Some(next_value(&mut args, &arg)?),
                "--map" => flags.map = Some(next_value(&mut args, &arg)?),
                "--preset" | "-p" => flags
                    .preset
                    .push(PathBuf::from(next_value(&mut args, &arg)?)),
                unknown if unknown.starts_with('-') && unknown.len() > 1 => {
                    return Err(purple_error!(
                        PurpleErrorType::FlagLoadError(unknown.to_string()),
                        "Unknown flag. See --help for the list of flags."
                    ))
                }
                _ => flags.push_operand(arg),
            }
        }
        Ok(flags)
    }

    fn push_operand(&mut self, arg: String) {
        if self.command.is_none() {
            self.command = Some(arg);
        } else {
            self.operands.push(arg);
        }
    }
}

pub fn version_string() -> String {
    format!("Purple Launcher v{}", env!("CARGO_PKG_VERSION"))
}

pub fn print_version() {
    println!("{}", version_string());
    println!("Developed by Qwerty0975 and CoderPenguin1-dev");
}

pub fn flag_documentation() {
    let allowed_flags: Vec<(&str, &str)> = vec![
        ("\nUSAGE:", "purple [flags] <command> [args]"),
        ("\nCOMMANDS:", ""),
        ("launch", "Launch the engine. Extra files are sorted by extension."),
        ("save <name>", "Save the selection as <name>.preset in the preset folder."),
        ("list", "Scan the preset folder and list every preset."),
        ("preview", "Show the content of the given presets (default: all)."),
        ("load", "Merge the given presets and show the resulting selection."),
        ("delete", "Delete the given presets."),
        ("credits", "Show the credits."),
        ("init [dir]", "Write a default config.toml."),
        ("\nBASICS:", ""),
        ("--version", "Print the version of the application."),
        ("--help", "Show this help message with allowed flags."),
        ("\nFILES:", ""),
        ("--config", "Specify the configuration file to load."),
        ("--presets", "Use this folder as the preset folder."),
        ("\nSELECTION:", ""),
        ("--engine", "Source port executable (.exe)."),
        ("--iwad", "Base IWAD (.wad)."),
        ("--mod", "Mod file (.wad/.pk3)."),
        ("--map", "Map file (.wad/.pk3/.zip)."),
        ("--preset", "Load a preset first. Repeatable; earlier presets win."),
    ];

    println!("{:<15} {}", "Flag", "Description");
    for (flag, explanation) in allowed_flags {
        println!("{:<15} {}", flag, explanation);
    }
}
