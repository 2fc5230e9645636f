use std::fs;
use std::path::{Path, PathBuf};

use crate::launcher::{Selection, SelectionField};
use crate::loader::flag_loader::{flag_documentation, version_string};
use crate::presets::store::with_preset_extension;
use crate::presets::{PresetBrowser, PresetStore};
use crate::purple_error;
use crate::utils::config::{PurpleConfig, PurpleFlags};
use crate::utils::errors::{PurpleError, PurpleErrorType};
use crate::utils::paths;

/// Command-line front end over the selection model and the preset folder.
pub struct Shell {
    flags: PurpleFlags,
    browser: PresetBrowser,
}

impl Shell {
    pub fn new(flags: PurpleFlags, browser: PresetBrowser) -> Self {
        Self { flags, browser }
    }

    pub async fn run(&mut self) -> Result<(), PurpleError> {
        let command = self.flags.command.clone();
        let result = match command.as_deref() {
            None => {
                flag_documentation();
                Ok(())
            }
            Some("launch") => self.launch(),
            Some("save") => self.save().await,
            Some("list") => self.list().await,
            Some("preview") => self.preview().await,
            Some("load") => self.load(),
            Some("delete") => self.delete().await,
            Some("credits") => {
                println!("{}", credits());
                Ok(())
            }
            Some("init") => self.init(),
            Some(other) => Err(purple_error!(
                PurpleErrorType::FlagLoadError(other.to_string()),
                "Unknown command. See --help for the list of commands."
            )),
        };
        self.browser.shutdown().await;
        result
    }

    /// Presets first (earlier wins per field), then explicit flags, then
    /// loose files sorted into empty slots by extension.
    pub fn build_selection(&self, loose_files: &[String]) -> Selection {
        let records: Vec<Selection> = self
            .flags
            .preset
            .iter()
            .map(|p| self.browser.resolve(&p.to_string_lossy()))
            .filter(|p| {
                let exists = p.is_file();
                if !exists {
                    log::warn!("Skipping missing preset {}", p.display());
                }
                exists
            })
            .map(|p| PresetStore::parse(&p))
            .collect();
        let mut selection = Selection::merge(&records);

        for (field, value) in [
            (SelectionField::Engine, &self.flags.engine),
            (SelectionField::Iwad, &self.flags.iwad),
            (SelectionField::Mod, &self.flags.mod_file),
            (SelectionField::Map, &self.flags.map),
        ] {
            if let Some(value) = value {
                selection.set(field, value.as_str());
            }
        }

        for file in loose_files {
            match selection.assign_dropped(file) {
                Some(field) => log::debug!("Assigned {} to {}", file, field.key()),
                None => println!("Ignored: {}", file),
            }
        }
        selection
    }

    fn launch(&self) -> Result<(), PurpleError> {
        let selection = self.build_selection(&self.flags.operands);
        print_selection(&selection);
        let pid = selection.launch()?;
        println!("Launched {} (pid {})", selection.label(SelectionField::Engine), pid);
        Ok(())
    }

    async fn save(&mut self) -> Result<(), PurpleError> {
        let (name, loose_files) = self.flags.operands.split_first().ok_or_else(|| {
            purple_error!(
                PurpleErrorType::FlagLoadError("save".to_string()),
                "Missing preset name."
            )
        })?;
        let selection = self.build_selection(loose_files);
        if selection.is_empty() {
            println!("Warning: no files selected, the preset will be empty.");
        }
        let path = self.browser.resolve(&with_preset_extension(name));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                purple_error!(
                    PurpleErrorType::DirCreateError(parent.to_path_buf()),
                    e.to_string()
                )
            })?;
        }
        PresetStore::save(&path, &selection)?;
        println!("Preset saved: {}", file_label(&path));

        let count = self.browser.refresh().await.len();
        log::debug!("{} preset(s) after save", count);
        Ok(())
    }

    async fn list(&mut self) -> Result<(), PurpleError> {
        println!("Preset folder: {}", self.browser.root().display());
        let entries = self.browser.refresh().await.to_vec();
        if entries.is_empty() {
            println!("No presets found.");
        }
        for path in &entries {
            println!("{}", self.browser.display_name(path));
        }
        Ok(())
    }

    async fn preview(&mut self) -> Result<(), PurpleError> {
        let paths = if self.flags.operands.is_empty() {
            self.browser.refresh().await.to_vec()
        } else {
            self.resolve_operands()
        };
        println!("{}", PresetStore::preview(&paths, self.browser.root()));
        Ok(())
    }

    fn load(&self) -> Result<(), PurpleError> {
        let paths = self.resolve_operands();
        if paths.is_empty() {
            return Err(purple_error!(PurpleErrorType::NoPresetsSelected, ""));
        }
        let records: Vec<Selection> = paths
            .iter()
            .filter(|p| p.is_file())
            .map(|p| PresetStore::parse(p))
            .collect();
        let selection = Selection::merge(&records);
        print_selection(&selection);
        println!("Loaded {} preset(s).", paths.len());
        Ok(())
    }

    async fn delete(&mut self) -> Result<(), PurpleError> {
        let paths = self.resolve_operands();
        if paths.is_empty() {
            return Err(purple_error!(PurpleErrorType::NoPresetsSelected, ""));
        }
        // Only presets found by a scan of the root may be removed
        self.browser.refresh().await;
        let (listed, unlisted): (Vec<PathBuf>, Vec<PathBuf>) = paths
            .into_iter()
            .partition(|p| self.browser.entries().contains(p));
        let mut report = PresetStore::delete(&listed, self.browser.root());
        report
            .failed
            .extend(unlisted.iter().map(|p| self.browser.display_name(p)));

        let remaining = self.browser.refresh().await.len();
        println!("{}", report);
        log::debug!("{} preset(s) left", remaining);
        Ok(())
    }

    fn init(&self) -> Result<(), PurpleError> {
        let dir = match self.flags.operands.first() {
            Some(dir) => PathBuf::from(dir),
            None => paths::get_config_dir()?,
        };
        let path = PurpleConfig::to_file(&dir)?;
        if self.flags.operands.first().is_some() {
            println!(
                "\nUse \x1b[32mpurple --config {}\x1b[0m to run purple with the custom configuration.",
                path.display()
            );
        }
        Ok(())
    }

    fn resolve_operands(&self) -> Vec<PathBuf> {
        self.flags
            .operands
            .iter()
            .map(|arg| self.browser.resolve(arg))
            .collect()
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn print_selection(selection: &Selection) {
    for (title, field) in [
        ("Source Port", SelectionField::Engine),
        ("Base IWAD", SelectionField::Iwad),
        ("Mod", SelectionField::Mod),
        ("Map", SelectionField::Map),
    ] {
        println!("{:<12} {}", title, selection.label(field));
    }
}

pub fn credits() -> String {
    format!(
        "---- CREATORS ----\n\
         Qwerty0975\n\
         CoderPenguin1-dev\n\
         ---- TESTERS ----\n\
         CoderPenguin1-dev\n\
         \n\
         ---- INSPIRATIONS ----\n\
         Minty Launcher CoderPenguin1-dev\n\
         GZDoom Launcher\n\
         \n\
         {}",
        version_string()
    )
}
