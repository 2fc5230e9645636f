use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::launcher::{Selection, SelectionField};
use crate::purple_error;
use crate::utils::errors::{PurpleError, PurpleErrorType};
use crate::utils::files::relative_to;

pub const PRESET_EXTENSION: &str = "preset";
const PRESET_LABEL: &str = "# Purple Launcher preset";
const SECTION_MARKER: &str = "[PRESET]";

/// Version string written into every preset header.
pub fn version_label() -> String {
    format!("PATCH {}", env!("CARGO_PKG_VERSION"))
}

/// Appends `.preset` unless the name already ends with it (any case).
pub fn with_preset_extension(name: &str) -> String {
    if has_preset_extension(name) {
        name.to_string()
    } else {
        format!("{}.{}", name, PRESET_EXTENSION)
    }
}

pub fn has_preset_extension(name: &str) -> bool {
    name.to_lowercase()
        .ends_with(&format!(".{}", PRESET_EXTENSION))
}

pub struct PresetStore;
impl PresetStore {
    /// Text written by [`PresetStore::save`] for a preset stored at `path`.
    pub fn render(path: &Path, selection: &Selection, created: DateTime<Utc>) -> String {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut lines = vec![
            PRESET_LABEL.to_string(),
            format!("# Created: {}", created.format("%Y-%m-%d %H:%M:%SZ")),
            format!("# VERSION: {}", version_label()),
            SECTION_MARKER.to_string(),
            format!("name={}", name),
        ];
        for field in SelectionField::ALL {
            lines.push(format!("{}={}", field.key(), selection.get(field)));
        }
        lines.join("\n") + "\n"
    }

    /// Writes the preset, replacing any file already at `path`.
    pub fn save(path: &Path, selection: &Selection) -> Result<(), PurpleError> {
        let content = Self::render(path, selection, Utc::now());
        fs::write(path, content).map_err(|e| {
            purple_error!(
                PurpleErrorType::FileWriteError(path.to_path_buf()),
                e.to_string()
            )
        })?;
        log::info!("Saved preset {}", path.display());
        Ok(())
    }

    /// Reads the four known fields. Never fails: unreadable files give an
    /// empty selection and missing keys stay empty.
    pub fn parse(path: &Path) -> Selection {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse_str(&content),
            Err(e) => {
                log::debug!("Could not read preset {}: {}", path.display(), e);
                Selection::default()
            }
        }
    }

    pub fn parse_str(content: &str) -> Selection {
        let mut result = Selection::default();
        let mut seen: HashSet<SelectionField> = HashSet::new();
        for line in content.lines() {
            let line = line.trim_end_matches('\r');
            if line.trim_start().starts_with('#') {
                continue;
            }
            // Only the key side is trimmed, values are kept verbatim
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim_start();
            // First occurrence of a key wins
            if let Some(field) = SelectionField::from_key(key) {
                if seen.insert(field) {
                    result.set(field, value);
                }
            }
        }
        result
    }

    /// Human-readable dump of the given preset files, in order.
    pub fn preview(paths: &[PathBuf], root: &Path) -> String {
        paths
            .iter()
            .map(|path| {
                let display = relative_to(path, root);
                if !path.is_file() {
                    return format!("Missing: {}", display.display());
                }
                match fs::read_to_string(path) {
                    Ok(content) => format!("--- {} ---\n{}", display.display(), content),
                    Err(e) => format!("Failed to read {}: {}", file_name(path), e),
                }
            })
            .collect::<Vec<String>>()
            .join("\n\n")
    }

    /// Removes every given preset file, collecting failures instead of
    /// stopping. Files without the preset extension are never removed.
    pub fn delete(paths: &[PathBuf], root: &Path) -> DeleteReport {
        let mut report = DeleteReport::default();
        for path in paths {
            let display = relative_to(path, root).display().to_string();
            if !path.is_file() {
                report.failed.push(display);
                continue;
            }
            if !has_preset_extension(&path.to_string_lossy()) {
                log::warn!("Refusing to delete {}: not a preset file", path.display());
                report.failed.push(display);
                continue;
            }
            match fs::remove_file(path) {
                Ok(_) => {
                    log::info!("Deleted preset {}", path.display());
                    report.deleted += 1;
                }
                Err(e) => {
                    let err = purple_error!(
                        PurpleErrorType::FileRemoveError(path.clone()),
                        e.to_string()
                    );
                    log::warn!("{}", err.user_message());
                    report.failed.push(display);
                }
            }
        }
        report
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Default, PartialEq)]
pub struct DeleteReport {
    pub deleted: usize,
    pub failed: Vec<String>,
}
impl fmt::Display for DeleteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deleted {} preset(s).", self.deleted)?;
        if !self.failed.is_empty() {
            write!(f, " Failed: {}", self.failed.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn selection(engine: &str, iwad: &str, mod_file: &str, map: &str) -> Selection {
        Selection {
            engine: engine.into(),
            iwad: iwad.into(),
            mod_file: mod_file.into(),
            map: map.into(),
        }
    }

    #[test]
    fn render_layout() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let text = PresetStore::render(
            Path::new("/presets/deathmatch1.preset"),
            &selection("/path/to/port", "/path/to/base.wad", "/path/to/mod.pk3", ""),
            created,
        );
        let expected = format!(
            "# Purple Launcher preset\n\
             # Created: 2024-01-01 00:00:00Z\n\
             # VERSION: {}\n\
             [PRESET]\n\
             name=deathmatch1\n\
             engine=/path/to/port\n\
             iwad=/path/to/base.wad\n\
             mod=/path/to/mod.pk3\n\
             map=\n",
            version_label()
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn save_then_parse_keeps_fields() {
        let dir = tempfile::tempdir().unwrap();
        let cases = [
            selection("", "", "", ""),
            selection("/p/gz", "", "", ""),
            selection("", "doom.wad", "", "e1.zip"),
            selection("C:\\ports\\gz.exe", "a=b.wad", " spaced.pk3", "m.wad"),
            selection("/ports/gz ", "doom.wad\t", "", "trailing = "),
        ];
        for (i, case) in cases.iter().enumerate() {
            let path = dir.path().join(format!("case{}.preset", i));
            PresetStore::save(&path, case).unwrap();
            assert_eq!(&PresetStore::parse(&path), case);
        }
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coop.preset");
        PresetStore::save(&path, &selection("old", "", "", "")).unwrap();
        PresetStore::save(&path, &selection("new", "", "", "")).unwrap();
        assert_eq!(PresetStore::parse(&path).engine, "new");
    }

    #[test]
    fn save_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("x.preset");
        let err = PresetStore::save(&path, &Selection::default()).unwrap_err();
        assert_eq!(err.error, PurpleErrorType::FileWriteError(path));
    }

    #[test]
    fn parse_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.preset");
        fs::write(&path, "engine=E\nmod=M\n").unwrap();
        assert_eq!(PresetStore::parse(&path), PresetStore::parse(&path));
    }

    #[test]
    fn first_duplicate_key_wins() {
        let parsed = PresetStore::parse_str("engine=first\nengine=second\n");
        assert_eq!(parsed.engine, "first");

        let parsed = PresetStore::parse_str("engine=\nengine=second\n");
        assert_eq!(parsed.engine, "");
    }

    #[test]
    fn tolerates_junk_lines() {
        let parsed = PresetStore::parse_str(
            "garbage\n# engine=commented\n  #iwad=also\n[PRESET]\n  iwad = spaced\nmap=a=b\r\nname=x\nunknown=1\n",
        );
        assert_eq!(parsed.engine, "");
        assert_eq!(parsed.iwad, "");
        assert_eq!(parsed.map, "a=b");
    }

    #[test]
    fn unreadable_file_gives_empty_record() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PresetStore::parse(&dir.path().join("missing.preset")).is_empty());

        let path = dir.path().join("binary.preset");
        fs::write(&path, [b'e', b'n', b'g', b'i', b'n', b'e', b'=', 0xff, 0xfe]).unwrap();
        assert!(PresetStore::parse(&path).is_empty());
    }

    #[test]
    fn preview_entries_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("coop")).unwrap();
        let a = root.join("coop").join("a.preset");
        fs::write(&a, "engine=E\n").unwrap();
        let missing = root.join("gone.preset");

        let text = PresetStore::preview(&[missing, a], root);
        assert_eq!(text, "Missing: gone.preset\n\n--- coop/a.preset ---\nengine=E\n");
    }

    #[test]
    fn preview_of_nothing_is_empty() {
        assert_eq!(PresetStore::preview(&[], Path::new("/")), "");
    }

    #[test]
    fn delete_reports_batch() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let a = root.join("a.preset");
        let b = root.join("b.preset");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();

        let report = PresetStore::delete(&[a.clone(), root.join("ghost.preset"), b.clone()], root);
        assert_eq!(report.deleted, 2);
        assert_eq!(report.failed, vec!["ghost.preset".to_string()]);
        assert_eq!(report.to_string(), "Deleted 2 preset(s). Failed: ghost.preset");
        assert!(!a.exists() && !b.exists());
    }

    #[test]
    fn delete_leaves_non_preset_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let wad = root.join("doom2.wad");
        let preset = root.join("coop.preset");
        fs::write(&wad, "IWAD").unwrap();
        fs::write(&preset, "").unwrap();

        let report = PresetStore::delete(&[wad.clone(), preset.clone()], root);
        assert_eq!(report.deleted, 1);
        assert_eq!(report.failed, vec!["doom2.wad".to_string()]);
        assert!(wad.exists());
        assert!(!preset.exists());
    }

    #[test]
    fn extension_helpers() {
        assert_eq!(with_preset_extension("coop"), "coop.preset");
        assert_eq!(with_preset_extension("coop.PRESET"), "coop.PRESET");
        assert!(!has_preset_extension("coop.presets"));
    }
}
