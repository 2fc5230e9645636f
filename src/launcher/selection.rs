use std::path::Path;

use super::FileKind;
use crate::actions::launch::spawn_engine;
use crate::purple_error;
use crate::utils::config::ConfigGuard;
use crate::utils::errors::{PurpleError, PurpleErrorType};

pub const IWAD_FLAG: &str = "-iwad";
pub const FILE_FLAG: &str = "-file";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionField {
    Engine,
    Iwad,
    Mod,
    Map,
}
impl SelectionField {
    pub const ALL: [SelectionField; 4] = [
        SelectionField::Engine,
        SelectionField::Iwad,
        SelectionField::Mod,
        SelectionField::Map,
    ];

    /// Key used in preset files.
    pub fn key(&self) -> &'static str {
        match self {
            SelectionField::Engine => "engine",
            SelectionField::Iwad => "iwad",
            SelectionField::Mod => "mod",
            SelectionField::Map => "map",
        }
    }
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
    fn placeholder(&self) -> &'static str {
        match self {
            SelectionField::Engine => "No engine selected",
            SelectionField::Iwad => "No IWAD selected",
            SelectionField::Mod => "No mod selected",
            SelectionField::Map => "No map selected",
        }
    }
}

/// The four chosen paths. An empty string means the field is unset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub engine: String,
    pub iwad: String,
    pub mod_file: String,
    pub map: String,
}

impl Selection {
    pub fn get(&self, field: SelectionField) -> &str {
        match field {
            SelectionField::Engine => &self.engine,
            SelectionField::Iwad => &self.iwad,
            SelectionField::Mod => &self.mod_file,
            SelectionField::Map => &self.map,
        }
    }
    pub fn set<S: Into<String>>(&mut self, field: SelectionField, value: S) {
        let slot = match field {
            SelectionField::Engine => &mut self.engine,
            SelectionField::Iwad => &mut self.iwad,
            SelectionField::Mod => &mut self.mod_file,
            SelectionField::Map => &mut self.map,
        };
        *slot = value.into();
    }
    pub fn is_empty(&self) -> bool {
        SelectionField::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    /// File name of the field, or a placeholder when it is unset.
    pub fn label(&self, field: SelectionField) -> String {
        let value = self.get(field);
        if value.is_empty() {
            return field.placeholder().to_string();
        }
        Path::new(value)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| value.to_string())
    }

    /// Merges records in order. Per field, the first non-empty value wins.
    pub fn merge<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Selection>,
    {
        let mut combined = Selection::default();
        for record in records {
            for field in SelectionField::ALL {
                if combined.get(field).is_empty() {
                    combined.set(field, record.get(field));
                }
            }
        }
        combined
    }

    /// Places a dropped file by its kind. Wads and maps fill the first empty
    /// slot of iwad, mod, map. Returns the field that received the path.
    pub fn assign_dropped(&mut self, path: &str) -> Option<SelectionField> {
        let field = match FileKind::classify(path) {
            FileKind::Engine => SelectionField::Engine,
            FileKind::Mod => SelectionField::Mod,
            FileKind::Wad | FileKind::Map => [
                SelectionField::Iwad,
                SelectionField::Mod,
                SelectionField::Map,
            ]
            .into_iter()
            .find(|f| self.get(*f).is_empty())?,
            FileKind::Unclassified => return None,
        };
        self.set(field, path);
        Some(field)
    }

    /// Program followed by its arguments: `<engine> [-iwad I] [-file M] [-file P]`.
    pub fn command_line(&self) -> Result<Vec<String>, PurpleError> {
        if self.engine.is_empty() {
            return Err(purple_error!(PurpleErrorType::NoEngineSelected, ""));
        }
        let mut cmd = vec![self.engine.clone()];
        for (flag, value) in [
            (IWAD_FLAG, &self.iwad),
            (FILE_FLAG, &self.mod_file),
            (FILE_FLAG, &self.map),
        ] {
            if !value.is_empty() {
                cmd.push(flag.to_string());
                cmd.push(value.clone());
            }
        }
        Ok(cmd)
    }

    /// Spawns the engine without waiting for it.
    pub fn launch(&self) -> Result<u32, PurpleError> {
        let cmd = self.command_line()?;
        let detach = ConfigGuard::read()
            .map(|c| c.launch.detach)
            .unwrap_or(true);
        spawn_engine(&cmd, detach)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(engine: &str, iwad: &str, mod_file: &str, map: &str) -> Selection {
        Selection {
            engine: engine.into(),
            iwad: iwad.into(),
            mod_file: mod_file.into(),
            map: map.into(),
        }
    }

    #[test]
    fn command_line_skips_empty_fields() {
        let s = selection("E", "I", "M", "");
        assert_eq!(
            s.command_line().unwrap(),
            vec!["E", "-iwad", "I", "-file", "M"]
        );
    }

    #[test]
    fn mod_and_map_both_use_file_flag() {
        let s = selection("E", "", "M", "P");
        assert_eq!(
            s.command_line().unwrap(),
            vec!["E", "-file", "M", "-file", "P"]
        );
    }

    #[test]
    fn engine_alone() {
        assert_eq!(selection("E", "", "", "").command_line().unwrap(), vec!["E"]);
    }

    #[test]
    fn missing_engine_is_reported() {
        let err = selection("", "I", "M", "P").command_line().unwrap_err();
        assert_eq!(err.error, PurpleErrorType::NoEngineSelected);
        let err = selection("", "I", "", "").launch().unwrap_err();
        assert_eq!(err.error, PurpleErrorType::NoEngineSelected);
    }

    #[test]
    fn merge_takes_first_non_empty_per_field() {
        let a = selection("/ports/gz", "", "a.pk3", "");
        let b = selection("/ports/other", "doom2.wad", "b.pk3", "map.zip");
        let merged = Selection::merge([&a, &b]);
        assert_eq!(merged, selection("/ports/gz", "doom2.wad", "a.pk3", "map.zip"));
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        assert!(Selection::merge(std::iter::empty()).is_empty());
    }

    #[test]
    fn dropped_files_follow_kind() {
        let mut s = Selection::default();
        assert_eq!(s.assign_dropped("/p/gz.exe"), Some(SelectionField::Engine));
        assert_eq!(s.assign_dropped("/w/doom2.wad"), Some(SelectionField::Iwad));
        assert_eq!(s.assign_dropped("/m/sigil.wad"), Some(SelectionField::Mod));
        assert_eq!(s.assign_dropped("/m/e1.zip"), Some(SelectionField::Map));
        assert_eq!(s.assign_dropped("/m/extra.wad"), None);
        assert_eq!(s.assign_dropped("/m/readme.txt"), None);
        assert_eq!(s, selection("/p/gz.exe", "/w/doom2.wad", "/m/sigil.wad", "/m/e1.zip"));
    }

    #[test]
    fn dropped_pk3_replaces_mod() {
        let mut s = selection("", "", "old.pk3", "");
        assert_eq!(s.assign_dropped("new.pk3"), Some(SelectionField::Mod));
        assert_eq!(s.mod_file, "new.pk3");
    }

    #[test]
    fn labels() {
        let s = selection("/ports/gzdoom", "", "", "");
        assert_eq!(s.label(SelectionField::Engine), "gzdoom");
        assert_eq!(s.label(SelectionField::Iwad), "No IWAD selected");
    }
}
