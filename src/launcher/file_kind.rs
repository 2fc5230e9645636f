use std::path::Path;

/// Role a file plays, judged from its extension alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    Engine,
    Mod,
    Wad,
    Map,
    Unclassified,
}

impl FileKind {
    pub fn classify<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());
        match ext.as_deref() {
            Some("exe") => FileKind::Engine,
            Some("pk3") => FileKind::Mod,
            Some("wad") => FileKind::Wad,
            Some("zip") => FileKind::Map,
            _ => FileKind::Unclassified,
        }
    }
}
