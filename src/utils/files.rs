use std::env;
use std::path::{Component, Path, PathBuf};

use crate::purple_error;
use crate::utils::errors::{PurpleError, PurpleErrorType};

pub fn home_dir() -> Result<PathBuf, PurpleError> {
    env::var("HOME").map(PathBuf::from).map_err(|e| {
        purple_error!(
            PurpleErrorType::EnvVarNotFoundError("HOME".to_string()),
            e.to_string()
        )
    })
}

/// Replaces a leading `~` with the home directory.
pub fn expand_path(path: &Path, home: &Path) -> PathBuf {
    let mut components = path.components();
    if let Some(Component::Normal(first)) = components.next() {
        if first == "~" {
            return home.join(components.as_path());
        }
    }
    path.to_path_buf()
}

/// Absolute form of `path` with `.` and `..` removed lexically. Symlinks are
/// not resolved.
pub fn absolute_path(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Path of `path` as seen from `root`, climbing with `..` where needed.
pub fn relative_to(path: &Path, root: &Path) -> PathBuf {
    let path = absolute_path(path);
    let root = absolute_path(root);
    let path_parts: Vec<Component> = path.components().collect();
    let root_parts: Vec<Component> = root.components().collect();

    let common = path_parts
        .iter()
        .zip(root_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return path;
    }

    let mut relative = PathBuf::new();
    for _ in common..root_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        relative
    }
}
