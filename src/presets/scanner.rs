use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::store::has_preset_extension;

/// Walks `root` for preset files. Returns `None` when cancelled or when the
/// walk fails for any reason other than a permission error. The result is
/// sorted by full path.
pub fn scan_presets(root: &Path, cancel: &AtomicBool) -> Option<Vec<PathBuf>> {
    walk_presets(root, || cancel.load(Ordering::Relaxed))
}

/// `cancelled` is polled before each directory visit and after each entry read.
fn walk_presets<F>(root: &Path, mut cancelled: F) -> Option<Vec<PathBuf>>
where
    F: FnMut() -> bool,
{
    let mut results = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(current) = stack.pop() {
        if cancelled() {
            return None;
        }
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                log::debug!("Skipping unreadable directory {}", current.display());
                continue;
            }
            Err(e) => {
                log::debug!("Preset scan aborted at {}: {}", current.display(), e);
                return None;
            }
        };
        for entry in entries {
            if cancelled() {
                return None;
            }
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.kind() == ErrorKind::PermissionDenied => continue,
                Err(e) => {
                    log::debug!("Preset scan aborted at {}: {}", current.display(), e);
                    return None;
                }
            };
            // file_type does not follow symlinks
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(e) if e.kind() == ErrorKind::PermissionDenied => continue,
                Err(_) => return None,
            };
            if file_type.is_dir() {
                stack.push(entry.path());
            } else if file_type.is_file() && is_preset_name(&entry.file_name()) {
                results.push(entry.path());
            }
        }
    }

    results.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    Some(results)
}

fn is_preset_name(name: &OsStr) -> bool {
    has_preset_extension(&name.to_string_lossy())
}

/// One background scan. The result is sent once through the receiver
/// returned by [`PresetScanner::start`]; a cancelled or failed scan drops
/// the sender without sending.
pub struct PresetScanner {
    root: PathBuf,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl PresetScanner {
    pub fn start(root: PathBuf) -> (Self, oneshot::Receiver<Vec<PathBuf>>) {
        let cancel = Arc::new(AtomicBool::new(false));
        let (sender, receiver) = oneshot::channel();
        log::debug!("Starting preset scan of {}", root.display());

        let handle = tokio::task::spawn_blocking({
            let cancel = Arc::clone(&cancel);
            let root = root.clone();
            move || {
                let Some(results) = scan_presets(&root, &cancel) else {
                    return;
                };
                if !cancel.load(Ordering::Relaxed) {
                    log::debug!("Preset scan of {} found {} file(s)", root.display(), results.len());
                    let _ = sender.send(results);
                }
            }
        });

        (
            Self {
                root,
                cancel,
                handle,
            },
            receiver,
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Requests cancellation. The scan notices at its next check.
    pub fn stop(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Waits up to `timeout` for the scan to end. Returns false if it is still
    /// running; it then exits on its own once it sees the cancel flag.
    pub async fn wait(&mut self, timeout: Duration) -> bool {
        if self.handle.is_finished() {
            return true;
        }
        tokio::time::timeout(timeout, &mut self.handle).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("b.preset"));
        touch(&root.join("A.PRESET"));
        touch(&root.join("notes.txt"));
        touch(&root.join("coop").join("e1.preset"));
        touch(&root.join("coop").join("deep").join("e2.Preset"));
        touch(&root.join("coop").join("deep").join("e2.preset.bak"));
        touch(&root.join("dm").join("map01.preset"));
        fs::create_dir_all(root.join("empty")).unwrap();
        dir
    }

    #[test]
    fn finds_all_presets_sorted() {
        let dir = tree();
        let root = dir.path();
        let found = scan_presets(root, &AtomicBool::new(false)).unwrap();
        let expected: Vec<PathBuf> = vec![
            root.join("A.PRESET"),
            root.join("b.preset"),
            root.join("coop").join("deep").join("e2.Preset"),
            root.join("coop").join("e1.preset"),
            root.join("dm").join("map01.preset"),
        ];
        assert_eq!(found, expected);
    }

    #[test]
    fn cancelled_scan_yields_nothing() {
        let dir = tree();
        assert_eq!(scan_presets(dir.path(), &AtomicBool::new(true)), None);
    }

    #[test]
    fn cancel_after_root_read_yields_nothing() {
        let dir = tree();
        let cancel = AtomicBool::new(false);
        let mut checks = 0;
        let found = walk_presets(dir.path(), || {
            checks += 1;
            // The first check happens before the root is read
            if checks == 2 {
                cancel.store(true, Ordering::Relaxed);
            }
            cancel.load(Ordering::Relaxed)
        });
        assert_eq!(found, None);
        assert_eq!(checks, 2);
    }

    #[test]
    fn cancel_in_subdirectory_yields_nothing() {
        let dir = tree();
        let mut visits = 0;
        // One root visit plus six root entries, then stop inside a subdirectory
        let found = walk_presets(dir.path(), || {
            visits += 1;
            visits > 8
        });
        assert_eq!(found, None);
        assert_eq!(visits, 9);
    }

    #[test]
    fn missing_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cancel = AtomicBool::new(false);
        assert_eq!(scan_presets(&dir.path().join("nope"), &cancel), None);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_dirs_are_not_followed() {
        let dir = tree();
        let root = dir.path();
        std::os::unix::fs::symlink(root.join("coop"), root.join("link")).unwrap();
        let found = scan_presets(root, &AtomicBool::new(false)).unwrap();
        assert!(found.iter().all(|p| !p.starts_with(root.join("link"))));
        assert_eq!(found.len(), 5);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_dir_does_not_abort() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tree();
        let root = dir.path();
        let locked = root.join("locked");
        touch(&locked.join("hidden.preset"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let found = scan_presets(root, &AtomicBool::new(false));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Running as root can still read the locked directory
        let found = found.unwrap();
        assert!(found.contains(&root.join("dm").join("map01.preset")));
        assert!(found.len() == 5 || found.len() == 6);
    }

    #[tokio::test]
    async fn background_scan_delivers_once() {
        let dir = tree();
        let (mut scanner, receiver) = PresetScanner::start(dir.path().to_path_buf());
        let found = receiver.await.unwrap();
        assert_eq!(found.len(), 5);
        assert!(scanner.wait(Duration::from_secs(5)).await);
        assert!(!scanner.is_running());
        assert_eq!(scanner.root(), dir.path());
    }

    #[tokio::test]
    async fn failed_background_scan_closes_channel() {
        let dir = tempfile::tempdir().unwrap();
        let (_scanner, receiver) = PresetScanner::start(dir.path().join("nope"));
        assert!(receiver.await.is_err());
    }
}
