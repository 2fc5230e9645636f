use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::oneshot;

use super::scanner::PresetScanner;
use crate::utils::files::{absolute_path, relative_to};

/// The preset list shown to the user. Owns at most one scan at a time and
/// only touches `entries` once that scan has delivered.
pub struct PresetBrowser {
    root: PathBuf,
    stop_timeout: Duration,
    scanner: Option<PresetScanner>,
    pending: Option<oneshot::Receiver<Vec<PathBuf>>>,
    entries: Vec<PathBuf>,
}

impl PresetBrowser {
    pub fn new<P: AsRef<Path>>(root: P, stop_timeout: Duration) -> Self {
        Self {
            root: absolute_path(root.as_ref()),
            stop_timeout,
            scanner: None,
            pending: None,
            entries: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Stops any scan in flight, clears the list and starts a new scan.
    pub async fn start_scan(&mut self) {
        self.stop_current().await;
        self.pending = None;
        self.entries.clear();

        let (scanner, receiver) = PresetScanner::start(self.root.clone());
        self.scanner = Some(scanner);
        self.pending = Some(receiver);
    }

    /// Waits for the scan in flight and stores its result. A scan that ends
    /// without a result leaves the list empty.
    pub async fn wait_for_scan(&mut self) -> &[PathBuf] {
        if let Some(receiver) = self.pending.take() {
            match receiver.await {
                Ok(files) => self.entries = files,
                Err(_) => {
                    log::debug!("Preset scan of {} gave no result", self.root.display());
                    self.entries.clear();
                }
            }
        }
        &self.entries
    }

    pub async fn refresh(&mut self) -> &[PathBuf] {
        self.start_scan().await;
        self.wait_for_scan().await
    }

    /// Cancels the scan in flight, if any. Used before exit.
    pub async fn shutdown(&mut self) {
        self.stop_current().await;
        self.pending = None;
    }

    async fn stop_current(&mut self) {
        let Some(mut prior) = self.scanner.take() else {
            return;
        };
        if !prior.is_running() {
            return;
        }
        prior.stop();
        if !prior.wait(self.stop_timeout).await {
            log::warn!(
                "Preset scan of {} did not stop within {:?}; leaving it to finish on its own",
                prior.root().display(),
                self.stop_timeout
            );
        }
    }

    /// Path as shown in the list: relative to the preset root.
    pub fn display_name(&self, path: &Path) -> String {
        relative_to(path, &self.root).display().to_string()
    }

    /// Absolute paths are kept, anything else is taken relative to the root.
    pub fn resolve(&self, arg: &str) -> PathBuf {
        let path = Path::new(arg);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            absolute_path(&self.root.join(path))
        }
    }
}
