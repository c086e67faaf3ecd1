//! Hot reload of the configuration file.
//!
//! The parent directory is watched rather than the file itself: editors that
//! save by renaming a temp file over the config replace its inode, and a
//! file-level watch goes quiet after the first such save.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::GoImportConfig;

/// Reloads `go-import.toml` on change and forwards each valid config.
pub struct ConfigWatcher {
    path: PathBuf,
    updates: mpsc::UnboundedSender<GoImportConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end of its reloads.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<GoImportConfig>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            updates,
        };
        (watcher, rx)
    }

    /// Start watching. Reloads stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = self.path.file_name().map(|n| n.to_os_string()).ok_or_else(|| {
            notify::Error::generic("config path has no file name").add_path(self.path.clone())
        })?;

        let path = self.path.clone();
        let updates = self.updates;
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if concerns(&event, &file_name) => reload(&path, &updates),
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), dir = %dir.display(), "config watcher started");
        Ok(watcher)
    }
}

/// A write, create or rename that lands on the config file.
fn concerns(event: &Event, file_name: &OsString) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

fn reload(path: &Path, updates: &mpsc::UnboundedSender<GoImportConfig>) {
    match load_config(path) {
        Ok(config) => {
            tracing::info!(
                repositories = config.repositories.len(),
                "config reloaded"
            );
            if updates.send(config).is_err() {
                tracing::warn!("config reload dropped: no receiver");
            }
        }
        Err(e) => tracing::error!(error = %e, "config reload failed; keeping current config"),
    }
}
