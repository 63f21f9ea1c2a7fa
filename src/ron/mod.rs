//! Utilities for loading RON files and watching directories for changes.
//!
//! This module provides a small helper for listing RON files on disk and a
//! simple filesystem watcher that sets a shared boolean when
//! files change. The watcher is used for hot-reloading settings during
//! development.

use bevy::prelude::warn;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// File-watcher handle for RON hot-reload.
pub struct RonWatcher {
    changed: Arc<AtomicBool>, // Set to `true` by the OS watcher when watched files change.
    _watcher: Option<notify::RecommendedWatcher>, // Watcher handle kept to prevent immediate drop.
}

impl RonWatcher {
    /// Create a stub `RonWatcher` that does not have an active OS watcher.
    ///
    /// # Return
    /// Returns a `RonWatcher` whose flag starts `false` and is never set by
    /// the OS. Useful as a fallback when watcher creation fails.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher {
            changed: Arc::new(AtomicBool::new(false)),
            _watcher: None,
        }
    }

    /// Return whether files changed since the last call, clearing the flag.
    pub fn take_changed(&self) -> bool {
        self.changed.swap(false, Ordering::AcqRel)
    }

    /// Raise the change flag by hand (tests, manual reload triggers).
    pub fn mark_changed(&self) {
        self.changed.store(true, Ordering::Release);
    }
}

/// List `.ron` files directly inside `path`, sorted by file name.
///
/// A missing or unreadable directory yields an empty list.
#[must_use]
pub fn ron_files(path: impl AsRef<Path>) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match std::fs::read_dir(path) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
            .collect(),
        Err(_) => Vec::new(),
    };
    files.sort();
    files
}

/// Create a `RonWatcher` that watches a directory for modifications.
///
/// # Arguments
/// * `path` - Directory path to watch for `.ron` file changes.
///
/// # Return
/// Returns a `RonWatcher` on success. Its flag is raised when a
/// modification event under the watched directory is observed.
///
/// # Errors
/// Returns a `notify::Error` if the underlying file-watcher cannot be
/// created or the watcher cannot be registered for the provided path.
pub fn setup_ron_watcher(path: impl AsRef<Path>) -> Result<RonWatcher, notify::Error> {
    let path = path.as_ref();
    let changed = Arc::new(AtomicBool::new(false));
    let changed_clone = changed.clone();
    // Resolve watched path to a canonical form if possible so we can filter events
    let watched_path: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_)) {
                    let relevant = event.paths.iter().any(|p| {
                        std::fs::canonicalize(p)
                            .unwrap_or_else(|_| p.clone())
                            .starts_with(&watched_path)
                    });
                    if relevant {
                        changed_clone.store(true, Ordering::Release);
                    }
                }
            }
            Err(e) => warn!("Watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(path, RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}
