//! Settings loading and hot-reloading.
//! This module provides utilities for loading settings from RON files and watching
//! for changes to enable hot-reloading of settings at runtime.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If multiple
//! RON files are present, the first (by file name) that parses and validates is used.
//! If no RON files are found or none are valid, default settings are used.
use bevy::prelude::{Res, ResMut, Resource, info, warn};
use std::path::{Path, PathBuf};

use crate::ron_loader::{ron_files, setup_ron_watcher, RonWatcher};
use crate::settings::Settings;

/// Default settings directory, relative to the working directory.
pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher {
    dir: PathBuf,
    watcher: RonWatcher,
}

/// Load settings from `path` (directory).
///
/// # Arguments
/// * `path` - The directory path where settings RON files are located (e.g., "data/settings").
///
/// # Returns
/// The first file that parses and validates, or `Settings::defaults()` if none does.
/// Rejected files are logged.
///
/// # Example
/// ```
/// let settings = towerspace::settings::loader::load_settings_from_dir("data/settings");
/// assert!(settings.validate().is_ok());
/// ```
#[must_use]
pub fn load_settings_from_dir(path: impl AsRef<Path>) -> Settings {
    for file in ron_files(path) {
        match Settings::load_file(&file) {
            Ok(settings) => return settings,
            Err(e) => warn!("ignoring settings file {}: {e}", file.display()),
        }
    }
    Settings::defaults()
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Arguments
/// * `path` - The directory path where settings RON files are located (e.g. "data/settings").
///
/// # Errors
/// Returns the `notify::Error` if the OS watcher cannot be created.
pub fn setup_settings_watcher(path: impl AsRef<Path>) -> Result<SettingsWatcher, notify::Error> {
    let dir = path.as_ref().to_path_buf();
    setup_ron_watcher(&dir).map(|watcher| SettingsWatcher { dir, watcher })
}

/// Check for changes and reload the settings resource when files change.
///
/// Flight parameters are fixed per vehicle at construction, so a reload only
/// affects vehicles spawned afterwards.
///
/// # Example
/// ```ignore
/// app.add_systems(Update, towerspace::settings::loader::check_settings_changes);
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if watcher.watcher.take_changed() {
        info!("Settings changed, reloading from {}", watcher.dir.display());
        let fresh = load_settings_from_dir(&watcher.dir);
        if fresh.flight != settings.flight {
            info!("new flight settings apply to vehicles spawned from now on");
        }
        *settings = fresh;
    }
}

impl SettingsWatcher {
    /// A watcher with no OS backing, for platforms or paths notify cannot watch.
    #[must_use]
    pub fn stub(path: impl AsRef<Path>) -> Self {
        SettingsWatcher { dir: path.as_ref().to_path_buf(), watcher: RonWatcher::stub() }
    }

    /// Force the next `check_settings_changes` to reload.
    pub fn request_reload(&self) {
        self.watcher.mark_changed();
    }
}
