//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! using the RON watcher utilities (see `ron::setup_ron_watcher`).
pub mod loader;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::flight::{FlightConfig, FlightError};

/// Errors from reading a single settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error(transparent)]
    Flight(#[from] FlightError),
    #[error("invalid simulation settings: {0}")]
    Simulation(String),
}

/// Host-loop settings for the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    #[serde(default = "SimulationSettings::default_tick_rate_hz")]
    pub tick_rate_hz: f64, // Fixed simulation ticks per second.
    #[serde(default = "SimulationSettings::default_duration_secs")]
    pub duration_secs: f32, // How long the runner simulates before exiting (0 = forever).
    #[serde(default = "SimulationSettings::default_recorder_capacity")]
    pub recorder_capacity: usize, // Samples kept by the flight recorder.
    #[serde(default = "SimulationSettings::default_dump_dir")]
    pub dump_dir: String, // Directory flight logs are written to on exit.
}

impl SimulationSettings {
    fn default_tick_rate_hz() -> f64 { 60.0 }
    fn default_duration_secs() -> f32 { 10.0 }
    fn default_recorder_capacity() -> usize { 600 }
    fn default_dump_dir() -> String { "debug-dumps".to_string() }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_rate_hz: Self::default_tick_rate_hz(),
            duration_secs: Self::default_duration_secs(),
            recorder_capacity: Self::default_recorder_capacity(),
            dump_dir: Self::default_dump_dir(),
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub flight: FlightConfig,
    #[serde(default)]
    pub simulation: SimulationSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Parse and validate settings from RON text.
    ///
    /// # Errors
    /// `SettingsError::Parse` for malformed RON, `Flight`/`Simulation` for
    /// values that parse but are out of range.
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = ron::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate one settings file.
    ///
    /// # Errors
    /// Any `SettingsError`; `Io` carries the offending path.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// Check both sections.
    ///
    /// # Errors
    /// The first invalid value found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.flight.validate()?;
        let sim = &self.simulation;
        if !(sim.tick_rate_hz.is_finite() && sim.tick_rate_hz > 0.0) {
            return Err(SettingsError::Simulation(format!("tick_rate_hz {} must be positive", sim.tick_rate_hz)));
        }
        if !(sim.duration_secs.is_finite() && sim.duration_secs >= 0.0) {
            return Err(SettingsError::Simulation(format!("duration_secs {} must be >= 0", sim.duration_secs)));
        }
        Ok(())
    }

    /// Describe each setting so users know what changing it does.
    ///
    /// # Return
    /// `(section, field, description)` triples in file order.
    #[must_use]
    pub fn field_descriptions() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("flight", "acceleration", "Thrust per unit axis input (units/second^2)."),
            ("flight", "turn_speed", "Target turn rate per unit look/roll input (degrees/second)."),
            ("flight", "rate_interp_speed", "How quickly turn rates ease toward the commanded rate."),
            ("flight", "deflection_alpha", "Fraction of the way a contact turns the nose toward the surface normal."),
            ("flight", "min_speed", "Lowest forward speed when clamp_speed is on."),
            ("flight", "max_speed", "Highest forward speed when clamp_speed is on."),
            ("flight", "clamp_speed", "Clamp forward speed to [min_speed, max_speed]. Off means vehicles coast forever."),
            ("flight", "collision_radius", "Radius of the sphere swept against obstacles."),
            ("simulation", "tick_rate_hz", "Fixed simulation ticks per second."),
            ("simulation", "duration_secs", "Seconds to simulate before the runner exits (0 runs forever)."),
            ("simulation", "recorder_capacity", "Number of flight samples kept for the exit dump."),
            ("simulation", "dump_dir", "Directory the flight log is written to on exit."),
        ]
    }
}
