//! Flight recorder: a bounded history of vehicle poses that can be dumped to
//! a timestamped text file in `./debug-dumps/` for offline inspection.
//!
//! Useful for checking how a vehicle drifted or slid along a wall without
//! attaching a debugger to the simulation.
use bevy::math::EulerRot;
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::vehicle::Vehicle;

/// One recorded pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSample {
    pub tick: u64,
    /// `Entity::index()` of the vehicle.
    pub vehicle: u32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub orientation: Quat,
    pub contacts: u64,
}

/// Ring buffer of the most recent samples across all vehicles.
#[derive(Resource, Debug, Clone)]
pub struct FlightRecorder {
    capacity: usize,
    tick: u64,
    samples: VecDeque<FlightSample>,
}

impl FlightRecorder {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, tick: 0, samples: VecDeque::with_capacity(capacity) }
    }

    pub fn push(&mut self, sample: FlightSample) {
        if self.capacity == 0 {
            return;
        }
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Start a new tick and return its number.
    pub fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    #[must_use]
    pub fn tick(&self) -> u64 { self.tick }

    pub fn samples(&self) -> impl Iterator<Item = &FlightSample> {
        self.samples.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize { self.samples.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }

    /// Render the recorder contents as the text written by `dump_flight_log`.
    #[must_use]
    pub fn snapshot_text(&self, now: DateTime<Utc>) -> String {
        let mut out = String::new();
        writeln!(out, "Flight log: {}", now.format("%Y-%m-%d %H:%M:%S")).ok();
        writeln!(out, "Ticks: {}, samples kept: {}/{}", self.tick, self.samples.len(), self.capacity).ok();
        if self.samples.is_empty() {
            out.push_str("no samples recorded\n");
            return out;
        }
        for s in &self.samples {
            let (yaw, pitch, roll) = s.orientation.to_euler(EulerRot::YXZ);
            writeln!(
                out,
                "  #{:<6} v{} pos=({:.2}, {:.2}, {:.2}) vel=({:.2}, {:.2}, {:.2}) |v|={:.2} ypr=({:.1}, {:.1}, {:.1}) contacts={}",
                s.tick,
                s.vehicle,
                s.position.x, s.position.y, s.position.z,
                s.velocity.x, s.velocity.y, s.velocity.z,
                s.velocity.length(),
                yaw.to_degrees(), pitch.to_degrees(), roll.to_degrees(),
                s.contacts,
            )
            .ok();
        }
        out
    }
}

impl Default for FlightRecorder {
    fn default() -> Self {
        Self::with_capacity(600)
    }
}

/// Append one sample per vehicle for the tick just simulated.
#[allow(clippy::needless_pass_by_value)]
pub fn record_flight(mut recorder: ResMut<FlightRecorder>, vehicles: Query<(Entity, &Vehicle)>) {
    let tick = recorder.next_tick();
    for (entity, v) in &vehicles {
        recorder.push(FlightSample {
            tick,
            vehicle: entity.index(),
            position: v.position(),
            velocity: v.velocity(),
            orientation: v.orientation(),
            contacts: v.contacts,
        });
    }
}

/// Write the recorder contents to `<dir>/flight-<epoch millis>.txt`.
///
/// # Errors
/// Returns the I/O error if the directory cannot be created or the file written.
pub fn dump_flight_log(recorder: &FlightRecorder, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let now = SystemTime::now();
    let ts: DateTime<Utc> = DateTime::from(now);
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let fname = dir.join(format!("flight-{}.txt", ts.timestamp_millis()));
    fs::write(&fname, recorder.snapshot_text(ts))?;
    info!("wrote flight log: {}", fname.display());
    Ok(fname)
}
