//! Run length and exit handling for the headless runner.
use bevy::app::AppExit;
use bevy::prelude::*;

use towerspace::debug::{FlightRecorder, dump_flight_log};
use towerspace::settings::SimulationSettings;
use towerspace::vehicle::CollisionEvent;

/// Wall-clock budget for the run.
#[derive(Resource)]
pub struct SessionClock {
    limit: f32,
    elapsed: f32,
    dump_dir: String,
    finished: bool,
}

impl SessionClock {
    #[must_use]
    pub fn new(sim: &SimulationSettings) -> Self {
        Self { limit: sim.duration_secs, elapsed: 0.0, dump_dir: sim.dump_dir.clone(), finished: false }
    }
}

/// Dump the flight log and request exit once the budget is spent.
///
/// A zero budget runs until the process is killed.
#[allow(clippy::needless_pass_by_value)]
pub fn stop_after_duration(
    time: Res<Time>,
    mut clock: ResMut<SessionClock>,
    recorder: Res<FlightRecorder>,
    mut exit: EventWriter<AppExit>,
) {
    if clock.finished || clock.limit <= 0.0 {
        return;
    }
    clock.elapsed += time.delta_seconds();
    if clock.elapsed < clock.limit {
        return;
    }
    clock.finished = true;
    info!("simulated {:.1}s over {} ticks, shutting down", clock.elapsed, recorder.tick());
    if let Err(e) = dump_flight_log(&recorder, &clock.dump_dir) {
        error!("flight log: failed to write to '{}': {e}", clock.dump_dir);
    }
    exit.send(AppExit::Success);
}

/// Log every contact reported this frame.
pub fn log_collisions(mut events: EventReader<CollisionEvent>) {
    for ev in events.read() {
        info!("contact: {:?} at {:?} (normal {:?})", ev.entity, ev.point, ev.normal);
    }
}
