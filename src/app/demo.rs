//! Scripted demo flight.
//!
//! Spawns a single vehicle in a walled arena and flies it with a fixed
//! script so the runner exercises thrust, turning, coasting and wall
//! contact without any input devices attached.
use bevy::prelude::*;

use towerspace::flight::{Collider, FlightInput, Obstacles};
use towerspace::settings::Settings;
use towerspace::vehicle::Vehicle;

/// Marks a vehicle flown by the demo script; tracks time since spawn.
#[derive(Component, Default)]
pub struct Autopilot {
    elapsed: f32,
}

/// Floor, far wall and one boulder in the flight path.
#[must_use]
pub fn arena_obstacles() -> Obstacles {
    let mut obstacles = Obstacles::default();
    if let Some(floor) = Collider::half_space(Vec3::new(0.0, -50.0, 0.0), Vec3::Y) {
        obstacles.push(floor);
    }
    if let Some(wall) = Collider::half_space(Vec3::new(0.0, 0.0, -1500.0), Vec3::Z) {
        obstacles.push(wall);
    }
    obstacles.push(Collider::Sphere { center: Vec3::new(120.0, 0.0, -700.0), radius: 60.0 });
    obstacles
}

/// Axis values for `t` seconds into the script.
#[must_use]
pub fn scripted_input(t: f32) -> FlightInput {
    let mut input = FlightInput::default();
    match t {
        t if t < 1.5 => input.set_forward(1.0),
        t if t < 4.0 => input.set_look_right(0.3),
        t if t < 6.0 => {
            input.set_roll(0.5);
            input.set_look_up(0.2);
        }
        _ => input.set_forward(0.5),
    }
    input
}

/// Spawn the demo vehicle with the current flight settings.
#[allow(clippy::needless_pass_by_value)]
pub fn spawn_demo_vehicle(mut commands: Commands, settings: Res<Settings>) {
    match Vehicle::new(settings.flight, Vec3::ZERO, Quat::IDENTITY) {
        Ok(vehicle) => {
            commands.spawn((vehicle, FlightInput::default(), Autopilot::default(), Transform::default()));
        }
        Err(e) => error!("cannot spawn demo vehicle: {e}"),
    }
}

/// Write this tick's scripted axes into each autopiloted vehicle's input.
#[allow(clippy::needless_pass_by_value)]
pub fn autopilot(time: Res<Time>, mut query: Query<(&mut Autopilot, &mut FlightInput)>) {
    for (mut pilot, mut input) in &mut query {
        pilot.elapsed += time.delta_seconds();
        *input = scripted_input(pilot.elapsed);
    }
}
