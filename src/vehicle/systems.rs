//! Bevy host loop for vehicles.
//!
//! `step_vehicles` is the only writer of `Vehicle` state; it runs once per
//! fixed tick and mirrors the result into each entity's `Transform`.

use bevy::prelude::*;

use crate::debug::{FlightRecorder, record_flight};
use crate::flight::{FlightInput, Obstacles};
use crate::vehicle::{FlightHooks, Vehicle};

/// Emitted whenever a vehicle's swept move is blocked.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub entity: Entity,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Registers vehicle stepping, collision events, obstacles and the flight recorder.
pub struct FlightPlugin;

impl Plugin for FlightPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CollisionEvent>()
            .init_resource::<Obstacles>()
            .init_resource::<FlightRecorder>()
            .add_systems(FixedUpdate, (spawn_vehicles, step_vehicles, record_flight).chain());
    }
}

/// Run `on_spawn` for vehicles added since the last tick.
pub fn spawn_vehicles(mut added: Query<(Entity, &mut Vehicle), Added<Vehicle>>) {
    for (entity, mut vehicle) in &mut added {
        vehicle.on_spawn();
        info!("vehicle {entity:?} entered the simulation at {:?}", vehicle.position());
    }
}

/// Step every vehicle by the current `Time` delta.
///
/// Vehicles without a `FlightInput` coast. A rejected input is logged and
/// that vehicle skips the tick; other vehicles are unaffected.
#[allow(clippy::needless_pass_by_value)]
pub fn step_vehicles(
    time: Res<Time>,
    obstacles: Res<Obstacles>,
    mut events: EventWriter<CollisionEvent>,
    mut query: Query<(Entity, &mut Vehicle, Option<&FlightInput>, Option<&mut Transform>)>,
) {
    let dt = time.delta_seconds();
    let idle = FlightInput::default();

    for (entity, mut vehicle, input, transform) in &mut query {
        let input = input.unwrap_or(&idle);
        match vehicle.on_step(dt, input, &*obstacles) {
            Ok(report) => {
                if let Some(hit) = report.hit {
                    debug!("vehicle {entity:?} hit {:?} (normal {:?})", hit.point, hit.normal);
                    events.send(CollisionEvent { entity, point: hit.point, normal: hit.normal });
                }
            }
            Err(e) => {
                warn!("vehicle {entity:?} skipped tick: {e}");
                continue;
            }
        }
        if let Some(mut tf) = transform {
            *tf = vehicle.transform().with_scale(tf.scale);
        }
    }
}
