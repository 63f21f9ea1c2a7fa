//! Vehicle components and the lifecycle hooks a host loop drives.
//!
//! The module provides the `Vehicle` component, the `FlightHooks` trait it
//! implements, and re-exports the Bevy systems that step vehicles each
//! fixed tick.
//!
//! # Example:
//!
//! ```ignore
//! // spawn a vehicle with an input component the host writes into
//! commands.spawn((
//!     Vehicle::new(settings.flight, Vec3::ZERO, Quat::IDENTITY)?,
//!     FlightInput::default(),
//!     TransformBundle::default(),
//! ));
//! // register systems
//! app.add_plugins(FlightPlugin);
//! ```
pub mod systems;

use bevy::prelude::*;

use crate::flight::{FlightConfig, FlightError, FlightInput, FlightIntegrator, FlightState, Hit, Sweep, orientation_facing, swept_move};

pub use systems::*;

/// What one step did to a vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Displacement requested by the integrator before the sweep.
    pub displacement: Vec3,
    /// Contact that stopped the move, if any.
    pub hit: Option<Hit>,
}

/// Lifecycle callbacks invoked by whatever loop owns scheduling.
pub trait FlightHooks {
    /// Called once when the vehicle enters the simulation.
    fn on_spawn(&mut self);

    /// Advance one tick and move with a sweep against `sweep`.
    ///
    /// # Errors
    /// Propagates `FlightError` for invalid `dt` or axes, or a degenerate
    /// contact normal from `sweep`; the vehicle is left unchanged.
    fn on_step(&mut self, dt: f32, input: &FlightInput, sweep: &dyn Sweep) -> Result<StepReport, FlightError>;

    /// React to a blocking contact.
    ///
    /// # Errors
    /// `FlightError::DegenerateNormal` for a zero or non-finite normal.
    fn on_collision(&mut self, normal: Vec3, point: Vec3) -> Result<(), FlightError>;
}

/// A simulated flying vehicle: world position plus flight state.
#[derive(Component, Debug, Clone)]
pub struct Vehicle {
    position: Vec3,
    state: FlightState,
    integrator: FlightIntegrator,
    /// Contacts handled since spawn.
    pub contacts: u64,
    /// Last contact point reported by `on_collision`.
    pub last_contact: Option<Vec3>,
}

impl Vehicle {
    /// Build a vehicle at rest.
    ///
    /// # Errors
    /// `FlightError::InvalidConfig` if `config` does not validate.
    pub fn new(config: FlightConfig, position: Vec3, orientation: Quat) -> Result<Self, FlightError> {
        Ok(Self {
            position,
            state: FlightState::spawned(orientation),
            integrator: FlightIntegrator::new(config)?,
            contacts: 0,
            last_contact: None,
        })
    }

    #[must_use]
    pub fn position(&self) -> Vec3 { self.position }
    #[must_use]
    pub fn orientation(&self) -> Quat { self.state.orientation }
    #[must_use]
    pub fn velocity(&self) -> Vec3 { self.state.global_velocity }
    #[must_use]
    pub fn forward(&self) -> Vec3 { self.state.forward() }
    #[must_use]
    pub fn state(&self) -> &FlightState { &self.state }
    #[must_use]
    pub fn config(&self) -> &FlightConfig { self.integrator.config() }

    /// `Transform` matching the vehicle's pose, for rendering or camera rigs.
    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.state.orientation)
    }
}

impl FlightHooks for Vehicle {
    fn on_spawn(&mut self) {
        self.state.local_thrust = Vec3::ZERO;
        self.state.global_velocity = Vec3::ZERO;
        self.state.angular_rates = Default::default();
        self.contacts = 0;
        self.last_contact = None;
        debug!("vehicle spawned at {:?}", self.position);
    }

    fn on_step(&mut self, dt: f32, input: &FlightInput, sweep: &dyn Sweep) -> Result<StepReport, FlightError> {
        // Stage on a copy; nothing is written back until the contact normal is known to be usable.
        let mut next = self.state;
        let displacement = self.integrator.advance(&mut next, input, dt)?;
        let radius = self.integrator.config().collision_radius;
        let (position, hit) = swept_move(sweep, self.position, radius, displacement);
        if let Some(hit) = hit {
            orientation_facing(hit.normal).ok_or(FlightError::DegenerateNormal)?;
        }
        self.state = next;
        self.position = position;
        if let Some(hit) = hit {
            self.on_collision(hit.normal, hit.point)?;
        }
        Ok(StepReport { displacement, hit })
    }

    fn on_collision(&mut self, normal: Vec3, point: Vec3) -> Result<(), FlightError> {
        self.integrator.deflect(&mut self.state, normal)?;
        self.contacts += 1;
        self.last_contact = Some(point);
        Ok(())
    }
}
