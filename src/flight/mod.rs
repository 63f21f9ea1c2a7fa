//! Flight model: thrust-driven translation with smoothed angular rates.
//!
//! The vehicle accelerates along its local axes, turns through angular rates
//! that ease toward the commanded rate, and coasts indefinitely when no
//! thrust is applied. Collisions nudge the orientation toward the contact
//! normal instead of bouncing the vehicle.
//!
//! # Example:
//!
//! ```
//! use towerspace::flight::{FlightConfig, FlightInput, FlightIntegrator, FlightState};
//! use bevy::math::Quat;
//!
//! let integrator = FlightIntegrator::new(FlightConfig::default()).unwrap();
//! let mut state = FlightState::spawned(Quat::IDENTITY);
//! let mut input = FlightInput::default();
//! input.set_forward(1.0);
//! let displacement = integrator.advance(&mut state, &input, 0.1).unwrap();
//! assert!(displacement.length() > 0.0);
//! ```
pub mod integrator;
pub mod sweep;

use bevy::math::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

pub use integrator::FlightIntegrator;
pub use sweep::{Collider, Hit, Obstacles, OpenSpace, Sweep, swept_move};

/// Errors raised when a step or configuration would corrupt flight state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FlightError {
    #[error("delta time must not be negative (got {0})")]
    NegativeDelta(f32),
    #[error("delta time is not finite")]
    NonFiniteDelta,
    #[error("axis `{axis}` is not finite")]
    NonFiniteAxis { axis: &'static str },
    #[error("invalid flight config: {0}")]
    InvalidConfig(String),
    #[error("contact normal has zero length or is not finite")]
    DegenerateNormal,
}

/// Handling parameters, fixed for a vehicle once it is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightConfig {
    #[serde(default = "FlightConfig::default_acceleration")]
    pub acceleration: f32, // Thrust per unit axis input (units/second^2).
    #[serde(default = "FlightConfig::default_turn_speed")]
    pub turn_speed: f32, // Target angular rate per unit look/roll input (degrees/second).
    #[serde(default = "FlightConfig::default_rate_interp_speed")]
    pub rate_interp_speed: f32, // How fast angular rates ease toward their target.
    #[serde(default = "FlightConfig::default_deflection_alpha")]
    pub deflection_alpha: f32, // Fraction of the way toward the contact normal per hit.
    #[serde(default = "FlightConfig::default_min_speed")]
    pub min_speed: f32, // Lower bound on forward speed, only used with `clamp_speed`.
    #[serde(default = "FlightConfig::default_max_speed")]
    pub max_speed: f32, // Upper bound on forward speed, only used with `clamp_speed`.
    #[serde(default)]
    pub clamp_speed: bool, // Off by default: vehicles coast without limit.
    #[serde(default = "FlightConfig::default_collision_radius")]
    pub collision_radius: f32, // Radius of the sphere swept against obstacles.
}

impl FlightConfig {
    fn default_acceleration() -> f32 { 500.0 }
    fn default_turn_speed() -> f32 { 50.0 }
    fn default_rate_interp_speed() -> f32 { 2.0 }
    fn default_deflection_alpha() -> f32 { 0.025 }
    fn default_min_speed() -> f32 { -4000.0 }
    fn default_max_speed() -> f32 { 4000.0 }
    fn default_collision_radius() -> f32 { 1.0 }

    /// Check that every parameter is finite and in range.
    ///
    /// # Errors
    /// Returns `FlightError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<(), FlightError> {
        let finite = [
            ("acceleration", self.acceleration),
            ("turn_speed", self.turn_speed),
            ("rate_interp_speed", self.rate_interp_speed),
            ("deflection_alpha", self.deflection_alpha),
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
            ("collision_radius", self.collision_radius),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(FlightError::InvalidConfig(format!("{name} is not finite")));
        }
        if self.acceleration < 0.0 {
            return Err(FlightError::InvalidConfig("acceleration is negative".into()));
        }
        if self.turn_speed < 0.0 {
            return Err(FlightError::InvalidConfig("turn_speed is negative".into()));
        }
        if self.deflection_alpha <= 0.0 || self.deflection_alpha > 1.0 {
            return Err(FlightError::InvalidConfig(format!(
                "deflection_alpha {} outside (0, 1]",
                self.deflection_alpha
            )));
        }
        if self.min_speed > self.max_speed {
            return Err(FlightError::InvalidConfig("min_speed exceeds max_speed".into()));
        }
        if self.collision_radius <= 0.0 {
            return Err(FlightError::InvalidConfig("collision_radius must be positive".into()));
        }
        Ok(())
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            acceleration: Self::default_acceleration(),
            turn_speed: Self::default_turn_speed(),
            rate_interp_speed: Self::default_rate_interp_speed(),
            deflection_alpha: Self::default_deflection_alpha(),
            min_speed: Self::default_min_speed(),
            max_speed: Self::default_max_speed(),
            clamp_speed: false,
            collision_radius: Self::default_collision_radius(),
        }
    }
}

/// Per-tick control axes, each in `[-1, 1]`.
#[derive(bevy::prelude::Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct FlightInput {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
    /// Stick convention: positive pushes the nose down.
    pub look_up: f32,
    /// Positive turns the nose right.
    pub look_right: f32,
    /// Positive dips the right wing.
    pub roll: f32,
}

impl FlightInput {
    pub fn set_forward(&mut self, v: f32) { self.forward = v.clamp(-1.0, 1.0); }
    pub fn set_right(&mut self, v: f32) { self.right = v.clamp(-1.0, 1.0); }
    pub fn set_up(&mut self, v: f32) { self.up = v.clamp(-1.0, 1.0); }
    pub fn set_look_up(&mut self, v: f32) { self.look_up = v.clamp(-1.0, 1.0); }
    pub fn set_look_right(&mut self, v: f32) { self.look_right = v.clamp(-1.0, 1.0); }
    pub fn set_roll(&mut self, v: f32) { self.roll = v.clamp(-1.0, 1.0); }

    /// Zero every axis.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Return a copy with every axis clamped to `[-1, 1]`.
    ///
    /// Fields are public, so callers may have written anything into them;
    /// this is the gate that runs before any state is touched.
    ///
    /// # Errors
    /// `FlightError::NonFiniteAxis` if any axis is NaN or infinite.
    pub fn sanitized(&self) -> Result<Self, FlightError> {
        let axes = [
            ("forward", self.forward),
            ("right", self.right),
            ("up", self.up),
            ("look_up", self.look_up),
            ("look_right", self.look_right),
            ("roll", self.roll),
        ];
        for (axis, v) in axes {
            if !v.is_finite() {
                return Err(FlightError::NonFiniteAxis { axis });
            }
        }
        Ok(Self {
            forward: self.forward.clamp(-1.0, 1.0),
            right: self.right.clamp(-1.0, 1.0),
            up: self.up.clamp(-1.0, 1.0),
            look_up: self.look_up.clamp(-1.0, 1.0),
            look_right: self.look_right.clamp(-1.0, 1.0),
            roll: self.roll.clamp(-1.0, 1.0),
        })
    }
}

/// Angular rates in degrees per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngularRates {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

/// Mutable flight state of one vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    /// Always a unit quaternion.
    pub orientation: Quat,
    /// Thrust for the current tick in the vehicle frame; overwritten each tick.
    pub local_thrust: Vec3,
    /// World-space velocity. Never damped.
    pub global_velocity: Vec3,
    pub angular_rates: AngularRates,
}

impl FlightState {
    /// State of a freshly spawned vehicle: at rest, not turning.
    #[must_use]
    pub fn spawned(orientation: Quat) -> Self {
        Self {
            orientation: orientation.normalize(),
            local_thrust: Vec3::ZERO,
            global_velocity: Vec3::ZERO,
            angular_rates: AngularRates::default(),
        }
    }

    /// Unit vector the vehicle's nose points along.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }
}

impl Default for FlightState {
    fn default() -> Self {
        Self::spawned(Quat::IDENTITY)
    }
}

/// Move `current` toward `target` by a fraction of the remaining distance.
///
/// The fraction is `dt * speed` clamped to `[0, 1]`, so a long frame lands on
/// the target instead of overshooting it. A non-positive speed snaps.
#[must_use]
pub fn interp_to(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }
    let alpha = (dt * speed).clamp(0.0, 1.0);
    current + (target - current) * alpha
}

/// Zero-roll orientation whose forward axis points along `direction`.
///
/// Returns `None` for a zero-length or non-finite direction.
#[must_use]
pub fn orientation_facing(direction: Vec3) -> Option<Quat> {
    let dir = direction.try_normalize()?;
    let horizontal = Vec3::new(dir.x, 0.0, dir.z).length();
    let yaw = (-dir.x).atan2(-dir.z);
    let pitch = dir.y.atan2(horizontal);
    Some(Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0))
}
