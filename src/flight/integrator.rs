//! Per-tick flight integration.
//!
//! A tick runs in three stages, always in this order:
//! 1. ease angular rates toward the rates commanded by the look/roll axes,
//! 2. rotate the vehicle by those rates in its own frame,
//! 3. push local thrust through the *new* orientation into world velocity
//!    and derive this tick's displacement.
//!
//! Moving the vehicle along the displacement is left to the caller (see
//! `sweep::swept_move`), as is reacting to contacts via [`FlightIntegrator::deflect`].

use bevy::math::{EulerRot, Quat, Vec3};

use super::{FlightConfig, FlightError, FlightInput, FlightState, interp_to, orientation_facing};

/// Applies one vehicle's handling parameters to its `FlightState`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightIntegrator {
    config: FlightConfig,
}

fn check_delta(dt: f32) -> Result<(), FlightError> {
    if !dt.is_finite() {
        return Err(FlightError::NonFiniteDelta);
    }
    if dt < 0.0 {
        return Err(FlightError::NegativeDelta(dt));
    }
    Ok(())
}

impl FlightIntegrator {
    /// Build an integrator, rejecting configs that would produce non-finite state.
    ///
    /// # Errors
    /// `FlightError::InvalidConfig` when `config.validate()` fails.
    pub fn new(config: FlightConfig) -> Result<Self, FlightError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    /// Ease pitch/yaw/roll rates toward `axis * turn_speed`.
    ///
    /// Pitch is inverted so a positive look-up axis dips the nose.
    pub fn update_rates(&self, state: &mut FlightState, input: &FlightInput, dt: f32) {
        let turn = self.config.turn_speed;
        let speed = self.config.rate_interp_speed;
        let rates = &mut state.angular_rates;
        rates.pitch = interp_to(rates.pitch, -input.look_up * turn, dt, speed);
        rates.yaw = interp_to(rates.yaw, input.look_right * turn, dt, speed);
        rates.roll = interp_to(rates.roll, input.roll * turn, dt, speed);
    }

    /// Rotate by `rates * dt` degrees in the vehicle's own frame.
    pub fn rotate(&self, state: &mut FlightState, dt: f32) {
        let rates = state.angular_rates;
        // Yaw right and roll right are negative rotations about +Y and +Z.
        let delta = Quat::from_euler(
            EulerRot::YXZ,
            -(rates.yaw * dt).to_radians(),
            (rates.pitch * dt).to_radians(),
            -(rates.roll * dt).to_radians(),
        );
        state.orientation = (state.orientation * delta).normalize();
    }

    /// Accumulate world-space thrust into velocity and return the displacement.
    pub fn integrate_thrust(&self, state: &mut FlightState, input: &FlightInput, dt: f32) -> Vec3 {
        let accel = self.config.acceleration;
        state.local_thrust = Vec3::new(input.right, input.up, -input.forward) * accel;
        let world_thrust = state.orientation * state.local_thrust;
        state.global_velocity += world_thrust * dt;

        if self.config.clamp_speed {
            let forward = state.forward();
            let along = state.global_velocity.dot(forward);
            let clamped = along.clamp(self.config.min_speed, self.config.max_speed);
            state.global_velocity += forward * (clamped - along);
        }

        state.global_velocity * dt
    }

    /// Validate inputs, then run rates, rotation and thrust for one tick.
    ///
    /// A zero `dt` returns a zero displacement and leaves `state` untouched.
    ///
    /// # Errors
    /// Rejects negative or non-finite `dt` and non-finite axes. On error the
    /// state is not modified.
    pub fn advance(&self, state: &mut FlightState, input: &FlightInput, dt: f32) -> Result<Vec3, FlightError> {
        check_delta(dt)?;
        let input = input.sanitized()?;
        if dt == 0.0 {
            return Ok(Vec3::ZERO);
        }

        self.update_rates(state, &input, dt);
        self.rotate(state, dt);
        Ok(self.integrate_thrust(state, &input, dt))
    }

    /// Turn a fraction of the way toward facing along a contact normal.
    ///
    /// Call once per contact; persistent contact keeps nudging the vehicle
    /// until it slides off.
    ///
    /// # Errors
    /// `FlightError::DegenerateNormal` if `normal` cannot be normalized.
    pub fn deflect(&self, state: &mut FlightState, normal: Vec3) -> Result<(), FlightError> {
        let target = orientation_facing(normal).ok_or(FlightError::DegenerateNormal)?;
        state.orientation = state
            .orientation
            .slerp(target, self.config.deflection_alpha)
            .normalize();
        Ok(())
    }
}

impl Default for FlightIntegrator {
    fn default() -> Self {
        Self { config: FlightConfig::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::AngularRates;

    fn moving_state() -> FlightState {
        FlightState {
            orientation: Quat::from_rotation_y(0.3),
            local_thrust: Vec3::new(0.0, 0.0, -500.0),
            global_velocity: Vec3::new(10.0, -2.0, 5.0),
            angular_rates: AngularRates { pitch: 3.0, yaw: -4.0, roll: 1.5 },
        }
    }

    fn full_input() -> FlightInput {
        FlightInput { forward: 1.0, right: -0.5, up: 0.25, look_up: 1.0, look_right: -1.0, roll: 0.5 }
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let integrator = FlightIntegrator::default();
        let mut state = moving_state();
        let before = state;
        let d = integrator.advance(&mut state, &full_input(), 0.0).unwrap();
        assert_eq!(d, Vec3::ZERO);
        assert_eq!(state, before);
    }

    #[test]
    fn negative_delta_is_rejected_without_touching_state() {
        let integrator = FlightIntegrator::default();
        let mut state = moving_state();
        let before = state;
        assert_eq!(
            integrator.advance(&mut state, &full_input(), -0.1),
            Err(FlightError::NegativeDelta(-0.1))
        );
        assert_eq!(integrator.advance(&mut state, &full_input(), f32::NAN), Err(FlightError::NonFiniteDelta));
        assert_eq!(state, before);
    }

    #[test]
    fn nan_axis_is_rejected_without_touching_state() {
        let integrator = FlightIntegrator::default();
        let mut state = moving_state();
        let before = state;
        let input = FlightInput { up: f32::NAN, ..full_input() };
        assert!(integrator.advance(&mut state, &input, 0.1).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn single_forward_tick_from_rest() {
        let integrator = FlightIntegrator::default();
        let mut state = FlightState::default();
        let input = FlightInput { forward: 1.0, ..Default::default() };
        let dt = 0.05;
        let d = integrator.advance(&mut state, &input, dt).unwrap();
        let expected_v = Vec3::NEG_Z * 500.0 * dt;
        assert!((state.global_velocity - expected_v).length() < 1e-4);
        assert!((d - expected_v * dt).length() < 1e-5);
        assert_eq!(state.local_thrust, Vec3::new(0.0, 0.0, -500.0));
    }

    #[test]
    fn rates_decay_geometrically_and_velocity_coasts() {
        let integrator = FlightIntegrator::default();
        let mut state = FlightState::default();
        state.global_velocity = Vec3::new(12.0, 0.0, -40.0);
        state.angular_rates = AngularRates { pitch: 20.0, yaw: -30.0, roll: 10.0 };
        let velocity = state.global_velocity;
        let dt = 0.1;
        let ratio = 1.0 - (2.0 * dt);

        for _ in 0..20 {
            let prev = state.angular_rates;
            integrator.advance(&mut state, &FlightInput::default(), dt).unwrap();
            let now = state.angular_rates;
            assert!((now.yaw - prev.yaw * ratio).abs() < 1e-4);
            assert!((now.pitch - prev.pitch * ratio).abs() < 1e-4);
            assert!(now.roll.abs() < prev.roll.abs());
            assert_eq!(state.global_velocity, velocity);
        }
    }

    #[test]
    fn look_right_turns_nose_right() {
        let integrator = FlightIntegrator::default();
        let mut state = FlightState::default();
        let input = FlightInput { look_right: 1.0, ..Default::default() };
        for _ in 0..10 {
            integrator.advance(&mut state, &input, 0.1).unwrap();
        }
        let fwd = state.forward();
        assert!(fwd.x > 0.0);
        assert!(fwd.y.abs() < 1e-5);
    }

    #[test]
    fn look_up_dips_the_nose() {
        let integrator = FlightIntegrator::default();
        let mut state = FlightState::default();
        let input = FlightInput { look_up: 1.0, ..Default::default() };
        for _ in 0..10 {
            integrator.advance(&mut state, &input, 0.1).unwrap();
        }
        assert!(state.forward().y < 0.0);
        assert!(state.angular_rates.pitch < 0.0);
    }

    #[test]
    fn roll_right_dips_the_right_wing() {
        let integrator = FlightIntegrator::default();
        let mut state = FlightState::default();
        let input = FlightInput { roll: 1.0, ..Default::default() };
        for _ in 0..10 {
            integrator.advance(&mut state, &input, 0.1).unwrap();
        }
        let right = state.orientation * Vec3::X;
        assert!(right.y < 0.0);
        assert!((state.forward() - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn thrust_uses_updated_orientation() {
        let cfg = FlightConfig { turn_speed: 900.0, ..Default::default() };
        let integrator = FlightIntegrator::new(cfg).unwrap();
        let mut state = FlightState::default();
        // Rate already at target, so the whole tick yaws 90 degrees right.
        state.angular_rates.yaw = 900.0;
        let input = FlightInput { forward: 1.0, look_right: 1.0, ..Default::default() };
        integrator.advance(&mut state, &input, 0.1).unwrap();
        let v = state.global_velocity.normalize();
        assert!((v - Vec3::X).length() < 1e-4, "{v:?}");
    }

    #[test]
    fn orientation_stays_normalized() {
        let integrator = FlightIntegrator::default();
        let mut state = FlightState::default();
        for i in 0..2_000 {
            let t = i as f32 * 0.01;
            let input = FlightInput {
                forward: t.sin(),
                right: 0.0,
                up: 0.0,
                look_up: (t * 1.3).cos(),
                look_right: (t * 0.7).sin(),
                roll: (t * 2.1).sin(),
            };
            integrator.advance(&mut state, &input, 1.0 / 60.0).unwrap();
            assert!((state.orientation.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn deflect_moves_partway_toward_normal() {
        let integrator = FlightIntegrator::default();
        let mut state = FlightState::default();
        let normal = Vec3::X;
        let before = state.forward().angle_between(normal);
        integrator.deflect(&mut state, normal).unwrap();
        let after = state.forward().angle_between(normal);
        // Pure yaw toward a horizontal normal: one contact closes exactly alpha of the gap.
        let expected = before * (1.0 - integrator.config().deflection_alpha);
        assert!((after - expected).abs() < 1e-4, "{after} != {expected}");
        assert!((state.orientation.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn repeated_contact_keeps_realigning() {
        let integrator = FlightIntegrator::default();
        let mut state = FlightState::default();
        let normal = Vec3::new(0.0, 1.0, 1.0);
        let mut last = state.forward().angle_between(normal);
        for _ in 0..400 {
            integrator.deflect(&mut state, normal).unwrap();
            let now = state.forward().angle_between(normal);
            assert!(now <= last + 1e-3);
            last = now;
        }
        assert!(last < 0.01);
    }

    #[test]
    fn deflect_rejects_degenerate_normal() {
        let integrator = FlightIntegrator::default();
        let mut state = moving_state();
        let before = state;
        assert_eq!(integrator.deflect(&mut state, Vec3::ZERO), Err(FlightError::DegenerateNormal));
        assert_eq!(state, before);
    }

    #[test]
    fn speed_clamp_only_when_enabled() {
        let input = FlightInput { forward: 1.0, ..Default::default() };

        let free = FlightIntegrator::new(FlightConfig { max_speed: 10.0, ..Default::default() }).unwrap();
        let mut state = FlightState::default();
        for _ in 0..10 {
            free.advance(&mut state, &input, 0.1).unwrap();
        }
        assert!(state.global_velocity.length() > 10.0);

        let capped = FlightIntegrator::new(FlightConfig {
            max_speed: 10.0,
            clamp_speed: true,
            ..Default::default()
        })
        .unwrap();
        let mut state = FlightState::default();
        for _ in 0..10 {
            capped.advance(&mut state, &input, 0.1).unwrap();
        }
        assert!((state.global_velocity.length() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = FlightConfig { turn_speed: -1.0, ..Default::default() };
        assert!(matches!(FlightIntegrator::new(cfg), Err(FlightError::InvalidConfig(_))));
    }
}
