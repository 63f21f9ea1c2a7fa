//! The hook trait is enough for a host loop that is not Bevy.
use bevy::math::{Quat, Vec3};
use towerspace::flight::{Collider, FlightConfig, FlightError, FlightInput, Obstacles, Sweep};
use towerspace::vehicle::{FlightHooks, StepReport, Vehicle};

/// Wraps a vehicle and counts which hooks fired.
struct Recorded {
    inner: Vehicle,
    spawns: u32,
    steps: u32,
    hits: Vec<Vec3>,
}

impl FlightHooks for Recorded {
    fn on_spawn(&mut self) {
        self.spawns += 1;
        self.inner.on_spawn();
    }

    fn on_step(&mut self, dt: f32, input: &FlightInput, sweep: &dyn Sweep) -> Result<StepReport, FlightError> {
        self.steps += 1;
        let report = self.inner.on_step(dt, input, sweep)?;
        if let Some(hit) = report.hit {
            self.hits.push(hit.point);
        }
        Ok(report)
    }

    fn on_collision(&mut self, normal: Vec3, point: Vec3) -> Result<(), FlightError> {
        self.inner.on_collision(normal, point)
    }
}

fn run(host: &mut dyn FlightHooks, sweep: &dyn Sweep, ticks: usize) {
    host.on_spawn();
    let input = FlightInput { forward: 1.0, ..Default::default() };
    for _ in 0..ticks {
        host.on_step(0.05, &input, sweep).unwrap();
    }
}

#[test]
fn custom_host_drives_hooks() {
    let floor = Obstacles::new(vec![Collider::half_space(Vec3::new(0.0, -5.0, 0.0), Vec3::Y).unwrap()]);
    let nose_down = Quat::from_rotation_x(-0.5);
    let mut rec = Recorded {
        inner: Vehicle::new(FlightConfig::default(), Vec3::ZERO, nose_down).unwrap(),
        spawns: 0,
        steps: 0,
        hits: Vec::new(),
    };

    run(&mut rec, &floor, 40);

    assert_eq!(rec.spawns, 1);
    assert_eq!(rec.steps, 40);
    assert!(!rec.hits.is_empty());
    for p in &rec.hits {
        assert!((p.y + 5.0).abs() < 1e-3);
    }
    assert_eq!(rec.inner.contacts, rec.hits.len() as u64);
}

#[test]
fn independent_vehicles_do_not_share_state() {
    let open = Obstacles::default();
    let mut a = Vehicle::new(FlightConfig::default(), Vec3::ZERO, Quat::IDENTITY).unwrap();
    let mut b = Vehicle::new(FlightConfig { acceleration: 100.0, ..Default::default() }, Vec3::ZERO, Quat::IDENTITY).unwrap();
    run(&mut a, &open, 10);
    run(&mut b, &open, 10);
    assert!((a.velocity().length() / b.velocity().length() - 5.0).abs() < 1e-3);
}
