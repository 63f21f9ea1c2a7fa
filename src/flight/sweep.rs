//! Swept movement against simple colliders.
//!
//! The vehicle is treated as a sphere. A move stops at the first blocking
//! contact along the displacement instead of tunnelling through it.

use bevy::math::Vec3;
use bevy::prelude::Resource;

/// Result of a blocked sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Point on the obstacle surface touched by the vehicle.
    pub point: Vec3,
    /// Unit surface normal at `point`, facing away from the obstacle.
    pub normal: Vec3,
    /// Fraction of the requested displacement travelled before contact.
    pub fraction: f32,
}

/// Collision query used to move a vehicle.
pub trait Sweep {
    /// Sweep a sphere of `radius` from `from` along `delta`.
    ///
    /// Returns the earliest blocking contact, if any. A sphere already
    /// touching a surface and moving into it is blocked at fraction 0.
    fn sweep(&self, from: Vec3, radius: f32, delta: Vec3) -> Option<Hit>;
}

/// Empty space: nothing ever blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSpace;

impl Sweep for OpenSpace {
    fn sweep(&self, _from: Vec3, _radius: f32, _delta: Vec3) -> Option<Hit> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    /// Solid region behind a plane; `normal` points into open space and is
    /// normalized on every sweep. A degenerate normal never blocks.
    HalfSpace { point: Vec3, normal: Vec3 },
    Sphere { center: Vec3, radius: f32 },
}

impl Collider {
    /// Build a half-space, normalizing `normal`. `None` if it is degenerate.
    #[must_use]
    pub fn half_space(point: Vec3, normal: Vec3) -> Option<Self> {
        normal.try_normalize().map(|normal| Collider::HalfSpace { point, normal })
    }

    fn sweep(&self, from: Vec3, radius: f32, delta: Vec3) -> Option<Hit> {
        match *self {
            Collider::HalfSpace { point, normal } => {
                let normal = normal.try_normalize()?;
                let approach = delta.dot(normal);
                if approach >= 0.0 {
                    return None;
                }
                let gap = (from - point).dot(normal) - radius;
                let fraction = (gap / -approach).max(0.0);
                if fraction > 1.0 {
                    return None;
                }
                let center = from + delta * fraction;
                Some(Hit { point: center - normal * radius, normal, fraction })
            }
            Collider::Sphere { center, radius: r } => {
                let reach = radius + r;
                let offset = from - center;
                let a = delta.length_squared();
                if a <= f32::EPSILON {
                    return None;
                }
                let b = offset.dot(delta);
                if b >= 0.0 {
                    // Moving away or tangentially.
                    return None;
                }
                let c = offset.length_squared() - reach * reach;
                let fraction = if c <= 0.0 {
                    0.0
                } else {
                    let disc = b * b - a * c;
                    if disc < 0.0 {
                        return None;
                    }
                    (-b - disc.sqrt()) / a
                };
                if fraction > 1.0 {
                    return None;
                }
                let contact_center = from + delta * fraction;
                let normal = (contact_center - center).try_normalize()?;
                Some(Hit { point: center + normal * r, normal, fraction })
            }
        }
    }
}

/// Static obstacles shared by every vehicle in a world.
#[derive(Resource, Debug, Clone, Default)]
pub struct Obstacles {
    pub colliders: Vec<Collider>,
}

impl Obstacles {
    #[must_use]
    pub fn new(colliders: Vec<Collider>) -> Self {
        Self { colliders }
    }

    pub fn push(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }
}

impl Sweep for Obstacles {
    fn sweep(&self, from: Vec3, radius: f32, delta: Vec3) -> Option<Hit> {
        self.colliders
            .iter()
            .filter_map(|c| c.sweep(from, radius, delta))
            .min_by(|a, b| a.fraction.total_cmp(&b.fraction))
    }
}

/// Move from `position` by `displacement`, stopping at the first contact.
///
/// # Returns
/// The new position and the contact that stopped the move, if any.
pub fn swept_move<S: Sweep + ?Sized>(sweep: &S, position: Vec3, radius: f32, displacement: Vec3) -> (Vec3, Option<Hit>) {
    if displacement == Vec3::ZERO {
        return (position, None);
    }
    match sweep.sweep(position, radius, displacement) {
        Some(hit) => (position + displacement * hit.fraction, Some(hit)),
        None => (position + displacement, None),
    }
}
