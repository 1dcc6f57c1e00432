//! Gravity, lensing and accretion-disk model of a non-rotating black hole.
//!
//! All quantities are dimensionless with `G = c = 1`. The deflection model is
//! a piecewise approximation, not a geodesic solver.

use crate::config::{Effects, Physics};
use crate::error::{Error, Result};
use crate::*;

const HORIZON_MARGIN: f64 = 1.01;
const PARALLEL_EPS: f64 = 1e-6;

#[derive(Clone, Debug)]
pub struct BlackHole {
    position: P3,
    mass: f64,
    schwarzschild_radius: f64,
    photon_sphere_radius: f64,
    disk_inner_radius: f64,
    disk_outer_radius: f64,
    physics: Physics,
}

impl BlackHole {
    pub fn new(position: P3, mass: f64) -> Result<Self> {
        Self::with_physics(position, mass, Physics::default())
    }

    pub fn with_physics(position: P3, mass: f64, physics: Physics) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(Error::InvalidMass(mass));
        }
        physics.validate()?;
        let rs = physics.schwarzschild_multiplier * mass;
        Ok(BlackHole {
            position,
            mass,
            schwarzschild_radius: rs,
            photon_sphere_radius: physics.photon_sphere_multiplier * rs,
            disk_inner_radius: physics.disk_inner_multiplier * rs,
            disk_outer_radius: physics.disk_outer_multiplier * rs,
            physics,
        })
    }

    pub fn position(&self) -> &P3 {
        &self.position
    }
    pub fn mass(&self) -> f64 {
        self.mass
    }
    pub fn schwarzschild_radius(&self) -> f64 {
        self.schwarzschild_radius
    }
    pub fn photon_sphere_radius(&self) -> f64 {
        self.photon_sphere_radius
    }
    pub fn disk_inner_radius(&self) -> f64 {
        self.disk_inner_radius
    }
    pub fn disk_outer_radius(&self) -> f64 {
        self.disk_outer_radius
    }

    /// Radius below which a ray counts as captured.
    pub fn capture_radius(&self) -> f64 {
        self.schwarzschild_radius * HORIZON_MARGIN
    }

    pub fn distance_to(&self, p: &P3) -> f64 {
        distance_to(p, &self.position)
    }

    /// Newtonian field, zero at or inside the horizon.
    pub fn gravitational_field(&self, p: &P3) -> V3 {
        let displacement = p - self.position;
        let dist = displacement.norm();
        if dist < self.capture_radius() {
            return V3::zeros();
        }
        displacement * (-self.mass / (dist * dist * dist))
    }

    /// Bends `dir` towards the hole. The returned direction is normalized
    /// except when it is returned unchanged.
    pub fn apply_lensing(&self, pos: &P3, dir: &V3) -> V3 {
        let dist = self.distance_to(pos);
        let rs = self.schwarzschild_radius;
        let strength = self.physics.lensing_strength;

        if dist < rs {
            // captured, the caller's horizon test takes over
            return *dir;
        }
        if dist >= rs * self.physics.lensing_range_multiplier {
            return *dir;
        }

        let toward_center = (self.position - pos).normalize_or_zero();
        if dist < self.photon_sphere_radius {
            let deflection = 1.0 / (dist - rs);
            (dir + toward_center * deflection * strength).normalize_or_zero()
        } else {
            let angle = 2.0 * self.mass / (dist * dist);
            let perpendicular = dir.cross(&toward_center).cross(dir).normalize_or_zero();
            (dir + perpendicular * angle * strength).normalize_or_zero()
        }
    }

    /// Crossing of the disk plane within ray parameter `[0, max_t]`, if it
    /// lands between the inner and outer radii.
    pub fn intersect_disk(&self, origin: &P3, dir: &V3, max_t: f64) -> Option<P3> {
        if dir.y.abs() < PARALLEL_EPS {
            return None;
        }
        let t = (self.position.y - origin.y) / dir.y;
        if t < 0.0 || t > max_t {
            return None;
        }
        let hit = origin + dir * t;
        let r = radial_distance(&hit, &self.position);
        if r >= self.disk_inner_radius && r <= self.disk_outer_radius {
            Some(hit)
        } else {
            None
        }
    }

    pub fn disk_temperature(&self, r: f64) -> f64 {
        let physics = &self.physics;
        (self.schwarzschild_radius / r)
            .max(physics.temperature_min)
            .min(physics.temperature_max)
    }

    /// Emitted color of the disk at `p`, unclamped. Points inside the inner
    /// edge are shaded as if they lay on it.
    pub fn disk_color(&self, p: &P3, effects: &Effects) -> RGB {
        let r = radial_distance(p, &self.position).max(self.disk_inner_radius);
        let mut temperature = self.disk_temperature(r);

        let doppler = if effects.doppler_shift {
            1.0 + (self.mass / r).sqrt() * effects.doppler_amplitude
        } else {
            1.0
        };

        if effects.turbulence {
            let angle = (p.z - self.position.z).atan2(p.x - self.position.x);
            let turbulence = (angle * self.physics.turbulence_frequency + r * 2.0).sin()
                * self.physics.turbulence_amplitude
                + 1.0;
            temperature *= turbulence;
        }

        temperature_color(temperature) * temperature * doppler
    }
}

fn temperature_color(temperature: f64) -> RGB {
    if temperature > 0.8 {
        RGB::new(1.0, 0.95, 0.8)
    } else if temperature > 0.6 {
        RGB::new(1.0, 0.8, 0.4)
    } else if temperature > 0.4 {
        RGB::new(1.0, 0.6, 0.2)
    } else {
        RGB::new(0.8, 0.3, 0.1)
    }
}
