use nalgebra::*;
pub type P3 = Point3<f64>;
pub type V3 = Vector3<f64>;

const EPS: f64 = 1e-10;

/// Vector operations that resolve degenerate inputs to the zero vector
/// instead of producing NaN.
pub trait VecExt {
    fn normalize_or_zero(&self) -> V3;
    fn div_or_zero(&self, s: f64) -> V3;
}

impl VecExt for V3 {
    fn normalize_or_zero(&self) -> V3 {
        let len = self.norm();
        if len > EPS {
            self / len
        } else {
            V3::zeros()
        }
    }

    fn div_or_zero(&self, s: f64) -> V3 {
        if s.abs() < EPS {
            V3::zeros()
        } else {
            self / s
        }
    }
}

pub fn distance_to(a: &P3, b: &P3) -> f64 {
    (a - b).norm()
}

/// Distance of `p` from the vertical axis through `center`.
pub fn radial_distance(p: &P3, center: &P3) -> f64 {
    let dx = p.x - center.x;
    let dz = p.z - center.z;
    (dx * dx + dz * dz).sqrt()
}

/// Orthonormal camera frame.
#[derive(Clone, Debug)]
pub struct Basis {
    pub forward: V3,
    pub right: V3,
    pub up: V3,
}

impl Basis {
    // up need not be orthogonal to forward
    pub fn new(forward: &V3, up_like: &V3) -> Self {
        let forward = forward.normalize_or_zero();
        let right = forward.cross(up_like).normalize_or_zero();
        let up = right.cross(&forward).normalize_or_zero();
        Basis { forward, right, up }
    }

    pub fn to_world(&self, x: f64, y: f64) -> V3 {
        (self.forward + self.right * x + self.up * y).normalize_or_zero()
    }
}
