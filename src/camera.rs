use crate::*;

pub trait Camera {
    fn position(&self) -> P3;

    /// Unit direction through pixel `(px, py)`. Coordinates may be
    /// fractional; `y` grows downwards in image space.
    fn ray_direction(&self, px: f64, py: f64, width: u32, height: u32) -> V3;

    fn ray(&self, px: f64, py: f64, width: u32, height: u32) -> Ray {
        Ray::new(self.position(), self.ray_direction(px, py, width, height))
    }
}

#[derive(Clone, Debug)]
pub struct PinHole {
    position: P3,
    basis: Basis,
    fov: f64,
    aspect_ratio: f64,
}

impl PinHole {
    pub fn new(position: P3, forward: V3, up: V3, fov_rad: f64) -> Self {
        PinHole {
            position,
            basis: Basis::new(&forward, &up.normalize_or_zero()),
            fov: fov_rad,
            aspect_ratio: 1.0,
        }
    }

    pub fn look_at(position: P3, view_at: P3, view_up: V3, fov_degree: f64) -> Self {
        Self::new(position, view_at - position, view_up, fov_degree.to_radians())
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn forward(&self) -> &V3 {
        &self.basis.forward
    }
}

impl Camera for PinHole {
    fn position(&self) -> P3 {
        self.position
    }

    fn ray_direction(&self, px: f64, py: f64, width: u32, height: u32) -> V3 {
        let scale = (self.fov * 0.5).tan();
        let x = (2.0 * px / width as f64 - 1.0) * scale * self.aspect_ratio;
        let y = (1.0 - 2.0 * py / height as f64) * scale;
        self.basis.to_world(x, y)
    }
}
