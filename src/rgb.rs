use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RGB {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

fn unit_clamp(c: f64) -> f64 {
    c.max(0.0).min(1.0)
}

impl RGB {
    pub const BLACK: RGB = RGB {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        RGB { r, g, b }
    }
    pub fn all(x: f64) -> Self {
        Self::new(x, x, x)
    }

    fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        RGB::new(f(self.r), f(self.g), f(self.b))
    }

    pub fn clamp(&self) -> Self {
        self.map(unit_clamp)
    }

    pub fn gamma_correct(&self, gamma: f64) -> Self {
        let inv = 1.0 / gamma;
        self.map(|c| c.powf(inv))
    }

    /// Stretches each channel around 0.5, result clamped to [0, 1].
    pub fn enhance_contrast(&self, contrast: f64) -> Self {
        self.map(|c| unit_clamp((c - 0.5) * contrast + 0.5))
    }

    pub fn luminance(&self) -> f64 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    pub fn is_black(&self) -> bool {
        self.r < 1e-6 && self.g < 1e-6 && self.b < 1e-6
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Clamps, then truncates `c * 255` to a byte.
    pub fn to_bytes(&self) -> [u8; 3] {
        let c = self.clamp();
        [
            (c.r * 255.0) as u8,
            (c.g * 255.0) as u8,
            (c.b * 255.0) as u8,
        ]
    }
}

impl<'a> Add<&'a Self> for RGB {
    type Output = Self;
    fn add(self, rhs: &'a Self) -> Self {
        RGB {
            r: self.r + rhs.r,
            g: self.g + rhs.g,
            b: self.b + rhs.b,
        }
    }
}

impl Add for RGB {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.add(&rhs)
    }
}

impl AddAssign for RGB {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<'a> Sub<&'a Self> for RGB {
    type Output = Self;
    fn sub(self, rhs: &'a Self) -> Self {
        RGB {
            r: self.r - rhs.r,
            g: self.g - rhs.g,
            b: self.b - rhs.b,
        }
    }
}

impl Sub for RGB {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.sub(&rhs)
    }
}

impl<'a> Mul<&'a Self> for RGB {
    type Output = Self;
    fn mul(self, rhs: &'a Self) -> Self {
        RGB {
            r: self.r * rhs.r,
            g: self.g * rhs.g,
            b: self.b * rhs.b,
        }
    }
}

impl Mul for RGB {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.mul(&rhs)
    }
}

impl Mul<f64> for RGB {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        RGB {
            r: self.r * rhs,
            g: self.g * rhs,
            b: self.b * rhs,
        }
    }
}

impl MulAssign<f64> for RGB {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl Div<f64> for RGB {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        RGB {
            r: self.r / rhs,
            g: self.g / rhs,
            b: self.b / rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_and_contrast() {
        let c = RGB::new(-0.5, 0.5, 1.7);
        assert_eq!(c.clamp(), RGB::new(0.0, 0.5, 1.0));
        let e = RGB::new(0.0, 0.5, 0.75).enhance_contrast(1.2);
        assert_eq!(e.r, 0.0);
        assert_eq!(e.g, 0.5);
        assert!((e.b - 0.8).abs() < 1e-12);
    }

    #[test]
    fn gamma() {
        let c = RGB::new(0.25, 1.0, 0.0).gamma_correct(2.0);
        assert!((c.r - 0.5).abs() < 1e-12);
        assert_eq!(c.g, 1.0);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn luminance_and_black() {
        assert!((RGB::all(1.0).luminance() - 1.0).abs() < 1e-12);
        assert!(RGB::all(5e-7).is_black());
        assert!(!RGB::new(0.0, 0.0, 1e-5).is_black());
    }

    #[test]
    fn bytes_truncate() {
        assert_eq!(RGB::new(1.0, 0.999, 2.0).to_bytes(), [255, 254, 255]);
        assert_eq!(RGB::new(0.03, 0.03, 0.08).to_bytes(), [7, 7, 20]);
        assert_eq!(RGB::new(-1.0, 0.5, 0.0).to_bytes(), [0, 127, 0]);
    }

    #[test]
    fn arithmetic() {
        let mut c = RGB::new(1.0, 2.0, 3.0) + RGB::all(1.0);
        c *= 0.5;
        assert_eq!(c, RGB::new(1.0, 1.5, 2.0));
        assert_eq!(c * RGB::new(2.0, 0.0, 1.0), RGB::new(2.0, 0.0, 2.0));
        assert_eq!(c - RGB::all(1.0), RGB::new(0.0, 0.5, 1.0));
        assert_eq!(c / 2.0, RGB::new(0.5, 0.75, 1.0));
    }
}
