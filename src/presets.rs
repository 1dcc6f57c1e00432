use crate::camera::PinHole;
use crate::error::{Error, Result};
use crate::*;

/// A named camera placement looking at `target`.
#[derive(Clone, Debug)]
pub struct View {
    pub name: &'static str,
    pub position: P3,
    pub target: P3,
    pub up: V3,
}

impl View {
    pub fn camera(&self, fov_rad: f64) -> PinHole {
        PinHole::new(self.position, self.target - self.position, self.up, fov_rad)
    }

    /// First word of the name, lowercased: "front", "side", ...
    pub fn slug(&self) -> String {
        self.name
            .split_whitespace()
            .next()
            .unwrap_or(self.name)
            .to_lowercase()
    }
}

pub fn views() -> Vec<View> {
    let view = |name, p: [f64; 3], up: [f64; 3]| View {
        name,
        position: P3::new(p[0], p[1], p[2]),
        target: P3::origin(),
        up: V3::new(up[0], up[1], up[2]),
    };
    vec![
        view("Front View", [0.0, 2.0, -8.0], [0.0, 1.0, 0.0]),
        view("Side View", [-6.0, 1.0, -4.0], [0.0, 1.0, 0.0]),
        view("Top View", [0.0, 5.0, -6.0], [0.0, 0.0, -1.0]),
        view("Close View", [0.0, 1.0, -4.0], [0.0, 1.0, 0.0]),
        view("Wide View", [0.0, 3.0, -12.0], [0.0, 1.0, 0.0]),
    ]
}

/// Views rendered when none are requested.
pub const DEFAULT_VIEWS: [&str; 3] = ["front", "side", "top"];

/// Looks a view up by slug, full name or 1-based index.
pub fn find(key: &str) -> Result<View> {
    let all = views();
    if let Ok(i) = key.parse::<usize>() {
        if i >= 1 && i <= all.len() {
            return Ok(all[i - 1].clone());
        }
    }
    let key_lower = key.to_lowercase();
    all.into_iter()
        .find(|v| v.slug() == key_lower || v.name.to_lowercase() == key_lower)
        .ok_or_else(|| Error::UnknownView(key.to_string()))
}
