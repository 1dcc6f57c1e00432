//! Render job configuration.
//!
//! Every tunable constant of the engine lives in [`Config`]. A `Config` is
//! built once (usually `Config::default()` adjusted from the command line),
//! validated, and then passed by reference into the renderer and tracer.

use crate::error::{Error, Result};
use log::*;
use std::fmt;
use std::io::Write;

const MAX_SUPER_SAMPLING: u32 = 64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Physics {
    pub schwarzschild_multiplier: f64,
    pub photon_sphere_multiplier: f64,
    pub disk_inner_multiplier: f64,
    pub disk_outer_multiplier: f64,
    /// Beyond this many Schwarzschild radii lensing is ignored.
    pub lensing_range_multiplier: f64,
    pub lensing_strength: f64,
    pub turbulence_frequency: f64,
    pub turbulence_amplitude: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Physics {
            schwarzschild_multiplier: 2.0,
            photon_sphere_multiplier: 1.5,
            disk_inner_multiplier: 3.0,
            disk_outer_multiplier: 10.0,
            lensing_range_multiplier: 10.0,
            lensing_strength: 0.1,
            turbulence_frequency: 8.0,
            turbulence_amplitude: 0.15,
            temperature_min: 0.1,
            temperature_max: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rendering {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in radians.
    pub fov: f64,
    pub antialiasing: bool,
    /// Sub-samples per pixel edge, so `n * n` samples per pixel.
    pub super_sampling_level: u32,
    pub post_processing: bool,
}

impl Default for Rendering {
    fn default() -> Self {
        Rendering {
            width: 800,
            height: 600,
            fov: 0.785398,
            antialiasing: true,
            super_sampling_level: 2,
            post_processing: true,
        }
    }
}

impl Rendering {
    pub fn samples_per_edge(&self) -> u32 {
        if self.antialiasing {
            self.super_sampling_level.max(1)
        } else {
            1
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marching {
    pub max_steps: usize,
    pub max_distance: f64,
    pub step_far: f64,
    pub step_medium: f64,
    pub step_near: f64,
    pub step_close: f64,
    /// Lensing is applied on every n-th step.
    pub lensing_update_frequency: usize,
    /// Largest ray parameter accepted as a disk crossing for one step.
    pub disk_intersection_threshold: f64,
}

impl Default for Marching {
    fn default() -> Self {
        Marching {
            max_steps: 500,
            max_distance: 50.0,
            step_far: 0.4,
            step_medium: 0.2,
            step_near: 0.1,
            step_close: 0.05,
            lensing_update_frequency: 3,
            disk_intersection_threshold: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Effects {
    pub lens_flare: bool,
    pub doppler_shift: bool,
    pub turbulence: bool,
    pub lens_flare_intensity: f64,
    pub doppler_amplitude: f64,
    pub star_brightness: f64,
    pub nebula_threshold: f64,
}

impl Default for Effects {
    fn default() -> Self {
        Effects {
            lens_flare: true,
            doppler_shift: true,
            turbulence: true,
            lens_flare_intensity: 0.3,
            doppler_amplitude: 0.1,
            star_brightness: 50.0,
            nebula_threshold: 0.7,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostProcessing {
    pub contrast: f64,
    pub gamma: f64,
    pub apply_gamma: bool,
    pub clamp_colors: bool,
}

impl Default for PostProcessing {
    fn default() -> Self {
        PostProcessing {
            contrast: 1.2,
            gamma: 2.2,
            apply_gamma: false,
            clamp_colors: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct System {
    pub multithreading: bool,
    pub max_threads: usize,
}

impl Default for System {
    fn default() -> Self {
        System {
            multithreading: false,
            max_threads: 8,
        }
    }
}

impl System {
    pub fn threads(&self) -> usize {
        if self.multithreading {
            num_cpus::get().min(self.max_threads).max(1)
        } else {
            1
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Output {
    pub prefix: String,
    pub show_progress: bool,
}

impl Default for Output {
    fn default() -> Self {
        Output {
            prefix: "black_hole_".to_string(),
            show_progress: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub physics: Physics,
    pub rendering: Rendering,
    pub marching: Marching,
    pub effects: Effects,
    pub post: PostProcessing,
    pub system: System,
    pub output: Output,
}

fn check(ok: bool, what: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidConfig(what.to_string()))
    }
}

fn positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

impl Physics {
    /// Keeps `0 < Rs <= disk inner <= disk outer` for any positive mass.
    pub fn validate(&self) -> Result<()> {
        check(
            positive(self.schwarzschild_multiplier),
            "schwarzschild_multiplier must be positive",
        )?;
        check(
            self.photon_sphere_multiplier >= 1.0,
            "photon_sphere_multiplier must be at least 1",
        )?;
        check(
            self.disk_inner_multiplier >= 1.0
                && self.disk_inner_multiplier <= self.disk_outer_multiplier,
            "disk radii must satisfy 1 <= inner <= outer",
        )?;
        check(
            positive(self.lensing_range_multiplier),
            "lensing_range_multiplier must be positive",
        )?;
        check(
            positive(self.temperature_min) && self.temperature_min <= self.temperature_max,
            "temperature range must satisfy 0 < min <= max",
        )
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.physics.validate()?;

        let r = &self.rendering;
        if r.width == 0 || r.height == 0 {
            return Err(Error::InvalidDimensions {
                width: r.width,
                height: r.height,
            });
        }
        check(
            positive(r.fov) && r.fov < std::f64::consts::PI,
            "fov must lie in (0, pi)",
        )?;
        check(
            r.super_sampling_level > 0 && r.super_sampling_level <= MAX_SUPER_SAMPLING,
            "super_sampling_level must lie in 1..=64",
        )?;

        let m = &self.marching;
        check(m.max_steps > 0, "max_steps must be positive")?;
        check(positive(m.max_distance), "max_distance must be positive")?;
        check(
            [m.step_far, m.step_medium, m.step_near, m.step_close]
                .iter()
                .all(|s| positive(*s)),
            "step sizes must be positive",
        )?;
        check(
            m.lensing_update_frequency > 0,
            "lensing_update_frequency must be positive",
        )?;
        check(
            positive(m.disk_intersection_threshold),
            "disk_intersection_threshold must be positive",
        )?;

        check(positive(self.post.gamma), "gamma must be positive")?;
        check(self.system.max_threads > 0, "max_threads must be positive")?;
        Ok(())
    }

    pub fn log(&self) {
        for line in self.to_string().lines() {
            info!("{}", line);
        }
    }

    pub fn export(&self, path: &str) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        write!(file, "{}", self)?;
        debug!("configuration exported to {}", path);
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let p = &self.physics;
        writeln!(f, "physics.schwarzschild_multiplier = {}", p.schwarzschild_multiplier)?;
        writeln!(f, "physics.photon_sphere_multiplier = {}", p.photon_sphere_multiplier)?;
        writeln!(f, "physics.disk_inner_multiplier = {}", p.disk_inner_multiplier)?;
        writeln!(f, "physics.disk_outer_multiplier = {}", p.disk_outer_multiplier)?;
        writeln!(f, "physics.lensing_range_multiplier = {}", p.lensing_range_multiplier)?;
        writeln!(f, "physics.lensing_strength = {}", p.lensing_strength)?;
        writeln!(f, "physics.turbulence_frequency = {}", p.turbulence_frequency)?;
        writeln!(f, "physics.turbulence_amplitude = {}", p.turbulence_amplitude)?;
        writeln!(f, "physics.temperature_min = {}", p.temperature_min)?;
        writeln!(f, "physics.temperature_max = {}", p.temperature_max)?;

        let r = &self.rendering;
        writeln!(f, "rendering.width = {}", r.width)?;
        writeln!(f, "rendering.height = {}", r.height)?;
        writeln!(f, "rendering.fov = {}", r.fov)?;
        writeln!(f, "rendering.antialiasing = {}", r.antialiasing)?;
        writeln!(f, "rendering.super_sampling_level = {}", r.super_sampling_level)?;
        writeln!(f, "rendering.post_processing = {}", r.post_processing)?;

        let m = &self.marching;
        writeln!(f, "marching.max_steps = {}", m.max_steps)?;
        writeln!(f, "marching.max_distance = {}", m.max_distance)?;
        writeln!(f, "marching.step_far = {}", m.step_far)?;
        writeln!(f, "marching.step_medium = {}", m.step_medium)?;
        writeln!(f, "marching.step_near = {}", m.step_near)?;
        writeln!(f, "marching.step_close = {}", m.step_close)?;
        writeln!(f, "marching.lensing_update_frequency = {}", m.lensing_update_frequency)?;
        writeln!(f, "marching.disk_intersection_threshold = {}", m.disk_intersection_threshold)?;

        let e = &self.effects;
        writeln!(f, "effects.lens_flare = {}", e.lens_flare)?;
        writeln!(f, "effects.doppler_shift = {}", e.doppler_shift)?;
        writeln!(f, "effects.turbulence = {}", e.turbulence)?;
        writeln!(f, "effects.lens_flare_intensity = {}", e.lens_flare_intensity)?;
        writeln!(f, "effects.doppler_amplitude = {}", e.doppler_amplitude)?;
        writeln!(f, "effects.star_brightness = {}", e.star_brightness)?;
        writeln!(f, "effects.nebula_threshold = {}", e.nebula_threshold)?;

        writeln!(f, "post.contrast = {}", self.post.contrast)?;
        writeln!(f, "post.gamma = {}", self.post.gamma)?;
        writeln!(f, "post.apply_gamma = {}", self.post.apply_gamma)?;
        writeln!(f, "post.clamp_colors = {}", self.post.clamp_colors)?;

        writeln!(f, "system.multithreading = {}", self.system.multithreading)?;
        writeln!(f, "system.max_threads = {}", self.system.max_threads)?;

        writeln!(f, "output.prefix = {}", self.output.prefix)?;
        writeln!(f, "output.show_progress = {}", self.output.show_progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rendering.samples_per_edge(), 2);
        assert_eq!(config.system.threads(), 1);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = Config::default();
        config.rendering.width = 0;
        match config.validate() {
            Err(Error::InvalidDimensions { width: 0, height: 600 }) => {}
            other => panic!("unexpected {:?}", other),
        }

        let mut config = Config::default();
        config.physics.disk_inner_multiplier = 12.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.marching.lensing_update_frequency = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rendering.super_sampling_level = 65;
        assert!(config.validate().is_err());
        config.rendering.super_sampling_level = 64;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn physics_keeps_radii_ordered() {
        assert!(Physics::default().validate().is_ok());
        let inverted = Physics {
            disk_inner_multiplier: 0.5,
            disk_outer_multiplier: 0.25,
            ..Physics::default()
        };
        match inverted.validate() {
            Err(Error::InvalidConfig(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
        let mut config = Config::default();
        config.physics = inverted;
        assert!(config.validate().is_err());
    }

    #[test]
    fn no_aa_means_single_sample() {
        let mut config = Config::default();
        config.rendering.antialiasing = false;
        config.rendering.super_sampling_level = 4;
        assert_eq!(config.rendering.samples_per_edge(), 1);
    }

    #[test]
    fn display_lists_every_section() {
        let text = Config::default().to_string();
        for key in &[
            "physics.lensing_strength = 0.1",
            "rendering.width = 800",
            "marching.max_steps = 500",
            "effects.nebula_threshold = 0.7",
            "post.contrast = 1.2",
            "system.max_threads = 8",
            "output.prefix = black_hole_",
        ] {
            assert!(text.contains(key), "missing {}", key);
        }
    }
}
