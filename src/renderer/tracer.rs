use super::background::background;
use crate::black_hole::BlackHole;
use crate::config::{Config, Effects, Marching};
use crate::*;

const FLARE: RGB = RGB::new(0.8, 0.9, 1.0);

/// Marching step for a ray at `dist` from the hole, finer when closer.
pub fn step_size(dist: f64, rs: f64, marching: &Marching) -> f64 {
    if dist >= rs * 8.0 {
        marching.step_far
    } else if dist >= rs * 5.0 {
        marching.step_medium
    } else if dist >= rs * 2.0 {
        marching.step_near
    } else {
        marching.step_close
    }
}

fn shade_disk(
    black_hole: &BlackHole,
    dist: f64,
    hit: &P3,
    hit_dist: f64,
    effects: &Effects,
) -> RGB {
    let rs = black_hole.schwarzschild_radius();
    let mut color = black_hole.disk_color(hit, effects);
    if effects.lens_flare && dist < rs * 4.0 {
        let strength = 1.0 / (1.0 + (dist - rs));
        color += FLARE * strength * effects.lens_flare_intensity;
    }
    let intensity = 1.0 + 0.5 / (1.0 + hit_dist);
    color * intensity
}

/// Marches `ray` past `black_hole` and returns the color it sees.
///
/// The ray ends when it falls within the capture radius (black), when it
/// crosses the accretion disk close to its current position, or when it runs
/// out of steps or distance, in which case the background is sampled along
/// its final direction.
pub fn trace(ray: &Ray, black_hole: &BlackHole, config: &Config) -> RGB {
    let marching = &config.marching;
    let rs = black_hole.schwarzschild_radius();
    let mut pos = ray.origin;
    let mut dir = ray.dir;
    let mut traveled = 0.0;

    for i in 0..marching.max_steps {
        let dist = black_hole.distance_to(&pos);
        let step = step_size(dist, rs, marching);

        if dist < black_hole.capture_radius() {
            return RGB::BLACK;
        }

        if let Some(hit) =
            black_hole.intersect_disk(&pos, &dir, marching.disk_intersection_threshold)
        {
            let hit_dist = distance_to(&pos, &hit);
            if hit_dist < step * 2.0 {
                return shade_disk(black_hole, dist, &hit, hit_dist, &config.effects);
            }
        }

        if i % marching.lensing_update_frequency == 0 {
            dir = black_hole.apply_lensing(&pos, &dir);
        }

        pos += dir * step;
        traveled += step;
        if traveled > marching.max_distance {
            break;
        }
    }

    background(&dir, &config.effects)
}
