//! Procedural star field and nebula seen by rays that escape.
//!
//! Noise is keyed on truncated direction components, so directions that
//! truncate to the same integers always get the same color.

use crate::config::Effects;
use crate::*;
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;

const SPACE: RGB = RGB::new(0.03, 0.03, 0.08);
const NEBULA_TINT: RGB = RGB::new(0.1, 0.05, 0.15);

const BRIGHT_STAR: f64 = 0.994;
const BLUE_STAR: f64 = 0.985;
const ORANGE_STAR: f64 = 0.975;

fn key(components: &[i64]) -> u64 {
    // FNV-1a over the integer components
    components.iter().fold(0xcbf2_9ce4_8422_2325u64, |h, c| {
        (h ^ *c as u64).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Uniform value in `{0, 0.001, ..., 0.999}` determined by `components`.
pub fn hash_noise(components: &[i64]) -> f64 {
    let mut rng = ChaCha12Rng::seed_from_u64(key(components));
    rng.gen_range(0..1000u32) as f64 / 1000.0
}

pub fn star_noise(dir: &V3) -> f64 {
    hash_noise(&[
        (dir.x * 1000.0) as i64,
        (dir.y * 1000.0) as i64,
        (dir.z * 1000.0) as i64,
    ])
}

pub fn nebula_noise(dir: &V3) -> f64 {
    hash_noise(&[(dir.x * 100.0) as i64, (dir.y * 100.0) as i64])
}

/// Maps the two noise values to a color.
pub fn shade(star: f64, nebula: f64, effects: &Effects) -> RGB {
    if star > BRIGHT_STAR {
        RGB::all(1.0) * ((star - BRIGHT_STAR) * effects.star_brightness)
    } else if star > BLUE_STAR {
        RGB::new(0.8, 0.8, 1.0) * ((star - BLUE_STAR) * 15.0)
    } else if star > ORANGE_STAR {
        RGB::new(1.0, 0.7, 0.5) * ((star - ORANGE_STAR) * 8.0)
    } else if nebula > effects.nebula_threshold {
        SPACE + NEBULA_TINT * ((nebula - effects.nebula_threshold) * 0.5)
    } else {
        SPACE
    }
}

pub fn background(dir: &V3, effects: &Effects) -> RGB {
    let star = star_noise(dir);
    if star > ORANGE_STAR {
        shade(star, 0.0, effects)
    } else {
        shade(star, nebula_noise(dir), effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: RGB, b: RGB) -> bool {
        (a.r - b.r).abs() < 1e-12 && (a.g - b.g).abs() < 1e-12 && (a.b - b.b).abs() < 1e-12
    }

    #[test]
    fn noise_is_bucketed_and_stable() {
        for i in -50..50 {
            let n = hash_noise(&[i, 2 * i, -i]);
            assert!(n >= 0.0 && n < 1.0);
            assert_eq!((n * 1000.0).round() / 1000.0, n);
            assert_eq!(n, hash_noise(&[i, 2 * i, -i]));
        }
    }

    #[test]
    fn noise_values_are_pinned() {
        // values of the ChaCha12 stream, independent of the rand release
        assert_eq!(hash_noise(&[0, 0, 0]), 0.832);
        assert_eq!(hash_noise(&[1, 2, 3]), 0.179);
        assert_eq!(hash_noise(&[311, -502, 806]), 0.026);
        assert_eq!(hash_noise(&[31, -50]), 0.992);
        assert_eq!(hash_noise(&[36, 13]), 0.327);
    }

    #[test]
    fn same_truncation_same_color() {
        let effects = Effects::default();
        let a = V3::new(0.3001, -0.2002, 0.9003);
        let b = V3::new(0.30015, -0.20025, 0.90035);
        assert_eq!(star_noise(&a), star_noise(&b));
        assert_eq!(nebula_noise(&a), nebula_noise(&b));
        assert_eq!(background(&a, &effects), background(&b, &effects));
    }

    #[test]
    fn star_tiers() {
        let effects = Effects::default();
        assert!(close(shade(0.999, 0.0, &effects), RGB::all(0.25)));
        assert!(close(
            shade(0.99, 0.0, &effects),
            RGB::new(0.8, 0.8, 1.0) * 0.075
        ));
        assert!(close(
            shade(0.98, 0.0, &effects),
            RGB::new(1.0, 0.7, 0.5) * 0.04
        ));
    }

    #[test]
    fn nebula_and_space() {
        let effects = Effects::default();
        assert_eq!(shade(0.975, 0.0, &effects), SPACE);
        assert_eq!(shade(0.5, 0.7, &effects), SPACE);
        assert!(close(
            shade(0.5, 0.9, &effects),
            SPACE + NEBULA_TINT * 0.1
        ));
    }

    #[test]
    fn never_black() {
        let effects = Effects::default();
        let mut stars = 0;
        for i in 0..2000 {
            let a = i as f64 * 0.0137;
            let dir = V3::new(a.cos() * 0.6, (a * 0.7).sin() * 0.5, 0.6).normalize();
            let c = background(&dir, &effects);
            assert!(c.is_finite());
            assert!(!c.is_black());
            if star_noise(&dir) > ORANGE_STAR {
                stars += 1;
            }
        }
        // roughly 2.4% of buckets are stars
        assert!(stars < 200);
    }
}
