//! Deterministic hash noise shared by grain and the procedural programs.
//!
//! Same formulas as the WGSL shaders so that CPU and GPU agree on the
//! pattern (not bit-for-bit: GPU `sin` precision differs).

use glam::Vec2;

/// `fract(x) = x - floor(x)`.
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// `fract(sin(dot(p, (12.9898, 78.233))) · 43758.5453)`, in [0, 1].
pub fn hash(p: Vec2) -> f32 {
    fract(p.dot(Vec2::new(12.9898, 78.233)).sin() * 43758.5453)
}

/// Per-frame offset added to uv before hashing grain.
///
/// `time = 0` gives the fixed jitter still images use.
pub fn frame_jitter(time: f32) -> Vec2 {
    Vec2::new(fract((12.9898 + time).sin()), fract((78.233 + time).cos()))
}

/// Smoothed value noise over the integer lattice, squared.
pub fn value_noise(p: Vec2) -> f32 {
    let ip = p.floor();
    let f = p - ip;
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);

    let a = hash(ip);
    let b = hash(ip + Vec2::new(1.0, 0.0));
    let c = hash(ip + Vec2::new(0.0, 1.0));
    let d = hash(ip + Vec2::new(1.0, 1.0));

    let top = a + (b - a) * u.x;
    let bottom = c + (d - c) * u.x;
    let res = top + (bottom - top) * u.y;
    res * res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_in_unit_range_and_deterministic() {
        for i in 0..100 {
            let p = Vec2::new(i as f32 * 0.173, i as f32 * 0.311);
            let h = hash(p);
            assert!((0.0..=1.0).contains(&h));
            assert_eq!(h, hash(p));
        }
    }

    #[test]
    fn test_jitter_changes_with_time() {
        assert_ne!(frame_jitter(0.0), frame_jitter(1.0));
        assert_eq!(frame_jitter(2.5), frame_jitter(2.5));
    }

    #[test]
    fn test_value_noise_bounded() {
        for i in 0..50 {
            let n = value_noise(Vec2::new(i as f32 * 0.37, 3.0 - i as f32 * 0.11));
            assert!((0.0..=1.0).contains(&n));
        }
    }
}
