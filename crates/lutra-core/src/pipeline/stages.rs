//! Per-pixel stage math.
//!
//! Each function takes the running RGB and the stage's raw parameter in the
//! same units as [`AdjustmentSet`](crate::adjust::AdjustmentSet). The WGSL
//! shader in `lutra-gpu` mirrors these line for line. Parameters at their
//! neutral value leave the color untouched.

use glam::{Vec2, Vec3};

use crate::color::OverlayColor;
use crate::lut::Lut3D;
use crate::pipeline::noise;

/// Rec. 709 luminance weights.
pub const LUMA_REC709: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// Gray that fade blends toward.
const FADE_GRAY: f32 = 0.8;

/// Rec. 709 luminance.
pub fn luminance(c: Vec3) -> f32 {
    c.dot(LUMA_REC709)
}

/// Hermite smoothstep, as in GLSL.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// GLSL `mix`: `a·(1 − t) + b·t`.
pub fn mix(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// `color · 2^ev`.
pub fn exposure(c: Vec3, ev: f32) -> Vec3 {
    c * 2.0_f32.powf(ev)
}

/// `color + brightness / 100`.
pub fn brightness(c: Vec3, value: f32) -> Vec3 {
    c + Vec3::splat(value / 100.0)
}

/// Linear contrast around 0.5 with factor `(100 + v) / 100`.
pub fn contrast(c: Vec3, value: f32) -> Vec3 {
    if value == 0.0 {
        return c;
    }
    let factor = (100.0 + value) / 100.0;
    (c - Vec3::splat(0.5)) * factor + Vec3::splat(0.5)
}

/// Scale chroma against Rec. 709 luminance; 100 is neutral.
pub fn saturation(c: Vec3, value: f32) -> Vec3 {
    if value == 100.0 {
        return c;
    }
    mix(Vec3::splat(luminance(c)), c, value / 100.0)
}

/// Additive blue-yellow shift.
pub fn temperature(c: Vec3, value: f32) -> Vec3 {
    let t = value / 100.0;
    if t > 0.0 {
        c + Vec3::new(t * 0.2, t * 0.1, -t * 0.2)
    } else {
        let tb = -t;
        c + Vec3::new(-tb * 0.2, -tb * 0.1, tb * 0.2)
    }
}

/// Additive green-magenta shift. Positive is magenta.
pub fn tint(c: Vec3, value: f32) -> Vec3 {
    let t = value / 100.0;
    if t > 0.0 {
        c + Vec3::new(t * 0.1, -t * 0.1, t * 0.1)
    } else {
        let tg = -t;
        c + Vec3::new(-tg * 0.1, tg * 0.1, -tg * 0.1)
    }
}

/// Blend toward a flat 0.8 gray.
pub fn fade(c: Vec3, value: f32) -> Vec3 {
    if value <= 0.0 {
        return c;
    }
    mix(c, Vec3::splat(FADE_GRAY), value / 100.0)
}

/// Gain of up to ±30% on pixels brighter than mid-gray.
pub fn highlights(c: Vec3, value: f32) -> Vec3 {
    if value == 0.0 {
        return c;
    }
    let adjust = 1.0 + (value / 100.0) * 0.3;
    let mask = smoothstep(0.5, 1.0, luminance(c));
    mix(c, c * adjust, mask)
}

/// Gain of up to ±30% on pixels darker than mid-gray.
pub fn shadows(c: Vec3, value: f32) -> Vec3 {
    if value == 0.0 {
        return c;
    }
    let adjust = 1.0 + (value / 100.0) * 0.3;
    let mask = 1.0 - smoothstep(0.0, 0.5, luminance(c));
    mix(c, c * adjust, mask)
}

/// Split-tone the shadows: warm when positive, cool when negative.
pub fn shadows_tint(c: Vec3, value: f32) -> Vec3 {
    if value == 0.0 {
        return c;
    }
    let tv = value / 100.0;
    let tint_vec = if tv > 0.0 {
        Vec3::new(1.0 + tv * 0.2, 1.0, 1.0 - tv * 0.1)
    } else {
        let cool = tv.abs();
        Vec3::new(1.0 - cool * 0.1, 1.0, 1.0 + cool * 0.2)
    };
    let mask = 1.0 - smoothstep(0.0, 0.5, luminance(c));
    mix(c, c * tint_vec, mask * tv.abs())
}

/// `mix(color, black, blacks / 100 · 0.2)`.
///
/// The sign is not special-cased: negative values extrapolate away from
/// black through the same formula.
pub fn blacks(c: Vec3, value: f32) -> Vec3 {
    if value == 0.0 {
        return c;
    }
    mix(c, Vec3::ZERO, (value / 100.0) * 0.2)
}

/// Push bright pixels toward white.
pub fn whites(c: Vec3, value: f32) -> Vec3 {
    if value == 0.0 {
        return c;
    }
    let mask = smoothstep(0.7, 1.0, luminance(c));
    mix(c, Vec3::ONE, mask * (value / 100.0) * 0.2)
}

/// Blend a LUT lookup in by `intensity`.
pub fn lut_sample(c: Vec3, lut: &Lut3D, intensity: f32) -> Vec3 {
    let looked = Vec3::from_array(lut.sample(c.to_array()));
    mix(c, looked, intensity)
}

/// Multiplicative tint blended by `opacity · intensity`.
pub fn overlay(c: Vec3, color: &OverlayColor, intensity: f32) -> Vec3 {
    let tint = Vec3::from_array(color.rgb);
    mix(c, tint * c, color.opacity * intensity)
}

/// Multiplicative hash grain.
pub fn grain(c: Vec3, value: f32, uv: Vec2, jitter: Vec2) -> Vec3 {
    if value <= 0.0 {
        return c;
    }
    let amount = value / 100.0 * 0.2;
    let n = noise::hash(uv + jitter);
    mix(c, c * n, amount)
}

/// Radial darkening toward the frame edges.
pub fn vignette(c: Vec3, value: f32, uv: Vec2) -> Vec3 {
    if value <= 0.0 {
        return c;
    }
    let amount = value / 100.0;
    let dist = (uv - Vec2::splat(0.5)).length();
    let factor = 1.0 - smoothstep(0.5, 1.2, dist * (1.0 + amount));
    c * (1.0 * (1.0 - amount) + factor * amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < EPSILON
    }

    #[test]
    fn test_neutral_values_are_identity() {
        let c = Vec3::new(0.3, 0.5, 0.7);
        assert_eq!(exposure(c, 0.0), c);
        assert_eq!(brightness(c, 0.0), c);
        assert_eq!(contrast(c, 0.0), c);
        assert_eq!(saturation(c, 100.0), c);
        assert_eq!(temperature(c, 0.0), c);
        assert_eq!(tint(c, 0.0), c);
        assert_eq!(fade(c, 0.0), c);
        assert_eq!(highlights(c, 0.0), c);
        assert_eq!(shadows(c, 0.0), c);
        assert_eq!(shadows_tint(c, 0.0), c);
        assert_eq!(blacks(c, 0.0), c);
        assert_eq!(whites(c, 0.0), c);
        assert_eq!(grain(c, 0.0, Vec2::ZERO, Vec2::ZERO), c);
        assert_eq!(vignette(c, 0.0, Vec2::ZERO), c);
    }

    #[test]
    fn test_exposure_one_stop_doubles() {
        let c = Vec3::new(0.1, 0.2, 0.3);
        assert!(close(exposure(c, 1.0), c * 2.0));
        assert!(close(exposure(c, -1.0), c * 0.5));
    }

    #[test]
    fn test_contrast_keeps_mid_gray() {
        let gray = Vec3::splat(0.5);
        assert!(close(contrast(gray, 80.0), gray));
        let bright = contrast(Vec3::splat(0.8), 50.0);
        assert!(close(bright, Vec3::splat(0.95)));
    }

    #[test]
    fn test_saturation_zero_is_grayscale() {
        let out = saturation(Vec3::new(0.8, 0.4, 0.2), 0.0);
        assert!((out.x - out.y).abs() < EPSILON);
        assert!((out.y - out.z).abs() < EPSILON);
    }

    #[test]
    fn test_temperature_direction() {
        let c = Vec3::splat(0.5);
        let warm = temperature(c, 100.0);
        assert!(close(warm, Vec3::new(0.7, 0.6, 0.3)));
        let cool = temperature(c, -100.0);
        assert!(close(cool, Vec3::new(0.3, 0.4, 0.7)));
    }

    #[test]
    fn test_tint_direction() {
        let c = Vec3::splat(0.5);
        assert!(close(tint(c, 100.0), Vec3::new(0.6, 0.4, 0.6)));
        assert!(close(tint(c, -100.0), Vec3::new(0.4, 0.6, 0.4)));
    }

    #[test]
    fn test_fade_full_reaches_gray() {
        assert!(close(fade(Vec3::new(0.0, 1.0, 0.3), 100.0), Vec3::splat(0.8)));
    }

    #[test]
    fn test_highlights_ignore_dark_pixels() {
        let dark = Vec3::splat(0.2);
        assert!(close(highlights(dark, 100.0), dark));
        let bright = Vec3::ONE;
        assert!(close(highlights(bright, 100.0), Vec3::splat(1.3)));
    }

    #[test]
    fn test_shadows_ignore_bright_pixels() {
        let bright = Vec3::splat(0.9);
        assert!(close(shadows(bright, -100.0), bright));
        assert!(close(shadows(Vec3::ZERO, 100.0), Vec3::ZERO));
        let dark = Vec3::splat(0.0001);
        assert!(shadows(dark, 100.0).x > dark.x);
    }

    #[test]
    fn test_shadows_tint_warm_and_cool() {
        let dark = Vec3::splat(0.1);
        let warm = shadows_tint(dark, 100.0);
        assert!(warm.x > dark.x && warm.z < dark.z);
        let cool = shadows_tint(dark, -100.0);
        assert!(cool.x < dark.x && cool.z > dark.z);
    }

    #[test]
    fn test_blacks_sign_is_literal() {
        let c = Vec3::splat(0.5);
        assert!(close(blacks(c, 100.0), Vec3::splat(0.4)));
        assert!(close(blacks(c, -100.0), Vec3::splat(0.6)));
    }

    #[test]
    fn test_whites_only_touch_bright_pixels() {
        let mid = Vec3::splat(0.5);
        assert!(close(whites(mid, 100.0), mid));
        let bright = Vec3::splat(0.9);
        assert!(whites(bright, 100.0).x > bright.x);
    }

    #[test]
    fn test_overlay_multiplies_by_opacity() {
        let c = Vec3::splat(0.5);
        let color = OverlayColor {
            rgb: [1.0, 0.0, 0.0],
            opacity: 0.5,
        };
        assert!(close(overlay(c, &color, 1.0), Vec3::new(0.5, 0.25, 0.25)));
        assert!(close(overlay(c, &color, 0.0), c));
    }

    #[test]
    fn test_vignette_darkens_corners_not_center() {
        let c = Vec3::splat(0.6);
        assert!(close(vignette(c, 100.0, Vec2::splat(0.5)), c));
        assert!(vignette(c, 100.0, Vec2::ZERO).x < c.x);
    }

    #[test]
    fn test_grain_never_brightens() {
        let c = Vec3::splat(0.6);
        for i in 0..20 {
            let uv = Vec2::new(i as f32 / 20.0, 0.3);
            let out = grain(c, 100.0, uv, noise::frame_jitter(0.0));
            assert!(out.x <= c.x + EPSILON);
        }
    }
}
