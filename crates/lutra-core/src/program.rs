//! Procedural shader programs.
//!
//! Each program computes a pixel from the source frame at `uv`, sampling
//! neighbouring uvs for the channel-shift looks, and an explicit `time`.
//! Programs do not read the global [`AdjustmentSet`](crate::adjust::AdjustmentSet).

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::frame::Frame;
use crate::pipeline::noise::{hash, value_noise};
use crate::pipeline::stages::{mix, smoothstep};

/// Rec. 601 luma weights, used by the film programs.
const LUMA_REC601: Vec3 = Vec3::new(0.299, 0.587, 0.114);

/// Uniforms for one procedural program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "program", rename_all = "camelCase")]
pub enum ProgramParams {
    /// Warm vintage film with grain and a soft vignette.
    #[serde(rename_all = "camelCase")]
    RetroCam {
        grain_amount: f32,
        vignette_intensity: f32,
        warmth: f32,
    },
    /// Rich greens, punchy reds, cool shadows.
    #[serde(rename_all = "camelCase")]
    Fuji {
        green_boost: f32,
        red_contrast: f32,
        shadow_color: f32,
    },
    /// Block displacement, tearing lines and RGB split.
    #[serde(rename_all = "camelCase")]
    Glitch {
        intensity: f32,
        block_intensity: f32,
        rgb_shift_amount: f32,
    },
    /// Tracking wobble, scanlines and chroma bleed.
    #[serde(rename_all = "camelCase")]
    Vhs {
        noise_amount: f32,
        scanline_intensity: f32,
        color_shift_amount: f32,
    },
    /// Luminance mapped onto a two-color gradient.
    #[serde(rename_all = "camelCase")]
    Duotone {
        dark: [f32; 3],
        light: [f32; 3],
        contrast: f32,
    },
}

impl ProgramParams {
    pub const RETRO_CAM: ProgramParams = ProgramParams::RetroCam {
        grain_amount: 0.03,
        vignette_intensity: 0.5,
        warmth: 0.6,
    };

    pub const FUJI: ProgramParams = ProgramParams::Fuji {
        green_boost: 0.7,
        red_contrast: 0.5,
        shadow_color: 0.6,
    };

    pub const GLITCH: ProgramParams = ProgramParams::Glitch {
        intensity: 0.7,
        block_intensity: 0.6,
        rgb_shift_amount: 0.02,
    };

    pub const VHS: ProgramParams = ProgramParams::Vhs {
        noise_amount: 0.04,
        scanline_intensity: 0.6,
        color_shift_amount: 0.003,
    };

    pub const DUOTONE: ProgramParams = ProgramParams::Duotone {
        dark: [0.3, 0.15, 0.4],
        light: [0.9, 0.8, 0.3],
        contrast: 0.4,
    };

    /// Short program name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ProgramParams::RetroCam { .. } => "retro-cam",
            ProgramParams::Fuji { .. } => "fuji",
            ProgramParams::Glitch { .. } => "glitch",
            ProgramParams::Vhs { .. } => "vhs",
            ProgramParams::Duotone { .. } => "duotone",
        }
    }

    /// Whether the output changes with `time`.
    pub fn is_animated(&self) -> bool {
        matches!(
            self,
            ProgramParams::Glitch { .. } | ProgramParams::Vhs { .. }
        )
    }

    /// Shade one pixel. The rgb result is clamped to [0, 1]. Alpha is the
    /// bilinear sample at `uv`; renderers take alpha from the source pixel.
    pub fn shade(&self, source: &Frame, uv: Vec2, time: f32) -> Vec4 {
        let base = source.sample(uv);
        let rgb = match *self {
            ProgramParams::RetroCam {
                grain_amount,
                vignette_intensity,
                warmth,
            } => retro_cam(base.truncate(), uv, grain_amount, vignette_intensity, warmth),
            ProgramParams::Fuji {
                green_boost,
                red_contrast,
                shadow_color,
            } => fuji(base.truncate(), green_boost, red_contrast, shadow_color),
            ProgramParams::Glitch {
                intensity,
                block_intensity,
                rgb_shift_amount,
            } => glitch(source, uv, time, intensity, block_intensity, rgb_shift_amount),
            ProgramParams::Vhs {
                noise_amount,
                scanline_intensity,
                color_shift_amount,
            } => vhs(source, uv, time, noise_amount, scanline_intensity, color_shift_amount),
            ProgramParams::Duotone {
                dark,
                light,
                contrast,
            } => duotone(base.truncate(), dark, light, contrast),
        };
        rgb.clamp(Vec3::ZERO, Vec3::ONE).extend(base.w)
    }
}

/// A named dark/light pair for the duotone program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuotonePreset {
    pub name: &'static str,
    pub dark: [f32; 3],
    pub light: [f32; 3],
}

impl DuotonePreset {
    /// Duotone params using this pair and `contrast`.
    pub fn params(&self, contrast: f32) -> ProgramParams {
        ProgramParams::Duotone {
            dark: self.dark,
            light: self.light,
            contrast,
        }
    }
}

pub const DUOTONE_PRESETS: [DuotonePreset; 4] = [
    DuotonePreset {
        name: "purple-yellow",
        dark: [0.3, 0.15, 0.4],
        light: [0.9, 0.8, 0.3],
    },
    DuotonePreset {
        name: "blue-pink",
        dark: [0.1, 0.2, 0.4],
        light: [0.9, 0.3, 0.5],
    },
    DuotonePreset {
        name: "green-red",
        dark: [0.1, 0.3, 0.15],
        light: [0.9, 0.3, 0.2],
    },
    DuotonePreset {
        name: "cyan-orange",
        dark: [0.15, 0.4, 0.4],
        light: [0.9, 0.5, 0.15],
    },
];

/// Look up a duotone preset by name.
pub fn duotone_preset(name: &str) -> Option<&'static DuotonePreset> {
    DUOTONE_PRESETS.iter().find(|p| p.name == name)
}

fn retro_cam(mut c: Vec3, uv: Vec2, grain_amount: f32, vignette_intensity: f32, warmth: f32) -> Vec3 {
    let dist = uv.distance(Vec2::splat(0.5));
    let vignette = smoothstep(0.4, 1.4, dist);
    let grain = hash(uv * 12.0) * grain_amount;

    c.x += c.x * warmth * 0.1;
    c.y += c.y * warmth * 0.05;
    c.z -= c.z * warmth * 0.05;

    c = (c - Vec3::splat(0.5)) * 1.1 + Vec3::splat(0.5);
    c = mix(c, c * (1.0 - vignette * vignette_intensity), 0.8);
    c + Vec3::splat(grain)
}

fn fuji(mut c: Vec3, green_boost: f32, red_contrast: f32, shadow_color: f32) -> Vec3 {
    let luma = c.dot(LUMA_REC601);

    c.y += c.y * green_boost * 0.15;
    c.x = (c.x - 0.5) * (1.0 + red_contrast) + 0.5;
    c.z = lerp(c.z, c.z + 0.05, (1.0 - luma) * shadow_color);
    c.z = lerp(c.z, c.z - 0.05, luma * 0.5);

    c = (c - Vec3::splat(0.5)) * Vec3::new(1.15, 1.05, 1.1) + Vec3::splat(0.5);

    let gray = Vec3::splat(luma);
    let midtones = 1.0 - 2.0 * (luma - 0.5).abs();
    mix(c, mix(gray, c, 1.2), midtones)
}

fn glitch(
    source: &Frame,
    uv: Vec2,
    time: f32,
    intensity: f32,
    block_intensity: f32,
    rgb_shift_amount: f32,
) -> Vec3 {
    let block_noise =
        value_noise((uv * 8.0).floor() + Vec2::splat((time * 2.0).floor())) * block_intensity;
    let block_shift = Vec2::new(
        lerp(-0.05, 0.05, value_noise(Vec2::new(time * 4.0, uv.y * 2.0))),
        lerp(-0.05, 0.05, value_noise(Vec2::new(time * 4.0, uv.x * 2.0))),
    ) * block_noise
        * intensity;

    let line_noise = if value_noise(Vec2::new(time * 5.0, uv.y * 48.0)) >= 0.96 {
        1.0
    } else {
        0.0
    };
    let line_shift = Vec2::new(
        lerp(-0.1, 0.1, value_noise(Vec2::new(time * 5.0, uv.y))),
        0.0,
    ) * line_noise
        * intensity;

    let rgb_shift = rgb_shift_amount * intensity;
    let red_shift = value_noise(Vec2::new(time * 0.5, uv.y * 20.0)) * rgb_shift;
    let blue_shift = value_noise(Vec2::new(time * 0.5 + 0.2, uv.y * 20.0)) * rgb_shift;

    let at = uv + block_shift + line_shift;
    let c = split_channels(source, at, red_shift, blue_shift);

    let digital = value_noise(uv * 100.0 + Vec2::splat(time)) * 0.02 * intensity;
    c + Vec3::splat(digital)
}

fn vhs(
    source: &Frame,
    uv: Vec2,
    time: f32,
    noise_amount: f32,
    scanline_intensity: f32,
    color_shift_amount: f32,
) -> Vec3 {
    let distortion = (uv.y * 30.0 + time).sin() * 0.001;
    let at = Vec2::new(uv.x + distortion, uv.y);
    let mut c = split_channels(source, at, color_shift_amount, color_shift_amount);

    let noise = hash(uv * time) * noise_amount;
    let scanline = (uv.y * 120.0).sin() * 0.03 * scanline_intensity;
    c = c - Vec3::splat(scanline) + Vec3::splat(noise);

    let gray = Vec3::splat(c.dot(LUMA_REC601));
    c = mix(gray, c, 1.2);
    (c - Vec3::splat(0.5)) * 1.2 + Vec3::splat(0.5)
}

fn duotone(c: Vec3, dark: [f32; 3], light: [f32; 3], contrast: f32) -> Vec3 {
    let luma = ((c.dot(LUMA_REC601) - 0.5) * (1.0 + contrast) + 0.5).clamp(0.0, 1.0);
    mix(Vec3::from_array(dark), Vec3::from_array(light), luma)
}

/// Red sampled `red_shift` to the right, blue `blue_shift` to the left.
fn split_channels(source: &Frame, at: Vec2, red_shift: f32, blue_shift: f32) -> Vec3 {
    Vec3::new(
        source.sample(at + Vec2::new(red_shift, 0.0)).x,
        source.sample(at).y,
        source.sample(at - Vec2::new(blue_shift, 0.0)).z,
    )
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}
