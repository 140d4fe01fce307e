//! The ordered transform chain evaluated on every pixel of one render.

use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::adjust::{Adjustment, AdjustmentSet};
use crate::color::OverlayColor;
use crate::lut::Lut3D;
use crate::pipeline::{noise, stages};

/// The filter look slotted between the tone stages and grain.
#[derive(Debug, Clone, PartialEq)]
pub enum Look {
    /// Sample a decoded LUT, blended by `intensity`.
    Lut {
        /// The bound table.
        lut: Arc<Lut3D>,
        /// Blend weight in [0, 1].
        intensity: f32,
    },
    /// Flat multiplicative tint, used for overlay filters and as the
    /// fallback while a LUT is unavailable.
    Overlay {
        /// Tint and opacity.
        color: OverlayColor,
        /// Extra blend weight in [0, 1].
        intensity: f32,
    },
}

/// One pipeline stage with its raw parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Exposure(f32),
    Brightness(f32),
    Contrast(f32),
    Saturation(f32),
    Temperature(f32),
    Tint(f32),
    Fade(f32),
    Highlights(f32),
    Shadows(f32),
    ShadowsTint(f32),
    Blacks(f32),
    Whites(f32),
    Look(Look),
    Grain {
        /// Grain adjustment, 0–100.
        value: f32,
        /// Offset added to uv before hashing.
        jitter: Vec2,
    },
    Vignette(f32),
}

impl Stage {
    fn apply(&self, c: Vec3, uv: Vec2) -> Vec3 {
        match self {
            Stage::Exposure(v) => stages::exposure(c, *v),
            Stage::Brightness(v) => stages::brightness(c, *v),
            Stage::Contrast(v) => stages::contrast(c, *v),
            Stage::Saturation(v) => stages::saturation(c, *v),
            Stage::Temperature(v) => stages::temperature(c, *v),
            Stage::Tint(v) => stages::tint(c, *v),
            Stage::Fade(v) => stages::fade(c, *v),
            Stage::Highlights(v) => stages::highlights(c, *v),
            Stage::Shadows(v) => stages::shadows(c, *v),
            Stage::ShadowsTint(v) => stages::shadows_tint(c, *v),
            Stage::Blacks(v) => stages::blacks(c, *v),
            Stage::Whites(v) => stages::whites(c, *v),
            Stage::Look(Look::Lut { lut, intensity }) => stages::lut_sample(c, lut, *intensity),
            Stage::Look(Look::Overlay { color, intensity }) => {
                stages::overlay(c, color, *intensity)
            }
            Stage::Grain { value, jitter } => stages::grain(c, *value, uv, *jitter),
            Stage::Vignette(v) => stages::vignette(c, *v, uv),
        }
    }
}

/// Immutable, ordered list of stages for one render call.
///
/// Built fresh per render from an [`AdjustmentSet`] and an optional
/// [`Look`]. Stages at their neutral value are left out, so the chain for
/// default adjustments and no look is empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformChain {
    stages: Vec<Stage>,
}

impl TransformChain {
    /// Assemble the chain in its fixed order.
    ///
    /// `time` seeds the grain jitter; the same value always reproduces the
    /// same grain pattern.
    pub fn build(adjustments: &AdjustmentSet, look: Option<Look>, time: f32) -> Self {
        use Adjustment as A;

        let mut chain = Vec::with_capacity(15);
        let tone: [(A, fn(f32) -> Stage); 12] = [
            (A::Exposure, Stage::Exposure),
            (A::Brightness, Stage::Brightness),
            (A::Contrast, Stage::Contrast),
            (A::Saturation, Stage::Saturation),
            (A::Temperature, Stage::Temperature),
            (A::Tint, Stage::Tint),
            (A::Fade, Stage::Fade),
            (A::Highlights, Stage::Highlights),
            (A::Shadows, Stage::Shadows),
            (A::ShadowsTint, Stage::ShadowsTint),
            (A::Blacks, Stage::Blacks),
            (A::Whites, Stage::Whites),
        ];
        for (adj, stage) in tone {
            let value = adjustments.get(adj);
            if value != adj.default_value() {
                chain.push(stage(value));
            }
        }

        match look {
            Some(Look::Overlay { color, .. }) if color.is_transparent() => {}
            Some(look) => chain.push(Stage::Look(look)),
            None => {}
        }

        let grain = adjustments.get(A::Grain);
        if grain > 0.0 {
            chain.push(Stage::Grain {
                value: grain,
                jitter: noise::frame_jitter(time),
            });
        }
        let vignette = adjustments.get(A::Vignette);
        if vignette > 0.0 {
            chain.push(Stage::Vignette(vignette));
        }

        Self { stages: chain }
    }

    /// Stages in evaluation order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// True when evaluation would only clamp.
    pub fn is_identity(&self) -> bool {
        self.stages.is_empty()
    }

    /// The bound LUT, if the look is a LUT sample.
    pub fn lut(&self) -> Option<&Arc<Lut3D>> {
        self.stages.iter().find_map(|s| match s {
            Stage::Look(Look::Lut { lut, .. }) => Some(lut),
            _ => None,
        })
    }

    /// Transform one pixel. `uv` is the pixel's normalized position.
    ///
    /// RGB is clamped to [0, 1] at the end; alpha passes through.
    pub fn evaluate(&self, rgba: [f32; 4], uv: Vec2) -> [f32; 4] {
        let mut c = Vec3::new(rgba[0], rgba[1], rgba[2]);
        for stage in &self.stages {
            c = stage.apply(c, uv);
        }
        let c = c.clamp(Vec3::ZERO, Vec3::ONE);
        [c.x, c.y, c.z, rgba[3]]
    }
}
