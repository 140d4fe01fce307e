//! What one render call does, decided before any pixel is touched.

use std::sync::Arc;

use crate::adjust::AdjustmentSet;
use crate::config::EngineConfig;
use crate::filter::{FilterSpec, TransformKind};
use crate::lut::Lut3D;
use crate::pipeline::{Look, TransformChain};
use crate::program::ProgramParams;

/// Everything the caller selects for a render.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub filter: FilterSpec,
    pub adjustments: AdjustmentSet,
    /// Blend of the filter look against its input, in [0, 1].
    pub intensity: f32,
    /// Overrides the filter's default program uniforms.
    pub program_params: Option<ProgramParams>,
    /// Seconds; drives grain jitter and animated programs.
    pub time: f32,
}

impl Transform {
    pub fn new(filter: FilterSpec) -> Self {
        Self {
            filter,
            adjustments: AdjustmentSet::default(),
            intensity: 1.0,
            program_params: None,
            time: 0.0,
        }
    }

    /// Like [`new`](Self::new) with the configured default intensity.
    pub fn with_config(filter: FilterSpec, config: &EngineConfig) -> Self {
        Self::new(filter).with_intensity(config.default_intensity)
    }

    pub fn with_adjustments(mut self, adjustments: AdjustmentSet) -> Self {
        self.adjustments = adjustments;
        self
    }

    /// Clamped to [0, 1].
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = if intensity.is_nan() {
            1.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_program_params(mut self, params: ProgramParams) -> Self {
        self.program_params = Some(params);
        self
    }

    pub fn at_time(mut self, time: f32) -> Self {
        self.time = time;
        self
    }
}

/// The resolved work for one render.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPlan {
    /// Copy the source.
    Passthrough,
    /// Run the per-pixel chain.
    Chain(TransformChain),
    /// Run a procedural program, blended against the source by `intensity`.
    Program {
        params: ProgramParams,
        time: f32,
        intensity: f32,
    },
}

impl RenderPlan {
    /// Build the plan for `transform`.
    ///
    /// `lut` is the decoded table for a LUT filter, or `None` when it is not
    /// available yet; the filter's fallback overlay takes its place.
    pub fn build(transform: &Transform, lut: Option<Arc<Lut3D>>) -> Self {
        let intensity = transform.intensity;
        let look = match &transform.filter.kind {
            TransformKind::None => None,
            TransformKind::LutAsset(_) => Some(match lut {
                Some(lut) => Look::Lut { lut, intensity },
                None => Look::Overlay {
                    color: transform.filter.fallback,
                    intensity,
                },
            }),
            TransformKind::ColorOverlay(color) => Some(Look::Overlay {
                color: *color,
                intensity,
            }),
            TransformKind::ShaderProgram(defaults) => {
                if intensity <= 0.0 {
                    return RenderPlan::Passthrough;
                }
                return RenderPlan::Program {
                    params: transform.program_params.unwrap_or(*defaults),
                    time: transform.time,
                    intensity,
                };
            }
        };

        let chain = TransformChain::build(&transform.adjustments, look, transform.time);
        if chain.is_identity() {
            RenderPlan::Passthrough
        } else {
            RenderPlan::Chain(chain)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RenderPlan::Passthrough => "passthrough",
            RenderPlan::Chain(_) => "chain",
            RenderPlan::Program { .. } => "program",
        }
    }
}
