//! Render plans, execution backends and the render surface.

pub mod cpu;
pub mod plan;
pub mod surface;

pub use cpu::CpuBackend;
pub use plan::{RenderPlan, Transform};
pub use surface::RenderSurface;

use crate::frame::Frame;

/// A failure inside a backend. The surface recovers by re-rendering on the
/// CPU, so callers never see it.
#[derive(Debug, thiserror::Error)]
#[error("{backend} backend failed: {source}")]
pub struct RenderError {
    pub backend: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl RenderError {
    pub fn new(
        backend: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            backend,
            source: source.into(),
        }
    }
}

/// Executes a [`RenderPlan`] over a source frame.
///
/// `target` is resized to the source's dimensions and fully overwritten.
pub trait RenderBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn render(&self, source: &Frame, plan: &RenderPlan, target: &mut Frame) -> Result<(), RenderError>;
}
