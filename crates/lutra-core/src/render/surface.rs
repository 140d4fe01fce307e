//! The render surface: preview and final renders over a shared backend.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

use tokio::runtime::Handle;

use super::{CpuBackend, RenderBackend, RenderPlan, Transform};
use crate::assets::{AssetResolver, LutState};
use crate::config::EngineConfig;
use crate::frame::Frame;
use crate::lut::Lut3D;

/// Owns the displayed frame and drives a [`RenderBackend`].
///
/// Preview renders never wait on asset decodes: a LUT that is not ready yet
/// is requested in the background and the filter's fallback overlay is drawn
/// until a later preview finds it in the cache. Final renders wait for the
/// LUT. The surface owns no clock; `time` comes from the [`Transform`].
pub struct RenderSurface {
    backend: Arc<dyn RenderBackend>,
    resolver: AssetResolver,
    config: EngineConfig,
    runtime: Option<Handle>,
    /// Paths already reported as unloadable for lack of a runtime.
    stalled: HashSet<String>,
    current: Option<Frame>,
}

impl std::fmt::Debug for RenderSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurface")
            .field("backend", &self.backend.name())
            .field("resolver", &self.resolver)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RenderSurface {
    /// Create a surface. Background decodes go to the tokio runtime current
    /// at construction, if any; see [`with_runtime`](Self::with_runtime).
    pub fn new(backend: Arc<dyn RenderBackend>, resolver: AssetResolver, config: EngineConfig) -> Self {
        Self {
            backend,
            resolver,
            config,
            runtime: Handle::try_current().ok(),
            stalled: HashSet::new(),
            current: None,
        }
    }

    /// A surface rendering on the CPU.
    pub fn cpu(resolver: AssetResolver, config: EngineConfig) -> Self {
        Self::new(Arc::new(CpuBackend), resolver, config)
    }

    /// Runtime used for LUT decodes, both background and awaited.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.resolver = self.resolver.clone().with_runtime(handle.clone());
        self.runtime = Some(handle);
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn resolver(&self) -> &AssetResolver {
        &self.resolver
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Render a preview of `source` and make it the displayed frame.
    ///
    /// Sources larger than `preview_max_dimension` are downscaled first.
    pub fn render_preview(&mut self, source: &Frame, transform: &Transform) -> &Frame {
        let max_dim = self.config.preview_max_dimension;
        let source: Cow<'_, Frame> = if max_dim > 0 && source.width.max(source.height) > max_dim {
            Cow::Owned(source.fit_within(max_dim))
        } else {
            Cow::Borrowed(source)
        };

        let lut = transform
            .filter
            .lut_path()
            .and_then(|path| self.preview_lut(path));
        let plan = RenderPlan::build(transform, lut);
        tracing::debug!(
            "preview {}x{} filter={} plan={}",
            source.width,
            source.height,
            transform.filter.id,
            plan.kind()
        );

        let mut target = self
            .current
            .take()
            .unwrap_or_else(|| Frame::filled(0, 0, [0.0; 4]));
        self.execute(&source, &plan, &mut target);
        self.current.insert(target)
    }

    /// Render `source` at full quality.
    ///
    /// Waits for the filter's LUT to resolve. `target_resolution` resamples
    /// the source first; `None` keeps its size. Two calls with equal inputs
    /// give identical frames.
    pub async fn render_final(
        &self,
        source: &Frame,
        transform: &Transform,
        target_resolution: Option<(u32, u32)>,
    ) -> Frame {
        let lut = match transform.filter.lut_path() {
            Some(path) => self.resolver.resolve(path).await,
            None => None,
        };

        let source: Cow<'_, Frame> = match target_resolution {
            Some((w, h)) if (w, h) != (source.width, source.height) => {
                Cow::Owned(source.resized(w, h))
            }
            _ => Cow::Borrowed(source),
        };

        let plan = RenderPlan::build(transform, lut);
        tracing::debug!(
            "final {}x{} filter={} plan={}",
            source.width,
            source.height,
            transform.filter.id,
            plan.kind()
        );

        let mut target = Frame::filled(source.width, source.height, [0.0; 4]);
        self.execute(&source, &plan, &mut target);
        target
    }

    /// Copy of the most recent preview, if any.
    pub fn capture_current_frame(&self) -> Option<Frame> {
        self.current.clone()
    }

    fn preview_lut(&mut self, path: &str) -> Option<Arc<Lut3D>> {
        match self.resolver.peek(path) {
            LutState::Ready(lut) => Some(lut),
            LutState::Pending | LutState::Unavailable => None,
            LutState::Absent => {
                match &self.runtime {
                    Some(handle) => {
                        self.resolver.prefetch(handle, path);
                    }
                    None => {
                        if self.stalled.insert(path.to_owned()) {
                            tracing::warn!("no async runtime to load {path}; showing fallback");
                        }
                    }
                }
                None
            }
        }
    }

    fn execute(&self, source: &Frame, plan: &RenderPlan, target: &mut Frame) {
        if let Err(err) = self.backend.render(source, plan, target) {
            tracing::error!("{err}; re-rendering on cpu");
            // The CPU backend cannot fail.
            let _ = CpuBackend.render(source, plan, target);
        }
    }
}
