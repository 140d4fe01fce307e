//! [`RenderBackend`] implementation on top of the transform pipeline.

use std::sync::Arc;

use lutra_core::{CpuBackend, Frame, Lut3D, RenderBackend, RenderError, RenderPlan, TransformChain};
use parking_lot::Mutex;

use crate::GpuError;
use crate::buffers::{self, GpuImageHandle, GpuLutHandle};
use crate::pipeline::TransformPipeline;
use crate::readback;
use crate::uniforms::TransformUniforms;

/// Runs [`RenderPlan::Chain`] plans as a single compute dispatch.
///
/// Passthrough and shader-program plans go to an embedded [`CpuBackend`].
/// The last uploaded LUT stays resident until a different one is bound.
pub struct GpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pipeline: TransformPipeline,
    placeholder_lut: Arc<GpuLutHandle>,
    bound_lut: Mutex<Option<(Arc<Lut3D>, Arc<GpuLutHandle>)>>,
    staging: Mutex<Option<wgpu::Buffer>>,
    cpu: CpuBackend,
}

impl GpuBackend {
    /// Build the backend on an existing device and queue.
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        let pipeline = TransformPipeline::new(&device);
        let placeholder_lut = Arc::new(GpuLutHandle::placeholder(&device));
        Self {
            device,
            queue,
            pipeline,
            placeholder_lut,
            bound_lut: Mutex::new(None),
            staging: Mutex::new(None),
            cpu: CpuBackend::new(),
        }
    }

    /// Request an adapter and device, blocking the calling thread.
    pub fn create_blocking() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            ..Default::default()
        }))?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("lutra_device"),
            required_features: crate::required_features(),
            required_limits: adapter.limits(),
            ..Default::default()
        }))?;

        let info = adapter.get_info();
        tracing::info!("GPU backend on {} ({:?})", info.name, info.backend);
        Ok(Self::new(Arc::new(device), Arc::new(queue)))
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    /// Evaluate `chain` over `source` on the GPU.
    pub fn render_chain(&self, source: &Frame, chain: &TransformChain) -> Result<Frame, GpuError> {
        let limit = self.device.limits().max_storage_buffer_binding_size as u64;
        if buffers::byte_size(source.width, source.height) > limit {
            return Err(GpuError::FrameTooLarge {
                width: source.width,
                height: source.height,
                limit,
            });
        }

        let lut = match chain.lut() {
            Some(lut) => self.lut_handle(lut),
            None => self.placeholder_lut.clone(),
        };
        let uniforms = TransformUniforms::from_chain(chain, source.width, source.height);

        let input = GpuImageHandle::upload(&self.device, source);
        let output = GpuImageHandle::create_output(&self.device, source.width, source.height);

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("lutra_transform_encoder"),
        });
        self.pipeline
            .dispatch(&self.device, &uniforms, &input, &output, &lut, &mut encoder);
        self.queue.submit(std::iter::once(encoder.finish()));

        let mut staging = self.staging.lock();
        let mut frame = readback::download_frame(&self.device, &self.queue, &output, &mut staging)?;
        frame.source_bit_depth = source.source_bit_depth;
        Ok(frame)
    }

    /// GPU copy of `lut`, re-uploaded only when a different table is bound.
    fn lut_handle(&self, lut: &Arc<Lut3D>) -> Arc<GpuLutHandle> {
        let mut bound = self.bound_lut.lock();
        if let Some((cached, handle)) = bound.as_ref() {
            if Arc::ptr_eq(cached, lut) {
                return handle.clone();
            }
        }
        tracing::debug!("uploading size-{} LUT to the GPU", lut.size());
        let handle = Arc::new(GpuLutHandle::upload(&self.device, lut));
        *bound = Some((lut.clone(), handle.clone()));
        handle
    }
}

impl RenderBackend for GpuBackend {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn render(&self, source: &Frame, plan: &RenderPlan, target: &mut Frame) -> Result<(), RenderError> {
        match plan {
            RenderPlan::Chain(chain) if !source.pixels.is_empty() => {
                *target = self
                    .render_chain(source, chain)
                    .map_err(|err| RenderError::new("gpu", err))?;
                Ok(())
            }
            _ => self.cpu.render(source, plan, target),
        }
    }
}
