//! Lutra GPU — wgpu compute backend for the transform chain.
//!
//! This crate owns all GPU resources. It implements
//! [`lutra_core::RenderBackend`] so a [`lutra_core::RenderSurface`] can run
//! chains on the GPU; shader programs and passthrough plans are delegated to
//! the CPU backend.

pub mod backend;
pub mod buffers;
pub mod pipeline;
pub mod readback;
pub mod uniforms;

pub use backend::GpuBackend;
pub use uniforms::TransformUniforms;

use thiserror::Error;

/// Failures while creating or driving the GPU backend.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no suitable GPU adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),
    #[error("staging buffer map failed: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
    #[error("staging buffer map callback never ran")]
    MapCallbackDropped,
    #[error("{width}x{height} frame exceeds the device storage buffer limit of {limit} bytes")]
    FrameTooLarge { width: u32, height: u32, limit: u64 },
}

/// Device features the transform pipeline relies on.
///
/// Storage buffers and compute shaders are core wgpu, so nothing optional
/// is needed.
pub fn required_features() -> wgpu::Features {
    wgpu::Features::empty()
}
