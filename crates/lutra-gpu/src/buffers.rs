//! GPU buffer management for frames and LUT tables.

use lutra_core::{Frame, Lut3D};
use wgpu::util::DeviceExt;

/// Bytes per pixel in a frame buffer (`vec4<f32>`).
pub const PIXEL_BYTES: u64 = 16;

/// Handle to a frame stored as a storage buffer of `vec4<f32>`.
pub struct GpuImageHandle {
    pub buffer: wgpu::Buffer,
    pub width: u32,
    pub height: u32,
}

impl GpuImageHandle {
    /// Upload a [`Frame`] as a read-only storage buffer.
    pub fn upload(device: &wgpu::Device, frame: &Frame) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lutra_frame_upload"),
            contents: bytemuck::cast_slice(&frame.pixels),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            width: frame.width,
            height: frame.height,
        }
    }

    /// Create an uninitialized output buffer the shader writes into.
    pub fn create_output(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lutra_frame_output"),
            size: byte_size(width, height),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            width,
            height,
        }
    }

    /// Buffer size in bytes.
    pub fn byte_size(&self) -> u64 {
        byte_size(self.width, self.height)
    }
}

/// Bytes needed for a `width`×`height` frame buffer.
pub fn byte_size(width: u32, height: u32) -> u64 {
    (width as u64) * (height as u64) * PIXEL_BYTES
}

/// Handle to a LUT table on the GPU.
///
/// Stored as a flat storage buffer of `vec4<f32>` (RGB plus padding) in the
/// same red-fastest order as [`Lut3D::table`], so the shader reproduces the
/// CPU's interpolation exactly rather than relying on texture filtering.
pub struct GpuLutHandle {
    pub buffer: wgpu::Buffer,
    pub size: u32,
}

impl GpuLutHandle {
    /// Upload a decoded LUT.
    pub fn upload(device: &wgpu::Device, lut: &Lut3D) -> Self {
        let padded: Vec<[f32; 4]> = lut.table().iter().map(|&[r, g, b]| [r, g, b, 1.0]).collect();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lutra_lut_table"),
            contents: bytemuck::cast_slice(&padded),
            usage: wgpu::BufferUsages::STORAGE,
        });
        Self {
            buffer,
            size: lut.size() as u32,
        }
    }

    /// A size-2 identity table bound whenever the chain has no LUT.
    pub fn placeholder(device: &wgpu::Device) -> Self {
        Self::upload(device, &Lut3D::identity(2))
    }
}
