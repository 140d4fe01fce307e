//! GPU-to-CPU frame download.

use std::sync::mpsc;

use lutra_core::{BitDepth, Frame};

use crate::GpuError;
use crate::buffers::GpuImageHandle;

/// Download a GPU frame buffer into a [`Frame`]. Blocks until complete.
///
/// `staging_cache` holds a `MAP_READ` buffer reused across calls; it is
/// replaced when too small for `handle`.
pub fn download_frame(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    handle: &GpuImageHandle,
    staging_cache: &mut Option<wgpu::Buffer>,
) -> Result<Frame, GpuError> {
    let size = handle.byte_size();
    if staging_cache.as_ref().is_none_or(|buf| buf.size() < size) {
        *staging_cache = None;
    }
    let staging = staging_cache.get_or_insert_with(|| {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lutra_frame_staging"),
            size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        })
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("lutra_frame_download_encoder"),
    });
    encoder.copy_buffer_to_buffer(&handle.buffer, 0, staging, 0, size);
    queue.submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..size);
    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device.poll(wgpu::PollType::wait_indefinitely())?;
    rx.recv().map_err(|_| GpuError::MapCallbackDropped)??;

    let data = slice.get_mapped_range();
    let pixels: Vec<[f32; 4]> = bytemuck::cast_slice(&data).to_vec();
    drop(data);
    staging.unmap();

    Ok(Frame {
        width: handle.width,
        height: handle.height,
        pixels,
        source_bit_depth: BitDepth::F32,
    })
}
