//! Compute pipeline for the per-pixel transform chain.

use std::num::NonZeroU64;

use wgpu::util::DeviceExt;

use crate::buffers::{GpuImageHandle, GpuLutHandle};
use crate::uniforms::TransformUniforms;

/// Workgroup edge length in `transform.wgsl`.
const WORKGROUP_SIZE: u32 = 8;

/// Manages the `transform.wgsl` compute pipeline.
pub struct TransformPipeline {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl TransformPipeline {
    /// Compile `transform.wgsl` and build the pipeline.
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lutra_transform_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/transform.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lutra_transform_layout"),
            entries: &[
                // binding 0: source pixels
                storage_entry(0, true),
                // binding 1: output pixels
                storage_entry(1, false),
                // binding 2: chain uniforms
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<TransformUniforms>() as u64,
                        ),
                    },
                    count: None,
                },
                // binding 3: LUT table
                storage_entry(3, true),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lutra_transform_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("lutra_transform_pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("apply_transform"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
        }
    }

    /// Record one transform dispatch from `source` into `output`.
    ///
    /// The caller is responsible for submitting the encoder.
    pub fn dispatch(
        &self,
        device: &wgpu::Device,
        uniforms: &TransformUniforms,
        source: &GpuImageHandle,
        output: &GpuImageHandle,
        lut: &GpuLutHandle,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lutra_transform_uniforms"),
            contents: bytemuck::bytes_of(uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lutra_transform_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: source.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: output.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: lut.buffer.as_entire_binding(),
                },
            ],
        });

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("lutra_transform_pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(
            source.width.div_ceil(WORKGROUP_SIZE),
            source.height.div_ceil(WORKGROUP_SIZE),
            1,
        );
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}
