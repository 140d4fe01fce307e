//! Row-parallel CPU backend.

use glam::Vec4;
use rayon::prelude::*;

use super::{RenderBackend, RenderError, RenderPlan};
use crate::frame::Frame;

/// Evaluates plans on the CPU with one rayon task per row.
///
/// Output is bit-identical between runs for equal inputs.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        Self
    }
}

impl RenderBackend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn render(&self, source: &Frame, plan: &RenderPlan, target: &mut Frame) -> Result<(), RenderError> {
        prepare_target(source, target);
        if source.pixels.is_empty() {
            return Ok(());
        }
        let width = source.width as usize;

        match plan {
            RenderPlan::Passthrough => target.pixels.copy_from_slice(&source.pixels),
            RenderPlan::Chain(chain) => {
                target
                    .pixels
                    .par_chunks_mut(width)
                    .zip(source.pixels.par_chunks(width))
                    .enumerate()
                    .for_each(|(y, (row_out, row_in))| {
                        for (x, (out, px)) in row_out.iter_mut().zip(row_in).enumerate() {
                            *out = chain.evaluate(*px, source.uv(x as u32, y as u32));
                        }
                    });
            }
            RenderPlan::Program {
                params,
                time,
                intensity,
            } => {
                target
                    .pixels
                    .par_chunks_mut(width)
                    .zip(source.pixels.par_chunks(width))
                    .enumerate()
                    .for_each(|(y, (row_out, row_in))| {
                        for (x, (out, px)) in row_out.iter_mut().zip(row_in).enumerate() {
                            let shaded = params.shade(source, source.uv(x as u32, y as u32), *time);
                            let base = Vec4::from_array(*px);
                            let rgb = base.truncate().lerp(shaded.truncate(), *intensity);
                            *out = rgb.extend(px[3]).to_array();
                        }
                    });
            }
        }
        Ok(())
    }
}

/// Resize `target` to the source's dimensions, reusing its allocation.
pub(crate) fn prepare_target(source: &Frame, target: &mut Frame) {
    target.width = source.width;
    target.height = source.height;
    target.source_bit_depth = source.source_bit_depth;
    target.pixels.resize(source.pixels.len(), [0.0; 4]);
}
