//! Flattened-grid LUT images.
//!
//! A 3D LUT stored as one square image tiled into `grid_dim × grid_dim` cells.
//! Cell `(gx, gy)` holds blue slice `gy·grid_dim + gx`; inside a cell, x maps
//! to red and y maps to green, each linearly over `[0, cell - 1] → [0, 1]`.
//! A 512×512 image with an 8×8 grid therefore carries a 64³ cube.

use ::image::{DynamicImage, Rgba, RgbaImage};

use super::{DecodeError, Lut3D, MAX_LUT_SIZE};

/// Decode PNG bytes holding a flattened-grid LUT.
pub fn decode_png(bytes: &[u8], grid_dim: u32) -> Result<Lut3D, DecodeError> {
    let img = ::image::load_from_memory_with_format(bytes, ::image::ImageFormat::Png)?;
    decode_flattened_grid(&img, grid_dim)
}

/// Rebuild a cube from a flattened-grid image.
///
/// The output size equals the cell size. Every cube coordinate is mapped to
/// its pixel in the grid and that pixel's RGB is copied; alpha is ignored.
pub fn decode_flattened_grid(img: &DynamicImage, grid_dim: u32) -> Result<Lut3D, DecodeError> {
    let (width, height) = (img.width(), img.height());
    let bad_dims = DecodeError::GridDimensions {
        width,
        height,
        grid_dim,
    };
    if grid_dim == 0 || width != height || width % grid_dim != 0 {
        return Err(bad_dims);
    }
    let cell = width / grid_dim;
    let size = cell as usize;
    if !(2..=MAX_LUT_SIZE).contains(&size) {
        return Err(bad_dims);
    }

    let rgba = img.to_rgba32f();
    let slices = grid_dim * grid_dim;
    let max = (size - 1) as f32;

    let mut table = Vec::with_capacity(size * size * size);
    for b in 0..size {
        let slice = ((b as f32 / max) * (slices - 1) as f32).round() as u32;
        let cell_x = (slice % grid_dim) * cell;
        let cell_y = (slice / grid_dim) * cell;
        for g in 0..cell {
            for r in 0..cell {
                let px = rgba.get_pixel(cell_x + r, cell_y + g).0;
                table.push([px[0], px[1], px[2]]);
            }
        }
    }

    tracing::debug!("decoded flattened-grid LUT: {width}x{height}, size {size}");
    Lut3D::new(size, table)
}

/// Tile a cube into an 8-bit flattened-grid image with `cell = lut.size()`.
///
/// Each cell pixel takes the nearest cube entry for its normalized slice
/// position, so cubes with fewer than `grid_dim²` blue slices repeat slices.
pub fn encode_flattened_grid(lut: &Lut3D, grid_dim: u32) -> RgbaImage {
    let grid_dim = grid_dim.max(1);
    let cell = lut.size() as u32;
    let side = cell * grid_dim;
    let slices = grid_dim * grid_dim;
    let max = (lut.size() - 1) as f32;

    let mut img = RgbaImage::new(side, side);
    for slice in 0..slices {
        let b_norm = if slices > 1 {
            slice as f32 / (slices - 1) as f32
        } else {
            0.0
        };
        let b = (b_norm * max).round() as usize;
        let cell_x = (slice % grid_dim) * cell;
        let cell_y = (slice / grid_dim) * cell;
        for g in 0..cell {
            for r in 0..cell {
                let [cr, cg, cb] = lut.at(r as usize, g as usize, b);
                img.put_pixel(
                    cell_x + r,
                    cell_y + g,
                    Rgba([quantize(cr), quantize(cg), quantize(cb), 255]),
                );
            }
        }
    }
    img
}

fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
