//! Canonical 3D lookup table, sampling, and the asset decoders that build it.

pub mod cube;
pub mod error;
pub mod grid;

pub use cube::decode_cube;
pub use error::DecodeError;
pub use grid::{decode_flattened_grid, decode_png, encode_flattened_grid};

/// Default number of cells per side in a flattened-grid LUT image.
pub const DEFAULT_GRID_DIM: u32 = 8;

/// Largest cube resolution the decoders accept.
pub const MAX_LUT_SIZE: usize = 256;

/// A decoded 3D lookup table.
///
/// Entries are RGB triples addressed as `r + g·N + b·N²` (red fastest), the
/// same order `.cube` files use. Values are stored exactly as decoded and may
/// lie outside [0, 1]; clamping happens only when writing output pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3D {
    size: usize,
    table: Vec<[f32; 3]>,
}

impl Lut3D {
    /// Build a LUT from a red-fastest table.
    pub fn new(size: usize, table: Vec<[f32; 3]>) -> Result<Self, DecodeError> {
        if !(2..=MAX_LUT_SIZE).contains(&size) {
            return Err(DecodeError::InvalidSize(size.to_string()));
        }
        let expected = size * size * size;
        if table.len() != expected {
            return Err(DecodeError::Truncated {
                expected,
                found: table.len(),
            });
        }
        Ok(Self { size, table })
    }

    /// An identity LUT: every entry maps to its own normalized coordinate.
    ///
    /// `size` is clamped to `[2, MAX_LUT_SIZE]`.
    pub fn identity(size: usize) -> Self {
        let size = size.clamp(2, MAX_LUT_SIZE);
        let max = (size - 1) as f32;
        let mut table = Vec::with_capacity(size * size * size);
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    table.push([r as f32 / max, g as f32 / max, b as f32 / max]);
                }
            }
        }
        Self { size, table }
    }

    /// Grid resolution per axis.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All entries in red-fastest order.
    pub fn table(&self) -> &[[f32; 3]] {
        &self.table
    }

    /// Entry at integer grid coordinates.
    pub fn at(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.table[r + g * self.size + b * self.size * self.size]
    }

    /// Look up an RGB color.
    ///
    /// The blue axis picks the two nearest slices, each slice is sampled
    /// bilinearly at red/green, and the two results are blended by the
    /// fractional blue position. Exact at grid points. Inputs are clamped to
    /// [0, 1] for addressing only.
    pub fn sample(&self, rgb: [f32; 3]) -> [f32; 3] {
        let max = (self.size - 1) as f32;
        let r = rgb[0].clamp(0.0, 1.0) * max;
        let g = rgb[1].clamp(0.0, 1.0) * max;
        let b = rgb[2].clamp(0.0, 1.0) * max;

        let b0 = b.floor() as usize;
        let b1 = b.ceil() as usize;
        let fb = b - b0 as f32;

        let lo = self.sample_slice(b0, r, g);
        if b1 == b0 {
            return lo;
        }
        let hi = self.sample_slice(b1, r, g);
        lerp3(lo, hi, fb)
    }

    fn sample_slice(&self, b: usize, r: f32, g: f32) -> [f32; 3] {
        let last = self.size - 1;
        let r0 = r.floor() as usize;
        let g0 = g.floor() as usize;
        let r1 = (r0 + 1).min(last);
        let g1 = (g0 + 1).min(last);
        let fr = r - r0 as f32;
        let fg = g - g0 as f32;

        let c00 = self.at(r0, g0, b);
        let c10 = self.at(r1, g0, b);
        let c01 = self.at(r0, g1, b);
        let c11 = self.at(r1, g1, b);

        lerp3(lerp3(c00, c10, fr), lerp3(c01, c11, fr), fg)
    }

    /// Serialize as `.cube` text.
    pub fn to_cube_string(&self) -> String {
        let mut out = String::with_capacity(self.table.len() * 24 + 32);
        out.push_str("# Generated by lutra\n");
        out.push_str(&format!("LUT_3D_SIZE {}\n", self.size));
        for [r, g, b] in &self.table {
            out.push_str(&format!("{r:.6} {g:.6} {b:.6}\n"));
        }
        out
    }
}

fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}
