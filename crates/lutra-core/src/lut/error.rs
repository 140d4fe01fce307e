//! LUT decode errors.

use thiserror::Error;

/// Failures while turning a LUT asset into a [`Lut3D`](super::Lut3D).
///
/// These never reach the render path: asset resolution converts them into a
/// fallback overlay.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No `LUT_3D_SIZE` directive before the end of the file.
    #[error("missing LUT_3D_SIZE header")]
    MissingHeader,

    /// The size directive is not an integer in the supported range.
    #[error("invalid LUT size: {0}")]
    InvalidSize(String),

    /// Fewer data rows than `size³`.
    #[error("truncated LUT: expected {expected} entries, found {found}")]
    Truncated {
        /// Entries required by the header.
        expected: usize,
        /// Valid entries actually present.
        found: usize,
    },

    /// A data row parsed as three numbers but holds a non-finite value.
    #[error("malformed data row at line {line}")]
    MalformedRow {
        /// 1-based line number in the source text.
        line: usize,
    },

    /// A flattened-grid image whose dimensions cannot hold a square grid.
    #[error("{width}x{height} image is not a {grid_dim}x{grid_dim} grid of square cells")]
    GridDimensions {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
        /// Cells per side the decoder expected.
        grid_dim: u32,
    },

    /// The image container itself could not be decoded.
    #[error("failed to decode LUT image: {0}")]
    Image(#[from] ::image::ImageError),
}
