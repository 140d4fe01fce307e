//! Frame representation shared by the preview and export paths.

use std::fmt;

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// Bit depth of the buffer a frame was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitDepth {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit floating point.
    F32,
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8 => write!(f, "8-bit"),
            Self::U16 => write!(f, "16-bit"),
            Self::F32 => write!(f, "32-bit float"),
        }
    }
}

/// A 2D grid of normalized RGBA pixels.
///
/// Used both as the source image (camera frame or gallery import) and as the
/// CPU render target. Conversion to and from 8-bit happens only through
/// [`Frame::from_rgba8`] and [`Frame::to_rgba8`].
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA pixels, each channel nominally in [0, 1].
    pub pixels: Vec<[f32; 4]>,
    /// Bit depth of the buffer this frame was decoded from.
    pub source_bit_depth: BitDepth,
}

impl Frame {
    /// A frame filled with one color.
    pub fn filled(width: u32, height: u32, rgba: [f32; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![rgba; (width as usize) * (height as usize)],
            source_bit_depth: BitDepth::F32,
        }
    }

    /// Build a frame from tightly packed 8-bit RGBA bytes.
    ///
    /// Returns `None` when `bytes` does not hold exactly `width * height`
    /// pixels.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| {
                [
                    p[0] as f32 / 255.0,
                    p[1] as f32 / 255.0,
                    p[2] as f32 / 255.0,
                    p[3] as f32 / 255.0,
                ]
            })
            .collect();
        Some(Self {
            width,
            height,
            pixels,
            source_bit_depth: BitDepth::U8,
        })
    }

    /// Convert a decoded image into a frame.
    pub fn from_dynamic(img: &::image::DynamicImage) -> Self {
        let bit_depth = match img.color() {
            ::image::ColorType::Rgb16
            | ::image::ColorType::Rgba16
            | ::image::ColorType::L16
            | ::image::ColorType::La16 => BitDepth::U16,
            ::image::ColorType::Rgb32F | ::image::ColorType::Rgba32F => BitDepth::F32,
            _ => BitDepth::U8,
        };
        let rgba = img.to_rgba32f();
        let (width, height) = rgba.dimensions();
        let pixels = rgba.pixels().map(|p| p.0).collect();
        Self {
            width,
            height,
            pixels,
            source_bit_depth: bit_depth,
        }
    }

    /// Quantize to 8-bit RGBA, clamping each channel.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            for c in px {
                out.push((c.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
        }
        out
    }

    /// Pixel count.
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Whether `other` has the same dimensions.
    pub fn same_size(&self, other: &Frame) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Normalized position of the center of pixel `(x, y)`.
    pub fn uv(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) / self.width as f32,
            (y as f32 + 0.5) / self.height as f32,
        )
    }

    /// Bilinear sample at a normalized coordinate, clamped to the edges.
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        if self.pixels.is_empty() {
            return Vec4::ZERO;
        }
        let x = (uv.x * self.width as f32 - 0.5).clamp(0.0, (self.width - 1) as f32);
        let y = (uv.y * self.height as f32 - 0.5).clamp(0.0, (self.height - 1) as f32);
        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let top = self.texel(x0, y0).lerp(self.texel(x1, y0), fx);
        let bottom = self.texel(x0, y1).lerp(self.texel(x1, y1), fx);
        top.lerp(bottom, fy)
    }

    fn texel(&self, x: u32, y: u32) -> Vec4 {
        Vec4::from_array(self.pixels[(y * self.width + x) as usize])
    }

    /// Resample to `width × height` with a triangle filter.
    ///
    /// Returns a clone when the size already matches.
    pub fn resized(&self, width: u32, height: u32) -> Frame {
        if self.width == width && self.height == height {
            return self.clone();
        }
        let flat: Vec<f32> = self.pixels.iter().flatten().copied().collect();
        let Some(buffer) = ::image::Rgba32FImage::from_raw(self.width, self.height, flat) else {
            return Frame::filled(width, height, [0.0, 0.0, 0.0, 0.0]);
        };
        let out = ::image::imageops::resize(
            &buffer,
            width.max(1),
            height.max(1),
            ::image::imageops::FilterType::Triangle,
        );
        Frame {
            width: out.width(),
            height: out.height(),
            pixels: out.pixels().map(|p| p.0).collect(),
            source_bit_depth: self.source_bit_depth,
        }
    }

    /// Downscale so the longest side is at most `max_dimension`.
    pub fn fit_within(&self, max_dimension: u32) -> Frame {
        let longest = self.width.max(self.height);
        if max_dimension == 0 || longest <= max_dimension {
            return self.clone();
        }
        let scale = max_dimension as f32 / longest as f32;
        let width = ((self.width as f32 * scale).round() as u32).max(1);
        let height = ((self.height as f32 * scale).round() as u32).max(1);
        self.resized(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba8_roundtrip_is_exact() {
        let bytes: Vec<u8> = (0..=255u8).flat_map(|v| [v, 255 - v, v / 2, 255]).collect();
        let frame = Frame::from_rgba8(16, 16, &bytes).expect("valid buffer");
        assert_eq!(frame.source_bit_depth, BitDepth::U8);
        assert_eq!(frame.to_rgba8(), bytes);
    }

    #[test]
    fn test_from_rgba8_rejects_wrong_length() {
        assert!(Frame::from_rgba8(2, 2, &[0u8; 15]).is_none());
    }

    #[test]
    fn test_sample_at_pixel_center_returns_texel() {
        let mut frame = Frame::filled(4, 4, [0.0, 0.0, 0.0, 1.0]);
        frame.pixels[5] = [1.0, 0.5, 0.25, 1.0];
        let s = frame.sample(frame.uv(1, 1));
        assert!((s.x - 1.0).abs() < 1e-6);
        assert!((s.y - 0.5).abs() < 1e-6);
        assert!((s.z - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_sample_clamps_outside_edges() {
        let frame = Frame::filled(3, 2, [0.2, 0.4, 0.6, 1.0]);
        let s = frame.sample(Vec2::new(-4.0, 9.0));
        assert!((s.x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        let frame = Frame::filled(400, 200, [0.5; 4]);
        let small = frame.fit_within(100);
        assert_eq!((small.width, small.height), (100, 50));
        assert_eq!(frame.fit_within(1000).width, 400);
    }
}
