#![allow(dead_code)]

use lutra_core::{Frame, Lut3D};

/// Horizontal red ramp, vertical green ramp, constant blue.
pub fn gradient(width: u32, height: u32) -> Frame {
    let mut frame = Frame::filled(width, height, [0.0, 0.0, 0.0, 1.0]);
    for y in 0..height {
        for x in 0..width {
            frame.pixels[(y * width + x) as usize] = [
                x as f32 / (width - 1).max(1) as f32,
                y as f32 / (height - 1).max(1) as f32,
                0.5,
                1.0,
            ];
        }
    }
    frame
}

/// A LUT that maps every color to its complement.
pub fn inverting_lut(size: usize) -> Lut3D {
    let table = Lut3D::identity(size)
        .table()
        .iter()
        .map(|[r, g, b]| [1.0 - r, 1.0 - g, 1.0 - b])
        .collect();
    Lut3D::new(size, table).expect("valid table")
}

pub fn max_rgb_diff(a: &Frame, b: &Frame) -> f32 {
    assert_eq!((a.width, a.height), (b.width, b.height));
    a.pixels
        .iter()
        .zip(&b.pixels)
        .flat_map(|(p, q)| (0..3).map(move |c| (p[c] - q[c]).abs()))
        .fold(0.0, f32::max)
}
