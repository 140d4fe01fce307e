//! `.cube` ASCII LUT decoding.
//!
//! ```text
//! # comment
//! TITLE "Warm"
//! LUT_3D_SIZE 2
//! 0.0 0.0 0.0
//! 1.0 0.0 0.0
//! ...
//! ```
//!
//! Data rows are red-fastest: row index = `r + g·N + b·N²`. `DOMAIN_MIN`,
//! `DOMAIN_MAX`, `TITLE`, and any other directive are ignored; the domain is
//! always [0, 1].

use super::{DecodeError, Lut3D, MAX_LUT_SIZE};

/// Decode a `.cube` file into a [`Lut3D`].
///
/// Lines that do not start with three parseable numbers are skipped wherever
/// they appear, so stray blank lines or comments inside the data section are
/// tolerated. The decode still fails if fewer than `N³` rows remain.
pub fn decode_cube(bytes: &[u8]) -> Result<Lut3D, DecodeError> {
    let text = String::from_utf8_lossy(bytes);
    let mut size: Option<usize> = None;
    let mut table: Vec<[f32; 3]> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix("LUT_3D_SIZE") {
            let n = parse_size(rest)?;
            size = Some(n);
            table.reserve(n * n * n);
            continue;
        }

        let Some(rgb) = parse_row(line) else {
            continue;
        };

        // Rows before the header carry no meaning.
        let Some(n) = size else {
            continue;
        };
        if table.len() == n * n * n {
            continue;
        }
        if rgb.iter().any(|v| !v.is_finite()) {
            return Err(DecodeError::MalformedRow { line: idx + 1 });
        }
        table.push(rgb);
    }

    let size = size.ok_or(DecodeError::MissingHeader)?;
    let expected = size * size * size;
    if table.len() < expected {
        return Err(DecodeError::Truncated {
            expected,
            found: table.len(),
        });
    }

    tracing::debug!("decoded .cube LUT: size {size}");
    Lut3D::new(size, table)
}

fn parse_size(rest: &str) -> Result<usize, DecodeError> {
    let token = rest.split_whitespace().next().unwrap_or("");
    let n: usize = token
        .parse()
        .map_err(|_| DecodeError::InvalidSize(token.to_string()))?;
    if !(2..=MAX_LUT_SIZE).contains(&n) {
        return Err(DecodeError::InvalidSize(token.to_string()));
    }
    Ok(n)
}

/// First three whitespace-separated tokens as floats, if they all parse.
fn parse_row(line: &str) -> Option<[f32; 3]> {
    let mut it = line.split_whitespace().map(|t| t.parse::<f32>());
    let r = it.next()?.ok()?;
    let g = it.next()?.ok()?;
    let b = it.next()?.ok()?;
    Some([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORNERS: &str = "\
# two-point cube
TITLE \"corners\"
LUT_3D_SIZE 2
DOMAIN_MIN 0.0 0.0 0.0
DOMAIN_MAX 1.0 1.0 1.0
0 0 0
1 0 0
0 1 0
1 1 0
0 0 1
1 0 1
0 1 1
1 1 1
";

    #[test]
    fn test_decode_corners_red_fastest() {
        let lut = decode_cube(CORNERS.as_bytes()).unwrap();
        assert_eq!(lut.size(), 2);
        assert_eq!(lut.at(1, 0, 0), [1.0, 0.0, 0.0]);
        assert_eq!(lut.at(0, 1, 0), [0.0, 1.0, 0.0]);
        assert_eq!(lut.at(0, 0, 1), [0.0, 0.0, 1.0]);
        assert_eq!(lut.at(1, 1, 1), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_missing_header() {
        let err = decode_cube(b"0 0 0\n1 1 1\n").unwrap_err();
        assert!(matches!(err, DecodeError::MissingHeader));
    }

    #[test]
    fn test_truncated_rejected() {
        let mut text = String::from("LUT_3D_SIZE 4\n");
        for i in 0..10 {
            text.push_str(&format!("{} 0 0\n", i as f32 / 10.0));
        }
        let err = decode_cube(text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Truncated {
                expected: 64,
                found: 10
            }
        ));
    }

    #[test]
    fn test_interleaved_junk_lines_are_skipped() {
        let text = "\
LUT_3D_SIZE 2
0 0 0
# mid-data comment
1 0 0

0 1
0 1 0
1 1 0
garbage here
0 0 1
1 0 1
0 1 1
1 1 1
";
        let lut = decode_cube(text.as_bytes()).unwrap();
        assert_eq!(lut.at(0, 1, 0), [0.0, 1.0, 0.0]);
        assert_eq!(lut.at(1, 1, 1), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_values_are_not_clamped() {
        let text = "LUT_3D_SIZE 2\n-0.25 0 0\n1 0 0\n0 1 0\n1 1 0\n0 0 1\n1 0 1\n0 1 1\n1.75 1 1\n";
        let lut = decode_cube(text.as_bytes()).unwrap();
        assert_eq!(lut.at(0, 0, 0)[0], -0.25);
        assert_eq!(lut.at(1, 1, 1)[0], 1.75);
    }

    #[test]
    fn test_non_finite_row_is_malformed() {
        let text = "LUT_3D_SIZE 2\n0 0 0\nnan 0 0\n";
        let err = decode_cube(text.as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedRow { line: 3 }));
    }

    #[test]
    fn test_invalid_size_directive() {
        assert!(matches!(
            decode_cube(b"LUT_3D_SIZE banana\n"),
            Err(DecodeError::InvalidSize(_))
        ));
        assert!(matches!(
            decode_cube(b"LUT_3D_SIZE 1\n0 0 0\n"),
            Err(DecodeError::InvalidSize(_))
        ));
    }

    #[test]
    fn test_cube_string_roundtrip() {
        let lut = Lut3D::identity(3);
        let decoded = decode_cube(lut.to_cube_string().as_bytes()).unwrap();
        assert_eq!(decoded.size(), 3);
        for (a, b) in lut.table().iter().zip(decoded.table()) {
            for c in 0..3 {
                assert!((a[c] - b[c]).abs() < 1e-5);
            }
        }
    }
}
