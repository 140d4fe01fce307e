//! Flat color overlays and their CSS-style notation.

use serde::{Deserialize, Serialize};

/// A multiplicative color tint blended in by `opacity`.
///
/// Applied as `mix(rgb, tint · rgb, opacity)`. Every filter carries one as
/// its preview / fallback look.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayColor {
    /// Tint color, normalized.
    pub rgb: [f32; 3],
    /// Blend weight in [0, 1].
    pub opacity: f32,
}

impl OverlayColor {
    /// A fully transparent overlay (no visible effect).
    pub const TRANSPARENT: OverlayColor = OverlayColor {
        rgb: [1.0, 1.0, 1.0],
        opacity: 0.0,
    };

    /// Build from 8-bit channels and an opacity.
    pub const fn rgba8(r: u8, g: u8, b: u8, opacity: f32) -> Self {
        Self {
            rgb: [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0],
            opacity,
        }
    }

    /// Whether the overlay changes nothing.
    pub fn is_transparent(&self) -> bool {
        self.opacity <= 0.0
    }

    /// Parse `transparent`, `rgba(r, g, b, a)`, `rgb(r, g, b)`, `#rgb` or
    /// `#rrggbb`. Channels in the functional forms are 0–255, alpha 0–1.
    pub fn parse_css(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Some(Self::TRANSPARENT);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }

        let (body, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest.strip_suffix(')')?, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest.strip_suffix(')')?, false)
        } else {
            return None;
        };

        let parts: Vec<f32> = body
            .split(',')
            .map(|p| p.trim().parse::<f32>())
            .collect::<Result<_, _>>()
            .ok()?;
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return None;
        }
        let channel = |v: f32| (v / 255.0).clamp(0.0, 1.0);
        Some(Self {
            rgb: [channel(parts[0]), channel(parts[1]), channel(parts[2])],
            opacity: if has_alpha {
                parts[3].clamp(0.0, 1.0)
            } else {
                1.0
            },
        })
    }
}

fn parse_hex(hex: &str) -> Option<OverlayColor> {
    let digit = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
    let (r, g, b) = match hex.len() {
        3 => (digit(0, 1)? * 17, digit(1, 1)? * 17, digit(2, 1)? * 17),
        6 => (digit(0, 2)?, digit(2, 2)?, digit(4, 2)?),
        _ => return None,
    };
    Some(OverlayColor::rgba8(r, g, b, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgba() {
        let c = OverlayColor::parse_css("rgba(220, 180, 140, 0.25)").unwrap();
        assert!((c.rgb[0] - 220.0 / 255.0).abs() < 1e-6);
        assert!((c.rgb[2] - 140.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.opacity, 0.25);
    }

    #[test]
    fn test_parse_transparent() {
        let c = OverlayColor::parse_css("transparent").unwrap();
        assert!(c.is_transparent());
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(
            OverlayColor::parse_css("#fff").unwrap().rgb,
            [1.0, 1.0, 1.0]
        );
        let c = OverlayColor::parse_css("#ff8000").unwrap();
        assert_eq!(c.rgb[0], 1.0);
        assert_eq!(c.rgb[2], 0.0);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(OverlayColor::parse_css("rgba(1, 2, 3)").is_none());
        assert!(OverlayColor::parse_css("hsl(1, 2, 3)").is_none());
        assert!(OverlayColor::parse_css("#12").is_none());
        assert!(OverlayColor::parse_css("rgba(a, b, c, d)").is_none());
    }
}
