//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::lut::DEFAULT_GRID_DIM;

/// Default longest side of a preview render.
const DEFAULT_PREVIEW_MAX_DIM: u32 = 1080;
/// Default number of decoded LUTs kept in memory.
const DEFAULT_LUT_CACHE_CAPACITY: usize = 16;

/// Tunables shared by the render surface and asset resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sources larger than this are downscaled before preview rendering.
    /// `0` disables downscaling.
    pub preview_max_dimension: u32,
    /// Soft bound on cached LUTs.
    pub lut_cache_capacity: usize,
    /// Cells per side in flattened-grid PNG LUTs.
    pub grid_dim: u32,
    /// Intensity used when the caller does not pick one.
    pub default_intensity: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preview_max_dimension: std::env::var("LUTRA_PREVIEW_MAX_DIM")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PREVIEW_MAX_DIM),
            lut_cache_capacity: std::env::var("LUTRA_LUT_CACHE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_LUT_CACHE_CAPACITY),
            grid_dim: DEFAULT_GRID_DIM,
            default_intensity: 1.0,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config. Missing fields take their defaults; the
    /// intensity is clamped to [0, 1].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(json)?;
        config.default_intensity = config.default_intensity.clamp(0.0, 1.0);
        Ok(config)
    }
}
