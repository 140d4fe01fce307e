//! Global editor adjustments.
//!
//! `AdjustmentSet` is the record the editing session owns and passes by value
//! into every render. Every write is clamped to the field's declared range,
//! including values read back from persisted presets.

use serde::{Deserialize, Serialize};

/// One named scalar adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Adjustment {
    /// Exposure in EV stops.
    Exposure,
    /// Additive brightness.
    Brightness,
    /// Contrast around mid-gray.
    Contrast,
    /// Saturation in percent; 100 is neutral.
    Saturation,
    /// Blue (negative) to yellow (positive) shift.
    Temperature,
    /// Green (negative) to magenta (positive) shift.
    Tint,
    /// Blend toward a flat light gray.
    Fade,
    /// Gain on bright areas.
    Highlights,
    /// Gain on dark areas.
    Shadows,
    /// Warm (positive) or cool (negative) tint of dark areas.
    ShadowsTint,
    /// Pull toward black.
    Blacks,
    /// Push bright areas toward white.
    Whites,
    /// Film grain amount.
    Grain,
    /// Edge darkening amount.
    Vignette,
}

impl Adjustment {
    /// Every adjustment, in pipeline order.
    pub const ALL: [Adjustment; 14] = [
        Adjustment::Exposure,
        Adjustment::Brightness,
        Adjustment::Contrast,
        Adjustment::Saturation,
        Adjustment::Temperature,
        Adjustment::Tint,
        Adjustment::Fade,
        Adjustment::Highlights,
        Adjustment::Shadows,
        Adjustment::ShadowsTint,
        Adjustment::Blacks,
        Adjustment::Whites,
        Adjustment::Grain,
        Adjustment::Vignette,
    ];

    /// Inclusive `(min, max)` range.
    pub const fn range(self) -> (f32, f32) {
        match self {
            Self::Exposure => (-3.0, 3.0),
            Self::Saturation => (0.0, 200.0),
            Self::Fade | Self::Grain | Self::Vignette => (0.0, 100.0),
            _ => (-100.0, 100.0),
        }
    }

    /// Neutral value.
    pub const fn default_value(self) -> f32 {
        match self {
            Self::Saturation => 100.0,
            _ => 0.0,
        }
    }

    /// Human-readable label for UI sliders.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exposure => "Exposure",
            Self::Brightness => "Brightness",
            Self::Contrast => "Contrast",
            Self::Saturation => "Saturation",
            Self::Temperature => "Temperature",
            Self::Tint => "Tint",
            Self::Fade => "Fade",
            Self::Highlights => "Highlights",
            Self::Shadows => "Shadows",
            Self::ShadowsTint => "Shadows Tint",
            Self::Blacks => "Blacks",
            Self::Whites => "Whites",
            Self::Grain => "Grain",
            Self::Vignette => "Vignette",
        }
    }

    /// Clamp `value` into this adjustment's range. NaN maps to the default.
    pub fn clamp(self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default_value();
        }
        let (min, max) = self.range();
        value.clamp(min, max)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// The full set of global adjustments.
///
/// Fields are private so that every write goes through [`AdjustmentSet::set`]
/// and is clamped. `AdjustmentSet::default()` is the identity transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "AdjustmentRecord", into = "AdjustmentRecord")]
pub struct AdjustmentSet {
    values: [f32; 14],
}

impl Default for AdjustmentSet {
    fn default() -> Self {
        Self {
            values: Adjustment::ALL.map(Adjustment::default_value),
        }
    }
}

impl AdjustmentSet {
    /// Current value of `adj`.
    pub fn get(&self, adj: Adjustment) -> f32 {
        self.values[adj.index()]
    }

    /// Write `value` clamped to range. Returns the stored value.
    pub fn set(&mut self, adj: Adjustment, value: f32) -> f32 {
        let stored = adj.clamp(value);
        self.values[adj.index()] = stored;
        stored
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, adj: Adjustment, value: f32) -> Self {
        self.set(adj, value);
        self
    }

    /// Restore `adj` to its neutral value.
    pub fn reset(&mut self, adj: Adjustment) {
        self.values[adj.index()] = adj.default_value();
    }

    /// True when every field holds its neutral value.
    pub fn is_identity(&self) -> bool {
        Adjustment::ALL
            .iter()
            .all(|&adj| self.get(adj) == adj.default_value())
    }
}

/// Serialized shape of an [`AdjustmentSet`]: camelCase fields, missing fields
/// default to neutral.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AdjustmentRecord {
    exposure: f32,
    brightness: f32,
    contrast: f32,
    saturation: f32,
    temperature: f32,
    tint: f32,
    fade: f32,
    highlights: f32,
    shadows: f32,
    shadows_tint: f32,
    blacks: f32,
    whites: f32,
    grain: f32,
    vignette: f32,
}

impl Default for AdjustmentRecord {
    fn default() -> Self {
        AdjustmentSet::default().into()
    }
}

impl From<AdjustmentSet> for AdjustmentRecord {
    fn from(set: AdjustmentSet) -> Self {
        use Adjustment::*;
        Self {
            exposure: set.get(Exposure),
            brightness: set.get(Brightness),
            contrast: set.get(Contrast),
            saturation: set.get(Saturation),
            temperature: set.get(Temperature),
            tint: set.get(Tint),
            fade: set.get(Fade),
            highlights: set.get(Highlights),
            shadows: set.get(Shadows),
            shadows_tint: set.get(ShadowsTint),
            blacks: set.get(Blacks),
            whites: set.get(Whites),
            grain: set.get(Grain),
            vignette: set.get(Vignette),
        }
    }
}

impl From<AdjustmentRecord> for AdjustmentSet {
    fn from(r: AdjustmentRecord) -> Self {
        use Adjustment::*;
        AdjustmentSet::default()
            .with(Exposure, r.exposure)
            .with(Brightness, r.brightness)
            .with(Contrast, r.contrast)
            .with(Saturation, r.saturation)
            .with(Temperature, r.temperature)
            .with(Tint, r.tint)
            .with(Fade, r.fade)
            .with(Highlights, r.highlights)
            .with(Shadows, r.shadows)
            .with(ShadowsTint, r.shadows_tint)
            .with(Blacks, r.blacks)
            .with(Whites, r.whites)
            .with(Grain, r.grain)
            .with(Vignette, r.vignette)
    }
}
