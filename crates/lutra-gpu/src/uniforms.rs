//! GPU-side layout of one transform chain.

use bytemuck::{Pod, Zeroable};
use lutra_core::pipeline::{Look, Stage, TransformChain};

/// `flags` bit: sample the bound LUT.
pub const FLAG_LUT: u32 = 1;
/// `flags` bit: apply the overlay tint.
pub const FLAG_OVERLAY: u32 = 2;

/// Uniform block matching `Uniforms` in `transform.wgsl`.
///
/// Every stage is present with its parameter. A stage missing from the
/// chain keeps its neutral value, which the shader treats as a no-op.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TransformUniforms {
    pub width: u32,
    pub height: u32,
    pub lut_size: u32,
    pub flags: u32,
    pub exposure: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub temperature: f32,
    pub tint: f32,
    pub fade: f32,
    pub highlights: f32,
    pub shadows: f32,
    pub shadows_tint: f32,
    pub blacks: f32,
    pub whites: f32,
    pub grain: f32,
    pub vignette: f32,
    pub lut_intensity: f32,
    pub overlay_intensity: f32,
    pub overlay: [f32; 4],
    pub jitter: [f32; 2],
    pub _pad: [f32; 2],
}

impl Default for TransformUniforms {
    fn default() -> Self {
        Self {
            saturation: 100.0,
            ..Self::zeroed()
        }
    }
}

impl TransformUniforms {
    /// Flatten `chain` for a `width`×`height` dispatch.
    ///
    /// `lut_size` is only read by the shader when [`FLAG_LUT`] is set.
    pub fn from_chain(chain: &TransformChain, width: u32, height: u32) -> Self {
        let mut u = Self {
            width,
            height,
            ..Self::default()
        };
        for stage in chain.stages() {
            match stage {
                Stage::Exposure(v) => u.exposure = *v,
                Stage::Brightness(v) => u.brightness = *v,
                Stage::Contrast(v) => u.contrast = *v,
                Stage::Saturation(v) => u.saturation = *v,
                Stage::Temperature(v) => u.temperature = *v,
                Stage::Tint(v) => u.tint = *v,
                Stage::Fade(v) => u.fade = *v,
                Stage::Highlights(v) => u.highlights = *v,
                Stage::Shadows(v) => u.shadows = *v,
                Stage::ShadowsTint(v) => u.shadows_tint = *v,
                Stage::Blacks(v) => u.blacks = *v,
                Stage::Whites(v) => u.whites = *v,
                Stage::Look(Look::Lut { lut, intensity }) => {
                    u.flags |= FLAG_LUT;
                    u.lut_size = lut.size() as u32;
                    u.lut_intensity = *intensity;
                }
                Stage::Look(Look::Overlay { color, intensity }) => {
                    u.flags |= FLAG_OVERLAY;
                    let [r, g, b] = color.rgb;
                    u.overlay = [r, g, b, color.opacity];
                    u.overlay_intensity = *intensity;
                }
                Stage::Grain { value, jitter } => {
                    u.grain = *value;
                    u.jitter = jitter.to_array();
                }
                Stage::Vignette(v) => u.vignette = *v,
            }
        }
        u
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lutra_core::{Adjustment, AdjustmentSet, Lut3D, OverlayColor};

    use super::*;

    #[test]
    fn test_layout_matches_wgsl() {
        // 20 scalars, then vec4 at 80, vec2 at 96, padding to 112.
        assert_eq!(std::mem::size_of::<TransformUniforms>(), 112);
        assert_eq!(std::mem::offset_of!(TransformUniforms, overlay), 80);
        assert_eq!(std::mem::offset_of!(TransformUniforms, jitter), 96);
    }

    #[test]
    fn test_empty_chain_is_neutral() {
        let chain = TransformChain::build(&AdjustmentSet::default(), None, 0.0);
        let u = TransformUniforms::from_chain(&chain, 4, 3);
        assert_eq!((u.width, u.height, u.flags), (4, 3, 0));
        assert_eq!(u.saturation, 100.0);
        assert_eq!(u.contrast, 0.0);
    }

    #[test]
    fn test_stages_and_look_are_flattened() {
        let adj = AdjustmentSet::default()
            .with(Adjustment::Contrast, 25.0)
            .with(Adjustment::Grain, 40.0);
        let look = Look::Lut {
            lut: Arc::new(Lut3D::identity(5)),
            intensity: 0.75,
        };
        let chain = TransformChain::build(&adj, Some(look), 1.0);
        let u = TransformUniforms::from_chain(&chain, 8, 8);
        assert_eq!(u.contrast, 25.0);
        assert_eq!(u.grain, 40.0);
        assert_ne!(u.jitter, [0.0, 0.0]);
        assert_eq!(u.flags, FLAG_LUT);
        assert_eq!((u.lut_size, u.lut_intensity), (5, 0.75));
    }

    #[test]
    fn test_overlay_look() {
        let look = Look::Overlay {
            color: OverlayColor::rgba8(255, 0, 0, 0.5),
            intensity: 0.5,
        };
        let chain = TransformChain::build(&AdjustmentSet::default(), Some(look), 0.0);
        let u = TransformUniforms::from_chain(&chain, 1, 1);
        assert_eq!(u.flags, FLAG_OVERLAY);
        assert_eq!(u.overlay, [1.0, 0.0, 0.0, 0.5]);
        assert_eq!(u.overlay_intensity, 0.5);
    }
}
