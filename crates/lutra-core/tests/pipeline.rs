//! End-to-end checks of decoding, the transform chain and CPU rendering.

mod common;

use std::sync::Arc;

use glam::Vec3;
use lutra_core::assets::MemoryAssetStore;
use lutra_core::lut::{decode_cube, decode_flattened_grid, encode_flattened_grid};
use lutra_core::pipeline::stages;
use lutra_core::{
    Adjustment, AdjustmentSet, AssetResolver, DecodeError, EngineConfig, FilterRegistry, Lut3D,
    LutCache, RenderSurface, Transform,
};

use common::{gradient, max_rgb_diff};

fn surface() -> RenderSurface {
    let resolver = AssetResolver::new(
        Arc::new(MemoryAssetStore::new()),
        Arc::new(LutCache::new(4)),
    );
    RenderSurface::cpu(resolver, EngineConfig::default())
}

fn transform(id: &str) -> Transform {
    Transform::new(FilterRegistry::builtin().resolve(id).unwrap().clone())
}

#[tokio::test]
async fn identity_render_is_bit_exact() {
    let src = gradient(33, 17);
    let t = transform("normal");
    let mut surface = surface();

    assert_eq!(surface.render_preview(&src, &t), &src);
    assert_eq!(surface.render_final(&src, &t, None).await, src);
}

#[test]
fn every_adjustment_write_is_clamped() {
    let mut adj = AdjustmentSet::default();
    for a in Adjustment::ALL {
        let (lo, hi) = a.range();
        assert_eq!(adj.set(a, hi + 1000.0), hi);
        assert_eq!(adj.set(a, lo - 1000.0), lo);
    }
    assert_eq!(adj.set(Adjustment::Saturation, 500.0), 200.0);
}

#[test]
fn cube_size_two_exact_at_grid_points() {
    let mut text = String::from("TITLE \"corners\"\nLUT_3D_SIZE 2\n");
    let mut expected = Vec::new();
    for b in 0..2 {
        for g in 0..2 {
            for r in 0..2 {
                let row = [0.1 + 0.8 * r as f32, 0.2 + 0.5 * g as f32, 0.9 - 0.7 * b as f32];
                text.push_str(&format!("{} {} {}\n", row[0], row[1], row[2]));
                expected.push(((r, g, b), row));
            }
        }
    }
    let lut = decode_cube(text.as_bytes()).unwrap();
    for ((r, g, b), row) in expected {
        let out = lut.sample([r as f32, g as f32, b as f32]);
        assert_eq!(out, row, "grid point ({r}, {g}, {b})");
    }
}

#[test]
fn flattened_grid_roundtrip_corners() {
    let lut = Lut3D::identity(8);
    let img = ::image::DynamicImage::ImageRgba8(encode_flattened_grid(&lut, 8));
    let back = decode_flattened_grid(&img, 8).unwrap();
    assert_eq!(back.size(), 8);
    assert_eq!(back.at(0, 0, 0), [0.0, 0.0, 0.0]);
    assert_eq!(back.at(7, 7, 7), [1.0, 1.0, 1.0]);
}

#[test]
fn truncated_cube_rejected() {
    let text = "LUT_3D_SIZE 4\n0 0 0\n1 1 1\n";
    assert!(matches!(
        decode_cube(text.as_bytes()),
        Err(DecodeError::Truncated {
            expected: 64,
            found: 2
        })
    ));
}

#[test]
fn identity_lut_32_samples_within_one_step() {
    let lut = Lut3D::identity(32);
    let out = lut.sample([0.5, 0.25, 0.75]);
    let step = 1.0 / 31.0;
    for (got, want) in out.iter().zip([0.5, 0.25, 0.75]) {
        assert!((got - want).abs() <= step, "{got} vs {want}");
    }
}

#[tokio::test]
async fn grain_and_vignette_are_deterministic() {
    let src = gradient(40, 30);
    let adj = AdjustmentSet::default()
        .with(Adjustment::Grain, 80.0)
        .with(Adjustment::Vignette, 70.0);
    let t = transform("normal").with_adjustments(adj).at_time(2.0);
    let surface = surface();

    let a = surface.render_final(&src, &t, None).await;
    let b = surface.render_final(&src, &t, None).await;
    assert_eq!(a, b);
    assert!(max_rgb_diff(&a, &src) > 0.0);
}

#[tokio::test]
async fn stage_order_is_respected() {
    let src = gradient(16, 16);
    let adj = AdjustmentSet::default()
        .with(Adjustment::Contrast, 50.0)
        .with(Adjustment::Saturation, 50.0)
        .with(Adjustment::Temperature, 40.0);
    let out = surface()
        .render_final(&src, &transform("normal").with_adjustments(adj), None)
        .await;

    let apply = |order: &dyn Fn(Vec3) -> Vec3| {
        let mut frame = src.clone();
        for px in &mut frame.pixels {
            let c = order(Vec3::new(px[0], px[1], px[2])).clamp(Vec3::ZERO, Vec3::ONE);
            px[..3].copy_from_slice(&c.to_array());
        }
        frame
    };
    let forward = apply(&|c| {
        stages::temperature(stages::saturation(stages::contrast(c, 50.0), 50.0), 40.0)
    });
    let reversed = apply(&|c| {
        stages::contrast(stages::saturation(stages::temperature(c, 40.0), 50.0), 50.0)
    });

    assert!(max_rgb_diff(&out, &forward) < 1e-6);
    assert!(max_rgb_diff(&out, &reversed) > 1e-3);
}

#[tokio::test]
async fn overlay_filter_keeps_adjustments() {
    let src = gradient(8, 8);
    let adj = AdjustmentSet::default().with(Adjustment::Exposure, 1.0);
    let plain = surface()
        .render_final(&src, &transform("normal").with_adjustments(adj), None)
        .await;
    let tinted = surface()
        .render_final(&src, &transform("hp5").with_adjustments(adj), None)
        .await;
    assert!(max_rgb_diff(&plain, &tinted) > 0.01);
    assert!(max_rgb_diff(&plain, &src) > 0.01);
}

#[tokio::test]
async fn final_render_honours_target_resolution() {
    let src = gradient(64, 32);
    let out = surface()
        .render_final(&src, &transform("fuji"), Some((16, 8)))
        .await;
    assert_eq!((out.width, out.height), (16, 8));
}

#[test]
fn preview_downscales_large_sources() {
    let src = gradient(400, 200);
    let resolver = AssetResolver::new(
        Arc::new(MemoryAssetStore::new()),
        Arc::new(LutCache::new(4)),
    );
    let config = EngineConfig {
        preview_max_dimension: 100,
        ..EngineConfig::default()
    };
    let mut surface = RenderSurface::cpu(resolver, config);
    let out = surface.render_preview(&src, &transform("normal"));
    assert_eq!((out.width, out.height), (100, 50));
    assert_eq!(surface.capture_current_frame().map(|f| f.width), Some(100));
}
