//! Lutra Core — domain layer for the image color-transform engine.
//!
//! LUT decoding, the per-pixel transform chain, procedural programs, the
//! filter catalog, asset resolution and the CPU render surface. No GPU
//! dependency; `lutra-gpu` plugs in through [`render::RenderBackend`].

pub mod adjust;
pub mod assets;
pub mod color;
pub mod config;
pub mod filter;
pub mod frame;
pub mod lut;
pub mod pipeline;
pub mod program;
pub mod render;

// Re-exports for convenience.
pub use adjust::{Adjustment, AdjustmentSet};
pub use assets::{AssetResolver, AssetStore, AssetUnavailable, LutCache, LutState};
pub use color::OverlayColor;
pub use config::EngineConfig;
pub use filter::{FilterRegistry, FilterSpec, TransformKind, UnknownFilter};
pub use frame::{BitDepth, Frame};
pub use lut::{DecodeError, Lut3D};
pub use pipeline::{Look, TransformChain};
pub use program::ProgramParams;
pub use render::{CpuBackend, RenderBackend, RenderError, RenderPlan, RenderSurface, Transform};
