//! Asset resolution: byte stores, the LUT cache and the resolver that ties
//! them together.

pub mod cache;
pub mod resolver;
pub mod store;

pub use cache::{LutCache, LutState};
pub use resolver::{AssetResolver, ErrorSink, TracingSink};
pub use store::{AssetStore, DirAssetStore, MemoryAssetStore};

use crate::lut::DecodeError;

/// Why a LUT asset could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum AssetUnavailable {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("failed to read asset {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to decode LUT {path}: {source}")]
    Decode {
        path: String,
        source: DecodeError,
    },

    #[error("unsupported LUT format: {0}")]
    UnsupportedFormat(String),
}

impl AssetUnavailable {
    /// The asset path the failure refers to.
    pub fn path(&self) -> &str {
        match self {
            AssetUnavailable::NotFound(path)
            | AssetUnavailable::UnsupportedFormat(path)
            | AssetUnavailable::Read { path, .. }
            | AssetUnavailable::Decode { path, .. } => path,
        }
    }
}
