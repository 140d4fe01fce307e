//! Byte sources for LUT assets.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use super::AssetUnavailable;

/// Something that can hand out the raw bytes of an asset by path.
///
/// Reads are synchronous; the resolver calls them from a blocking worker.
pub trait AssetStore: Send + Sync {
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, AssetUnavailable>;
}

impl<S: AssetStore + ?Sized> AssetStore for Arc<S> {
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, AssetUnavailable> {
        (**self).read_bytes(path)
    }
}

/// Assets held in memory, e.g. bundled with the binary.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    assets: RwLock<HashMap<String, Arc<[u8]>>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(self, path: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn insert(&self, path: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.assets.write().insert(path.into(), bytes.into());
    }

    pub fn remove(&self, path: &str) -> bool {
        self.assets.write().remove(path).is_some()
    }
}

impl AssetStore for MemoryAssetStore {
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, AssetUnavailable> {
        self.assets
            .read()
            .get(path)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| AssetUnavailable::NotFound(path.to_owned()))
    }
}

/// Assets stored as files below a root directory.
///
/// Paths are relative to the root; absolute paths and `..` components are
/// treated as missing.
#[derive(Debug, Clone)]
pub struct DirAssetStore {
    root: PathBuf,
}

impl DirAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        let inside = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        (inside && !path.is_empty()).then(|| self.root.join(relative))
    }
}

impl AssetStore for DirAssetStore {
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, AssetUnavailable> {
        let full = self
            .locate(path)
            .ok_or_else(|| AssetUnavailable::NotFound(path.to_owned()))?;
        std::fs::read(&full).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => AssetUnavailable::NotFound(path.to_owned()),
            _ => AssetUnavailable::Read {
                path: path.to_owned(),
                source,
            },
        })
    }
}
