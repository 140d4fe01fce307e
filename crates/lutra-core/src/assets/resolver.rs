//! Load-and-decode of LUT assets on the blocking pool, with failures routed
//! to an error sink instead of the caller.

use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::cache::{LutCache, LutState};
use super::store::AssetStore;
use super::AssetUnavailable;
use crate::config::EngineConfig;
use crate::lut::{self, Lut3D, DEFAULT_GRID_DIM};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Receives asset failures. The render path never sees them.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: &AssetUnavailable);
}

/// Reports failures as `tracing` warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, error: &AssetUnavailable) {
        tracing::warn!("LUT unavailable, using fallback overlay: {error}");
    }
}

/// Resolves asset paths to shared [`Lut3D`]s through a [`LutCache`].
///
/// Cheap to clone; clones share the store, cache and sink.
#[derive(Clone)]
pub struct AssetResolver {
    store: Arc<dyn AssetStore>,
    cache: Arc<LutCache>,
    sink: Arc<dyn ErrorSink>,
    grid_dim: u32,
    runtime: Option<Handle>,
}

impl std::fmt::Debug for AssetResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetResolver")
            .field("cache", &self.cache)
            .field("grid_dim", &self.grid_dim)
            .field("runtime", &self.runtime.is_some())
            .finish_non_exhaustive()
    }
}

impl AssetResolver {
    /// Decodes run on the blocking pool of the tokio runtime current at
    /// construction, if any; see [`with_runtime`](Self::with_runtime).
    pub fn new(store: Arc<dyn AssetStore>, cache: Arc<LutCache>) -> Self {
        Self {
            store,
            cache,
            sink: Arc::new(TracingSink),
            grid_dim: DEFAULT_GRID_DIM,
            runtime: Handle::try_current().ok(),
        }
    }

    /// A resolver with its own cache sized by `lut_cache_capacity` and the
    /// configured grid dimension.
    pub fn from_config(store: Arc<dyn AssetStore>, config: &EngineConfig) -> Self {
        Self::new(store, Arc::new(LutCache::new(config.lut_cache_capacity)))
            .with_grid_dim(config.grid_dim)
    }

    pub fn with_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Grid dimension used for flattened-grid PNGs.
    pub fn with_grid_dim(mut self, grid_dim: u32) -> Self {
        self.grid_dim = grid_dim;
        self
    }

    /// Runtime whose blocking pool runs decodes.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn cache(&self) -> &Arc<LutCache> {
        &self.cache
    }

    /// Cached LUT for `path`, decoding it first if needed.
    ///
    /// Concurrent calls for one path share a single decode. A failed
    /// resolution is reported once and cached, so later calls return `None`
    /// without retrying.
    pub async fn resolve(&self, path: &str) -> Option<Arc<Lut3D>> {
        let cell = self.cache.cell(path);
        cell.get_or_init(|| self.load(path)).await.clone()
    }

    /// Cache state for `path`. Never blocks.
    pub fn peek(&self, path: &str) -> LutState {
        self.cache.peek(path)
    }

    /// Start resolving `path` in the background if nothing has requested it
    /// yet. The path reads as [`LutState::Pending`] as soon as this returns.
    ///
    /// The spawned decode runs to completion and publishes into the cache
    /// even if the caller no longer wants it.
    pub fn prefetch(&self, handle: &Handle, path: &str) -> Option<JoinHandle<()>> {
        if !matches!(self.cache.peek(path), LutState::Absent) {
            return None;
        }
        let cell = self.cache.cell(path);
        let resolver = self.clone();
        let path = path.to_owned();
        tracing::debug!("prefetching LUT {path}");
        Some(handle.spawn(async move {
            cell.get_or_init(|| resolver.load(&path)).await;
        }))
    }

    async fn load(&self, path: &str) -> Option<Arc<Lut3D>> {
        let store = Arc::clone(&self.store);
        let owned = path.to_owned();
        let grid_dim = self.grid_dim;
        let task = move || {
            let bytes = store.read_bytes(&owned)?;
            decode_asset(&owned, &bytes, grid_dim)
        };
        // Without a tokio runtime the decode runs inline on the polling thread.
        let decoded = match self.runtime.clone().or_else(|| Handle::try_current().ok()) {
            Some(handle) => handle.spawn_blocking(task).await,
            None => {
                tracing::debug!("no tokio runtime; decoding {path} inline");
                Ok(task())
            }
        };

        match decoded {
            Ok(Ok(lut)) => {
                tracing::info!("decoded LUT {path} (size {})", lut.size());
                Some(Arc::new(lut))
            }
            Ok(Err(err)) => {
                self.sink.report(&err);
                None
            }
            Err(join) => {
                tracing::error!("LUT decode task for {path} failed: {join}");
                None
            }
        }
    }
}

/// Decode `bytes` as a `.cube` or flattened-grid PNG LUT.
///
/// The extension decides the format; without a known extension the PNG
/// signature and the `LUT_3D_SIZE` keyword are sniffed.
pub fn decode_asset(path: &str, bytes: &[u8], grid_dim: u32) -> Result<Lut3D, AssetUnavailable> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let decoded = match ext.as_deref() {
        Some("cube") => lut::decode_cube(bytes),
        Some("png") => lut::decode_png(bytes, grid_dim),
        _ if bytes.starts_with(PNG_SIGNATURE) => lut::decode_png(bytes, grid_dim),
        _ if looks_like_cube(bytes) => lut::decode_cube(bytes),
        _ => return Err(AssetUnavailable::UnsupportedFormat(path.to_owned())),
    };
    decoded.map_err(|source| AssetUnavailable::Decode {
        path: path.to_owned(),
        source,
    })
}

fn looks_like_cube(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(4096)];
    head.windows(b"LUT_3D_SIZE".len())
        .any(|w| w == b"LUT_3D_SIZE")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lut::DecodeError;

    #[test]
    fn test_decode_dispatch_by_extension() {
        let cube = Lut3D::identity(2).to_cube_string();
        let lut = decode_asset("a.CUBE", cube.as_bytes(), 8).unwrap();
        assert_eq!(lut.size(), 2);

        let err = decode_asset("a.png", cube.as_bytes(), 8).unwrap_err();
        assert!(matches!(
            err,
            AssetUnavailable::Decode {
                source: DecodeError::Image(_),
                ..
            }
        ));
    }

    #[test]
    fn test_decode_sniffs_without_extension() {
        let cube = Lut3D::identity(2).to_cube_string();
        assert!(decode_asset("bundled/lut", cube.as_bytes(), 8).is_ok());
        assert!(matches!(
            decode_asset("bundled/lut", b"hello", 8),
            Err(AssetUnavailable::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let config = EngineConfig {
            lut_cache_capacity: 3,
            grid_dim: 4,
            ..EngineConfig::default()
        };
        let store = Arc::new(crate::assets::MemoryAssetStore::new());
        let resolver = AssetResolver::from_config(store, &config);
        assert_eq!(resolver.cache().capacity(), 3);
        assert_eq!(resolver.grid_dim, 4);
    }

    /// Records the thread each read runs on.
    struct ThreadStore {
        inner: crate::assets::MemoryAssetStore,
        readers: parking_lot::Mutex<Vec<std::thread::ThreadId>>,
    }

    impl ThreadStore {
        fn with_cube(path: &str, size: usize) -> Self {
            let cube = Lut3D::identity(size).to_cube_string();
            Self {
                inner: crate::assets::MemoryAssetStore::new().with(path, cube.into_bytes()),
                readers: parking_lot::Mutex::new(Vec::new()),
            }
        }
    }

    impl AssetStore for ThreadStore {
        fn read_bytes(&self, path: &str) -> Result<Vec<u8>, AssetUnavailable> {
            self.readers.lock().push(std::thread::current().id());
            self.inner.read_bytes(path)
        }
    }

    #[test]
    fn test_resolve_without_tokio_decodes_inline() {
        let store = Arc::new(ThreadStore::with_cube("a.cube", 3));
        let resolver = AssetResolver::new(store.clone(), Arc::new(LutCache::new(4)));
        assert!(resolver.runtime.is_none());

        let lut = pollster::block_on(resolver.resolve("a.cube")).expect("decodes");
        assert_eq!(lut.size(), 3);
        assert!(pollster::block_on(resolver.resolve("missing.cube")).is_none());
        let here = std::thread::current().id();
        assert_eq!(*store.readers.lock(), [here, here]);
    }

    #[test]
    fn test_resolve_on_foreign_executor_uses_runtime_handle() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let store = Arc::new(ThreadStore::with_cube("a.cube", 2));
        let resolver = AssetResolver::new(store.clone(), Arc::new(LutCache::new(4)))
            .with_runtime(runtime.handle().clone());

        let lut = pollster::block_on(resolver.resolve("a.cube")).expect("decodes");
        assert_eq!(lut.size(), 2);
        let readers = store.readers.lock();
        assert_eq!(readers.len(), 1);
        assert_ne!(readers[0], std::thread::current().id());
    }
}
