//! Shared LUT cache with one write-once cell per asset path.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;

use crate::lut::Lut3D;

/// A cell is published exactly once: `Some` for a decoded LUT, `None` for a
/// resolution that failed.
pub(crate) type LutCell = Arc<OnceCell<Option<Arc<Lut3D>>>>;

/// Snapshot of one path's cache state.
#[derive(Debug, Clone)]
pub enum LutState {
    /// Decoded and ready to bind.
    Ready(Arc<Lut3D>),
    /// Resolution finished and failed; the fallback overlay applies.
    Unavailable,
    /// A decode is in flight.
    Pending,
    /// Never requested, or evicted.
    Absent,
}

impl LutState {
    pub fn lut(&self) -> Option<&Arc<Lut3D>> {
        match self {
            LutState::Ready(lut) => Some(lut),
            _ => None,
        }
    }
}

struct Entry {
    cell: LutCell,
    /// Bumped on every lookup; the smallest value is the eviction victim.
    last_used: u64,
}

#[derive(Default)]
struct Entries {
    map: HashMap<String, Entry>,
    clock: u64,
}

impl Entries {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

/// Path-keyed LUT cache shared between the preview and export paths.
///
/// Capacity is a soft bound: when full, the least recently looked-up
/// completed entry is evicted to make room. A LUT the preview keeps peeking
/// therefore stays resident while other paths come and go. In-flight entries are never evicted, so the cache
/// may briefly exceed capacity while many decodes are pending.
pub struct LutCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl std::fmt::Debug for LutCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LutCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

impl LutCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current state for `path`. Never blocks on a decode.
    pub fn peek(&self, path: &str) -> LutState {
        let mut entries = self.entries.lock();
        let now = entries.tick();
        match entries.map.get_mut(path) {
            None => LutState::Absent,
            Some(entry) => {
                entry.last_used = now;
                match entry.cell.get() {
                    Some(Some(lut)) => LutState::Ready(Arc::clone(lut)),
                    Some(None) => LutState::Unavailable,
                    None => LutState::Pending,
                }
            }
        }
    }

    /// Publish a LUT that was decoded elsewhere.
    ///
    /// Has no effect when the path already holds a published value.
    pub fn insert(&self, path: &str, lut: Arc<Lut3D>) {
        let cell = self.cell(path);
        let _ = cell.set(Some(lut));
    }

    pub fn clear(&self) {
        self.entries.lock().map.clear();
    }

    /// The cell for `path`, created if missing.
    pub(crate) fn cell(&self, path: &str) -> LutCell {
        let mut entries = self.entries.lock();
        let now = entries.tick();
        if let Some(entry) = entries.map.get_mut(path) {
            entry.last_used = now;
            return Arc::clone(&entry.cell);
        }

        if entries.map.len() >= self.capacity {
            let victim = entries
                .map
                .iter()
                .filter(|(_, e)| e.cell.initialized())
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone());
            if let Some(key) = victim {
                tracing::debug!("LUT cache: evicting {key}");
                entries.map.remove(&key);
            }
        }

        let cell: LutCell = Arc::new(OnceCell::new());
        entries.map.insert(
            path.to_owned(),
            Entry {
                cell: Arc::clone(&cell),
                last_used: now,
            },
        );
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_states() {
        let cache = LutCache::new(4);
        assert!(matches!(cache.peek("a"), LutState::Absent));

        let cell = cache.cell("a");
        assert!(matches!(cache.peek("a"), LutState::Pending));

        cell.set(None).unwrap();
        assert!(matches!(cache.peek("a"), LutState::Unavailable));

        cache.insert("b", Arc::new(Lut3D::identity(2)));
        assert_eq!(cache.peek("b").lut().map(|l| l.size()), Some(2));
    }

    #[test]
    fn test_published_value_never_reverts() {
        let cache = LutCache::new(4);
        cache.insert("a", Arc::new(Lut3D::identity(2)));
        cache.insert("a", Arc::new(Lut3D::identity(3)));
        assert_eq!(cache.peek("a").lut().map(|l| l.size()), Some(2));
    }

    #[test]
    fn test_evicts_least_recent_completed_only() {
        let cache = LutCache::new(2);
        let _pending = cache.cell("pending");
        cache.insert("done", Arc::new(Lut3D::identity(2)));
        cache.insert("new", Arc::new(Lut3D::identity(2)));

        assert!(matches!(cache.peek("pending"), LutState::Pending));
        assert!(matches!(cache.peek("done"), LutState::Absent));
        assert!(matches!(cache.peek("new"), LutState::Ready(_)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_recently_peeked_entry_survives_eviction() {
        let cache = LutCache::new(2);
        cache.insert("shown", Arc::new(Lut3D::identity(2)));
        cache.insert("other", Arc::new(Lut3D::identity(2)));

        // The preview keeps reading "shown" while an export loads a third LUT.
        assert!(matches!(cache.peek("shown"), LutState::Ready(_)));
        cache.insert("export", Arc::new(Lut3D::identity(2)));

        assert!(matches!(cache.peek("shown"), LutState::Ready(_)));
        assert!(matches!(cache.peek("other"), LutState::Absent));
        assert!(matches!(cache.peek("export"), LutState::Ready(_)));
    }

    #[test]
    fn test_overflows_when_everything_is_in_flight() {
        let cache = LutCache::new(1);
        let _a = cache.cell("a");
        let _b = cache.cell("b");
        assert_eq!(cache.len(), 2);
    }
}
