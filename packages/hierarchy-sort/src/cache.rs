//! Bounded cache in front of an ancestor lookup
//!
//! Orphan subtrees in the same detached branch walk overlapping ancestor
//! chains; caching the `id → parent` answers keeps each store round trip to
//! one per id. The cache is an explicit value handed to the sorter, and the
//! backing store is whatever `AncestorLookup` it wraps.

use lru::LruCache;
use parking_lot::Mutex;
use std::fmt;
use std::num::NonZeroUsize;

use crate::ancestry::AncestorLookup;
use crate::domain::NodeId;
use crate::error::Result;

struct CacheState {
    entries: LruCache<NodeId, NodeId>,
    hits: usize,
    misses: usize,
}

/// LRU cache of parent lookups
///
/// Lookup errors are passed through and never cached.
pub struct CachedLookup<L> {
    inner: L,
    state: Mutex<CacheState>,
}

impl<L: AncestorLookup> CachedLookup<L> {
    /// Wrap `inner` with room for `capacity` entries (at least one)
    pub fn new(inner: L, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Cached parent of `id`, updating hit/miss statistics
    pub fn get(&self, id: NodeId) -> Option<NodeId> {
        let mut state = self.state.lock();
        match state.entries.get(&id).copied() {
            Some(parent) => {
                state.hits += 1;
                Some(parent)
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    /// Insert or update a cached parent
    pub fn set(&self, id: NodeId, parent: NodeId) {
        self.state.lock().entries.put(id, parent);
    }

    /// Drop the cached parent of `id` (after the store changed it)
    pub fn invalidate(&self, id: NodeId) -> Option<NodeId> {
        self.state.lock().entries.pop(&id)
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.hits = 0;
        state.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cache hit rate (0.0-1.0)
    pub fn hit_rate(&self) -> f32 {
        let state = self.state.lock();
        let total = state.hits + state.misses;
        if total == 0 {
            0.0
        } else {
            state.hits as f32 / total as f32
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: AncestorLookup> AncestorLookup for CachedLookup<L> {
    fn parent_of(&self, id: NodeId) -> Result<NodeId> {
        if let Some(parent) = self.get(id) {
            return Ok(parent);
        }

        let parent = self.inner.parent_of(id)?;
        self.set(id, parent);
        Ok(parent)
    }
}

impl<L> fmt::Debug for CachedLookup<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CachedLookup")
            .field("len", &state.entries.len())
            .field("capacity", &state.entries.cap())
            .field("hits", &state.hits)
            .field("misses", &state.misses)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    /// Counts how often the backing store is consulted
    struct CountingLookup {
        parents: HashMap<NodeId, NodeId>,
        calls: Cell<usize>,
    }

    impl AncestorLookup for CountingLookup {
        fn parent_of(&self, id: NodeId) -> Result<NodeId> {
            self.calls.set(self.calls.get() + 1);
            self.parents.parent_of(id)
        }
    }

    fn counting(pairs: &[(NodeId, NodeId)]) -> CountingLookup {
        CountingLookup {
            parents: pairs.iter().copied().collect(),
            calls: Cell::new(0),
        }
    }

    #[test]
    fn test_second_lookup_is_served_from_cache() {
        let cached = CachedLookup::new(counting(&[(3, 2), (2, 0)]), 8);

        assert_eq!(cached.parent_of(3).unwrap(), 2);
        assert_eq!(cached.parent_of(3).unwrap(), 2);

        assert_eq!(cached.inner().calls.get(), 1);
        assert_eq!(cached.len(), 1);
        assert!((cached.hit_rate() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalidate_forces_refetch() {
        let cached = CachedLookup::new(counting(&[(3, 2)]), 8);
        cached.parent_of(3).unwrap();

        assert_eq!(cached.invalidate(3), Some(2));
        assert_eq!(cached.invalidate(3), None);

        cached.parent_of(3).unwrap();
        assert_eq!(cached.inner().calls.get(), 2);
    }

    #[test]
    fn test_set_overrides_store() {
        let cached = CachedLookup::new(counting(&[(3, 2)]), 8);
        cached.set(3, 9);
        assert_eq!(cached.parent_of(3).unwrap(), 9);
        assert_eq!(cached.inner().calls.get(), 0);
    }

    #[test]
    fn test_lru_eviction() {
        let cached = CachedLookup::new(counting(&[(1, 0), (2, 0), (3, 0)]), 2);
        cached.parent_of(1).unwrap();
        cached.parent_of(2).unwrap();
        cached.parent_of(3).unwrap();

        assert_eq!(cached.len(), 2);
        assert_eq!(cached.get(1), None);
        assert_eq!(cached.get(3), Some(0));
    }

    #[test]
    fn test_zero_capacity_clamps_to_one() {
        let cached = CachedLookup::new(counting(&[]), 0);
        cached.parent_of(5).unwrap();
        assert_eq!(cached.len(), 1);

        cached.clear();
        assert!(cached.is_empty());
        assert_eq!(cached.hit_rate(), 0.0);
    }
}
