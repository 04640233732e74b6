//! Bounded per-cell height memo.
use std::num::NonZeroUsize;

use lru::LruCache;

/// Default capacity in cells.
pub const DEFAULT_CAPACITY: usize = 1 << 18;

pub fn default_capacity() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN)
}

/// Cell coordinates `(floor(x / cell), floor(y / cell))`.
pub type CellKey = (i64, i64);

/// Least-recently-used map from terrain cell to height.
pub struct HeightCache {
    cells: LruCache<CellKey, f64>,
    hits: u64,
    misses: u64,
}

impl HeightCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { cells: LruCache::new(capacity), hits: 0, misses: 0 }
    }

    /// Return the cached height for `key`, computing and storing it on a miss.
    pub fn get_or_compute(&mut self, key: CellKey, compute: impl FnOnce() -> f64) -> f64 {
        if let Some(&h) = self.cells.get(&key) {
            self.hits += 1;
            return h;
        }
        self.misses += 1;
        let h = compute();
        self.cells.put(key, h);
        h
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cells.cap().get()
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(cap: usize) -> HeightCache {
        HeightCache::new(NonZeroUsize::new(cap).unwrap())
    }

    #[test]
    fn second_lookup_is_a_hit() {
        let mut c = cache(4);
        assert_eq!(c.get_or_compute((1, 2), || 7.5), 7.5);
        assert_eq!(c.get_or_compute((1, 2), || panic!("must not recompute")), 7.5);
        assert_eq!(c.stats(), (1, 1));
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut c = cache(16);
        for i in 0..1000 {
            c.get_or_compute((i, -i), || i as f64);
        }
        assert_eq!(c.len(), 16);
        assert_eq!(c.capacity(), 16);
    }

    #[test]
    fn least_recently_used_cell_is_evicted() {
        let mut c = cache(2);
        c.get_or_compute((0, 0), || 0.0);
        c.get_or_compute((1, 0), || 1.0);
        c.get_or_compute((0, 0), || 0.0); // touch
        c.get_or_compute((2, 0), || 2.0); // evicts (1, 0)
        let (_, misses_before) = c.stats();
        c.get_or_compute((0, 0), || 0.0);
        assert_eq!(c.stats().1, misses_before);
        c.get_or_compute((1, 0), || 1.0);
        assert_eq!(c.stats().1, misses_before + 1);
    }
}
