// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Per-entry bookkeeping read by an external LRU evictor.
//!
//! The eviction algorithm lives elsewhere. Entries only carry the bits it
//! needs, and only when the region tracks LRU.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Recently-used and evicted flags for one entry.
#[derive(Debug, Default)]
pub struct LruMetadata {
    recently_used: AtomicBool,
    evicted: AtomicBool,
}

impl LruMetadata {
    pub fn new() -> LruMetadata {
        return LruMetadata::default();
    }

    /// Record an access.
    #[inline]
    pub fn mark_used(&self) {
        self.recently_used.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_recently_used(&self) -> bool {
        return self.recently_used.load(Ordering::Acquire);
    }

    /// Clear the recently-used bit, returning its previous value.
    /// Clock-style evictors call this on each sweep.
    #[inline]
    pub fn clear_recently_used(&self) -> bool {
        return self.recently_used.swap(false, Ordering::AcqRel);
    }

    #[inline]
    pub fn mark_evicted(&self) {
        self.evicted.store(true, Ordering::Release);
    }

    /// A new value brings an evicted entry back.
    #[inline]
    pub fn clear_evicted(&self) {
        self.evicted.store(false, Ordering::Release);
    }

    #[inline]
    pub fn is_evicted(&self) -> bool {
        return self.evicted.load(Ordering::Acquire);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_clears_bit() {
        let lru = LruMetadata::new();
        assert!(!lru.is_recently_used());

        lru.mark_used();
        assert!(lru.clear_recently_used());
        assert!(!lru.clear_recently_used());
    }

    #[test]
    fn evicted_flag() {
        let lru = LruMetadata::new();
        lru.mark_evicted();
        assert!(lru.is_evicted());
        lru.clear_evicted();
        assert!(!lru.is_evicted());
    }
}
