// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Local cache records for the keys of a region.
//!
//! Each [`MapEntry`] owns its key and shares its value by reference. All
//! mutation happens under the entry's own lock; there is no region-wide
//! lock. A value swap always publishes a new `Arc`, so a reader holding
//! the previous value keeps a consistent snapshot.
//!
//! Access time and LRU bits are atomics so expiry and eviction threads can
//! read them, and `touch` can write them, without contending on the slot.

pub mod factory;
pub mod lru;
pub mod stamp;

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use parking_lot::RwLock;

use self::factory::Lease;
use self::factory::RegionFlags;
use self::lru::LruMetadata;
use self::stamp::Reconciled;
use self::stamp::VersionStamp;

/// Idle and time-to-live timeouts. `None` disables a check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Expiry {
    pub idle_timeout: Option<Duration>,
    pub time_to_live: Option<Duration>,
}

/// What a versioned update did.
#[derive(Debug)]
pub struct RemoteUpdate<V> {
    pub outcome: Reconciled,
    /// The value replaced, if the update was applied.
    pub previous: Option<Arc<V>>,
}

/// Everything that changes together under the entry lock.
#[derive(Debug)]
struct Slot<V> {
    value: Option<Arc<V>>,
    last_modified: u64,
    /// Present iff versioning is enabled and a stamp has been applied.
    stamp: Option<VersionStamp>,
}

/// The local record for one key.
#[derive(Debug)]
pub struct MapEntry<K, V> {
    key: K,
    slot: RwLock<Slot<V>>,
    last_access: AtomicU64,
    versioned: bool,
    lru: Option<LruMetadata>,
    _lease: Option<Lease>,
}

impl<K, V> MapEntry<K, V> {
    /// Entries are normally built by [`factory::EntryFactory`].
    pub(crate) fn with_flags(key: K, flags: RegionFlags, lease: Option<Lease>) -> MapEntry<K, V> {
        let lru = if flags.lru_tracking_enabled { Some(LruMetadata::new()) } else { None };
        return MapEntry {
            key,
            slot: RwLock::new(Slot { value: None, last_modified: 0, stamp: None }),
            last_access: AtomicU64::new(0),
            versioned: flags.concurrency_checks_enabled,
            lru,
            _lease: lease,
        };
    }

    #[inline]
    pub fn key(&self) -> &K {
        return &self.key;
    }

    /// The currently published value.
    #[inline]
    pub fn value(&self) -> Option<Arc<V>> {
        return self.slot.read().value.clone();
    }

    /// True when this entry carries version stamps.
    #[inline]
    pub fn is_versioned(&self) -> bool {
        return self.versioned;
    }

    /// The stored stamp. Always `None` for unversioned entries.
    pub fn stamp(&self) -> Option<VersionStamp> {
        return self.slot.read().stamp;
    }

    #[inline]
    pub fn lru(&self) -> Option<&LruMetadata> {
        return self.lru.as_ref();
    }

    #[inline]
    pub fn last_access_time(&self) -> u64 {
        return self.last_access.load(Ordering::Acquire);
    }

    pub fn last_modified_time(&self) -> u64 {
        return self.slot.read().last_modified;
    }

    /// Publish `value` and return the one it replaced.
    ///
    /// Bypasses version checks; use [`MapEntry::update`] for stamped writes.
    pub fn set_value(&self, value: Arc<V>, now: u64) -> Option<Arc<V>> {
        let mut slot = self.slot.write();
        let previous = slot.value.replace(value);
        slot.last_modified = now;
        drop(slot);
        self.record_write(now);
        return previous;
    }

    /// Record an access. Touches nothing but the access time and LRU bit.
    pub fn touch(&self, now: u64) {
        self.last_access.fetch_max(now, Ordering::AcqRel);
        if let Some(lru) = &self.lru {
            lru.mark_used();
        }
    }

    /// Reconcile `incoming` against the stored stamp, storing it if it wins.
    ///
    /// Unversioned entries always report `Applied` and retain nothing.
    pub fn reconcile(&self, incoming: &VersionStamp) -> Reconciled {
        if !self.versioned {
            return Reconciled::Applied;
        }
        let mut slot = self.slot.write();
        return Self::reconcile_slot(&mut slot, incoming);
    }

    /// Reconcile `incoming` and, only if it wins, publish `value` in the
    /// same critical section. A `None` stamp is an unstamped write.
    pub fn update(&self, value: Arc<V>, incoming: Option<&VersionStamp>, now: u64) -> RemoteUpdate<V> {
        let mut slot = self.slot.write();
        let outcome = match incoming {
            Some(stamp) if self.versioned => Self::reconcile_slot(&mut slot, stamp),
            _ => Reconciled::Applied,
        };
        if !outcome.is_applied() {
            return RemoteUpdate { outcome, previous: None };
        }
        let previous = slot.value.replace(value);
        slot.last_modified = now;
        drop(slot);
        self.record_write(now);
        return RemoteUpdate { outcome, previous };
    }

    // A write counts as an access, so a fresh entry starts its idle clock
    // at the write time.
    fn record_write(&self, now: u64) {
        self.last_access.fetch_max(now, Ordering::AcqRel);
        if let Some(lru) = &self.lru {
            lru.clear_evicted();
        }
    }

    fn reconcile_slot(slot: &mut Slot<V>, incoming: &VersionStamp) -> Reconciled {
        let stored = match slot.stamp {
            Some(stored) => stored,
            None => {
                slot.stamp = Some(*incoming);
                return Reconciled::Applied;
            }
        };

        let outcome = stored.classify(incoming);
        match outcome {
            Reconciled::Applied => {
                slot.stamp = Some(*incoming);
            }
            Reconciled::Conflict => {
                tracing::debug!(stored = %stored, incoming = %incoming, "concurrent update lost tie-break");
            }
            Reconciled::Ignored => {
                tracing::debug!(stored = %stored, incoming = %incoming, "stale update ignored");
            }
        }
        return outcome;
    }

    /// Pure timestamp check; scheduling belongs to the expiry manager.
    pub fn is_expired(&self, now: u64, expiry: &Expiry) -> bool {
        if let Some(idle) = expiry.idle_timeout {
            if elapsed(now, self.last_access_time()) >= idle {
                return true;
            }
        }
        if let Some(ttl) = expiry.time_to_live {
            if elapsed(now, self.last_modified_time()) >= ttl {
                return true;
            }
        }
        return false;
    }
}

fn elapsed(now: u64, since: u64) -> Duration {
    return Duration::from_millis(now.saturating_sub(since));
}
