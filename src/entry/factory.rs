// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Builds map entries with the capability set a region asks for.
//!
//! There is one entry shape. Versioning and LRU bookkeeping are optional
//! fields switched on at construction, so every flag combination is the
//! same type and costs a flag check rather than a virtual call.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::config::RegionAttributes;
use crate::entry::MapEntry;
use crate::error::EntryError;
use crate::error::EntryResult;

/// Capability flags fixed onto an entry for its whole life.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RegionFlags {
    pub concurrency_checks_enabled: bool,
    pub lru_tracking_enabled: bool,
}

/// Shared count of live entries against a limit.
#[derive(Debug)]
struct EntryBudget {
    limit: usize,
    live: AtomicUsize,
}

/// One slot of an entry budget, returned when the entry is dropped.
#[derive(Debug)]
pub(crate) struct Lease {
    budget: Arc<EntryBudget>,
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.budget.live.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Creates entries for one region.
#[derive(Clone, Debug)]
pub struct EntryFactory {
    flags: RegionFlags,
    budget: Option<Arc<EntryBudget>>,
}

impl EntryFactory {
    /// A factory with no entry limit.
    pub fn new(flags: RegionFlags) -> EntryFactory {
        return EntryFactory { flags, budget: None };
    }

    /// A factory configured from region attributes.
    pub fn from_attributes(attrs: &RegionAttributes) -> EntryFactory {
        let mut factory = EntryFactory::new(attrs.flags());
        if let Some(limit) = attrs.entry_limit {
            factory = factory.with_entry_limit(limit);
        }
        return factory;
    }

    /// Cap the number of live entries this factory (and its clones) may hand out.
    pub fn with_entry_limit(mut self, limit: usize) -> EntryFactory {
        self.budget = Some(Arc::new(EntryBudget { limit, live: AtomicUsize::new(0) }));
        return self;
    }

    #[inline]
    pub fn flags(&self) -> RegionFlags {
        return self.flags;
    }

    /// Number of entries from this factory still alive, if a limit is set.
    pub fn live_entries(&self) -> Option<usize> {
        return self.budget.as_ref().map(|b| b.live.load(Ordering::Acquire));
    }

    /// Create an entry bound to `key`.
    ///
    /// Fails only when the entry limit is exhausted.
    pub fn new_entry<K, V>(&self, key: K) -> EntryResult<MapEntry<K, V>> {
        let lease = match &self.budget {
            Some(budget) => Some(Self::acquire(budget)?),
            None => None,
        };
        return Ok(MapEntry::with_flags(key, self.flags, lease));
    }

    fn acquire(budget: &Arc<EntryBudget>) -> EntryResult<Lease> {
        let reserved = budget.live.fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
            if live < budget.limit {
                return Some(live + 1);
            }
            return None;
        });
        if reserved.is_err() {
            tracing::debug!(limit = budget.limit, "entry budget exhausted");
            return Err(EntryError::Allocation { limit: budget.limit });
        }
        return Ok(Lease { budget: Arc::clone(budget) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::stamp::DistributedSystemId;
    use crate::entry::stamp::MemberId;
    use crate::entry::stamp::Origin;
    use crate::entry::stamp::Reconciled;
    use crate::entry::stamp::VersionStamp;

    fn flags(versioned: bool, lru: bool) -> RegionFlags {
        return RegionFlags { concurrency_checks_enabled: versioned, lru_tracking_enabled: lru };
    }

    #[test]
    fn capability_set_follows_flags() {
        for versioned in [false, true] {
            for lru in [false, true] {
                let factory = EntryFactory::new(flags(versioned, lru));
                let entry: MapEntry<&str, u32> = factory.new_entry("k").unwrap();
                assert_eq!(entry.is_versioned(), versioned);
                assert_eq!(entry.lru().is_some(), lru);
                assert_eq!(*entry.key(), "k");
                assert!(entry.value().is_none());
            }
        }
    }

    #[test]
    fn unversioned_entry_always_applies() {
        let factory = EntryFactory::new(flags(false, false));
        let entry: MapEntry<u64, u32> = factory.new_entry(1).unwrap();
        let origin = Origin::new(DistributedSystemId(1), MemberId(1));

        for version in [5, 3, 5, 1] {
            let stamp = VersionStamp::new(version, origin, 0);
            assert_eq!(entry.reconcile(&stamp), Reconciled::Applied);
            assert!(entry.stamp().is_none());
        }
    }

    #[test]
    fn entry_limit_is_enforced_and_released() {
        let factory = EntryFactory::new(flags(true, false)).with_entry_limit(2);
        let a: MapEntry<u8, u8> = factory.new_entry(1).unwrap();
        let _b: MapEntry<u8, u8> = factory.new_entry(2).unwrap();
        assert_eq!(factory.live_entries(), Some(2));

        let err = factory.new_entry::<u8, u8>(3).unwrap_err();
        assert_eq!(err, EntryError::Allocation { limit: 2 });

        drop(a);
        assert_eq!(factory.live_entries(), Some(1));
        assert!(factory.new_entry::<u8, u8>(3).is_ok());
    }

    #[test]
    fn clones_share_the_budget() {
        let attrs = RegionAttributes { entry_limit: Some(1), ..RegionAttributes::default() };
        let factory = EntryFactory::from_attributes(&attrs);
        let other = factory.clone();

        let _held: MapEntry<u8, u8> = factory.new_entry(1).unwrap();
        assert!(other.new_entry::<u8, u8>(2).is_err());
    }
}
