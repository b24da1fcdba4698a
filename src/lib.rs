// model = "claude-opus-4-5"
// created = "2026-01-30"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Stamped - versioned local entries for a replicated region, plus a
//! delta-aware value codec.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use stamped::entry::factory::EntryFactory;
//! use stamped::entry::factory::RegionFlags;
//! use stamped::entry::stamp::DistributedSystemId;
//! use stamped::entry::stamp::MemberId;
//! use stamped::entry::stamp::Origin;
//! use stamped::entry::stamp::Reconciled;
//! use stamped::entry::stamp::VersionStamp;
//!
//! let flags = RegionFlags { concurrency_checks_enabled: true, lru_tracking_enabled: false };
//! let factory = EntryFactory::new(flags);
//! let entry = factory.new_entry::<&str, String>("greeting").unwrap();
//!
//! let alice = Origin::new(DistributedSystemId(1), MemberId(2));
//! let bob = Origin::new(DistributedSystemId(1), MemberId(1));
//!
//! let first = entry.update(Arc::new("hello".to_string()), Some(&VersionStamp::new(5, alice, 0)), 1);
//! assert_eq!(first.outcome, Reconciled::Applied);
//!
//! // Same version, losing originator: the stored value stays.
//! let second = entry.update(Arc::new("hi".to_string()), Some(&VersionStamp::new(5, bob, 0)), 2);
//! assert_eq!(second.outcome, Reconciled::Conflict);
//! assert_eq!(*entry.value().unwrap(), "hello");
//! ```

pub mod codec;
pub mod config;
pub mod entry;
pub mod error;

pub use config::CodecConfig;
pub use config::RegionAttributes;
pub use error::CodecError;
pub use error::EntryError;
