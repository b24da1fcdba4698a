// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Region and codec settings supplied at setup time.

use crate::codec::DecodeOptions;
use crate::entry::factory::RegionFlags;

/// Default upper bound on one encoded frame: 16 MiB.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Attributes of a region that shape its entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RegionAttributes {
    /// Attach version stamps to entries and reconcile concurrent updates.
    pub concurrency_checks_enabled: bool,
    /// Carry LRU bookkeeping on each entry.
    pub lru_tracking_enabled: bool,
    /// Apply deltas to a copy of the stored value instead of in place.
    pub cloning_enabled: bool,
    /// Maximum live entries the region's factory will hand out.
    pub entry_limit: Option<usize>,
}

impl Default for RegionAttributes {
    fn default() -> Self {
        return RegionAttributes {
            concurrency_checks_enabled: true,
            lru_tracking_enabled: false,
            cloning_enabled: false,
            entry_limit: None,
        };
    }
}

impl RegionAttributes {
    /// The flags fixed onto every entry created for this region.
    pub fn flags(&self) -> RegionFlags {
        return RegionFlags {
            concurrency_checks_enabled: self.concurrency_checks_enabled,
            lru_tracking_enabled: self.lru_tracking_enabled,
        };
    }

    /// How pushed deltas are applied to this region's stored values.
    pub fn decode_options(&self) -> DecodeOptions {
        return DecodeOptions { clone_base: self.cloning_enabled };
    }
}

/// Limits applied by the value codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CodecConfig {
    /// Largest frame, in bytes, an encode may produce.
    pub max_message_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        return CodecConfig { max_message_size: DEFAULT_MAX_MESSAGE_SIZE };
    }
}

impl CodecConfig {
    pub fn with_max_message_size(max_message_size: usize) -> CodecConfig {
        return CodecConfig { max_message_size };
    }
}
