// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Error types for the entry layer and the value codec.
//!
//! Reconciliation outcomes (`Applied`, `Ignored`, `Conflict`) are not
//! errors and live in [`crate::entry::stamp::Reconciled`].

use thiserror::Error;

/// Errors raised while materializing map entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// The factory's entry budget is exhausted.
    #[error("entry allocation failed: limit of {limit} live entries reached")]
    Allocation { limit: usize },
}

/// Errors raised while encoding or decoding values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The payload could not be interpreted, no constructor is registered
    /// for its type, or a value failed to (de)serialize itself.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A delta payload arrived without a base value to apply it to.
    /// The caller must ask for a full encoding instead.
    #[error("delta payload received without a usable base value")]
    DeltaMismatch,

    /// The encoded frame is larger than the configured message size.
    #[error("encoded frame of {size} bytes exceeds maximum message size of {max} bytes")]
    Capacity { size: usize, max: usize },

    /// Reserving space for a captured buffer failed.
    #[error("could not reserve {0} bytes for captured value")]
    Allocation(usize),

    /// The input ended before a complete frame was read.
    #[error("input truncated: needed {needed} more bytes")]
    Truncated { needed: usize },

    /// Identity was requested from an envelope that never captured bytes.
    #[error("envelope has no captured bytes")]
    NotCaptured,
}

impl CodecError {
    /// True when the caller should recover by requesting a full resend.
    pub fn wants_full_resend(&self) -> bool {
        return matches!(self, CodecError::DeltaMismatch | CodecError::Serialization(_));
    }
}

pub type EntryResult<T> = std::result::Result<T, EntryError>;

pub type CodecResult<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resend_classification() {
        assert!(CodecError::DeltaMismatch.wants_full_resend());
        assert!(CodecError::Serialization("bad tag".to_string()).wants_full_resend());
        assert!(!CodecError::Capacity { size: 10, max: 5 }.wants_full_resend());
        assert!(!CodecError::NotCaptured.wants_full_resend());
    }

    #[test]
    fn messages_name_the_limits() {
        let err = CodecError::Capacity { size: 2048, max: 1024 };
        assert_eq!(
            err.to_string(),
            "encoded frame of 2048 bytes exceeds maximum message size of 1024 bytes"
        );
        let err = EntryError::Allocation { limit: 3 };
        assert_eq!(err.to_string(), "entry allocation failed: limit of 3 live entries reached");
    }
}
