// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Captured full encodings and the identity derived from them.
//!
//! A [`Snapshot`] freezes a value's full bytes and hashes them once. Hash
//! and equality are defined over those bytes only, so later mutation of
//! the live value never changes a snapshot's identity.

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use crate::error::CodecError;
use crate::error::CodecResult;

/// Domain separation for snapshot hashes.
const HASH_CONTEXT: &[u8] = b"stamped.snapshot.v1";

/// A buffer with exactly one owner, released once when dropped.
pub struct CapturedBytes {
    bytes: Box<[u8]>,
}

impl CapturedBytes {
    /// Copy `bytes` into a freshly reserved buffer.
    pub fn copy_from(bytes: &[u8]) -> CodecResult<CapturedBytes> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(bytes.len())
            .map_err(|_| CodecError::Allocation(bytes.len()))?;
        buf.extend_from_slice(bytes);
        tracing::trace!(len = bytes.len(), "captured value bytes");
        return Ok(CapturedBytes { bytes: buf.into_boxed_slice() });
    }

    #[inline]
    pub fn len(&self) -> usize {
        return self.bytes.len();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.bytes.is_empty();
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        return &self.bytes;
    }
}

impl Drop for CapturedBytes {
    fn drop(&mut self) {
        tracing::trace!(len = self.bytes.len(), "released captured bytes");
    }
}

impl fmt::Debug for CapturedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_struct("CapturedBytes").field("len", &self.bytes.len()).finish();
    }
}

/// Hash captured bytes with blake3, folded to 64 bits.
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(HASH_CONTEXT);
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    return u64::from_le_bytes(head);
}

/// Frozen full bytes of a value plus their hash.
#[derive(Debug)]
pub struct Snapshot {
    bytes: CapturedBytes,
    hash: u64,
}

impl Snapshot {
    /// Capture `bytes` and hash them.
    pub fn capture(bytes: &[u8]) -> CodecResult<Snapshot> {
        let bytes = CapturedBytes::copy_from(bytes)?;
        let hash = hash_bytes(bytes.as_slice());
        return Ok(Snapshot { bytes, hash });
    }

    /// Memory retained by this snapshot, in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        return self.bytes.len();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.bytes.is_empty();
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        return self.bytes.as_slice();
    }

    /// The hash computed at capture time.
    #[inline]
    pub fn hash_code(&self) -> u64 {
        return self.hash;
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        // Hash first as a cheap reject
        return self.hash == other.hash && self.bytes.as_slice() == other.bytes.as_slice();
    }
}

impl Eq for Snapshot {}

impl Hash for Snapshot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equal_bytes_equal_snapshots() {
        let a = Snapshot::capture(b"payload").unwrap();
        let b = Snapshot::capture(b"payload").unwrap();
        let c = Snapshot::capture(b"payloaD").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.hash_code(), b.hash_code());
        assert_ne!(a, c);
    }

    #[test]
    fn hash_is_a_function_of_bytes() {
        assert_eq!(hash_bytes(b"abc"), hash_bytes(b"abc"));
        assert_ne!(hash_bytes(b"abc"), hash_bytes(b"abd"));
        assert_ne!(hash_bytes(b""), hash_bytes(b"\0"));
    }

    #[test]
    fn usable_as_set_key() {
        let mut set = HashSet::new();
        set.insert(Snapshot::capture(b"one").unwrap());
        set.insert(Snapshot::capture(b"one").unwrap());
        set.insert(Snapshot::capture(b"two").unwrap());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn length_matches_capture() {
        let snapshot = Snapshot::capture(&[0u8; 37]).unwrap();
        assert_eq!(snapshot.len(), 37);
        assert!(!snapshot.is_empty());
        assert!(Snapshot::capture(&[]).unwrap().is_empty());
    }
}
