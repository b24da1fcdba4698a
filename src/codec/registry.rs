// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Lookup table from wire type tags to value constructors.
//!
//! Constructors return an empty value of the right capability; the decoder
//! then fills it from the payload. Registration normally happens once at
//! startup, lookups happen on every full decode.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::value::TypeTag;
use super::value::Value;
use crate::error::CodecError;
use crate::error::CodecResult;

/// Builds an empty value ready to be populated by `from_data`.
pub type Constructor = fn() -> Value;

/// A thread-safe table of constructors keyed by type tag.
#[derive(Debug, Default)]
pub struct SerializationRegistry {
    constructors: RwLock<FxHashMap<TypeTag, Constructor>>,
}

impl SerializationRegistry {
    pub fn new() -> SerializationRegistry {
        return SerializationRegistry::default();
    }

    /// Register a constructor, returning the one it replaced.
    pub fn register(&self, tag: TypeTag, constructor: Constructor) -> Option<Constructor> {
        let previous = self.constructors.write().insert(tag, constructor);
        if previous.is_some() {
            tracing::debug!(%tag, "replaced registered constructor");
        }
        return previous;
    }

    /// Remove a constructor.
    pub fn unregister(&self, tag: TypeTag) -> Option<Constructor> {
        return self.constructors.write().remove(&tag);
    }

    pub fn lookup(&self, tag: TypeTag) -> CodecResult<Constructor> {
        return self
            .constructors
            .read()
            .get(&tag)
            .copied()
            .ok_or_else(|| CodecError::Serialization(format!("no constructor registered for {tag}")));
    }

    /// Build an empty value for `tag`.
    pub fn construct(&self, tag: TypeTag) -> CodecResult<Value> {
        let constructor = self.lookup(tag)?;
        return Ok(constructor());
    }

    pub fn len(&self) -> usize {
        return self.constructors.read().len();
    }

    pub fn is_empty(&self) -> bool {
        return self.constructors.read().is_empty();
    }
}
