// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Values and their serialization capabilities.
//!
//! A value is either `Plain` (full encoding only) or `Delta` (can also
//! report and encode incremental changes). The capability is fixed when
//! the value is wrapped, so the codec never probes for it.
//!
//! Values are shared, externally owned objects. A [`Value`] is a handle;
//! cloning it clones the handle, not the object.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::wire::DataInput;
use super::wire::DataOutput;
use super::wire::TAG_FULL_BUILTIN;
use super::wire::TAG_FULL_USER;
use crate::error::CodecResult;

/// Identifies a value's type on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    /// A type built into the protocol.
    Builtin(u32),
    /// An application type registered by class id.
    User(u32),
}

impl TypeTag {
    /// The full-encoding wire tag for this type.
    #[inline]
    pub fn wire_tag(&self) -> u8 {
        match self {
            TypeTag::Builtin(_) => TAG_FULL_BUILTIN,
            TypeTag::User(_) => TAG_FULL_USER,
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        match self {
            TypeTag::Builtin(id) | TypeTag::User(id) => *id,
        }
    }

    /// Rebuild a tag from a full-encoding wire tag and id.
    pub fn from_wire(tag: u8, id: u32) -> Option<TypeTag> {
        match tag {
            TAG_FULL_BUILTIN => Some(TypeTag::Builtin(id)),
            TAG_FULL_USER => Some(TypeTag::User(id)),
            _ => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Builtin(id) => write!(f, "builtin type {id}"),
            TypeTag::User(id) => write!(f, "user type {id}"),
        }
    }
}

/// Which encodings a value supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    Plain,
    Delta,
}

/// A value that can write and read its full state.
pub trait Serializable: Send + Sync {
    fn type_tag(&self) -> TypeTag;

    /// Write the full state.
    fn to_data(&self, output: &mut DataOutput) -> CodecResult<()>;

    /// Replace this value's state with the one read from `input`.
    fn from_data(&mut self, input: &mut DataInput<'_>) -> CodecResult<()>;
}

/// A value that can also encode only what changed.
pub trait Delta: Serializable {
    /// True when there are changes not yet sent as a delta.
    fn has_delta(&self) -> bool;

    /// Write the pending changes.
    fn to_delta(&self, output: &mut DataOutput) -> CodecResult<()>;

    /// Apply changes read from `input` to this value in place.
    fn from_delta(&mut self, input: &mut DataInput<'_>) -> CodecResult<()>;

    /// A deep copy, wrapped as a new value handle.
    fn clone_value(&self) -> Value;
}

/// A shared handle to a live value, tagged with its capability.
#[derive(Clone)]
pub enum Value {
    Plain(Arc<RwLock<dyn Serializable>>),
    Delta(Arc<RwLock<dyn Delta>>),
}

impl Value {
    pub fn plain<T: Serializable + 'static>(value: T) -> Value {
        return Value::Plain(Arc::new(RwLock::new(value)));
    }

    pub fn delta<T: Delta + 'static>(value: T) -> Value {
        return Value::Delta(Arc::new(RwLock::new(value)));
    }

    #[inline]
    pub fn capability(&self) -> Capability {
        match self {
            Value::Plain(_) => Capability::Plain,
            Value::Delta(_) => Capability::Delta,
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Plain(v) => v.read().type_tag(),
            Value::Delta(v) => v.read().type_tag(),
        }
    }

    /// Plain values never have a delta.
    pub fn has_delta(&self) -> bool {
        match self {
            Value::Plain(_) => false,
            Value::Delta(v) => v.read().has_delta(),
        }
    }

    /// True when both handles point at the same live object.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Plain(a), Value::Plain(b)) => Arc::ptr_eq(a, b),
            (Value::Delta(a), Value::Delta(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Write the value's full state, outside of any envelope.
    pub fn write_full(&self, output: &mut DataOutput) -> CodecResult<()> {
        match self {
            Value::Plain(v) => v.read().to_data(output),
            Value::Delta(v) => v.read().to_data(output),
        }
    }

    pub(crate) fn read_full(&self, input: &mut DataInput<'_>) -> CodecResult<()> {
        match self {
            Value::Plain(v) => v.write().from_data(input),
            Value::Delta(v) => v.write().from_data(input),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("Value")
            .field("capability", &self.capability())
            .field("type_tag", &self.type_tag())
            .finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u64);

    impl Serializable for Counter {
        fn type_tag(&self) -> TypeTag {
            return TypeTag::Builtin(3);
        }

        fn to_data(&self, output: &mut DataOutput) -> CodecResult<()> {
            output.write_u64(self.0);
            return Ok(());
        }

        fn from_data(&mut self, input: &mut DataInput<'_>) -> CodecResult<()> {
            self.0 = input.read_u64()?;
            return Ok(());
        }
    }

    #[test]
    fn wire_tags() {
        assert_eq!(TypeTag::Builtin(1).wire_tag(), TAG_FULL_BUILTIN);
        assert_eq!(TypeTag::User(1).wire_tag(), TAG_FULL_USER);
        assert_eq!(TypeTag::from_wire(TAG_FULL_USER, 9), Some(TypeTag::User(9)));
        assert_eq!(TypeTag::from_wire(0x7f, 9), None);
        assert_eq!(TypeTag::User(9).to_string(), "user type 9");
    }

    #[test]
    fn plain_value_has_no_delta() {
        let value = Value::plain(Counter(4));
        assert_eq!(value.capability(), Capability::Plain);
        assert!(!value.has_delta());
        assert_eq!(value.type_tag(), TypeTag::Builtin(3));
    }

    #[test]
    fn handles_share_the_object() {
        let value = Value::plain(Counter(4));
        let other = value.clone();
        assert!(value.ptr_eq(&other));
        assert!(!value.ptr_eq(&Value::plain(Counter(4))));

        let bytes = 9u64.to_le_bytes();
        let mut input = DataInput::new(&bytes);
        other.read_full(&mut input).unwrap();

        let mut out = DataOutput::new();
        value.write_full(&mut out).unwrap();
        assert_eq!(out.as_slice(), &9u64.to_le_bytes());
    }
}
