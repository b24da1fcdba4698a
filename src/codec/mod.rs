// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! The delta-aware value codec.
//!
//! - `wire`: framing constants and byte cursors
//! - `value`: the `Serializable` / `Delta` capabilities and `Value` handles
//! - `registry`: type tag to constructor lookup for decoding
//! - `snapshot`: captured full bytes and their hash
//! - `envelope`: full vs. delta encoding and decoding

pub mod envelope;
pub mod registry;
pub mod snapshot;
pub mod value;
pub mod wire;

pub use envelope::DecodeOptions;
pub use envelope::Decoded;
pub use envelope::DeltaEnvelope;
pub use envelope::Encoded;
pub use envelope::FrameKind;
pub use registry::SerializationRegistry;
pub use snapshot::Snapshot;
pub use value::Capability;
pub use value::Delta;
pub use value::Serializable;
pub use value::TypeTag;
pub use value::Value;
pub use wire::DataInput;
pub use wire::DataOutput;
