// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Full and incremental encoding of values for the wire.
//!
//! An envelope is built per message and dropped once the message is done.
//! It never owns the live value. What it owns is the [`Snapshot`] of the
//! last full encoding it captured, which defines its size, hash and
//! equality. Wire bytes may be a delta, but memory accounting and identity
//! always follow the retained full bytes.
//!
//! Encoding flow:
//! 1. Serialize the full state (and the delta, if asked for and pending)
//!    under one read lock on the value.
//! 2. Build the frame header and check the frame against the size limit.
//! 3. Capture the full bytes, then append the frame to the output.
//!
//! Nothing is appended and the previous snapshot is kept if any step fails.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use smallvec::SmallVec;

use super::registry::SerializationRegistry;
use super::snapshot::Snapshot;
use super::value::Delta;
use super::value::TypeTag;
use super::value::Value;
use super::wire::DataInput;
use super::wire::DataOutput;
use super::wire::FULL_HEADER_LEN;
use super::wire::TAG_DELTA;
use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::error::CodecResult;

/// Which encoding a frame carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Full,
    Delta,
}

/// What an encode wrote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encoded {
    pub kind: FrameKind,
    /// Bytes appended to the output, header included.
    pub frame_len: usize,
}

/// How to treat the base value when applying a delta.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Apply the delta to a deep copy instead of mutating the base.
    pub clone_base: bool,
}

/// A decoded value and the envelope that captured it.
#[derive(Debug)]
pub struct Decoded {
    pub value: Value,
    pub envelope: DeltaEnvelope,
    pub kind: FrameKind,
}

/// Serialized state of one value, taken under a single lock.
struct Serialized {
    type_tag: TypeTag,
    has_delta: bool,
    full: DataOutput,
    delta: Option<DataOutput>,
}

fn serialize(value: &Value, want_delta: bool) -> CodecResult<Serialized> {
    let mut full = DataOutput::new();
    match value {
        Value::Plain(v) => {
            let guard = v.read();
            guard.to_data(&mut full)?;
            return Ok(Serialized { type_tag: guard.type_tag(), has_delta: false, full, delta: None });
        }
        Value::Delta(v) => {
            let guard = v.read();
            guard.to_data(&mut full)?;
            let has_delta = guard.has_delta();
            let delta = if want_delta && has_delta {
                let mut out = DataOutput::new();
                guard.to_delta(&mut out)?;
                Some(out)
            } else {
                None
            };
            return Ok(Serialized { type_tag: guard.type_tag(), has_delta, full, delta });
        }
    }
}

fn copy_of(value: &dyn Delta) -> CodecResult<Arc<RwLock<dyn Delta>>> {
    match value.clone_value() {
        Value::Delta(copy) => return Ok(copy),
        Value::Plain(_) => {
            return Err(CodecError::Serialization("delta value cloned into a plain value".to_string()));
        }
    }
}

/// Apply a whole delta payload; trailing bytes are an error.
fn read_delta(value: &mut dyn Delta, payload: &[u8]) -> CodecResult<()> {
    let mut reader = DataInput::new(payload);
    value.from_delta(&mut reader)?;
    return reader.finish();
}

fn payload_len(len: usize) -> CodecResult<u32> {
    return u32::try_from(len)
        .map_err(|_| CodecError::Capacity { size: len, max: u32::MAX as usize });
}

/// Wraps a value for transfer and gives it byte-based identity.
#[derive(Debug)]
pub struct DeltaEnvelope {
    type_tag: TypeTag,
    has_delta: bool,
    snapshot: Option<Snapshot>,
    config: CodecConfig,
}

impl DeltaEnvelope {
    /// Wrap `value`. With `store_bytes`, the full encoding is captured and
    /// the pending-delta flag recorded right away.
    pub fn new(value: &Value, store_bytes: bool, config: CodecConfig) -> CodecResult<DeltaEnvelope> {
        if !store_bytes {
            return Ok(DeltaEnvelope {
                type_tag: value.type_tag(),
                has_delta: false,
                snapshot: None,
                config,
            });
        }
        let serialized = serialize(value, false)?;
        let snapshot = Snapshot::capture(serialized.full.as_slice())?;
        tracing::trace!(
            tag = %serialized.type_tag,
            size = snapshot.len(),
            hash = snapshot.hash_code(),
            "envelope captured on construction"
        );
        return Ok(DeltaEnvelope {
            type_tag: serialized.type_tag,
            has_delta: serialized.has_delta,
            snapshot: Some(snapshot),
            config,
        });
    }

    #[inline]
    pub fn type_tag(&self) -> TypeTag {
        return self.type_tag;
    }

    /// Whether the value had a pending delta at the last capture.
    #[inline]
    pub fn has_delta(&self) -> bool {
        return self.has_delta;
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        return &self.config;
    }

    /// Size of the captured full encoding; 0 before any capture.
    #[inline]
    pub fn object_size(&self) -> usize {
        return self.snapshot.as_ref().map(Snapshot::len).unwrap_or(0);
    }

    /// The hash computed when the current snapshot was captured.
    #[inline]
    pub fn hash_code(&self) -> Option<u64> {
        return self.snapshot.as_ref().map(Snapshot::hash_code);
    }

    /// The identity surface, present only once full bytes are captured.
    #[inline]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        return self.snapshot.as_ref();
    }

    /// Keep the captured bytes past the envelope, e.g. for a later resend.
    pub fn into_snapshot(self) -> CodecResult<Snapshot> {
        return self.snapshot.ok_or(CodecError::NotCaptured);
    }

    /// Encode `value` into `output`.
    ///
    /// Writes a delta frame when `want_delta` is set and the value has a
    /// pending delta, a full frame otherwise. The full bytes are captured
    /// either way.
    pub fn encode(&mut self, value: &Value, want_delta: bool, output: &mut DataOutput) -> CodecResult<Encoded> {
        let serialized = serialize(value, want_delta)?;

        let mut header: SmallVec<[u8; FULL_HEADER_LEN]> = SmallVec::new();
        let (kind, payload) = match &serialized.delta {
            Some(delta) => {
                header.push(TAG_DELTA);
                header.extend_from_slice(&payload_len(delta.len())?.to_le_bytes());
                (FrameKind::Delta, delta.as_slice())
            }
            None => {
                let full = serialized.full.as_slice();
                header.push(serialized.type_tag.wire_tag());
                header.extend_from_slice(&serialized.type_tag.id().to_le_bytes());
                header.extend_from_slice(&payload_len(full.len())?.to_le_bytes());
                (FrameKind::Full, full)
            }
        };

        let frame_len = header.len() + payload.len();
        if frame_len > self.config.max_message_size {
            tracing::debug!(
                frame_len,
                max = self.config.max_message_size,
                ?kind,
                "encoded frame over message size limit"
            );
            return Err(CodecError::Capacity { size: frame_len, max: self.config.max_message_size });
        }

        let snapshot = Snapshot::capture(serialized.full.as_slice())?;
        output.write_raw(&header);
        output.write_raw(payload);

        tracing::trace!(?kind, frame_len, size = snapshot.len(), "encoded value");
        self.type_tag = serialized.type_tag;
        self.has_delta = serialized.has_delta;
        self.snapshot = Some(snapshot);
        return Ok(Encoded { kind, frame_len });
    }

    /// Decode one frame, applying deltas to `base` in place.
    pub fn decode(
        input: &mut DataInput<'_>,
        registry: &SerializationRegistry,
        base: Option<&Value>,
        config: CodecConfig,
    ) -> CodecResult<Decoded> {
        return DeltaEnvelope::decode_with(input, registry, base, DecodeOptions::default(), config);
    }

    /// Decode one frame.
    ///
    /// Full frames build a fresh value through `registry`. Delta frames
    /// require `base` and fail with [`CodecError::DeltaMismatch`] without
    /// one; the caller should then request a full encoding.
    pub fn decode_with(
        input: &mut DataInput<'_>,
        registry: &SerializationRegistry,
        base: Option<&Value>,
        options: DecodeOptions,
        config: CodecConfig,
    ) -> CodecResult<Decoded> {
        let tag = input.read_u8()?;
        if tag == TAG_DELTA {
            let payload = input.read_bytes()?;
            return DeltaEnvelope::apply_delta(payload, base, options, config);
        }

        let id = input.read_u32()?;
        let type_tag = TypeTag::from_wire(tag, id)
            .ok_or_else(|| CodecError::Serialization(format!("unknown frame tag {tag:#04x}")))?;
        let payload = input.read_bytes()?;

        let value = registry.construct(type_tag)?;
        if value.type_tag() != type_tag {
            return Err(CodecError::Serialization(format!(
                "constructor for {type_tag} built a value of {}",
                value.type_tag()
            )));
        }
        let mut reader = DataInput::new(payload);
        value.read_full(&mut reader)?;
        reader.finish()?;

        // The payload is the full encoding, so it is captured as received.
        let snapshot = Snapshot::capture(payload)?;
        tracing::trace!(tag = %type_tag, size = snapshot.len(), "decoded full frame");
        let envelope = DeltaEnvelope {
            type_tag,
            has_delta: value.has_delta(),
            snapshot: Some(snapshot),
            config,
        };
        return Ok(Decoded { value, envelope, kind: FrameKind::Full });
    }

    fn apply_delta(
        payload: &[u8],
        base: Option<&Value>,
        options: DecodeOptions,
        config: CodecConfig,
    ) -> CodecResult<Decoded> {
        let base = match base {
            Some(Value::Delta(base)) => base,
            Some(Value::Plain(_)) => {
                tracing::debug!("delta frame for a value without delta support");
                return Err(CodecError::DeltaMismatch);
            }
            None => {
                tracing::debug!("delta frame with no base value");
                return Err(CodecError::DeltaMismatch);
            }
        };

        let target = if options.clone_base { copy_of(&*base.read())? } else { base.clone() };

        let mut guard = target.write();
        if !options.clone_base {
            // A frame must apply cleanly to a copy before it touches the base.
            let scratch = copy_of(&*guard)?;
            read_delta(&mut *scratch.write(), payload)?;
        }
        read_delta(&mut *guard, payload)?;

        let mut full = DataOutput::new();
        guard.to_data(&mut full)?;
        let type_tag = guard.type_tag();
        let has_delta = guard.has_delta();
        drop(guard);

        let snapshot = Snapshot::capture(full.as_slice())?;
        tracing::trace!(tag = %type_tag, delta_len = payload.len(), size = snapshot.len(), "applied delta frame");
        let envelope = DeltaEnvelope { type_tag, has_delta, snapshot: Some(snapshot), config };
        return Ok(Decoded { value: Value::Delta(target), envelope, kind: FrameKind::Delta });
    }

    /// A description for logs, cut to at most `max_len` characters.
    pub fn log_string(&self, max_len: usize) -> String {
        return self.to_string().chars().take(max_len).collect();
    }
}

impl fmt::Display for DeltaEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.snapshot {
            Some(snapshot) => write!(
                f,
                "DeltaEnvelope({}, size={}, hash={:#018x})",
                self.type_tag,
                snapshot.len(),
                snapshot.hash_code()
            ),
            None => write!(f, "DeltaEnvelope({}, uncaptured)", self.type_tag),
        }
    }
}
