use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::event::{ArrayType, Identifier, Time};
use crate::{EventReceiver, RuleError};

/// An owned document node that can be emitted as an event stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Nil.
    Nil,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Float; NaN is emitted as a quiet NaN event.
    Float(f64),
    /// UUID.
    Uuid([u8; 16]),
    /// Date/time.
    Time(Time),
    /// String.
    String(String),
    /// URI.
    Uri(String),
    /// Byte array.
    Bytes(Vec<u8>),
    /// Custom binary payload.
    Custom(Vec<u8>),
    /// List.
    List(Vec<Value>),
    /// Map, in insertion order.
    Map(Vec<(Value, Value)>),
    /// Markup element.
    Markup {
        /// Element name.
        name: String,
        /// Attributes, in insertion order.
        attributes: Vec<(Value, Value)>,
        /// Contents: strings and nested markup.
        contents: Vec<Value>,
    },
    /// An object preceded by metadata.
    WithMetadata {
        /// Metadata entries.
        metadata: Vec<(Value, Value)>,
        /// The object the metadata applies to.
        value: Box<Value>,
    },
    /// A marked object.
    Marked {
        /// Marker identifier (integer or string).
        id: Identifier,
        /// The marked object.
        value: Box<Value>,
    },
    /// A reference to a marked object or external document.
    Reference(Identifier),
}

impl Value {
    /// Emit this value as a whole document: version, the value, end of document.
    ///
    /// # Errors
    ///
    /// Propagates the receiver's first error.
    pub fn emit_document<R: EventReceiver + ?Sized>(
        &self,
        version: u64,
        receiver: &mut R,
    ) -> Result<(), RuleError> {
        receiver.on_version(version)?;
        self.emit(receiver)?;
        receiver.on_end_document()
    }

    /// Emit this value, sending every array as a single chunk.
    ///
    /// # Errors
    ///
    /// Propagates the receiver's first error.
    pub fn emit<R: EventReceiver + ?Sized>(&self, receiver: &mut R) -> Result<(), RuleError> {
        self.emit_chunked(receiver, usize::MAX)
    }

    /// Emit this value, splitting array payloads into chunks of at most `chunk_len` bytes.
    ///
    /// Chunks are split on byte boundaries, so multi-byte runes may straddle two chunks.
    ///
    /// # Errors
    ///
    /// Propagates the receiver's first error.
    pub fn emit_chunked<R: EventReceiver + ?Sized>(
        &self,
        receiver: &mut R,
        chunk_len: usize,
    ) -> Result<(), RuleError> {
        match self {
            Self::Nil => receiver.on_nil(),
            Self::Bool(v) => receiver.on_bool(*v),
            Self::Int(v) => {
                if *v < 0 {
                    receiver.on_negative_int(v.unsigned_abs())
                } else {
                    receiver.on_positive_int(v.unsigned_abs())
                }
            }
            Self::Float(v) if v.is_nan() => receiver.on_nan(false),
            Self::Float(v) => receiver.on_float(*v),
            Self::Uuid(v) => receiver.on_uuid(*v),
            Self::Time(v) => receiver.on_time(*v),
            Self::String(s) => emit_array(receiver, ArrayType::String, s.as_bytes(), chunk_len),
            Self::Uri(s) => emit_array(receiver, ArrayType::Uri, s.as_bytes(), chunk_len),
            Self::Bytes(b) => emit_array(receiver, ArrayType::Uint8, b, chunk_len),
            Self::Custom(b) => emit_array(receiver, ArrayType::CustomBinary, b, chunk_len),
            Self::List(items) => {
                receiver.on_begin_list()?;
                for item in items {
                    item.emit_chunked(receiver, chunk_len)?;
                }
                receiver.on_end()
            }
            Self::Map(entries) => {
                receiver.on_begin_map()?;
                emit_entries(receiver, entries, chunk_len)?;
                receiver.on_end()
            }
            Self::Markup {
                name,
                attributes,
                contents,
            } => {
                receiver.on_begin_markup()?;
                emit_array(receiver, ArrayType::String, name.as_bytes(), chunk_len)?;
                emit_entries(receiver, attributes, chunk_len)?;
                receiver.on_end()?;
                for item in contents {
                    item.emit_chunked(receiver, chunk_len)?;
                }
                receiver.on_end()
            }
            Self::WithMetadata { metadata, value } => {
                receiver.on_begin_metadata()?;
                emit_entries(receiver, metadata, chunk_len)?;
                receiver.on_end()?;
                value.emit_chunked(receiver, chunk_len)
            }
            Self::Marked { id, value } => {
                receiver.on_begin_marker()?;
                emit_identifier(receiver, id, chunk_len)?;
                value.emit_chunked(receiver, chunk_len)
            }
            Self::Reference(id) => {
                receiver.on_begin_reference()?;
                emit_identifier(receiver, id, chunk_len)
            }
        }
    }
}

fn emit_entries<R: EventReceiver + ?Sized>(
    receiver: &mut R,
    entries: &[(Value, Value)],
    chunk_len: usize,
) -> Result<(), RuleError> {
    for (k, v) in entries {
        k.emit_chunked(receiver, chunk_len)?;
        v.emit_chunked(receiver, chunk_len)?;
    }
    Ok(())
}

fn emit_identifier<R: EventReceiver + ?Sized>(
    receiver: &mut R,
    id: &Identifier,
    chunk_len: usize,
) -> Result<(), RuleError> {
    match id {
        Identifier::Int(v) => receiver.on_positive_int(*v),
        Identifier::String(s) => emit_array(receiver, ArrayType::String, s.as_bytes(), chunk_len),
        Identifier::Uri(s) => emit_array(receiver, ArrayType::Uri, s.as_bytes(), chunk_len),
    }
}

/// Emit a byte-element array as one or more chunks.
fn emit_array<R: EventReceiver + ?Sized>(
    receiver: &mut R,
    array_type: ArrayType,
    data: &[u8],
    chunk_len: usize,
) -> Result<(), RuleError> {
    receiver.on_begin_array(array_type)?;
    if data.is_empty() {
        return receiver.on_array_chunk(0, false);
    }
    let mut chunks = data.chunks(chunk_len.max(1)).peekable();
    while let Some(chunk) = chunks.next() {
        let more = chunks.peek().is_some();
        receiver.on_array_chunk(chunk.len() as u64, more)?;
        receiver.on_array_data(chunk)?;
    }
    Ok(())
}
