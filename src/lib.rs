//! # concise-rules
//!
//! Streaming structural validation for **Concise Encoding** event streams.
//!
//! Concise Encoding has two surface syntaxes (binary and text) that decode to the same abstract
//! event stream. This crate validates that stream, independent of the syntax that produced it.
//!
//! ## Design principles
//!
//! - **One event at a time.**
//!   [`Rules`] consumes events synchronously, in parse order, and forwards each accepted event
//!   unchanged to a downstream [`EventReceiver`]. There is no lookahead and no reordering.
//! - **Grammar as static data.**
//!   Every grammar state is a read-only table entry ([`State`]) holding its legal events and legal
//!   child types. Per-document state is a stack of [`StateId`]s plus array and reference
//!   bookkeeping owned by one engine.
//! - **Limits are streaming guards.**
//!   Depth, object count, array/string/URI/identifier lengths and marker/reference counts are
//!   checked at the event that would breach them ([`Limits`]).
//! - **Failures are final.**
//!   The first error poisons the engine until [`Rules::reset`].
//!
//! ## Document grammar
//!
//! - A document is `Version`, exactly one top-level object, then `EndDocument`.
//! - Lists hold any objects; maps alternate keyable keys and values.
//! - Markup is a name, an attribute map, then contents (strings, markup, comments).
//! - Metadata is a map that applies to the object following it; it adds no type of its own.
//! - A marker binds an identifier (integer or string) to the next object; a reference names a
//!   completed marker's identifier, or a URI for an external document.
//! - Comments may appear between objects and hold strings and nested comments.
//! - Arrays arrive as a begin event, then chunk headers each followed by their payload bytes.
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`RuleError`].
//! - `serde`: derives `Serialize`/`Deserialize` for [`Limits`].
//! - `simdutf8`: enables SIMD-accelerated UTF-8 validation where supported.
//!
//! ## `no_std`
//!
//! The crate is `no_std` compatible and requires an allocator.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

extern crate alloc;

mod array;
pub mod content;
mod error;
mod event;
mod limits;
mod receiver;
mod recorder;
mod reference;
mod rules;
mod state;
pub(crate) mod utf8;
mod value;

pub use crate::array::{ArrayContext, ArrayPurpose, ChunkProgress};
pub use crate::content::{validate_marker_id, validate_utf8};
pub use crate::error::{ErrorCode, ErrorKind, RuleError};
pub use crate::event::{ArrayType, DataType, DataTypeSet, EventSet, Identifier, RuleEvent, Time};
pub use crate::limits::Limits;
pub use crate::receiver::{EventReceiver, NullReceiver};
pub use crate::recorder::{Event, Recorder};
pub use crate::reference::ReferenceTable;
pub use crate::rules::{Rules, MAX_SUPPORTED_VERSION};
pub use crate::state::{State, StateId, StateStack};
pub use crate::utf8::Utf8Reassembler;
pub use crate::value::Value;

/// Validate a complete recorded event sequence as one document.
///
/// The sequence must end with `EndDocument`.
///
/// # Errors
///
/// Returns the first rule violation.
pub fn validate_events(events: &[Event], limits: Limits) -> Result<(), RuleError> {
    let mut rules = Rules::new(limits, NullReceiver)?;
    events.iter().try_for_each(|e| e.send(&mut rules))?;
    if !rules.is_complete() {
        return Err(RuleError::in_state(rules.state()));
    }
    Ok(())
}
