use core::fmt;

use crate::event::RuleEvent;
use crate::state::StateId;

/// The high-level class of an error.
///
/// The rules engine distinguishes:
/// - **Grammar** errors: an event arrived where the document grammar does not allow it.
/// - **Limit** errors: a configured resource ceiling was exceeded.
/// - **Content** errors: array payload bytes contain invalid UTF-8 or forbidden characters.
/// - **Reference** errors: marker/reference identifier bookkeeping failed.
/// - **Internal** errors: engine invariant breaches, bad configuration, or use after failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Event not legal in the current state.
    Grammar,
    /// Resource limit exceeded.
    Limit,
    /// Invalid array content.
    Content,
    /// Marker or reference failure.
    Reference,
    /// Engine-internal or configuration failure.
    Internal,
}

/// A structured error code identifying the reason an event was rejected.
///
/// This enum is intentionally string-free to support `no_std`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Invalid configured limits.
    InvalidLimits,
    /// Engine was used after a previous failure without a reset.
    EnginePoisoned,
    /// Popped below the bottom sentinel (engine defect).
    StackUnderflow,
    /// Arithmetic overflow while computing an array byte length.
    LengthOverflow,

    /// Event is not legal in the current state.
    GrammarViolation,
    /// Document declares a version this engine does not support.
    UnsupportedVersion,

    /// Container depth limit exceeded.
    DepthExceeded,
    /// Object count limit exceeded.
    ObjectCountExceeded,
    /// Array data exceeds the length declared by its chunk header.
    ChunkOverflow,
    /// Byte/typed/custom array length exceeds limits.
    ArrayTooLong,
    /// String length exceeds limits.
    StringTooLong,
    /// URI length exceeds limits.
    URITooLong,
    /// Identifier or markup name length exceeds limits.
    IDTooLong,

    /// Invalid UTF-8 in string-like array data.
    InvalidUTF8,
    /// Forbidden character in comment content.
    InvalidCommentCharacter,
    /// Forbidden character in a marker identifier or markup name.
    InvalidMarkerIDCharacter,
    /// Forbidden character in a URI.
    InvalidURICharacter,

    /// Marker identifier was already assigned in this document.
    DuplicateMarkerID,
    /// Reference names an identifier that no completed marker assigned.
    UnresolvedReference,
    /// Marker or reference count limit exceeded.
    TooManyReferences,
}

impl ErrorCode {
    /// Classify this code.
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::InvalidLimits
            | Self::EnginePoisoned
            | Self::StackUnderflow
            | Self::LengthOverflow => ErrorKind::Internal,
            Self::GrammarViolation | Self::UnsupportedVersion => ErrorKind::Grammar,
            Self::DepthExceeded
            | Self::ObjectCountExceeded
            | Self::ChunkOverflow
            | Self::ArrayTooLong
            | Self::StringTooLong
            | Self::URITooLong
            | Self::IDTooLong => ErrorKind::Limit,
            Self::InvalidUTF8
            | Self::InvalidCommentCharacter
            | Self::InvalidMarkerIDCharacter
            | Self::InvalidURICharacter => ErrorKind::Content,
            Self::DuplicateMarkerID | Self::UnresolvedReference | Self::TooManyReferences => {
                ErrorKind::Reference
            }
        }
    }

    const fn message(self) -> &'static str {
        match self {
            Self::InvalidLimits => "invalid limits",
            Self::EnginePoisoned => "engine used after a failure without reset",
            Self::StackUnderflow => "state stack underflow",
            Self::LengthOverflow => "length overflow",

            Self::GrammarViolation => "event not allowed here",
            Self::UnsupportedVersion => "unsupported document version",

            Self::DepthExceeded => "container depth limit exceeded",
            Self::ObjectCountExceeded => "object count limit exceeded",
            Self::ChunkOverflow => "array data exceeds chunk length",
            Self::ArrayTooLong => "array length exceeds limits",
            Self::StringTooLong => "string length exceeds limits",
            Self::URITooLong => "URI length exceeds limits",
            Self::IDTooLong => "identifier length exceeds limits",

            Self::InvalidUTF8 => "invalid UTF-8",
            Self::InvalidCommentCharacter => "forbidden character in comment",
            Self::InvalidMarkerIDCharacter => "forbidden character in identifier",
            Self::InvalidURICharacter => "forbidden character in URI",

            Self::DuplicateMarkerID => "marker identifier already assigned",
            Self::UnresolvedReference => "reference to unknown marker",
            Self::TooManyReferences => "marker/reference count limit exceeded",
        }
    }
}

/// A rules engine error with a stable code and, where known, the offending event and state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleError {
    /// The error code.
    pub code: ErrorCode,
    /// The event being processed when the error was detected.
    pub event: Option<RuleEvent>,
    /// The state the engine was in when the error was detected.
    pub state: Option<StateId>,
}

impl RuleError {
    /// Construct an error carrying only a code.
    #[inline]
    #[must_use]
    pub const fn new(code: ErrorCode) -> Self {
        Self {
            code,
            event: None,
            state: None,
        }
    }

    /// Construct a grammar violation for `event` arriving in `state`.
    #[inline]
    #[must_use]
    pub const fn grammar(event: RuleEvent, state: StateId) -> Self {
        Self {
            code: ErrorCode::GrammarViolation,
            event: Some(event),
            state: Some(state),
        }
    }

    /// Construct a grammar violation detected in `state`; the event is attached by the caller.
    #[inline]
    #[must_use]
    pub const fn in_state(state: StateId) -> Self {
        Self {
            code: ErrorCode::GrammarViolation,
            event: None,
            state: Some(state),
        }
    }

    /// Attach the event being processed, keeping any event already recorded.
    #[inline]
    #[must_use]
    pub const fn during(mut self, event: RuleEvent) -> Self {
        if self.event.is_none() {
            self.event = Some(event);
        }
        self
    }

    /// The error class.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        self.code.kind()
    }
}

impl From<ErrorCode> for RuleError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = self.code.message();
        match (self.event, self.state) {
            (Some(event), Some(state)) => {
                write!(f, "rules check failed: {msg}: {event} while {state}")
            }
            (Some(event), None) => write!(f, "rules check failed: {msg}: {event}"),
            (None, Some(state)) => write!(f, "rules check failed: {msg} while {state}"),
            (None, None) => write!(f, "rules check failed: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RuleError {}
