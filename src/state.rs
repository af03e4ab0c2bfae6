//! Grammar states and the state stack.
//!
//! Every state is a static, read-only table entry: its legal events and legal child types never
//! change. Per-document mutable state lives only in [`StateStack`].

use alloc::vec::Vec;
use core::fmt;

use crate::event::{DataType, DataTypeSet, EventSet, RuleEvent};
use crate::{ErrorCode, RuleError};

/// Identity of a point in the document grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    /// Before the version header.
    AwaitingVersion,
    /// Expecting the single top-level object.
    AwaitingTopLevelObject,
    /// Bottom sentinel: the top-level object is complete.
    AwaitingEndDocument,
    /// Inside a list.
    AwaitingListItem,
    /// Inside a map, expecting a key or the end.
    AwaitingMapKey,
    /// Inside a map, expecting a value.
    AwaitingMapValue,
    /// Inside markup, expecting the element name.
    AwaitingMarkupName,
    /// Inside markup attributes, expecting a key or the end of attributes.
    AwaitingMarkupKey,
    /// Inside markup attributes, expecting a value.
    AwaitingMarkupValue,
    /// Inside markup contents.
    AwaitingMarkupContents,
    /// Inside metadata, expecting a key or the end.
    AwaitingMetadataKey,
    /// Inside metadata, expecting a value.
    AwaitingMetadataValue,
    /// Metadata closed, expecting the object it applies to.
    AwaitingMetadataObject,
    /// Inside a comment.
    AwaitingCommentContents,
    /// Marker opened, expecting its identifier.
    AwaitingMarkerId,
    /// Marker identified, expecting the marked object.
    AwaitingMarkedObject,
    /// Reference opened, expecting its identifier.
    AwaitingReferenceId,
    /// Array opened or chunk finished, expecting a chunk header.
    AwaitingArrayChunk,
    /// Chunk header seen, expecting payload bytes.
    AwaitingArrayData,
    /// End of document seen; nothing further is legal.
    DocumentEnded,
}

/// How a frame takes part in completing a child object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    /// A real container: checks the child's type and transitions.
    Real,
    /// Collects a marker identifier.
    MarkerId,
    /// Transparent: binds the completed object's type to the pending marker identifier.
    MarkedObject,
    /// Collects a reference identifier, then resolves it.
    ReferenceId,
    /// Transparent: the object that closed metadata applies to.
    MetadataObject,
    /// Swallows completed strings without a type.
    Comment,
    /// Array frames and terminal states never receive completions.
    Inert,
}

/// What a real container does after a child completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Stay,
    Replace(StateId),
    Pop,
}

/// A rule state: identity, legal events, legal child types and flags.
#[derive(Debug, Clone, Copy)]
pub struct State {
    /// State identity.
    pub id: StateId,
    /// Events legal while this state is on top of the stack.
    pub legal: EventSet,
    /// Types a completed child may have.
    pub children: DataTypeSet,
    /// Whether the child's type participates in type checks.
    pub real_container: bool,
    /// Whether this state collects a marker or reference identifier.
    pub awaiting_id: bool,
    /// Human-readable description used in errors.
    pub description: &'static str,
}

const VALUE: EventSet = EventSet::OBJECT
    .union(EventSet::WRAPPERS)
    .with(RuleEvent::BeginReference);
const KEY: EventSet = EventSet::KEYABLE
    .union(EventSet::WRAPPERS)
    .with(RuleEvent::BeginReference);

const fn real(
    id: StateId,
    legal: EventSet,
    children: DataTypeSet,
    description: &'static str,
) -> State {
    State {
        id,
        legal,
        children,
        real_container: true,
        awaiting_id: false,
        description,
    }
}

const fn wrapper(
    id: StateId,
    legal: EventSet,
    awaiting_id: bool,
    description: &'static str,
) -> State {
    State {
        id,
        legal,
        children: DataTypeSet::EMPTY,
        real_container: false,
        awaiting_id,
        description,
    }
}

static STATES: [State; 20] = [
    wrapper(
        StateId::AwaitingVersion,
        EventSet::of(&[RuleEvent::Version]),
        false,
        "awaiting version",
    ),
    real(
        StateId::AwaitingTopLevelObject,
        VALUE,
        DataTypeSet::ALL,
        "awaiting top-level object",
    ),
    real(
        StateId::AwaitingEndDocument,
        EventSet::of(&[
            RuleEvent::EndDocument,
            RuleEvent::Padding,
            RuleEvent::BeginComment,
        ]),
        DataTypeSet::EMPTY,
        "awaiting end of document",
    ),
    real(
        StateId::AwaitingListItem,
        VALUE.with(RuleEvent::EndContainer),
        DataTypeSet::ALL,
        "awaiting list item",
    ),
    real(
        StateId::AwaitingMapKey,
        KEY.with(RuleEvent::EndContainer),
        DataTypeSet::KEYABLE,
        "awaiting map key",
    ),
    real(
        StateId::AwaitingMapValue,
        VALUE,
        DataTypeSet::ALL,
        "awaiting map value",
    ),
    real(
        StateId::AwaitingMarkupName,
        EventSet::of(&[RuleEvent::BeginString, RuleEvent::Padding]),
        DataTypeSet::of(&[DataType::String]),
        "awaiting markup name",
    ),
    real(
        StateId::AwaitingMarkupKey,
        KEY.with(RuleEvent::EndContainer),
        DataTypeSet::KEYABLE,
        "awaiting markup attribute key",
    ),
    real(
        StateId::AwaitingMarkupValue,
        VALUE,
        DataTypeSet::ALL,
        "awaiting markup attribute value",
    ),
    real(
        StateId::AwaitingMarkupContents,
        EventSet::of(&[
            RuleEvent::BeginString,
            RuleEvent::BeginMarkup,
            RuleEvent::Padding,
            RuleEvent::BeginComment,
            RuleEvent::EndContainer,
        ]),
        DataTypeSet::MARKUP_CONTENT,
        "awaiting markup contents",
    ),
    real(
        StateId::AwaitingMetadataKey,
        EventSet::KEYABLE.union(EventSet::of(&[
            RuleEvent::Padding,
            RuleEvent::BeginComment,
            RuleEvent::EndContainer,
        ])),
        DataTypeSet::KEYABLE,
        "awaiting metadata key",
    ),
    real(
        StateId::AwaitingMetadataValue,
        EventSet::OBJECT.union(EventSet::of(&[
            RuleEvent::Padding,
            RuleEvent::BeginComment,
            RuleEvent::BeginMarker,
            RuleEvent::BeginReference,
        ])),
        DataTypeSet::ALL,
        "awaiting metadata value",
    ),
    wrapper(
        StateId::AwaitingMetadataObject,
        VALUE,
        false,
        "awaiting object after metadata",
    ),
    wrapper(
        StateId::AwaitingCommentContents,
        EventSet::of(&[
            RuleEvent::BeginString,
            RuleEvent::BeginComment,
            RuleEvent::Padding,
            RuleEvent::EndContainer,
        ]),
        false,
        "awaiting comment contents",
    ),
    wrapper(
        StateId::AwaitingMarkerId,
        EventSet::MARKER_ID.with(RuleEvent::Padding),
        true,
        "awaiting marker ID",
    ),
    wrapper(
        StateId::AwaitingMarkedObject,
        EventSet::OBJECT.union(EventSet::of(&[
            RuleEvent::Padding,
            RuleEvent::BeginComment,
            RuleEvent::BeginMetadata,
        ])),
        false,
        "awaiting marked object",
    ),
    wrapper(
        StateId::AwaitingReferenceId,
        EventSet::REFERENCE_ID.with(RuleEvent::Padding),
        true,
        "awaiting reference ID",
    ),
    wrapper(
        StateId::AwaitingArrayChunk,
        EventSet::of(&[RuleEvent::ArrayChunk]),
        false,
        "awaiting array chunk",
    ),
    wrapper(
        StateId::AwaitingArrayData,
        EventSet::of(&[RuleEvent::ArrayData]),
        false,
        "awaiting array data",
    ),
    wrapper(
        StateId::DocumentEnded,
        EventSet::EMPTY,
        false,
        "document ended",
    ),
];

impl StateId {
    /// The static rule state for this identity.
    #[must_use]
    pub fn state(self) -> &'static State {
        &STATES[self as usize]
    }

    pub(crate) const fn role(self) -> Role {
        match self {
            Self::AwaitingTopLevelObject
            | Self::AwaitingEndDocument
            | Self::AwaitingListItem
            | Self::AwaitingMapKey
            | Self::AwaitingMapValue
            | Self::AwaitingMarkupName
            | Self::AwaitingMarkupKey
            | Self::AwaitingMarkupValue
            | Self::AwaitingMarkupContents
            | Self::AwaitingMetadataKey
            | Self::AwaitingMetadataValue => Role::Real,
            Self::AwaitingMarkerId => Role::MarkerId,
            Self::AwaitingMarkedObject => Role::MarkedObject,
            Self::AwaitingReferenceId => Role::ReferenceId,
            Self::AwaitingMetadataObject => Role::MetadataObject,
            Self::AwaitingCommentContents => Role::Comment,
            Self::AwaitingVersion
            | Self::AwaitingArrayChunk
            | Self::AwaitingArrayData
            | Self::DocumentEnded => Role::Inert,
        }
    }

    /// Transparent frames await an object on behalf of the nearest real container.
    pub(crate) const fn is_transparent(self) -> bool {
        matches!(self.role(), Role::MarkedObject | Role::MetadataObject)
    }

    /// Whether this frame counts toward the container depth limit.
    const fn is_container(self) -> bool {
        matches!(
            self,
            Self::AwaitingListItem
                | Self::AwaitingMapKey
                | Self::AwaitingMapValue
                | Self::AwaitingMarkupName
                | Self::AwaitingMarkupKey
                | Self::AwaitingMarkupValue
                | Self::AwaitingMarkupContents
                | Self::AwaitingMetadataKey
                | Self::AwaitingMetadataValue
                | Self::AwaitingCommentContents
        )
    }

    /// State that follows completion of a child in this real container.
    pub(crate) const fn after_child(self) -> Transition {
        match self {
            Self::AwaitingTopLevelObject => Transition::Pop,
            Self::AwaitingMapKey => Transition::Replace(Self::AwaitingMapValue),
            Self::AwaitingMapValue => Transition::Replace(Self::AwaitingMapKey),
            Self::AwaitingMarkupName | Self::AwaitingMarkupValue => {
                Transition::Replace(Self::AwaitingMarkupKey)
            }
            Self::AwaitingMarkupKey => Transition::Replace(Self::AwaitingMarkupValue),
            Self::AwaitingMetadataKey => Transition::Replace(Self::AwaitingMetadataValue),
            Self::AwaitingMetadataValue => Transition::Replace(Self::AwaitingMetadataKey),
            _ => Transition::Stay,
        }
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.state().description)
    }
}

/// Ordered stack of rule states with a container depth ceiling.
///
/// Open containers and pending marker or metadata wrappers are counted separately, and each
/// count is held to the same ceiling, so the number of frames never exceeds twice the ceiling
/// plus a constant.
///
/// The bottom entry is always [`StateId::AwaitingEndDocument`] (or [`StateId::DocumentEnded`]
/// once the document is closed) and can never be popped.
#[derive(Debug, Clone)]
pub struct StateStack {
    frames: Vec<StateId>,
    depth: usize,
    wrappers: usize,
    max_depth: usize,
}

impl StateStack {
    /// Create a stack positioned at the start of a document.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        let mut stack = Self {
            frames: Vec::new(),
            depth: 0,
            wrappers: 0,
            max_depth,
        };
        stack.reset();
        stack
    }

    /// Return to the start-of-document position.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.frames.extend_from_slice(&[
            StateId::AwaitingEndDocument,
            StateId::AwaitingTopLevelObject,
            StateId::AwaitingVersion,
        ]);
        self.depth = 0;
        self.wrappers = 0;
    }

    /// The state on top of the stack.
    #[must_use]
    pub fn top(&self) -> StateId {
        self.frames
            .last()
            .copied()
            .unwrap_or(StateId::DocumentEnded)
    }

    /// The nearest real container at or below the top.
    #[must_use]
    pub fn nearest_real(&self) -> StateId {
        self.frames
            .iter()
            .rev()
            .copied()
            .find(|id| id.state().real_container)
            .unwrap_or(StateId::AwaitingEndDocument)
    }

    /// Current container depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Marker and metadata wrappers still awaiting their object.
    #[must_use]
    pub const fn wrapper_depth(&self) -> usize {
        self.wrappers
    }

    /// Number of frames, including the bottom sentinel.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`: the sentinel is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Push a state.
    ///
    /// # Errors
    ///
    /// Returns `DepthExceeded` if `id` opens a container, or stacks a marker or metadata
    /// wrapper, beyond the depth ceiling.
    pub fn push(&mut self, id: StateId) -> Result<(), RuleError> {
        self.admit(id)?;
        self.frames.push(id);
        Ok(())
    }

    /// Pop the top state.
    ///
    /// # Errors
    ///
    /// Returns `StackUnderflow` if only the bottom sentinel remains.
    pub fn pop(&mut self) -> Result<StateId, RuleError> {
        if self.frames.len() <= 1 {
            return Err(RuleError::new(ErrorCode::StackUnderflow));
        }
        let id = self
            .frames
            .pop()
            .ok_or_else(|| RuleError::new(ErrorCode::StackUnderflow))?;
        self.release(id);
        Ok(id)
    }

    /// Replace the top state in place.
    ///
    /// # Errors
    ///
    /// Returns `StackUnderflow` if the stack is empty, or `DepthExceeded` if `id` would pass the
    /// depth ceiling.
    pub fn replace_top(&mut self, id: StateId) -> Result<(), RuleError> {
        let old = self.top_frame()?;
        self.release(old);
        if let Err(e) = self.admit(id) {
            // `old` fit a moment ago, so re-admitting it cannot fail.
            let _ = self.admit(old);
            return Err(e);
        }
        if let Some(top) = self.frames.last_mut() {
            *top = id;
        }
        Ok(())
    }

    fn top_frame(&self) -> Result<StateId, RuleError> {
        self.frames
            .last()
            .copied()
            .ok_or_else(|| RuleError::new(ErrorCode::StackUnderflow))
    }

    fn admit(&mut self, id: StateId) -> Result<(), RuleError> {
        let counter = if id.is_container() {
            &mut self.depth
        } else if id.is_transparent() {
            &mut self.wrappers
        } else {
            return Ok(());
        };
        if *counter >= self.max_depth {
            return Err(RuleError::new(ErrorCode::DepthExceeded));
        }
        *counter += 1;
        Ok(())
    }

    fn release(&mut self, id: StateId) {
        if id.is_container() {
            self.depth = self.depth.saturating_sub(1);
        } else if id.is_transparent() {
            self.wrappers = self.wrappers.saturating_sub(1);
        }
    }
}
