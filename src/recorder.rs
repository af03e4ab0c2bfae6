//! Owned event capture and replay.

use alloc::vec::Vec;

use crate::event::{ArrayType, RuleEvent, Time};
use crate::{EventReceiver, RuleError};

/// One owned event, as delivered to an [`EventReceiver`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Version header.
    Version(u64),
    /// Padding.
    Padding,
    /// Nil.
    Nil,
    /// Boolean.
    Bool(bool),
    /// Non-negative integer.
    PositiveInt(u64),
    /// Negative integer magnitude.
    NegativeInt(u64),
    /// Float.
    Float(f64),
    /// NaN.
    NaN {
        /// Signaling NaN.
        signaling: bool,
    },
    /// UUID.
    Uuid([u8; 16]),
    /// Date/time.
    Time(Time),
    /// Begin list.
    BeginList,
    /// Begin map.
    BeginMap,
    /// Begin markup.
    BeginMarkup,
    /// Begin metadata.
    BeginMetadata,
    /// Begin comment.
    BeginComment,
    /// Begin marker.
    BeginMarker,
    /// Begin reference.
    BeginReference,
    /// End container.
    End,
    /// Begin array.
    BeginArray(ArrayType),
    /// Array chunk header.
    ArrayChunk {
        /// Element count.
        len: u64,
        /// More chunks follow.
        more: bool,
    },
    /// Array payload fragment.
    ArrayData(Vec<u8>),
    /// End document.
    EndDocument,
}

impl Event {
    /// The rule category of this event.
    #[must_use]
    pub fn rule_event(&self) -> RuleEvent {
        match self {
            Self::Version(_) => RuleEvent::Version,
            Self::Padding => RuleEvent::Padding,
            Self::Nil => RuleEvent::Nil,
            Self::Bool(_) => RuleEvent::Bool,
            Self::PositiveInt(_) => RuleEvent::PositiveInt,
            Self::NegativeInt(_) => RuleEvent::NegativeInt,
            Self::Float(v) if v.is_nan() => RuleEvent::NaN,
            Self::Float(_) => RuleEvent::Float,
            Self::NaN { .. } => RuleEvent::NaN,
            Self::Uuid(_) => RuleEvent::UUID,
            Self::Time(_) => RuleEvent::Time,
            Self::BeginList => RuleEvent::BeginList,
            Self::BeginMap => RuleEvent::BeginMap,
            Self::BeginMarkup => RuleEvent::BeginMarkup,
            Self::BeginMetadata => RuleEvent::BeginMetadata,
            Self::BeginComment => RuleEvent::BeginComment,
            Self::BeginMarker => RuleEvent::BeginMarker,
            Self::BeginReference => RuleEvent::BeginReference,
            Self::End => RuleEvent::EndContainer,
            Self::BeginArray(t) => t.begin_event(),
            Self::ArrayChunk { .. } => RuleEvent::ArrayChunk,
            Self::ArrayData(_) => RuleEvent::ArrayData,
            Self::EndDocument => RuleEvent::EndDocument,
        }
    }

    /// Deliver this event to `receiver`.
    ///
    /// # Errors
    ///
    /// Propagates the receiver's error.
    pub fn send<R: EventReceiver + ?Sized>(&self, receiver: &mut R) -> Result<(), RuleError> {
        match self {
            Self::Version(v) => receiver.on_version(*v),
            Self::Padding => receiver.on_padding(),
            Self::Nil => receiver.on_nil(),
            Self::Bool(v) => receiver.on_bool(*v),
            Self::PositiveInt(v) => receiver.on_positive_int(*v),
            Self::NegativeInt(v) => receiver.on_negative_int(*v),
            Self::Float(v) => receiver.on_float(*v),
            Self::NaN { signaling } => receiver.on_nan(*signaling),
            Self::Uuid(v) => receiver.on_uuid(*v),
            Self::Time(v) => receiver.on_time(*v),
            Self::BeginList => receiver.on_begin_list(),
            Self::BeginMap => receiver.on_begin_map(),
            Self::BeginMarkup => receiver.on_begin_markup(),
            Self::BeginMetadata => receiver.on_begin_metadata(),
            Self::BeginComment => receiver.on_begin_comment(),
            Self::BeginMarker => receiver.on_begin_marker(),
            Self::BeginReference => receiver.on_begin_reference(),
            Self::End => receiver.on_end(),
            Self::BeginArray(t) => receiver.on_begin_array(*t),
            Self::ArrayChunk { len, more } => receiver.on_array_chunk(*len, *more),
            Self::ArrayData(data) => receiver.on_array_data(data),
            Self::EndDocument => receiver.on_end_document(),
        }
    }
}

/// A receiver that records every event it is given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recorder {
    events: Vec<Event>,
}

impl Recorder {
    /// Create an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consume the recorder and return its events.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Forget all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Replay every recorded event, in order, into `receiver`.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error from `receiver`.
    pub fn replay<R: EventReceiver + ?Sized>(&self, receiver: &mut R) -> Result<(), RuleError> {
        self.events.iter().try_for_each(|e| e.send(receiver))
    }

    fn push(&mut self, event: Event) -> Result<(), RuleError> {
        self.events.push(event);
        Ok(())
    }
}

impl EventReceiver for Recorder {
    fn on_version(&mut self, version: u64) -> Result<(), RuleError> {
        self.push(Event::Version(version))
    }
    fn on_padding(&mut self) -> Result<(), RuleError> {
        self.push(Event::Padding)
    }
    fn on_nil(&mut self) -> Result<(), RuleError> {
        self.push(Event::Nil)
    }
    fn on_bool(&mut self, value: bool) -> Result<(), RuleError> {
        self.push(Event::Bool(value))
    }
    fn on_positive_int(&mut self, value: u64) -> Result<(), RuleError> {
        self.push(Event::PositiveInt(value))
    }
    fn on_negative_int(&mut self, magnitude: u64) -> Result<(), RuleError> {
        self.push(Event::NegativeInt(magnitude))
    }
    fn on_float(&mut self, value: f64) -> Result<(), RuleError> {
        self.push(Event::Float(value))
    }
    fn on_nan(&mut self, signaling: bool) -> Result<(), RuleError> {
        self.push(Event::NaN { signaling })
    }
    fn on_uuid(&mut self, value: [u8; 16]) -> Result<(), RuleError> {
        self.push(Event::Uuid(value))
    }
    fn on_time(&mut self, value: Time) -> Result<(), RuleError> {
        self.push(Event::Time(value))
    }
    fn on_begin_list(&mut self) -> Result<(), RuleError> {
        self.push(Event::BeginList)
    }
    fn on_begin_map(&mut self) -> Result<(), RuleError> {
        self.push(Event::BeginMap)
    }
    fn on_begin_markup(&mut self) -> Result<(), RuleError> {
        self.push(Event::BeginMarkup)
    }
    fn on_begin_metadata(&mut self) -> Result<(), RuleError> {
        self.push(Event::BeginMetadata)
    }
    fn on_begin_comment(&mut self) -> Result<(), RuleError> {
        self.push(Event::BeginComment)
    }
    fn on_begin_marker(&mut self) -> Result<(), RuleError> {
        self.push(Event::BeginMarker)
    }
    fn on_begin_reference(&mut self) -> Result<(), RuleError> {
        self.push(Event::BeginReference)
    }
    fn on_end(&mut self) -> Result<(), RuleError> {
        self.push(Event::End)
    }
    fn on_begin_array(&mut self, array_type: ArrayType) -> Result<(), RuleError> {
        self.push(Event::BeginArray(array_type))
    }
    fn on_array_chunk(&mut self, len: u64, more: bool) -> Result<(), RuleError> {
        self.push(Event::ArrayChunk { len, more })
    }
    fn on_array_data(&mut self, data: &[u8]) -> Result<(), RuleError> {
        self.push(Event::ArrayData(data.to_vec()))
    }
    fn on_end_document(&mut self) -> Result<(), RuleError> {
        self.push(Event::EndDocument)
    }
}
