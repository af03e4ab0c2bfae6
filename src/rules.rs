//! The rules engine: authorizes each event against the grammar, keeps array, reference and limit
//! bookkeeping, and forwards accepted events downstream.

use log::debug;

use crate::array::{ArrayContext, ArrayPurpose, ChunkProgress};
use crate::event::{ArrayType, DataType, Identifier, RuleEvent, Time};
use crate::reference::ReferenceTable;
use crate::state::{Role, StateId, StateStack, Transition};
use crate::{ErrorCode, EventReceiver, Limits, RuleError};

/// Highest document version this engine accepts.
pub const MAX_SUPPORTED_VERSION: u64 = 1;

/// Streaming validator for one document at a time.
///
/// `Rules` implements [`EventReceiver`]: feed it events and it forwards each accepted event,
/// unchanged, to its downstream receiver. The first failure poisons the engine; every later call
/// fails with `EnginePoisoned` until [`Rules::reset`].
#[derive(Debug)]
pub struct Rules<R> {
    limits: Limits,
    stack: StateStack,
    array: ArrayContext,
    refs: ReferenceTable,
    object_count: u64,
    poisoned: bool,
    receiver: R,
}

impl<R: EventReceiver> Rules<R> {
    /// Create an engine with `limits` forwarding to `receiver`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLimits` if any limit is zero.
    pub fn new(limits: Limits, receiver: R) -> Result<Self, RuleError> {
        limits.validate()?;
        Ok(Self::from_parts(limits, receiver))
    }

    /// Create an engine with [`Limits::default`].
    #[must_use]
    pub fn with_default_limits(receiver: R) -> Self {
        Self::from_parts(Limits::default(), receiver)
    }

    fn from_parts(limits: Limits, receiver: R) -> Self {
        Self {
            limits,
            stack: StateStack::new(limits.max_container_depth),
            array: ArrayContext::new(),
            refs: ReferenceTable::new(),
            object_count: 0,
            poisoned: false,
            receiver,
        }
    }

    /// Prepare for a new document: clears the stack, array context, reference table, counters
    /// and the poisoned flag. The receiver is left untouched.
    pub fn reset(&mut self) {
        self.stack.reset();
        self.array.clear();
        self.refs.clear();
        self.object_count = 0;
        self.poisoned = false;
    }

    /// The limits in force.
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// The current grammar state.
    #[must_use]
    pub fn state(&self) -> StateId {
        self.stack.top()
    }

    /// Current container depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Objects completed so far in this document.
    #[must_use]
    pub const fn object_count(&self) -> u64 {
        self.object_count
    }

    /// Type bound to a marker identifier, if assigned.
    #[must_use]
    pub fn marked_type(&self, id: &Identifier) -> Option<DataType> {
        self.refs.get(id)
    }

    /// Returns `true` after a failure, until [`Rules::reset`].
    #[must_use]
    pub const fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Returns `true` once `EndDocument` has been accepted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stack.top() == StateId::DocumentEnded
    }

    /// Borrow the downstream receiver.
    #[must_use]
    pub const fn receiver(&self) -> &R {
        &self.receiver
    }

    /// Mutably borrow the downstream receiver.
    pub fn receiver_mut(&mut self) -> &mut R {
        &mut self.receiver
    }

    /// Consume the engine and return the downstream receiver.
    pub fn into_receiver(self) -> R {
        self.receiver
    }

    /// Run one event handler, poisoning the engine if it fails.
    fn guarded<F>(&mut self, event: RuleEvent, handler: F) -> Result<(), RuleError>
    where
        F: FnOnce(&mut Self) -> Result<(), RuleError>,
    {
        if self.poisoned {
            return Err(RuleError::new(ErrorCode::EnginePoisoned).during(event));
        }
        let result = handler(self).map_err(|e| e.during(event));
        if let Err(e) = &result {
            debug!("rules engine rejected document: {e}");
            self.poisoned = true;
        }
        result
    }

    fn authorize(&self, event: RuleEvent) -> Result<(), RuleError> {
        let top = self.stack.top();
        if !top.state().legal.contains(event) {
            return Err(RuleError::grammar(event, top));
        }
        if top.is_transparent() {
            let real = self.stack.nearest_real();
            if !real.state().legal.contains(event) {
                return Err(RuleError::grammar(event, real));
            }
        }
        Ok(())
    }

    fn count_object(&mut self) -> Result<(), RuleError> {
        if self.object_count >= self.limits.max_object_count {
            return Err(RuleError::new(ErrorCode::ObjectCountExceeded));
        }
        self.object_count += 1;
        Ok(())
    }

    /// Complete an object of type `ty`, unwinding through transparent frames to the nearest
    /// real container. `id` carries the object's value when it may serve as an identifier.
    fn complete(&mut self, ty: DataType, id: Option<Identifier>) -> Result<(), RuleError> {
        match self.stack.top().role() {
            Role::Comment => return Ok(()),
            Role::MarkerId => {}
            _ => self.count_object()?,
        }

        let mut ty = ty;
        let mut id = id;
        loop {
            let top = self.stack.top();
            match top.role() {
                Role::MarkerId => {
                    let id = id.take().ok_or_else(|| RuleError::in_state(top))?;
                    self.refs.push_unassigned(id);
                    return self.stack.replace_top(StateId::AwaitingMarkedObject);
                }
                Role::ReferenceId => {
                    let id = id.take().ok_or_else(|| RuleError::in_state(top))?;
                    self.stack.pop()?;
                    ty = self.refs.resolve(&id)?;
                }
                Role::MarkedObject => {
                    self.stack.pop()?;
                    self.refs.assign(ty)?;
                }
                Role::MetadataObject => {
                    self.stack.pop()?;
                }
                Role::Real => {
                    if !top.state().children.accepts(ty) {
                        return Err(RuleError::in_state(top));
                    }
                    return match top.after_child() {
                        Transition::Stay => Ok(()),
                        Transition::Replace(next) => self.stack.replace_top(next),
                        Transition::Pop => self.stack.pop().map(|_| ()),
                    };
                }
                Role::Comment | Role::Inert => {
                    return Err(RuleError::new(ErrorCode::StackUnderflow));
                }
            }
        }
    }

    fn scalar(
        &mut self,
        event: RuleEvent,
        ty: DataType,
        id: Option<Identifier>,
    ) -> Result<(), RuleError> {
        self.authorize(event)?;
        self.complete(ty, id)
    }

    fn begin_container(&mut self, event: RuleEvent, state: StateId) -> Result<(), RuleError> {
        self.authorize(event)?;
        self.stack.push(state)
    }

    fn finish_array(&mut self) -> Result<(), RuleError> {
        self.stack.pop()?;
        let id = self.array.finish()?;
        let ty = self.array.array_type().data_type();
        self.complete(ty, id)
    }

    fn advance_array(&mut self, progress: ChunkProgress) -> Result<(), RuleError> {
        match progress {
            ChunkProgress::AwaitingData => self.stack.replace_top(StateId::AwaitingArrayData),
            ChunkProgress::AwaitingChunk => self.stack.replace_top(StateId::AwaitingArrayChunk),
            ChunkProgress::Complete => self.finish_array(),
        }
    }
}

impl<R: EventReceiver> EventReceiver for Rules<R> {
    fn on_version(&mut self, version: u64) -> Result<(), RuleError> {
        self.guarded(RuleEvent::Version, |r| {
            r.authorize(RuleEvent::Version)?;
            if version > MAX_SUPPORTED_VERSION {
                return Err(RuleError::new(ErrorCode::UnsupportedVersion));
            }
            r.stack.pop()?;
            r.receiver.on_version(version)
        })
    }

    fn on_padding(&mut self) -> Result<(), RuleError> {
        self.guarded(RuleEvent::Padding, |r| {
            r.authorize(RuleEvent::Padding)?;
            r.receiver.on_padding()
        })
    }

    fn on_nil(&mut self) -> Result<(), RuleError> {
        self.guarded(RuleEvent::Nil, |r| {
            r.scalar(RuleEvent::Nil, DataType::Nil, None)?;
            r.receiver.on_nil()
        })
    }

    fn on_bool(&mut self, value: bool) -> Result<(), RuleError> {
        self.guarded(RuleEvent::Bool, |r| {
            r.scalar(RuleEvent::Bool, DataType::Bool, None)?;
            r.receiver.on_bool(value)
        })
    }

    fn on_positive_int(&mut self, value: u64) -> Result<(), RuleError> {
        self.guarded(RuleEvent::PositiveInt, |r| {
            let id = r
                .stack
                .top()
                .state()
                .awaiting_id
                .then_some(Identifier::Int(value));
            r.scalar(RuleEvent::PositiveInt, DataType::Int, id)?;
            r.receiver.on_positive_int(value)
        })
    }

    fn on_negative_int(&mut self, magnitude: u64) -> Result<(), RuleError> {
        self.guarded(RuleEvent::NegativeInt, |r| {
            r.scalar(RuleEvent::NegativeInt, DataType::Int, None)?;
            r.receiver.on_negative_int(magnitude)
        })
    }

    fn on_float(&mut self, value: f64) -> Result<(), RuleError> {
        let (event, ty) = if value.is_nan() {
            (RuleEvent::NaN, DataType::NaN)
        } else {
            (RuleEvent::Float, DataType::Float)
        };
        self.guarded(event, |r| {
            r.scalar(event, ty, None)?;
            r.receiver.on_float(value)
        })
    }

    fn on_nan(&mut self, signaling: bool) -> Result<(), RuleError> {
        self.guarded(RuleEvent::NaN, |r| {
            r.scalar(RuleEvent::NaN, DataType::NaN, None)?;
            r.receiver.on_nan(signaling)
        })
    }

    fn on_uuid(&mut self, value: [u8; 16]) -> Result<(), RuleError> {
        self.guarded(RuleEvent::UUID, |r| {
            r.scalar(RuleEvent::UUID, DataType::Uuid, None)?;
            r.receiver.on_uuid(value)
        })
    }

    fn on_time(&mut self, value: Time) -> Result<(), RuleError> {
        self.guarded(RuleEvent::Time, |r| {
            r.scalar(RuleEvent::Time, DataType::Time, None)?;
            r.receiver.on_time(value)
        })
    }

    fn on_begin_list(&mut self) -> Result<(), RuleError> {
        self.guarded(RuleEvent::BeginList, |r| {
            r.begin_container(RuleEvent::BeginList, StateId::AwaitingListItem)?;
            r.receiver.on_begin_list()
        })
    }

    fn on_begin_map(&mut self) -> Result<(), RuleError> {
        self.guarded(RuleEvent::BeginMap, |r| {
            r.begin_container(RuleEvent::BeginMap, StateId::AwaitingMapKey)?;
            r.receiver.on_begin_map()
        })
    }

    fn on_begin_markup(&mut self) -> Result<(), RuleError> {
        self.guarded(RuleEvent::BeginMarkup, |r| {
            r.begin_container(RuleEvent::BeginMarkup, StateId::AwaitingMarkupName)?;
            r.receiver.on_begin_markup()
        })
    }

    fn on_begin_metadata(&mut self) -> Result<(), RuleError> {
        self.guarded(RuleEvent::BeginMetadata, |r| {
            r.begin_container(RuleEvent::BeginMetadata, StateId::AwaitingMetadataKey)?;
            r.receiver.on_begin_metadata()
        })
    }

    fn on_begin_comment(&mut self) -> Result<(), RuleError> {
        self.guarded(RuleEvent::BeginComment, |r| {
            r.begin_container(RuleEvent::BeginComment, StateId::AwaitingCommentContents)?;
            r.receiver.on_begin_comment()
        })
    }

    fn on_begin_marker(&mut self) -> Result<(), RuleError> {
        self.guarded(RuleEvent::BeginMarker, |r| {
            r.authorize(RuleEvent::BeginMarker)?;
            r.refs.begin_marker(&r.limits)?;
            r.stack.push(StateId::AwaitingMarkerId)?;
            r.receiver.on_begin_marker()
        })
    }

    fn on_begin_reference(&mut self) -> Result<(), RuleError> {
        self.guarded(RuleEvent::BeginReference, |r| {
            r.authorize(RuleEvent::BeginReference)?;
            r.refs.begin_reference(&r.limits)?;
            r.stack.push(StateId::AwaitingReferenceId)?;
            r.receiver.on_begin_reference()
        })
    }

    fn on_end(&mut self) -> Result<(), RuleError> {
        self.guarded(RuleEvent::EndContainer, |r| {
            r.authorize(RuleEvent::EndContainer)?;
            let top = r.stack.top();
            match top {
                StateId::AwaitingListItem => {
                    r.stack.pop()?;
                    r.complete(DataType::List, None)?;
                }
                StateId::AwaitingMapKey => {
                    r.stack.pop()?;
                    r.complete(DataType::Map, None)?;
                }
                StateId::AwaitingMarkupKey => {
                    r.stack.replace_top(StateId::AwaitingMarkupContents)?;
                }
                StateId::AwaitingMarkupContents => {
                    r.stack.pop()?;
                    r.complete(DataType::Markup, None)?;
                }
                StateId::AwaitingMetadataKey => {
                    r.stack.pop()?;
                    r.stack.push(StateId::AwaitingMetadataObject)?;
                }
                StateId::AwaitingCommentContents => {
                    r.stack.pop()?;
                }
                _ => return Err(RuleError::grammar(RuleEvent::EndContainer, top)),
            }
            r.receiver.on_end()
        })
    }

    fn on_begin_array(&mut self, array_type: ArrayType) -> Result<(), RuleError> {
        let event = array_type.begin_event();
        self.guarded(event, |r| {
            r.authorize(event)?;
            let purpose = match r.stack.top() {
                StateId::AwaitingMarkerId => ArrayPurpose::MarkerId,
                StateId::AwaitingReferenceId => ArrayPurpose::ReferenceId,
                StateId::AwaitingMarkupName => ArrayPurpose::MarkupName,
                StateId::AwaitingCommentContents => ArrayPurpose::Comment,
                _ => ArrayPurpose::Value,
            };
            r.array.begin(array_type, purpose, &r.limits);
            r.stack.push(StateId::AwaitingArrayChunk)?;
            r.receiver.on_begin_array(array_type)
        })
    }

    fn on_array_chunk(&mut self, len: u64, more: bool) -> Result<(), RuleError> {
        self.guarded(RuleEvent::ArrayChunk, |r| {
            r.authorize(RuleEvent::ArrayChunk)?;
            let progress = r.array.begin_chunk(len, more)?;
            r.advance_array(progress)?;
            r.receiver.on_array_chunk(len, more)
        })
    }

    fn on_array_data(&mut self, data: &[u8]) -> Result<(), RuleError> {
        self.guarded(RuleEvent::ArrayData, |r| {
            r.authorize(RuleEvent::ArrayData)?;
            let progress = r.array.add_data(data)?;
            r.advance_array(progress)?;
            r.receiver.on_array_data(data)
        })
    }

    fn on_end_document(&mut self) -> Result<(), RuleError> {
        self.guarded(RuleEvent::EndDocument, |r| {
            r.authorize(RuleEvent::EndDocument)?;
            r.stack.replace_top(StateId::DocumentEnded)?;
            r.receiver.on_end_document()
        })
    }
}
