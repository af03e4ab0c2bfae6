//! Event vocabulary shared by the engine, its producers and its receivers.

use alloc::string::String;
use core::fmt;

/// Category of an incoming event, used for legality checks.
///
/// `BeginBytes` covers byte arrays and every typed numeric, bit and UUID array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RuleEvent {
    /// Document version header.
    Version,
    /// Padding (no semantic content).
    Padding,
    /// Nil value.
    Nil,
    /// Boolean value.
    Bool,
    /// Non-negative integer.
    PositiveInt,
    /// Negative integer.
    NegativeInt,
    /// Floating point number (not NaN).
    Float,
    /// Not-a-number.
    NaN,
    /// UUID value.
    UUID,
    /// Date/time value.
    Time,
    /// Start of a list.
    BeginList,
    /// Start of a map.
    BeginMap,
    /// Start of a markup element.
    BeginMarkup,
    /// Start of a metadata map.
    BeginMetadata,
    /// Start of a comment.
    BeginComment,
    /// Start of a marker.
    BeginMarker,
    /// Start of a reference.
    BeginReference,
    /// End of the innermost container.
    EndContainer,
    /// Start of a byte or typed array.
    BeginBytes,
    /// Start of a string.
    BeginString,
    /// Start of a URI.
    BeginURI,
    /// Start of a custom binary or text array.
    BeginCustom,
    /// Array chunk header.
    ArrayChunk,
    /// Array payload fragment.
    ArrayData,
    /// End of the document.
    EndDocument,
}

impl RuleEvent {
    const fn name(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Padding => "padding",
            Self::Nil => "nil",
            Self::Bool => "boolean",
            Self::PositiveInt => "positive integer",
            Self::NegativeInt => "negative integer",
            Self::Float => "float",
            Self::NaN => "NaN",
            Self::UUID => "UUID",
            Self::Time => "time",
            Self::BeginList => "begin list",
            Self::BeginMap => "begin map",
            Self::BeginMarkup => "begin markup",
            Self::BeginMetadata => "begin metadata",
            Self::BeginComment => "begin comment",
            Self::BeginMarker => "begin marker",
            Self::BeginReference => "begin reference",
            Self::EndContainer => "end container",
            Self::BeginBytes => "begin bytes",
            Self::BeginString => "begin string",
            Self::BeginURI => "begin URI",
            Self::BeginCustom => "begin custom",
            Self::ArrayChunk => "array chunk",
            Self::ArrayData => "array data",
            Self::EndDocument => "end document",
        }
    }
}

impl fmt::Display for RuleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`RuleEvent`] categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventSet(u32);

impl EventSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Every category that denotes a data object (scalar, container or array).
    pub const OBJECT: Self = Self::of(&[
        RuleEvent::Nil,
        RuleEvent::Bool,
        RuleEvent::PositiveInt,
        RuleEvent::NegativeInt,
        RuleEvent::Float,
        RuleEvent::NaN,
        RuleEvent::UUID,
        RuleEvent::Time,
        RuleEvent::BeginList,
        RuleEvent::BeginMap,
        RuleEvent::BeginMarkup,
        RuleEvent::BeginBytes,
        RuleEvent::BeginString,
        RuleEvent::BeginURI,
        RuleEvent::BeginCustom,
    ]);

    /// Categories usable as a map key.
    pub const KEYABLE: Self = Self::of(&[
        RuleEvent::Bool,
        RuleEvent::PositiveInt,
        RuleEvent::NegativeInt,
        RuleEvent::Float,
        RuleEvent::UUID,
        RuleEvent::Time,
        RuleEvent::BeginString,
        RuleEvent::BeginURI,
    ]);

    /// Wrappers that may precede or surround an object without being one.
    pub const WRAPPERS: Self = Self::of(&[
        RuleEvent::Padding,
        RuleEvent::BeginComment,
        RuleEvent::BeginMetadata,
        RuleEvent::BeginMarker,
    ]);

    /// Categories that can form a marker identifier.
    pub const MARKER_ID: Self = Self::of(&[RuleEvent::PositiveInt, RuleEvent::BeginString]);

    /// Categories that can form a reference identifier.
    pub const REFERENCE_ID: Self = Self::MARKER_ID.with(RuleEvent::BeginURI);

    /// Build a set from a list of categories.
    #[must_use]
    pub const fn of(events: &[RuleEvent]) -> Self {
        let mut set = Self::EMPTY;
        let mut i = 0;
        while i < events.len() {
            set = set.with(events[i]);
            i += 1;
        }
        set
    }

    const fn bit(event: RuleEvent) -> u32 {
        1 << event as u32
    }

    /// Return this set plus `event`.
    #[must_use]
    pub const fn with(self, event: RuleEvent) -> Self {
        Self(self.0 | Self::bit(event))
    }

    /// Return the union of two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Return the categories present in both sets.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Returns `true` iff `event` is in the set.
    #[must_use]
    pub const fn contains(self, event: RuleEvent) -> bool {
        self.0 & Self::bit(event) != 0
    }

    /// Returns `true` iff the set has no categories.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Element type of a streamed array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayType {
    /// UTF-8 string.
    String,
    /// UTF-8 URI.
    Uri,
    /// Custom binary payload.
    CustomBinary,
    /// Custom UTF-8 text payload.
    CustomText,
    /// Packed bits, eight elements per byte.
    Bit,
    /// Unsigned 8-bit elements (a plain byte array).
    Uint8,
    /// Unsigned 16-bit elements.
    Uint16,
    /// Unsigned 32-bit elements.
    Uint32,
    /// Unsigned 64-bit elements.
    Uint64,
    /// Signed 8-bit elements.
    Int8,
    /// Signed 16-bit elements.
    Int16,
    /// Signed 32-bit elements.
    Int32,
    /// Signed 64-bit elements.
    Int64,
    /// 16-bit (bfloat16) floats.
    Float16,
    /// 32-bit floats.
    Float32,
    /// 64-bit floats.
    Float64,
    /// 16-byte UUIDs.
    Uuid,
}

impl ArrayType {
    /// The begin event that opens an array of this type.
    #[must_use]
    pub const fn begin_event(self) -> RuleEvent {
        match self {
            Self::String => RuleEvent::BeginString,
            Self::Uri => RuleEvent::BeginURI,
            Self::CustomBinary | Self::CustomText => RuleEvent::BeginCustom,
            _ => RuleEvent::BeginBytes,
        }
    }

    /// The type class of a completed array of this type.
    #[must_use]
    pub const fn data_type(self) -> DataType {
        match self {
            Self::String => DataType::String,
            Self::Uri => DataType::Uri,
            Self::CustomBinary | Self::CustomText => DataType::Custom,
            _ => DataType::Array,
        }
    }

    /// Returns `true` iff the payload must be valid UTF-8.
    #[must_use]
    pub const fn is_utf8(self) -> bool {
        matches!(self, Self::String | Self::Uri | Self::CustomText)
    }

    /// Payload byte length of `count` elements, or `None` on overflow.
    ///
    /// Bit arrays are packed per chunk: each chunk starts on a fresh byte and rounds its own
    /// element count up, so chunks of 3 and 5 bits carry two bytes where one chunk of 8 carries
    /// one.
    #[must_use]
    pub const fn byte_len(self, count: u64) -> Option<u64> {
        let width: u64 = match self {
            Self::Bit => return Some(count.div_ceil(8)),
            Self::String
            | Self::Uri
            | Self::CustomBinary
            | Self::CustomText
            | Self::Uint8
            | Self::Int8 => 1,
            Self::Uint16 | Self::Int16 | Self::Float16 => 2,
            Self::Uint32 | Self::Int32 | Self::Float32 => 4,
            Self::Uint64 | Self::Int64 | Self::Float64 => 8,
            Self::Uuid => 16,
        };
        count.checked_mul(width)
    }
}

/// The type class of a completed object, as seen by parent containers and references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    /// Nil.
    Nil,
    /// Boolean.
    Bool,
    /// Integer of either sign.
    Int,
    /// Float (not NaN).
    Float,
    /// Not-a-number.
    NaN,
    /// UUID.
    Uuid,
    /// Date/time.
    Time,
    /// String.
    String,
    /// URI.
    Uri,
    /// Custom binary or text.
    Custom,
    /// Byte or typed array.
    Array,
    /// List.
    List,
    /// Map.
    Map,
    /// Markup.
    Markup,
    /// Unknown type of an external (URI) reference; accepted everywhere.
    Any,
}

/// A set of [`DataType`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DataTypeSet(u16);

impl DataTypeSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Every data type.
    pub const ALL: Self = Self(u16::MAX);

    /// Types usable as a map key.
    pub const KEYABLE: Self = Self::of(&[
        DataType::Bool,
        DataType::Int,
        DataType::Float,
        DataType::Uuid,
        DataType::Time,
        DataType::String,
        DataType::Uri,
    ]);

    /// Types allowed inside markup contents.
    pub const MARKUP_CONTENT: Self = Self::of(&[DataType::String, DataType::Markup]);

    /// Build a set from a list of types.
    #[must_use]
    pub const fn of(types: &[DataType]) -> Self {
        let mut bits = 0u16;
        let mut i = 0;
        while i < types.len() {
            bits |= 1 << types[i] as u16;
            i += 1;
        }
        Self(bits)
    }

    /// Returns `true` iff an object of type `ty` may appear where this set is expected.
    ///
    /// [`DataType::Any`] is accepted by every non-empty set.
    #[must_use]
    pub const fn accepts(self, ty: DataType) -> bool {
        if self.0 == 0 {
            return false;
        }
        matches!(ty, DataType::Any) || self.0 & (1 << ty as u16) != 0
    }
}

/// A marker or reference identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Identifier {
    /// Unsigned integer identifier.
    Int(u64),
    /// String identifier.
    String(String),
    /// URI of an external document (references only).
    Uri(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
            Self::Uri(u) => write!(f, "@{u}"),
        }
    }
}

/// A date/time payload. The engine treats it as an opaque scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Time {
    /// Year (may be negative).
    pub year: i32,
    /// Month, 1-12.
    pub month: u8,
    /// Day of month, 1-31.
    pub day: u8,
    /// Hour, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
    /// Second, 0-60.
    pub second: u8,
    /// Nanoseconds within the second.
    pub nanosecond: u32,
    /// Offset from UTC in minutes.
    pub utc_offset_minutes: i16,
}
