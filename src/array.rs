//! Chunked array bookkeeping.

use alloc::string::String;
use alloc::vec::Vec;

use crate::content::{check_comment_char, check_uri_char, validate_marker_id};
use crate::event::{ArrayType, Identifier};
use crate::utf8::Utf8Reassembler;
use crate::{ErrorCode, Limits, RuleError};

/// What a streamed array will become once complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayPurpose {
    /// An ordinary data object.
    Value,
    /// Text inside a comment.
    Comment,
    /// A marker identifier.
    MarkerId,
    /// A reference identifier.
    ReferenceId,
    /// A markup element name.
    MarkupName,
}

impl ArrayPurpose {
    const fn captures(self) -> bool {
        matches!(self, Self::MarkerId | Self::ReferenceId | Self::MarkupName)
    }
}

/// Progress of the array after a chunk header or data fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkProgress {
    /// The current chunk still expects bytes.
    AwaitingData,
    /// The current chunk is done and more chunks follow.
    AwaitingChunk,
    /// The final chunk is done.
    Complete,
}

/// Bookkeeping for the array currently being streamed.
#[derive(Debug, Clone)]
pub struct ArrayContext {
    array_type: ArrayType,
    purpose: ArrayPurpose,
    max_len: u64,
    too_long: ErrorCode,
    chunk_expected: u64,
    chunk_written: u64,
    total_len: u64,
    more_chunks: bool,
    utf8: Utf8Reassembler,
    captured: Vec<u8>,
}

impl Default for ArrayContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrayContext {
    /// Create an idle context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            array_type: ArrayType::Uint8,
            purpose: ArrayPurpose::Value,
            max_len: 0,
            too_long: ErrorCode::ArrayTooLong,
            chunk_expected: 0,
            chunk_written: 0,
            total_len: 0,
            more_chunks: false,
            utf8: Utf8Reassembler::new(),
            captured: Vec::new(),
        }
    }

    /// Start a new array, discarding any previous state.
    pub fn begin(&mut self, array_type: ArrayType, purpose: ArrayPurpose, limits: &Limits) {
        let (max_len, too_long) = match (purpose, array_type) {
            (_, ArrayType::Uri) => (limits.max_uri_len, ErrorCode::URITooLong),
            (ArrayPurpose::MarkerId | ArrayPurpose::ReferenceId | ArrayPurpose::MarkupName, _) => {
                (limits.max_id_len, ErrorCode::IDTooLong)
            }
            (_, ArrayType::String | ArrayType::CustomText) => {
                (limits.max_string_len, ErrorCode::StringTooLong)
            }
            _ => (limits.max_array_len, ErrorCode::ArrayTooLong),
        };
        self.array_type = array_type;
        self.purpose = purpose;
        self.max_len = max_len;
        self.too_long = too_long;
        self.chunk_expected = 0;
        self.chunk_written = 0;
        self.total_len = 0;
        self.more_chunks = false;
        self.utf8.clear();
        self.captured.clear();
    }

    /// Discard all state.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Type of the array being streamed.
    #[must_use]
    pub const fn array_type(&self) -> ArrayType {
        self.array_type
    }

    /// Purpose of the array being streamed.
    #[must_use]
    pub const fn purpose(&self) -> ArrayPurpose {
        self.purpose
    }

    /// Total payload bytes declared so far.
    #[must_use]
    pub const fn total_len(&self) -> u64 {
        self.total_len
    }

    /// Start a chunk of `count` elements. The chunk's byte length comes from
    /// [`ArrayType::byte_len`], so bit chunks are padded to whole bytes independently.
    ///
    /// # Errors
    ///
    /// Returns the array's length error if the running total exceeds its limit.
    pub fn begin_chunk(&mut self, count: u64, more: bool) -> Result<ChunkProgress, RuleError> {
        let bytes = self
            .array_type
            .byte_len(count)
            .ok_or_else(|| RuleError::new(ErrorCode::LengthOverflow))?;
        let total = self
            .total_len
            .checked_add(bytes)
            .ok_or_else(|| RuleError::new(ErrorCode::LengthOverflow))?;
        if total > self.max_len {
            return Err(RuleError::new(self.too_long));
        }
        self.total_len = total;
        self.chunk_expected = bytes;
        self.chunk_written = 0;
        self.more_chunks = more;
        Ok(self.progress())
    }

    /// Add a payload fragment to the current chunk.
    ///
    /// # Errors
    ///
    /// Returns `ChunkOverflow` if the fragment exceeds the chunk, or a content error if the
    /// bytes are not acceptable for this array.
    pub fn add_data(&mut self, bytes: &[u8]) -> Result<ChunkProgress, RuleError> {
        let len =
            u64::try_from(bytes.len()).map_err(|_| RuleError::new(ErrorCode::LengthOverflow))?;
        let remaining = self.chunk_expected - self.chunk_written;
        if len > remaining {
            return Err(RuleError::new(ErrorCode::ChunkOverflow));
        }

        if self.array_type.is_utf8() {
            let checker: fn(char) -> Result<(), ErrorCode> =
                match (self.purpose, self.array_type) {
                    (ArrayPurpose::Comment, _) => check_comment_char,
                    (_, ArrayType::Uri) => check_uri_char,
                    _ => |_| Ok(()),
                };
            self.utf8.feed(bytes, checker).map_err(RuleError::new)?;
        }
        if self.purpose.captures() {
            self.captured.extend_from_slice(bytes);
        }

        self.chunk_written += len;
        Ok(self.progress())
    }

    const fn progress(&self) -> ChunkProgress {
        if self.chunk_written < self.chunk_expected {
            ChunkProgress::AwaitingData
        } else if self.more_chunks {
            ChunkProgress::AwaitingChunk
        } else {
            ChunkProgress::Complete
        }
    }

    /// Finalize a completed array.
    ///
    /// Returns the collected identifier when the array is a marker or reference identifier.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUTF8` if a rune was left incomplete, or an identifier error for invalid
    /// identifiers and markup names.
    pub fn finish(&mut self) -> Result<Option<Identifier>, RuleError> {
        if self.array_type.is_utf8() {
            self.utf8.finish().map_err(RuleError::new)?;
        }
        if !self.purpose.captures() {
            return Ok(None);
        }

        let bytes = core::mem::take(&mut self.captured);
        let text = String::from_utf8(bytes).map_err(|_| RuleError::new(ErrorCode::InvalidUTF8))?;
        match (self.purpose, self.array_type) {
            (ArrayPurpose::ReferenceId, ArrayType::Uri) => Ok(Some(Identifier::Uri(text))),
            (ArrayPurpose::MarkupName, _) => {
                validate_marker_id(&text)?;
                Ok(None)
            }
            _ => {
                validate_marker_id(&text)?;
                Ok(Some(Identifier::String(text)))
            }
        }
    }
}
