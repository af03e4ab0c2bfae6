use crate::{ErrorCode, RuleError};

/// Default maximum container nesting depth.
pub const DEFAULT_MAX_CONTAINER_DEPTH: usize = 1000;

/// Default maximum number of completed objects per document.
pub const DEFAULT_MAX_OBJECT_COUNT: u64 = 1_000_000;

/// Default maximum string length in UTF-8 bytes.
pub const DEFAULT_MAX_STRING_LEN: u64 = 100_000_000;

/// Default maximum byte/typed array length in bytes.
pub const DEFAULT_MAX_ARRAY_LEN: u64 = 1_000_000_000;

/// Default maximum URI length in bytes.
pub const DEFAULT_MAX_URI_LEN: u64 = 10_000;

/// Default maximum identifier (marker ID, markup name) length in bytes.
pub const DEFAULT_MAX_ID_LEN: u64 = 100;

/// Default maximum number of markers (and, separately, references) per document.
pub const DEFAULT_MAX_REFERENCE_COUNT: usize = 10_000;

/// Per-document resource ceilings enforced by the rules engine.
///
/// Limits are enforced while events stream in; a breach fails the offending event immediately.
/// All fields must be at least 1; see [`Limits::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Limits {
    /// Maximum container depth. Open lists, maps, markup, metadata and comments each count as
    /// one level; arrays, markers and references do not. Markers and metadata blocks still
    /// awaiting their object are held to the same ceiling in a separate count.
    pub max_container_depth: usize,
    /// Maximum count of completed objects.
    pub max_object_count: u64,
    /// Maximum string, custom text and comment string length in bytes.
    pub max_string_len: u64,
    /// Maximum byte, typed and custom binary array length in bytes.
    pub max_array_len: u64,
    /// Maximum URI length in bytes.
    pub max_uri_len: u64,
    /// Maximum identifier and markup name length in bytes.
    pub max_id_len: u64,
    /// Maximum marker count, and maximum reference count.
    pub max_reference_count: usize,
}

impl Limits {
    /// Construct validated limits.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLimits` if any ceiling is zero.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        max_container_depth: usize,
        max_object_count: u64,
        max_string_len: u64,
        max_array_len: u64,
        max_uri_len: u64,
        max_id_len: u64,
        max_reference_count: usize,
    ) -> Result<Self, RuleError> {
        let limits = Self {
            max_container_depth,
            max_object_count,
            max_string_len,
            max_array_len,
            max_uri_len,
            max_id_len,
            max_reference_count,
        };
        match limits.validate() {
            Ok(()) => Ok(limits),
            Err(e) => Err(e),
        }
    }

    /// Check that every ceiling is at least 1.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLimits` if any ceiling is zero.
    pub const fn validate(&self) -> Result<(), RuleError> {
        if self.max_container_depth == 0
            || self.max_object_count == 0
            || self.max_string_len == 0
            || self.max_array_len == 0
            || self.max_uri_len == 0
            || self.max_id_len == 0
            || self.max_reference_count == 0
        {
            return Err(RuleError::new(ErrorCode::InvalidLimits));
        }
        Ok(())
    }

    /// Limits scaled for documents of at most `max_document_bytes` bytes.
    ///
    /// No array or string may be longer than the document and no document can hold more objects
    /// than bytes. Depth, identifier and reference ceilings keep their defaults.
    #[must_use]
    pub fn for_document_bytes(max_document_bytes: u64) -> Self {
        let cap = max_document_bytes.max(1);
        let d = Self::default();
        Self {
            max_object_count: d.max_object_count.min(cap),
            max_string_len: d.max_string_len.min(cap),
            max_array_len: d.max_array_len.min(cap),
            max_uri_len: d.max_uri_len.min(cap),
            max_id_len: d.max_id_len.min(cap),
            ..d
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_container_depth: DEFAULT_MAX_CONTAINER_DEPTH,
            max_object_count: DEFAULT_MAX_OBJECT_COUNT,
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_array_len: DEFAULT_MAX_ARRAY_LEN,
            max_uri_len: DEFAULT_MAX_URI_LEN,
            max_id_len: DEFAULT_MAX_ID_LEN,
            max_reference_count: DEFAULT_MAX_REFERENCE_COUNT,
        }
    }
}
