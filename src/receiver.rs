use crate::event::{ArrayType, Time};
use crate::RuleError;

/// Per-event callback interface shared by producers, the rules engine and downstream consumers.
///
/// Producers call these in exactly the order events were parsed. Implementations must not
/// re-enter the engine that is calling them.
pub trait EventReceiver {
    /// Document version header; always the first event.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_version(&mut self, version: u64) -> Result<(), RuleError>;

    /// Padding.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_padding(&mut self) -> Result<(), RuleError>;

    /// Nil.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_nil(&mut self) -> Result<(), RuleError>;

    /// Boolean.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_bool(&mut self, value: bool) -> Result<(), RuleError>;

    /// Non-negative integer.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_positive_int(&mut self, value: u64) -> Result<(), RuleError>;

    /// Negative integer, given as its magnitude.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_negative_int(&mut self, magnitude: u64) -> Result<(), RuleError>;

    /// Float. A NaN `value` is treated as a NaN event by the rules engine.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_float(&mut self, value: f64) -> Result<(), RuleError>;

    /// Not-a-number.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_nan(&mut self, signaling: bool) -> Result<(), RuleError>;

    /// UUID.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_uuid(&mut self, value: [u8; 16]) -> Result<(), RuleError>;

    /// Date/time.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_time(&mut self, value: Time) -> Result<(), RuleError>;

    /// Start of a list.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_begin_list(&mut self) -> Result<(), RuleError>;

    /// Start of a map.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_begin_map(&mut self) -> Result<(), RuleError>;

    /// Start of a markup element.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_begin_markup(&mut self) -> Result<(), RuleError>;

    /// Start of a metadata map.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_begin_metadata(&mut self) -> Result<(), RuleError>;

    /// Start of a comment.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_begin_comment(&mut self) -> Result<(), RuleError>;

    /// Start of a marker; followed by its identifier and then the marked object.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_begin_marker(&mut self) -> Result<(), RuleError>;

    /// Start of a reference; followed by its identifier.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_begin_reference(&mut self) -> Result<(), RuleError>;

    /// End of the innermost container (also ends markup attributes).
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_end(&mut self) -> Result<(), RuleError>;

    /// Start of an array.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_begin_array(&mut self, array_type: ArrayType) -> Result<(), RuleError>;

    /// Chunk header: `len` elements follow, then another chunk header if `more` is set.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_array_chunk(&mut self, len: u64, more: bool) -> Result<(), RuleError>;

    /// Payload fragment of the current chunk.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_array_data(&mut self, data: &[u8]) -> Result<(), RuleError>;

    /// End of document.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn on_end_document(&mut self) -> Result<(), RuleError>;

    /// Emit a complete single-chunk array of `len` elements.
    ///
    /// # Errors
    ///
    /// Propagates the first error from the underlying calls.
    fn on_array(&mut self, array_type: ArrayType, len: u64, data: &[u8]) -> Result<(), RuleError> {
        self.on_begin_array(array_type)?;
        self.on_array_chunk(len, false)?;
        if !data.is_empty() {
            self.on_array_data(data)?;
        }
        Ok(())
    }

    /// Emit a complete string.
    ///
    /// # Errors
    ///
    /// Propagates the first error from the underlying calls.
    fn on_string(&mut self, value: &str) -> Result<(), RuleError> {
        self.on_array(ArrayType::String, value.len() as u64, value.as_bytes())
    }
}

/// A receiver that accepts and discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReceiver;

impl EventReceiver for NullReceiver {
    fn on_version(&mut self, _: u64) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_padding(&mut self) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_nil(&mut self) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_bool(&mut self, _: bool) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_positive_int(&mut self, _: u64) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_negative_int(&mut self, _: u64) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_float(&mut self, _: f64) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_nan(&mut self, _: bool) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_uuid(&mut self, _: [u8; 16]) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_time(&mut self, _: Time) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_begin_list(&mut self) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_begin_map(&mut self) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_begin_markup(&mut self) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_begin_metadata(&mut self) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_begin_comment(&mut self) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_begin_marker(&mut self) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_begin_reference(&mut self) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_end(&mut self) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_begin_array(&mut self, _: ArrayType) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_array_chunk(&mut self, _: u64, _: bool) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_array_data(&mut self, _: &[u8]) -> Result<(), RuleError> {
        Ok(())
    }
    fn on_end_document(&mut self) -> Result<(), RuleError> {
        Ok(())
    }
}
