#[cfg(feature = "simdutf8")]
use simdutf8::compat as simd_utf8;

use crate::ErrorCode;

/// Failure position reported by [`decode_prefix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf8Failure {
    /// Length of the longest valid prefix.
    pub valid_up_to: usize,
    /// `true` if the bytes after the valid prefix are the start of a truncated rune.
    pub incomplete: bool,
}

/// Validates UTF-8 bytes and returns a borrowed `&str` on success.
#[inline]
pub fn validate(bytes: &[u8]) -> Result<&str, ()> {
    decode_prefix(bytes).map_err(|_| ())
}

/// Decode `bytes`, reporting where decoding stopped and whether the tail is a truncated rune.
#[inline]
pub fn decode_prefix(bytes: &[u8]) -> Result<&str, Utf8Failure> {
    #[cfg(feature = "simdutf8")]
    {
        simd_utf8::from_utf8(bytes).map_err(|e| Utf8Failure {
            valid_up_to: e.valid_up_to(),
            incomplete: e.error_len().is_none(),
        })
    }

    #[cfg(not(feature = "simdutf8"))]
    {
        core::str::from_utf8(bytes).map_err(|e| Utf8Failure {
            valid_up_to: e.valid_up_to(),
            incomplete: e.error_len().is_none(),
        })
    }
}

/// Encoded width of a rune from its leading byte, or `None` if it cannot lead a rune.
const fn rune_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7f => Some(1),
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

/// Incremental UTF-8 decoder for data delivered in arbitrary fragments.
///
/// A rune split across fragments is held (at most 3 bytes) until its remaining bytes arrive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Reassembler {
    pending: [u8; 4],
    len: usize,
}

impl Utf8Reassembler {
    /// Create an empty reassembler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: [0; 4],
            len: 0,
        }
    }

    /// Returns `true` if no partial rune is held.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Discard any held bytes.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Feed a fragment, calling `on_char` for every completed rune in order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUTF8` on malformed input, or the first error returned by `on_char`.
    pub fn feed<F>(&mut self, bytes: &[u8], mut on_char: F) -> Result<(), ErrorCode>
    where
        F: FnMut(char) -> Result<(), ErrorCode>,
    {
        let mut rest = bytes;

        if self.len > 0 {
            let width = rune_width(self.pending[0]).ok_or(ErrorCode::InvalidUTF8)?;
            let take = (width - self.len).min(rest.len());
            self.pending[self.len..self.len + take].copy_from_slice(&rest[..take]);
            self.len += take;
            rest = &rest[take..];

            match decode_prefix(&self.pending[..self.len]) {
                Ok(s) => {
                    self.len = 0;
                    for c in s.chars() {
                        on_char(c)?;
                    }
                }
                Err(e) if e.incomplete && self.len < width => return Ok(()),
                Err(_) => return Err(ErrorCode::InvalidUTF8),
            }
        }

        match decode_prefix(rest) {
            Ok(s) => {
                for c in s.chars() {
                    on_char(c)?;
                }
                Ok(())
            }
            Err(e) => {
                let (valid, tail) = rest.split_at(e.valid_up_to);
                let s = decode_prefix(valid).map_err(|_| ErrorCode::InvalidUTF8)?;
                for c in s.chars() {
                    on_char(c)?;
                }
                if !e.incomplete {
                    return Err(ErrorCode::InvalidUTF8);
                }
                self.pending[..tail.len()].copy_from_slice(tail);
                self.len = tail.len();
                Ok(())
            }
        }
    }

    /// Declare the end of input.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUTF8` if a partial rune is still held.
    pub fn finish(&mut self) -> Result<(), ErrorCode> {
        if self.len != 0 {
            self.len = 0;
            return Err(ErrorCode::InvalidUTF8);
        }
        Ok(())
    }
}
