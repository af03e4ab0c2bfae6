//! Character-class validators for string-like array content.

use crate::utf8;
use crate::{ErrorCode, RuleError};

/// Maximum runes in a marker identifier or markup name.
pub const MAX_ID_RUNES: usize = 50;

/// Maximum bytes in a marker identifier or markup name.
pub const MAX_ID_BYTES: usize = 200;

/// Validate that `bytes` are UTF-8 and return them as `&str`.
///
/// # Errors
///
/// Returns `InvalidUTF8` if `bytes` are not valid UTF-8.
pub fn validate_utf8(bytes: &[u8]) -> Result<&str, RuleError> {
    utf8::validate(bytes).map_err(|()| RuleError::new(ErrorCode::InvalidUTF8))
}

/// Returns `true` iff `c` may appear inside a comment.
///
/// Forbidden: C0 controls other than TAB, LF and CR; DEL; C1 controls; the Unicode line and
/// paragraph separators.
#[must_use]
pub const fn is_comment_char(c: char) -> bool {
    !matches!(
        c,
        '\u{00}'..='\u{08}'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{0e}'..='\u{1f}'
            | '\u{7f}'..='\u{9f}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Returns `true` iff `c` may appear inside a URI.
#[must_use]
pub const fn is_uri_char(c: char) -> bool {
    !matches!(c, '\u{00}'..='\u{20}' | '\u{7f}'..='\u{9f}')
}

/// Check one comment rune.
///
/// # Errors
///
/// Returns `InvalidCommentCharacter` for a forbidden rune.
pub const fn check_comment_char(c: char) -> Result<(), ErrorCode> {
    if is_comment_char(c) {
        Ok(())
    } else {
        Err(ErrorCode::InvalidCommentCharacter)
    }
}

/// Check one URI rune.
///
/// # Errors
///
/// Returns `InvalidURICharacter` for a forbidden rune.
pub const fn check_uri_char(c: char) -> Result<(), ErrorCode> {
    if is_uri_char(c) {
        Ok(())
    } else {
        Err(ErrorCode::InvalidURICharacter)
    }
}

/// Validate complete comment text.
///
/// # Errors
///
/// Returns `InvalidCommentCharacter` if any rune is forbidden.
pub fn validate_comment(text: &str) -> Result<(), RuleError> {
    text.chars()
        .try_for_each(check_comment_char)
        .map_err(RuleError::new)
}

fn is_id_start(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_id_char(c: char) -> bool {
    matches!(c, '_' | '-' | '.') || c.is_alphanumeric()
}

/// Validate a marker identifier or markup name.
///
/// The identifier must be non-empty, start with an alphanumeric or underscore, continue
/// with alphanumerics, `_`, `-` or `.`, and be at most [`MAX_ID_RUNES`] runes and
/// [`MAX_ID_BYTES`] bytes long.
///
/// # Errors
///
/// Returns `IDTooLong` if the identifier is too long and `InvalidMarkerIDCharacter` if it is
/// empty or contains a forbidden rune.
pub fn validate_marker_id(id: &str) -> Result<(), RuleError> {
    if id.len() > MAX_ID_BYTES {
        return Err(RuleError::new(ErrorCode::IDTooLong));
    }
    let mut chars = id.chars();
    let first = chars
        .next()
        .ok_or_else(|| RuleError::new(ErrorCode::InvalidMarkerIDCharacter))?;
    if !is_id_start(first) {
        return Err(RuleError::new(ErrorCode::InvalidMarkerIDCharacter));
    }
    let mut runes = 1usize;
    for c in chars {
        if !is_id_char(c) {
            return Err(RuleError::new(ErrorCode::InvalidMarkerIDCharacter));
        }
        runes += 1;
    }
    if runes > MAX_ID_RUNES {
        return Err(RuleError::new(ErrorCode::IDTooLong));
    }
    Ok(())
}
