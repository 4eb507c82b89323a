// crates/pix-brcode-core/src/tlv.rs
// ============================================================================
// Module: BR Code TLV Encoding
// Description: Tag-Length-Value field encoding and parsing for EMV QR text.
// Purpose: Provide the single field rule used for top-level and nested fields.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A BR Code is a flat string of fields, each written as a 2-digit tag, a
//! 2-digit decimal length, and the value itself. Templates (merchant account
//! information, additional data) nest by encoding an inner field string as
//! the value of an outer field.
//!
//! Lengths count characters, not bytes, and are recomputed on every encode.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of characters in a tag.
pub const TAG_WIDTH: usize = 2;

/// Number of characters in a length prefix.
pub const LENGTH_WIDTH: usize = 2;

/// Largest value length representable in a 2-digit length prefix.
pub const MAX_VALUE_LENGTH: usize = 99;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while encoding or parsing TLV fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TlvError {
    /// Tag is not exactly two ASCII digits.
    #[error("invalid tag {tag:?}: expected two digits")]
    InvalidTag {
        /// Offending tag text.
        tag: String,
    },
    /// Value does not fit in a 2-digit length prefix.
    #[error("value for tag {tag} is {length} characters (max 99)")]
    ValueTooLong {
        /// Tag of the oversized field.
        tag: String,
        /// Value length in characters.
        length: usize,
    },
    /// Input ended inside a tag or length prefix.
    #[error("truncated field header at offset {offset}")]
    TruncatedHeader {
        /// Character offset where the header starts.
        offset: usize,
    },
    /// Length prefix is not two ASCII digits.
    #[error("invalid length {length:?} for tag {tag}")]
    InvalidLength {
        /// Tag of the field.
        tag: String,
        /// Offending length text.
        length: String,
    },
    /// Declared value runs past the end of the input.
    #[error("value for tag {tag} declares {declared} characters but only {available} remain")]
    TruncatedValue {
        /// Tag of the field.
        tag: String,
        /// Declared value length.
        declared: usize,
        /// Characters left in the input.
        available: usize,
    },
}

// ============================================================================
// SECTION: Field
// ============================================================================

/// A decoded TLV field.
///
/// # Invariants
/// - `tag` is two ASCII digits when produced by [`parse_fields`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    /// Two-digit field identifier.
    pub tag: String,
    /// Field value, verbatim.
    pub value: String,
}

impl TlvField {
    /// Creates a field from a tag and value.
    #[must_use]
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }

    /// Encodes this field with [`encode_field`].
    #[must_use]
    pub fn encode(&self) -> String {
        encode_field(&self.tag, &self.value)
    }
}

// ============================================================================
// SECTION: Encoding
// ============================================================================

/// Encodes `tag` + zero-padded length + `value`.
///
/// Total: nothing is validated or truncated here. A value longer than 99
/// characters produces a length prefix wider than two digits, matching the
/// reference generator; use [`try_encode_field`] to reject it instead.
#[must_use]
pub fn encode_field(tag: &str, value: &str) -> String {
    let length = value.chars().count();
    format!("{tag}{length:02}{value}")
}

/// Encodes a field after checking the tag shape and value length.
///
/// # Errors
///
/// Returns [`TlvError::InvalidTag`] when `tag` is not two ASCII digits and
/// [`TlvError::ValueTooLong`] when `value` exceeds 99 characters.
pub fn try_encode_field(tag: &str, value: &str) -> Result<String, TlvError> {
    if !is_two_digits(tag) {
        return Err(TlvError::InvalidTag {
            tag: tag.to_string(),
        });
    }
    let length = value.chars().count();
    if length > MAX_VALUE_LENGTH {
        return Err(TlvError::ValueTooLong {
            tag: tag.to_string(),
            length,
        });
    }
    Ok(encode_field(tag, value))
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Splits a TLV string into its ordered fields.
///
/// # Errors
///
/// Returns [`TlvError`] when a header is truncated or non-numeric, or when a
/// declared value length runs past the end of `input`.
pub fn parse_fields(input: &str) -> Result<Vec<TlvField>, TlvError> {
    let chars: Vec<char> = input.chars().collect();
    let mut fields = Vec::new();
    let mut offset = 0;
    while offset < chars.len() {
        let header_end = offset + TAG_WIDTH + LENGTH_WIDTH;
        let Some(header) = chars.get(offset .. header_end) else {
            return Err(TlvError::TruncatedHeader {
                offset,
            });
        };
        let tag: String = header[.. TAG_WIDTH].iter().collect();
        if !is_two_digits(&tag) {
            return Err(TlvError::InvalidTag {
                tag,
            });
        }
        let length_text: String = header[TAG_WIDTH ..].iter().collect();
        let declared = parse_length(&length_text).ok_or_else(|| TlvError::InvalidLength {
            tag: tag.clone(),
            length: length_text.clone(),
        })?;
        let value_end = header_end + declared;
        let Some(value) = chars.get(header_end .. value_end) else {
            return Err(TlvError::TruncatedValue {
                tag,
                declared,
                available: chars.len() - header_end,
            });
        };
        fields.push(TlvField {
            tag,
            value: value.iter().collect(),
        });
        offset = value_end;
    }
    Ok(fields)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when `text` is exactly two ASCII digits.
fn is_two_digits(text: &str) -> bool {
    text.len() == 2 && text.bytes().all(|byte| byte.is_ascii_digit())
}

/// Parses a 2-digit decimal length prefix.
fn parse_length(text: &str) -> Option<usize> {
    if !is_two_digits(text) {
        return None;
    }
    text.parse().ok()
}
