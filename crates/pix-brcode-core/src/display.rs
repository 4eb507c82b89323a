// crates/pix-brcode-core/src/display.rs
// ============================================================================
// Module: PIX Key Display Formatting
// Description: Human-friendly rendering of stored PIX keys.
// Purpose: Cosmetic formatting for UIs; never used for payload generation.
// Dependencies: crate::key
// ============================================================================

//! ## Overview
//! Tax ids and phones are grouped with the usual Brazilian punctuation.
//! Emails and random keys are shown as stored, without case changes.
//!
//! [`format_pix_key_for_display`] never fails: a tax id with too few digits
//! renders with missing groups, while one with too many digits and a phone
//! that is not 11 digits are returned as given. No digit is ever dropped.
//! [`try_format_pix_key_for_display`] rejects those inputs instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::key::CNPJ_DIGITS;
use crate::key::CPF_DIGITS;
use crate::key::PixKeyError;
use crate::key::PixKeyType;
use crate::key::digits_only;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Digits in a national mobile number (area code plus 9-digit subscriber).
const PHONE_DIGITS: usize = 11;

// ============================================================================
// SECTION: Formatting
// ============================================================================

/// Formats a stored key for display.
#[must_use]
pub fn format_pix_key_for_display(key: &str, key_type: PixKeyType) -> String {
    match key_type {
        PixKeyType::Cpf => {
            let digits = digits_only(key);
            if digits.len() > CPF_DIGITS { key.to_string() } else { format_cpf(&digits) }
        }
        PixKeyType::Cnpj => {
            let digits = digits_only(key);
            if digits.len() > CNPJ_DIGITS { key.to_string() } else { format_cnpj(&digits) }
        }
        PixKeyType::Phone => {
            let digits = digits_only(key);
            if digits.len() == PHONE_DIGITS { format_phone(&digits) } else { key.to_string() }
        }
        PixKeyType::Email | PixKeyType::Random => key.to_string(),
    }
}

/// Formats a stored key for display, rejecting wrong digit counts.
///
/// # Errors
///
/// Returns [`PixKeyError::InvalidLength`] when a CPF, CNPJ, or phone key does
/// not have exactly 11, 14, or 11 digits respectively.
pub fn try_format_pix_key_for_display(
    key: &str,
    key_type: PixKeyType,
) -> Result<String, PixKeyError> {
    let expected = match key_type {
        PixKeyType::Cpf => Some((CPF_DIGITS, "11")),
        PixKeyType::Cnpj => Some((CNPJ_DIGITS, "14")),
        PixKeyType::Phone => Some((PHONE_DIGITS, "11")),
        PixKeyType::Email | PixKeyType::Random => None,
    };
    if let Some((count, label)) = expected {
        let actual = digits_only(key).len();
        if actual != count {
            return Err(PixKeyError::InvalidLength {
                key_type,
                expected: label,
                actual,
            });
        }
    }
    Ok(format_pix_key_for_display(key, key_type))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// `NNN.NNN.NNN-NN`
fn format_cpf(digits: &str) -> String {
    format!(
        "{}.{}.{}-{}",
        group(digits, 0, 3),
        group(digits, 3, 6),
        group(digits, 6, 9),
        group(digits, 9, 11)
    )
}

/// `NN.NNN.NNN/NNNN-NN`
fn format_cnpj(digits: &str) -> String {
    format!(
        "{}.{}.{}/{}-{}",
        group(digits, 0, 2),
        group(digits, 2, 5),
        group(digits, 5, 8),
        group(digits, 8, 12),
        group(digits, 12, 14)
    )
}

/// `(NN) NNNNN-NNNN`
fn format_phone(digits: &str) -> String {
    format!("({}) {}-{}", group(digits, 0, 2), group(digits, 2, 7), group(digits, 7, 11))
}

/// Returns `digits[start..end]`, clamped to the available digits.
fn group(digits: &str, start: usize, end: usize) -> &str {
    let end = end.min(digits.len());
    let start = start.min(end);
    digits.get(start .. end).unwrap_or("")
}
