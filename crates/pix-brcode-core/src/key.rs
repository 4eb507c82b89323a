// crates/pix-brcode-core/src/key.rs
// ============================================================================
// Module: PIX Key Formatting
// Description: Key types, transmission normalization, and strict key parsing.
// Purpose: Turn user-entered PIX keys into the canonical form carried in tag 26.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A PIX key is an alias for a bank account: a CPF or CNPJ tax id, an email
//! address, a phone number, or a random (EVP) token. Each type has a
//! canonical transmission form.
//!
//! [`normalize_pix_key`] is total and never rejects input; malformed keys
//! produce malformed (but present) output. [`PixKey::parse`] is the strict
//! path: it normalizes, then validates digit counts, check digits, and
//! address shapes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Brazilian country calling code.
pub const BRAZIL_COUNTRY_CODE: &str = "55";

/// Number of digits in a CPF.
pub const CPF_DIGITS: usize = 11;

/// Number of digits in a CNPJ.
pub const CNPJ_DIGITS: usize = 14;

/// Maximum length of an email key accepted by the PIX directory.
pub const MAX_EMAIL_KEY_LENGTH: usize = 77;

/// CNPJ weights for the first check digit.
const CNPJ_WEIGHTS_FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// CNPJ weights for the second check digit.
const CNPJ_WEIGHTS_SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

// ============================================================================
// SECTION: Key Type
// ============================================================================

/// PIX key alias type.
///
/// # Invariants
/// - Variants and their labels are stable for configuration and CLI parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixKeyType {
    /// Individual tax id (CPF, 11 digits).
    Cpf,
    /// Business tax id (CNPJ, 14 digits).
    Cnpj,
    /// Email address.
    Email,
    /// Phone number in E.164 form.
    Phone,
    /// Random key (EVP), a UUID issued by the bank.
    Random,
}

impl PixKeyType {
    /// All key types in display order.
    pub const ALL: [Self; 5] = [Self::Cpf, Self::Cnpj, Self::Email, Self::Phone, Self::Random];

    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cpf => "cpf",
            Self::Cnpj => "cnpj",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for PixKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a key type label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pix key type: {0}")]
pub struct UnknownKeyType(pub String);

impl FromStr for PixKeyType {
    type Err = UnknownKeyType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "cpf" | "tax-id-individual" => Ok(Self::Cpf),
            "cnpj" | "tax-id-business" => Ok(Self::Cnpj),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "random" | "random-token" | "evp" => Ok(Self::Random),
            _ => Err(UnknownKeyType(value.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Phone Rule
// ============================================================================

/// Strategy for deciding whether a phone key already carries the `55` prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneCountryCodeRule {
    /// Any digit string starting with `55` is treated as international.
    #[default]
    LegacyPrefix,
    /// 10–11 digits are national; 12–13 digits starting with `55` are
    /// international. Other shapes fall back to [`Self::LegacyPrefix`].
    LengthBased,
}

impl PhoneCountryCodeRule {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LegacyPrefix => "legacy_prefix",
            Self::LengthBased => "length_based",
        }
    }
}

impl FromStr for PhoneCountryCodeRule {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "legacy_prefix" | "legacy" => Ok(Self::LegacyPrefix),
            "length_based" | "length" => Ok(Self::LengthBased),
            other => Err(format!("unknown phone rule: {other}")),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when a key fails strict validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixKeyError {
    /// Tax id or phone has the wrong number of digits.
    #[error("{key_type} key must have {expected} digits, found {actual}")]
    InvalidLength {
        /// Key type being validated.
        key_type: PixKeyType,
        /// Expected digit count (or range label).
        expected: &'static str,
        /// Digits found after stripping.
        actual: usize,
    },
    /// Tax id check digits do not match.
    #[error("{key_type} key has invalid check digits")]
    InvalidCheckDigits {
        /// Key type being validated.
        key_type: PixKeyType,
    },
    /// Tax id is a single digit repeated.
    #[error("{key_type} key cannot repeat a single digit")]
    RepeatedDigits {
        /// Key type being validated.
        key_type: PixKeyType,
    },
    /// Email key is not a plausible address.
    #[error("invalid email key: {0}")]
    InvalidEmail(String),
    /// Phone key is not `+55` followed by 10 or 11 digits.
    #[error("invalid phone key: {0}")]
    InvalidPhone(String),
    /// Random key is not a UUID.
    #[error("invalid random key: {0}")]
    InvalidRandomKey(String),
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Normalizes a raw key into its transmission form using the legacy phone rule.
#[must_use]
pub fn normalize_pix_key(raw: &str, key_type: PixKeyType) -> String {
    normalize_pix_key_with(raw, key_type, PhoneCountryCodeRule::LegacyPrefix)
}

/// Normalizes a raw key into its transmission form.
///
/// Tax ids keep only their digits, phones become `+55…`, emails are
/// lowercased, and random keys pass through unchanged.
#[must_use]
pub fn normalize_pix_key_with(raw: &str, key_type: PixKeyType, rule: PhoneCountryCodeRule) -> String {
    match key_type {
        PixKeyType::Cpf | PixKeyType::Cnpj => digits_only(raw),
        PixKeyType::Phone => normalize_phone(raw, rule),
        PixKeyType::Email => raw.to_lowercase(),
        PixKeyType::Random => raw.to_string(),
    }
}

/// Prefixes a phone number with the Brazilian country code.
fn normalize_phone(raw: &str, rule: PhoneCountryCodeRule) -> String {
    let digits = digits_only(raw);
    let international = match rule {
        PhoneCountryCodeRule::LegacyPrefix => digits.starts_with(BRAZIL_COUNTRY_CODE),
        PhoneCountryCodeRule::LengthBased => {
            !matches!(digits.len(), 10 | 11) && digits.starts_with(BRAZIL_COUNTRY_CODE)
        }
    };
    if international { format!("+{digits}") } else { format!("+{BRAZIL_COUNTRY_CODE}{digits}") }
}

/// Strips everything but ASCII digits.
pub(crate) fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

// ============================================================================
// SECTION: Validated Key
// ============================================================================

/// A normalized PIX key that passed strict validation.
///
/// # Invariants
/// - `value` is the canonical transmission form for `key_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PixKey {
    /// Key alias type.
    key_type: PixKeyType,
    /// Normalized key text.
    value: String,
}

impl PixKey {
    /// Normalizes and validates a raw key.
    ///
    /// # Errors
    ///
    /// Returns [`PixKeyError`] when the normalized key is not a valid key of
    /// the requested type.
    pub fn parse(
        raw: &str,
        key_type: PixKeyType,
        rule: PhoneCountryCodeRule,
    ) -> Result<Self, PixKeyError> {
        let value = normalize_pix_key_with(raw, key_type, rule);
        match key_type {
            PixKeyType::Cpf | PixKeyType::Cnpj => validate_tax_id(&value, key_type)?,
            PixKeyType::Email => validate_email(&value)?,
            PixKeyType::Phone => validate_phone(&value)?,
            PixKeyType::Random => validate_random(&value)?,
        }
        Ok(Self {
            key_type,
            value,
        })
    }

    /// Returns the key type.
    #[must_use]
    pub const fn key_type(&self) -> PixKeyType {
        self.key_type
    }

    /// Returns the normalized key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consumes the key and returns the normalized text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for PixKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Validates CPF or CNPJ digits, including both check digits.
fn validate_tax_id(digits: &str, key_type: PixKeyType) -> Result<(), PixKeyError> {
    let (expected_len, expected_label) = if key_type == PixKeyType::Cpf {
        (CPF_DIGITS, "11")
    } else {
        (CNPJ_DIGITS, "14")
    };
    let values: Vec<u32> = digits.chars().filter_map(|ch| ch.to_digit(10)).collect();
    if values.len() != expected_len {
        return Err(PixKeyError::InvalidLength {
            key_type,
            expected: expected_label,
            actual: values.len(),
        });
    }
    if values.iter().all(|digit| *digit == values[0]) {
        return Err(PixKeyError::RepeatedDigits {
            key_type,
        });
    }
    let body = expected_len - 2;
    let (first, second) = if key_type == PixKeyType::Cpf {
        let first = check_digit(&values[.. body], &descending_weights(10, body));
        let second = check_digit(&values[.. body + 1], &descending_weights(11, body + 1));
        (first, second)
    } else {
        let first = check_digit(&values[.. body], &CNPJ_WEIGHTS_FIRST);
        let second = check_digit(&values[.. body + 1], &CNPJ_WEIGHTS_SECOND);
        (first, second)
    };
    if values[body] != first || values[body + 1] != second {
        return Err(PixKeyError::InvalidCheckDigits {
            key_type,
        });
    }
    Ok(())
}

/// Builds CPF weights counting down from `start`.
fn descending_weights(start: u32, count: usize) -> Vec<u32> {
    (0 .. count).scan(start, |weight, _| {
        let current = *weight;
        *weight = weight.saturating_sub(1);
        Some(current)
    })
    .collect()
}

/// Computes a mod-11 check digit.
fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(digit, weight)| digit * weight).sum();
    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

/// Validates an already lowercased email key.
fn validate_email(value: &str) -> Result<(), PixKeyError> {
    let invalid = || PixKeyError::InvalidEmail(value.to_string());
    if value.chars().count() > MAX_EMAIL_KEY_LENGTH || value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    if local.is_empty() || domain.is_empty() {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }
    Ok(())
}

/// Validates a normalized `+55` phone key.
fn validate_phone(value: &str) -> Result<(), PixKeyError> {
    let national = value.strip_prefix("+55").unwrap_or("");
    let valid = matches!(national.len(), 10 | 11) && national.bytes().all(|b| b.is_ascii_digit());
    if valid { Ok(()) } else { Err(PixKeyError::InvalidPhone(value.to_string())) }
}

/// Validates a random key as a hyphenated UUID.
fn validate_random(value: &str) -> Result<(), PixKeyError> {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];
    let groups: Vec<&str> = value.split('-').collect();
    let valid = groups.len() == GROUPS.len()
        && groups
            .iter()
            .zip(GROUPS)
            .all(|(group, len)| group.len() == len && group.bytes().all(|b| b.is_ascii_hexdigit()));
    if valid { Ok(()) } else { Err(PixKeyError::InvalidRandomKey(value.to_string())) }
}
