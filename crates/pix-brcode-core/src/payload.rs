// crates/pix-brcode-core/src/payload.rs
// ============================================================================
// Module: BR Code Payload Assembly
// Description: PIX payload model, field layout, and final code generation.
// Purpose: Produce scannable BR Code strings from a merchant payment request.
// Dependencies: bigdecimal, serde, thiserror, crate::{crc, key, tlv}
// ============================================================================

//! ## Overview
//! A [`PixPayload`] is encoded into the fixed BR Code field sequence
//! `00, 26, 52, 53, (54), 58, 59, 60, 62, 63`. Tag `54` is present only for a
//! positive amount. The payload ends with the `6304` CRC prefix, and the
//! checksum is computed over everything up to and including that prefix.
//!
//! [`ValidationMode::Lenient`] reproduces the reference generator: names
//! are cut to their field limits, keys are normalized without validation, and
//! nothing fails. [`ValidationMode::Strict`] rejects the same inputs instead
//! of degrading them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::convert::Infallible;

use bigdecimal::BigDecimal;
use bigdecimal::RoundingMode;
use bigdecimal::Signed;
use bigdecimal::Zero;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::crc::checksum_hex;
use crate::key::PhoneCountryCodeRule;
use crate::key::PixKey;
use crate::key::PixKeyError;
use crate::key::PixKeyType;
use crate::key::normalize_pix_key_with;
use crate::tlv::TlvError;
use crate::tlv::encode_field;
use crate::tlv::try_encode_field;

// ============================================================================
// SECTION: Field Identifiers
// ============================================================================

/// Payload Format Indicator tag.
pub const ID_PAYLOAD_FORMAT: &str = "00";
/// Payload Format Indicator value.
pub const PAYLOAD_FORMAT_VALUE: &str = "01";
/// Merchant Account Information template tag.
pub const ID_MERCHANT_ACCOUNT: &str = "26";
/// Globally unique identifier tag inside the merchant account template.
pub const ID_ACCOUNT_GUI: &str = "00";
/// PIX arrangement GUI.
pub const PIX_GUI: &str = "br.gov.bcb.pix";
/// PIX key tag inside the merchant account template.
pub const ID_ACCOUNT_KEY: &str = "01";
/// Free-text description tag inside the merchant account template.
pub const ID_ACCOUNT_DESCRIPTION: &str = "02";
/// Merchant Category Code tag.
pub const ID_MERCHANT_CATEGORY: &str = "52";
/// Merchant Category Code value (not informed).
pub const MERCHANT_CATEGORY_VALUE: &str = "0000";
/// Transaction Currency tag.
pub const ID_CURRENCY: &str = "53";
/// ISO 4217 numeric code for BRL.
pub const CURRENCY_BRL: &str = "986";
/// Transaction Amount tag.
pub const ID_AMOUNT: &str = "54";
/// Country Code tag.
pub const ID_COUNTRY: &str = "58";
/// Country Code value.
pub const COUNTRY_BR: &str = "BR";
/// Merchant Name tag.
pub const ID_MERCHANT_NAME: &str = "59";
/// Merchant City tag.
pub const ID_MERCHANT_CITY: &str = "60";
/// Additional Data Field template tag.
pub const ID_ADDITIONAL_DATA: &str = "62";
/// Reference label (txid) tag inside the additional data template.
pub const ID_TXID: &str = "05";
/// Placeholder txid used when none is supplied.
pub const TXID_WILDCARD: &str = "***";
/// CRC tag.
pub const ID_CRC: &str = "63";
/// CRC tag plus its fixed 4-character length, written before the checksum.
pub const CRC_PREFIX: &str = "6304";

// ============================================================================
// SECTION: Field Limits
// ============================================================================

/// Maximum merchant name length in characters.
pub const MAX_MERCHANT_NAME: usize = 25;
/// Maximum merchant city length in characters.
pub const MAX_MERCHANT_CITY: usize = 15;
/// Maximum description length in characters.
pub const MAX_DESCRIPTION: usize = 72;
/// Maximum txid length in characters.
pub const MAX_TXID: usize = 25;
/// Maximum formatted amount length in characters.
pub const MAX_AMOUNT_LENGTH: usize = 13;
/// Maximum integer digits of an amount (13 characters minus `.NN`).
const MAX_AMOUNT_INTEGER_DIGITS: i64 = 10;
/// Highest code point the checksum can represent without aliasing.
const MAX_CODE_POINT: u32 = 0xFF;

// ============================================================================
// SECTION: Payload Model
// ============================================================================

/// Input for a single PIX code.
///
/// # Invariants
/// - None at construction. Lenient encoding accepts any value; strict
///   encoding validates every field before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixPayload {
    /// Raw key as entered by the merchant.
    pub pix_key: String,
    /// Key alias type.
    pub pix_key_type: PixKeyType,
    /// Merchant display name (uppercased, cut to 25 characters).
    pub merchant_name: String,
    /// Merchant city (uppercased, cut to 15 characters).
    pub merchant_city: String,
    /// Amount in BRL; absent or zero means "payer chooses".
    #[serde(default)]
    pub amount: Option<BigDecimal>,
    /// Reference label; absent or empty encodes as `***`.
    #[serde(default)]
    pub txid: Option<String>,
    /// Free-text description (cut to 72 characters).
    #[serde(default)]
    pub description: Option<String>,
}

impl PixPayload {
    /// Creates a payload without amount, txid, or description.
    #[must_use]
    pub fn new(
        pix_key: impl Into<String>,
        pix_key_type: PixKeyType,
        merchant_name: impl Into<String>,
        merchant_city: impl Into<String>,
    ) -> Self {
        Self {
            pix_key: pix_key.into(),
            pix_key_type,
            merchant_name: merchant_name.into(),
            merchant_city: merchant_city.into(),
            amount: None,
            txid: None,
            description: None,
        }
    }

    /// Sets the amount.
    #[must_use]
    pub fn with_amount(mut self, amount: BigDecimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the reference label.
    #[must_use]
    pub fn with_txid(mut self, txid: impl Into<String>) -> Self {
        self.txid = Some(txid.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the description when present and non-empty.
    fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|text| !text.is_empty())
    }

    /// Returns the txid when present and non-empty.
    fn txid_text(&self) -> Option<&str> {
        self.txid.as_deref().filter(|text| !text.is_empty())
    }

    /// Returns the amount when strictly positive.
    fn positive_amount(&self) -> Option<&BigDecimal> {
        self.amount.as_ref().filter(|amount| *amount > &BigDecimal::zero())
    }
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// How malformed input is handled during encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Never fail; truncate and normalize like the reference generator.
    #[default]
    Lenient,
    /// Reject malformed keys, oversized fields, and negative amounts.
    Strict,
}

impl ValidationMode {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }
}

/// Encoding options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Malformed input handling.
    pub validation: ValidationMode,
    /// Phone country-code detection rule.
    pub phone_rule: PhoneCountryCodeRule,
}

impl EncodeOptions {
    /// Lenient options with the legacy phone rule.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            validation: ValidationMode::Lenient,
            phone_rule: PhoneCountryCodeRule::LegacyPrefix,
        }
    }

    /// Strict options with the given phone rule.
    #[must_use]
    pub const fn strict(phone_rule: PhoneCountryCodeRule) -> Self {
        Self {
            validation: ValidationMode::Strict,
            phone_rule,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by strict payload encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixPayloadError {
    /// The PIX key failed validation.
    #[error(transparent)]
    Key(#[from] PixKeyError),
    /// Amount is below zero.
    #[error("amount must not be negative")]
    NegativeAmount,
    /// Formatted amount does not fit the 13-character field.
    #[error("amount exceeds 13 characters")]
    AmountTooLarge,
    /// Merchant name is blank.
    #[error("merchant name must not be empty")]
    EmptyMerchantName,
    /// Merchant city is blank.
    #[error("merchant city must not be empty")]
    EmptyMerchantCity,
    /// Merchant name is over the field limit.
    #[error("merchant name is {0} characters (max 25)")]
    MerchantNameTooLong(usize),
    /// Merchant city is over the field limit.
    #[error("merchant city is {0} characters (max 15)")]
    MerchantCityTooLong(usize),
    /// Description is over the field limit.
    #[error("description is {0} characters (max 72)")]
    DescriptionTooLong(usize),
    /// Txid is not `***` or 1-25 ASCII alphanumerics.
    #[error("invalid txid: {0}")]
    InvalidTxid(String),
    /// A field contains a character the checksum cannot represent.
    #[error("{field} contains unsupported character {character:?}")]
    UnsupportedCharacter {
        /// Field name.
        field: &'static str,
        /// Offending character.
        character: char,
    },
    /// A template or field could not be encoded.
    #[error(transparent)]
    Field(#[from] TlvError),
}

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Generates a BR Code string with lenient encoding.
///
/// Total: malformed input degrades silently and never fails.
#[must_use]
pub fn generate_pix_code(payload: &PixPayload) -> String {
    let body = match build_payload(payload, PhoneCountryCodeRule::LegacyPrefix, |tag, value| {
        Ok::<_, Infallible>(encode_field(tag, value))
    }) {
        Ok(body) => body,
        Err(never) => match never {},
    };
    append_checksum(body)
}

/// Generates a BR Code string with explicit options.
///
/// # Errors
///
/// Returns [`PixPayloadError`] in [`ValidationMode::Strict`] when any field is
/// invalid. Lenient mode never fails.
pub fn generate_pix_code_with(
    payload: &PixPayload,
    options: &EncodeOptions,
) -> Result<String, PixPayloadError> {
    assemble_payload(payload, options).map(append_checksum)
}

/// Builds the un-checksummed payload, ending in the `6304` prefix.
///
/// # Errors
///
/// Returns [`PixPayloadError`] in [`ValidationMode::Strict`] when any field is
/// invalid. Lenient mode never fails.
pub fn assemble_payload(
    payload: &PixPayload,
    options: &EncodeOptions,
) -> Result<String, PixPayloadError> {
    match options.validation {
        ValidationMode::Lenient => {
            build_payload(payload, options.phone_rule, |tag, value| {
                Ok::<_, Infallible>(encode_field(tag, value))
            })
            .map_err(|never| match never {})
        }
        ValidationMode::Strict => {
            validate_payload(payload, options.phone_rule)?;
            Ok(build_payload(payload, options.phone_rule, try_encode_field)?)
        }
    }
}

/// Formats an amount with exactly two fraction digits, rounding half up.
#[must_use]
pub fn format_amount(amount: &BigDecimal) -> String {
    amount.with_scale_round(2, RoundingMode::HalfUp).to_plain_string()
}

/// Appends the checksum computed over `body` (which ends in `6304`).
fn append_checksum(mut body: String) -> String {
    let checksum = checksum_hex(&body);
    body.push_str(&checksum);
    body
}

// ============================================================================
// SECTION: Field Layout
// ============================================================================

/// Lays out every field in BR Code order using `field` to encode each one.
fn build_payload<E>(
    payload: &PixPayload,
    phone_rule: PhoneCountryCodeRule,
    field: impl Fn(&str, &str) -> Result<String, E>,
) -> Result<String, E> {
    let key = normalize_pix_key_with(&payload.pix_key, payload.pix_key_type, phone_rule);
    let mut account = field(ID_ACCOUNT_GUI, PIX_GUI)?;
    account.push_str(&field(ID_ACCOUNT_KEY, &key)?);
    if let Some(description) = payload.description_text() {
        account.push_str(&field(ID_ACCOUNT_DESCRIPTION, &truncate(description, MAX_DESCRIPTION))?);
    }

    let txid = payload.txid_text().unwrap_or(TXID_WILDCARD);
    let additional = field(ID_TXID, txid)?;

    let mut out = field(ID_PAYLOAD_FORMAT, PAYLOAD_FORMAT_VALUE)?;
    out.push_str(&field(ID_MERCHANT_ACCOUNT, &account)?);
    out.push_str(&field(ID_MERCHANT_CATEGORY, MERCHANT_CATEGORY_VALUE)?);
    out.push_str(&field(ID_CURRENCY, CURRENCY_BRL)?);
    if let Some(amount) = payload.positive_amount() {
        out.push_str(&field(ID_AMOUNT, &format_amount(amount))?);
    }
    out.push_str(&field(ID_COUNTRY, COUNTRY_BR)?);
    let name = truncate(&payload.merchant_name.to_uppercase(), MAX_MERCHANT_NAME);
    out.push_str(&field(ID_MERCHANT_NAME, &name)?);
    let city = truncate(&payload.merchant_city.to_uppercase(), MAX_MERCHANT_CITY);
    out.push_str(&field(ID_MERCHANT_CITY, &city)?);
    out.push_str(&field(ID_ADDITIONAL_DATA, &additional)?);
    out.push_str(CRC_PREFIX);
    Ok(out)
}

/// Cuts `text` to at most `max` characters.
fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

// ============================================================================
// SECTION: Strict Validation
// ============================================================================

/// Validates every payload field for strict encoding.
fn validate_payload(
    payload: &PixPayload,
    phone_rule: PhoneCountryCodeRule,
) -> Result<(), PixPayloadError> {
    let key = PixKey::parse(&payload.pix_key, payload.pix_key_type, phone_rule)?;
    ensure_supported("pix_key", key.as_str())?;

    if let Some(amount) = &payload.amount {
        if amount.is_negative() {
            return Err(PixPayloadError::NegativeAmount);
        }
        // Magnitude first so huge exponents are never expanded into text.
        if integer_digits(amount) > MAX_AMOUNT_INTEGER_DIGITS
            || format_amount(amount).len() > MAX_AMOUNT_LENGTH
        {
            return Err(PixPayloadError::AmountTooLarge);
        }
    }

    let name = payload.merchant_name.to_uppercase();
    if name.trim().is_empty() {
        return Err(PixPayloadError::EmptyMerchantName);
    }
    let name_len = name.chars().count();
    if name_len > MAX_MERCHANT_NAME {
        return Err(PixPayloadError::MerchantNameTooLong(name_len));
    }
    ensure_supported("merchant_name", &name)?;

    let city = payload.merchant_city.to_uppercase();
    if city.trim().is_empty() {
        return Err(PixPayloadError::EmptyMerchantCity);
    }
    let city_len = city.chars().count();
    if city_len > MAX_MERCHANT_CITY {
        return Err(PixPayloadError::MerchantCityTooLong(city_len));
    }
    ensure_supported("merchant_city", &city)?;

    if let Some(description) = payload.description_text() {
        let length = description.chars().count();
        if length > MAX_DESCRIPTION {
            return Err(PixPayloadError::DescriptionTooLong(length));
        }
        ensure_supported("description", description)?;
    }

    if let Some(txid) = payload.txid_text() {
        let valid = txid == TXID_WILDCARD
            || (txid.len() <= MAX_TXID && txid.bytes().all(|byte| byte.is_ascii_alphanumeric()));
        if !valid {
            return Err(PixPayloadError::InvalidTxid(txid.to_string()));
        }
    }
    Ok(())
}

/// Rejects characters whose code point does not fit in one checksum byte.
fn ensure_supported(field: &'static str, text: &str) -> Result<(), PixPayloadError> {
    match text.chars().find(|ch| u32::from(*ch) > MAX_CODE_POINT) {
        Some(character) => Err(PixPayloadError::UnsupportedCharacter {
            field,
            character,
        }),
        None => Ok(()),
    }
}

/// Digits left of the decimal point; zero or negative for pure fractions.
fn integer_digits(amount: &BigDecimal) -> i64 {
    let (_, scale) = amount.as_bigint_and_exponent();
    i64::try_from(amount.digits()).unwrap_or(i64::MAX).saturating_sub(scale)
}
