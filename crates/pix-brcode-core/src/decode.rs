// crates/pix-brcode-core/src/decode.rs
// ============================================================================
// Module: BR Code Decoding
// Description: Checksum verification and field extraction for PIX codes.
// Purpose: Read back codes produced here or by any compliant generator.
// Dependencies: bigdecimal, serde, thiserror, crate::{crc, key, payload, tlv}
// ============================================================================

//! ## Overview
//! Decoding verifies the trailing `6304XXXX` checksum first, then splits the
//! code into top-level fields and unpacks the merchant account and
//! additional data templates. Only static PIX codes are understood: the
//! merchant account template must carry the `br.gov.bcb.pix` GUI and a key
//! in its tag `01`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Serialize;
use thiserror::Error;

use crate::crc::checksum_hex;
use crate::key::PixKeyType;
use crate::payload::CRC_PREFIX;
use crate::payload::ID_ACCOUNT_DESCRIPTION;
use crate::payload::ID_ACCOUNT_GUI;
use crate::payload::ID_ACCOUNT_KEY;
use crate::payload::ID_ADDITIONAL_DATA;
use crate::payload::ID_AMOUNT;
use crate::payload::ID_COUNTRY;
use crate::payload::ID_CRC;
use crate::payload::ID_CURRENCY;
use crate::payload::ID_MERCHANT_CATEGORY;
use crate::payload::ID_MERCHANT_CITY;
use crate::payload::ID_MERCHANT_NAME;
use crate::payload::ID_PAYLOAD_FORMAT;
use crate::payload::ID_TXID;
use crate::payload::PAYLOAD_FORMAT_VALUE;
use crate::payload::PIX_GUI;
use crate::payload::PixPayload;
use crate::payload::TXID_WILDCARD;
use crate::tlv::TlvError;
use crate::tlv::TlvField;
use crate::tlv::parse_fields;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of checksum hex digits.
const CHECKSUM_WIDTH: usize = 4;

/// First and last tags reserved for merchant account templates.
const MERCHANT_ACCOUNT_TAGS: std::ops::RangeInclusive<u8> = 26 ..= 51;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while decoding a BR Code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The code does not end in `6304` plus four hex digits.
    #[error("code does not end with a 6304 checksum field")]
    MissingChecksum,
    /// The trailing checksum does not match the payload.
    #[error("checksum mismatch: expected {expected}, found {actual}")]
    ChecksumMismatch {
        /// Checksum computed over the payload.
        expected: String,
        /// Checksum carried by the code.
        actual: String,
    },
    /// Field structure is malformed.
    #[error(transparent)]
    Tlv(#[from] TlvError),
    /// Payload format indicator is not `01`.
    #[error("unsupported payload format indicator: {0}")]
    UnsupportedFormat(String),
    /// A required field is absent.
    #[error("missing required field {0}")]
    MissingField(&'static str),
    /// No merchant account template carries the PIX GUI.
    #[error("no merchant account template with the br.gov.bcb.pix identifier")]
    NotPix,
    /// Amount field is not a decimal number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

// ============================================================================
// SECTION: Decoded Code
// ============================================================================

/// Fields read back from a PIX BR Code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedPixCode {
    /// Payload format indicator (always `01`).
    pub payload_format: String,
    /// Merchant account template tag that carried the PIX GUI.
    pub merchant_account_tag: String,
    /// PIX key as transmitted.
    pub pix_key: String,
    /// Description from the merchant account template.
    pub description: Option<String>,
    /// Merchant category code.
    pub merchant_category_code: String,
    /// ISO 4217 numeric currency.
    pub currency: String,
    /// Transaction amount when present.
    pub amount: Option<BigDecimal>,
    /// Country code.
    pub country_code: String,
    /// Merchant name.
    pub merchant_name: String,
    /// Merchant city.
    pub merchant_city: String,
    /// Reference label (may be the `***` wildcard).
    pub txid: Option<String>,
    /// Checksum carried by the code.
    pub checksum: String,
}

impl DecodedPixCode {
    /// Rebuilds a payload from the decoded fields.
    ///
    /// The key type is not carried by BR Codes, so the caller supplies it.
    /// A `***` txid maps back to "no txid".
    #[must_use]
    pub fn into_payload(self, pix_key_type: PixKeyType) -> PixPayload {
        PixPayload {
            pix_key: self.pix_key,
            pix_key_type,
            merchant_name: self.merchant_name,
            merchant_city: self.merchant_city,
            amount: self.amount,
            txid: self.txid.filter(|txid| txid != TXID_WILDCARD),
            description: self.description,
        }
    }
}

// ============================================================================
// SECTION: Checksum Verification
// ============================================================================

/// Verifies the trailing checksum of a BR Code.
///
/// # Errors
///
/// Returns [`DecodeError::MissingChecksum`] when the code does not end in a
/// `6304` field and [`DecodeError::ChecksumMismatch`] when the digits differ.
pub fn verify_checksum(code: &str) -> Result<(), DecodeError> {
    let (body, actual) = split_checksum(code)?;
    let expected = checksum_hex(body);
    if expected.eq_ignore_ascii_case(actual) {
        Ok(())
    } else {
        Err(DecodeError::ChecksumMismatch {
            expected,
            actual: actual.to_string(),
        })
    }
}

/// Splits a code into the checksummed body (ending in `6304`) and the digits.
fn split_checksum(code: &str) -> Result<(&str, &str), DecodeError> {
    let code = code.trim();
    let split = code
        .char_indices()
        .rev()
        .nth(CHECKSUM_WIDTH - 1)
        .map(|(index, _)| index)
        .ok_or(DecodeError::MissingChecksum)?;
    let (body, digits) = code.split_at(split);
    let valid_digits =
        digits.len() == CHECKSUM_WIDTH && digits.bytes().all(|byte| byte.is_ascii_hexdigit());
    if !valid_digits || !body.ends_with(CRC_PREFIX) {
        return Err(DecodeError::MissingChecksum);
    }
    Ok((body, digits))
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Decodes and verifies a PIX BR Code.
///
/// # Errors
///
/// Returns [`DecodeError`] when the checksum is missing or wrong, the field
/// structure is malformed, or required PIX fields are absent.
pub fn decode_pix_code(code: &str) -> Result<DecodedPixCode, DecodeError> {
    verify_checksum(code)?;
    let fields = parse_fields(code.trim())?;
    let checksum = match fields.last() {
        Some(field) if field.tag == ID_CRC => field.value.clone(),
        _ => return Err(DecodeError::MissingChecksum),
    };
    let top = index_fields(&fields);

    let payload_format = required(&top, ID_PAYLOAD_FORMAT, "00")?;
    if payload_format != PAYLOAD_FORMAT_VALUE {
        return Err(DecodeError::UnsupportedFormat(payload_format));
    }

    let (merchant_account_tag, account) = find_pix_account(&fields)?;
    let account_index = index_fields(&account);
    let pix_key = required(&account_index, ID_ACCOUNT_KEY, "26.01")?;
    let description = account_index.get(ID_ACCOUNT_DESCRIPTION).map(|value| (*value).to_string());

    let amount = match top.get(ID_AMOUNT) {
        Some(text) => Some(
            BigDecimal::from_str(text)
                .map_err(|_| DecodeError::InvalidAmount((*text).to_string()))?,
        ),
        None => None,
    };

    let txid = match top.get(ID_ADDITIONAL_DATA) {
        Some(additional) => {
            let nested = parse_fields(additional)?;
            index_fields(&nested).get(ID_TXID).map(|value| (*value).to_string())
        }
        None => None,
    };

    Ok(DecodedPixCode {
        payload_format,
        merchant_account_tag,
        pix_key,
        description,
        merchant_category_code: required(&top, ID_MERCHANT_CATEGORY, "52")?,
        currency: required(&top, ID_CURRENCY, "53")?,
        amount,
        country_code: required(&top, ID_COUNTRY, "58")?,
        merchant_name: required(&top, ID_MERCHANT_NAME, "59")?,
        merchant_city: required(&top, ID_MERCHANT_CITY, "60")?,
        txid,
        checksum,
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Indexes fields by tag, keeping the first occurrence of each tag.
fn index_fields(fields: &[TlvField]) -> BTreeMap<&str, &str> {
    let mut index = BTreeMap::new();
    for field in fields {
        index.entry(field.tag.as_str()).or_insert(field.value.as_str());
    }
    index
}

/// Returns a required field value.
fn required(
    index: &BTreeMap<&str, &str>,
    tag: &str,
    label: &'static str,
) -> Result<String, DecodeError> {
    index.get(tag).map(|value| (*value).to_string()).ok_or(DecodeError::MissingField(label))
}

/// Finds the first merchant account template carrying the PIX GUI.
fn find_pix_account(fields: &[TlvField]) -> Result<(String, Vec<TlvField>), DecodeError> {
    for field in fields {
        let in_range =
            field.tag.parse::<u8>().is_ok_and(|tag| MERCHANT_ACCOUNT_TAGS.contains(&tag));
        if !in_range {
            continue;
        }
        let nested = parse_fields(&field.value)?;
        let is_pix = nested
            .iter()
            .any(|inner| inner.tag == ID_ACCOUNT_GUI && inner.value.eq_ignore_ascii_case(PIX_GUI));
        if is_pix {
            return Ok((field.tag.clone(), nested));
        }
    }
    Err(DecodeError::NotPix)
}
