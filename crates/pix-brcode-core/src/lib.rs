// crates/pix-brcode-core/src/lib.rs
// ============================================================================
// Module: PIX BR Code Core Library
// Description: Public API surface for the PIX BR Code encoder and decoder.
// Purpose: Expose key formatting, TLV encoding, checksum, and payload helpers.
// Dependencies: crate::{crc, decode, display, key, payload, tlv}
// ============================================================================

//! ## Overview
//! PIX BR Code core builds and reads the EMV merchant-presented QR payloads
//! used by Brazilian instant payments. Every operation is pure and
//! synchronous: identical inputs always produce identical codes, and no
//! state is shared between calls.
//!
//! The default entry point [`generate_pix_code`] is total and degrades
//! silently on malformed input. Callers that want malformed keys, oversized
//! names, or negative amounts rejected instead use
//! [`generate_pix_code_with`] in [`ValidationMode::Strict`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod crc;
pub mod decode;
pub mod display;
pub mod key;
pub mod payload;
pub mod tlv;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crc::checksum_hex;
pub use crc::crc16_ccitt_false;
pub use decode::DecodeError;
pub use decode::DecodedPixCode;
pub use decode::decode_pix_code;
pub use decode::verify_checksum;
pub use display::format_pix_key_for_display;
pub use display::try_format_pix_key_for_display;
pub use key::PhoneCountryCodeRule;
pub use key::PixKey;
pub use key::PixKeyError;
pub use key::PixKeyType;
pub use key::normalize_pix_key;
pub use key::normalize_pix_key_with;
pub use payload::EncodeOptions;
pub use payload::PixPayload;
pub use payload::PixPayloadError;
pub use payload::ValidationMode;
pub use payload::assemble_payload;
pub use payload::format_amount;
pub use payload::generate_pix_code;
pub use payload::generate_pix_code_with;
pub use tlv::TlvError;
pub use tlv::TlvField;
pub use tlv::encode_field;
pub use tlv::parse_fields;
pub use tlv::try_encode_field;
