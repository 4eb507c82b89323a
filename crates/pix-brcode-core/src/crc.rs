// crates/pix-brcode-core/src/crc.rs
// ============================================================================
// Module: BR Code Checksum
// Description: CRC-16/CCITT-FALSE over BR Code payload text.
// Purpose: Produce the 4-digit checksum appended after the `6304` prefix.
// Dependencies: None
// ============================================================================

//! ## Overview
//! Scanning apps reject any payload whose trailing checksum does not match,
//! so this routine is bit-exact with the reference generator: polynomial
//! `0x1021`, initial register `0xFFFF`, MSB-first, no reflection and no final
//! XOR.
//!
//! Each character contributes one byte: the low byte of its code point. For
//! ASCII and Latin-1 input this is the character itself.

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Generator polynomial for CRC-16/CCITT-FALSE.
pub const CRC16_POLYNOMIAL: u16 = 0x1021;

/// Initial register value for CRC-16/CCITT-FALSE.
pub const CRC16_INITIAL: u16 = 0xFFFF;

// ============================================================================
// SECTION: Checksum
// ============================================================================

/// Computes CRC-16/CCITT-FALSE over the characters of `input`.
#[must_use]
pub fn crc16_ccitt_false(input: &str) -> u16 {
    input.chars().fold(CRC16_INITIAL, |register, ch| update(register, low_byte(ch)))
}

/// Computes the checksum of `input` as four uppercase, zero-padded hex digits.
#[must_use]
pub fn checksum_hex(input: &str) -> String {
    format!("{:04X}", crc16_ccitt_false(input))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Feeds a single byte through the CRC register.
const fn update(register: u16, byte: u8) -> u16 {
    let mut crc = register ^ ((byte as u16) << 8);
    let mut bit = 0;
    while bit < 8 {
        crc = if crc & 0x8000 == 0 { crc << 1 } else { (crc << 1) ^ CRC16_POLYNOMIAL };
        bit += 1;
    }
    crc
}

/// Returns the low byte of a character's code point.
fn low_byte(ch: char) -> u8 {
    (u32::from(ch) & 0xFF).to_le_bytes()[0]
}
