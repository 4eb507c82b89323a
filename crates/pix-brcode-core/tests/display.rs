// crates/pix-brcode-core/tests/display.rs
// ============================================================================
// Module: Key Display Tests
// Description: Cosmetic key formatting, lenient and strict.
// ============================================================================
//! ## Overview
//! Display formatting groups digits for tax ids and phones and leaves other
//! key types untouched.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use pix_brcode_core::PixKeyError;
use pix_brcode_core::PixKeyType;
use pix_brcode_core::format_pix_key_for_display;
use pix_brcode_core::try_format_pix_key_for_display;

#[test]
fn formats_cpf() {
    assert_eq!(format_pix_key_for_display("09607890906", PixKeyType::Cpf), "096.078.909-06");
}

#[test]
fn formats_cnpj() {
    assert_eq!(format_pix_key_for_display("11222333000181", PixKeyType::Cnpj), "11.222.333/0001-81");
}

#[test]
fn formats_eleven_digit_phone() {
    assert_eq!(format_pix_key_for_display("47999998888", PixKeyType::Phone), "(47) 99999-8888");
}

#[test]
fn other_phone_shapes_pass_through_unchanged() {
    assert_eq!(format_pix_key_for_display("+5547999998888", PixKeyType::Phone), "+5547999998888");
    assert_eq!(format_pix_key_for_display("3333-4444", PixKeyType::Phone), "3333-4444");
}

#[test]
fn email_and_random_keys_are_not_case_normalized() {
    assert_eq!(format_pix_key_for_display("User@Example.COM", PixKeyType::Email), "User@Example.COM");
    let random = "123E4567-E89B-12D3-A456-426614174000";
    assert_eq!(format_pix_key_for_display(random, PixKeyType::Random), random);
}

#[test]
fn short_tax_id_renders_with_missing_groups() {
    assert_eq!(format_pix_key_for_display("09607", PixKeyType::Cpf), "096.07.-");
    assert_eq!(format_pix_key_for_display("", PixKeyType::Cnpj), "../-");
}

#[test]
fn long_tax_id_passes_through_without_dropping_digits() {
    assert_eq!(format_pix_key_for_display("096078909061", PixKeyType::Cpf), "096078909061");
    assert_eq!(
        format_pix_key_for_display("11.222.333/0001-8199", PixKeyType::Cnpj),
        "11.222.333/0001-8199"
    );
    assert!(try_format_pix_key_for_display("096078909061", PixKeyType::Cpf).is_err());
}

#[test]
fn strict_display_rejects_wrong_digit_counts() {
    assert_eq!(
        try_format_pix_key_for_display("09607", PixKeyType::Cpf).unwrap_err(),
        PixKeyError::InvalidLength {
            key_type: PixKeyType::Cpf,
            expected: "11",
            actual: 5,
        }
    );
    assert!(try_format_pix_key_for_display("+5547999998888", PixKeyType::Phone).is_err());
    assert_eq!(
        try_format_pix_key_for_display("096.078.909-06", PixKeyType::Cpf).unwrap(),
        "096.078.909-06"
    );
    assert_eq!(
        try_format_pix_key_for_display("anyone@example.com", PixKeyType::Email).unwrap(),
        "anyone@example.com"
    );
}
