// crates/pix-brcode-core/tests/payload_generation.rs
// ============================================================================
// Module: Payload Generation Tests
// Description: End-to-end BR Code generation in lenient and strict modes.
// ============================================================================
//! ## Overview
//! Pins generated codes to reference output and checks field order, amount
//! formatting, truncation, and strict-mode rejections.

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

use std::str::FromStr;

use bigdecimal::BigDecimal;
use pix_brcode_core::EncodeOptions;
use pix_brcode_core::PhoneCountryCodeRule;
use pix_brcode_core::PixKeyError;
use pix_brcode_core::PixKeyType;
use pix_brcode_core::PixPayload;
use pix_brcode_core::PixPayloadError;
use pix_brcode_core::TlvError;
use pix_brcode_core::ValidationMode;
use pix_brcode_core::assemble_payload;
use pix_brcode_core::checksum_hex;
use pix_brcode_core::format_amount;
use pix_brcode_core::generate_pix_code;
use pix_brcode_core::generate_pix_code_with;
use pix_brcode_core::parse_fields;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn decimal(text: &str) -> BigDecimal {
    BigDecimal::from_str(text).unwrap()
}

fn paquera_payload() -> PixPayload {
    PixPayload::new("09607890906", PixKeyType::Cpf, "Bruno Eduardo Ochner", "Timbó")
        .with_amount(decimal("19.90"))
        .with_description("Paquera PAQ-ABCD1234")
}

fn top_level_tags(code: &str) -> Vec<String> {
    parse_fields(code).unwrap().into_iter().map(|field| field.tag).collect()
}

fn strict() -> EncodeOptions {
    EncodeOptions::strict(PhoneCountryCodeRule::LegacyPrefix)
}

// ============================================================================
// SECTION: Reference Output
// ============================================================================

#[test]
fn paquera_scenario_matches_reference_code() {
    let code = generate_pix_code(&paquera_payload());
    assert_eq!(
        code,
        "00020126570014br.gov.bcb.pix0111096078909060220Paquera PAQ-ABCD1234520400005303986540519.905802BR5920BRUNO EDUARDO OCHNER6005TIMBÓ62070503***63043CA1"
    );
    assert!(code.starts_with("000201"));
    assert!(code.contains("52040000"));
    assert!(code.contains("5303986"));
    assert!(code.contains("540519.90"));
    let (body, checksum) = code.split_at(code.len() - 4);
    assert!(body.ends_with("6304"));
    assert_eq!(checksum, checksum_hex(body));
}

#[test]
fn payload_without_amount_matches_reference_code() {
    let payload = PixPayload::new("09607890906", PixKeyType::Cpf, "Bruno Eduardo Ochner", "Timbó");
    assert_eq!(
        generate_pix_code(&payload),
        "00020126330014br.gov.bcb.pix0111096078909065204000053039865802BR5920BRUNO EDUARDO OCHNER6005TIMBÓ62070503***630472D9"
    );
}

#[test]
fn email_key_with_txid_matches_reference_code() {
    let payload = PixPayload::new("User@Example.com", PixKeyType::Email, "Loja do Joao", "Timbo")
        .with_amount(decimal("10"))
        .with_txid("PEDIDO123");
    assert_eq!(
        generate_pix_code(&payload),
        "00020126380014br.gov.bcb.pix0116user@example.com520400005303986540510.005802BR5912LOJA DO JOAO6005TIMBO62130509PEDIDO12363045142"
    );
}

#[test]
fn phone_and_cnpj_keys_match_reference_codes() {
    let phone = PixPayload::new("(47) 99999-8888", PixKeyType::Phone, "Fulano", "Blumenau")
        .with_amount(decimal("0.5"));
    assert_eq!(
        generate_pix_code(&phone),
        "00020126360014br.gov.bcb.pix0114+554799999888852040000530398654040.505802BR5906FULANO6008BLUMENAU62070503***6304E679"
    );
    let cnpj = PixPayload::new("11.222.333/0001-81", PixKeyType::Cnpj, "Padaria Central LTDA", "Blumenau")
        .with_amount(decimal("150"))
        .with_txid("PED42");
    assert_eq!(
        generate_pix_code(&cnpj),
        "00020126360014br.gov.bcb.pix0114112223330001815204000053039865406150.005802BR5920PADARIA CENTRAL LTDA6008BLUMENAU62090505PED4263047B5C"
    );
}

#[test]
fn random_key_matches_reference_code() {
    let payload =
        PixPayload::new("123e4567-e89b-12d3-a456-426614174000", PixKeyType::Random, "Ana", "Timbo");
    assert_eq!(
        generate_pix_code(&payload),
        "00020126580014br.gov.bcb.pix0136123e4567-e89b-12d3-a456-4266141740005204000053039865802BR5903ANA6005TIMBO62070503***63042C9D"
    );
}

// ============================================================================
// SECTION: Field Rules
// ============================================================================

#[test]
fn generation_is_deterministic() {
    let payload = paquera_payload();
    assert_eq!(generate_pix_code(&payload), generate_pix_code(&payload));
}

#[test]
fn fields_appear_in_fixed_order() {
    let with_amount = generate_pix_code(&paquera_payload());
    assert_eq!(top_level_tags(&with_amount), ["00", "26", "52", "53", "54", "58", "59", "60", "62", "63"]);

    let mut without = paquera_payload();
    without.amount = None;
    assert_eq!(
        top_level_tags(&generate_pix_code(&without)),
        ["00", "26", "52", "53", "58", "59", "60", "62", "63"]
    );
}

#[test]
fn zero_and_negative_amounts_omit_the_amount_field() {
    for amount in ["0", "0.00", "-5"] {
        let payload = paquera_payload().with_amount(decimal(amount));
        let tags = top_level_tags(&generate_pix_code(&payload));
        assert!(!tags.iter().any(|tag| tag == "54"), "amount {amount} must be omitted");
    }
}

#[test]
fn amounts_always_carry_two_fraction_digits() {
    assert_eq!(format_amount(&decimal("19.9")), "19.90");
    assert_eq!(format_amount(&decimal("10")), "10.00");
    assert_eq!(format_amount(&decimal("0.005")), "0.01");
    assert_eq!(format_amount(&decimal("1234.564")), "1234.56");
    let code = generate_pix_code(&paquera_payload().with_amount(decimal("19.9")));
    assert!(code.contains("540519.90"));
}

#[test]
fn merchant_name_is_cut_to_25_uppercase_characters() {
    let payload = PixPayload::new("09607890906", PixKeyType::Cpf, "abcdefghijklmnopqrstuvwxyzabcd", "Timbo");
    let code = generate_pix_code(&payload);
    assert!(code.contains("5925ABCDEFGHIJKLMNOPQRSTUVWXY6005TIMBO"));
}

#[test]
fn merchant_city_is_cut_to_15_characters() {
    let payload = PixPayload::new("09607890906", PixKeyType::Cpf, "Ana", "Sao Bento do Sul Catarinense");
    let code = generate_pix_code(&payload);
    assert!(code.contains("6015SAO BENTO DO SU62"));
}

#[test]
fn description_is_cut_to_72_characters() {
    let payload = PixPayload::new("09607890906", PixKeyType::Cpf, "Ana", "Timbo")
        .with_description("d".repeat(100));
    let code = generate_pix_code(&payload);
    let expected = format!("0272{}", "d".repeat(72));
    assert!(code.contains(&expected));
    assert!(!code.contains(&"d".repeat(73)));
}

#[test]
fn empty_description_and_txid_are_treated_as_absent() {
    let payload = PixPayload::new("09607890906", PixKeyType::Cpf, "Ana", "Timbo")
        .with_description("")
        .with_txid("");
    let code = generate_pix_code(&payload);
    assert!(code.contains("0111096078909065204"));
    assert!(code.contains("62070503***6304"));
}

#[test]
fn assembled_payload_ends_with_crc_prefix() {
    let body = assemble_payload(&paquera_payload(), &EncodeOptions::default()).unwrap();
    assert!(body.ends_with("6304"));
    assert_eq!(format!("{body}{}", checksum_hex(&body)), generate_pix_code(&paquera_payload()));
}

#[test]
fn lenient_options_match_total_generator() {
    let payload = paquera_payload();
    let lenient = generate_pix_code_with(&payload, &EncodeOptions::lenient()).unwrap();
    assert_eq!(lenient, generate_pix_code(&payload));
}

#[test]
fn payload_deserializes_from_camel_case_json() {
    let json = r#"{
        "pixKey": "09607890906",
        "pixKeyType": "cpf",
        "merchantName": "Bruno Eduardo Ochner",
        "merchantCity": "Timbó",
        "amount": "19.90",
        "description": "Paquera PAQ-ABCD1234"
    }"#;
    let payload: PixPayload = serde_json::from_str(json).unwrap();
    assert_eq!(payload, paquera_payload());
}

// ============================================================================
// SECTION: Strict Mode
// ============================================================================

#[test]
fn strict_accepts_valid_payload_with_identical_output() {
    let payload = paquera_payload();
    assert_eq!(generate_pix_code_with(&payload, &strict()).unwrap(), generate_pix_code(&payload));
}

#[test]
fn strict_rejects_invalid_key() {
    let mut payload = paquera_payload();
    payload.pix_key = "12345".to_string();
    let err = generate_pix_code_with(&payload, &strict()).unwrap_err();
    assert!(matches!(err, PixPayloadError::Key(PixKeyError::InvalidLength { .. })));
}

#[test]
fn strict_rejects_negative_amount() {
    let payload = paquera_payload().with_amount(decimal("-1"));
    assert_eq!(
        generate_pix_code_with(&payload, &strict()).unwrap_err(),
        PixPayloadError::NegativeAmount
    );
}

#[test]
fn strict_rejects_oversized_amount() {
    let payload = paquera_payload().with_amount(decimal("12345678901.5"));
    assert!(matches!(
        generate_pix_code_with(&payload, &strict()),
        Err(PixPayloadError::AmountTooLarge)
    ));
}

#[test]
fn strict_rejects_exponent_amount_without_expanding_it() {
    let payload = paquera_payload().with_amount(decimal("1e1000000"));
    let err = generate_pix_code_with(&payload, &strict()).unwrap_err();
    assert_eq!(err, PixPayloadError::AmountTooLarge);
    assert!(err.to_string().len() < 64);

    let payload = paquera_payload().with_amount(decimal("-1e1000000"));
    assert_eq!(
        generate_pix_code_with(&payload, &strict()).unwrap_err(),
        PixPayloadError::NegativeAmount
    );
}

#[test]
fn strict_amount_limit_counts_rounding() {
    let payload = paquera_payload().with_amount(decimal("9999999999.99"));
    assert!(generate_pix_code_with(&payload, &strict()).unwrap().contains("54139999999999.99"));

    let payload = paquera_payload().with_amount(decimal("9999999999.995"));
    assert_eq!(
        generate_pix_code_with(&payload, &strict()).unwrap_err(),
        PixPayloadError::AmountTooLarge
    );
}

#[test]
fn strict_measures_the_merchant_text_that_is_encoded() {
    let mut payload = paquera_payload();
    payload.merchant_name = format!(" {} ", "n".repeat(24));
    assert_eq!(
        generate_pix_code_with(&payload, &strict()).unwrap_err(),
        PixPayloadError::MerchantNameTooLong(26)
    );

    let mut payload = paquera_payload();
    payload.merchant_city = " Timbó ".to_string();
    let code = generate_pix_code_with(&payload, &strict()).unwrap();
    assert_eq!(code, generate_pix_code(&payload));
    assert!(code.contains("6007 TIMBÓ "));
}

#[test]
fn strict_rejects_long_fields_instead_of_truncating() {
    let mut payload = paquera_payload();
    payload.merchant_name = "n".repeat(30);
    assert_eq!(
        generate_pix_code_with(&payload, &strict()).unwrap_err(),
        PixPayloadError::MerchantNameTooLong(30)
    );

    let mut payload = paquera_payload();
    payload.merchant_city = "c".repeat(16);
    assert_eq!(
        generate_pix_code_with(&payload, &strict()).unwrap_err(),
        PixPayloadError::MerchantCityTooLong(16)
    );

    let payload = paquera_payload().with_description("x".repeat(73));
    assert_eq!(
        generate_pix_code_with(&payload, &strict()).unwrap_err(),
        PixPayloadError::DescriptionTooLong(73)
    );
}

#[test]
fn strict_rejects_blank_merchant_fields() {
    let mut payload = paquera_payload();
    payload.merchant_name = "   ".to_string();
    assert_eq!(generate_pix_code_with(&payload, &strict()).unwrap_err(), PixPayloadError::EmptyMerchantName);

    let mut payload = paquera_payload();
    payload.merchant_city = String::new();
    assert_eq!(generate_pix_code_with(&payload, &strict()).unwrap_err(), PixPayloadError::EmptyMerchantCity);
}

#[test]
fn strict_rejects_malformed_txid() {
    for txid in ["pedido-1", "A".repeat(26).as_str()] {
        let payload = paquera_payload().with_txid(txid);
        assert!(matches!(
            generate_pix_code_with(&payload, &strict()),
            Err(PixPayloadError::InvalidTxid(_))
        ));
    }
    let wildcard = paquera_payload().with_txid("***");
    assert!(generate_pix_code_with(&wildcard, &strict()).is_ok());
}

#[test]
fn strict_rejects_characters_outside_latin1() {
    let mut payload = paquera_payload();
    payload.merchant_name = "Loja 🚀".to_string();
    assert_eq!(
        generate_pix_code_with(&payload, &strict()).unwrap_err(),
        PixPayloadError::UnsupportedCharacter {
            field: "merchant_name",
            character: '🚀',
        }
    );
}

#[test]
fn strict_rejects_account_template_over_99_characters() {
    let payload = PixPayload::new("user@example.com", PixKeyType::Email, "Ana", "Timbo")
        .with_description("d".repeat(72));
    let err = generate_pix_code_with(&payload, &strict()).unwrap_err();
    assert!(matches!(err, PixPayloadError::Field(TlvError::ValueTooLong { .. })));
    assert_eq!(EncodeOptions::default().validation, ValidationMode::Lenient);
}
