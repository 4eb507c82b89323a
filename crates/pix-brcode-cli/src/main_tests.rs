// crates/pix-brcode-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for payload resolution and bounded reads.
// Purpose: Ensure flag precedence and input limits behave as documented.
// Dependencies: pix-brcode-cli main helpers
// ============================================================================

//! ## Overview
//! Validates how `generate` merges flags, payload files, and merchant
//! defaults, and that `read_bytes_with_limit` fails closed on oversized input.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use pix_brcode_cli::i18n::Locale;
use pix_brcode_config::MerchantConfig;
use pix_brcode_config::PixBrcodeConfig;
use pix_brcode_core::PhoneCountryCodeRule;
use pix_brcode_core::PixKeyType;
use pix_brcode_core::ValidationMode;
use pix_brcode_core::decode_pix_code;

use super::CodeSourceArgs;
use super::GenerateCommand;
use super::KeyFormatCommand;
use super::KeyNormalizeCommand;
use super::KeyTypeArg;
use super::LangArg;
use super::PhoneRuleArg;
use super::ReadLimitError;
use super::key_format;
use super::key_normalize;
use super::read_bytes_with_limit;
use super::read_code;
use super::render_decoded_text;
use super::resolve_locale;
use super::resolve_options;
use super::resolve_payload;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn merchant_defaults() -> MerchantConfig {
    MerchantConfig {
        name: Some("Padaria Central".to_string()),
        city: Some("Blumenau".to_string()),
        pix_key: Some("11.222.333/0001-81".to_string()),
        pix_key_type: Some(PixKeyType::Cnpj),
    }
}

// ============================================================================
// SECTION: Payload Resolution
// ============================================================================

#[test]
fn merchant_defaults_fill_missing_flags() {
    let command = GenerateCommand {
        amount: Some("12.5".to_string()),
        ..GenerateCommand::default()
    };
    let payload = resolve_payload(&command, &merchant_defaults()).unwrap();
    assert_eq!(payload.pix_key, "11.222.333/0001-81");
    assert_eq!(payload.pix_key_type, PixKeyType::Cnpj);
    assert_eq!(payload.merchant_name, "Padaria Central");
    assert_eq!(payload.amount, Some(BigDecimal::from_str("12.5").unwrap()));
    assert_eq!(payload.txid, None);
}

#[test]
fn flags_override_merchant_defaults() {
    let command = GenerateCommand {
        key: Some("user@example.com".to_string()),
        key_type: Some(KeyTypeArg::Email),
        city: Some("Timbo".to_string()),
        txid: Some("PED1".to_string()),
        ..GenerateCommand::default()
    };
    let payload = resolve_payload(&command, &merchant_defaults()).unwrap();
    assert_eq!(payload.pix_key, "user@example.com");
    assert_eq!(payload.pix_key_type, PixKeyType::Email);
    assert_eq!(payload.merchant_name, "Padaria Central");
    assert_eq!(payload.merchant_city, "Timbo");
    assert_eq!(payload.txid.as_deref(), Some("PED1"));
}

#[test]
fn missing_key_without_defaults_is_reported() {
    let command = GenerateCommand {
        name: Some("Ana".to_string()),
        city: Some("Timbo".to_string()),
        ..GenerateCommand::default()
    };
    let err = resolve_payload(&command, &MerchantConfig::default()).unwrap_err();
    assert!(err.to_string().contains("--key"), "unexpected error: {err}");
}

#[test]
fn invalid_amount_is_reported() {
    let command = GenerateCommand {
        amount: Some("12,50".to_string()),
        ..GenerateCommand::default()
    };
    let err = resolve_payload(&command, &merchant_defaults()).unwrap_err();
    assert!(err.to_string().contains("12,50"), "unexpected error: {err}");
}

#[test]
fn payload_file_sits_between_flags_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("payload.json");
    fs::write(
        &path,
        r#"{"pixKey":"+5547999998888","pixKeyType":"phone","merchantName":"Fulano",
            "merchantCity":"Blumenau","amount":"0.50","description":"Cafe"}"#,
    )
    .unwrap();
    let command = GenerateCommand {
        payload_file: Some(path),
        name: Some("Beltrano".to_string()),
        ..GenerateCommand::default()
    };
    let payload = resolve_payload(&command, &merchant_defaults()).unwrap();
    assert_eq!(payload.pix_key_type, PixKeyType::Phone);
    assert_eq!(payload.merchant_name, "Beltrano");
    assert_eq!(payload.merchant_city, "Blumenau");
    assert_eq!(payload.amount, Some(BigDecimal::from_str("0.50").unwrap()));
    assert_eq!(payload.description.as_deref(), Some("Cafe"));
}

#[test]
fn flags_override_configured_options() {
    let config = PixBrcodeConfig::default();
    let command = GenerateCommand {
        strict: true,
        phone_rule: Some(PhoneRuleArg::LengthBased),
        ..GenerateCommand::default()
    };
    let options = resolve_options(&command, &config);
    assert_eq!(options.validation, ValidationMode::Strict);
    assert_eq!(options.phone_rule, PhoneCountryCodeRule::LengthBased);

    let defaults = resolve_options(&GenerateCommand::default(), &config);
    assert_eq!(defaults.validation, ValidationMode::Lenient);
    assert_eq!(defaults.phone_rule, PhoneCountryCodeRule::LegacyPrefix);
}

// ============================================================================
// SECTION: Key Commands
// ============================================================================

#[test]
fn key_normalize_follows_phone_rule() {
    let legacy = KeyNormalizeCommand {
        key: "(55) 99123-4567".to_string(),
        key_type: KeyTypeArg::Phone,
        phone_rule: None,
        strict: false,
    };
    assert_eq!(key_normalize(&legacy).unwrap(), "+55991234567");
    let length_based = KeyNormalizeCommand {
        phone_rule: Some(PhoneRuleArg::LengthBased),
        ..legacy
    };
    assert_eq!(key_normalize(&length_based).unwrap(), "+5555991234567");
}

#[test]
fn strict_key_normalize_rejects_bad_check_digits() {
    let command = KeyNormalizeCommand {
        key: "123.456.789-00".to_string(),
        key_type: KeyTypeArg::Cpf,
        phone_rule: None,
        strict: true,
    };
    assert!(key_normalize(&command).is_err());
}

#[test]
fn key_format_strict_and_lenient() {
    let lenient = KeyFormatCommand {
        key: "09607".to_string(),
        key_type: KeyTypeArg::Cpf,
        strict: false,
    };
    assert_eq!(key_format(&lenient).unwrap(), "096.07.-");
    let strict = KeyFormatCommand {
        strict: true,
        ..lenient
    };
    assert!(key_format(&strict).is_err());
}

// ============================================================================
// SECTION: Decode Rendering
// ============================================================================

#[test]
fn decoded_text_formats_key_when_type_known() {
    let code = "00020126570014br.gov.bcb.pix0111096078909060220Paquera PAQ-ABCD1234520400005303986540519.905802BR5920BRUNO EDUARDO OCHNER6005TIMBÓ62070503***63043CA1";
    let decoded = decode_pix_code(code).unwrap();
    let lines = render_decoded_text(&decoded, Some(PixKeyType::Cpf));
    assert!(lines.contains(&"PIX key: 096.078.909-06".to_string()), "{lines:?}");
    assert!(lines.contains(&"Amount: 19.90".to_string()), "{lines:?}");
    assert!(lines.contains(&"Checksum: 3CA1".to_string()), "{lines:?}");
    let raw = render_decoded_text(&decoded, None);
    assert!(raw.contains(&"PIX key: 09607890906".to_string()), "{raw:?}");
}

#[test]
fn read_code_trims_positional_and_file_sources() {
    let inline = CodeSourceArgs {
        code: Some("  000201  \n".to_string()),
        input: None,
    };
    assert_eq!(read_code(&inline).unwrap(), "000201");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("code.txt");
    fs::write(&path, "000201\n").unwrap();
    let from_file = CodeSourceArgs {
        code: None,
        input: Some(path),
    };
    assert_eq!(read_code(&from_file).unwrap(), "000201");

    let missing = CodeSourceArgs {
        code: None,
        input: Some(dir.path().join("absent.txt")),
    };
    assert!(read_code(&missing).is_err());
}

// ============================================================================
// SECTION: Locale and Input Limits
// ============================================================================

#[test]
fn resolve_locale_prefers_flag_over_env() {
    assert_eq!(resolve_locale(Some(LangArg::PtBr), Some("en")).unwrap(), Locale::PtBr);
    assert_eq!(resolve_locale(None, Some("pt-BR")).unwrap(), Locale::PtBr);
    assert_eq!(resolve_locale(None, None).unwrap(), Locale::En);
    assert!(resolve_locale(None, Some("klingon")).is_err());
}

#[test]
fn read_bytes_with_limit_rejects_oversized_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("code.txt");
    fs::write(&path, vec![b'0'; 32]).unwrap();
    match read_bytes_with_limit(&path, 16) {
        Err(ReadLimitError::TooLarge {
            size,
            limit,
        }) => {
            assert_eq!(size, 32);
            assert_eq!(limit, 16);
        }
        other => panic!("expected TooLarge, got {other:?}"),
    }
    assert_eq!(read_bytes_with_limit(&path, 32).unwrap().len(), 32);
}

#[test]
fn read_bytes_with_limit_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_bytes_with_limit(&dir.path().join("absent"), 16);
    assert!(matches!(result, Err(ReadLimitError::Io(_))));
}
