// crates/pix-brcode-cli/src/tests/audit.rs
// ============================================================================
// Module: CLI Audit Tests
// Description: Unit tests for audit event shape and sinks.
// Purpose: Ensure audit lines are well-formed and never carry PIX keys.
// Dependencies: pix-brcode-cli audit module, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Records events through the file sink and checks the JSON lines, and maps
//! core errors to their stable audit labels.

use std::fs;

use pix_brcode_config::AuditConfig;
use pix_brcode_core::DecodeError;
use pix_brcode_core::EncodeOptions;
use pix_brcode_core::PhoneCountryCodeRule;
use pix_brcode_core::PixKeyType;
use pix_brcode_core::PixPayload;
use pix_brcode_core::generate_pix_code_with;
use serde_json::Value;

use crate::audit::AuditSink;
use crate::audit::FileAuditSink;
use crate::audit::PixAuditEvent;
use crate::audit::PixAuditEventParams;
use crate::audit::PixCommand;
use crate::audit::PixOutcome;
use crate::audit::decode_error_kind;
use crate::audit::payload_error_kind;
use crate::audit::sink_from_config;

#[test]
fn event_outcome_follows_error_kind() {
    let ok = PixAuditEvent::new(PixAuditEventParams {
        command: PixCommand::Generate,
        key_type: Some(PixKeyType::Cpf),
        error_kind: None,
        code_length: 120,
    });
    assert_eq!(ok.event, "pix_code");
    assert_eq!(ok.outcome, PixOutcome::Ok);

    let failed = PixAuditEvent::new(PixAuditEventParams {
        command: PixCommand::Verify,
        key_type: None,
        error_kind: Some("checksum_mismatch"),
        code_length: 120,
    });
    assert_eq!(failed.outcome, PixOutcome::Error);
}

#[test]
fn file_sink_appends_json_lines_without_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let sink = FileAuditSink::new(&path).unwrap();
    for command in [PixCommand::Generate, PixCommand::Decode] {
        sink.record(&PixAuditEvent::new(PixAuditEventParams {
            command,
            key_type: Some(PixKeyType::Email),
            error_kind: None,
            code_length: 99,
        }));
    }

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["event"], "pix_code");
    assert_eq!(first["command"], "generate");
    assert_eq!(first["key_type"], "email");
    assert_eq!(first["outcome"], "ok");
    assert_eq!(first["code_length"], 99);
    assert!(first.get("pix_key").is_none());
    let second: Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["command"], "decode");
}

#[test]
fn sink_from_config_honors_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let config = AuditConfig {
        enabled: true,
        path: Some(path.to_string_lossy().into_owned()),
    };
    let sink = sink_from_config(&config).unwrap();
    sink.record(&PixAuditEvent::new(PixAuditEventParams {
        command: PixCommand::Verify,
        key_type: None,
        error_kind: Some("missing_checksum"),
        code_length: 6,
    }));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"error_kind\":\"missing_checksum\""));
}

#[test]
fn disabled_audit_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.jsonl");
    let config = AuditConfig {
        enabled: false,
        path: Some(path.to_string_lossy().into_owned()),
    };
    let sink = sink_from_config(&config).unwrap();
    sink.record(&PixAuditEvent::new(PixAuditEventParams {
        command: PixCommand::Generate,
        key_type: None,
        error_kind: None,
        code_length: 0,
    }));
    assert!(!path.exists());
}

#[test]
fn error_kinds_are_stable_labels() {
    let payload = PixPayload::new("123", PixKeyType::Cpf, "Ana", "Timbo");
    let err = generate_pix_code_with(&payload, &EncodeOptions::strict(PhoneCountryCodeRule::default()))
        .unwrap_err();
    assert_eq!(payload_error_kind(&err), "key_invalid_length");

    assert_eq!(decode_error_kind(&DecodeError::MissingChecksum), "missing_checksum");
    assert_eq!(decode_error_kind(&DecodeError::NotPix), "not_pix");
    assert_eq!(
        decode_error_kind(&DecodeError::ChecksumMismatch {
            expected: "0000".to_string(),
            actual: "FFFF".to_string(),
        }),
        "checksum_mismatch"
    );
}
