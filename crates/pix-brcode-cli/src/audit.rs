// crates/pix-brcode-cli/src/audit.rs
// ============================================================================
// Module: CLI Audit Logging
// Description: Structured audit events for PIX code generation and decoding.
// Purpose: Emit JSON-line audit records that never carry PIX keys.
// Dependencies: pix-brcode-config, pix-brcode-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every `generate`, `decode`, and `verify` run records one `pix_code` event
//! through an [`AuditSink`]. Events carry the command, the key type when
//! known, the outcome, a stable error kind, and the code length. Keys,
//! merchant names, and codes themselves are never written.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use pix_brcode_config::AuditConfig;
use pix_brcode_core::DecodeError;
use pix_brcode_core::PixKeyError;
use pix_brcode_core::PixKeyType;
use pix_brcode_core::PixPayloadError;
use pix_brcode_core::TlvError;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Command that produced an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PixCommand {
    /// `generate`
    Generate,
    /// `decode`
    Decode,
    /// `verify`
    Verify,
}

/// Outcome of an audited command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PixOutcome {
    /// The command succeeded.
    Ok,
    /// The command failed.
    Error,
}

/// PIX code audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct PixAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Command that ran.
    pub command: PixCommand,
    /// Key type when known.
    pub key_type: Option<PixKeyType>,
    /// Outcome.
    pub outcome: PixOutcome,
    /// Stable error label when the command failed.
    pub error_kind: Option<&'static str>,
    /// Length of the generated or inspected code in characters.
    pub code_length: usize,
}

/// Inputs required to construct an audit event.
pub struct PixAuditEventParams {
    /// Command that ran.
    pub command: PixCommand,
    /// Key type when known.
    pub key_type: Option<PixKeyType>,
    /// Stable error label; `None` on success.
    pub error_kind: Option<&'static str>,
    /// Length of the code in characters.
    pub code_length: usize,
}

impl PixAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: PixAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        let outcome = if params.error_kind.is_some() { PixOutcome::Error } else { PixOutcome::Ok };
        Self {
            event: "pix_code",
            timestamp_ms,
            command: params.command,
            key_type: params.key_type,
            outcome,
            error_kind: params.error_kind,
            code_length: params.code_length,
        }
    }
}

// ============================================================================
// SECTION: Error Kinds
// ============================================================================

/// Returns the stable audit label for a payload error.
#[must_use]
pub const fn payload_error_kind(error: &PixPayloadError) -> &'static str {
    match error {
        PixPayloadError::Key(error) => key_error_kind(error),
        PixPayloadError::NegativeAmount => "negative_amount",
        PixPayloadError::AmountTooLarge => "amount_too_large",
        PixPayloadError::EmptyMerchantName => "empty_merchant_name",
        PixPayloadError::EmptyMerchantCity => "empty_merchant_city",
        PixPayloadError::MerchantNameTooLong(_) => "merchant_name_too_long",
        PixPayloadError::MerchantCityTooLong(_) => "merchant_city_too_long",
        PixPayloadError::DescriptionTooLong(_) => "description_too_long",
        PixPayloadError::InvalidTxid(_) => "invalid_txid",
        PixPayloadError::UnsupportedCharacter {
            ..
        } => "unsupported_character",
        PixPayloadError::Field(error) => tlv_error_kind(error),
    }
}

/// Returns the stable audit label for a key error.
#[must_use]
pub const fn key_error_kind(error: &PixKeyError) -> &'static str {
    match error {
        PixKeyError::InvalidLength {
            ..
        } => "key_invalid_length",
        PixKeyError::InvalidCheckDigits {
            ..
        } => "key_invalid_check_digits",
        PixKeyError::RepeatedDigits {
            ..
        } => "key_repeated_digits",
        PixKeyError::InvalidEmail(_) => "key_invalid_email",
        PixKeyError::InvalidPhone(_) => "key_invalid_phone",
        PixKeyError::InvalidRandomKey(_) => "key_invalid_random",
    }
}

/// Returns the stable audit label for a decode error.
#[must_use]
pub const fn decode_error_kind(error: &DecodeError) -> &'static str {
    match error {
        DecodeError::MissingChecksum => "missing_checksum",
        DecodeError::ChecksumMismatch {
            ..
        } => "checksum_mismatch",
        DecodeError::Tlv(error) => tlv_error_kind(error),
        DecodeError::UnsupportedFormat(_) => "unsupported_format",
        DecodeError::MissingField(_) => "missing_field",
        DecodeError::NotPix => "not_pix",
        DecodeError::InvalidAmount(_) => "invalid_amount",
    }
}

/// Returns the stable audit label for a field encoding error.
const fn tlv_error_kind(error: &TlvError) -> &'static str {
    match error {
        TlvError::InvalidTag {
            ..
        } => "field_invalid_tag",
        TlvError::ValueTooLong {
            ..
        } => "field_too_long",
        TlvError::TruncatedHeader {
            ..
        }
        | TlvError::InvalidLength {
            ..
        }
        | TlvError::TruncatedValue {
            ..
        } => "field_malformed",
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for PIX code events.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &PixAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &PixAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &PixAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &PixAuditEvent) {}
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the sink described by `[audit]`.
///
/// # Errors
///
/// Returns an error if a configured audit file cannot be opened.
pub fn sink_from_config(config: &AuditConfig) -> io::Result<Box<dyn AuditSink>> {
    if !config.enabled {
        return Ok(Box::new(NoopAuditSink));
    }
    match &config.path {
        Some(path) => Ok(Box::new(FileAuditSink::new(Path::new(path.trim()))?)),
        None => Ok(Box::new(StderrAuditSink)),
    }
}
