// crates/pix-brcode-cli/src/main.rs
// ============================================================================
// Module: PIX BR Code CLI Entry Point
// Description: Command dispatcher for generating, decoding, and checking codes.
// Purpose: Provide a localized CLI over the PIX BR Code core library.
// Dependencies: bigdecimal, clap, pix-brcode-config, pix-brcode-core, serde, thiserror
// ============================================================================

//! ## Overview
//! `pix-brcode` generates static PIX "copia e cola" codes from flags, a JSON
//! payload file, or merchant defaults in `pix-brcode.toml`. It also decodes
//! and verifies existing codes and normalizes or formats individual keys.
//! All user-facing strings are routed through the i18n catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use pix_brcode_cli::audit::AuditSink;
use pix_brcode_cli::audit::PixAuditEvent;
use pix_brcode_cli::audit::PixAuditEventParams;
use pix_brcode_cli::audit::PixCommand;
use pix_brcode_cli::audit::decode_error_kind;
use pix_brcode_cli::audit::payload_error_kind;
use pix_brcode_cli::audit::sink_from_config;
use pix_brcode_cli::i18n::Locale;
use pix_brcode_cli::i18n::set_locale;
use pix_brcode_cli::t;
use pix_brcode_config::MerchantConfig;
use pix_brcode_config::PixBrcodeConfig;
use pix_brcode_core::DecodedPixCode;
use pix_brcode_core::EncodeOptions;
use pix_brcode_core::PhoneCountryCodeRule;
use pix_brcode_core::PixKey;
use pix_brcode_core::PixKeyType;
use pix_brcode_core::PixPayload;
use pix_brcode_core::ValidationMode;
use pix_brcode_core::decode_pix_code;
use pix_brcode_core::format_amount;
use pix_brcode_core::format_pix_key_for_display;
use pix_brcode_core::generate_pix_code_with;
use pix_brcode_core::normalize_pix_key_with;
use pix_brcode_core::try_format_pix_key_for_display;
use pix_brcode_core::verify_checksum;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum payload JSON size in bytes.
const MAX_PAYLOAD_BYTES: usize = 64 * 1024;
/// Maximum BR Code file size in bytes.
const MAX_CODE_BYTES: usize = 4 * 1024;
/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "PIX_BRCODE_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "pix-brcode", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `PIX_BRCODE_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Config file path (defaults to pix-brcode.toml or `PIX_BRCODE_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a PIX BR Code.
    Generate(GenerateCommand),
    /// Decode and verify a PIX BR Code.
    Decode(DecodeCommand),
    /// Verify the checksum of a PIX BR Code.
    Verify(VerifyCommand),
    /// PIX key utilities.
    Key {
        /// Selected key subcommand.
        #[command(subcommand)]
        command: KeyCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Key subcommands.
#[derive(Subcommand, Debug)]
enum KeyCommand {
    /// Normalize a key to its transmitted form.
    Normalize(KeyNormalizeCommand),
    /// Format a stored key for display.
    Format(KeyFormatCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the configuration file.
    Validate,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Brazilian Portuguese.
    PtBr,
}

/// PIX key type selections.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum KeyTypeArg {
    /// Individual taxpayer id (CPF).
    #[value(alias = "tax-id-individual")]
    Cpf,
    /// Business taxpayer id (CNPJ).
    #[value(alias = "tax-id-business")]
    Cnpj,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Random key (EVP).
    #[value(alias = "random-token", alias = "evp")]
    Random,
}

/// Phone country-code detection selections.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum PhoneRuleArg {
    /// Treat any number starting with 55 as already international.
    LegacyPrefix,
    /// Decide by digit count; 10-11 digits are national.
    LengthBased,
}

/// Arguments for code generation.
#[derive(Args, Debug, Default)]
struct GenerateCommand {
    /// PIX key.
    #[arg(long, value_name = "KEY", allow_hyphen_values = true)]
    key: Option<String>,
    /// PIX key type.
    #[arg(long = "key-type", value_enum, value_name = "TYPE")]
    key_type: Option<KeyTypeArg>,
    /// Merchant name.
    #[arg(long, value_name = "NAME")]
    name: Option<String>,
    /// Merchant city.
    #[arg(long, value_name = "CITY")]
    city: Option<String>,
    /// Amount in BRL (omitted when absent or not positive).
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    amount: Option<String>,
    /// Reference label (defaults to `***`).
    #[arg(long, value_name = "TXID")]
    txid: Option<String>,
    /// Free-text description.
    #[arg(long, value_name = "TEXT")]
    description: Option<String>,
    /// JSON payload file; flags override its fields.
    #[arg(long = "payload-file", value_name = "PATH")]
    payload_file: Option<PathBuf>,
    /// Reject malformed input instead of degrading silently.
    #[arg(long)]
    strict: bool,
    /// Phone country-code detection rule.
    #[arg(long = "phone-rule", value_enum, value_name = "RULE")]
    phone_rule: Option<PhoneRuleArg>,
    /// Print JSON instead of the bare code.
    #[arg(long)]
    json: bool,
}

/// Where to read a BR Code from.
#[derive(Args, Debug)]
struct CodeSourceArgs {
    /// BR Code text.
    #[arg(value_name = "CODE", required_unless_present = "input", conflicts_with = "input")]
    code: Option<String>,
    /// Read the BR Code from a file.
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,
}

/// Arguments for decoding.
#[derive(Args, Debug)]
struct DecodeCommand {
    /// Code source.
    #[command(flatten)]
    source: CodeSourceArgs,
    /// Key type, used to format the key and rebuild the payload.
    #[arg(long = "key-type", value_enum, value_name = "TYPE")]
    key_type: Option<KeyTypeArg>,
    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// Arguments for checksum verification.
#[derive(Args, Debug)]
struct VerifyCommand {
    /// Code source.
    #[command(flatten)]
    source: CodeSourceArgs,
}

/// Arguments for key normalization.
#[derive(Args, Debug)]
struct KeyNormalizeCommand {
    /// Raw key.
    #[arg(value_name = "KEY", allow_hyphen_values = true)]
    key: String,
    /// Key type.
    #[arg(long = "type", value_enum, value_name = "TYPE")]
    key_type: KeyTypeArg,
    /// Phone country-code detection rule.
    #[arg(long = "phone-rule", value_enum, value_name = "RULE")]
    phone_rule: Option<PhoneRuleArg>,
    /// Validate the normalized key.
    #[arg(long)]
    strict: bool,
}

/// Arguments for key display formatting.
#[derive(Args, Debug)]
struct KeyFormatCommand {
    /// Stored key.
    #[arg(value_name = "KEY", allow_hyphen_values = true)]
    key: String,
    /// Key type.
    #[arg(long = "type", value_enum, value_name = "TYPE")]
    key_type: KeyTypeArg,
    /// Reject keys with the wrong digit count.
    #[arg(long)]
    strict: bool,
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// JSON output for `generate`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateOutput<'a> {
    /// Generated BR Code.
    code: &'a str,
    /// Validation mode used.
    validation: ValidationMode,
    /// Phone rule used.
    phone_rule: PhoneCountryCodeRule,
    /// Payload that was encoded.
    payload: &'a PixPayload,
}

/// JSON output for `decode`.
#[derive(Serialize)]
struct DecodeOutput<'a> {
    /// Decoded fields.
    #[serde(flatten)]
    decoded: &'a DecodedPixCode,
    /// Rebuilt payload when a key type was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<PixPayload>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let config_path = cli.config.as_deref();
    match command {
        Commands::Generate(command) => command_generate(&command, config_path),
        Commands::Decode(command) => command_decode(&command, config_path),
        Commands::Verify(command) => command_verify(&command, config_path),
        Commands::Key {
            command,
        } => command_key(&command),
        Commands::Config {
            command,
        } => command_config(&command, config_path),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Generate Command
// ============================================================================

/// Executes the `generate` command.
fn command_generate(command: &GenerateCommand, config_path: Option<&Path>) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let sink = open_audit_sink(&config)?;
    let payload = resolve_payload(command, &config.merchant)?;
    let options = resolve_options(command, &config);

    let result = generate_pix_code_with(&payload, &options);
    sink.record(&PixAuditEvent::new(PixAuditEventParams {
        command: PixCommand::Generate,
        key_type: Some(payload.pix_key_type),
        error_kind: result.as_ref().err().map(payload_error_kind),
        code_length: result.as_ref().map_or(0, |code| code.chars().count()),
    }));
    let code = result.map_err(|err| CliError::new(t!("generate.failed", error = err)))?;

    if command.json {
        write_json(&GenerateOutput {
            code: &code,
            validation: options.validation,
            phone_rule: options.phone_rule,
            payload: &payload,
        })?;
    } else {
        write_stdout_line(&code).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Builds the payload from flags, an optional payload file, and merchant defaults.
///
/// Precedence per field: flag, then payload file, then `[merchant]`.
fn resolve_payload(command: &GenerateCommand, merchant: &MerchantConfig) -> CliResult<PixPayload> {
    let base = command.payload_file.as_deref().map(read_payload_file).transpose()?;

    let pix_key = command
        .key
        .clone()
        .or_else(|| base.as_ref().map(|payload| payload.pix_key.clone()))
        .or_else(|| merchant.pix_key.clone())
        .ok_or_else(|| missing_field("pix_key", "key"))?;
    let pix_key_type = command
        .key_type
        .map(PixKeyType::from)
        .or_else(|| base.as_ref().map(|payload| payload.pix_key_type))
        .or(merchant.pix_key_type)
        .ok_or_else(|| missing_field("pix_key_type", "key-type"))?;
    let merchant_name = command
        .name
        .clone()
        .or_else(|| base.as_ref().map(|payload| payload.merchant_name.clone()))
        .or_else(|| merchant.name.clone())
        .ok_or_else(|| missing_field("name", "name"))?;
    let merchant_city = command
        .city
        .clone()
        .or_else(|| base.as_ref().map(|payload| payload.merchant_city.clone()))
        .or_else(|| merchant.city.clone())
        .ok_or_else(|| missing_field("city", "city"))?;

    let mut payload = PixPayload::new(pix_key, pix_key_type, merchant_name, merchant_city);
    payload.amount = match &command.amount {
        Some(text) => Some(parse_amount(text)?),
        None => base.as_ref().and_then(|payload| payload.amount.clone()),
    };
    payload.txid =
        command.txid.clone().or_else(|| base.as_ref().and_then(|payload| payload.txid.clone()));
    payload.description = command
        .description
        .clone()
        .or_else(|| base.as_ref().and_then(|payload| payload.description.clone()));
    Ok(payload)
}

/// Applies `--strict` and `--phone-rule` over the configured options.
fn resolve_options(command: &GenerateCommand, config: &PixBrcodeConfig) -> EncodeOptions {
    let mut options = config.encode_options();
    if command.strict {
        options.validation = ValidationMode::Strict;
    }
    if let Some(rule) = command.phone_rule {
        options.phone_rule = rule.into();
    }
    options
}

/// Parses an amount flag.
fn parse_amount(text: &str) -> CliResult<BigDecimal> {
    BigDecimal::from_str(text.trim())
        .map_err(|err| CliError::new(t!("generate.amount_invalid", value = text, error = err)))
}

/// Builds the error for a payload field with no source.
fn missing_field(field: &str, flag: &str) -> CliError {
    CliError::new(t!("generate.missing_field", field = field, flag = flag))
}

/// Reads a JSON payload file.
fn read_payload_file(path: &Path) -> CliResult<PixPayload> {
    let kind = t!("input.kind.payload");
    let text = read_text_input(path, &kind, MAX_PAYLOAD_BYTES)?;
    serde_json::from_str(&text).map_err(|err| {
        CliError::new(t!("generate.payload_parse_failed", path = path.display(), error = err))
    })
}

// ============================================================================
// SECTION: Decode and Verify Commands
// ============================================================================

/// Executes the `decode` command.
fn command_decode(command: &DecodeCommand, config_path: Option<&Path>) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let sink = open_audit_sink(&config)?;
    let code = read_code(&command.source)?;
    let key_type = command.key_type.map(PixKeyType::from);

    let result = decode_pix_code(&code);
    sink.record(&PixAuditEvent::new(PixAuditEventParams {
        command: PixCommand::Decode,
        key_type,
        error_kind: result.as_ref().err().map(decode_error_kind),
        code_length: code.chars().count(),
    }));
    let decoded = result.map_err(|err| CliError::new(t!("decode.failed", error = err)))?;

    if command.json {
        let payload = key_type.map(|key_type| decoded.clone().into_payload(key_type));
        write_json(&DecodeOutput {
            decoded: &decoded,
            payload,
        })?;
    } else {
        for line in render_decoded_text(&decoded, key_type) {
            write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `verify` command.
fn command_verify(command: &VerifyCommand, config_path: Option<&Path>) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let sink = open_audit_sink(&config)?;
    let code = read_code(&command.source)?;

    let result = verify_checksum(&code);
    sink.record(&PixAuditEvent::new(PixAuditEventParams {
        command: PixCommand::Verify,
        key_type: None,
        error_kind: result.as_ref().err().map(decode_error_kind),
        code_length: code.chars().count(),
    }));
    result.map_err(|err| CliError::new(t!("verify.failed", error = err)))?;

    let checksum: String = code.chars().skip(code.chars().count().saturating_sub(4)).collect();
    write_stdout_line(&t!("verify.ok", checksum = checksum.to_uppercase()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Renders decoded fields as `label: value` lines.
fn render_decoded_text(decoded: &DecodedPixCode, key_type: Option<PixKeyType>) -> Vec<String> {
    let none = t!("decode.none");
    let key = key_type.map_or_else(
        || decoded.pix_key.clone(),
        |key_type| format_pix_key_for_display(&decoded.pix_key, key_type),
    );
    let amount = decoded.amount.as_ref().map_or_else(|| none.clone(), format_amount);
    vec![
        field_line(&t!("decode.field.merchant_account_tag"), &decoded.merchant_account_tag),
        field_line(&t!("decode.field.pix_key"), &key),
        field_line(
            &t!("decode.field.description"),
            decoded.description.as_deref().unwrap_or(&none),
        ),
        field_line(&t!("decode.field.merchant_category_code"), &decoded.merchant_category_code),
        field_line(&t!("decode.field.currency"), &decoded.currency),
        field_line(&t!("decode.field.amount"), &amount),
        field_line(&t!("decode.field.country_code"), &decoded.country_code),
        field_line(&t!("decode.field.merchant_name"), &decoded.merchant_name),
        field_line(&t!("decode.field.merchant_city"), &decoded.merchant_city),
        field_line(&t!("decode.field.txid"), decoded.txid.as_deref().unwrap_or(&none)),
        field_line(&t!("decode.field.checksum"), &decoded.checksum),
    ]
}

/// Formats one `label: value` line.
fn field_line(label: &str, value: &str) -> String {
    format!("{label}: {value}")
}

/// Returns the trimmed code from `--input` or the positional argument.
fn read_code(source: &CodeSourceArgs) -> CliResult<String> {
    let text = source.input.as_deref().map_or_else(
        || Ok(source.code.clone().unwrap_or_default()),
        |path| read_text_input(path, &t!("input.kind.code"), MAX_CODE_BYTES),
    )?;
    Ok(text.trim().to_string())
}

// ============================================================================
// SECTION: Key Commands
// ============================================================================

/// Dispatches key subcommands.
fn command_key(command: &KeyCommand) -> CliResult<ExitCode> {
    let output = match command {
        KeyCommand::Normalize(command) => key_normalize(command)?,
        KeyCommand::Format(command) => key_format(command)?,
    };
    write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Normalizes a key, validating it when `--strict` is set.
fn key_normalize(command: &KeyNormalizeCommand) -> CliResult<String> {
    let key_type = PixKeyType::from(command.key_type);
    let rule = command.phone_rule.map(PhoneCountryCodeRule::from).unwrap_or_default();
    if command.strict {
        PixKey::parse(&command.key, key_type, rule).map(PixKey::into_string).map_err(|err| {
            CliError::new(t!("key.invalid", key_type = key_type.as_str(), error = err))
        })
    } else {
        Ok(normalize_pix_key_with(&command.key, key_type, rule))
    }
}

/// Formats a key for display, rejecting wrong digit counts when `--strict` is set.
fn key_format(command: &KeyFormatCommand) -> CliResult<String> {
    let key_type = PixKeyType::from(command.key_type);
    if command.strict {
        try_format_pix_key_for_display(&command.key, key_type).map_err(|err| {
            CliError::new(t!("key.invalid", key_type = key_type.as_str(), error = err))
        })
    } else {
        Ok(format_pix_key_for_display(&command.key, key_type))
    }
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand, config_path: Option<&Path>) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => command_config_validate(config_path),
    }
}

/// Executes the config validation command.
fn command_config_validate(config_path: Option<&Path>) -> CliResult<ExitCode> {
    let _config = PixBrcodeConfig::load(config_path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads configuration, using defaults when no config file exists.
fn load_config(config_path: Option<&Path>) -> CliResult<PixBrcodeConfig> {
    PixBrcodeConfig::load_or_default(config_path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Opens the audit sink described by the configuration.
fn open_audit_sink(config: &PixBrcodeConfig) -> CliResult<Box<dyn AuditSink>> {
    sink_from_config(&config.audit).map_err(|err| {
        CliError::new(t!(
            "audit.open_failed",
            path = config.audit.path.as_deref().unwrap_or_default(),
            error = err
        ))
    })
}

// ============================================================================
// SECTION: Conversions
// ============================================================================

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::PtBr => Self::PtBr,
        }
    }
}

impl From<KeyTypeArg> for PixKeyType {
    fn from(value: KeyTypeArg) -> Self {
        match value {
            KeyTypeArg::Cpf => Self::Cpf,
            KeyTypeArg::Cnpj => Self::Cnpj,
            KeyTypeArg::Email => Self::Email,
            KeyTypeArg::Phone => Self::Phone,
            KeyTypeArg::Random => Self::Random,
        }
    }
}

impl From<PhoneRuleArg> for PhoneCountryCodeRule {
    fn from(value: PhoneRuleArg) -> Self {
        match value {
            PhoneRuleArg::LegacyPrefix => Self::LegacyPrefix,
            PhoneRuleArg::LengthBased => Self::LengthBased,
        }
    }
}

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads a bounded UTF-8 text file.
fn read_text_input(path: &Path, kind: &str, max_bytes: usize) -> CliResult<String> {
    let bytes = read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(err) => CliError::new(t!(
            "input.read_failed",
            kind = kind,
            path = path.display(),
            error = err
        )),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    String::from_utf8(bytes)
        .map_err(|_| CliError::new(t!("input.not_utf8", kind = kind, path = path.display())))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a value as pretty JSON to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("json.serialize_failed", error = err)))?;
    write_stdout_line(&text).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
