// crates/pix-brcode-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings in English and Brazilian Portuguese.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The pix-brcode CLI stores user-facing strings in a small translation
//! catalog so output stays consistent across locales. All runtime output
//! should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Brazilian Portuguese.
    PtBr,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::PtBr => "pt-br",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_', '.']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "pt" => Some(Self::PtBr),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::PtBr];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "pix-brcode {version}"),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine translated and may be inaccurate.",
    ),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected en or pt-br."),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("input.read_failed", "Failed to read {kind} at {path}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path} because it is {size} bytes (limit {limit}).",
    ),
    ("input.not_utf8", "{kind} at {path} must be UTF-8."),
    ("input.kind.payload", "payload JSON"),
    ("input.kind.code", "PIX code"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("audit.open_failed", "Failed to open audit log at {path}: {error}"),
    ("json.serialize_failed", "Failed to serialize JSON output: {error}"),
    (
        "generate.missing_field",
        "Missing {field}: pass --{flag} or set merchant.{field} in the config file.",
    ),
    ("generate.payload_parse_failed", "Failed to parse payload JSON at {path}: {error}"),
    ("generate.amount_invalid", "Invalid amount {value}: {error}"),
    ("generate.failed", "Failed to generate PIX code: {error}"),
    ("decode.failed", "Failed to decode PIX code: {error}"),
    ("decode.none", "(none)"),
    ("decode.field.merchant_account_tag", "Merchant account tag"),
    ("decode.field.pix_key", "PIX key"),
    ("decode.field.description", "Description"),
    ("decode.field.merchant_category_code", "Merchant category"),
    ("decode.field.currency", "Currency"),
    ("decode.field.amount", "Amount"),
    ("decode.field.country_code", "Country"),
    ("decode.field.merchant_name", "Merchant name"),
    ("decode.field.merchant_city", "Merchant city"),
    ("decode.field.txid", "Transaction id"),
    ("decode.field.checksum", "Checksum"),
    ("verify.ok", "Checksum valid ({checksum})."),
    ("verify.failed", "Checksum verification failed: {error}"),
    ("key.invalid", "Invalid {key_type} key: {error}"),
];

/// Static Brazilian Portuguese catalog entries.
const CATALOG_PT_BR: &[(&str, &str)] = &[
    ("main.version", "pix-brcode {version}"),
    (
        "i18n.disclaimer.machine_translated",
        "Aviso: a saída em idiomas diferentes do inglês é traduzida automaticamente e pode \
         conter imprecisões.",
    ),
    ("i18n.lang.invalid_env", "Valor inválido para {env}: {value}. Esperado en ou pt-br."),
    ("output.stream.stdout", "saída padrão"),
    ("output.stream.stderr", "saída de erro"),
    ("output.stream.unknown", "saída"),
    ("output.write_failed", "Falha ao escrever em {stream}: {error}"),
    ("input.read_failed", "Falha ao ler {kind} em {path}: {error}"),
    (
        "input.read_too_large",
        "Recusando ler {kind} em {path} porque tem {size} bytes (limite {limit}).",
    ),
    ("input.not_utf8", "{kind} em {path} deve estar em UTF-8."),
    ("input.kind.payload", "JSON do payload"),
    ("input.kind.code", "código PIX"),
    ("config.load_failed", "Falha ao carregar a configuração: {error}"),
    ("config.validate.ok", "Configuração válida."),
    ("audit.open_failed", "Falha ao abrir o log de auditoria em {path}: {error}"),
    ("json.serialize_failed", "Falha ao serializar a saída JSON: {error}"),
    (
        "generate.missing_field",
        "Faltando {field}: use --{flag} ou defina merchant.{field} no arquivo de configuração.",
    ),
    ("generate.payload_parse_failed", "Falha ao interpretar o JSON do payload em {path}: {error}"),
    ("generate.amount_invalid", "Valor inválido {value}: {error}"),
    ("generate.failed", "Falha ao gerar o código PIX: {error}"),
    ("decode.failed", "Falha ao decodificar o código PIX: {error}"),
    ("decode.none", "(nenhum)"),
    ("decode.field.merchant_account_tag", "Tag da conta do recebedor"),
    ("decode.field.pix_key", "Chave PIX"),
    ("decode.field.description", "Descrição"),
    ("decode.field.merchant_category_code", "Categoria do recebedor"),
    ("decode.field.currency", "Moeda"),
    ("decode.field.amount", "Valor"),
    ("decode.field.country_code", "País"),
    ("decode.field.merchant_name", "Nome do recebedor"),
    ("decode.field.merchant_city", "Cidade do recebedor"),
    ("decode.field.txid", "Identificador da transação"),
    ("decode.field.checksum", "Checksum"),
    ("verify.ok", "Checksum válido ({checksum})."),
    ("verify.failed", "Falha na verificação do checksum: {error}"),
    ("key.invalid", "Chave {key_type} inválida: {error}"),
];

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_PT_BR_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::PtBr => CATALOG_PT_BR_MAP.get_or_init(|| CATALOG_PT_BR.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_for(current_locale(), key, args)
}

/// Translates `key` for an explicit locale.
#[must_use]
pub fn translate_for(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
