// crates/pix-brcode-cli/src/lib.rs
// ============================================================================
// Module: PIX BR Code CLI Library
// Description: Shared helpers for the pix-brcode command-line interface.
// Purpose: Provide reusable components (i18n, audit) for the binary and tests.
// Dependencies: pix-brcode-config, pix-brcode-core, serde, serde_json
// ============================================================================

//! ## Overview
//! This library houses the message catalog and the audit event sinks. The
//! binary entry point (`src/main.rs`) imports these helpers so every
//! user-facing string and every audit line has a single definition.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Structured audit events for code generation and decoding.
pub mod audit;
/// Internationalization helpers and message catalog.
pub mod i18n;
