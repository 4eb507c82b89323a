// crates/pix-brcode-config/src/lib.rs
// ============================================================================
// Module: PIX BR Code Config Library
// Description: Configuration model and validation for the pix-brcode tool.
// Purpose: Single source of truth for pix-brcode.toml semantics.
// Dependencies: pix-brcode-core, serde, toml
// ============================================================================

//! ## Overview
//! `pix-brcode-config` defines the TOML configuration read by the
//! `pix-brcode` command-line tool: merchant defaults, encoding options, and
//! audit output. Loading is bounded and validation fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
