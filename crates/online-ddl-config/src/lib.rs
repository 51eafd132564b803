// crates/online-ddl-config/src/lib.rs
// ============================================================================
// Module: Online DDL Config Library
// Description: Config model, environment overrides, and validation.
// Purpose: Single source of truth for online-ddl.toml semantics.
// Dependencies: online-ddl-core, online-ddl-store-mysql, online-ddl-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `online-ddl-config` defines the configuration model shared by the CLI and
//! any other host of the write loop. Loading is strict and fail-closed; the
//! model converts into the session and worker settings of the other crates.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
