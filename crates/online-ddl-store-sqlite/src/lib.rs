// crates/online-ddl-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Online DDL Store
// Description: Embedded StoreSession backend for the online DDL write loop.
// Purpose: Run writer and alter sessions without a TiDB cluster.
// Dependencies: online-ddl-core, rusqlite, tokio
// ============================================================================

//! ## Overview
//! This crate provides an `SQLite`-backed [`StoreSession`] and the matching
//! [`SqliteErrorClassifier`]. Two sessions opened on the same file behave like
//! two connections to one store: writes serialize on the engine lock and a
//! schema change by one session is visible to the other after it commits.
//!
//! [`StoreSession`]: online_ddl_core::StoreSession

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod classifier;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use classifier::SqliteErrorClassifier;
pub use store::DEFAULT_BUSY_TIMEOUT_MS;
pub use store::SqliteJournalMode;
pub use store::SqliteSession;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
