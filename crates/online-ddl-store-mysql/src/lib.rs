// crates/online-ddl-store-mysql/src/lib.rs
// ============================================================================
// Module: MySQL Protocol Online DDL Store
// Description: TiDB StoreSession backend over the MySQL wire protocol.
// Purpose: Connect the write loop and alter controller to a TiDB cluster.
// Dependencies: online-ddl-core, mysql_async, tokio
// ============================================================================

//! ## Overview
//! This crate provides [`MySqlSession`], a [`StoreSession`] over one
//! `mysql_async` connection, and [`MySqlConfig`] for host, credentials,
//! database, and TLS settings. Failures are classified by
//! [`online_ddl_core::TidbErrorClassifier`].
//!
//! [`StoreSession`]: online_ddl_core::StoreSession

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::CR_SERVER_GONE_ERROR;
pub use store::CR_SERVER_LOST;
pub use store::CR_UNKNOWN_ERROR;
pub use store::DEFAULT_CONNECT_TIMEOUT;
pub use store::DEFAULT_DATABASE;
pub use store::DEFAULT_HOST;
pub use store::DEFAULT_PORT;
pub use store::DEFAULT_USER;
pub use store::MySqlConfig;
pub use store::MySqlSession;
pub use store::MySqlStoreError;
pub use store::TlsMode;
