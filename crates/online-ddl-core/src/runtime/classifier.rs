// crates/online-ddl-core/src/runtime/classifier.rs
// ============================================================================
// Module: TiDB Error Classifier
// Description: Maps MySQL-protocol error codes reported by TiDB to outcomes.
// Purpose: Decide retry, abandon, or stop without touching a connection.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The one mapping that matters most is TiDB's "information schema is changed"
//! error (8028): an online `ALTER TABLE` invalidates the plan of a concurrent
//! writer's transaction and the store rejects the commit. That error is a
//! transient conflict and is retried within the bounded budget. Credential and
//! missing-database errors are fatal and never retried. Every other code,
//! including client-side connection errors, is [`FailureOutcome::FatalOther`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::FailureOutcome;
use crate::interfaces::ErrorClassifier;

// ============================================================================
// SECTION: Error Codes
// ============================================================================

/// Information schema changed during the transaction (TiDB).
pub const ER_INFO_SCHEMA_CHANGED: i64 = 8028;
/// Access denied for user (bad credentials).
pub const ER_ACCESS_DENIED_ERROR: i64 = 1045;
/// Access denied for user to database.
pub const ER_DBACCESS_DENIED_ERROR: i64 = 1044;
/// Unknown database.
pub const ER_BAD_DB_ERROR: i64 = 1049;
/// Table does not exist.
pub const ER_NO_SUCH_TABLE: i64 = 1146;

// ============================================================================
// SECTION: Classifier
// ============================================================================

/// Classifier for TiDB and other MySQL-protocol stores.
#[derive(Debug, Default, Clone, Copy)]
pub struct TidbErrorClassifier;

impl ErrorClassifier for TidbErrorClassifier {
    fn classify(&self, code: i64, _message: &str) -> FailureOutcome {
        match code {
            ER_INFO_SCHEMA_CHANGED => FailureOutcome::RetryableConflict,
            ER_ACCESS_DENIED_ERROR | ER_DBACCESS_DENIED_ERROR => FailureOutcome::FatalAuth,
            ER_BAD_DB_ERROR | ER_NO_SUCH_TABLE => FailureOutcome::FatalSchema,
            _ => FailureOutcome::FatalOther,
        }
    }
}
