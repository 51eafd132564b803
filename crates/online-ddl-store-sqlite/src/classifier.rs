// crates/online-ddl-store-sqlite/src/classifier.rs
// ============================================================================
// Module: SQLite Error Classifier
// Description: Maps SQLite primary result codes to failure outcomes.
// Purpose: Let the write loop run unchanged against the embedded store.
// Dependencies: online-ddl-core
// ============================================================================

//! ## Overview
//! `SQLITE_SCHEMA` is the engine's signal that the schema changed under a
//! prepared statement, the closest analogue of TiDB's schema-changed error.
//! A missing table surfaces as a generic `SQLITE_ERROR`, so that one code is
//! refined by its message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use online_ddl_core::ErrorClassifier;
use online_ddl_core::FailureOutcome;

// ============================================================================
// SECTION: Result Codes
// ============================================================================

/// Generic error.
const SQLITE_ERROR: i64 = 1;
/// Access permission denied.
const SQLITE_PERM: i64 = 3;
/// Unable to open the database file.
const SQLITE_CANTOPEN: i64 = 14;
/// The database schema changed.
const SQLITE_SCHEMA: i64 = 17;
/// Authorization denied.
const SQLITE_AUTH: i64 = 23;
/// File opened is not a database file.
const SQLITE_NOTADB: i64 = 26;

// ============================================================================
// SECTION: Classifier
// ============================================================================

/// Classifier for [`crate::SqliteSession`] failures.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteErrorClassifier;

impl ErrorClassifier for SqliteErrorClassifier {
    fn classify(&self, code: i64, message: &str) -> FailureOutcome {
        match code {
            SQLITE_SCHEMA => FailureOutcome::RetryableConflict,
            SQLITE_AUTH | SQLITE_PERM => FailureOutcome::FatalAuth,
            SQLITE_CANTOPEN | SQLITE_NOTADB => FailureOutcome::FatalSchema,
            SQLITE_ERROR if message.contains("no such table") => FailureOutcome::FatalSchema,
            _ => FailureOutcome::FatalOther,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use online_ddl_core::ErrorClassifier;
    use online_ddl_core::FailureOutcome;

    use super::SqliteErrorClassifier;

    #[test]
    fn maps_result_codes() {
        let classifier = SqliteErrorClassifier;
        assert_eq!(
            classifier.classify(17, "database schema has changed"),
            FailureOutcome::RetryableConflict
        );
        assert_eq!(classifier.classify(23, "not authorized"), FailureOutcome::FatalAuth);
        assert_eq!(classifier.classify(3, "access permission denied"), FailureOutcome::FatalAuth);
        assert_eq!(
            classifier.classify(14, "unable to open database file"),
            FailureOutcome::FatalSchema
        );
        assert_eq!(classifier.classify(1, "no such table: t"), FailureOutcome::FatalSchema);
        assert_eq!(classifier.classify(1, "near \"x\": syntax error"), FailureOutcome::FatalOther);
        assert_eq!(classifier.classify(5, "database is locked"), FailureOutcome::FatalOther);
    }
}
