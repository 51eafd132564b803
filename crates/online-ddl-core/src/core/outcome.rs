// crates/online-ddl-core/src/core/outcome.rs
// ============================================================================
// Module: Online DDL Failure Outcomes
// Description: Raw store failures and their abstract classification.
// Purpose: Separate what the store reported from what the writer does about it.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`StoreFailure`] is the raw `(code, message)` pair a session raises. An
//! [`crate::ErrorClassifier`] turns it into a [`FailureOutcome`], which is the
//! only thing the write loop branches on.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Raw Failures
// ============================================================================

/// Raw failure signal raised by a store session.
///
/// # Invariants
/// - `code` is the backend's native error number (MySQL protocol error code or
///   `SQLite` primary result code).
/// - `message` is the backend's text, passed through unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("store error {code}: {message}")]
pub struct StoreFailure {
    /// Native error code.
    pub code: i64,
    /// Native error message.
    pub message: String,
}

impl StoreFailure {
    /// Creates a store failure from a code and message.
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Classified Outcomes
// ============================================================================

/// Abstract outcome of a failed write attempt.
///
/// # Invariants
/// - Variants are stable for event labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureOutcome {
    /// Schema mutation conflict; retry the same key within the bounded budget.
    RetryableConflict,
    /// Credentials were rejected; never retried.
    FatalAuth,
    /// Database or table is missing; never retried.
    FatalSchema,
    /// Anything else; cooled-down retry outside the bounded budget.
    FatalOther,
}

impl FailureOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RetryableConflict => "retryable_conflict",
            Self::FatalAuth => "fatal_auth",
            Self::FatalSchema => "fatal_schema",
            Self::FatalOther => "fatal_other",
        }
    }

    /// Returns true when the outcome terminates the worker immediately.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::FatalAuth | Self::FatalSchema)
    }
}

impl fmt::Display for FailureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
