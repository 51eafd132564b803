// crates/online-ddl-core/src/interfaces/mod.rs
// ============================================================================
// Module: Online DDL Interfaces
// Description: Backend-agnostic interfaces for stores, classification, pacing,
//              and event output.
// Purpose: Define the contract surfaces consumed by the write loop.
// Dependencies: crate::core, async-trait, serde
// ============================================================================

//! ## Overview
//! Interfaces define how the write loop and alter controller reach external
//! systems without embedding backend details. A [`StoreSession`] is one
//! connection to the store and is owned by exactly one task; sessions are never
//! shared. Failures cross this boundary only as raw [`StoreFailure`] values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::core::EventRecord;
use crate::core::FailureOutcome;
use crate::core::StoreFailure;

// ============================================================================
// SECTION: Values
// ============================================================================

/// Parameter and result value exchanged with a store session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point value.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Opaque bytes.
    Bytes(Vec<u8>),
}

impl SqlValue {
    /// Returns the value as text when it is textual or numeric.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Int(value) => Some(value.to_string()),
            Self::UInt(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::Text(value) => Some(value.clone()),
            Self::Bytes(bytes) => std::str::from_utf8(bytes).ok().map(str::to_string),
        }
    }

    /// Returns the value as a signed integer when representable.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::UInt(value) => i64::try_from(*value).ok(),
            Self::Text(value) => value.parse().ok(),
            Self::Bytes(bytes) => std::str::from_utf8(bytes).ok().and_then(|text| text.parse().ok()),
            Self::Null | Self::Float(_) => None,
        }
    }
}

impl From<u64> for SqlValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Column reported by schema introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Declared column type as reported by the store.
    pub column_type: String,
}

/// SQL flavour spoken by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// TiDB over the MySQL protocol.
    Tidb,
    /// Embedded `SQLite`.
    Sqlite,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tidb => f.write_str("tidb"),
            Self::Sqlite => f.write_str("sqlite"),
        }
    }
}

// ============================================================================
// SECTION: Store Session
// ============================================================================

/// One session (connection) to the store.
///
/// Transactions are session-scoped: at most one is active at a time.
/// Statements issued between [`StoreSession::begin_transaction`] and
/// [`StoreSession::commit`] commit atomically or not at all.
#[async_trait]
pub trait StoreSession: Send {
    /// Returns the dialect used for DDL rendering.
    fn dialect(&self) -> Dialect;

    /// Executes a statement with positional `?` parameters.
    ///
    /// # Errors
    ///
    /// Returns [`StoreFailure`] with the store's native code and message.
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, StoreFailure>;

    /// Runs a query and returns every row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreFailure`] with the store's native code and message.
    async fn query(&mut self, sql: &str) -> Result<Vec<Vec<SqlValue>>, StoreFailure>;

    /// Opens a transaction on this session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreFailure`] when the transaction cannot be started.
    async fn begin_transaction(&mut self) -> Result<(), StoreFailure>;

    /// Commits the active transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreFailure`] when the commit is rejected.
    async fn commit(&mut self) -> Result<(), StoreFailure>;

    /// Rolls back the active transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreFailure`] when the rollback fails.
    async fn rollback(&mut self) -> Result<(), StoreFailure>;

    /// Lists the table's columns in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreFailure`] when the table cannot be introspected.
    async fn describe_table(&mut self, table: &str) -> Result<Vec<ColumnInfo>, StoreFailure>;

    /// Closes the session. Later calls fail with a closed-session error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreFailure`] when the disconnect fails.
    async fn close(&mut self) -> Result<(), StoreFailure>;
}

// ============================================================================
// SECTION: Error Classifier
// ============================================================================

/// Maps raw store failures into abstract outcomes.
///
/// Implementations must be pure and total: the same `(code, message)` always
/// yields the same outcome, and unknown codes map to
/// [`FailureOutcome::FatalOther`].
pub trait ErrorClassifier: Send + Sync {
    /// Classifies a raw failure.
    fn classify(&self, code: i64, message: &str) -> FailureOutcome;

    /// Classifies a [`StoreFailure`].
    fn classify_failure(&self, failure: &StoreFailure) -> FailureOutcome {
        self.classify(failure.code, &failure.message)
    }
}

// ============================================================================
// SECTION: Pacer
// ============================================================================

/// Delay abstraction invoked between attempts.
///
/// The write loop races every pause against its cancellation signal, so a
/// pacer only needs to wait.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Waits for `delay`.
    async fn pause(&self, delay: Duration);
}

// ============================================================================
// SECTION: Event Sink
// ============================================================================

/// Destination for structured task events.
pub trait EventSink: Send + Sync {
    /// Records an event.
    fn record(&self, event: &EventRecord);
}
