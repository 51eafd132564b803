// crates/online-ddl-core/src/core/events.rs
// ============================================================================
// Module: Online DDL Events
// Description: Structured progress events for the writer and alter tasks.
// Purpose: Report per-attempt progress, abandonment, and fatal errors.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Events are serialized as one JSON object per line by the sinks in
//! [`crate::runtime::sinks`]. Payloads carry store codes and messages but never
//! connection credentials.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::outcome::FailureOutcome;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Task that emitted an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// The write worker.
    Writer,
    /// The alter controller.
    Alter,
    /// Table preparation before the write loop starts.
    Setup,
}

/// Event envelope written by sinks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    /// Emission time.
    pub at: Timestamp,
    /// Emitting task.
    pub task: TaskKind,
    /// Event payload.
    #[serde(flatten)]
    pub event: WorkerEvent,
}

/// Event payloads.
///
/// # Invariants
/// - Tags are stable for downstream log parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkerEvent {
    /// A row was committed.
    RowCommitted {
        /// Committed key.
        key: u64,
    },
    /// A schema conflict was observed; the same key is retried after `delay_ms`.
    ConflictRetry {
        /// Key being retried.
        key: u64,
        /// Retry number (1-based).
        attempt: u32,
        /// Backoff before the retry.
        delay_ms: u64,
        /// Store error code.
        code: i64,
        /// Store error message.
        message: String,
    },
    /// The retry budget ran out and the key was given up.
    KeyAbandoned {
        /// Abandoned key.
        key: u64,
        /// Consecutive conflicts observed before giving up.
        attempts: u32,
    },
    /// Rolling back a failed attempt also failed.
    RollbackFailed {
        /// Key in flight.
        key: u64,
        /// Store error code.
        code: i64,
        /// Store error message.
        message: String,
    },
    /// An unexpected failure triggered a fixed cool-down.
    Cooldown {
        /// Key that will be retried.
        key: u64,
        /// Cool-down length.
        cooldown_ms: u64,
        /// Consecutive cool-downs for this key.
        cooldowns: u32,
        /// Store error code.
        code: i64,
        /// Store error message.
        message: String,
    },
    /// A fatal failure stopped the task.
    Fatal {
        /// Key in flight when the failure occurred, if any.
        key: Option<u64>,
        /// Classified outcome.
        outcome: FailureOutcome,
        /// Store error code.
        code: i64,
        /// Store error message.
        message: String,
    },
    /// The write worker stopped.
    WorkerStopped {
        /// Stop reason label.
        reason: &'static str,
        /// Next key that would have been written.
        next_key: u64,
        /// Rows committed by the job.
        committed: u64,
        /// Keys abandoned by the job.
        abandoned: Vec<u64>,
    },
    /// Table setup hit a non-fatal problem.
    SetupWarning {
        /// Statement that failed.
        statement: String,
        /// Store error code.
        code: i64,
        /// Store error message.
        message: String,
    },
    /// Metadata lock setting read back after the change.
    MetadataLockSetting {
        /// Variable name reported by the server.
        name: String,
        /// Current value; `None` when the server returned no row.
        value: Option<String>,
    },
    /// Table setup finished.
    TablePrepared {
        /// Table name.
        table: String,
    },
    /// Alter operation started.
    AlterStarted {
        /// Table name.
        table: String,
        /// Rendered column spec.
        column: String,
    },
    /// Alter operation finished and the column is visible.
    AlterFinished {
        /// Table name.
        table: String,
        /// Duration of the alter call.
        elapsed_ms: u64,
    },
    /// Alter operation failed.
    AlterFailed {
        /// Table name.
        table: String,
        /// Failure description.
        reason: String,
    },
}
