// crates/online-ddl-core/src/core/state.rs
// ============================================================================
// Module: Online DDL Job State
// Description: Write job bookkeeping and alter operation records.
// Purpose: Hold the state each task owns exclusively while it runs.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`WriteJobState`] is owned by the write worker for the whole run and is
//! handed back to the host afterwards. [`AlterOperation`] is owned by the
//! alter controller for a single application.
//!
//! ## Invariants
//! - Every key below `next_key` that is not in `abandoned_keys` has exactly
//!   one committed row in the store.
//! - `retry_count` never exceeds the configured maximum attempts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ColumnSpec;
use crate::core::identifiers::TableName;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Write Job State
// ============================================================================

/// Progress of the write loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteJobState {
    /// Next logical key to insert.
    pub next_key: u64,
    /// Schema-conflict retries consumed by the current key.
    pub retry_count: u32,
    /// Keys permanently given up after exhausting the retry budget.
    pub abandoned_keys: BTreeSet<u64>,
    /// Rows committed by this job.
    pub committed: u64,
    /// Consecutive cool-downs taken for the current key.
    pub cooldowns: u32,
}

impl WriteJobState {
    /// Creates a job state that starts writing at `next_key`.
    #[must_use]
    pub fn starting_at(next_key: u64) -> Self {
        Self {
            next_key,
            ..Self::default()
        }
    }

    /// Records a committed row for the current key and advances.
    pub(crate) fn record_commit(&mut self) {
        self.committed = self.committed.saturating_add(1);
        self.advance();
    }

    /// Abandons the current key permanently and advances.
    pub(crate) fn abandon_current(&mut self) {
        self.abandoned_keys.insert(self.next_key);
        self.advance();
    }

    /// Moves to the next key and clears per-key counters.
    fn advance(&mut self) {
        self.next_key = self.next_key.saturating_add(1);
        self.retry_count = 0;
        self.cooldowns = 0;
    }
}

// ============================================================================
// SECTION: Alter Operation
// ============================================================================

/// A single schema change applied by the alter controller.
///
/// # Invariants
/// - `finished_at` moves from `None` to `Some` exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterOperation {
    /// Table being altered.
    pub target_table: TableName,
    /// Column added by the operation.
    pub column_spec: ColumnSpec,
    /// When the operation was created.
    pub started_at: Timestamp,
    /// When the underlying call completed or failed.
    finished_at: Option<Timestamp>,
}

impl AlterOperation {
    /// Creates a pending alter operation.
    #[must_use]
    pub const fn new(target_table: TableName, column_spec: ColumnSpec, started_at: Timestamp) -> Self {
        Self {
            target_table,
            column_spec,
            started_at,
            finished_at: None,
        }
    }

    /// Returns the completion timestamp once the operation has run.
    #[must_use]
    pub const fn finished_at(&self) -> Option<Timestamp> {
        self.finished_at
    }

    /// Returns true once the operation has been applied (successfully or not).
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Marks the operation finished. Later calls keep the first timestamp.
    pub(crate) fn finish(&mut self, at: Timestamp) {
        if self.finished_at.is_none() {
            self.finished_at = Some(at);
        }
    }
}
