// crates/online-ddl-core/src/runtime/alter.rs
// ============================================================================
// Module: Alter Controller
// Description: Applies a single online column addition to the row table.
// Purpose: Change the schema underneath a running write loop.
// Dependencies: crate::{core, interfaces, runtime}, thiserror
// ============================================================================

//! ## Overview
//! The controller runs on its own session and never coordinates with the
//! write worker. It probes the table, issues `ALTER TABLE ... ADD COLUMN`,
//! then confirms through schema introspection that the column is visible.
//!
//! ## Invariants
//! - An [`AlterOperation`] is applied at most once; its `finished_at` is set
//!   exactly once whether the attempt succeeds or fails.
//! - The alter is never issued when the probe fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::core::AlterOperation;
use crate::core::Clock;
use crate::core::ColumnSpec;
use crate::core::EventRecord;
use crate::core::StoreFailure;
use crate::core::SystemClock;
use crate::core::TableName;
use crate::core::TaskKind;
use crate::core::WorkerEvent;
use crate::interfaces::ColumnInfo;
use crate::interfaces::EventSink;
use crate::interfaces::StoreSession;
use crate::runtime::sql;
use crate::runtime::worker::duration_ms;

// ============================================================================
// SECTION: Results
// ============================================================================

/// Outcome of a successful alter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterReport {
    /// Columns reported by the store after the alter.
    pub columns: Vec<ColumnInfo>,
    /// Wall time spent in the `ALTER TABLE` call.
    pub elapsed_ms: u64,
}

/// Alter controller failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlterError {
    /// The operation has already been applied.
    #[error("alter on {table} was already applied")]
    AlreadyApplied {
        /// Target table.
        table: String,
    },
    /// The target table could not be read.
    #[error("table {table} does not exist or cannot be accessed: {failure}")]
    TableMissing {
        /// Target table.
        table: String,
        /// Probe failure.
        failure: StoreFailure,
    },
    /// The store rejected the alter or the follow-up introspection.
    #[error("alter on {table} failed: {failure}")]
    AlterFailed {
        /// Target table.
        table: String,
        /// Raw failure.
        failure: StoreFailure,
    },
    /// The alter returned but the column is not visible.
    #[error("column {column} is not visible on {table} after the alter")]
    NotVisible {
        /// Target table.
        table: String,
        /// Expected column name.
        column: String,
    },
}

// ============================================================================
// SECTION: Controller
// ============================================================================

/// Applies column additions and reports them as events.
pub struct AlterController {
    /// Event destination.
    sink: Arc<dyn EventSink>,
    /// Timestamp source for operations and events.
    clock: Arc<dyn Clock>,
}

impl AlterController {
    /// Creates a controller that reports to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Creates a pending operation stamped with the controller's clock.
    #[must_use]
    pub fn operation(&self, table: TableName, column: ColumnSpec) -> AlterOperation {
        AlterOperation::new(table, column, self.clock.now())
    }

    /// Applies `operation` on `session`.
    ///
    /// # Errors
    ///
    /// Returns [`AlterError`] when the operation was already applied, the
    /// table is missing, the store rejects the alter, or the column is not
    /// visible afterwards.
    pub async fn apply<S>(
        &self,
        session: &mut S,
        operation: &mut AlterOperation,
    ) -> Result<AlterReport, AlterError>
    where
        S: StoreSession + ?Sized,
    {
        let table = operation.target_table.to_string();
        if operation.is_finished() {
            return Err(AlterError::AlreadyApplied {
                table,
            });
        }
        let result = self.apply_once(session, operation).await;
        operation.finish(self.clock.now());
        match &result {
            Ok(report) => self.emit(WorkerEvent::AlterFinished {
                table,
                elapsed_ms: report.elapsed_ms,
            }),
            Err(err) => self.emit(WorkerEvent::AlterFailed {
                table,
                reason: err.to_string(),
            }),
        }
        result
    }

    /// Probe, alter, and verify.
    async fn apply_once<S>(
        &self,
        session: &mut S,
        operation: &AlterOperation,
    ) -> Result<AlterReport, AlterError>
    where
        S: StoreSession + ?Sized,
    {
        let table = &operation.target_table;
        let column = &operation.column_spec;
        session.query(&sql::probe_table(table)).await.map_err(|failure| {
            AlterError::TableMissing {
                table: table.to_string(),
                failure,
            }
        })?;

        self.emit(WorkerEvent::AlterStarted {
            table: table.to_string(),
            column: column.to_string(),
        });
        let started = Instant::now();
        session.execute(&sql::add_column(table, column), &[]).await.map_err(|failure| {
            AlterError::AlterFailed {
                table: table.to_string(),
                failure,
            }
        })?;
        let elapsed_ms = duration_ms(started.elapsed());

        let columns = session.describe_table(table.as_str()).await.map_err(|failure| {
            AlterError::AlterFailed {
                table: table.to_string(),
                failure,
            }
        })?;
        if !columns.iter().any(|info| info.name.eq_ignore_ascii_case(column.name())) {
            return Err(AlterError::NotVisible {
                table: table.to_string(),
                column: column.name().to_string(),
            });
        }
        Ok(AlterReport {
            columns,
            elapsed_ms,
        })
    }

    /// Records an alter event.
    fn emit(&self, event: WorkerEvent) {
        self.sink.record(&EventRecord {
            at: self.clock.now(),
            task: TaskKind::Alter,
            event,
        });
    }
}
