// crates/online-ddl-core/src/runtime/setup.rs
// ============================================================================
// Module: Table Setup
// Description: Recreates the row table before the write loop starts.
// Purpose: Give every insert run a fresh, empty table.
// Dependencies: crate::{core, interfaces, runtime}, thiserror
// ============================================================================

//! ## Overview
//! On TiDB, setup first tries to turn off the metadata lock so that an online
//! alter surfaces as a commit conflict to the writer instead of blocking it.
//! That step needs elevated privileges and is best-effort: a failure becomes a
//! `setup_warning` event, and on success the current value is read back and
//! reported as a `metadata_lock_setting` event. Dropping and creating the
//! table are mandatory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::Clock;
use crate::core::EventRecord;
use crate::core::StoreFailure;
use crate::core::SystemClock;
use crate::core::TableName;
use crate::core::TaskKind;
use crate::core::WorkerEvent;
use crate::interfaces::Dialect;
use crate::interfaces::EventSink;
use crate::interfaces::SqlValue;
use crate::interfaces::StoreSession;
use crate::runtime::sql;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Table setup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The existing table could not be dropped.
    #[error("failed to drop {table}: {failure}")]
    Drop {
        /// Target table.
        table: String,
        /// Raw failure.
        failure: StoreFailure,
    },
    /// The table could not be created.
    #[error("failed to create {table}: {failure}")]
    Create {
        /// Target table.
        table: String,
        /// Raw failure.
        failure: StoreFailure,
    },
}

impl SetupError {
    /// Returns the raw failure.
    #[must_use]
    pub const fn failure(&self) -> &StoreFailure {
        match self {
            Self::Drop {
                failure, ..
            }
            | Self::Create {
                failure, ..
            } => failure,
        }
    }
}

// ============================================================================
// SECTION: Setup
// ============================================================================

/// Drops and recreates the row table.
pub struct TableSetup {
    /// Event destination.
    sink: Arc<dyn EventSink>,
    /// Timestamp source for events.
    clock: Arc<dyn Clock>,
    /// Whether to try disabling TiDB's metadata lock first.
    disable_metadata_lock: bool,
}

impl TableSetup {
    /// Creates a setup step that reports to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            clock: Arc::new(SystemClock),
            disable_metadata_lock: true,
        }
    }

    /// Enables or disables the metadata lock step.
    #[must_use]
    pub const fn with_metadata_lock_disabled(mut self, disable: bool) -> Self {
        self.disable_metadata_lock = disable;
        self
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Prepares `table` on `session` using the session's dialect.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when the table cannot be dropped or created.
    pub async fn prepare<S>(&self, session: &mut S, table: &TableName) -> Result<(), SetupError>
    where
        S: StoreSession + ?Sized,
    {
        let dialect = session.dialect();
        if dialect == Dialect::Tidb && self.disable_metadata_lock {
            self.relax_metadata_lock(session).await;
        }

        session.execute(&sql::drop_table(table), &[]).await.map_err(|failure| {
            SetupError::Drop {
                table: table.to_string(),
                failure,
            }
        })?;
        for statement in sql::create_table(table, dialect) {
            session.execute(&statement, &[]).await.map_err(|failure| SetupError::Create {
                table: table.to_string(),
                failure,
            })?;
        }
        self.emit(WorkerEvent::TablePrepared {
            table: table.to_string(),
        });
        Ok(())
    }

    /// Best-effort metadata lock change; failures are reported, not returned.
    async fn relax_metadata_lock<S>(&self, session: &mut S)
    where
        S: StoreSession + ?Sized,
    {
        if let Err(failure) = session.execute(sql::DISABLE_METADATA_LOCK, &[]).await {
            self.warn(sql::DISABLE_METADATA_LOCK, failure);
            return;
        }
        match session.query(sql::SHOW_METADATA_LOCK).await {
            Ok(rows) => {
                let row = rows.first();
                let name = row
                    .and_then(|row| row.first())
                    .and_then(SqlValue::as_text)
                    .unwrap_or_else(|| sql::METADATA_LOCK_VARIABLE.to_string());
                let value = row.and_then(|row| row.get(1)).and_then(SqlValue::as_text);
                self.emit(WorkerEvent::MetadataLockSetting {
                    name,
                    value,
                });
            }
            Err(failure) => self.warn(sql::SHOW_METADATA_LOCK, failure),
        }
    }

    /// Emits a setup warning.
    fn warn(&self, statement: &str, failure: StoreFailure) {
        self.emit(WorkerEvent::SetupWarning {
            statement: statement.to_string(),
            code: failure.code,
            message: failure.message,
        });
    }

    /// Records a setup event.
    fn emit(&self, event: WorkerEvent) {
        self.sink.record(&EventRecord {
            at: self.clock.now(),
            task: TaskKind::Setup,
            event,
        });
    }
}
