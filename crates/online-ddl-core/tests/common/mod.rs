// crates/online-ddl-core/tests/common/mod.rs
// ============================================================================
// Module: Test Doubles
// Description: Scripted store session and pacers shared by core tests.
// ============================================================================
//! ## Overview
//! [`ScriptedSession`] behaves like a single-table store: inserts are buffered
//! until commit, and scripted failures are raised at commit time, the way
//! TiDB reports a schema change to a concurrent writer.

#![allow(
    dead_code,
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Shared helpers are not used by every test binary."
)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use online_ddl_core::CancelHandle;
use online_ddl_core::ColumnInfo;
use online_ddl_core::Dialect;
use online_ddl_core::Pacer;
use online_ddl_core::SqlValue;
use online_ddl_core::StoreFailure;
use online_ddl_core::StoreSession;

// ============================================================================
// SECTION: Scripted Store
// ============================================================================

/// Observable store contents shared between a session and the test.
#[derive(Debug, Default)]
pub struct StoreState {
    /// Committed keys in commit order.
    pub rows: Vec<u64>,
    /// Table columns.
    pub columns: Vec<String>,
    /// Whether the table exists.
    pub table_exists: bool,
    /// Every statement executed, in order.
    pub statements: Vec<String>,
    /// Failures raised by successive commits.
    pub commit_failures: VecDeque<StoreFailure>,
    /// Failure raised by the next `ALTER TABLE`.
    pub alter_failure: Option<StoreFailure>,
    /// Failure raised by `SET GLOBAL` statements.
    pub set_global_failure: Option<StoreFailure>,
    /// Hide added columns from introspection.
    pub hide_added_columns: bool,
    /// Rollbacks issued.
    pub rollbacks: u32,
    /// Failure raised by every rollback.
    pub rollback_failure: Option<StoreFailure>,
    /// Value of `tidb_enable_metadata_lock`.
    pub metadata_lock: Option<String>,
    /// Return no rows for `SHOW VARIABLES`.
    pub hide_variables: bool,
}

/// Handle to a scripted store.
#[derive(Debug, Clone, Default)]
pub struct ScriptedStore {
    /// Shared state.
    state: Arc<Mutex<StoreState>>,
}

impl ScriptedStore {
    /// Creates a store with an existing row table.
    pub fn with_table() -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            state.table_exists = true;
            state.columns = ["id", "k", "c", "pad"].iter().map(ToString::to_string).collect();
        }
        store
    }

    /// Opens a session on this store.
    pub fn session(&self, dialect: Dialect) -> ScriptedSession {
        ScriptedSession {
            state: Arc::clone(&self.state),
            dialect,
            pending: None,
            in_txn: false,
        }
    }

    /// Queues failures raised by the next commits.
    pub fn fail_commits(&self, failures: impl IntoIterator<Item = StoreFailure>) {
        self.state.lock().unwrap().commit_failures.extend(failures);
    }

    /// Applies `f` to the shared state.
    pub fn with_state<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    /// Returns committed keys.
    pub fn rows(&self) -> Vec<u64> {
        self.state.lock().unwrap().rows.clone()
    }

    /// Returns executed statements.
    pub fn statements(&self) -> Vec<String> {
        self.state.lock().unwrap().statements.clone()
    }
}

/// Session over a [`ScriptedStore`].
#[derive(Debug)]
pub struct ScriptedSession {
    /// Shared store state.
    state: Arc<Mutex<StoreState>>,
    /// Reported dialect.
    dialect: Dialect,
    /// Key inserted in the open transaction.
    pending: Option<u64>,
    /// Whether a transaction is open.
    in_txn: bool,
}

#[async_trait]
impl StoreSession for ScriptedSession {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, StoreFailure> {
        let mut state = self.state.lock().unwrap();
        state.statements.push(sql.to_string());
        if sql.starts_with("INSERT") {
            if !state.table_exists {
                return Err(StoreFailure::new(1146, "Table doesn't exist"));
            }
            let key = match params.first() {
                Some(SqlValue::UInt(key)) => *key,
                other => panic!("unexpected insert parameter {other:?}"),
            };
            if self.in_txn {
                self.pending = Some(key);
            } else {
                state.rows.push(key);
            }
            return Ok(1);
        }
        if sql.starts_with("ALTER TABLE") {
            if let Some(failure) = state.alter_failure.take() {
                return Err(failure);
            }
            let column = sql.split("ADD COLUMN `").nth(1).and_then(|rest| rest.split('`').next());
            if let Some(column) = column
                && !state.hide_added_columns
            {
                state.columns.push(column.to_string());
            }
            return Ok(0);
        }
        if sql.starts_with("SET GLOBAL") {
            if let Some(failure) = state.set_global_failure.clone() {
                return Err(failure);
            }
            state.metadata_lock = Some(String::from("OFF"));
        }
        if sql.starts_with("DROP TABLE") {
            state.table_exists = false;
            state.rows.clear();
        }
        if sql.starts_with("CREATE TABLE") {
            state.table_exists = true;
            state.columns = ["id", "k", "c", "pad"].iter().map(ToString::to_string).collect();
        }
        Ok(0)
    }

    async fn query(&mut self, sql: &str) -> Result<Vec<Vec<SqlValue>>, StoreFailure> {
        let mut state = self.state.lock().unwrap();
        state.statements.push(sql.to_string());
        if sql.starts_with("SELECT 1 FROM") && !state.table_exists {
            return Err(StoreFailure::new(1146, "Table 'test.missing' doesn't exist"));
        }
        if sql.starts_with("SHOW VARIABLES") {
            return Ok(match (&state.metadata_lock, state.hide_variables) {
                (Some(value), false) => vec![vec![
                    SqlValue::from("tidb_enable_metadata_lock"),
                    SqlValue::Text(value.clone()),
                ]],
                _ => Vec::new(),
            });
        }
        Ok(vec![vec![SqlValue::Int(1)]])
    }

    async fn begin_transaction(&mut self) -> Result<(), StoreFailure> {
        self.in_txn = true;
        self.pending = None;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), StoreFailure> {
        let mut state = self.state.lock().unwrap();
        self.in_txn = false;
        let pending = self.pending.take();
        if let Some(failure) = state.commit_failures.pop_front() {
            return Err(failure);
        }
        if let Some(key) = pending {
            state.rows.push(key);
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreFailure> {
        self.in_txn = false;
        self.pending = None;
        let mut state = self.state.lock().unwrap();
        state.rollbacks += 1;
        state.rollback_failure.clone().map_or(Ok(()), Err)
    }

    async fn describe_table(&mut self, _table: &str) -> Result<Vec<ColumnInfo>, StoreFailure> {
        let state = self.state.lock().unwrap();
        if !state.table_exists {
            return Err(StoreFailure::new(1146, "Table doesn't exist"));
        }
        Ok(state
            .columns
            .iter()
            .map(|name| ColumnInfo {
                name: name.clone(),
                column_type: String::from("text"),
            })
            .collect())
    }

    async fn close(&mut self) -> Result<(), StoreFailure> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Pacers
// ============================================================================

/// Pacer that records requested delays and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingPacer {
    /// Requested delays in order.
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingPacer {
    /// Returns requested delays.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
    }
}

/// Pacer that cancels the worker on its first pause and never returns.
#[derive(Debug, Clone)]
pub struct CancellingPacer {
    /// Handle cancelled on the first pause.
    handle: CancelHandle,
    /// Requested delays in order.
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl CancellingPacer {
    /// Creates a pacer that cancels through `handle`.
    pub fn new(handle: CancelHandle) -> Self {
        Self {
            handle,
            delays: Arc::default(),
        }
    }

    /// Returns requested delays.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Pacer for CancellingPacer {
    async fn pause(&self, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
        self.handle.cancel();
        std::future::pending::<()>().await;
    }
}

// ============================================================================
// SECTION: Failures
// ============================================================================

/// TiDB schema-changed failure.
pub fn schema_changed() -> StoreFailure {
    StoreFailure::new(8028, "Information schema is changed during the execution of the statement")
}

/// Client-side lost-connection failure.
pub fn lost_connection() -> StoreFailure {
    StoreFailure::new(2013, "Lost connection to MySQL server during query")
}
