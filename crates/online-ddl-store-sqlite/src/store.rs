// crates/online-ddl-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Store Session
// Description: StoreSession backed by a single SQLite connection.
// Purpose: Run the write loop and alter controller against an embedded store.
// Dependencies: online-ddl-core, rusqlite, serde, thiserror, tokio
// ============================================================================

//! ## Overview
//! Each [`SqliteSession`] owns one connection and runs every call on the
//! blocking thread pool. Transactions open with `BEGIN IMMEDIATE`, so a second
//! session that tries to write waits on the engine's lock (bounded by the busy
//! timeout) until the first commits. Engine failures are reported as
//! [`StoreFailure`] values carrying the primary `SQLite` result code.

// ============================================================================//
// SECTION: Imports
// ============================================================================//

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use online_ddl_core::ColumnInfo;
use online_ddl_core::Dialect;
use online_ddl_core::SqlValue;
use online_ddl_core::StoreFailure;
use online_ddl_core::StoreSession;
use online_ddl_core::quote_identifier;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::types::Value;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================//
// SECTION: Constants
// ============================================================================//

/// Default busy timeout (ms).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Generic `SQLite` error code.
pub const SQLITE_ERROR: i64 = 1;
/// Library misuse code, reported for calls on a closed session.
pub const SQLITE_MISUSE: i64 = 21;

// ============================================================================//
// SECTION: Config
// ============================================================================//

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteJournalMode {
    /// WAL journal mode (readers do not block the writer).
    #[default]
    Wal,
    /// Delete journal mode.
    Delete,
}

impl SqliteJournalMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// Configuration for an `SQLite` session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
}

impl SqliteStoreConfig {
    /// Creates a config for `path` with default settings.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteJournalMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================//
// SECTION: Errors
// ============================================================================//

/// Errors raised while opening an `SQLite` session.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Filesystem error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Invalid configuration.
    #[error("sqlite store invalid config: {0}")]
    Invalid(String),
}

// ============================================================================//
// SECTION: Session
// ============================================================================//

/// Store session over one `SQLite` connection.
#[derive(Debug)]
pub struct SqliteSession {
    /// Connection guarded for hand-off to blocking tasks; `None` once closed.
    connection: Option<Arc<Mutex<Connection>>>,
}

impl SqliteSession {
    /// Opens a session on the configured database file.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the path is invalid or the database
    /// cannot be opened.
    pub fn open(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let connection = open_connection(config)?;
        Ok(Self {
            connection: Some(Arc::new(Mutex::new(connection))),
        })
    }

    /// Runs `op` on the connection from the blocking thread pool.
    async fn with_connection<T, F>(&self, op: F) -> Result<T, StoreFailure>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error> + Send + 'static,
    {
        let Some(connection) = self.connection.clone() else {
            return Err(StoreFailure::new(SQLITE_MISUSE, "session is closed"));
        };
        let joined = tokio::task::spawn_blocking(move || {
            let guard = connection
                .lock()
                .map_err(|_| StoreFailure::new(SQLITE_MISUSE, "connection mutex poisoned"))?;
            op(&guard).map_err(|err| failure_from(&err))
        })
        .await;
        joined.map_err(|err| StoreFailure::new(SQLITE_ERROR, err.to_string()))?
    }
}

#[async_trait]
impl StoreSession for SqliteSession {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, StoreFailure> {
        let sql = sql.to_string();
        let values = params.iter().map(to_sqlite_value).collect::<Result<Vec<_>, _>>()?;
        self.with_connection(move |connection| {
            let changed = connection.execute(&sql, rusqlite::params_from_iter(values))?;
            Ok(u64::try_from(changed).unwrap_or(u64::MAX))
        })
        .await
    }

    async fn query(&mut self, sql: &str) -> Result<Vec<Vec<SqlValue>>, StoreFailure> {
        let sql = sql.to_string();
        self.with_connection(move |connection| {
            let mut statement = connection.prepare(&sql)?;
            let width = statement.column_count();
            let mut rows = statement.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(width);
                for index in 0 .. width {
                    values.push(from_sqlite_value(row.get_ref(index)?));
                }
                out.push(values);
            }
            Ok(out)
        })
        .await
    }

    async fn begin_transaction(&mut self) -> Result<(), StoreFailure> {
        self.with_connection(|connection| connection.execute_batch("BEGIN IMMEDIATE")).await
    }

    async fn commit(&mut self) -> Result<(), StoreFailure> {
        self.with_connection(|connection| connection.execute_batch("COMMIT")).await
    }

    async fn rollback(&mut self) -> Result<(), StoreFailure> {
        self.with_connection(|connection| {
            if connection.is_autocommit() {
                return Ok(());
            }
            connection.execute_batch("ROLLBACK")
        })
        .await
    }

    async fn describe_table(&mut self, table: &str) -> Result<Vec<ColumnInfo>, StoreFailure> {
        let sql = format!("PRAGMA table_info({})", quote_identifier(table));
        let columns = self
            .with_connection(move |connection| {
                let mut statement = connection.prepare(&sql)?;
                let rows = statement.query_map([], |row| {
                    Ok(ColumnInfo {
                        name: row.get::<_, String>(1)?,
                        column_type: row.get::<_, String>(2)?,
                    })
                })?;
                let columns = rows.collect::<Result<Vec<_>, _>>()?;
                Ok(columns)
            })
            .await?;
        if columns.is_empty() {
            return Err(StoreFailure::new(SQLITE_ERROR, format!("no such table: {table}")));
        }
        Ok(columns)
    }

    async fn close(&mut self) -> Result<(), StoreFailure> {
        let Some(connection) = self.connection.take() else {
            return Ok(());
        };
        let joined = tokio::task::spawn_blocking(move || {
            let Ok(mutex) = Arc::try_unwrap(connection) else {
                return Ok(());
            };
            let connection = mutex
                .into_inner()
                .map_err(|_| StoreFailure::new(SQLITE_MISUSE, "connection mutex poisoned"))?;
            connection.close().map_err(|(_, err)| failure_from(&err))
        })
        .await;
        joined.map_err(|err| StoreFailure::new(SQLITE_ERROR, err.to_string()))?
    }
}

// ============================================================================//
// SECTION: Helpers
// ============================================================================//

/// Converts a rusqlite error into a raw failure with the primary result code.
fn failure_from(err: &rusqlite::Error) -> StoreFailure {
    match err {
        rusqlite::Error::SqliteFailure(inner, message) => StoreFailure::new(
            i64::from(inner.extended_code & 0xff),
            message.clone().unwrap_or_else(|| err.to_string()),
        ),
        other => StoreFailure::new(SQLITE_ERROR, other.to_string()),
    }
}

/// Converts a parameter into an `SQLite` value.
fn to_sqlite_value(value: &SqlValue) -> Result<Value, StoreFailure> {
    Ok(match value {
        SqlValue::Null => Value::Null,
        SqlValue::Int(value) => Value::Integer(*value),
        SqlValue::UInt(value) => Value::Integer(i64::try_from(*value).map_err(|_| {
            StoreFailure::new(SQLITE_MISUSE, format!("parameter {value} exceeds i64"))
        })?),
        SqlValue::Float(value) => Value::Real(*value),
        SqlValue::Text(value) => Value::Text(value.clone()),
        SqlValue::Bytes(value) => Value::Blob(value.clone()),
    })
}

/// Converts a result cell into a [`SqlValue`].
fn from_sqlite_value(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(value) => SqlValue::Int(value),
        ValueRef::Real(value) => SqlValue::Float(value),
        ValueRef::Text(bytes) => SqlValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => SqlValue::Bytes(bytes.to_vec()),
    }
}

/// Ensures the parent directory for the database exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
        }
        _ => Ok(()),
    }
}

/// Validates database paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.is_empty() {
        return Err(SqliteStoreError::Invalid("database path is empty".to_string()));
    }
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("database path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "database path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "database path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection and applies pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(connection)
}
