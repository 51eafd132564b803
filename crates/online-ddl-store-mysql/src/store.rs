// crates/online-ddl-store-mysql/src/store.rs
// ============================================================================
// Module: MySQL Protocol Store Session
// Description: StoreSession backed by one mysql_async connection.
// Purpose: Drive TiDB (or any MySQL-protocol store) from the write loop.
// Dependencies: online-ddl-core, mysql_async, serde, thiserror, tokio
// ============================================================================

//! ## Overview
//! [`MySqlSession`] wraps a single connection. Transactions are plain
//! `BEGIN`/`COMMIT`/`ROLLBACK` statements on that connection, so the session
//! stays `'static` and can be moved into a task. Server errors keep their
//! native code; transport errors are reported with the MySQL client codes
//! `2013` (lost connection) and `2000` (unknown client error).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use mysql_async::Conn;
use mysql_async::Opts;
use mysql_async::OptsBuilder;
use mysql_async::Params;
use mysql_async::Row;
use mysql_async::SslOpts;
use mysql_async::Value;
use mysql_async::prelude::Queryable;
use online_ddl_core::ColumnInfo;
use online_ddl_core::Dialect;
use online_ddl_core::SqlValue;
use online_ddl_core::StoreFailure;
use online_ddl_core::StoreSession;
use online_ddl_core::quote_identifier;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default TiDB host.
pub const DEFAULT_HOST: &str = "localhost";
/// Default TiDB SQL port.
pub const DEFAULT_PORT: u16 = 4000;
/// Default user.
pub const DEFAULT_USER: &str = "root";
/// Default database.
pub const DEFAULT_DATABASE: &str = "test";
/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Client error: unknown error.
pub const CR_UNKNOWN_ERROR: i64 = 2000;
/// Client error: server has gone away (session closed).
pub const CR_SERVER_GONE_ERROR: i64 = 2006;
/// Client error: lost connection during query.
pub const CR_SERVER_LOST: i64 = 2013;

// ============================================================================
// SECTION: Config
// ============================================================================

/// TLS mode, matching the MySQL client's `--ssl-mode` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsMode {
    /// Plain TCP.
    Disabled,
    /// Encrypt without verifying the server certificate.
    Required,
    /// Verify the certificate chain but not the host name.
    VerifyCa,
    /// Verify the certificate chain and the host name.
    #[default]
    VerifyIdentity,
}

impl TlsMode {
    /// Returns the config label for the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Required => "required",
            Self::VerifyCa => "verify_ca",
            Self::VerifyIdentity => "verify_identity",
        }
    }

    /// Returns the `mysql_async` TLS options for the mode.
    ///
    /// `SslOpts` is opt-out, so each mode disables the checks it does not
    /// require.
    #[must_use]
    pub fn ssl_opts(self) -> Option<SslOpts> {
        match self {
            Self::Disabled => None,
            Self::Required => Some(
                SslOpts::default()
                    .with_danger_accept_invalid_certs(true)
                    .with_danger_skip_domain_validation(true),
            ),
            Self::VerifyCa => Some(SslOpts::default().with_danger_skip_domain_validation(true)),
            Self::VerifyIdentity => Some(SslOpts::default()),
        }
    }
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings for a MySQL-protocol store.
#[derive(Clone, PartialEq, Eq)]
pub struct MySqlConfig {
    /// Host name or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// User name.
    pub user: String,
    /// Password; empty means none.
    pub password: String,
    /// Default database.
    pub database: String,
    /// TLS mode.
    pub tls_mode: TlsMode,
    /// Time allowed for the connection handshake.
    pub connect_timeout: Duration,
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            tls_mode: TlsMode::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl fmt::Debug for MySqlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("tls_mode", &self.tls_mode)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl MySqlConfig {
    /// Builds `mysql_async` connection options.
    #[must_use]
    pub fn opts(&self) -> Opts {
        let password = (!self.password.is_empty()).then(|| self.password.clone());
        OptsBuilder::default()
            .ip_or_hostname(self.host.clone())
            .tcp_port(self.port)
            .user(Some(self.user.clone()))
            .pass(password)
            .db_name(Some(self.database.clone()))
            .ssl_opts(self.tls_mode.ssl_opts())
            .into()
    }

    /// Returns `user@host:port/database` for display.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while connecting.
#[derive(Debug, Error)]
pub enum MySqlStoreError {
    /// The server or transport rejected the connection.
    #[error("failed to connect: {0}")]
    Connect(StoreFailure),
    /// The handshake did not finish in time.
    #[error("connection timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },
}

impl MySqlStoreError {
    /// Returns the raw failure when the server reported one.
    #[must_use]
    pub const fn failure(&self) -> Option<&StoreFailure> {
        match self {
            Self::Connect(failure) => Some(failure),
            Self::Timeout {
                ..
            } => None,
        }
    }
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Store session over one MySQL-protocol connection.
#[derive(Debug)]
pub struct MySqlSession {
    /// Open connection; `None` once closed.
    conn: Option<Conn>,
}

impl MySqlSession {
    /// Connects using `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MySqlStoreError`] when the connection is refused, rejected,
    /// or does not complete within the connect timeout.
    pub async fn connect(config: &MySqlConfig) -> Result<Self, MySqlStoreError> {
        let connecting = Conn::new(config.opts());
        let conn = tokio::time::timeout(config.connect_timeout, connecting)
            .await
            .map_err(|_| MySqlStoreError::Timeout {
                timeout_ms: u64::try_from(config.connect_timeout.as_millis()).unwrap_or(u64::MAX),
            })?
            .map_err(|err| MySqlStoreError::Connect(failure_from(&err)))?;
        Ok(Self {
            conn: Some(conn),
        })
    }

    /// Returns the open connection.
    fn conn(&mut self) -> Result<&mut Conn, StoreFailure> {
        self.conn
            .as_mut()
            .ok_or_else(|| StoreFailure::new(CR_SERVER_GONE_ERROR, "session is closed"))
    }
}

#[async_trait]
impl StoreSession for MySqlSession {
    fn dialect(&self) -> Dialect {
        Dialect::Tidb
    }

    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, StoreFailure> {
        let conn = self.conn()?;
        if params.is_empty() {
            conn.query_drop(sql).await.map_err(|err| failure_from(&err))?;
        } else {
            let values: Vec<Value> = params.iter().map(to_mysql_value).collect();
            conn.exec_drop(sql, Params::Positional(values)).await.map_err(|err| failure_from(&err))?;
        }
        Ok(conn.affected_rows())
    }

    async fn query(&mut self, sql: &str) -> Result<Vec<Vec<SqlValue>>, StoreFailure> {
        let conn = self.conn()?;
        let rows: Vec<Row> = conn.query(sql).await.map_err(|err| failure_from(&err))?;
        Ok(rows.iter().map(row_values).collect())
    }

    async fn begin_transaction(&mut self) -> Result<(), StoreFailure> {
        self.conn()?.query_drop("BEGIN").await.map_err(|err| failure_from(&err))
    }

    async fn commit(&mut self) -> Result<(), StoreFailure> {
        self.conn()?.query_drop("COMMIT").await.map_err(|err| failure_from(&err))
    }

    async fn rollback(&mut self) -> Result<(), StoreFailure> {
        self.conn()?.query_drop("ROLLBACK").await.map_err(|err| failure_from(&err))
    }

    async fn describe_table(&mut self, table: &str) -> Result<Vec<ColumnInfo>, StoreFailure> {
        let sql = format!("SHOW COLUMNS FROM {}", quote_identifier(table));
        let rows = self.query(&sql).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let mut cells = row.into_iter().map(|cell| cell.as_text().unwrap_or_default());
                ColumnInfo {
                    name: cells.next().unwrap_or_default(),
                    column_type: cells.next().unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn close(&mut self) -> Result<(), StoreFailure> {
        match self.conn.take() {
            Some(conn) => conn.disconnect().await.map_err(|err| failure_from(&err)),
            None => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a driver error to a raw failure.
pub(crate) fn failure_from(err: &mysql_async::Error) -> StoreFailure {
    match err {
        mysql_async::Error::Server(server) => {
            StoreFailure::new(i64::from(server.code), server.message.clone())
        }
        mysql_async::Error::Io(io) => StoreFailure::new(CR_SERVER_LOST, io.to_string()),
        other => StoreFailure::new(CR_UNKNOWN_ERROR, other.to_string()),
    }
}

/// Converts a parameter into a driver value.
fn to_mysql_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::NULL,
        SqlValue::Int(value) => Value::Int(*value),
        SqlValue::UInt(value) => Value::UInt(*value),
        SqlValue::Float(value) => Value::Double(*value),
        SqlValue::Text(value) => Value::Bytes(value.clone().into_bytes()),
        SqlValue::Bytes(value) => Value::Bytes(value.clone()),
    }
}

/// Converts a result row into cells.
fn row_values(row: &Row) -> Vec<SqlValue> {
    (0 .. row.len()).map(|index| row.as_ref(index).map_or(SqlValue::Null, from_mysql_value)).collect()
}

/// Converts a driver value into a [`SqlValue`].
fn from_mysql_value(value: &Value) -> SqlValue {
    match value {
        Value::NULL => SqlValue::Null,
        Value::Int(value) => SqlValue::Int(*value),
        Value::UInt(value) => SqlValue::UInt(*value),
        Value::Float(value) => SqlValue::Float(f64::from(*value)),
        Value::Double(value) => SqlValue::Float(*value),
        Value::Bytes(bytes) => match String::from_utf8(bytes.clone()) {
            Ok(text) => SqlValue::Text(text),
            Err(_) => SqlValue::Bytes(bytes.clone()),
        },
        other => SqlValue::Text(other.as_sql(true).trim_matches('\'').to_string()),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
