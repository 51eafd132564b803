// crates/online-ddl-config/src/config.rs
// ============================================================================
// Module: Online DDL Configuration
// Description: Configuration loading, overrides, and validation.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: online-ddl-core, online-ddl-store-mysql, online-ddl-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The file is optional: when no path is given, none is named by
//! `ONLINE_DDL_CONFIG`, and `online-ddl.toml` does not exist, built-in defaults
//! apply. `TIDB_*` environment variables override connection settings and
//! command-line flags override both. Invalid values fail closed with a
//! [`ConfigError::Invalid`] naming the offending field.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use online_ddl_core::BackoffPolicy;
use online_ddl_core::ColumnSpec;
use online_ddl_core::DEFAULT_COLUMN_DEFINITION;
use online_ddl_core::DEFAULT_COLUMN_NAME;
use online_ddl_core::DEFAULT_TABLE_NAME;
use online_ddl_core::TableName;
use online_ddl_core::WorkerConfig;
use online_ddl_store_mysql::DEFAULT_DATABASE;
use online_ddl_store_mysql::DEFAULT_HOST;
use online_ddl_store_mysql::DEFAULT_PORT;
use online_ddl_store_mysql::DEFAULT_USER;
use online_ddl_store_mysql::MySqlConfig;
use online_ddl_store_mysql::TlsMode;
use online_ddl_store_sqlite::DEFAULT_BUSY_TIMEOUT_MS;
use online_ddl_store_sqlite::SqliteJournalMode;
use online_ddl_store_sqlite::SqliteStoreConfig;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "online-ddl.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "ONLINE_DDL_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum host name length.
const MAX_HOST_LENGTH: usize = 255;
/// Maximum user name length accepted by MySQL-protocol servers.
const MAX_USER_LENGTH: usize = 80;
/// Maximum password length.
const MAX_PASSWORD_LENGTH: usize = 256;
/// Maximum connect timeout in milliseconds.
const MAX_CONNECT_TIMEOUT_MS: u64 = 300_000;
/// Maximum `SQLite` busy timeout in milliseconds.
const MAX_BUSY_TIMEOUT_MS: u64 = 600_000;
/// Maximum backoff base interval in milliseconds.
const MAX_BASE_INTERVAL_MS: u64 = 60_000;
/// Maximum conflict retries per key.
const MAX_MAX_ATTEMPTS: u32 = 32;
/// Maximum cool-down in milliseconds.
const MAX_COOLDOWN_MS: u64 = 600_000;
/// Maximum in-transaction hold in milliseconds.
const MAX_TXN_HOLD_MS: u64 = 60_000;

/// Default connect timeout in milliseconds.
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;
/// Default backoff base interval in milliseconds.
const DEFAULT_BASE_INTERVAL_MS: u64 = 1_000;
/// Default conflict retries per key.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Default cool-down in milliseconds.
const DEFAULT_COOLDOWN_MS: u64 = 2_000;
/// Default in-transaction hold in milliseconds.
const DEFAULT_TXN_HOLD_MS: u64 = 1_000;

/// Environment variable overriding `connection.host`.
pub const ENV_HOST: &str = "TIDB_HOST";
/// Environment variable overriding `connection.port`.
pub const ENV_PORT: &str = "TIDB_PORT";
/// Environment variable overriding `connection.user`.
pub const ENV_USER: &str = "TIDB_USER";
/// Environment variable overriding `connection.password`.
pub const ENV_PASSWORD: &str = "TIDB_PASSWORD";
/// Environment variable overriding `connection.database`.
pub const ENV_DATABASE: &str = "TIDB_DATABASE";

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Online DDL configuration loaded from `online-ddl.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OnlineDdlConfig {
    /// Store connection settings.
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Write loop settings.
    #[serde(default)]
    pub writer: WriterConfig,
    /// Alter mode settings.
    #[serde(default)]
    pub alter: AlterConfig,
    /// Event sink settings.
    #[serde(default)]
    pub events: EventsConfig,
    /// File the config was read from; `None` when defaults were used.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl OnlineDdlConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(resolved) = resolve_path(path)? else {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        };
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml(content)?;
        config.source = Some(resolved);
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `TIDB_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an override value is malformed.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_env_overrides_with(|key| env::var(key).ok())
    }

    /// Applies `TIDB_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an override value is malformed.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let connection = &mut self.connection;
        if let Some(host) = lookup(ENV_HOST) {
            connection.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            connection.port = port.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{ENV_PORT} must be a port number"))
            })?;
        }
        if let Some(user) = lookup(ENV_USER) {
            connection.user = user;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            connection.password = password;
        }
        if let Some(database) = lookup(ENV_DATABASE) {
            connection.database = database;
        }
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.connection.validate()?;
        self.writer.validate()?;
        self.alter.validate()?;
        self.events.validate()?;
        Ok(())
    }

    /// Returns the table targeted by alter mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the table name is invalid.
    pub fn alter_table(&self) -> Result<TableName, ConfigError> {
        match &self.alter.table {
            Some(table) => table_name("alter.table", table),
            None => self.writer.table_name(),
        }
    }
}

// ============================================================================
// SECTION: Connection
// ============================================================================

/// Store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// TiDB or another MySQL-protocol server.
    #[default]
    Mysql,
    /// Embedded `SQLite` database file.
    Sqlite,
}

impl Backend {
    /// Returns the config-file spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }
}

/// `[connection]` section.
#[derive(Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Store backend.
    #[serde(default)]
    pub backend: Backend,
    /// Server host.
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// User name.
    #[serde(default = "default_user")]
    pub user: String,
    /// Password; empty means none.
    #[serde(default)]
    pub password: String,
    /// Default database.
    #[serde(default = "default_database")]
    pub database: String,
    /// TLS mode.
    #[serde(default)]
    pub tls_mode: TlsMode,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// `SQLite` database path; required for the sqlite backend.
    #[serde(default)]
    pub sqlite_path: Option<PathBuf>,
    /// `SQLite` busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            database: default_database(),
            tls_mode: TlsMode::default(),
            connect_timeout_ms: default_connect_timeout_ms(),
            sqlite_path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("tls_mode", &self.tls_mode)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("sqlite_path", &self.sqlite_path)
            .field("busy_timeout_ms", &self.busy_timeout_ms)
            .finish()
    }
}

impl ConnectionConfig {
    /// Validates connection settings for the selected backend.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            Backend::Mysql => {
                validate_text("connection.host", &self.host, MAX_HOST_LENGTH)?;
                validate_text("connection.user", &self.user, MAX_USER_LENGTH)?;
                validate_text("connection.database", &self.database, MAX_HOST_LENGTH)?;
                if self.password.len() > MAX_PASSWORD_LENGTH {
                    return Err(ConfigError::Invalid(
                        "connection.password exceeds max length".to_string(),
                    ));
                }
                if self.port == 0 {
                    return Err(ConfigError::Invalid(
                        "connection.port must be greater than zero".to_string(),
                    ));
                }
                validate_range(
                    "connection.connect_timeout_ms",
                    self.connect_timeout_ms,
                    1,
                    MAX_CONNECT_TIMEOUT_MS,
                )
            }
            Backend::Sqlite => {
                let path = self.sqlite_path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid(
                        "sqlite backend requires connection.sqlite_path".to_string(),
                    )
                })?;
                validate_path_string("connection.sqlite_path", &path.to_string_lossy())?;
                validate_range(
                    "connection.busy_timeout_ms",
                    self.busy_timeout_ms,
                    0,
                    MAX_BUSY_TIMEOUT_MS,
                )
            }
        }
    }

    /// Builds MySQL-protocol session settings.
    #[must_use]
    pub fn mysql_config(&self) -> MySqlConfig {
        MySqlConfig {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            tls_mode: self.tls_mode,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
        }
    }

    /// Builds `SQLite` session settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no `SQLite` path is configured.
    pub fn sqlite_config(&self) -> Result<SqliteStoreConfig, ConfigError> {
        let path = self.sqlite_path.clone().ok_or_else(|| {
            ConfigError::Invalid("sqlite backend requires connection.sqlite_path".to_string())
        })?;
        Ok(SqliteStoreConfig {
            path,
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: SqliteJournalMode::default(),
        })
    }
}

// ============================================================================
// SECTION: Writer
// ============================================================================

/// `[writer]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WriterConfig {
    /// Table receiving rows.
    #[serde(default = "default_table")]
    pub table: String,
    /// Backoff base interval in milliseconds.
    #[serde(default = "default_base_interval_ms")]
    pub base_interval_ms: u64,
    /// Conflict retries allowed per key.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Wait after an unclassified failure in milliseconds.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    /// Consecutive cool-downs allowed per key; unbounded when unset.
    #[serde(default)]
    pub max_cooldowns: Option<u32>,
    /// Time spent inside each transaction before commit, in milliseconds.
    #[serde(default = "default_txn_hold_ms")]
    pub txn_hold_ms: u64,
    /// Stop after this many committed rows; runs until interrupted when unset.
    #[serde(default)]
    pub max_rows: Option<u64>,
    /// Drop and recreate the table before writing.
    #[serde(default = "default_true")]
    pub recreate_table: bool,
    /// Turn off TiDB metadata locking during setup.
    #[serde(default = "default_true")]
    pub disable_metadata_lock: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            base_interval_ms: default_base_interval_ms(),
            max_attempts: default_max_attempts(),
            cooldown_ms: default_cooldown_ms(),
            max_cooldowns: None,
            txn_hold_ms: default_txn_hold_ms(),
            max_rows: None,
            recreate_table: true,
            disable_metadata_lock: true,
        }
    }
}

impl WriterConfig {
    /// Validates writer settings.
    fn validate(&self) -> Result<(), ConfigError> {
        self.table_name()?;
        validate_range("writer.base_interval_ms", self.base_interval_ms, 1, MAX_BASE_INTERVAL_MS)?;
        validate_range(
            "writer.max_attempts",
            u64::from(self.max_attempts),
            1,
            u64::from(MAX_MAX_ATTEMPTS),
        )?;
        validate_range("writer.cooldown_ms", self.cooldown_ms, 0, MAX_COOLDOWN_MS)?;
        validate_range("writer.txn_hold_ms", self.txn_hold_ms, 0, MAX_TXN_HOLD_MS)?;
        if self.max_rows == Some(0) {
            return Err(ConfigError::Invalid(
                "writer.max_rows must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the validated writer table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the table name is invalid.
    pub fn table_name(&self) -> Result<TableName, ConfigError> {
        table_name("writer.table", &self.table)
    }

    /// Builds the write worker settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a writer setting is invalid.
    pub fn worker_config(&self) -> Result<WorkerConfig, ConfigError> {
        let backoff =
            BackoffPolicy::new(Duration::from_millis(self.base_interval_ms), self.max_attempts)
                .map_err(|err| ConfigError::Invalid(format!("writer: {err}")))?;
        Ok(WorkerConfig {
            table: self.table_name()?,
            backoff,
            cooldown: Duration::from_millis(self.cooldown_ms),
            max_cooldowns: self.max_cooldowns,
            txn_hold: Duration::from_millis(self.txn_hold_ms),
            max_rows: self.max_rows,
        })
    }
}

// ============================================================================
// SECTION: Alter
// ============================================================================

/// `[alter]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AlterConfig {
    /// Table to alter; defaults to `writer.table`.
    #[serde(default)]
    pub table: Option<String>,
    /// Name of the column to add.
    #[serde(default = "default_column_name")]
    pub column_name: String,
    /// SQL definition of the column to add.
    #[serde(default = "default_column_definition")]
    pub column_definition: String,
}

impl Default for AlterConfig {
    fn default() -> Self {
        Self {
            table: None,
            column_name: default_column_name(),
            column_definition: default_column_definition(),
        }
    }
}

impl AlterConfig {
    /// Validates alter settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(table) = &self.table {
            table_name("alter.table", table)?;
        }
        self.column_spec()?;
        Ok(())
    }

    /// Returns the validated column to add.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the column name or definition is invalid.
    pub fn column_spec(&self) -> Result<ColumnSpec, ConfigError> {
        ColumnSpec::new(self.column_name.clone(), self.column_definition.clone())
            .map_err(|err| ConfigError::Invalid(format!("alter.column: {err}")))
    }
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Event sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `events.path`.
    File,
    /// Discard events.
    None,
}

/// `[events]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: EventSinkKind,
    /// Output path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl EventsConfig {
    /// Validates event sink settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (EventSinkKind::File, Some(path)) => {
                validate_path_string("events.path", &path.to_string_lossy())
            }
            (EventSinkKind::File, None) => {
                Err(ConfigError::Invalid("file event sink requires events.path".to_string()))
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "events.path is only valid for the file sink".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI, environment, or the default file.
fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default.is_file().then_some(default))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a non-empty text field with a length cap.
fn validate_text(field: &str, value: &str, max: usize) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > max {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

/// Validates an inclusive numeric range.
fn validate_range(field: &str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::Invalid(format!("{field} must be between {min} and {max}")));
    }
    Ok(())
}

/// Parses a table name, tagging failures with the field name.
fn table_name(field: &str, value: &str) -> Result<TableName, ConfigError> {
    TableName::new(value).map_err(|err| ConfigError::Invalid(format!("{field}: {err}")))
}

/// Default server host.
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

/// Default server port.
const fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Default user name.
fn default_user() -> String {
    DEFAULT_USER.to_string()
}

/// Default database.
fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

/// Default connect timeout.
const fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

/// Default `SQLite` busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Default writer table.
fn default_table() -> String {
    DEFAULT_TABLE_NAME.to_string()
}

/// Default backoff base interval.
const fn default_base_interval_ms() -> u64 {
    DEFAULT_BASE_INTERVAL_MS
}

/// Default conflict retries per key.
const fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

/// Default cool-down.
const fn default_cooldown_ms() -> u64 {
    DEFAULT_COOLDOWN_MS
}

/// Default in-transaction hold.
const fn default_txn_hold_ms() -> u64 {
    DEFAULT_TXN_HOLD_MS
}

/// Default added column name.
fn default_column_name() -> String {
    DEFAULT_COLUMN_NAME.to_string()
}

/// Default added column definition.
fn default_column_definition() -> String {
    DEFAULT_COLUMN_DEFINITION.to_string()
}

/// Serde default for flags that are on unless disabled.
const fn default_true() -> bool {
    true
}

// ============================================================================
// SECTION: Tests
// ============================================================================
