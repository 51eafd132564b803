// crates/online-ddl-cli/src/main.rs
// ============================================================================
// Module: Online DDL CLI Entry Point
// Description: Command dispatcher for the insert and alter modes.
// Purpose: Drive the write loop and the alter controller against a live store.
// Dependencies: clap, online-ddl-config, online-ddl-core, online-ddl-store-*, tokio.
// ============================================================================

//! ## Overview
//! `online-ddl insert` prepares the target table and keeps inserting rows
//! until interrupted, the row budget is reached, or a fatal failure occurs.
//! `online-ddl alter` adds one column to the same table from a separate
//! process, so the two modes can run side by side. Settings come from
//! `online-ddl.toml`, then `TIDB_*` environment variables, then flags. All
//! user-facing strings are routed through the i18n catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use online_ddl_cli::i18n::Locale;
use online_ddl_cli::i18n::set_locale;
use online_ddl_cli::t;
use online_ddl_config::Backend;
use online_ddl_config::ConnectionConfig;
use online_ddl_config::ENV_DATABASE;
use online_ddl_config::ENV_PASSWORD;
use online_ddl_config::ENV_USER;
use online_ddl_config::EventSinkKind;
use online_ddl_config::EventsConfig;
use online_ddl_config::OnlineDdlConfig;
use online_ddl_core::AlterController;
use online_ddl_core::AlterError;
use online_ddl_core::ErrorClassifier;
use online_ddl_core::EventSink;
use online_ddl_core::FailureOutcome;
use online_ddl_core::FileEventSink;
use online_ddl_core::NoopEventSink;
use online_ddl_core::StderrEventSink;
use online_ddl_core::StoreSession;
use online_ddl_core::TableSetup;
use online_ddl_core::TidbErrorClassifier;
use online_ddl_core::TokioPacer;
use online_ddl_core::WorkerError;
use online_ddl_core::WriteJobState;
use online_ddl_core::WriteWorker;
use online_ddl_core::cancel_pair;
use online_ddl_core::runtime::sql::CONNECTIVITY_PROBE;
use online_ddl_store_mysql::MySqlSession;
use online_ddl_store_mysql::MySqlStoreError;
use online_ddl_store_mysql::TlsMode;
use online_ddl_store_sqlite::SqliteErrorClassifier;
use online_ddl_store_sqlite::SqliteSession;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable selecting the output language.
const LANG_ENV: &str = "ONLINE_DDL_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "online-ddl",
    about = "Keep writing rows while the table schema changes underneath.",
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `ONLINE_DDL_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Connection settings shared by every mode.
    #[command(flatten)]
    connection: ConnectionArgs,
    /// Selected mode.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Connection flags; each overrides the config file and environment.
#[derive(Args, Debug, Default)]
struct ConnectionArgs {
    /// Path to `online-ddl.toml`.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Store backend.
    #[arg(long, value_enum, global = true)]
    backend: Option<BackendArg>,
    /// Server host.
    #[arg(long, global = true)]
    host: Option<String>,
    /// Server port.
    #[arg(long, global = true)]
    port: Option<u16>,
    /// User name.
    #[arg(long, global = true)]
    user: Option<String>,
    /// Database name.
    #[arg(long, global = true)]
    database: Option<String>,
    /// TLS mode for MySQL-protocol connections.
    #[arg(long = "tls-mode", value_enum, global = true)]
    tls_mode: Option<TlsModeArg>,
    /// `SQLite` database file for the sqlite backend.
    #[arg(long = "sqlite-path", value_name = "PATH", global = true)]
    sqlite_path: Option<PathBuf>,
}

impl ConnectionArgs {
    /// Applies flag values on top of `config`.
    fn apply(&self, config: &mut OnlineDdlConfig) {
        let connection = &mut config.connection;
        if let Some(backend) = self.backend {
            connection.backend = backend.into();
        }
        if let Some(host) = &self.host {
            connection.host.clone_from(host);
        }
        if let Some(port) = self.port {
            connection.port = port;
        }
        if let Some(user) = &self.user {
            connection.user.clone_from(user);
        }
        if let Some(database) = &self.database {
            connection.database.clone_from(database);
        }
        if let Some(tls_mode) = self.tls_mode {
            connection.tls_mode = tls_mode.into();
        }
        if let Some(path) = &self.sqlite_path {
            connection.sqlite_path = Some(path.clone());
        }
    }
}

/// Supported modes.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Recreate the table and insert rows until interrupted.
    Insert(InsertCommand),
    /// Add a column to the table.
    Alter(AlterCommand),
}

/// `insert` arguments.
#[derive(Args, Debug, Default)]
struct InsertCommand {
    /// Target table (default `online_ddl_test`).
    table: Option<String>,
    /// Stop after this many committed rows.
    #[arg(long, value_name = "N")]
    rows: Option<u64>,
    /// Backoff base interval in milliseconds.
    #[arg(long = "base-interval-ms", value_name = "MS")]
    base_interval_ms: Option<u64>,
    /// Schema-conflict retries allowed per key.
    #[arg(long = "max-attempts", value_name = "N")]
    max_attempts: Option<u32>,
    /// Wait after an unclassified failure in milliseconds.
    #[arg(long = "cooldown-ms", value_name = "MS")]
    cooldown_ms: Option<u64>,
    /// Time spent inside each transaction before commit, in milliseconds.
    #[arg(long = "txn-hold-ms", value_name = "MS")]
    txn_hold_ms: Option<u64>,
    /// Keep the existing table instead of recreating it.
    #[arg(long = "no-recreate", action = ArgAction::SetTrue)]
    no_recreate: bool,
}

impl InsertCommand {
    /// Applies flag values on top of `config`.
    fn apply(&self, config: &mut OnlineDdlConfig) {
        let writer = &mut config.writer;
        if let Some(table) = &self.table {
            writer.table.clone_from(table);
        }
        if self.rows.is_some() {
            writer.max_rows = self.rows;
        }
        if let Some(value) = self.base_interval_ms {
            writer.base_interval_ms = value;
        }
        if let Some(value) = self.max_attempts {
            writer.max_attempts = value;
        }
        if let Some(value) = self.cooldown_ms {
            writer.cooldown_ms = value;
        }
        if let Some(value) = self.txn_hold_ms {
            writer.txn_hold_ms = value;
        }
        if self.no_recreate {
            writer.recreate_table = false;
        }
    }
}

/// `alter` arguments.
#[derive(Args, Debug, Default)]
struct AlterCommand {
    /// Target table (defaults to the writer table).
    table: Option<String>,
    /// Name of the column to add.
    #[arg(long, value_name = "NAME")]
    column: Option<String>,
    /// SQL definition of the column to add.
    #[arg(long, value_name = "SQL")]
    definition: Option<String>,
}

impl AlterCommand {
    /// Applies flag values on top of `config`.
    fn apply(&self, config: &mut OnlineDdlConfig) {
        if self.table.is_some() {
            config.alter.table.clone_from(&self.table);
        }
        if let Some(column) = &self.column {
            config.alter.column_name.clone_from(column);
        }
        if let Some(definition) = &self.definition {
            config.alter.column_definition.clone_from(definition);
        }
    }
}

/// Backend flag values.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum BackendArg {
    /// TiDB or another MySQL-protocol server.
    Mysql,
    /// Embedded `SQLite` file.
    Sqlite,
}

impl From<BackendArg> for Backend {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Mysql => Self::Mysql,
            BackendArg::Sqlite => Self::Sqlite,
        }
    }
}

/// TLS flag values.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum TlsModeArg {
    /// Plain TCP.
    Disabled,
    /// Encrypt without verifying the server.
    Required,
    /// Verify the certificate chain only.
    VerifyCa,
    /// Verify the chain and host name.
    VerifyIdentity,
}

impl From<TlsModeArg> for TlsMode {
    fn from(value: TlsModeArg) -> Self {
        match value {
            TlsModeArg::Disabled => Self::Disabled,
            TlsModeArg::Required => Self::Required,
            TlsModeArg::VerifyCa => Self::VerifyCa,
            TlsModeArg::VerifyIdentity => Self::VerifyIdentity,
        }
    }
}

/// Language flag values.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::FAILURE);
    };

    match command {
        Commands::Insert(command) => command_insert(&cli.connection, &command).await,
        Commands::Alter(command) => command_alter(&cli.connection, &command).await,
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Insert Command
// ============================================================================

/// Executes the `insert` mode.
async fn command_insert(
    connection: &ConnectionArgs,
    command: &InsertCommand,
) -> CliResult<ExitCode> {
    let config = resolve_config(connection, |config| command.apply(config))?;
    let sink = build_sink(&config.events)?;
    match config.connection.backend {
        Backend::Mysql => {
            let (session, endpoint) = connect_mysql(&config.connection).await?;
            run_insert(session, TidbErrorClassifier, &config, sink, &endpoint).await
        }
        Backend::Sqlite => {
            let (session, endpoint) = open_sqlite(&config.connection)?;
            run_insert(session, SqliteErrorClassifier, &config, sink, &endpoint).await
        }
    }
}

/// Prepares the table and drives the write loop until it stops.
async fn run_insert<S, C>(
    mut session: S,
    classifier: C,
    config: &OnlineDdlConfig,
    sink: Arc<dyn EventSink>,
    endpoint: &str,
) -> CliResult<ExitCode>
where
    S: StoreSession,
    C: ErrorClassifier,
{
    probe(&mut session, &classifier, endpoint).await?;
    let worker_config = config.writer.worker_config().map_err(config_error)?;
    if config.writer.recreate_table {
        let setup = TableSetup::new(Arc::clone(&sink))
            .with_metadata_lock_disabled(config.writer.disable_metadata_lock);
        if let Err(err) = setup.prepare(&mut session, &worker_config.table).await {
            let outcome = classifier.classify_failure(err.failure());
            close_session(&mut session).await;
            let message = t!("insert.setup_failed", table = worker_config.table, error = err);
            return Err(CliError::new(with_hint(message, outcome)));
        }
    }

    let (handle, mut cancel) = cancel_pair();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = write_stderr_line(&t!("insert.interrupted"));
            handle.cancel();
        }
    });
    write_stderr_line(&t!("insert.started", table = worker_config.table))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;

    let mut worker = WriteWorker::new(session, classifier, TokioPacer, sink, worker_config);
    let mut state = WriteJobState::default();
    let result = worker.run(&mut state, &mut cancel).await;
    interrupt.abort();
    close_session(worker.session_mut()).await;

    let reason = match &result {
        Ok(exit) => exit.as_str(),
        Err(err) => err.as_str(),
    };
    write_stdout_line(&t!(
        "insert.summary",
        reason = reason,
        committed = state.committed,
        next_key = state.next_key,
        abandoned = abandoned_label(&state.abandoned_keys)
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;

    match result {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(err) => Err(CliError::new(worker_error_message(&err))),
    }
}

/// Renders abandoned keys for the summary line.
fn abandoned_label(keys: &BTreeSet<u64>) -> String {
    if keys.is_empty() {
        return t!("insert.summary.none");
    }
    keys.iter().map(u64::to_string).collect::<Vec<_>>().join(", ")
}

/// Renders the diagnostic for a worker stop.
fn worker_error_message(err: &WorkerError) -> String {
    match err {
        WorkerError::Fatal {
            key,
            outcome,
            failure,
        } => with_hint(
            t!(
                "insert.fatal",
                key = key,
                outcome = outcome,
                code = failure.code,
                message = failure.message
            ),
            *outcome,
        ),
        WorkerError::CooldownsExhausted {
            key,
            cooldowns,
            failure,
        } => t!(
            "insert.cooldowns_exhausted",
            key = key,
            cooldowns = cooldowns,
            code = failure.code,
            message = failure.message
        ),
    }
}

// ============================================================================
// SECTION: Alter Command
// ============================================================================

/// Executes the `alter` mode.
async fn command_alter(
    connection: &ConnectionArgs,
    command: &AlterCommand,
) -> CliResult<ExitCode> {
    let config = resolve_config(connection, |config| command.apply(config))?;
    let sink = build_sink(&config.events)?;
    match config.connection.backend {
        Backend::Mysql => {
            let (session, endpoint) = connect_mysql(&config.connection).await?;
            run_alter(session, TidbErrorClassifier, &config, sink, &endpoint).await
        }
        Backend::Sqlite => {
            let (session, endpoint) = open_sqlite(&config.connection)?;
            run_alter(session, SqliteErrorClassifier, &config, sink, &endpoint).await
        }
    }
}

/// Applies the configured alter and lists the resulting columns.
async fn run_alter<S, C>(
    mut session: S,
    classifier: C,
    config: &OnlineDdlConfig,
    sink: Arc<dyn EventSink>,
    endpoint: &str,
) -> CliResult<ExitCode>
where
    S: StoreSession,
    C: ErrorClassifier,
{
    probe(&mut session, &classifier, endpoint).await?;
    let table = config.alter_table().map_err(config_error)?;
    let column = config.alter.column_spec().map_err(config_error)?;
    write_stderr_line(&t!("alter.started", column = column.name(), table = table))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;

    let controller = AlterController::new(sink);
    let mut operation = controller.operation(table.clone(), column);
    let result = controller.apply(&mut session, &mut operation).await;
    close_session(&mut session).await;
    let report = result.map_err(|err| CliError::new(alter_error_message(&err, &classifier)))?;

    write_stdout_line(&t!("alter.finished", elapsed_ms = report.elapsed_ms, table = table))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    for column in &report.columns {
        write_stdout_line(&t!(
            "alter.column",
            name = column.name,
            column_type = column.column_type
        ))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Renders the diagnostic for a failed alter.
fn alter_error_message<C: ErrorClassifier>(err: &AlterError, classifier: &C) -> String {
    match err {
        AlterError::AlreadyApplied {
            table,
        } => t!("alter.already_applied", table = table),
        AlterError::TableMissing {
            table,
            failure,
        } => t!(
            "alter.table_missing",
            table = table,
            code = failure.code,
            message = failure.message
        ),
        AlterError::AlterFailed {
            table,
            failure,
        } => with_hint(
            t!("alter.failed", table = table, code = failure.code, message = failure.message),
            classifier.classify_failure(failure),
        ),
        AlterError::NotVisible {
            table,
            column,
        } => t!("alter.not_visible", column = column, table = table),
    }
}

// ============================================================================
// SECTION: Sessions
// ============================================================================

/// Connects to a MySQL-protocol server; returns the session and its endpoint.
async fn connect_mysql(connection: &ConnectionConfig) -> CliResult<(MySqlSession, String)> {
    let mysql = connection.mysql_config();
    let endpoint = mysql.endpoint();
    write_stderr_line(&t!(
        "connect.start",
        endpoint = endpoint,
        backend = Backend::Mysql.as_str()
    ))
    .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    match MySqlSession::connect(&mysql).await {
        Ok(session) => Ok((session, endpoint)),
        Err(err) => Err(CliError::new(connect_error_message(&endpoint, &err))),
    }
}

/// Renders the diagnostic for a failed MySQL-protocol connection.
fn connect_error_message(endpoint: &str, err: &MySqlStoreError) -> String {
    let message = t!("connect.failed", endpoint = endpoint, error = err);
    match err.failure() {
        Some(failure) => with_hint(message, TidbErrorClassifier.classify_failure(failure)),
        None => message,
    }
}

/// Opens an `SQLite` session; returns the session and its path.
fn open_sqlite(connection: &ConnectionConfig) -> CliResult<(SqliteSession, String)> {
    let sqlite = connection.sqlite_config().map_err(config_error)?;
    let endpoint = sqlite.path.display().to_string();
    write_stderr_line(&t!(
        "connect.start",
        endpoint = endpoint,
        backend = Backend::Sqlite.as_str()
    ))
    .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    let session = SqliteSession::open(&sqlite).map_err(|err| {
        CliError::new(t!("connect.failed", endpoint = endpoint, error = err))
    })?;
    Ok((session, endpoint))
}

/// Runs the connectivity probe on a fresh session.
async fn probe<S, C>(session: &mut S, classifier: &C, endpoint: &str) -> CliResult<()>
where
    S: StoreSession,
    C: ErrorClassifier,
{
    if let Err(failure) = session.query(CONNECTIVITY_PROBE).await {
        let outcome = classifier.classify_failure(&failure);
        close_session(session).await;
        let message = t!("connect.probe_failed", endpoint = endpoint, error = failure);
        return Err(CliError::new(with_hint(message, outcome)));
    }
    Ok(())
}

/// Closes `session`, reporting but not propagating failures.
async fn close_session<S: StoreSession>(session: &mut S) {
    if let Err(err) = session.close().await {
        let _ = write_stderr_line(&t!("session.close_failed", error = err));
    }
}

/// Appends the credentials or missing-database hint matching `outcome`.
fn with_hint(message: String, outcome: FailureOutcome) -> String {
    let hint = match outcome {
        FailureOutcome::FatalAuth => {
            t!("connect.hint.auth", user_env = ENV_USER, password_env = ENV_PASSWORD)
        }
        FailureOutcome::FatalSchema => t!("connect.hint.database", database_env = ENV_DATABASE),
        FailureOutcome::RetryableConflict | FailureOutcome::FatalOther => return message,
    };
    format!("{message}\n{hint}")
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Loads config, then applies environment and flag overrides and revalidates.
fn resolve_config<F>(connection: &ConnectionArgs, apply_mode: F) -> CliResult<OnlineDdlConfig>
where
    F: FnOnce(&mut OnlineDdlConfig),
{
    let mut config = OnlineDdlConfig::load(connection.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    config.apply_env_overrides().map_err(config_error)?;
    connection.apply(&mut config);
    apply_mode(&mut config);
    config.validate().map_err(config_error)?;
    Ok(config)
}

/// Wraps a configuration error raised after overrides.
fn config_error(err: online_ddl_config::ConfigError) -> CliError {
    CliError::new(t!("config.invalid_override", error = err))
}

/// Builds the configured event sink.
fn build_sink(events: &EventsConfig) -> CliResult<Arc<dyn EventSink>> {
    match (events.sink, &events.path) {
        (EventSinkKind::File, Some(path)) => {
            let sink = FileEventSink::new(path).map_err(|err| {
                CliError::new(t!("events.open_failed", path = path.display(), error = err))
            })?;
            Ok(Arc::new(sink))
        }
        (EventSinkKind::File, None) => Err(CliError::new(t!(
            "config.load_failed",
            error = t!("events.path_missing")
        ))),
        (EventSinkKind::Stderr, _) => Ok(Arc::new(StderrEventSink)),
        (EventSinkKind::None, _) => Ok(Arc::new(NoopEventSink)),
    }
}

/// Resolves the output locale from the flag or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
