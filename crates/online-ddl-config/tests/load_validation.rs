//! Config load validation tests for online-ddl-config.
// crates/online-ddl-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding, syntax).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

#![allow(clippy::use_debug, reason = "Unexpected results are reported with their debug form.")]

mod common;

use std::path::Path;

use common::TestResult;
use common::assert_invalid;
use common::config_file;
use online_ddl_config::Backend;
use online_ddl_config::ConfigError;
use online_ddl_config::OnlineDdlConfig;

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    assert_invalid(
        OnlineDdlConfig::load(Some(Path::new(&long_path))),
        "config path exceeds max length",
    )
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    assert_invalid(
        OnlineDdlConfig::load(Some(Path::new(&long_component))),
        "config path component too long",
    )
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let file = config_file(&vec![b'#'; 1_048_577])?;
    assert_invalid(OnlineDdlConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let file = config_file(&[0xFF, 0xFE, 0xFF])?;
    assert_invalid(OnlineDdlConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_reports_missing_file_as_io() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    match OnlineDdlConfig::load(Some(&dir.path().join("absent.toml"))) {
        Err(ConfigError::Io(_)) => Ok(()),
        other => Err(format!("expected io error, got {other:?}")),
    }
}

#[test]
fn load_reports_syntax_errors_as_parse() -> TestResult {
    let file = config_file(b"[writer\ntable = 1")?;
    match OnlineDdlConfig::load(Some(file.path())) {
        Err(ConfigError::Parse(_)) => Ok(()),
        other => Err(format!("expected parse error, got {other:?}")),
    }
}

#[test]
fn load_rejects_unknown_backend() -> TestResult {
    let file = config_file(b"[connection]\nbackend = \"postgres\"\n")?;
    match OnlineDdlConfig::load(Some(file.path())) {
        Err(ConfigError::Parse(message)) if message.contains("postgres") => Ok(()),
        other => Err(format!("expected parse error naming the backend, got {other:?}")),
    }
}

#[test]
fn load_reads_sections_and_records_source() -> TestResult {
    let file = config_file(
        br#"
[connection]
backend = "sqlite"
sqlite_path = "data/online_ddl.db"
busy_timeout_ms = 250

[writer]
table = "orders"
max_attempts = 3
max_rows = 40

[alter]
column_name = "note"
column_definition = "TEXT DEFAULT 'none'"
"#,
    )?;
    let config = OnlineDdlConfig::load(Some(file.path())).map_err(|err| err.to_string())?;

    if config.connection.backend != Backend::Sqlite {
        return Err("backend not read".to_string());
    }
    if config.connection.busy_timeout_ms != 250 {
        return Err("busy timeout not read".to_string());
    }
    if config.writer.table != "orders" || config.writer.max_attempts != 3 {
        return Err("writer section not read".to_string());
    }
    if config.writer.max_rows != Some(40) {
        return Err("max_rows not read".to_string());
    }
    let alter_table = config.alter_table().map_err(|err| err.to_string())?;
    if alter_table.as_str() != "orders" {
        return Err("alter table should default to the writer table".to_string());
    }
    if config.source.as_deref() != Some(file.path()) {
        return Err("source path not recorded".to_string());
    }
    Ok(())
}
