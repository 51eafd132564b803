//! Environment override tests for online-ddl-config.
// crates/online-ddl-config/tests/env_overrides.rs
// =============================================================================
// Module: Config Environment Override Tests
// Description: Validate TIDB_* overrides applied on top of file values.
// Purpose: Keep the original environment variable contract.
// =============================================================================

mod common;

use std::collections::HashMap;

use common::TestResult;
use online_ddl_config::OnlineDdlConfig;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> =
        pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn overrides_replace_connection_fields() -> TestResult {
    let mut config = OnlineDdlConfig::from_toml("[connection]\nhost = \"from-file\"\n")
        .map_err(|err| err.to_string())?;
    config
        .apply_env_overrides_with(lookup(&[
            ("TIDB_HOST", "tidb.example"),
            ("TIDB_PORT", "4100"),
            ("TIDB_USER", "writer"),
            ("TIDB_PASSWORD", "pw"),
            ("TIDB_DATABASE", "ddl"),
        ]))
        .map_err(|err| err.to_string())?;

    let connection = &config.connection;
    if connection.host != "tidb.example" || connection.port != 4100 {
        return Err("endpoint not overridden".to_string());
    }
    if connection.user != "writer" || connection.password != "pw" || connection.database != "ddl" {
        return Err("credentials not overridden".to_string());
    }
    Ok(())
}

#[test]
fn absent_variables_keep_file_values() -> TestResult {
    let mut config = OnlineDdlConfig::from_toml("[connection]\nuser = \"app\"\nport = 4001\n")
        .map_err(|err| err.to_string())?;
    config.apply_env_overrides_with(lookup(&[])).map_err(|err| err.to_string())?;

    if config.connection.user != "app" || config.connection.port != 4001 {
        return Err("file values were replaced".to_string());
    }
    Ok(())
}

#[test]
fn malformed_port_is_rejected() -> TestResult {
    let mut config = OnlineDdlConfig::default();
    match config.apply_env_overrides_with(lookup(&[("TIDB_PORT", "forty")])) {
        Err(error) if error.to_string().contains("TIDB_PORT must be a port number") => Ok(()),
        Err(error) => Err(format!("unexpected error {error}")),
        Ok(()) => Err("expected malformed port to fail".to_string()),
    }
}

#[test]
fn overrides_are_subject_to_validation() -> TestResult {
    let mut config = OnlineDdlConfig::default();
    config
        .apply_env_overrides_with(lookup(&[("TIDB_HOST", "  ")]))
        .map_err(|err| err.to_string())?;
    match config.validate() {
        Err(error) if error.to_string().contains("connection.host must be non-empty") => Ok(()),
        Err(error) => Err(format!("unexpected error {error}")),
        Ok(()) => Err("blank host should fail validation".to_string()),
    }
}
