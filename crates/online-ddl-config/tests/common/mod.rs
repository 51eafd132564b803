// crates/online-ddl-config/tests/common/mod.rs
// ============================================================================
// Module: Config Test Helpers
// Description: Shared fixtures for config tests.
// Purpose: Write temporary config files and check error messages.
// ============================================================================

#![allow(dead_code, reason = "Each test binary uses a subset of the helpers.")]

use std::io::Write;

use online_ddl_config::ConfigError;
use online_ddl_config::OnlineDdlConfig;
use tempfile::NamedTempFile;

/// Result type for config tests.
pub type TestResult = Result<(), String>;

/// Writes `contents` to a temporary file that lives as long as the handle.
pub fn config_file(contents: &[u8]) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(contents).map_err(|err| err.to_string())?;
    Ok(file)
}

/// Expects an error whose message contains `needle`.
pub fn assert_invalid(result: Result<OnlineDdlConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err(format!("expected error containing {needle}")),
    }
}
