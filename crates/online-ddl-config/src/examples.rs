// crates/online-ddl-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical `online-ddl.toml` example. Every value shown is the built-in
//! default, except the commented-out lines.

/// Returns a canonical example `online-ddl.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[connection]
backend = "mysql"
host = "localhost"
port = 4000
user = "root"
password = ""
database = "test"
tls_mode = "verify_identity"
connect_timeout_ms = 10000
# backend = "sqlite"
# sqlite_path = "online_ddl.db"
busy_timeout_ms = 5000

[writer]
table = "online_ddl_test"
base_interval_ms = 1000
max_attempts = 5
cooldown_ms = 2000
# max_cooldowns = 10
txn_hold_ms = 1000
# max_rows = 1000
recreate_table = true
disable_metadata_lock = true

[alter]
column_name = "ed"
column_definition = "VARCHAR(10) DEFAULT 'N/A'"

[events]
sink = "stderr"
# sink = "file"
# path = "online-ddl-events.jsonl"
"#,
    )
}
