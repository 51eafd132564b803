// crates/online-ddl-core/src/runtime/sql.rs
// ============================================================================
// Module: Statement Rendering
// Description: SQL text for the write loop, alter, and table setup.
// Purpose: Keep every statement the runtime issues in one place.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Statements interpolate only validated, back-quoted identifiers. Row values
//! travel as positional parameters. Back-quoted identifiers are accepted by
//! both TiDB and `SQLite`; only table creation differs per [`Dialect`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ColumnSpec;
use crate::core::TableName;
use crate::core::quote_identifier;
use crate::interfaces::Dialect;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Round-trip statement used to prove connectivity.
pub const CONNECTIVITY_PROBE: &str = "SELECT 1";
/// Turns off TiDB's metadata lock so DDL surfaces conflicts to writers.
pub const DISABLE_METADATA_LOCK: &str = "SET GLOBAL tidb_enable_metadata_lock = OFF";
/// TiDB variable controlling the metadata lock.
pub const METADATA_LOCK_VARIABLE: &str = "tidb_enable_metadata_lock";
/// Reads back the metadata lock setting.
pub const SHOW_METADATA_LOCK: &str = "SHOW VARIABLES LIKE 'tidb_enable_metadata_lock'";

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the row insert with a single `?` placeholder for the key.
#[must_use]
pub fn insert_row(table: &TableName) -> String {
    format!("INSERT INTO {} (k, c, pad) VALUES (?, 'A', 'B')", table.quoted())
}

/// Renders the table existence probe.
#[must_use]
pub fn probe_table(table: &TableName) -> String {
    format!("SELECT 1 FROM {} LIMIT 1", table.quoted())
}

/// Renders the column addition.
#[must_use]
pub fn add_column(table: &TableName, column: &ColumnSpec) -> String {
    format!("ALTER TABLE {} ADD COLUMN {column}", table.quoted())
}

/// Renders the table drop.
#[must_use]
pub fn drop_table(table: &TableName) -> String {
    format!("DROP TABLE IF EXISTS {}", table.quoted())
}

/// Renders the statements that create the row table, in execution order.
#[must_use]
pub fn create_table(table: &TableName, dialect: Dialect) -> Vec<String> {
    let quoted = table.quoted();
    match dialect {
        Dialect::Tidb => vec![format!(
            "CREATE TABLE {quoted} (id INT NOT NULL PRIMARY KEY AUTO_INCREMENT, k INT NOT NULL, c \
             CHAR(120) NOT NULL, pad CHAR(60) NOT NULL, INDEX k_idx (k))"
        )],
        Dialect::Sqlite => {
            let index = quote_identifier(&format!("{}_k_idx", table.as_str()));
            vec![
                format!(
                    "CREATE TABLE {quoted} (id INTEGER PRIMARY KEY AUTOINCREMENT, k INTEGER NOT \
                     NULL, c CHAR(120) NOT NULL, pad CHAR(60) NOT NULL)"
                ),
                format!("CREATE INDEX {index} ON {quoted} (k)"),
            ]
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
