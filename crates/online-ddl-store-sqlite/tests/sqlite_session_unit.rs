// crates/online-ddl-store-sqlite/tests/sqlite_session_unit.rs
// ============================================================================
// Module: SQLite Session Unit Tests
// Description: Targeted tests for the SQLite store session.
// Purpose: Validate statements, transactions, introspection, failure codes,
//          and path safety.
// ============================================================================

//! ## Overview
//! Unit-level tests for the `SQLite` session:
//! - Parameterized statements and queries
//! - Rollback discards uncommitted rows
//! - Introspection and missing-table failures
//! - Closed sessions and invalid paths

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;

use online_ddl_core::ErrorClassifier;
use online_ddl_core::FailureOutcome;
use online_ddl_core::NoopEventSink;
use online_ddl_core::SqlValue;
use online_ddl_core::StoreSession;
use online_ddl_core::TableName;
use online_ddl_core::TableSetup;
use online_ddl_store_sqlite::SqliteErrorClassifier;
use online_ddl_store_sqlite::SqliteSession;
use online_ddl_store_sqlite::SqliteStoreConfig;
use online_ddl_store_sqlite::SqliteStoreError;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn open(dir: &TempDir) -> SqliteSession {
    SqliteSession::open(&SqliteStoreConfig::new(dir.path().join("online_ddl.db"))).unwrap()
}

async fn prepared(dir: &TempDir) -> SqliteSession {
    let mut session = open(dir);
    TableSetup::new(Arc::new(NoopEventSink))
        .prepare(&mut session, &TableName::default())
        .await
        .unwrap();
    session
}

async fn row_count(session: &mut SqliteSession) -> i64 {
    let rows = session.query("SELECT COUNT(*) FROM online_ddl_test").await.unwrap();
    rows[0][0].as_i64().unwrap()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test]
async fn inserts_and_queries_rows() {
    let dir = TempDir::new().unwrap();
    let mut session = prepared(&dir).await;

    let changed = session
        .execute(
            "INSERT INTO online_ddl_test (k, c, pad) VALUES (?, 'A', 'B')",
            &[SqlValue::UInt(42)],
        )
        .await
        .unwrap();
    assert_eq!(changed, 1);

    let rows = session.query("SELECT k, c, pad FROM online_ddl_test").await.unwrap();
    assert_eq!(
        rows,
        vec![vec![SqlValue::Int(42), SqlValue::Text("A".to_string()), SqlValue::Text("B".to_string())]]
    );
}

#[tokio::test]
async fn rollback_discards_uncommitted_rows() {
    let dir = TempDir::new().unwrap();
    let mut session = prepared(&dir).await;

    session.rollback().await.unwrap();
    session.begin_transaction().await.unwrap();
    session
        .execute(
            "INSERT INTO online_ddl_test (k, c, pad) VALUES (?, 'A', 'B')",
            &[SqlValue::UInt(1)],
        )
        .await
        .unwrap();
    session.rollback().await.unwrap();

    assert_eq!(row_count(&mut session).await, 0);
}

#[tokio::test]
async fn describe_lists_columns_in_order() {
    let dir = TempDir::new().unwrap();
    let mut session = prepared(&dir).await;

    let names: Vec<String> = session
        .describe_table("online_ddl_test")
        .await
        .unwrap()
        .into_iter()
        .map(|column| column.name)
        .collect();

    assert_eq!(names, vec!["id", "k", "c", "pad"]);
}

#[tokio::test]
async fn missing_table_is_a_schema_failure() {
    let dir = TempDir::new().unwrap();
    let mut session = open(&dir);
    let classifier = SqliteErrorClassifier;

    let insert = session
        .execute("INSERT INTO nope (k, c, pad) VALUES (?, 'A', 'B')", &[SqlValue::UInt(0)])
        .await
        .unwrap_err();
    assert_eq!(insert.code, 1);
    assert!(insert.message.contains("no such table"));
    assert_eq!(classifier.classify_failure(&insert), FailureOutcome::FatalSchema);

    let describe = session.describe_table("nope").await.unwrap_err();
    assert_eq!(classifier.classify_failure(&describe), FailureOutcome::FatalSchema);
}

#[tokio::test]
async fn closed_session_rejects_calls() {
    let dir = TempDir::new().unwrap();
    let mut session = open(&dir);

    session.close().await.unwrap();
    session.close().await.unwrap();
    let err = session.query("SELECT 1").await.unwrap_err();

    assert_eq!(err.code, 21);
}

#[test]
fn rejects_directory_and_overlong_paths() {
    let dir = TempDir::new().unwrap();
    let err = SqliteSession::open(&SqliteStoreConfig::new(dir.path())).unwrap_err();
    assert!(matches!(err, SqliteStoreError::Invalid(_)));

    let long = dir.path().join("x".repeat(300));
    let err = SqliteSession::open(&SqliteStoreConfig::new(long)).unwrap_err();
    assert!(matches!(err, SqliteStoreError::Invalid(_)));
}
