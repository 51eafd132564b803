// crates/online-ddl-core/tests/alter.rs
// ============================================================================
// Module: Alter Controller and Table Setup Tests
// Description: Ensures schema changes are probed, applied once, and verified.
// ============================================================================
//! ## Overview
//! Validates the alter controller's probe, alter, and visibility steps and the
//! best-effort behavior of table setup.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;

use common::ScriptedStore;
use online_ddl_core::AlterController;
use online_ddl_core::AlterError;
use online_ddl_core::ColumnSpec;
use online_ddl_core::Dialect;
use online_ddl_core::LogicalClock;
use online_ddl_core::MemoryEventSink;
use online_ddl_core::SetupError;
use online_ddl_core::StoreFailure;
use online_ddl_core::TableName;
use online_ddl_core::TableSetup;
use online_ddl_core::Timestamp;
use online_ddl_core::WorkerEvent;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn controller(sink: &Arc<MemoryEventSink>) -> AlterController {
    AlterController::new(sink.clone()).with_clock(Arc::new(LogicalClock::starting_at(100)))
}

// ============================================================================
// SECTION: Alter Controller
// ============================================================================

#[tokio::test]
async fn alter_adds_visible_column_and_finishes_once() {
    let store = ScriptedStore::with_table();
    let mut session = store.session(Dialect::Tidb);
    let sink = Arc::new(MemoryEventSink::new());
    let controller = controller(&sink);
    let mut operation = controller.operation(TableName::default(), ColumnSpec::default());
    assert_eq!(operation.started_at, Timestamp::Logical(100));

    let report = controller.apply(&mut session, &mut operation).await.unwrap();

    assert!(report.columns.iter().any(|column| column.name == "ed"));
    assert!(sink.events().iter().any(|record| record.event
        == WorkerEvent::AlterFinished {
            table: "online_ddl_test".to_string(),
            elapsed_ms: report.elapsed_ms,
        }));
    assert_eq!(operation.finished_at(), Some(Timestamp::Logical(102)));
    assert_eq!(
        store.statements(),
        vec![
            "SELECT 1 FROM `online_ddl_test` LIMIT 1".to_string(),
            "ALTER TABLE `online_ddl_test` ADD COLUMN `ed` VARCHAR(10) DEFAULT 'N/A'".to_string(),
        ]
    );

    let again = controller.apply(&mut session, &mut operation).await.unwrap_err();
    assert!(matches!(again, AlterError::AlreadyApplied { .. }));
    assert_eq!(operation.finished_at(), Some(Timestamp::Logical(102)));
    assert_eq!(store.statements().len(), 2);
}

#[tokio::test]
async fn missing_table_skips_the_alter() {
    let store = ScriptedStore::default();
    let mut session = store.session(Dialect::Tidb);
    let sink = Arc::new(MemoryEventSink::new());
    let controller = controller(&sink);
    let table = TableName::new("missing").unwrap();
    let mut operation = controller.operation(table, ColumnSpec::default());

    let err = controller.apply(&mut session, &mut operation).await.unwrap_err();

    match err {
        AlterError::TableMissing {
            table,
            failure,
        } => {
            assert_eq!(table, "missing");
            assert_eq!(failure.code, 1146);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(operation.is_finished());
    assert!(!store.statements().iter().any(|sql| sql.starts_with("ALTER")));
    assert!(
        sink.events()
            .iter()
            .any(|record| matches!(record.event, WorkerEvent::AlterFailed { .. }))
    );
}

#[tokio::test]
async fn rejected_alter_reports_raw_failure() {
    let store = ScriptedStore::with_table();
    store.with_state(|state| {
        state.alter_failure = Some(StoreFailure::new(1060, "Duplicate column name 'ed'"));
    });
    let mut session = store.session(Dialect::Tidb);
    let sink = Arc::new(MemoryEventSink::new());
    let controller = controller(&sink);
    let mut operation = controller.operation(TableName::default(), ColumnSpec::default());

    let err = controller.apply(&mut session, &mut operation).await.unwrap_err();

    assert!(matches!(
        err,
        AlterError::AlterFailed {
            ref failure,
            ..
        } if failure.code == 1060
    ));
    assert!(operation.is_finished());
}

#[tokio::test]
async fn invisible_column_is_an_error() {
    let store = ScriptedStore::with_table();
    store.with_state(|state| state.hide_added_columns = true);
    let mut session = store.session(Dialect::Tidb);
    let sink = Arc::new(MemoryEventSink::new());
    let controller = controller(&sink);
    let column = ColumnSpec::new("flag", "INT DEFAULT 0").unwrap();
    let mut operation = controller.operation(TableName::default(), column);

    let err = controller.apply(&mut session, &mut operation).await.unwrap_err();

    assert_eq!(
        err,
        AlterError::NotVisible {
            table: "online_ddl_test".to_string(),
            column: "flag".to_string(),
        }
    );
}

// ============================================================================
// SECTION: Table Setup
// ============================================================================

#[tokio::test]
async fn setup_recreates_table_and_tolerates_metadata_lock_failure() {
    let store = ScriptedStore::with_table();
    store.with_state(|state| {
        state.rows = vec![1, 2, 3];
        state.set_global_failure = Some(StoreFailure::new(1227, "Access denied; SUPER needed"));
    });
    let mut session = store.session(Dialect::Tidb);
    let sink = Arc::new(MemoryEventSink::new());

    TableSetup::new(sink.clone()).prepare(&mut session, &TableName::default()).await.unwrap();

    assert!(store.rows().is_empty());
    let statements = store.statements();
    assert!(statements[0].starts_with("SET GLOBAL tidb_enable_metadata_lock"));
    assert!(statements.iter().any(|sql| sql.starts_with("DROP TABLE IF EXISTS")));
    assert!(statements.last().unwrap().starts_with("CREATE TABLE `online_ddl_test`"));
    let events = sink.events();
    assert!(events.iter().any(|record| matches!(
        record.event,
        WorkerEvent::SetupWarning {
            code: 1227,
            ..
        }
    )));
    assert!(events.iter().any(|record| matches!(record.event, WorkerEvent::TablePrepared { .. })));
}

#[tokio::test]
async fn setup_reports_metadata_lock_value() {
    let store = ScriptedStore::with_table();
    let mut session = store.session(Dialect::Tidb);
    let sink = Arc::new(MemoryEventSink::new());

    TableSetup::new(sink.clone()).prepare(&mut session, &TableName::default()).await.unwrap();

    let statements = store.statements();
    assert_eq!(statements[1], "SHOW VARIABLES LIKE 'tidb_enable_metadata_lock'");
    let reported: Vec<WorkerEvent> = sink
        .events()
        .into_iter()
        .filter(|record| matches!(record.event, WorkerEvent::MetadataLockSetting { .. }))
        .map(|record| record.event)
        .collect();
    assert_eq!(
        reported,
        vec![WorkerEvent::MetadataLockSetting {
            name: "tidb_enable_metadata_lock".to_string(),
            value: Some("OFF".to_string()),
        }]
    );
}

#[tokio::test]
async fn setup_reports_missing_metadata_lock_row() {
    let store = ScriptedStore::with_table();
    store.with_state(|state| state.hide_variables = true);
    let mut session = store.session(Dialect::Tidb);
    let sink = Arc::new(MemoryEventSink::new());

    TableSetup::new(sink.clone()).prepare(&mut session, &TableName::default()).await.unwrap();

    assert!(sink.events().iter().any(|record| record.event
        == WorkerEvent::MetadataLockSetting {
            name: "tidb_enable_metadata_lock".to_string(),
            value: None,
        }));
}

#[tokio::test]
async fn sqlite_setup_skips_metadata_lock_and_creates_index() {
    let store = ScriptedStore::default();
    let mut session = store.session(Dialect::Sqlite);
    let sink = Arc::new(MemoryEventSink::new());

    TableSetup::new(sink.clone()).prepare(&mut session, &TableName::default()).await.unwrap();

    let statements = store.statements();
    assert_eq!(statements.len(), 3);
    assert!(!statements.iter().any(|sql| sql.contains("tidb_enable_metadata_lock")));
    assert!(statements[2].starts_with("CREATE INDEX"));
}

#[test]
fn setup_error_exposes_failure() {
    let err = SetupError::Create {
        table: "t".to_string(),
        failure: StoreFailure::new(1050, "exists"),
    };
    assert_eq!(err.failure().code, 1050);
}
