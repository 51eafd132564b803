// crates/online-ddl-core/tests/sinks.rs
// ============================================================================
// Module: Event Sink Tests
// Description: Ensures events serialize as stable JSON lines.
// ============================================================================
//! ## Overview
//! Validates the file sink's append behavior and the event wire shape.

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

use online_ddl_core::EventRecord;
use online_ddl_core::EventSink;
use online_ddl_core::FailureOutcome;
use online_ddl_core::FileEventSink;
use online_ddl_core::MemoryEventSink;
use online_ddl_core::NoopEventSink;
use online_ddl_core::TaskKind;
use online_ddl_core::Timestamp;
use online_ddl_core::WorkerEvent;
use serde_json::Value;

fn record(event: WorkerEvent) -> EventRecord {
    EventRecord {
        at: Timestamp::UnixMillis(1_700_000_000_000),
        task: TaskKind::Writer,
        event,
    }
}

#[test]
fn file_sink_appends_one_json_object_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let sink = FileEventSink::new(&path).unwrap();
    sink.record(&record(WorkerEvent::RowCommitted {
        key: 0,
    }));
    sink.record(&record(WorkerEvent::ConflictRetry {
        key: 1,
        attempt: 2,
        delay_ms: 2000,
        code: 8028,
        message: "Information schema is changed".to_string(),
    }));
    drop(sink);

    let reopened = FileEventSink::new(&path).unwrap();
    reopened.record(&record(WorkerEvent::Fatal {
        key: Some(1),
        outcome: FailureOutcome::FatalAuth,
        code: 1045,
        message: "Access denied".to_string(),
    }));

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["event"], "row_committed");
    assert_eq!(lines[0]["task"], "writer");
    assert_eq!(lines[0]["at"]["kind"], "unix_millis");
    assert_eq!(lines[1]["event"], "conflict_retry");
    assert_eq!(lines[1]["delay_ms"], 2000);
    assert_eq!(lines[2]["outcome"], "fatal_auth");
}

#[test]
fn memory_sink_keeps_order_and_noop_discards() {
    let memory = MemoryEventSink::new();
    let noop = NoopEventSink;
    for key in 0 .. 3 {
        let event = record(WorkerEvent::RowCommitted {
            key,
        });
        memory.record(&event);
        noop.record(&event);
    }
    let keys: Vec<u64> = memory
        .events()
        .iter()
        .filter_map(|record| match record.event {
            WorkerEvent::RowCommitted {
                key,
            } => Some(key),
            _ => None,
        })
        .collect();
    assert_eq!(keys, vec![0, 1, 2]);
}
