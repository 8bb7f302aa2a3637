#![allow(clippy::unwrap_used, clippy::expect_used)]

use sentinel_core::errors::{ExError, ExErrorKind, SentinelError};
use sentinel_core::logging_facility::test_capture::init_test_capture;
use sentinel_core::{log_op_end, log_op_error, log_op_start};
use sentinel_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, department_code = "01");

    let events = capture.events_for_op(op_name);
    let start = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_START))
        .expect("start event");
    assert_eq!(start.field("department_code"), Some("01"));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_records_stable_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = SentinelError::UnknownDepartment {
        name: "Atlantis".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(
        error_events[0].field("err.code"),
        Some("ERR_UNKNOWN_DEPARTMENT")
    );
}

#[test]
fn test_log_op_error_accepts_ex_error() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = ExError::new(ExErrorKind::StorageWriteFailure).with_message("disk full");
    log_op_error!(op_name, err, duration_ms = 1, department_code = "06");

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let count = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.field("department_code") == Some("06")
    });
    assert_eq!(count, 1);
}
