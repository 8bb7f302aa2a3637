#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{raw_conn, snapshot, temp_store, T1, T2, T3};
use sentinel_core::hashchain::BreakReason;
use sentinel_store::SnapshotStore;

fn three_entry_chain(store: &SnapshotStore) -> Vec<String> {
    [(T1, 100), (T2, 150), (T3, 175)]
        .into_iter()
        .map(|(ts, votes)| store.append_snapshot(&snapshot("El Paraíso", ts, votes)).unwrap())
        .collect()
}

#[test]
fn test_untouched_chain_verifies() {
    let store = SnapshotStore::open_in_memory().unwrap();
    three_entry_chain(&store);

    let report = store.verify_department_chain("07").unwrap();
    assert!(report.is_intact());
    assert_eq!(report.entries_checked, 3);
}

#[test]
fn test_empty_department_verifies() {
    let store = SnapshotStore::open_in_memory().unwrap();
    let report = store.verify_department_chain("11").unwrap();
    assert!(report.is_intact());
    assert_eq!(report.entries_checked, 0);
}

#[test]
fn test_edited_payload_detected() {
    let (_dir, db_path, store) = temp_store();
    three_entry_chain(&store);

    let changed = raw_conn(&db_path)
        .execute(
            "UPDATE dept_07_snapshots
             SET canonical_json = replace(canonical_json, '\"valid_votes\":150', '\"valid_votes\":999')
             WHERE timestamp_utc = ?1",
            [T2],
        )
        .unwrap();
    assert_eq!(changed, 1);

    let brk = store
        .verify_department_chain("07")
        .unwrap()
        .first_break
        .unwrap();
    assert_eq!(brk.position, 1);
    assert_eq!(brk.timestamp_utc, T2);
    assert!(matches!(brk.reason, BreakReason::HashMismatch { .. }));
}

#[test]
fn test_deleted_entry_breaks_link() {
    let (_dir, db_path, store) = temp_store();
    three_entry_chain(&store);

    raw_conn(&db_path)
        .execute("DELETE FROM dept_07_snapshots WHERE timestamp_utc = ?1", [T2])
        .unwrap();

    let brk = store
        .verify_department_chain("07")
        .unwrap()
        .first_break
        .unwrap();
    assert_eq!(brk.position, 1);
    assert_eq!(brk.timestamp_utc, T3);
    assert!(matches!(brk.reason, BreakReason::LinkMismatch { .. }));
}

#[test]
fn test_store_with_wrong_previous_hash_fails_verification() {
    let store = SnapshotStore::open_in_memory().unwrap();
    store.store_snapshot(&snapshot("Islas de la Bahía", T1, 1), None).unwrap();
    store
        .store_snapshot(&snapshot("Islas de la Bahía", T2, 2), Some("not-the-head"))
        .unwrap();

    let brk = store
        .verify_department_chain("11")
        .unwrap()
        .first_break
        .unwrap();
    assert_eq!(brk.position, 1);
    assert!(matches!(brk.reason, BreakReason::LinkMismatch { .. }));
}

#[test]
fn test_edited_columns_detected() {
    let (_dir, db_path, store) = temp_store();
    three_entry_chain(&store);

    // canonical_json and the hashes stay intact; only the CSV-facing columns move
    raw_conn(&db_path)
        .execute(
            "UPDATE dept_07_snapshots SET valid_votes = 999999, candidates_json = '[]'
             WHERE timestamp_utc = ?1",
            [T1],
        )
        .unwrap();

    let report = store.verify_department_chain("07").unwrap();
    assert_eq!(report.entries_checked, 1);
    let brk = report.first_break.unwrap();
    assert_eq!(brk.position, 0);
    assert_eq!(brk.timestamp_utc, T1);
    assert_eq!(
        brk.reason,
        BreakReason::ColumnMismatch {
            column: "valid_votes".to_string()
        }
    );
}

#[test]
fn test_edited_candidates_column_detected() {
    let (_dir, db_path, store) = temp_store();
    three_entry_chain(&store);

    raw_conn(&db_path)
        .execute(
            "UPDATE dept_07_snapshots SET candidates_json = '[]' WHERE timestamp_utc = ?1",
            [T3],
        )
        .unwrap();

    let brk = store
        .verify_department_chain("07")
        .unwrap()
        .first_break
        .unwrap();
    assert_eq!(brk.position, 2);
    assert_eq!(
        brk.reason,
        BreakReason::ColumnMismatch {
            column: "candidates_json".to_string()
        }
    );
}
