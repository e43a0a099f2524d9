use bizdesk_core::db::{open_db, open_db_in_memory};
use bizdesk_core::schema::FieldValue;
use bizdesk_core::{DocumentStore, Record, SqliteDocumentStore, StoreError};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

fn store() -> SqliteDocumentStore {
    SqliteDocumentStore::new(open_db_in_memory().unwrap())
}

fn sample_record(id: &str) -> Record {
    let mut record = Record::new("Sample", id);
    record.set("name", "Acme, \"Ltd\"");
    record.set("count", 42_i64);
    record.set("amount", dec!(1234.50));
    record.set("due", NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    record.set(
        "stamped_at",
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 5).unwrap(),
    );
    record.set("active", true);
    record.fields.insert(
        "payload".to_string(),
        FieldValue::Blob(br#"[{"a":1}]"#.to_vec()),
    );
    record
}

#[test]
fn save_and_fetch_preserves_every_field_kind() {
    let store = store();
    let record = sample_record("r-1");
    store.save(&record).unwrap();

    let loaded = store.fetch("Sample", "r-1").unwrap().unwrap();
    assert_eq!(loaded, record);
    assert_eq!(loaded.get("amount"), Some(&FieldValue::Decimal(dec!(1234.50))));
}

#[test]
fn save_replaces_all_fields_of_existing_record() {
    let store = store();
    store.save(&sample_record("r-1")).unwrap();

    let mut replacement = Record::new("Sample", "r-1");
    replacement.set("name", "renamed");
    store.save(&replacement).unwrap();

    let loaded = store.fetch("Sample", "r-1").unwrap().unwrap();
    assert_eq!(loaded.fields.len(), 1);
    assert_eq!(loaded.get("name"), Some(&FieldValue::Text("renamed".to_string())));
    assert!(loaded.get("amount").is_none());
}

#[test]
fn fetch_all_is_scoped_to_record_type() {
    let store = store();
    store.save(&sample_record("r-1")).unwrap();
    store.save(&sample_record("r-2")).unwrap();
    store.save(&Record::new("Other", "o-1")).unwrap();

    let samples = store.fetch_all("Sample").unwrap();
    let mut ids: Vec<&str> = samples.iter().map(|record| record.record_id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["r-1", "r-2"]);

    let others = store.fetch_all("Other").unwrap();
    assert_eq!(others.len(), 1);
    assert!(others[0].fields.is_empty());
}

#[test]
fn fetch_missing_record_returns_none() {
    let store = store();
    assert!(store.fetch("Sample", "missing").unwrap().is_none());
}

#[test]
fn delete_removes_record_and_reports_missing() {
    let store = store();
    store.save(&sample_record("r-1")).unwrap();
    store.delete("Sample", "r-1").unwrap();
    assert!(store.fetch("Sample", "r-1").unwrap().is_none());

    let err = store.delete("Sample", "r-1").unwrap_err();
    match err {
        StoreError::NotFound {
            record_type,
            record_id,
        } => {
            assert_eq!(record_type, "Sample");
            assert_eq!(record_id, "r-1");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn records_survive_reopening_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");

    let store = SqliteDocumentStore::new(open_db(&path).unwrap());
    store.save(&sample_record("r-1")).unwrap();
    drop(store);

    let reopened = SqliteDocumentStore::new(open_db(&path).unwrap());
    assert_eq!(
        reopened.fetch("Sample", "r-1").unwrap(),
        Some(sample_record("r-1"))
    );
}
