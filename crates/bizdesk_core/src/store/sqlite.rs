//! SQLite-backed document store.
//!
//! # Invariants
//! - A record's fields are replaced in the same transaction as its header.
//! - Read paths reject unknown field kinds instead of skipping them.

use super::{DocumentStore, StoreError, StoreResult};
use crate::schema::{FieldKind, FieldValue, Record};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use log::{debug, error};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Document store on a migrated SQLite connection.
pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
}

impl SqliteDocumentStore {
    /// Wraps a connection returned by `db::open_db` or `db::open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("store connection lock poisoned".to_string()))
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn fetch_all(&self, record_type: &str) -> StoreResult<Vec<Record>> {
        let started_at = Instant::now();
        let conn = self.lock()?;
        let result = query_records(&conn, record_type, None);
        log_outcome("store_fetch_all", record_type, started_at, &result);
        result
    }

    fn fetch(&self, record_type: &str, record_id: &str) -> StoreResult<Option<Record>> {
        let started_at = Instant::now();
        let conn = self.lock()?;
        let result = query_records(&conn, record_type, Some(record_id))
            .map(|records| records.into_iter().next());
        log_outcome("store_fetch", record_type, started_at, &result);
        result
    }

    fn save(&self, record: &Record) -> StoreResult<()> {
        let started_at = Instant::now();
        let mut conn = self.lock()?;
        let result = write_record(&mut conn, record);
        log_outcome("store_save", &record.record_type, started_at, &result);
        result
    }

    fn delete(&self, record_type: &str, record_id: &str) -> StoreResult<()> {
        let started_at = Instant::now();
        let conn = self.lock()?;
        let result = conn
            .execute(
                "DELETE FROM records WHERE record_type = ?1 AND record_id = ?2;",
                params![record_type, record_id],
            )
            .map_err(StoreError::from)
            .and_then(|changed| {
                if changed == 0 {
                    Err(StoreError::NotFound {
                        record_type: record_type.to_string(),
                        record_id: record_id.to_string(),
                    })
                } else {
                    Ok(())
                }
            });
        log_outcome("store_delete", record_type, started_at, &result);
        result
    }
}

fn log_outcome<T>(event: &str, record_type: &str, started_at: Instant, result: &StoreResult<T>) {
    match result {
        Ok(_) => debug!(
            "event={event} module=store status=ok record_type={record_type} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event={event} module=store status=error record_type={record_type} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
}

fn write_record(conn: &mut Connection, record: &Record) -> StoreResult<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO records (record_type, record_id)
         VALUES (?1, ?2)
         ON CONFLICT (record_type, record_id)
         DO UPDATE SET modified_at = (strftime('%s', 'now') * 1000);",
        params![record.record_type, record.record_id],
    )?;
    tx.execute(
        "DELETE FROM record_fields WHERE record_type = ?1 AND record_id = ?2;",
        params![record.record_type, record.record_id],
    )?;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO record_fields (
                record_type,
                record_id,
                name,
                kind,
                text_value,
                int_value,
                blob_value
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        )?;
        for (name, value) in &record.fields {
            let (text_value, int_value, blob_value) = encode_field(value);
            stmt.execute(params![
                record.record_type,
                record.record_id,
                name,
                value.kind().as_str(),
                text_value,
                int_value,
                blob_value,
            ])?;
        }
    }

    tx.commit()?;
    Ok(())
}

fn query_records(
    conn: &Connection,
    record_type: &str,
    record_id: Option<&str>,
) -> StoreResult<Vec<Record>> {
    let mut sql = String::from(
        "SELECT
            r.record_id,
            f.name,
            f.kind,
            f.text_value,
            f.int_value,
            f.blob_value
         FROM records r
         LEFT JOIN record_fields f
           ON f.record_type = r.record_type AND f.record_id = r.record_id
         WHERE r.record_type = ?",
    );
    let mut bind_values = vec![Value::Text(record_type.to_string())];
    if let Some(record_id) = record_id {
        sql.push_str(" AND r.record_id = ?");
        bind_values.push(Value::Text(record_id.to_string()));
    }
    sql.push_str(" ORDER BY r.modified_at DESC, r.record_id ASC, f.name ASC");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(bind_values))?;
    let mut records: Vec<Record> = Vec::new();

    while let Some(row) = rows.next()? {
        let id: String = row.get(0)?;
        if records.last().map(|record| record.record_id.as_str()) != Some(id.as_str()) {
            records.push(Record::new(record_type, id));
        }
        let Some(name) = row.get::<_, Option<String>>(1)? else {
            continue;
        };
        let value = decode_field(row, &name)?;
        if let Some(record) = records.last_mut() {
            record.fields.insert(name, value);
        }
    }

    Ok(records)
}

fn encode_field(value: &FieldValue) -> (Option<String>, Option<i64>, Option<Vec<u8>>) {
    match value {
        FieldValue::Text(text) => (Some(text.clone()), None, None),
        FieldValue::Integer(number) => (None, Some(*number), None),
        FieldValue::Decimal(decimal) => (Some(decimal.to_string()), None, None),
        FieldValue::Date(date) => (Some(date.format(DATE_FORMAT).to_string()), None, None),
        FieldValue::Timestamp(timestamp) => (
            Some(timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None,
            None,
        ),
        FieldValue::Bool(flag) => (None, Some(i64::from(*flag)), None),
        FieldValue::Blob(bytes) => (None, None, Some(bytes.clone())),
    }
}

fn decode_field(row: &Row<'_>, name: &str) -> StoreResult<FieldValue> {
    let kind_text: String = row.get(2)?;
    let kind = FieldKind::parse(&kind_text).ok_or_else(|| {
        StoreError::InvalidData(format!("unknown field kind `{kind_text}` for `{name}`"))
    })?;

    let text = || -> StoreResult<String> {
        row.get::<_, Option<String>>(3)?
            .ok_or_else(|| StoreError::InvalidData(format!("field `{name}` has no text value")))
    };
    let integer = || -> StoreResult<i64> {
        row.get::<_, Option<i64>>(4)?
            .ok_or_else(|| StoreError::InvalidData(format!("field `{name}` has no int value")))
    };

    let value = match kind {
        FieldKind::Text => FieldValue::Text(text()?),
        FieldKind::Integer => FieldValue::Integer(integer()?),
        FieldKind::Decimal => {
            let raw = text()?;
            let decimal = Decimal::from_str(&raw).map_err(|err| {
                StoreError::InvalidData(format!("field `{name}` decimal `{raw}`: {err}"))
            })?;
            FieldValue::Decimal(decimal)
        }
        FieldKind::Date => {
            let raw = text()?;
            let date = NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|err| {
                StoreError::InvalidData(format!("field `{name}` date `{raw}`: {err}"))
            })?;
            FieldValue::Date(date)
        }
        FieldKind::Timestamp => {
            let raw = text()?;
            let timestamp = DateTime::parse_from_rfc3339(&raw).map_err(|err| {
                StoreError::InvalidData(format!("field `{name}` timestamp `{raw}`: {err}"))
            })?;
            FieldValue::Timestamp(timestamp.with_timezone(&Utc))
        }
        FieldKind::Bool => match integer()? {
            0 => FieldValue::Bool(false),
            1 => FieldValue::Bool(true),
            other => {
                return Err(StoreError::InvalidData(format!(
                    "field `{name}` has invalid bool value `{other}`"
                )));
            }
        },
        FieldKind::Blob => {
            let bytes = row.get::<_, Option<Vec<u8>>>(5)?.ok_or_else(|| {
                StoreError::InvalidData(format!("field `{name}` has no blob value"))
            })?;
            FieldValue::Blob(bytes)
        }
    };

    Ok(value)
}
