//! Document store contracts.
//!
//! # Responsibility
//! - Define the key/value document store that services persist through.
//! - Bridge typed entities and raw records via `RecordMapper`.
//!
//! # Invariants
//! - `save` is an upsert that replaces every field of the record.
//! - `delete` of an unknown record reports `NotFound`.
//! - Implementations are shareable across threads (`Send + Sync`).

mod sqlite;

pub use sqlite::SqliteDocumentStore;

use crate::db::DbError;
use crate::schema::{Record, RecordMapper, SchemaError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    NotFound {
        record_type: String,
        record_id: String,
    },
    /// Persisted row cannot be turned back into a `Record`.
    InvalidData(String),
    /// Record exists but does not decode into the requested entity.
    Schema(SchemaError),
    /// Store could not be reached.
    Unavailable(String),
    /// Store refused the caller's credentials. Never raised by the SQLite
    /// store; remote implementations report access failures through it.
    Unauthorized(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound {
                record_type,
                record_id,
            } => write!(f, "{record_type} record not found: {record_id}"),
            Self::InvalidData(message) => write!(f, "invalid stored record data: {message}"),
            Self::Schema(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
            Self::Unauthorized(message) => write!(f, "store access denied: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Schema(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<SchemaError> for StoreError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

/// Remote document store seen by services.
pub trait DocumentStore: Send + Sync {
    /// Returns every record of one type, most recently modified first.
    fn fetch_all(&self, record_type: &str) -> StoreResult<Vec<Record>>;
    fn fetch(&self, record_type: &str, record_id: &str) -> StoreResult<Option<Record>>;
    /// Upserts the record, replacing all of its fields.
    fn save(&self, record: &Record) -> StoreResult<()>;
    fn delete(&self, record_type: &str, record_id: &str) -> StoreResult<()>;
}

/// Fetches and decodes every entity of type `M`.
pub fn load_entities<M: RecordMapper>(store: &dyn DocumentStore) -> StoreResult<Vec<M>> {
    let records = store.fetch_all(M::RECORD_TYPE)?;
    records
        .iter()
        .map(|record| M::from_record(record).map_err(StoreError::from))
        .collect()
}

pub fn load_entity<M: RecordMapper>(
    store: &dyn DocumentStore,
    record_id: &str,
) -> StoreResult<Option<M>> {
    match store.fetch(M::RECORD_TYPE, record_id)? {
        Some(record) => Ok(Some(M::from_record(&record)?)),
        None => Ok(None),
    }
}

pub fn save_entity<M: RecordMapper>(store: &dyn DocumentStore, entity: &M) -> StoreResult<()> {
    let record = entity.to_record()?;
    store.save(&record)
}

pub fn delete_entity<M: RecordMapper>(store: &dyn DocumentStore, record_id: &str) -> StoreResult<()> {
    store.delete(M::RECORD_TYPE, record_id)
}
