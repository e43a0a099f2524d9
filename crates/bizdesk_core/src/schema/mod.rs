//! Versioned schema mapping between domain records and store documents.
//!
//! # Responsibility
//! - Encode each entity into a `Record` field by field.
//! - Decode records back into entities, failing loudly on malformed data.
//!
//! # Invariants
//! - Each entity type owns exactly one record type name.
//! - Decoding a record newer than the mapper's `SCHEMA_VERSION` fails.

mod financial;
mod project;
pub mod record;
mod reporting;

pub use record::{FieldKind, FieldValue, Record, SchemaError, SchemaResult, SCHEMA_VERSION_FIELD};

/// Field-by-field mapping of one entity type to its store record.
pub trait RecordMapper: Sized {
    /// Record type name in the document store.
    const RECORD_TYPE: &'static str;
    /// Version written into every encoded record.
    const SCHEMA_VERSION: i64;

    fn record_id(&self) -> String;
    fn to_record(&self) -> SchemaResult<Record>;
    fn from_record(record: &Record) -> SchemaResult<Self>;
}

/// Decodes a batch of records, failing on the first malformed one.
pub fn decode_all<M: RecordMapper>(records: &[Record]) -> SchemaResult<Vec<M>> {
    records.iter().map(M::from_record).collect()
}
