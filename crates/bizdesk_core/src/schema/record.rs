//! Typed document record shared by the store and the entity mappers.
//!
//! # Invariants
//! - Every getter either returns the typed value or a `SchemaError`;
//!   a missing or mistyped field is never replaced by a default.
//! - Nested structures travel as JSON blobs in a single field.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Field that carries the mapper version that wrote the record.
pub const SCHEMA_VERSION_FIELD: &str = "schema_version";

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Date,
    Timestamp,
    Bool,
    Blob,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
            Self::Bool => "bool",
            Self::Blob => "blob",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "integer" => Some(Self::Integer),
            "decimal" => Some(Self::Decimal),
            "date" => Some(Self::Date),
            "timestamp" => Some(Self::Timestamp),
            "bool" => Some(Self::Bool),
            "blob" => Some(Self::Blob),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Bool(bool),
    Blob(Vec<u8>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Integer(_) => FieldKind::Integer,
            Self::Decimal(_) => FieldKind::Decimal,
            Self::Date(_) => FieldKind::Date,
            Self::Timestamp(_) => FieldKind::Timestamp,
            Self::Bool(_) => FieldKind::Bool,
            Self::Blob(_) => FieldKind::Blob,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        Self::Text(value.to_string())
    }
}

/// Encode/decode failure between an entity and its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    RecordTypeMismatch {
        expected: &'static str,
        actual: String,
    },
    MissingField(String),
    WrongFieldType {
        field: String,
        expected: FieldKind,
        actual: FieldKind,
    },
    InvalidValue {
        field: String,
        message: String,
    },
    UnsupportedSchemaVersion {
        record_type: String,
        version: i64,
        latest_supported: i64,
    },
    Encode {
        field: String,
        message: String,
    },
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecordTypeMismatch { expected, actual } => {
                write!(f, "expected record type `{expected}`, got `{actual}`")
            }
            Self::MissingField(field) => write!(f, "missing record field `{field}`"),
            Self::WrongFieldType {
                field,
                expected,
                actual,
            } => write!(
                f,
                "record field `{field}` has type {}, expected {}",
                actual.as_str(),
                expected.as_str()
            ),
            Self::InvalidValue { field, message } => {
                write!(f, "invalid value in record field `{field}`: {message}")
            }
            Self::UnsupportedSchemaVersion {
                record_type,
                version,
                latest_supported,
            } => write!(
                f,
                "{record_type} record schema version {version} is newer than supported {latest_supported}"
            ),
            Self::Encode { field, message } => {
                write!(f, "failed to encode record field `{field}`: {message}")
            }
        }
    }
}

impl Error for SchemaError {}

/// One document in the store: a typed key/value bag under a stable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub record_type: String,
    pub record_id: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(record_type: impl Into<String>, record_id: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            record_id: record_id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Creates a record stamped with the writer's schema version.
    pub fn versioned(
        record_type: impl Into<String>,
        record_id: impl Into<String>,
        version: i64,
    ) -> Self {
        let mut record = Self::new(record_type, record_id);
        record.set(SCHEMA_VERSION_FIELD, version);
        record
    }

    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.fields.insert(name.to_string(), value.into());
    }

    /// Sets the field when `value` is present; absent values leave no field.
    pub fn set_opt<V: Into<FieldValue>>(&mut self, name: &str, value: Option<V>) {
        match value {
            Some(value) => self.set(name, value),
            None => {
                self.fields.remove(name);
            }
        }
    }

    /// JSON-encodes a nested structure into a blob field.
    pub fn set_blob<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> SchemaResult<()> {
        let bytes = serde_json::to_vec(value).map_err(|err| SchemaError::Encode {
            field: name.to_string(),
            message: err.to_string(),
        })?;
        self.fields.insert(name.to_string(), FieldValue::Blob(bytes));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    fn required(&self, name: &str) -> SchemaResult<&FieldValue> {
        self.fields
            .get(name)
            .ok_or_else(|| SchemaError::MissingField(name.to_string()))
    }

    pub fn expect_type(&self, expected: &'static str) -> SchemaResult<()> {
        if self.record_type != expected {
            return Err(SchemaError::RecordTypeMismatch {
                expected,
                actual: self.record_type.clone(),
            });
        }
        Ok(())
    }

    /// Rejects records written by a newer mapper than `latest_supported`.
    pub fn check_schema_version(&self, latest_supported: i64) -> SchemaResult<i64> {
        let version = self.integer(SCHEMA_VERSION_FIELD)?;
        if version > latest_supported || version < 1 {
            return Err(SchemaError::UnsupportedSchemaVersion {
                record_type: self.record_type.clone(),
                version,
                latest_supported,
            });
        }
        Ok(version)
    }

    pub fn text(&self, name: &str) -> SchemaResult<&str> {
        match self.required(name)? {
            FieldValue::Text(value) => Ok(value.as_str()),
            other => Err(wrong_type(name, FieldKind::Text, other)),
        }
    }

    pub fn opt_text(&self, name: &str) -> SchemaResult<Option<String>> {
        if self.get(name).is_none() {
            return Ok(None);
        }
        self.text(name).map(|value| Some(value.to_string()))
    }

    pub fn integer(&self, name: &str) -> SchemaResult<i64> {
        match self.required(name)? {
            FieldValue::Integer(value) => Ok(*value),
            other => Err(wrong_type(name, FieldKind::Integer, other)),
        }
    }

    pub fn decimal(&self, name: &str) -> SchemaResult<Decimal> {
        match self.required(name)? {
            FieldValue::Decimal(value) => Ok(*value),
            other => Err(wrong_type(name, FieldKind::Decimal, other)),
        }
    }

    pub fn opt_decimal(&self, name: &str) -> SchemaResult<Option<Decimal>> {
        if self.get(name).is_none() {
            return Ok(None);
        }
        self.decimal(name).map(Some)
    }

    pub fn date(&self, name: &str) -> SchemaResult<NaiveDate> {
        match self.required(name)? {
            FieldValue::Date(value) => Ok(*value),
            other => Err(wrong_type(name, FieldKind::Date, other)),
        }
    }

    pub fn opt_date(&self, name: &str) -> SchemaResult<Option<NaiveDate>> {
        if self.get(name).is_none() {
            return Ok(None);
        }
        self.date(name).map(Some)
    }

    pub fn timestamp(&self, name: &str) -> SchemaResult<DateTime<Utc>> {
        match self.required(name)? {
            FieldValue::Timestamp(value) => Ok(*value),
            other => Err(wrong_type(name, FieldKind::Timestamp, other)),
        }
    }

    pub fn opt_timestamp(&self, name: &str) -> SchemaResult<Option<DateTime<Utc>>> {
        if self.get(name).is_none() {
            return Ok(None);
        }
        self.timestamp(name).map(Some)
    }

    pub fn boolean(&self, name: &str) -> SchemaResult<bool> {
        match self.required(name)? {
            FieldValue::Bool(value) => Ok(*value),
            other => Err(wrong_type(name, FieldKind::Bool, other)),
        }
    }

    pub fn uuid(&self, name: &str) -> SchemaResult<Uuid> {
        let text = self.text(name)?;
        Uuid::parse_str(text).map_err(|_| invalid(name, format!("`{text}` is not a uuid")))
    }

    pub fn opt_uuid(&self, name: &str) -> SchemaResult<Option<Uuid>> {
        if self.get(name).is_none() {
            return Ok(None);
        }
        self.uuid(name).map(Some)
    }

    /// Parses the record id as the entity's UUID identity.
    pub fn id_uuid(&self) -> SchemaResult<Uuid> {
        Uuid::parse_str(&self.record_id).map_err(|_| {
            invalid(
                "record_id",
                format!("`{}` is not a uuid", self.record_id),
            )
        })
    }

    /// Decodes a text field through an enum parser.
    pub fn enumeration<T>(&self, name: &str, parse: fn(&str) -> Option<T>) -> SchemaResult<T> {
        let text = self.text(name)?;
        parse(text).ok_or_else(|| invalid(name, format!("unknown variant `{text}`")))
    }

    pub fn blob<T: DeserializeOwned>(&self, name: &str) -> SchemaResult<T> {
        match self.required(name)? {
            FieldValue::Blob(bytes) => {
                serde_json::from_slice(bytes).map_err(|err| invalid(name, err.to_string()))
            }
            other => Err(wrong_type(name, FieldKind::Blob, other)),
        }
    }

    pub fn opt_blob<T: DeserializeOwned>(&self, name: &str) -> SchemaResult<Option<T>> {
        if self.get(name).is_none() {
            return Ok(None);
        }
        self.blob(name).map(Some)
    }
}

fn wrong_type(name: &str, expected: FieldKind, actual: &FieldValue) -> SchemaError {
    SchemaError::WrongFieldType {
        field: name.to_string(),
        expected,
        actual: actual.kind(),
    }
}

fn invalid(name: &str, message: String) -> SchemaError {
    SchemaError::InvalidValue {
        field: name.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldKind, Record, SchemaError};
    use rust_decimal::Decimal;

    #[test]
    fn getters_reject_missing_and_mistyped_fields() {
        let mut record = Record::versioned("Invoice", "id-1", 1);
        record.set("total_amount", "12.50");

        assert_eq!(
            record.decimal("subtotal"),
            Err(SchemaError::MissingField("subtotal".to_string()))
        );
        assert!(matches!(
            record.decimal("total_amount"),
            Err(SchemaError::WrongFieldType {
                expected: FieldKind::Decimal,
                actual: FieldKind::Text,
                ..
            })
        ));
    }

    #[test]
    fn optional_getters_only_default_on_absence() {
        let mut record = Record::versioned("Payment", "id-2", 1);
        record.set_opt::<Decimal>("fees", None);
        assert_eq!(record.opt_decimal("fees"), Ok(None));

        record.set("fees", true);
        assert!(record.opt_decimal("fees").is_err());
    }

    #[test]
    fn newer_schema_version_is_rejected() {
        let record = Record::versioned("Invoice", "id-3", 9);
        assert!(matches!(
            record.check_schema_version(1),
            Err(SchemaError::UnsupportedSchemaVersion { version: 9, .. })
        ));
    }

    #[test]
    fn blob_roundtrips_nested_values() {
        let mut record = Record::versioned("Report", "id-4", 1);
        record.set_blob("tags", &vec!["a", "b"]).unwrap();
        let tags: Vec<String> = record.blob("tags").unwrap();
        assert_eq!(tags, vec!["a".to_string(), "b".to_string()]);
    }
}
