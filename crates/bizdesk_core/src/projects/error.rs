use crate::schema::SchemaError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    InvalidData(String),
    Network(String),
    Unauthorized,
    NotFound(String),
    DuplicateIdentifier(String),
    /// Target status is not one of the board's columns.
    InvalidColumn(String),
}

impl ProjectError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidData(_) => "invalid_data",
            Self::Network(_) => "network",
            Self::Unauthorized => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::DuplicateIdentifier(_) => "duplicate_identifier",
            Self::InvalidColumn(_) => "invalid_column",
        }
    }
}

impl Display for ProjectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidData(message) => write!(f, "The data is invalid: {message}"),
            Self::Network(message) => write!(f, "A network error occurred: {message}"),
            Self::Unauthorized => write!(f, "You are not authorized to perform this action"),
            Self::NotFound(what) => write!(f, "Not found: {what}"),
            Self::DuplicateIdentifier(id) => write!(f, "Duplicate identifier: {id}"),
            Self::InvalidColumn(message) => write!(f, "Invalid board column: {message}"),
        }
    }
}

impl Error for ProjectError {}

impl From<StoreError> for ProjectError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound {
                record_type,
                record_id,
            } => Self::NotFound(format!("{record_type} {record_id}")),
            StoreError::InvalidData(message) => Self::InvalidData(message),
            StoreError::Schema(err) => Self::InvalidData(err.to_string()),
            StoreError::Unauthorized(_) => Self::Unauthorized,
            StoreError::Db(err) => Self::Network(err.to_string()),
            StoreError::Unavailable(message) => Self::Network(message),
        }
    }
}

impl From<SchemaError> for ProjectError {
    fn from(value: SchemaError) -> Self {
        Self::InvalidData(value.to_string())
    }
}
