//! Financial error taxonomy.
//!
//! Flat enumeration with one human-readable message per case. Services store
//! the latest error in a published field and also return it to the caller.

use crate::model::invoice::InvoiceValidationError;
use crate::model::payment::PaymentValidationError;
use crate::schema::SchemaError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type FinancialResult<T> = Result<T, FinancialError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinancialError {
    /// Stored or submitted data does not decode or validate.
    InvalidData(String),
    /// Store could not be reached or failed mid-call.
    Network(String),
    Unauthorized,
    NotFound(String),
    InvalidAmount(String),
    DuplicateIdentifier(String),
    /// Payment gateway rejected or failed a charge.
    Gateway(String),
    BankingProvider(String),
}

impl FinancialError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidData(_) => "invalid_data",
            Self::Network(_) => "network",
            Self::Unauthorized => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::DuplicateIdentifier(_) => "duplicate_identifier",
            Self::Gateway(_) => "gateway",
            Self::BankingProvider(_) => "banking_provider",
        }
    }
}

impl Display for FinancialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidData(message) => write!(f, "The data is invalid: {message}"),
            Self::Network(message) => write!(f, "A network error occurred: {message}"),
            Self::Unauthorized => write!(f, "You are not authorized to perform this action"),
            Self::NotFound(what) => write!(f, "Not found: {what}"),
            Self::InvalidAmount(message) => write!(f, "Invalid amount: {message}"),
            Self::DuplicateIdentifier(id) => write!(f, "Duplicate identifier: {id}"),
            Self::Gateway(message) => write!(f, "Payment gateway error: {message}"),
            Self::BankingProvider(message) => write!(f, "Banking provider error: {message}"),
        }
    }
}

impl Error for FinancialError {}

impl From<StoreError> for FinancialError {
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

impl From<SchemaError> for FinancialError {
    fn from(value: SchemaError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

impl From<InvoiceValidationError> for FinancialError {
    fn from(value: InvoiceValidationError) -> Self {
        match value {
            InvoiceValidationError::NegativeAmount(_)
            | InvoiceValidationError::TotalMismatch { .. } => Self::InvalidAmount(value.to_string()),
            other => Self::InvalidData(other.to_string()),
        }
    }
}

impl From<PaymentValidationError> for FinancialError {
    fn from(value: PaymentValidationError) -> Self {
        match value {
            PaymentValidationError::EmptyCurrency | PaymentValidationError::NotRefundable(_) => {
                Self::InvalidData(value.to_string())
            }
            other => Self::InvalidAmount(other.to_string()),
        }
    }
}
