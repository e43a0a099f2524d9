//! Payment domain model.
//!
//! # Invariants
//! - Only `PaymentStatus::Completed` payments settle an invoice.
//! - Recorded refunds never exceed the payment amount.

use crate::model::invoice::InvoiceId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type PaymentId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    CreditCard,
    DebitCard,
    Check,
    Paypal,
    Stripe,
    Other,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Check => "check",
            Self::Paypal => "paypal",
            Self::Stripe => "stripe",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cash" => Some(Self::Cash),
            "bank_transfer" => Some(Self::BankTransfer),
            "credit_card" => Some(Self::CreditCard),
            "debit_card" => Some(Self::DebitCard),
            "check" => Some(Self::Check),
            "paypal" => Some(Self::Paypal),
            "stripe" => Some(Self::Stripe),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
    Refunded,
    PartiallyRefunded,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::PartiallyRefunded => "partially_refunded",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            "refunded" => Some(Self::Refunded),
            "partially_refunded" => Some(Self::PartiallyRefunded),
            _ => None,
        }
    }
}

/// Refund issued against one payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    pub id: Uuid,
    pub amount: Decimal,
    pub reason: Option<String>,
    pub refunded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentValidationError {
    NonPositiveAmount(Decimal),
    EmptyCurrency,
    InvalidFees(Decimal),
    RefundExceedsPayment {
        refundable: Decimal,
        requested: Decimal,
    },
    NotRefundable(PaymentStatus),
}

impl Display for PaymentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "payment amount must be positive, got {amount}")
            }
            Self::EmptyCurrency => write!(f, "payment currency must not be blank"),
            Self::InvalidFees(fees) => {
                write!(f, "payment fees {fees} must be between zero and the amount")
            }
            Self::RefundExceedsPayment {
                refundable,
                requested,
            } => write!(
                f,
                "refund {requested} exceeds refundable amount {refundable}"
            ),
            Self::NotRefundable(status) => {
                write!(f, "payment in status `{}` cannot be refunded", status.as_str())
            }
        }
    }
}

impl Error for PaymentValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub invoice_id: InvoiceId,
    pub amount: Decimal,
    pub currency: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub payment_date: DateTime<Utc>,
    pub reference: Option<String>,
    pub fees: Option<Decimal>,
    pub refunds: Vec<Refund>,
    pub notes: Option<String>,
}

impl PaymentRecord {
    /// Creates a pending payment with a generated identity.
    pub fn new(
        invoice_id: InvoiceId,
        amount: Decimal,
        currency: impl Into<String>,
        method: PaymentMethod,
        payment_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            invoice_id,
            amount,
            currency: currency.into(),
            method,
            status: PaymentStatus::Pending,
            payment_date,
            reference: None,
            fees: None,
            refunds: Vec::new(),
            notes: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }

    /// Amount received after processor fees.
    pub fn net_amount(&self) -> Decimal {
        self.amount - self.fees.unwrap_or(Decimal::ZERO)
    }

    pub fn refunded_amount(&self) -> Decimal {
        self.refunds.iter().map(|refund| refund.amount).sum()
    }

    pub fn validate(&self) -> Result<(), PaymentValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(PaymentValidationError::NonPositiveAmount(self.amount));
        }
        if self.currency.trim().is_empty() {
            return Err(PaymentValidationError::EmptyCurrency);
        }
        if let Some(fees) = self.fees {
            if fees < Decimal::ZERO || fees > self.amount {
                return Err(PaymentValidationError::InvalidFees(fees));
            }
        }
        Ok(())
    }

    /// Records a refund and moves status to `Refunded` or
    /// `PartiallyRefunded` depending on the cumulative refunded amount.
    pub fn apply_refund(&mut self, refund: Refund) -> Result<(), PaymentValidationError> {
        if !matches!(
            self.status,
            PaymentStatus::Completed | PaymentStatus::PartiallyRefunded
        ) {
            return Err(PaymentValidationError::NotRefundable(self.status));
        }
        if refund.amount <= Decimal::ZERO {
            return Err(PaymentValidationError::NonPositiveAmount(refund.amount));
        }

        let refundable = self.amount - self.refunded_amount();
        if refund.amount > refundable {
            return Err(PaymentValidationError::RefundExceedsPayment {
                refundable,
                requested: refund.amount,
            });
        }

        self.refunds.push(refund);
        self.status = if self.refunded_amount() == self.amount {
            PaymentStatus::Refunded
        } else {
            PaymentStatus::PartiallyRefunded
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{PaymentMethod, PaymentRecord, PaymentStatus, PaymentValidationError, Refund};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn completed(amount: i64) -> PaymentRecord {
        let mut payment = PaymentRecord::new(
            Uuid::new_v4(),
            Decimal::new(amount, 0),
            "USD",
            PaymentMethod::CreditCard,
            Utc::now(),
        );
        payment.status = PaymentStatus::Completed;
        payment
    }

    fn refund(amount: i64) -> Refund {
        Refund {
            id: Uuid::new_v4(),
            amount: Decimal::new(amount, 0),
            reason: None,
            refunded_at: Utc::now(),
        }
    }

    #[test]
    fn partial_then_full_refund_moves_status() {
        let mut payment = completed(100);
        payment.apply_refund(refund(40)).unwrap();
        assert_eq!(payment.status, PaymentStatus::PartiallyRefunded);
        payment.apply_refund(refund(60)).unwrap();
        assert_eq!(payment.status, PaymentStatus::Refunded);
        assert_eq!(payment.refunded_amount(), Decimal::new(100, 0));
    }

    #[test]
    fn refund_above_remaining_is_rejected() {
        let mut payment = completed(100);
        payment.apply_refund(refund(70)).unwrap();
        let err = payment.apply_refund(refund(31)).unwrap_err();
        assert!(matches!(
            err,
            PaymentValidationError::RefundExceedsPayment { .. }
        ));
    }

    #[test]
    fn net_amount_subtracts_fees() {
        let mut payment = completed(100);
        payment.fees = Some(Decimal::new(290, 2));
        assert_eq!(payment.net_amount(), Decimal::new(9710, 2));
        payment.validate().unwrap();
    }
}
