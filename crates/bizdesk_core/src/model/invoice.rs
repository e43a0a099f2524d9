//! Invoice domain model.
//!
//! # Responsibility
//! - Define the invoice record, its line items and tax breakdown.
//! - Derive monetary totals and payment-dependent amounts.
//!
//! # Invariants
//! - `total_amount = subtotal + tax_amount - discount_amount`.
//! - `remaining_amount = total_amount - total_paid`, where only completed
//!   payments referencing this invoice count. Not clamped at zero.
//! - All money is exact `Decimal`, never binary floating point.

use crate::model::payment::{PaymentRecord, PaymentStatus};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type InvoiceId = Uuid;
pub type ClientId = Uuid;

/// Invoice lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Viewed,
    PartiallyPaid,
    Paid,
    Overdue,
    Cancelled,
    Refunded,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 8] = [
        Self::Draft,
        Self::Sent,
        Self::Viewed,
        Self::PartiallyPaid,
        Self::Paid,
        Self::Overdue,
        Self::Cancelled,
        Self::Refunded,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Viewed => "viewed",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "viewed" => Some(Self::Viewed),
            "partially_paid" => Some(Self::PartiallyPaid),
            "paid" => Some(Self::Paid),
            "overdue" => Some(Self::Overdue),
            "cancelled" => Some(Self::Cancelled),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }

    /// Whether money is still expected for an invoice in this state.
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Paid | Self::Cancelled | Self::Refunded)
    }
}

impl Display for InvoiceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One billable row on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Uuid,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Fraction, e.g. `0.20` for 20%.
    pub tax_rate: Decimal,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            quantity,
            unit_price,
            tax_rate,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    pub fn tax_amount(&self) -> Decimal {
        (self.line_total() * self.tax_rate).round_dp(2)
    }
}

/// Tax breakdown entry, one per distinct rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxDetail {
    pub name: String,
    pub rate: Decimal,
    pub taxable_amount: Decimal,
    pub amount: Decimal,
}

/// Validation errors for invoice records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceValidationError {
    EmptyInvoiceNumber,
    EmptyCurrency,
    DueBeforeIssue {
        issue_date: NaiveDate,
        due_date: NaiveDate,
    },
    NegativeAmount(&'static str),
    TotalMismatch {
        expected: Decimal,
        actual: Decimal,
    },
}

impl Display for InvoiceValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInvoiceNumber => write!(f, "invoice number must not be blank"),
            Self::EmptyCurrency => write!(f, "invoice currency must not be blank"),
            Self::DueBeforeIssue {
                issue_date,
                due_date,
            } => write!(f, "due date {due_date} is before issue date {issue_date}"),
            Self::NegativeAmount(field) => write!(f, "invoice {field} must not be negative"),
            Self::TotalMismatch { expected, actual } => write!(
                f,
                "invoice total {actual} does not match subtotal + tax - discount = {expected}"
            ),
        }
    }
}

impl Error for InvoiceValidationError {}

/// Canonical invoice record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub client_id: ClientId,
    pub client_name: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub line_items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    pub notes: Option<String>,
    pub payment_terms: Option<String>,
    /// Snapshot of payments referencing this invoice as of the last save.
    pub payment_history: Vec<PaymentRecord>,
    pub tax_details: Vec<TaxDetail>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a draft invoice with a generated identity and zero totals.
    pub fn new(
        invoice_number: impl Into<String>,
        client_id: ClientId,
        client_name: impl Into<String>,
        issue_date: NaiveDate,
        due_date: NaiveDate,
        currency: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            invoice_number: invoice_number.into(),
            client_id,
            client_name: client_name.into(),
            issue_date,
            due_date,
            status: InvoiceStatus::Draft,
            line_items: Vec::new(),
            subtotal: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            currency: currency.into(),
            notes: None,
            payment_terms: None,
            payment_history: Vec::new(),
            tax_details: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_line_item(&mut self, item: LineItem) {
        self.line_items.push(item);
        self.recalculate_totals();
    }

    /// Re-derives subtotal, tax breakdown and total from line items.
    pub fn recalculate_totals(&mut self) {
        let mut by_rate: BTreeMap<Decimal, (Decimal, Decimal)> = BTreeMap::new();
        let mut subtotal = Decimal::ZERO;
        let mut tax = Decimal::ZERO;

        for item in &self.line_items {
            let line_total = item.line_total();
            let line_tax = item.tax_amount();
            subtotal += line_total;
            tax += line_tax;
            if !item.tax_rate.is_zero() {
                let entry = by_rate
                    .entry(item.tax_rate.normalize())
                    .or_insert((Decimal::ZERO, Decimal::ZERO));
                entry.0 += line_total;
                entry.1 += line_tax;
            }
        }

        self.tax_details = by_rate
            .into_iter()
            .map(|(rate, (taxable_amount, amount))| TaxDetail {
                name: format!("Tax {}%", (rate * Decimal::ONE_HUNDRED).normalize()),
                rate,
                taxable_amount,
                amount,
            })
            .collect();
        self.subtotal = subtotal;
        self.tax_amount = tax;
        self.total_amount = subtotal + tax - self.discount_amount;
    }

    /// Sum of completed payments that reference this invoice.
    pub fn total_paid(&self, payments: &[PaymentRecord]) -> Decimal {
        payments
            .iter()
            .filter(|payment| payment.invoice_id == self.id)
            .filter(|payment| payment.status == PaymentStatus::Completed)
            .map(|payment| payment.amount)
            .sum()
    }

    /// `total_amount - total_paid`; negative on overpayment.
    pub fn remaining_amount(&self, payments: &[PaymentRecord]) -> Decimal {
        self.total_amount - self.total_paid(payments)
    }

    /// Date of the latest completed payment for this invoice.
    pub fn last_payment_date(&self, payments: &[PaymentRecord]) -> Option<NaiveDate> {
        payments
            .iter()
            .filter(|payment| payment.invoice_id == self.id)
            .filter(|payment| payment.status == PaymentStatus::Completed)
            .map(|payment| payment.payment_date.date_naive())
            .max()
    }

    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.due_date < today && self.status.is_open()
    }

    /// Checks identity, date and amount invariants.
    pub fn validate(&self) -> Result<(), InvoiceValidationError> {
        if self.invoice_number.trim().is_empty() {
            return Err(InvoiceValidationError::EmptyInvoiceNumber);
        }
        if self.currency.trim().is_empty() {
            return Err(InvoiceValidationError::EmptyCurrency);
        }
        if self.due_date < self.issue_date {
            return Err(InvoiceValidationError::DueBeforeIssue {
                issue_date: self.issue_date,
                due_date: self.due_date,
            });
        }
        for (field, value) in [
            ("subtotal", self.subtotal),
            ("tax amount", self.tax_amount),
            ("discount amount", self.discount_amount),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(InvoiceValidationError::NegativeAmount(field));
            }
        }

        let expected = self.subtotal + self.tax_amount - self.discount_amount;
        if expected != self.total_amount {
            return Err(InvoiceValidationError::TotalMismatch {
                expected,
                actual: self.total_amount,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Invoice, InvoiceStatus, InvoiceValidationError, LineItem};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Invoice {
        Invoice::new(
            "INV-202601-0001",
            Uuid::new_v4(),
            "Acme",
            date(2026, 1, 1),
            date(2026, 1, 31),
            "USD",
        )
    }

    #[test]
    fn recalculate_totals_groups_tax_by_rate() {
        let mut invoice = sample();
        invoice.add_line_item(LineItem::new(
            "design",
            Decimal::new(2, 0),
            Decimal::new(10000, 2),
            Decimal::new(20, 2),
        ));
        invoice.add_line_item(LineItem::new(
            "hosting",
            Decimal::ONE,
            Decimal::new(5000, 2),
            Decimal::new(20, 2),
        ));
        invoice.discount_amount = Decimal::new(1000, 2);
        invoice.recalculate_totals();

        assert_eq!(invoice.subtotal, Decimal::new(25000, 2));
        assert_eq!(invoice.tax_amount, Decimal::new(5000, 2));
        assert_eq!(invoice.total_amount, Decimal::new(29000, 2));
        assert_eq!(invoice.tax_details.len(), 1);
        assert_eq!(invoice.tax_details[0].name, "Tax 20%");
        invoice.validate().unwrap();
    }

    #[test]
    fn past_due_only_while_open() {
        let mut invoice = sample();
        invoice.status = InvoiceStatus::Sent;
        assert!(!invoice.is_past_due(date(2026, 1, 31)));
        assert!(invoice.is_past_due(date(2026, 2, 1)));
        invoice.status = InvoiceStatus::Paid;
        assert!(!invoice.is_past_due(date(2026, 2, 1)));
    }

    #[test]
    fn validate_rejects_total_mismatch() {
        let mut invoice = sample();
        invoice.subtotal = Decimal::new(100, 0);
        invoice.total_amount = Decimal::new(90, 0);
        assert!(matches!(
            invoice.validate(),
            Err(InvoiceValidationError::TotalMismatch { .. })
        ));
    }

    #[test]
    fn status_strings_roundtrip() {
        for status in InvoiceStatus::ALL {
            assert_eq!(InvoiceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(InvoiceStatus::parse("settled"), None);
    }
}
