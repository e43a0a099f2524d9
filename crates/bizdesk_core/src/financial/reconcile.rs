//! Invoice/payment reconciliation rule.
//!
//! # Invariants
//! - Only completed payments count toward `total_paid`; refunds recorded on
//!   a payment are not netted here.
//! - `Paid` when `total_paid >= total`, including zero-total invoices.
//! - `PartiallyPaid` when `0 < total_paid < total`, unless cancelled.
//! - `Overdue` when nothing is paid, the due date has passed, and the
//!   invoice is neither paid nor cancelled.
//! - Any other case keeps the stored status.

use crate::model::invoice::{Invoice, InvoiceId, InvoiceStatus};
use crate::model::payment::PaymentRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Outcome of reconciling one invoice against its payments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub invoice_id: InvoiceId,
    pub total_paid: Decimal,
    /// Not clamped: negative when the invoice is overpaid.
    pub remaining_amount: Decimal,
    pub previous_status: InvoiceStatus,
    pub status: InvoiceStatus,
}

impl Reconciliation {
    pub fn changed(&self) -> bool {
        self.previous_status != self.status
    }

    pub fn is_overpaid(&self) -> bool {
        self.remaining_amount < Decimal::ZERO
    }

    /// Remaining amount for display: zero once the invoice is settled.
    pub fn display_remaining(&self) -> Decimal {
        self.remaining_amount.max(Decimal::ZERO)
    }
}

pub fn derive_status(invoice: &Invoice, total_paid: Decimal, today: NaiveDate) -> InvoiceStatus {
    let total = invoice.total_amount;

    if total_paid >= total {
        return InvoiceStatus::Paid;
    }
    if total_paid > Decimal::ZERO && total_paid < total {
        if invoice.status == InvoiceStatus::Cancelled {
            return invoice.status;
        }
        return InvoiceStatus::PartiallyPaid;
    }
    if total_paid.is_zero()
        && invoice.due_date < today
        && !matches!(invoice.status, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
    {
        return InvoiceStatus::Overdue;
    }

    invoice.status
}

pub fn reconcile(invoice: &Invoice, payments: &[PaymentRecord], today: NaiveDate) -> Reconciliation {
    let total_paid = invoice.total_paid(payments);
    Reconciliation {
        invoice_id: invoice.id,
        total_paid,
        remaining_amount: invoice.total_amount - total_paid,
        previous_status: invoice.status,
        status: derive_status(invoice, total_paid, today),
    }
}

#[cfg(test)]
mod tests {
    use super::{derive_status, reconcile};
    use crate::model::invoice::{Invoice, InvoiceStatus};
    use crate::model::payment::{PaymentMethod, PaymentRecord, PaymentStatus};
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn invoice(total: i64, status: InvoiceStatus) -> Invoice {
        let mut invoice = Invoice::new(
            "INV-1",
            Uuid::new_v4(),
            "Acme",
            date(2026, 3, 1),
            date(2026, 3, 31),
            "USD",
        );
        invoice.subtotal = Decimal::new(total, 0);
        invoice.total_amount = Decimal::new(total, 0);
        invoice.status = status;
        invoice
    }

    fn payment(invoice: &Invoice, amount: i64, status: PaymentStatus) -> PaymentRecord {
        let mut payment = PaymentRecord::new(
            invoice.id,
            Decimal::new(amount, 0),
            "USD",
            PaymentMethod::BankTransfer,
            Utc::now(),
        );
        payment.status = status;
        payment
    }

    #[test]
    fn non_completed_payments_are_ignored() {
        let inv = invoice(1000, InvoiceStatus::Sent);
        let payments = vec![
            payment(&inv, 400, PaymentStatus::Pending),
            payment(&inv, 600, PaymentStatus::Failed),
            payment(&inv, 100, PaymentStatus::Refunded),
        ];
        let result = reconcile(&inv, &payments, date(2026, 3, 10));
        assert_eq!(result.total_paid, Decimal::ZERO);
        assert_eq!(result.status, InvoiceStatus::Sent);
        assert!(!result.changed());
    }

    #[test]
    fn payments_for_other_invoices_are_ignored() {
        let inv = invoice(1000, InvoiceStatus::Sent);
        let other = invoice(1000, InvoiceStatus::Sent);
        let payments = vec![payment(&other, 1000, PaymentStatus::Completed)];
        assert_eq!(
            reconcile(&inv, &payments, date(2026, 3, 10)).status,
            InvoiceStatus::Sent
        );
    }

    #[test]
    fn cancelled_invoice_is_not_moved_to_partially_paid() {
        let inv = invoice(1000, InvoiceStatus::Cancelled);
        assert_eq!(
            derive_status(&inv, Decimal::new(10, 0), date(2026, 3, 10)),
            InvoiceStatus::Cancelled
        );
    }

    #[test]
    fn overdue_requires_no_payment_and_past_due_date() {
        let inv = invoice(1000, InvoiceStatus::Sent);
        assert_eq!(
            derive_status(&inv, Decimal::ZERO, date(2026, 3, 31)),
            InvoiceStatus::Sent
        );
        assert_eq!(
            derive_status(&inv, Decimal::ZERO, date(2026, 4, 1)),
            InvoiceStatus::Overdue
        );
        let cancelled = invoice(1000, InvoiceStatus::Cancelled);
        assert_eq!(
            derive_status(&cancelled, Decimal::ZERO, date(2026, 4, 1)),
            InvoiceStatus::Cancelled
        );
    }

    #[test]
    fn overpayment_is_flagged_not_clamped() {
        let inv = invoice(100, InvoiceStatus::Sent);
        let payments = vec![payment(&inv, 150, PaymentStatus::Completed)];
        let result = reconcile(&inv, &payments, date(2026, 3, 10));
        assert_eq!(result.status, InvoiceStatus::Paid);
        assert_eq!(result.remaining_amount, Decimal::new(-50, 0));
        assert!(result.is_overpaid());
        assert_eq!(result.display_remaining(), Decimal::ZERO);
    }

    #[test]
    fn zero_total_invoice_is_paid() {
        let inv = invoice(0, InvoiceStatus::Sent);
        let result = reconcile(&inv, &[], date(2026, 4, 15));
        assert_eq!(result.total_paid, Decimal::ZERO);
        assert_eq!(result.status, InvoiceStatus::Paid);
        assert!(result.changed());
        assert!(!result.is_overpaid());
    }
}
