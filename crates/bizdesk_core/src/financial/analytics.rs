//! Financial analytics roll-ups.
//!
//! Pure function of the in-memory collections; each metric rescans the full
//! collection. Money stays in `Decimal` throughout.

use crate::model::invoice::{Invoice, InvoiceStatus};
use crate::model::payment::{PaymentMethod, PaymentRecord};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FinancialAnalytics {
    /// Sum of totals over `Paid` invoices.
    pub total_revenue: Decimal,
    /// Sum of remaining amounts over invoices neither paid nor cancelled.
    pub outstanding_amount: Decimal,
    /// Sum of remaining amounts over `Overdue` invoices.
    pub overdue_amount: Decimal,
    pub invoice_count: usize,
    pub paid_count: usize,
    pub overdue_count: usize,
    pub status_counts: BTreeMap<InvoiceStatus, usize>,
    pub average_invoice_amount: Decimal,
    /// Days from issue to last completed payment, over paid invoices.
    pub average_days_to_payment: Option<Decimal>,
    /// `YYYY-MM` of issue date → revenue from paid invoices.
    pub revenue_by_month: BTreeMap<String, Decimal>,
    pub revenue_by_client: BTreeMap<String, Decimal>,
    pub payment_method_counts: BTreeMap<PaymentMethod, usize>,
    /// Revenue as a percentage of invoiced (non-cancelled) totals.
    pub collection_rate: Option<Decimal>,
}

pub fn compute_analytics(invoices: &[Invoice], payments: &[PaymentRecord]) -> FinancialAnalytics {
    let paid: Vec<&Invoice> = invoices
        .iter()
        .filter(|invoice| invoice.status == InvoiceStatus::Paid)
        .collect();

    let total_revenue: Decimal = paid.iter().map(|invoice| invoice.total_amount).sum();

    let outstanding_amount: Decimal = invoices
        .iter()
        .filter(|invoice| {
            !matches!(invoice.status, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
        })
        .map(|invoice| invoice.remaining_amount(payments))
        .sum();

    let overdue: Vec<&Invoice> = invoices
        .iter()
        .filter(|invoice| invoice.status == InvoiceStatus::Overdue)
        .collect();
    let overdue_amount: Decimal = overdue
        .iter()
        .map(|invoice| invoice.remaining_amount(payments))
        .sum();

    let mut status_counts = BTreeMap::new();
    for invoice in invoices {
        *status_counts.entry(invoice.status).or_insert(0) += 1;
    }

    let average_invoice_amount = average(
        invoices.iter().map(|invoice| invoice.total_amount).sum(),
        invoices.len(),
    )
    .unwrap_or(Decimal::ZERO);

    let payment_days: Vec<i64> = paid
        .iter()
        .filter_map(|invoice| {
            invoice
                .last_payment_date(payments)
                .map(|paid_on| (paid_on - invoice.issue_date).num_days())
        })
        .collect();
    let average_days_to_payment = average(
        payment_days.iter().copied().map(Decimal::from).sum(),
        payment_days.len(),
    );

    let mut revenue_by_month = BTreeMap::new();
    let mut revenue_by_client = BTreeMap::new();
    for invoice in &paid {
        *revenue_by_month
            .entry(invoice.issue_date.format("%Y-%m").to_string())
            .or_insert(Decimal::ZERO) += invoice.total_amount;
        *revenue_by_client
            .entry(invoice.client_name.clone())
            .or_insert(Decimal::ZERO) += invoice.total_amount;
    }

    let mut payment_method_counts = BTreeMap::new();
    for payment in payments {
        *payment_method_counts.entry(payment.method).or_insert(0) += 1;
    }

    let invoiced: Decimal = invoices
        .iter()
        .filter(|invoice| invoice.status != InvoiceStatus::Cancelled)
        .map(|invoice| invoice.total_amount)
        .sum();
    let collection_rate = if invoiced.is_zero() {
        None
    } else {
        Some((total_revenue / invoiced * Decimal::ONE_HUNDRED).round_dp(2))
    };

    FinancialAnalytics {
        total_revenue,
        outstanding_amount,
        overdue_amount,
        invoice_count: invoices.len(),
        paid_count: paid.len(),
        overdue_count: overdue.len(),
        status_counts,
        average_invoice_amount,
        average_days_to_payment,
        revenue_by_month,
        revenue_by_client,
        payment_method_counts,
        collection_rate,
    }
}

fn average(sum: Decimal, count: usize) -> Option<Decimal> {
    if count == 0 {
        return None;
    }
    Some((sum / Decimal::from(count)).round_dp(2))
}
