use bizdesk_core::{
    compute_analytics, Invoice, InvoiceStatus, LineItem, PaymentMethod, PaymentRecord,
    PaymentStatus,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn invoice(client: &str, issue: NaiveDate, total: Decimal, status: InvoiceStatus) -> Invoice {
    let mut invoice = Invoice::new(
        format!("INV-{}", Uuid::new_v4().simple()),
        Uuid::new_v4(),
        client,
        issue,
        issue + chrono::Duration::days(30),
        "USD",
    );
    invoice.add_line_item(LineItem::new("Work", dec!(1), total, dec!(0)));
    invoice.status = status;
    invoice
}

fn payment(
    invoice: &Invoice,
    amount: Decimal,
    paid_on: NaiveDate,
    method: PaymentMethod,
    status: PaymentStatus,
) -> PaymentRecord {
    let mut payment = PaymentRecord::new(
        invoice.id,
        amount,
        "USD",
        method,
        Utc.from_utc_datetime(&paid_on.and_hms_opt(12, 0, 0).unwrap()),
    );
    payment.status = status;
    payment
}

/// Invoices in five statuses (draft, sent, partially paid, paid, overdue)
/// plus one cancelled invoice that must never count as revenue.
fn fixture() -> (Vec<Invoice>, Vec<PaymentRecord>) {
    let draft = invoice("Acme", date(2026, 1, 3), dec!(100.00), InvoiceStatus::Draft);
    let sent = invoice("Globex", date(2026, 1, 10), dec!(250.50), InvoiceStatus::Sent);
    let partial = invoice("Acme", date(2026, 2, 1), dec!(400.00), InvoiceStatus::PartiallyPaid);
    let paid_jan = invoice("Initech", date(2026, 1, 5), dec!(1000.00), InvoiceStatus::Paid);
    let paid_feb = invoice("Acme", date(2026, 2, 10), dec!(300.25), InvoiceStatus::Paid);
    let overdue = invoice("Globex", date(2025, 12, 1), dec!(75.00), InvoiceStatus::Overdue);
    let cancelled = invoice("Hooli", date(2026, 1, 20), dec!(999.00), InvoiceStatus::Cancelled);

    let payments = vec![
        payment(&partial, dec!(150.00), date(2026, 2, 5), PaymentMethod::Check, PaymentStatus::Completed),
        payment(&paid_jan, dec!(600.00), date(2026, 1, 15), PaymentMethod::BankTransfer, PaymentStatus::Completed),
        payment(&paid_jan, dec!(400.00), date(2026, 1, 25), PaymentMethod::CreditCard, PaymentStatus::Completed),
        payment(&paid_feb, dec!(300.25), date(2026, 2, 14), PaymentMethod::BankTransfer, PaymentStatus::Completed),
        payment(&sent, dec!(250.50), date(2026, 1, 12), PaymentMethod::Paypal, PaymentStatus::Failed),
    ];
    (
        vec![draft, sent, partial, paid_jan, paid_feb, overdue, cancelled],
        payments,
    )
}

#[test]
fn total_revenue_sums_only_paid_invoices() {
    let (invoices, payments) = fixture();
    let analytics = compute_analytics(&invoices, &payments);

    let expected: Decimal = invoices
        .iter()
        .filter(|invoice| invoice.status == InvoiceStatus::Paid)
        .map(|invoice| invoice.total_amount)
        .sum();
    assert_eq!(analytics.total_revenue, expected);
    assert_eq!(analytics.total_revenue, dec!(1300.25));
    assert_eq!(analytics.paid_count, 2);
}

#[test]
fn outstanding_and_overdue_use_remaining_amounts() {
    let (invoices, payments) = fixture();
    let analytics = compute_analytics(&invoices, &payments);

    // draft 100 + sent 250.50 (failed payment ignored) + partial 400-150 + overdue 75
    assert_eq!(analytics.outstanding_amount, dec!(675.50));
    assert_eq!(analytics.overdue_amount, dec!(75.00));
    assert_eq!(analytics.overdue_count, 1);
}

#[test]
fn counts_and_averages() {
    let (invoices, payments) = fixture();
    let analytics = compute_analytics(&invoices, &payments);

    assert_eq!(analytics.invoice_count, 7);
    assert_eq!(analytics.status_counts.get(&InvoiceStatus::Paid), Some(&2));
    assert_eq!(analytics.status_counts.get(&InvoiceStatus::Cancelled), Some(&1));
    assert_eq!(analytics.status_counts.get(&InvoiceStatus::Viewed), None);
    // (100 + 250.50 + 400 + 1000 + 300.25 + 75 + 999) / 7
    assert_eq!(analytics.average_invoice_amount, dec!(446.39));
    // paid_jan: Jan 5 -> Jan 25 = 20 days; paid_feb: Feb 10 -> Feb 14 = 4 days
    assert_eq!(analytics.average_days_to_payment, Some(dec!(12)));
}

#[test]
fn revenue_groupings_and_method_counts() {
    let (invoices, payments) = fixture();
    let analytics = compute_analytics(&invoices, &payments);

    assert_eq!(analytics.revenue_by_month.get("2026-01"), Some(&dec!(1000.00)));
    assert_eq!(analytics.revenue_by_month.get("2026-02"), Some(&dec!(300.25)));
    assert_eq!(analytics.revenue_by_month.len(), 2);
    assert_eq!(analytics.revenue_by_client.get("Initech"), Some(&dec!(1000.00)));
    assert_eq!(analytics.revenue_by_client.get("Acme"), Some(&dec!(300.25)));
    assert_eq!(
        analytics.payment_method_counts.get(&PaymentMethod::BankTransfer),
        Some(&2)
    );
    assert_eq!(analytics.payment_method_counts.get(&PaymentMethod::Paypal), Some(&1));
}

#[test]
fn empty_collections_produce_zeroes() {
    let analytics = compute_analytics(&[], &[]);
    assert_eq!(analytics.total_revenue, Decimal::ZERO);
    assert_eq!(analytics.average_invoice_amount, Decimal::ZERO);
    assert_eq!(analytics.average_days_to_payment, None);
    assert_eq!(analytics.collection_rate, None);
}
