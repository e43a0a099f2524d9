use bizdesk_core::db::open_db_in_memory;
use bizdesk_core::schema::Record;
use bizdesk_core::store::{load_entities, StoreResult};
use bizdesk_core::{
    DocumentStore, FinancialError, FinancialService, FinancialSettings, FixedClock, Invoice,
    InvoiceStatus, LineItem, PaymentMethod, PaymentRecord, PaymentStatus, SqliteDocumentStore,
    StoreError,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Delegates to SQLite, failing selected calls on demand.
struct FlakyStore {
    inner: SqliteDocumentStore,
    fail_invoice_saves: AtomicBool,
    fail_payment_fetches: AtomicBool,
    deny_writes: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: SqliteDocumentStore::new(open_db_in_memory().unwrap()),
            fail_invoice_saves: AtomicBool::new(false),
            fail_payment_fetches: AtomicBool::new(false),
            deny_writes: AtomicBool::new(false),
        }
    }
}

impl DocumentStore for FlakyStore {
    fn fetch_all(&self, record_type: &str) -> StoreResult<Vec<Record>> {
        if record_type == "PaymentRecord" && self.fail_payment_fetches.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("payments offline".to_string()));
        }
        self.inner.fetch_all(record_type)
    }

    fn fetch(&self, record_type: &str, record_id: &str) -> StoreResult<Option<Record>> {
        self.inner.fetch(record_type, record_id)
    }

    fn save(&self, record: &Record) -> StoreResult<()> {
        if self.deny_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unauthorized("read-only credentials".to_string()));
        }
        if record.record_type == "Invoice" && self.fail_invoice_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("invoice write rejected".to_string()));
        }
        self.inner.save(record)
    }

    fn delete(&self, record_type: &str, record_id: &str) -> StoreResult<()> {
        self.inner.delete(record_type, record_id)
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
}

fn service_with(store: Arc<dyn DocumentStore>) -> FinancialService {
    service_on(store, today())
}

fn service_on(store: Arc<dyn DocumentStore>, day: NaiveDate) -> FinancialService {
    FinancialService::new(store, Arc::new(FixedClock::on(day)), FinancialSettings::default())
}

fn service() -> FinancialService {
    service_with(Arc::new(SqliteDocumentStore::new(open_db_in_memory().unwrap())))
}

fn invoice_due(total: Decimal, due: NaiveDate) -> Invoice {
    let issue = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let mut invoice = Invoice::new(
        format!("INV-{}", Uuid::new_v4().simple()),
        Uuid::new_v4(),
        "Acme Corp",
        issue,
        due,
        "USD",
    );
    invoice.add_line_item(LineItem::new("Services", dec!(1), total, dec!(0)));
    invoice.status = InvoiceStatus::Sent;
    invoice
}

fn invoice_of(total: Decimal) -> Invoice {
    invoice_due(total, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap())
}

fn completed(invoice: &Invoice, amount: Decimal, day: u32) -> PaymentRecord {
    let mut payment = PaymentRecord::new(
        invoice.id,
        amount,
        "USD",
        PaymentMethod::BankTransfer,
        Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap(),
    );
    payment.status = PaymentStatus::Completed;
    payment
}

fn stored_invoice(service: &FinancialService, id: Uuid) -> Invoice {
    service
        .invoices()
        .into_iter()
        .find(|invoice| invoice.id == id)
        .unwrap()
}

#[test]
fn two_completed_payments_settle_invoice() {
    let service = service();
    let invoice = service.create_invoice(invoice_of(dec!(1000))).unwrap();

    service.create_payment(completed(&invoice, dec!(400), 2)).unwrap();
    assert_eq!(
        stored_invoice(&service, invoice.id).status,
        InvoiceStatus::PartiallyPaid
    );

    service.create_payment(completed(&invoice, dec!(600), 3)).unwrap();
    let outcome = service.reconcile_invoice(invoice.id).unwrap();
    assert_eq!(outcome.status, InvoiceStatus::Paid);
    assert_eq!(outcome.total_paid, dec!(1000));
    assert_eq!(outcome.remaining_amount, Decimal::ZERO);
    assert_eq!(service.remaining_amount(invoice.id).unwrap(), Decimal::ZERO);

    let settled = stored_invoice(&service, invoice.id);
    assert_eq!(settled.status, InvoiceStatus::Paid);
    assert_eq!(settled.payment_history.len(), 2);
}

#[test]
fn paid_status_is_independent_of_payment_order() {
    for amounts in [[dec!(250), dec!(750)], [dec!(750), dec!(250)]] {
        let service = service();
        let invoice = service.create_invoice(invoice_of(dec!(1000))).unwrap();
        for (day, amount) in amounts.into_iter().enumerate() {
            let day = u32::try_from(day).unwrap() + 2;
            service.create_payment(completed(&invoice, amount, day)).unwrap();
        }
        assert_eq!(stored_invoice(&service, invoice.id).status, InvoiceStatus::Paid);
    }
}

#[test]
fn unpaid_invoice_past_due_becomes_overdue() {
    let service = service();
    let yesterday = today().pred_opt().unwrap();
    let invoice = service
        .create_invoice(invoice_due(dec!(1000), yesterday))
        .unwrap();

    let outcome = service.reconcile_invoice(invoice.id).unwrap();
    assert_eq!(outcome.status, InvoiceStatus::Overdue);
    assert_eq!(outcome.remaining_amount, dec!(1000));
    assert_eq!(stored_invoice(&service, invoice.id).status, InvoiceStatus::Overdue);
}

#[test]
fn removing_payment_moves_status_backward() {
    let service = service();
    let invoice = service.create_invoice(invoice_of(dec!(1000))).unwrap();
    service.create_payment(completed(&invoice, dec!(400), 2)).unwrap();
    let second = service
        .create_payment(completed(&invoice, dec!(600), 3))
        .unwrap();
    assert_eq!(stored_invoice(&service, invoice.id).status, InvoiceStatus::Paid);

    service.delete_payment(second.id).unwrap();
    assert_eq!(
        stored_invoice(&service, invoice.id).status,
        InvoiceStatus::PartiallyPaid
    );
}

#[test]
fn marking_payment_non_completed_moves_status_backward() {
    let service = service();
    let invoice = service.create_invoice(invoice_of(dec!(500))).unwrap();
    let mut payment = service
        .create_payment(completed(&invoice, dec!(500), 2))
        .unwrap();
    let extra = service
        .create_payment(completed(&invoice, dec!(100), 3))
        .unwrap();
    assert_eq!(stored_invoice(&service, invoice.id).status, InvoiceStatus::Paid);

    payment.status = PaymentStatus::Failed;
    service.update_payment(payment).unwrap();
    assert_eq!(
        stored_invoice(&service, invoice.id).status,
        InvoiceStatus::PartiallyPaid
    );
    assert_eq!(service.remaining_amount(invoice.id).unwrap(), dec!(400));
    assert_eq!(extra.status, PaymentStatus::Completed);
}

#[test]
fn moving_payment_between_invoices_reconciles_both() {
    let service = service();
    let first = service.create_invoice(invoice_of(dec!(300))).unwrap();
    let second = service.create_invoice(invoice_of(dec!(300))).unwrap();
    let mut payment = service
        .create_payment(completed(&first, dec!(300), 2))
        .unwrap();
    service
        .create_payment(completed(&first, dec!(100), 3))
        .unwrap();

    payment.invoice_id = second.id;
    service.update_payment(payment).unwrap();

    assert_eq!(
        stored_invoice(&service, first.id).status,
        InvoiceStatus::PartiallyPaid
    );
    assert_eq!(stored_invoice(&service, second.id).status, InvoiceStatus::Paid);
}

#[test]
fn refunds_are_not_netted_against_total_paid() {
    let service = service();
    let invoice = service.create_invoice(invoice_of(dec!(200))).unwrap();
    let first = service
        .create_payment(completed(&invoice, dec!(150), 2))
        .unwrap();
    service
        .create_payment(completed(&invoice, dec!(50), 3))
        .unwrap();

    let refunded = service
        .refund_payment(first.id, dec!(20), Some("damaged item".to_string()))
        .unwrap();
    assert_eq!(refunded.status, PaymentStatus::PartiallyRefunded);
    assert_eq!(refunded.refunded_amount(), dec!(20));

    // The partially refunded payment is no longer completed, so only the
    // untouched payment counts; the refund amount itself is never subtracted.
    assert_eq!(service.remaining_amount(invoice.id).unwrap(), dec!(150));
    assert_eq!(
        stored_invoice(&service, invoice.id).status,
        InvoiceStatus::PartiallyPaid
    );
}

#[test]
fn rejects_non_positive_amount_and_unknown_invoice() {
    let service = service();
    let invoice = service.create_invoice(invoice_of(dec!(100))).unwrap();

    let err = service
        .create_payment(completed(&invoice, dec!(0), 2))
        .unwrap_err();
    assert!(matches!(err, FinancialError::InvalidAmount(_)));

    let orphan = completed(&invoice_of(dec!(100)), dec!(10), 2);
    let err = service.create_payment(orphan).unwrap_err();
    assert!(matches!(err, FinancialError::NotFound(_)));
    assert_eq!(service.last_error(), Some(err));
    assert!(service.payments().is_empty());
}

#[test]
fn failed_invoice_update_keeps_payment_and_surfaces_error() {
    let store = Arc::new(FlakyStore::new());
    let service = service_with(store.clone());
    let invoice = service.create_invoice(invoice_of(dec!(1000))).unwrap();

    store.fail_invoice_saves.store(true, Ordering::SeqCst);
    let payment = completed(&invoice, dec!(1000), 2);
    let err = service.create_payment(payment.clone()).unwrap_err();

    assert!(matches!(err, FinancialError::Network(_)));
    assert_eq!(service.last_error(), Some(err));
    assert_eq!(service.payments(), vec![payment.clone()]);
    assert_eq!(
        load_entities::<PaymentRecord>(&*store).unwrap(),
        vec![payment]
    );
    assert_eq!(stored_invoice(&service, invoice.id).status, InvoiceStatus::Sent);

    store.fail_invoice_saves.store(false, Ordering::SeqCst);
    service.clear_error();
    let outcome = service.reconcile_invoice(invoice.id).unwrap();
    assert_eq!(outcome.status, InvoiceStatus::Paid);
    assert_eq!(service.last_error(), None);
}

#[test]
fn load_all_completes_siblings_when_one_fetch_fails() {
    let store = Arc::new(FlakyStore::new());
    let writer = service_with(store.clone());
    let invoice = writer.create_invoice(invoice_of(dec!(100))).unwrap();
    writer
        .create_payment(completed(&invoice, dec!(100), 2))
        .unwrap();

    store.fail_payment_fetches.store(true, Ordering::SeqCst);
    let reader = service_with(store.clone());
    let err = reader.load_all().unwrap_err();

    assert!(matches!(err, FinancialError::Network(_)));
    assert_eq!(reader.invoices().len(), 1);
    assert!(reader.payments().is_empty());
    assert!(reader.last_error().is_some());
    assert!(!reader.is_loading());

    store.fail_payment_fetches.store(false, Ordering::SeqCst);
    reader.load_all().unwrap();
    assert_eq!(reader.payments().len(), 1);
}

#[test]
fn fully_discounted_invoice_reconciles_to_paid() {
    let service = service();
    let mut free = Invoice::new(
        "INV-FREE",
        Uuid::new_v4(),
        "Acme Corp",
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        "USD",
    );
    free.status = InvoiceStatus::Sent;
    let free = service.create_invoice(free).unwrap();
    assert_eq!(free.total_amount, Decimal::ZERO);

    let changed = service.reconcile_all().unwrap();

    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].status, InvoiceStatus::Paid);
    assert_eq!(stored_invoice(&service, free.id).status, InvoiceStatus::Paid);
}

#[test]
fn later_clock_marks_loaded_invoices_overdue_before_analytics() {
    let store: Arc<dyn DocumentStore> =
        Arc::new(SqliteDocumentStore::new(open_db_in_memory().unwrap()));
    let writer = service_with(store.clone());
    let invoice = writer.create_invoice(invoice_of(dec!(1000))).unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Sent);

    let reader = service_on(store, NaiveDate::from_ymd_opt(2026, 4, 15).unwrap());
    let changed = reader.load_and_reconcile().unwrap();
    let analytics = reader.analytics();

    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].previous_status, InvoiceStatus::Sent);
    assert_eq!(analytics.overdue_count, 1);
    assert_eq!(analytics.overdue_amount, dec!(1000));
    assert_eq!(stored_invoice(&reader, invoice.id).status, InvoiceStatus::Overdue);

    let again = reader.load_and_reconcile().unwrap();
    assert!(again.is_empty());
}

#[test]
fn denied_store_write_surfaces_as_unauthorized() {
    let store = Arc::new(FlakyStore::new());
    let service = service_with(store.clone());
    store.deny_writes.store(true, Ordering::SeqCst);

    let err = service.create_invoice(invoice_of(dec!(250))).unwrap_err();

    assert_eq!(err, FinancialError::Unauthorized);
    assert_eq!(service.last_error(), Some(FinancialError::Unauthorized));
    assert!(service.invoices().is_empty());
    assert!(load_entities::<Invoice>(&*store).unwrap().is_empty());
}
