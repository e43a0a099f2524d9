//! Financial use-case service.
//!
//! # Responsibility
//! - Own the published invoice, payment and bank-account collections.
//! - Persist every mutation through the document store (full replace).
//! - Reconcile the referenced invoice after every payment mutation.
//!
//! # Invariants
//! - Collections are only replaced after the store call succeeded.
//! - Every failure is written to the published `error` field and returned.
//! - A payment mutation is never rolled back when the follow-up invoice
//!   update fails; the caller sees the reconciliation error instead.

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::financial::analytics::{compute_analytics, FinancialAnalytics};
use crate::financial::error::{FinancialError, FinancialResult};
use crate::financial::export::{export_invoices_csv, export_payments_csv};
use crate::financial::numbering::next_invoice_number;
use crate::financial::providers::{BankingProvider, PaymentGateway};
use crate::financial::reconcile::{reconcile, Reconciliation};
use crate::model::bank_account::{BankAccount, BankAccountId};
use crate::model::invoice::{ClientId, Invoice, InvoiceId, InvoiceStatus};
use crate::model::payment::{PaymentId, PaymentRecord, PaymentStatus, Refund};
use crate::state::Published;
use crate::store::{delete_entity, load_entities, save_entity, DocumentStore};
use chrono::Duration;
use log::{error, info};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Defaults applied to invoices created through the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialSettings {
    pub currency: String,
    pub invoice_prefix: String,
    pub payment_terms_days: u32,
}

impl Default for FinancialSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl FinancialSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            currency: config.default_currency.clone(),
            invoice_prefix: config.invoice_number_prefix.clone(),
            payment_terms_days: config.default_payment_terms_days,
        }
    }
}

pub struct FinancialService {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    settings: FinancialSettings,
    invoices: Published<Vec<Invoice>>,
    payments: Published<Vec<PaymentRecord>>,
    bank_accounts: Published<Vec<BankAccount>>,
    error: Published<Option<FinancialError>>,
    is_loading: Published<bool>,
}

impl FinancialService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        settings: FinancialSettings,
    ) -> Self {
        Self {
            store,
            clock,
            settings,
            invoices: Published::default(),
            payments: Published::default(),
            bank_accounts: Published::default(),
            error: Published::default(),
            is_loading: Published::default(),
        }
    }

    pub fn settings(&self) -> &FinancialSettings {
        &self.settings
    }

    pub fn invoices(&self) -> Vec<Invoice> {
        self.invoices.get()
    }

    pub fn payments(&self) -> Vec<PaymentRecord> {
        self.payments.get()
    }

    pub fn bank_accounts(&self) -> Vec<BankAccount> {
        self.bank_accounts.get()
    }

    pub fn last_error(&self) -> Option<FinancialError> {
        self.error.get()
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.get()
    }

    pub fn invoices_state(&self) -> &Published<Vec<Invoice>> {
        &self.invoices
    }

    pub fn payments_state(&self) -> &Published<Vec<PaymentRecord>> {
        &self.payments
    }

    pub fn bank_accounts_state(&self) -> &Published<Vec<BankAccount>> {
        &self.bank_accounts
    }

    pub fn error_state(&self) -> &Published<Option<FinancialError>> {
        &self.error
    }

    /// Fetches invoices, payments and bank accounts concurrently.
    ///
    /// Each branch updates its own collection; a failing branch writes the
    /// shared error field while its siblings still complete. Returns the
    /// last branch error, if any.
    pub fn load_all(&self) -> FinancialResult<()> {
        let started_at = Instant::now();
        self.is_loading.set(true);
        info!("event=financial_load module=financial status=start");

        let outcomes = std::thread::scope(|scope| {
            let handles = [
                scope.spawn(|| self.fetch_invoices().map(|_| ())),
                scope.spawn(|| self.fetch_payments().map(|_| ())),
                scope.spawn(|| self.fetch_bank_accounts().map(|_| ())),
            ];
            handles.map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    Err(FinancialError::Network("fetch worker panicked".to_string()))
                })
            })
        });

        self.is_loading.set(false);
        let failure = outcomes.into_iter().filter_map(Result::err).last();
        match &failure {
            None => info!(
                "event=financial_load module=financial status=ok duration_ms={} invoices={} payments={} bank_accounts={}",
                started_at.elapsed().as_millis(),
                self.invoices.with(Vec::len),
                self.payments.with(Vec::len),
                self.bank_accounts.with(Vec::len)
            ),
            Some(err) => error!(
                "event=financial_load module=financial status=error duration_ms={} error_code={}",
                started_at.elapsed().as_millis(),
                err.code()
            ),
        }
        failure.map_or(Ok(()), Err)
    }

    pub fn fetch_invoices(&self) -> FinancialResult<Vec<Invoice>> {
        self.track("invoice_fetch", || {
            let mut invoices = load_entities::<Invoice>(self.store.as_ref())?;
            invoices.sort_by(|a, b| {
                b.issue_date
                    .cmp(&a.issue_date)
                    .then_with(|| b.invoice_number.cmp(&a.invoice_number))
            });
            self.invoices.set(invoices.clone());
            Ok(invoices)
        })
    }

    pub fn fetch_payments(&self) -> FinancialResult<Vec<PaymentRecord>> {
        self.track("payment_fetch", || {
            let mut payments = load_entities::<PaymentRecord>(self.store.as_ref())?;
            payments.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
            self.payments.set(payments.clone());
            Ok(payments)
        })
    }

    pub fn fetch_bank_accounts(&self) -> FinancialResult<Vec<BankAccount>> {
        self.track("bank_account_fetch", || {
            let accounts = load_entities::<BankAccount>(self.store.as_ref())?;
            self.bank_accounts.set(accounts.clone());
            Ok(accounts)
        })
    }

    /// Builds an unsaved draft with the next invoice number and default terms.
    pub fn new_invoice_draft(&self, client_id: ClientId, client_name: impl Into<String>) -> Invoice {
        let today = self.clock.today();
        let number = self.next_invoice_number();
        let due_date = today + Duration::days(i64::from(self.settings.payment_terms_days));
        let mut invoice = Invoice::new(
            number,
            client_id,
            client_name,
            today,
            due_date,
            self.settings.currency.clone(),
        );
        invoice.payment_terms = Some(format!("Net {}", self.settings.payment_terms_days));
        invoice
    }

    pub fn next_invoice_number(&self) -> String {
        let today = self.clock.today();
        self.invoices.with(|invoices| {
            next_invoice_number(
                &self.settings.invoice_prefix,
                today,
                invoices.iter().map(|invoice| invoice.invoice_number.as_str()),
            )
        })
    }

    pub fn create_invoice(&self, mut invoice: Invoice) -> FinancialResult<Invoice> {
        self.track("invoice_create", || {
            invoice.validate()?;
            let duplicate = self.invoices.with(|invoices| {
                invoices
                    .iter()
                    .find(|existing| {
                        existing.id == invoice.id
                            || existing.invoice_number == invoice.invoice_number
                    })
                    .map(|existing| existing.invoice_number.clone())
            });
            if let Some(number) = duplicate {
                return Err(FinancialError::DuplicateIdentifier(number));
            }

            let now = self.clock.now();
            invoice.created_at = now;
            invoice.updated_at = now;
            save_entity(self.store.as_ref(), &invoice)?;
            self.invoices.update(|invoices| invoices.insert(0, invoice.clone()));
            info!(
                "event=invoice_create module=financial status=ok invoice_id={} number={}",
                invoice.id, invoice.invoice_number
            );
            Ok(invoice)
        })
    }

    /// Replaces a stored invoice with `invoice` (full round-trip, no patch).
    pub fn update_invoice(&self, invoice: Invoice) -> FinancialResult<Invoice> {
        self.track("invoice_update", || self.persist_invoice(invoice))
    }

    pub fn delete_invoice(&self, invoice_id: InvoiceId) -> FinancialResult<()> {
        self.track("invoice_delete", || {
            delete_entity::<Invoice>(self.store.as_ref(), &invoice_id.to_string())?;
            self.invoices
                .update(|invoices| invoices.retain(|invoice| invoice.id != invoice_id));
            info!("event=invoice_delete module=financial status=ok invoice_id={invoice_id}");
            Ok(())
        })
    }

    pub fn mark_as_sent(&self, invoice_id: InvoiceId) -> FinancialResult<Invoice> {
        self.track("invoice_mark_sent", || {
            let mut invoice = self.find_invoice(invoice_id)?;
            if invoice.status != InvoiceStatus::Draft {
                return Err(FinancialError::InvalidData(format!(
                    "invoice {} is {}, only drafts can be sent",
                    invoice.invoice_number, invoice.status
                )));
            }
            invoice.status = InvoiceStatus::Sent;
            self.persist_invoice(invoice)
        })
    }

    pub fn cancel_invoice(&self, invoice_id: InvoiceId) -> FinancialResult<Invoice> {
        self.track("invoice_cancel", || {
            let mut invoice = self.find_invoice(invoice_id)?;
            if invoice.status == InvoiceStatus::Paid {
                return Err(FinancialError::InvalidData(format!(
                    "invoice {} is paid and cannot be cancelled",
                    invoice.invoice_number
                )));
            }
            invoice.status = InvoiceStatus::Cancelled;
            self.persist_invoice(invoice)
        })
    }

    /// Copies an invoice into a new draft dated today with a fresh number.
    pub fn duplicate_invoice(&self, invoice_id: InvoiceId) -> FinancialResult<Invoice> {
        let source = match self.find_invoice(invoice_id) {
            Ok(invoice) => invoice,
            Err(err) => return self.track("invoice_duplicate", || Err(err)),
        };

        let mut copy = self.new_invoice_draft(source.client_id, source.client_name.clone());
        copy.line_items = source
            .line_items
            .iter()
            .cloned()
            .map(|mut item| {
                item.id = Uuid::new_v4();
                item
            })
            .collect();
        copy.discount_amount = source.discount_amount;
        copy.currency = source.currency.clone();
        copy.notes = source.notes.clone();
        copy.recalculate_totals();
        self.create_invoice(copy)
    }

    pub fn payments_for_invoice(&self, invoice_id: InvoiceId) -> Vec<PaymentRecord> {
        self.payments.with(|payments| {
            payments
                .iter()
                .filter(|payment| payment.invoice_id == invoice_id)
                .cloned()
                .collect()
        })
    }

    pub fn remaining_amount(&self, invoice_id: InvoiceId) -> FinancialResult<Decimal> {
        let invoice = self.find_invoice(invoice_id)?;
        Ok(self
            .payments
            .with(|payments| invoice.remaining_amount(payments)))
    }

    pub fn create_payment(&self, mut payment: PaymentRecord) -> FinancialResult<PaymentRecord> {
        if payment.currency.trim().is_empty() {
            payment.currency = self.settings.currency.clone();
        }
        self.track("payment_create", || {
            payment.validate()?;
            self.find_invoice(payment.invoice_id)?;
            if self
                .payments
                .with(|payments| payments.iter().any(|existing| existing.id == payment.id))
            {
                return Err(FinancialError::DuplicateIdentifier(payment.id.to_string()));
            }

            save_entity(self.store.as_ref(), &payment)?;
            self.payments.update(|payments| payments.insert(0, payment.clone()));
            info!(
                "event=payment_create module=financial status=ok payment_id={} invoice_id={} amount={}",
                payment.id, payment.invoice_id, payment.amount
            );

            self.reconcile_and_persist(payment.invoice_id)?;
            Ok(payment)
        })
    }

    pub fn update_payment(&self, payment: PaymentRecord) -> FinancialResult<PaymentRecord> {
        self.track("payment_update", || {
            payment.validate()?;
            let previous = self.find_payment(payment.id)?;
            self.find_invoice(payment.invoice_id)?;
            self.persist_payment(&payment)?;

            if previous.invoice_id != payment.invoice_id && self.has_invoice(previous.invoice_id) {
                self.reconcile_and_persist(previous.invoice_id)?;
            }
            self.reconcile_and_persist(payment.invoice_id)?;
            Ok(payment)
        })
    }

    pub fn delete_payment(&self, payment_id: PaymentId) -> FinancialResult<()> {
        self.track("payment_delete", || {
            let payment = self.find_payment(payment_id)?;
            delete_entity::<PaymentRecord>(self.store.as_ref(), &payment_id.to_string())?;
            self.payments
                .update(|payments| payments.retain(|existing| existing.id != payment_id));
            info!(
                "event=payment_delete module=financial status=ok payment_id={payment_id} invoice_id={}",
                payment.invoice_id
            );

            if self.has_invoice(payment.invoice_id) {
                self.reconcile_and_persist(payment.invoice_id)?;
            }
            Ok(())
        })
    }

    /// Records a refund on a completed payment and reconciles its invoice.
    pub fn refund_payment(
        &self,
        payment_id: PaymentId,
        amount: Decimal,
        reason: Option<String>,
    ) -> FinancialResult<PaymentRecord> {
        self.track("payment_refund", || {
            let mut payment = self.find_payment(payment_id)?;
            payment.apply_refund(Refund {
                id: Uuid::new_v4(),
                amount,
                reason,
                refunded_at: self.clock.now(),
            })?;
            self.persist_payment(&payment)?;
            if self.has_invoice(payment.invoice_id) {
                self.reconcile_and_persist(payment.invoice_id)?;
            }
            Ok(payment)
        })
    }

    /// Charges a pending payment through `gateway`.
    ///
    /// The payment passes through `Processing` and ends `Completed` with the
    /// gateway reference, or `Failed` with a `Gateway` error.
    pub fn process_payment(
        &self,
        payment_id: PaymentId,
        gateway: &dyn PaymentGateway,
    ) -> FinancialResult<PaymentRecord> {
        self.track("payment_process", || {
            let mut payment = self.find_payment(payment_id)?;
            if payment.status != PaymentStatus::Pending {
                return Err(FinancialError::InvalidData(format!(
                    "payment {} is {}, expected pending",
                    payment.id,
                    payment.status.as_str()
                )));
            }

            payment.status = PaymentStatus::Processing;
            self.persist_payment(&payment)?;

            match gateway.charge(&payment) {
                Ok(reference) => {
                    payment.status = PaymentStatus::Completed;
                    payment.reference = Some(reference);
                    self.persist_payment(&payment)?;
                    self.reconcile_and_persist(payment.invoice_id)?;
                    Ok(payment)
                }
                Err(message) => {
                    payment.status = PaymentStatus::Failed;
                    self.persist_payment(&payment)?;
                    Err(FinancialError::Gateway(format!(
                        "{} declined payment {}: {message}",
                        gateway.name(),
                        payment.id
                    )))
                }
            }
        })
    }

    /// Recomputes one invoice's status from its completed payments.
    pub fn reconcile_invoice(&self, invoice_id: InvoiceId) -> FinancialResult<Reconciliation> {
        self.track("invoice_reconcile", || self.reconcile_and_persist(invoice_id))
    }

    /// Reconciles every invoice; returns the ones whose status changed.
    ///
    /// Keeps going after a failed invoice and returns the last failure.
    pub fn reconcile_all(&self) -> FinancialResult<Vec<Reconciliation>> {
        let ids: Vec<InvoiceId> = self
            .invoices
            .with(|invoices| invoices.iter().map(|invoice| invoice.id).collect());
        let mut changed = Vec::new();
        let mut failure = None;
        for invoice_id in ids {
            match self.reconcile_invoice(invoice_id) {
                Ok(outcome) if outcome.changed() => changed.push(outcome),
                Ok(_) => {}
                Err(err) => failure = Some(err),
            }
        }
        failure.map_or(Ok(changed), Err)
    }

    /// Loads every collection, then reconciles against the clock's today.
    ///
    /// Statuses read after this call (analytics, exports) reflect the
    /// current date; returns the invoices whose status changed.
    pub fn load_and_reconcile(&self) -> FinancialResult<Vec<Reconciliation>> {
        self.load_all()?;
        self.reconcile_all()
    }

    pub fn create_bank_account(&self, mut account: BankAccount) -> FinancialResult<BankAccount> {
        self.track("bank_account_create", || {
            validate_bank_account(&account)?;
            let (duplicate, has_accounts) = self.bank_accounts.with(|accounts| {
                (
                    accounts.iter().any(|existing| existing.id == account.id),
                    !accounts.is_empty(),
                )
            });
            if duplicate {
                return Err(FinancialError::DuplicateIdentifier(account.id.to_string()));
            }
            if !has_accounts {
                account.is_primary = true;
            }

            save_entity(self.store.as_ref(), &account)?;
            self.bank_accounts
                .update(|accounts| accounts.push(account.clone()));
            if account.is_primary {
                self.demote_other_primaries(account.id)?;
            }
            info!(
                "event=bank_account_create module=financial status=ok account_id={} primary={}",
                account.id, account.is_primary
            );
            Ok(account)
        })
    }

    pub fn update_bank_account(&self, account: BankAccount) -> FinancialResult<BankAccount> {
        self.track("bank_account_update", || {
            validate_bank_account(&account)?;
            self.find_bank_account(account.id)?;
            self.persist_bank_account(&account)?;
            if account.is_primary {
                self.demote_other_primaries(account.id)?;
            }
            Ok(account)
        })
    }

    /// Deletes an account; a deleted primary hands the flag to the first
    /// remaining active account.
    pub fn delete_bank_account(&self, account_id: BankAccountId) -> FinancialResult<()> {
        self.track("bank_account_delete", || {
            let account = self.find_bank_account(account_id)?;
            delete_entity::<BankAccount>(self.store.as_ref(), &account_id.to_string())?;
            self.bank_accounts
                .update(|accounts| accounts.retain(|existing| existing.id != account_id));

            if account.is_primary {
                let successor = self.bank_accounts.with(|accounts| {
                    accounts.iter().find(|existing| existing.is_active).cloned()
                });
                if let Some(mut successor) = successor {
                    successor.is_primary = true;
                    self.persist_bank_account(&successor)?;
                }
            }
            Ok(())
        })
    }

    pub fn set_primary_account(&self, account_id: BankAccountId) -> FinancialResult<BankAccount> {
        self.track("bank_account_set_primary", || {
            let mut account = self.find_bank_account(account_id)?;
            if !account.is_primary {
                account.is_primary = true;
                self.persist_bank_account(&account)?;
            }
            self.demote_other_primaries(account_id)?;
            Ok(account)
        })
    }

    /// Refreshes an account balance from a banking provider.
    pub fn sync_bank_account(
        &self,
        account_id: BankAccountId,
        provider: &dyn BankingProvider,
    ) -> FinancialResult<BankAccount> {
        self.track("bank_account_sync", || {
            let mut account = self.find_bank_account(account_id)?;
            let balance = provider.fetch_balance(&account).map_err(|message| {
                FinancialError::BankingProvider(format!("{}: {message}", provider.name()))
            })?;
            account.current_balance = balance;
            account.last_synced_at = Some(self.clock.now());
            self.persist_bank_account(&account)?;
            Ok(account)
        })
    }

    pub fn analytics(&self) -> FinancialAnalytics {
        let invoices = self.invoices.get();
        self.payments
            .with(|payments| compute_analytics(&invoices, payments))
    }

    pub fn export_invoices_csv(&self) -> FinancialResult<String> {
        self.track("invoice_export", || {
            self.invoices
                .with(|invoices| export_invoices_csv(invoices))
                .map_err(|err| FinancialError::InvalidData(err.to_string()))
        })
    }

    pub fn export_payments_csv(&self) -> FinancialResult<String> {
        self.track("payment_export", || {
            self.payments
                .with(|payments| export_payments_csv(payments))
                .map_err(|err| FinancialError::InvalidData(err.to_string()))
        })
    }

    fn track<T>(
        &self,
        event: &str,
        operation: impl FnOnce() -> FinancialResult<T>,
    ) -> FinancialResult<T> {
        let started_at = Instant::now();
        let result = operation();
        if let Err(err) = &result {
            error!(
                "event={event} module=financial status=error duration_ms={} error_code={} error={err}",
                started_at.elapsed().as_millis(),
                err.code()
            );
            self.error.set(Some(err.clone()));
        }
        result
    }

    fn reconcile_and_persist(&self, invoice_id: InvoiceId) -> FinancialResult<Reconciliation> {
        let mut invoice = self.find_invoice(invoice_id)?;
        let payments = self.payments_for_invoice(invoice_id);
        let outcome = reconcile(&invoice, &payments, self.clock.today());
        if !outcome.changed() {
            return Ok(outcome);
        }

        invoice.status = outcome.status;
        invoice.payment_history = payments;
        invoice.updated_at = self.clock.now();
        save_entity(self.store.as_ref(), &invoice)?;
        self.replace_invoice(invoice);
        info!(
            "event=invoice_reconciled module=financial status=ok invoice_id={} from={} to={} total_paid={} remaining={}",
            invoice_id,
            outcome.previous_status,
            outcome.status,
            outcome.total_paid,
            outcome.remaining_amount
        );
        Ok(outcome)
    }

    fn persist_invoice(&self, mut invoice: Invoice) -> FinancialResult<Invoice> {
        invoice.validate()?;
        self.find_invoice(invoice.id)?;
        invoice.updated_at = self.clock.now();
        save_entity(self.store.as_ref(), &invoice)?;
        self.replace_invoice(invoice.clone());
        info!(
            "event=invoice_update module=financial status=ok invoice_id={} invoice_status={}",
            invoice.id, invoice.status
        );
        Ok(invoice)
    }

    fn persist_payment(&self, payment: &PaymentRecord) -> FinancialResult<()> {
        save_entity(self.store.as_ref(), payment)?;
        let updated = payment.clone();
        self.payments.update(|payments| {
            if let Some(slot) = payments.iter_mut().find(|existing| existing.id == updated.id) {
                *slot = updated;
            }
        });
        info!(
            "event=payment_update module=financial status=ok payment_id={} payment_status={}",
            payment.id,
            payment.status.as_str()
        );
        Ok(())
    }

    fn persist_bank_account(&self, account: &BankAccount) -> FinancialResult<()> {
        save_entity(self.store.as_ref(), account)?;
        let updated = account.clone();
        self.bank_accounts.update(|accounts| {
            if let Some(slot) = accounts.iter_mut().find(|existing| existing.id == updated.id) {
                *slot = updated;
            }
        });
        Ok(())
    }

    fn demote_other_primaries(&self, primary_id: BankAccountId) -> FinancialResult<()> {
        let others: Vec<BankAccount> = self.bank_accounts.with(|accounts| {
            accounts
                .iter()
                .filter(|account| account.id != primary_id && account.is_primary)
                .cloned()
                .collect()
        });
        for mut account in others {
            account.is_primary = false;
            self.persist_bank_account(&account)?;
        }
        Ok(())
    }

    fn replace_invoice(&self, invoice: Invoice) {
        self.invoices.update(|invoices| {
            if let Some(slot) = invoices.iter_mut().find(|existing| existing.id == invoice.id) {
                *slot = invoice;
            }
        });
    }

    fn has_invoice(&self, invoice_id: InvoiceId) -> bool {
        self.invoices
            .with(|invoices| invoices.iter().any(|invoice| invoice.id == invoice_id))
    }

    fn find_invoice(&self, invoice_id: InvoiceId) -> FinancialResult<Invoice> {
        self.invoices
            .with(|invoices| invoices.iter().find(|invoice| invoice.id == invoice_id).cloned())
            .ok_or_else(|| FinancialError::NotFound(format!("invoice {invoice_id}")))
    }

    fn find_payment(&self, payment_id: PaymentId) -> FinancialResult<PaymentRecord> {
        self.payments
            .with(|payments| payments.iter().find(|payment| payment.id == payment_id).cloned())
            .ok_or_else(|| FinancialError::NotFound(format!("payment {payment_id}")))
    }

    fn find_bank_account(&self, account_id: BankAccountId) -> FinancialResult<BankAccount> {
        self.bank_accounts
            .with(|accounts| accounts.iter().find(|account| account.id == account_id).cloned())
            .ok_or_else(|| FinancialError::NotFound(format!("bank account {account_id}")))
    }
}

fn validate_bank_account(account: &BankAccount) -> FinancialResult<()> {
    if account.account_name.trim().is_empty() {
        return Err(FinancialError::InvalidData(
            "bank account name must not be blank".to_string(),
        ));
    }
    if account.currency.trim().is_empty() {
        return Err(FinancialError::InvalidData(
            "bank account currency must not be blank".to_string(),
        ));
    }
    Ok(())
}
