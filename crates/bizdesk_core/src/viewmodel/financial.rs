//! Financial screen state: tab selection, invoice search/filter, analytics.
//!
//! # Invariants
//! - The filtered list is re-derived whenever the service's invoice
//!   collection changes, always with the last applied filter.
//! - Filter input edits only take effect once the debounce window closes
//!   (or on `apply_filter_now`).
//! - `error` mirrors the service error field for the lifetime of the
//!   view-model.

use crate::financial::{FinancialAnalytics, FinancialError, FinancialResult, FinancialService};
use crate::model::invoice::{Invoice, InvoiceStatus};
use crate::state::{Debouncer, Published, SubscriptionId};
use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinancialTab {
    #[default]
    Overview,
    Invoices,
    Payments,
    BankAccounts,
    Reports,
}

/// Client-side invoice filter; empty fields match everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvoiceFilter {
    pub search_text: String,
    pub status: Option<InvoiceStatus>,
    /// Inclusive issue-date range.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl InvoiceFilter {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        let needle = self.search_text.trim().to_lowercase();
        let text_matches = needle.is_empty()
            || invoice.invoice_number.to_lowercase().contains(&needle)
            || invoice.client_name.to_lowercase().contains(&needle)
            || invoice
                .notes
                .as_deref()
                .is_some_and(|notes| notes.to_lowercase().contains(&needle));
        let status_matches = self.status.map_or(true, |status| invoice.status == status);
        let date_matches = self
            .date_range
            .map_or(true, |(from, to)| invoice.issue_date >= from && invoice.issue_date <= to);
        text_matches && status_matches && date_matches
    }
}

pub fn filter_invoices(invoices: &[Invoice], filter: &InvoiceFilter) -> Vec<Invoice> {
    invoices
        .iter()
        .filter(|invoice| filter.matches(invoice))
        .cloned()
        .collect()
}

pub struct FinancialViewModel {
    service: Arc<FinancialService>,
    selected_tab: FinancialTab,
    input: InvoiceFilter,
    debouncer: Debouncer<InvoiceFilter>,
    applied_filter: Arc<Published<InvoiceFilter>>,
    filtered_invoices: Arc<Published<Vec<Invoice>>>,
    analytics: FinancialAnalytics,
    error: Arc<Published<Option<FinancialError>>>,
    invoices_subscription: SubscriptionId,
    error_subscription: SubscriptionId,
}

impl FinancialViewModel {
    pub fn new(service: Arc<FinancialService>, debounce: Duration) -> Self {
        let applied_filter = Arc::new(Published::new(InvoiceFilter::default()));
        let filtered_invoices = Arc::new(Published::new(service.invoices()));
        let error = Arc::new(Published::new(service.last_error()));

        let invoices_subscription = {
            let applied_filter = Arc::clone(&applied_filter);
            let filtered_invoices = Arc::clone(&filtered_invoices);
            service.invoices_state().subscribe(move |invoices: &Vec<Invoice>| {
                let filtered = applied_filter.with(|filter| filter_invoices(invoices, filter));
                filtered_invoices.set(filtered);
            })
        };
        let error_subscription = {
            let error = Arc::clone(&error);
            service
                .error_state()
                .subscribe(move |latest: &Option<FinancialError>| error.set(latest.clone()))
        };
        let analytics = service.analytics();

        Self {
            service,
            selected_tab: FinancialTab::default(),
            input: InvoiceFilter::default(),
            debouncer: Debouncer::new(debounce),
            applied_filter,
            filtered_invoices,
            analytics,
            error,
            invoices_subscription,
            error_subscription,
        }
    }

    pub fn selected_tab(&self) -> FinancialTab {
        self.selected_tab
    }

    pub fn select_tab(&mut self, tab: FinancialTab) {
        self.selected_tab = tab;
    }

    /// Filter as currently typed, possibly not yet applied.
    pub fn filter_input(&self) -> &InvoiceFilter {
        &self.input
    }

    pub fn applied_filter(&self) -> InvoiceFilter {
        self.applied_filter.get()
    }

    pub fn set_search_text(&mut self, text: impl Into<String>, now: Instant) {
        self.input.search_text = text.into();
        self.debouncer.submit(self.input.clone(), now);
    }

    pub fn set_status_filter(&mut self, status: Option<InvoiceStatus>, now: Instant) {
        self.input.status = status;
        self.debouncer.submit(self.input.clone(), now);
    }

    pub fn set_date_range(&mut self, range: Option<(NaiveDate, NaiveDate)>, now: Instant) {
        self.input.date_range = range;
        self.debouncer.submit(self.input.clone(), now);
    }

    /// Applies pending filter input once its quiet period has elapsed.
    /// Returns whether the filtered list was re-derived.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(filter) => {
                self.apply(filter);
                true
            }
            None => false,
        }
    }

    pub fn apply_filter_now(&mut self) {
        if let Some(filter) = self.debouncer.flush() {
            self.apply(filter);
        }
    }

    pub fn is_filter_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn filtered_invoices(&self) -> Vec<Invoice> {
        self.filtered_invoices.get()
    }

    pub fn analytics(&self) -> &FinancialAnalytics {
        &self.analytics
    }

    pub fn error(&self) -> Option<FinancialError> {
        self.error.get()
    }

    pub fn dismiss_error(&self) {
        self.service.clear_error();
    }

    /// Reloads every collection, reconciles, and recomputes analytics.
    pub fn refresh(&mut self) -> FinancialResult<()> {
        let loaded = self.service.load_all();
        let reconciled = self.service.reconcile_all().map(|_| ());
        self.analytics = self.service.analytics();
        loaded.and(reconciled)
    }

    fn apply(&mut self, filter: InvoiceFilter) {
        let invoices = self.service.invoices();
        let filtered = filter_invoices(&invoices, &filter);
        debug!(
            "event=invoice_filter module=viewmodel status=ok matched={} total={}",
            filtered.len(),
            invoices.len()
        );
        self.applied_filter.set(filter);
        self.filtered_invoices.set(filtered);
    }
}

impl Drop for FinancialViewModel {
    fn drop(&mut self) {
        self.service
            .invoices_state()
            .unsubscribe(self.invoices_subscription);
        self.service.error_state().unsubscribe(self.error_subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::InvoiceFilter;
    use crate::model::invoice::{Invoice, InvoiceStatus};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn invoice(number: &str, client: &str, day: u32) -> Invoice {
        let issue = NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        Invoice::new(number, Uuid::new_v4(), client, issue, issue, "USD")
    }

    #[test]
    fn search_matches_number_or_client_case_insensitively() {
        let filter = InvoiceFilter {
            search_text: "acme".to_string(),
            ..InvoiceFilter::default()
        };
        assert!(filter.matches(&invoice("INV-1", "ACME Corp", 1)));
        assert!(!filter.matches(&invoice("INV-2", "Globex", 1)));

        let by_number = InvoiceFilter {
            search_text: "inv-2".to_string(),
            ..InvoiceFilter::default()
        };
        assert!(by_number.matches(&invoice("INV-2", "Globex", 1)));
    }

    #[test]
    fn status_and_date_range_narrow_results() {
        let mut sent = invoice("INV-3", "Initech", 10);
        sent.status = InvoiceStatus::Sent;
        let filter = InvoiceFilter {
            status: Some(InvoiceStatus::Sent),
            date_range: Some((
                NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            )),
            ..InvoiceFilter::default()
        };
        assert!(filter.matches(&sent));
        assert!(!filter.matches(&invoice("INV-4", "Initech", 10)));
        sent.issue_date = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
        assert!(!filter.matches(&sent));
    }
}
