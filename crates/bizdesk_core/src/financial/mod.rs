//! Invoicing, payments, bank accounts and their derived figures.
//!
//! # Responsibility
//! - Reconcile invoice status against completed payments.
//! - Compute analytics and CSV exports from in-memory collections.
//! - Expose `FinancialService` as the single mutation entry point.

pub mod analytics;
pub mod error;
pub mod export;
pub mod numbering;
pub mod providers;
pub mod reconcile;
pub mod service;

pub use analytics::{compute_analytics, FinancialAnalytics};
pub use error::{FinancialError, FinancialResult};
pub use export::{
    export_invoices_csv, export_payments_csv, write_invoices_csv, write_payments_csv, ExportError,
    INVOICE_CSV_HEADER, PAYMENT_CSV_HEADER,
};
pub use numbering::next_invoice_number;
pub use providers::{BankingProvider, PaymentGateway};
pub use reconcile::{derive_status, reconcile, Reconciliation};
pub use service::{FinancialService, FinancialSettings};
