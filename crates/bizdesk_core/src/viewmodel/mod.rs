//! UI-facing state holders over the services.
//!
//! View-models own only presentation state (selection, search input,
//! wizard drafts); entity collections stay with the services.

pub mod financial;
pub mod projects;
pub mod report_builder;
pub mod reporting;

pub use financial::{filter_invoices, FinancialTab, FinancialViewModel, InvoiceFilter};
pub use projects::{BoardColumn, ProjectViewModel};
pub use report_builder::{BuilderIssue, BuilderOutput, BuilderStep, BuilderTarget, ReportBuilder};
pub use reporting::ReportingViewModel;
