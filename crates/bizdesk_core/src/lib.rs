//! Core domain logic for BizDesk.
//! This crate is the single source of truth for invoicing, reporting and
//! project business rules; front ends only bind to its services and
//! view-models.

pub mod clock;
pub mod config;
pub mod db;
pub mod financial;
pub mod logging;
pub mod model;
pub mod projects;
pub mod reporting;
pub mod schema;
pub mod state;
pub mod store;
pub mod viewmodel;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use financial::{
    compute_analytics, FinancialAnalytics, FinancialError, FinancialResult, FinancialService,
    FinancialSettings, Reconciliation,
};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::bank_account::{BankAccount, BankAccountId, BankAccountType};
pub use model::dashboard::{Dashboard, DashboardId, DashboardWidget, WidgetKind};
pub use model::invoice::{ClientId, Invoice, InvoiceId, InvoiceStatus, LineItem};
pub use model::payment::{PaymentId, PaymentMethod, PaymentRecord, PaymentStatus, Refund};
pub use model::project::{BoardId, ProjectBoard, ProjectTask, TaskId, TaskPriority, TaskStatus};
pub use model::report::{DataSource, Report, ReportId, ReportType};
pub use projects::{ProjectError, ProjectService};
pub use reporting::{ReportingError, ReportingService};
pub use schema::{Record, RecordMapper, SchemaError};
pub use state::{Debouncer, Published, SubscriptionId};
pub use store::{DocumentStore, SqliteDocumentStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
