//! Reports, dashboards and the report evaluation engine.

pub mod engine;
pub mod error;
pub mod service;

pub use engine::{
    run_report, source_fields, source_rows, ReportDataset, ReportGroup, ReportOutput, ReportRow,
    ReportSummary,
};
pub use error::{ReportingError, ReportingResult};
pub use service::ReportingService;
