//! Domain records for the financial, reporting and project areas.
//!
//! # Responsibility
//! - Define canonical data structures used by services and view-models.
//! - Keep derived amounts (totals, remaining, refunds) next to the data.
//!
//! # Invariants
//! - Every record is identified by a stable UUID v4 generated client-side.
//! - Money is `rust_decimal::Decimal`; dates are `chrono` types.

pub mod bank_account;
pub mod dashboard;
pub mod invoice;
pub mod payment;
pub mod project;
pub mod report;
