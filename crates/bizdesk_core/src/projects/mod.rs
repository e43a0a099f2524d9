//! Project boards and tasks.

pub mod error;
pub mod service;

pub use error::{ProjectError, ProjectResult};
pub use service::{BoardProgress, ProjectService};
