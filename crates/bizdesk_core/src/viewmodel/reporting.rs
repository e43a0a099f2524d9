//! Reporting screen state: report search, type filter, builder sheet.

use crate::model::report::{Report, ReportId, ReportType};
use crate::reporting::{ReportingError, ReportingResult, ReportingService};
use crate::viewmodel::report_builder::{BuilderOutput, BuilderTarget, ReportBuilder};
use std::sync::Arc;

pub struct ReportingViewModel {
    service: Arc<ReportingService>,
    search_text: String,
    type_filter: Option<ReportType>,
    builder: ReportBuilder,
    is_builder_presented: bool,
    error: Option<ReportingError>,
}

impl ReportingViewModel {
    pub fn new(service: Arc<ReportingService>) -> Self {
        Self {
            service,
            search_text: String::new(),
            type_filter: None,
            builder: ReportBuilder::default(),
            is_builder_presented: false,
            error: None,
        }
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn set_type_filter(&mut self, report_type: Option<ReportType>) {
        self.type_filter = report_type;
    }

    /// Reports matching the search text (name or description) and type.
    pub fn filtered_reports(&self) -> Vec<Report> {
        let needle = self.search_text.trim().to_lowercase();
        self.service
            .reports()
            .into_iter()
            .filter(|report| self.type_filter.map_or(true, |kind| report.report_type == kind))
            .filter(|report| {
                needle.is_empty()
                    || report.name.to_lowercase().contains(&needle)
                    || report
                        .description
                        .as_deref()
                        .is_some_and(|description| description.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn builder(&self) -> &ReportBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut ReportBuilder {
        &mut self.builder
    }

    pub fn is_builder_presented(&self) -> bool {
        self.is_builder_presented
    }

    /// Opens the builder on a fresh draft for `target`.
    pub fn present_builder(&mut self, target: BuilderTarget) {
        self.builder = ReportBuilder::new(target);
        self.is_builder_presented = true;
    }

    pub fn dismiss_builder(&mut self) {
        self.is_builder_presented = false;
        self.builder.reset();
    }

    /// Creates the builder's draft and closes the builder on success.
    pub fn create_from_builder(&mut self) -> ReportingResult<BuilderOutput> {
        let result = self.builder.create(&self.service);
        match &result {
            Ok(_) => self.is_builder_presented = false,
            Err(err) => self.error = Some(err.clone()),
        }
        result
    }

    pub fn duplicate_report(&mut self, report_id: ReportId) -> ReportingResult<Report> {
        let result = self.service.duplicate_report(report_id);
        self.capture(result)
    }

    pub fn delete_report(&mut self, report_id: ReportId) -> ReportingResult<()> {
        let result = self.service.delete_report(report_id);
        self.capture(result)
    }

    pub fn refresh(&mut self) -> ReportingResult<()> {
        let result = self.service.load_all();
        self.capture(result)
    }

    pub fn error(&self) -> Option<&ReportingError> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
        self.service.clear_error();
    }

    fn capture<T>(&mut self, result: ReportingResult<T>) -> ReportingResult<T> {
        if let Err(err) = &result {
            self.error = Some(err.clone());
        }
        result
    }
}
