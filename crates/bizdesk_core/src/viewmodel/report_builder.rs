//! Multi-step report/dashboard creation wizard.
//!
//! # Invariants
//! - Steps form a fixed linear sequence; `next`/`back` move one step and
//!   clamp at either end.
//! - Navigation never checks the draft; problems surface only through
//!   `validation_errors`, and `create` is refused unless on `Review` with no
//!   problems.
//! - A successful `create` resets the builder to a fresh draft.

use crate::model::dashboard::{Dashboard, DashboardWidget, WidgetKind, DEFAULT_REFRESH_INTERVAL_SECS};
use crate::model::report::{
    ChartType, DataSource, FilterOperator, Report, ReportFilter, ReportFormatting, ReportSchedule,
    ReportType, Visualization,
};
use crate::reporting::{ReportingError, ReportingResult, ReportingService};
use log::info;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuilderStep {
    BasicInfo,
    DataSource,
    Filters,
    Visualizations,
    Formatting,
    Scheduling,
    Review,
}

impl BuilderStep {
    pub const ALL: [BuilderStep; 7] = [
        Self::BasicInfo,
        Self::DataSource,
        Self::Filters,
        Self::Visualizations,
        Self::Formatting,
        Self::Scheduling,
        Self::Review,
    ];

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|step| *step == self)
            .unwrap_or_default()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Info",
            Self::DataSource => "Data Source",
            Self::Filters => "Filters",
            Self::Visualizations => "Visualizations",
            Self::Formatting => "Formatting",
            Self::Scheduling => "Scheduling",
            Self::Review => "Review",
        }
    }

    fn following(self) -> Self {
        Self::ALL.get(self.index() + 1).copied().unwrap_or(self)
    }

    fn preceding(self) -> Self {
        self.index()
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index).copied())
            .unwrap_or(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuilderTarget {
    #[default]
    Report,
    Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderIssue {
    EmptyName,
    /// `Between` filter without an upper bound.
    IncompleteFilter(String),
    VisualizationWithoutTitle(usize),
    ScheduleWithoutRecipients,
}

impl Display for BuilderIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name is required"),
            Self::IncompleteFilter(field) => {
                write!(f, "Filter on {field} needs both range bounds")
            }
            Self::VisualizationWithoutTitle(index) => {
                write!(f, "Visualization {} needs a title", index + 1)
            }
            Self::ScheduleWithoutRecipients => write!(f, "Scheduled reports need a recipient"),
        }
    }
}

/// Entity materialized by a successful `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderOutput {
    Report(Report),
    Dashboard(Dashboard),
}

/// Draft accumulated across wizard steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBuilder {
    step: BuilderStep,
    pub target: BuilderTarget,
    pub name: String,
    pub description: String,
    pub report_type: ReportType,
    /// Starts on `Invoices`, so a report draft always has a source.
    pub data_source: DataSource,
    pub filters: Vec<ReportFilter>,
    pub visualizations: Vec<Visualization>,
    pub formatting: ReportFormatting,
    pub schedule: Option<ReportSchedule>,
    pub refresh_interval_secs: u32,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(BuilderTarget::Report)
    }
}

impl ReportBuilder {
    pub fn new(target: BuilderTarget) -> Self {
        Self {
            step: BuilderStep::BasicInfo,
            target,
            name: String::new(),
            description: String::new(),
            report_type: ReportType::Custom,
            data_source: DataSource::Invoices,
            filters: Vec::new(),
            visualizations: Vec::new(),
            formatting: ReportFormatting::default(),
            schedule: None,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }

    pub fn step(&self) -> BuilderStep {
        self.step
    }

    pub fn is_first_step(&self) -> bool {
        self.step == BuilderStep::BasicInfo
    }

    pub fn is_review(&self) -> bool {
        self.step == BuilderStep::Review
    }

    /// Advances one step; stays on `Review`.
    pub fn next(&mut self) -> BuilderStep {
        self.step = self.step.following();
        self.step
    }

    /// Goes back one step; stays on `BasicInfo`.
    pub fn back(&mut self) -> BuilderStep {
        self.step = self.step.preceding();
        self.step
    }

    pub fn add_filter(&mut self, filter: ReportFilter) {
        self.filters.push(filter);
    }

    pub fn remove_filter(&mut self, index: usize) -> Option<ReportFilter> {
        (index < self.filters.len()).then(|| self.filters.remove(index))
    }

    pub fn add_visualization(&mut self, visualization: Visualization) {
        self.visualizations.push(visualization);
    }

    pub fn remove_visualization(&mut self, index: usize) -> Option<Visualization> {
        (index < self.visualizations.len()).then(|| self.visualizations.remove(index))
    }

    pub fn validation_errors(&self) -> Vec<BuilderIssue> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(BuilderIssue::EmptyName);
        }
        issues.extend(
            self.filters
                .iter()
                .filter(|filter| filter.operator == FilterOperator::Between && filter.upper.is_none())
                .map(|filter| BuilderIssue::IncompleteFilter(filter.field.clone())),
        );
        issues.extend(
            self.visualizations
                .iter()
                .enumerate()
                .filter(|(_, visualization)| visualization.title.trim().is_empty())
                .map(|(index, _)| BuilderIssue::VisualizationWithoutTitle(index)),
        );
        if self
            .schedule
            .as_ref()
            .is_some_and(|schedule| schedule.recipients.is_empty())
        {
            issues.push(BuilderIssue::ScheduleWithoutRecipients);
        }
        issues
    }

    pub fn can_create(&self) -> bool {
        self.is_review() && self.validation_errors().is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.target);
    }

    /// Persists the draft through `service` and resets the builder.
    ///
    /// Refused with `InvalidData` unless `can_create` holds; the draft is
    /// kept when the service call fails.
    pub fn create(&mut self, service: &ReportingService) -> ReportingResult<BuilderOutput> {
        if !self.is_review() {
            return Err(ReportingError::InvalidData(format!(
                "builder is on {}, creation happens on Review",
                self.step.title()
            )));
        }
        let issues = self.validation_errors();
        if !issues.is_empty() {
            let summary: Vec<String> = issues.iter().map(ToString::to_string).collect();
            return Err(ReportingError::InvalidData(summary.join("; ")));
        }

        let output = match self.target {
            BuilderTarget::Report => BuilderOutput::Report(service.create_report(self.to_report())?),
            BuilderTarget::Dashboard => {
                BuilderOutput::Dashboard(service.create_dashboard(self.to_dashboard())?)
            }
        };
        info!(
            "event=builder_create module=viewmodel status=ok target={:?}",
            self.target
        );
        self.reset();
        Ok(output)
    }

    fn description(&self) -> Option<String> {
        let trimmed = self.description.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn to_report(&self) -> Report {
        let mut report = Report::new(self.name.trim(), self.report_type, self.data_source);
        report.description = self.description();
        report.filters = self.filters.clone();
        report.visualizations = self.visualizations.clone();
        report.formatting = self.formatting.clone();
        report.schedule = self.schedule.clone();
        report
    }

    fn to_dashboard(&self) -> Dashboard {
        let mut dashboard = Dashboard::new(self.name.trim());
        dashboard.description = self.description();
        dashboard.refresh_interval_secs = self.refresh_interval_secs;
        for visualization in &self.visualizations {
            let kind = match visualization.chart_type {
                ChartType::Metric => WidgetKind::Metric,
                ChartType::Table => WidgetKind::Table,
                ChartType::Bar | ChartType::Line | ChartType::Pie => WidgetKind::Chart,
            };
            dashboard.push_widget(DashboardWidget::new(visualization.title.clone(), kind, None));
        }
        dashboard
    }
}

#[cfg(test)]
mod tests {
    use super::{BuilderIssue, BuilderStep, ReportBuilder};
    use crate::model::report::DataSource;

    #[test]
    fn six_forward_steps_reach_review_and_clamp() {
        let mut builder = ReportBuilder::default();
        for _ in 0..6 {
            builder.next();
        }
        assert_eq!(builder.step(), BuilderStep::Review);
        assert_eq!(builder.next(), BuilderStep::Review);
        assert_eq!(builder.back(), BuilderStep::Scheduling);
    }

    #[test]
    fn back_clamps_at_basic_info() {
        let mut builder = ReportBuilder::default();
        assert_eq!(builder.back(), BuilderStep::BasicInfo);
        assert!(builder.is_first_step());
    }

    #[test]
    fn create_is_disabled_without_name_even_on_review() {
        let mut builder = ReportBuilder::default();
        builder.data_source = DataSource::Payments;
        while !builder.is_review() {
            builder.next();
        }
        assert!(!builder.can_create());
        assert_eq!(builder.validation_errors(), vec![BuilderIssue::EmptyName]);

        builder.name = "Payments by method".to_string();
        assert!(builder.can_create());
    }

    #[test]
    fn named_draft_uses_invoices_source_by_default() {
        let mut builder = ReportBuilder::default();
        builder.name = "Revenue".to_string();
        assert!(builder.validation_errors().is_empty());
        assert!(!builder.can_create());

        while !builder.is_review() {
            builder.next();
        }
        assert!(builder.can_create());
        assert_eq!(builder.to_report().data_source, DataSource::Invoices);
    }
}
