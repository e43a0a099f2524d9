//! Report and dashboard use-case service.
//!
//! # Responsibility
//! - Own the published report and dashboard collections.
//! - Persist report/dashboard mutations through the document store.
//!
//! # Invariants
//! - At most one dashboard is flagged default.
//! - Deleting a report drops the dashboard widgets that referenced it.

use crate::clock::Clock;
use crate::model::dashboard::{Dashboard, DashboardId, DashboardWidget};
use crate::model::report::{Report, ReportId};
use crate::reporting::engine::{run_report, ReportDataset, ReportOutput};
use crate::reporting::error::{ReportingError, ReportingResult};
use crate::state::Published;
use crate::store::{delete_entity, load_entities, save_entity, DocumentStore};
use log::{error, info};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

pub struct ReportingService {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    reports: Published<Vec<Report>>,
    dashboards: Published<Vec<Dashboard>>,
    error: Published<Option<ReportingError>>,
}

impl ReportingService {
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            reports: Published::default(),
            dashboards: Published::default(),
            error: Published::default(),
        }
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.get()
    }

    pub fn dashboards(&self) -> Vec<Dashboard> {
        self.dashboards.get()
    }

    pub fn last_error(&self) -> Option<ReportingError> {
        self.error.get()
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }

    pub fn reports_state(&self) -> &Published<Vec<Report>> {
        &self.reports
    }

    pub fn dashboards_state(&self) -> &Published<Vec<Dashboard>> {
        &self.dashboards
    }

    pub fn error_state(&self) -> &Published<Option<ReportingError>> {
        &self.error
    }

    pub fn load_all(&self) -> ReportingResult<()> {
        self.fetch_reports()?;
        self.fetch_dashboards()?;
        Ok(())
    }

    pub fn fetch_reports(&self) -> ReportingResult<Vec<Report>> {
        self.track("report_fetch", || {
            let mut reports = load_entities::<Report>(self.store.as_ref())?;
            reports.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            self.reports.set(reports.clone());
            Ok(reports)
        })
    }

    pub fn fetch_dashboards(&self) -> ReportingResult<Vec<Dashboard>> {
        self.track("dashboard_fetch", || {
            let dashboards = load_entities::<Dashboard>(self.store.as_ref())?;
            self.dashboards.set(dashboards.clone());
            Ok(dashboards)
        })
    }

    pub fn create_report(&self, mut report: Report) -> ReportingResult<Report> {
        self.track("report_create", || {
            validate_name(&report.name, "report")?;
            if self.find_report(report.id).is_ok() {
                return Err(ReportingError::DuplicateIdentifier(report.id.to_string()));
            }
            let now = self.clock.now();
            report.created_at = now;
            report.updated_at = now;
            save_entity(self.store.as_ref(), &report)?;
            self.reports.update(|reports| reports.insert(0, report.clone()));
            info!(
                "event=report_create module=reporting status=ok report_id={} source={}",
                report.id,
                report.data_source.as_str()
            );
            Ok(report)
        })
    }

    pub fn update_report(&self, mut report: Report) -> ReportingResult<Report> {
        self.track("report_update", || {
            validate_name(&report.name, "report")?;
            self.find_report(report.id)?;
            report.updated_at = self.clock.now();
            save_entity(self.store.as_ref(), &report)?;
            let updated = report.clone();
            self.reports.update(|reports| {
                if let Some(slot) = reports.iter_mut().find(|existing| existing.id == updated.id) {
                    *slot = updated;
                }
            });
            Ok(report)
        })
    }

    pub fn delete_report(&self, report_id: ReportId) -> ReportingResult<()> {
        self.track("report_delete", || {
            delete_entity::<Report>(self.store.as_ref(), &report_id.to_string())?;
            self.reports
                .update(|reports| reports.retain(|report| report.id != report_id));

            let affected: Vec<Dashboard> = self.dashboards.with(|dashboards| {
                dashboards
                    .iter()
                    .filter(|dashboard| {
                        dashboard
                            .widgets
                            .iter()
                            .any(|widget| widget.report_id == Some(report_id))
                    })
                    .cloned()
                    .collect()
            });
            for mut dashboard in affected {
                dashboard
                    .widgets
                    .retain(|widget| widget.report_id != Some(report_id));
                self.persist_dashboard(dashboard)?;
            }
            info!("event=report_delete module=reporting status=ok report_id={report_id}");
            Ok(())
        })
    }

    /// Saves a copy of a report under a new identity and "(Copy)" name.
    pub fn duplicate_report(&self, report_id: ReportId) -> ReportingResult<Report> {
        let source = match self.find_report(report_id) {
            Ok(report) => report,
            Err(err) => return self.track("report_duplicate", || Err(err)),
        };
        let mut copy = source;
        copy.id = Uuid::new_v4();
        copy.name = format!("{} (Copy)", copy.name);
        copy.schedule = None;
        self.create_report(copy)
    }

    pub fn run_report(
        &self,
        report_id: ReportId,
        dataset: ReportDataset<'_>,
    ) -> ReportingResult<ReportOutput> {
        self.track("report_run", || {
            let started_at = Instant::now();
            let report = self.find_report(report_id)?;
            let output = run_report(&report, dataset)?;
            info!(
                "event=report_run module=reporting status=ok report_id={report_id} rows={} groups={} duration_ms={}",
                output.summary.row_count,
                output.groups.len(),
                started_at.elapsed().as_millis()
            );
            Ok(output)
        })
    }

    pub fn create_dashboard(&self, mut dashboard: Dashboard) -> ReportingResult<Dashboard> {
        self.track("dashboard_create", || {
            validate_name(&dashboard.name, "dashboard")?;
            if self.find_dashboard(dashboard.id).is_ok() {
                return Err(ReportingError::DuplicateIdentifier(dashboard.id.to_string()));
            }
            if self.dashboards.with(Vec::is_empty) {
                dashboard.is_default = true;
            }
            let now = self.clock.now();
            dashboard.created_at = now;
            dashboard.updated_at = now;
            save_entity(self.store.as_ref(), &dashboard)?;
            self.dashboards
                .update(|dashboards| dashboards.push(dashboard.clone()));
            if dashboard.is_default {
                self.clear_other_defaults(dashboard.id)?;
            }
            info!(
                "event=dashboard_create module=reporting status=ok dashboard_id={} default={}",
                dashboard.id, dashboard.is_default
            );
            Ok(dashboard)
        })
    }

    pub fn update_dashboard(&self, dashboard: Dashboard) -> ReportingResult<Dashboard> {
        self.track("dashboard_update", || {
            validate_name(&dashboard.name, "dashboard")?;
            self.find_dashboard(dashboard.id)?;
            let is_default = dashboard.is_default;
            let dashboard = self.persist_dashboard(dashboard)?;
            if is_default {
                self.clear_other_defaults(dashboard.id)?;
            }
            Ok(dashboard)
        })
    }

    pub fn delete_dashboard(&self, dashboard_id: DashboardId) -> ReportingResult<()> {
        self.track("dashboard_delete", || {
            delete_entity::<Dashboard>(self.store.as_ref(), &dashboard_id.to_string())?;
            self.dashboards
                .update(|dashboards| dashboards.retain(|dashboard| dashboard.id != dashboard_id));
            Ok(())
        })
    }

    /// Places a widget on the next free grid slot of a dashboard.
    pub fn add_widget(
        &self,
        dashboard_id: DashboardId,
        widget: DashboardWidget,
    ) -> ReportingResult<Dashboard> {
        self.track("dashboard_add_widget", || {
            if let Some(report_id) = widget.report_id {
                self.find_report(report_id)?;
            }
            let mut dashboard = self.find_dashboard(dashboard_id)?;
            dashboard.push_widget(widget);
            self.persist_dashboard(dashboard)
        })
    }

    pub fn remove_widget(
        &self,
        dashboard_id: DashboardId,
        widget_id: Uuid,
    ) -> ReportingResult<Dashboard> {
        self.track("dashboard_remove_widget", || {
            let mut dashboard = self.find_dashboard(dashboard_id)?;
            let before = dashboard.widgets.len();
            dashboard.widgets.retain(|widget| widget.id != widget_id);
            if dashboard.widgets.len() == before {
                return Err(ReportingError::NotFound(format!("widget {widget_id}")));
            }
            self.persist_dashboard(dashboard)
        })
    }

    pub fn set_default_dashboard(&self, dashboard_id: DashboardId) -> ReportingResult<Dashboard> {
        self.track("dashboard_set_default", || {
            let mut dashboard = self.find_dashboard(dashboard_id)?;
            if !dashboard.is_default {
                dashboard.is_default = true;
                dashboard = self.persist_dashboard(dashboard)?;
            }
            self.clear_other_defaults(dashboard_id)?;
            Ok(dashboard)
        })
    }

    fn track<T>(
        &self,
        event: &str,
        operation: impl FnOnce() -> ReportingResult<T>,
    ) -> ReportingResult<T> {
        let result = operation();
        if let Err(err) = &result {
            error!(
                "event={event} module=reporting status=error error_code={} error={err}",
                err.code()
            );
            self.error.set(Some(err.clone()));
        }
        result
    }

    fn persist_dashboard(&self, mut dashboard: Dashboard) -> ReportingResult<Dashboard> {
        dashboard.updated_at = self.clock.now();
        save_entity(self.store.as_ref(), &dashboard)?;
        let updated = dashboard.clone();
        self.dashboards.update(|dashboards| {
            if let Some(slot) = dashboards.iter_mut().find(|existing| existing.id == updated.id) {
                *slot = updated;
            }
        });
        Ok(dashboard)
    }

    fn clear_other_defaults(&self, default_id: DashboardId) -> ReportingResult<()> {
        let others: Vec<Dashboard> = self.dashboards.with(|dashboards| {
            dashboards
                .iter()
                .filter(|dashboard| dashboard.id != default_id && dashboard.is_default)
                .cloned()
                .collect()
        });
        for mut dashboard in others {
            dashboard.is_default = false;
            self.persist_dashboard(dashboard)?;
        }
        Ok(())
    }

    fn find_report(&self, report_id: ReportId) -> ReportingResult<Report> {
        self.reports
            .with(|reports| reports.iter().find(|report| report.id == report_id).cloned())
            .ok_or_else(|| ReportingError::NotFound(format!("report {report_id}")))
    }

    fn find_dashboard(&self, dashboard_id: DashboardId) -> ReportingResult<Dashboard> {
        self.dashboards
            .with(|dashboards| {
                dashboards
                    .iter()
                    .find(|dashboard| dashboard.id == dashboard_id)
                    .cloned()
            })
            .ok_or_else(|| ReportingError::NotFound(format!("dashboard {dashboard_id}")))
    }
}

fn validate_name(name: &str, kind: &str) -> ReportingResult<()> {
    if name.trim().is_empty() {
        return Err(ReportingError::InvalidData(format!(
            "{kind} name must not be blank"
        )));
    }
    Ok(())
}
