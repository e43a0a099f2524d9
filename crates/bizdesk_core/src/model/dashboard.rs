//! Dashboard model: a named grid of widgets, each optionally backed by a report.

use crate::model::report::ReportId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type DashboardId = Uuid;

pub const DEFAULT_REFRESH_INTERVAL_SECS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Metric,
    Chart,
    Table,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetPosition {
    pub row: u32,
    pub column: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardWidget {
    pub id: Uuid,
    pub title: String,
    pub kind: WidgetKind,
    pub report_id: Option<ReportId>,
    pub position: WidgetPosition,
}

impl DashboardWidget {
    pub fn new(title: impl Into<String>, kind: WidgetKind, report_id: Option<ReportId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            kind,
            report_id,
            position: WidgetPosition {
                row: 0,
                column: 0,
                width: 1,
                height: 1,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: DashboardId,
    pub name: String,
    pub description: Option<String>,
    pub widgets: Vec<DashboardWidget>,
    pub refresh_interval_secs: u32,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dashboard {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            widgets: Vec::new(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a widget on the next free row of a two-column grid.
    pub fn push_widget(&mut self, mut widget: DashboardWidget) {
        let index = u32::try_from(self.widgets.len()).unwrap_or(u32::MAX);
        widget.position.row = index / 2;
        widget.position.column = index % 2;
        self.widgets.push(widget);
    }
}
