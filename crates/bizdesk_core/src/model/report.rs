//! Report definition model.
//!
//! A report is a declarative query over one data source: filters narrow the
//! rows, visualizations group and aggregate them. Execution lives in
//! `reporting::engine`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ReportId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Financial,
    Sales,
    Operational,
    Project,
    Custom,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Financial => "financial",
            Self::Sales => "sales",
            Self::Operational => "operational",
            Self::Project => "project",
            Self::Custom => "custom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "financial" => Some(Self::Financial),
            "sales" => Some(Self::Sales),
            "operational" => Some(Self::Operational),
            "project" => Some(Self::Project),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Invoices,
    Payments,
    BankAccounts,
    Tasks,
}

impl DataSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invoices => "invoices",
            Self::Payments => "payments",
            Self::BankAccounts => "bank_accounts",
            Self::Tasks => "tasks",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "invoices" => Some(Self::Invoices),
            "payments" => Some(Self::Payments),
            "bank_accounts" => Some(Self::BankAccounts),
            "tasks" => Some(Self::Tasks),
            _ => None,
        }
    }
}

/// Typed cell produced by the report engine and used as filter operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Text(String),
    Number(Decimal),
    Date(NaiveDate),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// Orders values of the same kind; mixed kinds are incomparable.
    pub fn compare(&self, other: &CellValue) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a.to_lowercase().cmp(&b.to_lowercase())),
            (Self::Number(a), Self::Number(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Empty, Self::Empty) => Some(Ordering::Equal),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Number(value) => write!(f, "{value}"),
            Self::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    /// Inclusive on both ends; requires `ReportFilter::upper`.
    Between,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: CellValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<CellValue>,
}

impl ReportFilter {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: CellValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
            upper: None,
        }
    }

    pub fn between(field: impl Into<String>, lower: CellValue, upper: CellValue) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::Between,
            value: lower,
            upper: Some(upper),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Table,
    Bar,
    Line,
    Pie,
    Metric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Count,
    Sum,
    Average,
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visualization {
    pub title: String,
    pub chart_type: ChartType,
    pub group_by: Option<String>,
    pub value_field: Option<String>,
    pub aggregation: Aggregation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFormatting {
    pub currency: String,
    pub decimal_places: u32,
    pub include_totals: bool,
}

impl Default for ReportFormatting {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            decimal_places: 2,
            include_totals: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleFrequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSchedule {
    pub frequency: ScheduleFrequency,
    pub recipients: Vec<String>,
    pub next_run_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub name: String,
    pub description: Option<String>,
    pub report_type: ReportType,
    pub data_source: DataSource,
    pub filters: Vec<ReportFilter>,
    pub visualizations: Vec<Visualization>,
    pub formatting: ReportFormatting,
    pub schedule: Option<ReportSchedule>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    pub fn new(name: impl Into<String>, report_type: ReportType, data_source: DataSource) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            report_type,
            data_source,
            filters: Vec::new(),
            visualizations: Vec::new(),
            formatting: ReportFormatting::default(),
            schedule: None,
            created_at: now,
            updated_at: now,
        }
    }
}
