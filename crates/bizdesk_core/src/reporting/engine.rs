//! Report evaluation over in-memory collections.
//!
//! # Responsibility
//! - Flatten the report's data source into rows of named cells.
//! - Apply every filter (logical AND), then group and aggregate by the
//!   first visualization.
//!
//! # Invariants
//! - Filters and visualizations may only name fields of their data source.
//! - Cells of mismatched kinds never match an ordering filter.
//! - Aggregated amounts are rounded to the report's decimal places.

use crate::model::bank_account::BankAccount;
use crate::model::invoice::Invoice;
use crate::model::payment::PaymentRecord;
use crate::model::project::ProjectTask;
use crate::model::report::{
    Aggregation, CellValue, DataSource, FilterOperator, Report, ReportFilter, Visualization,
};
use crate::reporting::error::{ReportingError, ReportingResult};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub type ReportRow = BTreeMap<String, CellValue>;

const INVOICE_FIELDS: &[&str] = &[
    "invoice_number",
    "client_name",
    "status",
    "issue_date",
    "issue_month",
    "due_date",
    "subtotal",
    "tax_amount",
    "discount_amount",
    "total_amount",
    "total_paid",
    "remaining_amount",
    "currency",
];

const PAYMENT_FIELDS: &[&str] = &[
    "payment_id",
    "invoice_id",
    "amount",
    "net_amount",
    "refunded_amount",
    "currency",
    "method",
    "status",
    "payment_date",
    "reference",
];

const BANK_ACCOUNT_FIELDS: &[&str] = &[
    "account_name",
    "bank_name",
    "account_type",
    "currency",
    "current_balance",
    "is_primary",
    "is_active",
];

const TASK_FIELDS: &[&str] = &[
    "title",
    "status",
    "priority",
    "assignee",
    "due_date",
    "estimated_hours",
];

/// Borrowed snapshot of every collection a report can read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportDataset<'a> {
    pub invoices: &'a [Invoice],
    pub payments: &'a [PaymentRecord],
    pub bank_accounts: &'a [BankAccount],
    pub tasks: &'a [ProjectTask],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportGroup {
    pub key: CellValue,
    pub row_count: usize,
    pub value: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportSummary {
    pub row_count: usize,
    /// First visualization's aggregate over all filtered rows.
    pub aggregate: Option<Decimal>,
    /// Sum of the value field when the report asks for totals.
    pub total: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportOutput {
    pub rows: Vec<ReportRow>,
    pub groups: Vec<ReportGroup>,
    pub summary: ReportSummary,
}

/// Field names a data source exposes to filters and visualizations.
pub fn source_fields(source: DataSource) -> &'static [&'static str] {
    match source {
        DataSource::Invoices => INVOICE_FIELDS,
        DataSource::Payments => PAYMENT_FIELDS,
        DataSource::BankAccounts => BANK_ACCOUNT_FIELDS,
        DataSource::Tasks => TASK_FIELDS,
    }
}

pub fn source_rows(source: DataSource, dataset: ReportDataset<'_>) -> Vec<ReportRow> {
    match source {
        DataSource::Invoices => dataset
            .invoices
            .iter()
            .map(|invoice| invoice_row(invoice, dataset.payments))
            .collect(),
        DataSource::Payments => dataset.payments.iter().map(payment_row).collect(),
        DataSource::BankAccounts => dataset.bank_accounts.iter().map(bank_account_row).collect(),
        DataSource::Tasks => dataset.tasks.iter().map(task_row).collect(),
    }
}

pub fn run_report(report: &Report, dataset: ReportDataset<'_>) -> ReportingResult<ReportOutput> {
    check_fields(report)?;

    let mut rows = Vec::new();
    for row in source_rows(report.data_source, dataset) {
        if matches_all(&row, &report.filters)? {
            rows.push(row);
        }
    }

    let places = report.formatting.decimal_places;
    let Some(visualization) = report.visualizations.first() else {
        return Ok(ReportOutput {
            summary: ReportSummary {
                row_count: rows.len(),
                ..ReportSummary::default()
            },
            rows,
            groups: Vec::new(),
        });
    };

    let groups = match &visualization.group_by {
        Some(field) => group_rows(&rows, field)
            .into_iter()
            .map(|(key, members)| ReportGroup {
                value: aggregate(&members, visualization, places),
                row_count: members.len(),
                key,
            })
            .collect(),
        None => Vec::new(),
    };

    let all: Vec<&ReportRow> = rows.iter().collect();
    let total = match (&visualization.value_field, report.formatting.include_totals) {
        (Some(field), true) => Some(numbers(&all, field).sum::<Decimal>().round_dp(places)),
        _ => None,
    };
    let summary = ReportSummary {
        row_count: rows.len(),
        aggregate: aggregate(&all, visualization, places),
        total,
    };

    Ok(ReportOutput {
        rows,
        groups,
        summary,
    })
}

fn check_fields(report: &Report) -> ReportingResult<()> {
    let known = source_fields(report.data_source);
    let referenced = report
        .filters
        .iter()
        .map(|filter| filter.field.as_str())
        .chain(report.visualizations.iter().flat_map(|visualization| {
            visualization
                .group_by
                .as_deref()
                .into_iter()
                .chain(visualization.value_field.as_deref())
        }));
    for field in referenced {
        if !known.contains(&field) {
            return Err(ReportingError::UnknownField(format!(
                "{field} (source {})",
                report.data_source.as_str()
            )));
        }
    }
    Ok(())
}

fn matches_all(row: &ReportRow, filters: &[ReportFilter]) -> ReportingResult<bool> {
    for filter in filters {
        if !matches(row, filter)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn matches(row: &ReportRow, filter: &ReportFilter) -> ReportingResult<bool> {
    let cell = row.get(&filter.field).unwrap_or(&CellValue::Empty);
    let ordering = cell.compare(&filter.value);
    let matched = match filter.operator {
        FilterOperator::Equals => ordering == Some(Ordering::Equal),
        FilterOperator::NotEquals => ordering != Some(Ordering::Equal),
        FilterOperator::Contains => cell
            .to_string()
            .to_lowercase()
            .contains(&filter.value.to_string().to_lowercase()),
        FilterOperator::GreaterThan => ordering == Some(Ordering::Greater),
        FilterOperator::LessThan => ordering == Some(Ordering::Less),
        FilterOperator::Between => {
            let upper = filter.upper.as_ref().ok_or_else(|| {
                ReportingError::InvalidData(format!(
                    "between filter on {} has no upper bound",
                    filter.field
                ))
            })?;
            matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
                && matches!(cell.compare(upper), Some(Ordering::Less | Ordering::Equal))
        }
    };
    Ok(matched)
}

/// Groups rows by the display form of `field`, ordered by key.
fn group_rows<'a>(rows: &'a [ReportRow], field: &str) -> Vec<(CellValue, Vec<&'a ReportRow>)> {
    let mut groups: BTreeMap<String, (CellValue, Vec<&'a ReportRow>)> = BTreeMap::new();
    for row in rows {
        let key = row.get(field).cloned().unwrap_or(CellValue::Empty);
        groups
            .entry(key.to_string())
            .or_insert_with(|| (key, Vec::new()))
            .1
            .push(row);
    }
    groups.into_values().collect()
}

fn numbers<'a>(rows: &'a [&'a ReportRow], field: &'a str) -> impl Iterator<Item = Decimal> + 'a {
    rows.iter()
        .filter_map(move |row| row.get(field).and_then(CellValue::as_number))
}

fn aggregate(rows: &[&ReportRow], visualization: &Visualization, places: u32) -> Option<Decimal> {
    if visualization.aggregation == Aggregation::Count {
        return Some(Decimal::from(rows.len()));
    }

    let field = visualization.value_field.as_deref()?;
    let values: Vec<Decimal> = numbers(rows, field).collect();
    if values.is_empty() {
        return None;
    }
    let value = match visualization.aggregation {
        Aggregation::Count => Decimal::from(values.len()),
        Aggregation::Sum => values.iter().copied().sum(),
        Aggregation::Average => {
            values.iter().copied().sum::<Decimal>() / Decimal::from(values.len())
        }
        Aggregation::Min => values.iter().copied().min()?,
        Aggregation::Max => values.iter().copied().max()?,
    };
    Some(value.round_dp(places))
}

fn text(value: impl Into<String>) -> CellValue {
    CellValue::Text(value.into())
}

fn opt_text(value: Option<&String>) -> CellValue {
    value.map_or(CellValue::Empty, |value| text(value.as_str()))
}

fn invoice_row(invoice: &Invoice, payments: &[PaymentRecord]) -> ReportRow {
    let total_paid = invoice.total_paid(payments);
    ReportRow::from([
        ("invoice_number".to_string(), text(invoice.invoice_number.as_str())),
        ("client_name".to_string(), text(invoice.client_name.as_str())),
        ("status".to_string(), text(invoice.status.as_str())),
        ("issue_date".to_string(), CellValue::Date(invoice.issue_date)),
        (
            "issue_month".to_string(),
            text(invoice.issue_date.format("%Y-%m").to_string()),
        ),
        ("due_date".to_string(), CellValue::Date(invoice.due_date)),
        ("subtotal".to_string(), CellValue::Number(invoice.subtotal)),
        ("tax_amount".to_string(), CellValue::Number(invoice.tax_amount)),
        (
            "discount_amount".to_string(),
            CellValue::Number(invoice.discount_amount),
        ),
        ("total_amount".to_string(), CellValue::Number(invoice.total_amount)),
        ("total_paid".to_string(), CellValue::Number(total_paid)),
        (
            "remaining_amount".to_string(),
            CellValue::Number(invoice.total_amount - total_paid),
        ),
        ("currency".to_string(), text(invoice.currency.as_str())),
    ])
}

fn payment_row(payment: &PaymentRecord) -> ReportRow {
    ReportRow::from([
        ("payment_id".to_string(), text(payment.id.to_string())),
        ("invoice_id".to_string(), text(payment.invoice_id.to_string())),
        ("amount".to_string(), CellValue::Number(payment.amount)),
        ("net_amount".to_string(), CellValue::Number(payment.net_amount())),
        (
            "refunded_amount".to_string(),
            CellValue::Number(payment.refunded_amount()),
        ),
        ("currency".to_string(), text(payment.currency.as_str())),
        ("method".to_string(), text(payment.method.as_str())),
        ("status".to_string(), text(payment.status.as_str())),
        (
            "payment_date".to_string(),
            CellValue::Date(payment.payment_date.date_naive()),
        ),
        ("reference".to_string(), opt_text(payment.reference.as_ref())),
    ])
}

fn bank_account_row(account: &BankAccount) -> ReportRow {
    ReportRow::from([
        ("account_name".to_string(), text(account.account_name.as_str())),
        ("bank_name".to_string(), text(account.bank_name.as_str())),
        ("account_type".to_string(), text(account.account_type.as_str())),
        ("currency".to_string(), text(account.currency.as_str())),
        (
            "current_balance".to_string(),
            CellValue::Number(account.current_balance),
        ),
        ("is_primary".to_string(), CellValue::Bool(account.is_primary)),
        ("is_active".to_string(), CellValue::Bool(account.is_active)),
    ])
}

fn task_row(task: &ProjectTask) -> ReportRow {
    ReportRow::from([
        ("title".to_string(), text(task.title.as_str())),
        ("status".to_string(), text(task.status.as_str())),
        ("priority".to_string(), text(task.priority.as_str())),
        ("assignee".to_string(), opt_text(task.assignee.as_ref())),
        (
            "due_date".to_string(),
            task.due_date.map_or(CellValue::Empty, CellValue::Date),
        ),
        (
            "estimated_hours".to_string(),
            task.estimated_hours
                .map_or(CellValue::Empty, CellValue::Number),
        ),
    ])
}
