use bizdesk_core::model::report::{
    Aggregation, CellValue, ChartType, FilterOperator, ReportFilter, ReportSchedule,
    ScheduleFrequency, Visualization,
};
use bizdesk_core::reporting::ReportDataset;
use bizdesk_core::{
    open_db_in_memory, Dashboard, DashboardWidget, DataSource, FixedClock, Invoice, InvoiceStatus,
    LineItem, Report, ReportType, ReportingError, ReportingService, SqliteDocumentStore,
    WidgetKind,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn service() -> ReportingService {
    ReportingService::new(
        Arc::new(SqliteDocumentStore::new(open_db_in_memory().unwrap())),
        Arc::new(FixedClock::on(date(2026, 3, 15))),
    )
}

fn invoice(client: &str, total: Decimal, status: InvoiceStatus, issue: NaiveDate) -> Invoice {
    let mut invoice = Invoice::new(
        format!("INV-{}", Uuid::new_v4().simple()),
        Uuid::new_v4(),
        client,
        issue,
        issue + chrono::Duration::days(30),
        "USD",
    );
    invoice.add_line_item(LineItem::new("Work", dec!(1), total, dec!(0)));
    invoice.status = status;
    invoice
}

fn overdue_by_client() -> Report {
    let mut report = Report::new("Overdue by client", ReportType::Financial, DataSource::Invoices);
    report.filters.push(ReportFilter::new(
        "status",
        FilterOperator::NotEquals,
        CellValue::Text("cancelled".to_string()),
    ));
    report.filters.push(ReportFilter::between(
        "issue_date",
        CellValue::Date(date(2026, 1, 1)),
        CellValue::Date(date(2026, 2, 28)),
    ));
    report.visualizations.push(Visualization {
        title: "Remaining".to_string(),
        chart_type: ChartType::Bar,
        group_by: Some("client_name".to_string()),
        value_field: Some("remaining_amount".to_string()),
        aggregation: Aggregation::Sum,
    });
    report
}

#[test]
fn create_update_and_delete_report() {
    let service = service();
    let report = service.create_report(overdue_by_client()).unwrap();
    assert_eq!(service.reports(), vec![report.clone()]);

    let mut renamed = report.clone();
    renamed.name = "Open balances".to_string();
    service.update_report(renamed).unwrap();
    service.fetch_reports().unwrap();
    assert_eq!(service.reports()[0].name, "Open balances");

    service.delete_report(report.id).unwrap();
    service.fetch_reports().unwrap();
    assert!(service.reports().is_empty());
}

#[test]
fn blank_name_and_duplicate_id_are_rejected() {
    let service = service();
    let report = service.create_report(overdue_by_client()).unwrap();

    let err = service.create_report(report.clone()).unwrap_err();
    assert!(matches!(err, ReportingError::DuplicateIdentifier(_)));

    let blank = Report::new("  ", ReportType::Custom, DataSource::Payments);
    let err = service.create_report(blank).unwrap_err();
    assert!(matches!(err, ReportingError::InvalidData(_)));
    assert_eq!(service.last_error(), Some(err));
    assert_eq!(service.reports().len(), 1);
}

#[test]
fn duplicate_report_gets_new_identity_and_no_schedule() {
    let service = service();
    let mut source = overdue_by_client();
    source.schedule = Some(ReportSchedule {
        frequency: ScheduleFrequency::Weekly,
        recipients: vec!["cfo@example.com".to_string()],
        next_run_at: None,
    });
    let source = service.create_report(source).unwrap();

    let copy = service.duplicate_report(source.id).unwrap();
    assert_ne!(copy.id, source.id);
    assert_eq!(copy.name, "Overdue by client (Copy)");
    assert_eq!(copy.filters, source.filters);
    assert_eq!(copy.schedule, None);
    assert_eq!(service.reports().len(), 2);

    let err = service.duplicate_report(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, ReportingError::NotFound(_)));
}

#[test]
fn run_report_filters_groups_and_totals_invoices() {
    let service = service();
    let report = service.create_report(overdue_by_client()).unwrap();
    let invoices = vec![
        invoice("Acme", dec!(100), InvoiceStatus::Sent, date(2026, 1, 10)),
        invoice("Acme", dec!(50.25), InvoiceStatus::Overdue, date(2026, 2, 2)),
        invoice("Globex", dec!(300), InvoiceStatus::Sent, date(2026, 2, 20)),
        invoice("Globex", dec!(999), InvoiceStatus::Cancelled, date(2026, 2, 21)),
        invoice("Initech", dec!(80), InvoiceStatus::Sent, date(2026, 3, 1)),
    ];
    let dataset = ReportDataset {
        invoices: &invoices,
        ..ReportDataset::default()
    };

    let output = service.run_report(report.id, dataset).unwrap();

    assert_eq!(output.rows.len(), 3);
    assert_eq!(output.groups.len(), 2);
    assert_eq!(output.groups[0].key, CellValue::Text("Acme".to_string()));
    assert_eq!(output.groups[0].row_count, 2);
    assert_eq!(output.groups[0].value, Some(dec!(150.25)));
    assert_eq!(output.groups[1].key, CellValue::Text("Globex".to_string()));
    assert_eq!(output.groups[1].value, Some(dec!(300)));
    assert_eq!(output.summary.row_count, 3);
    assert_eq!(output.summary.aggregate, Some(dec!(450.25)));
    assert_eq!(output.summary.total, Some(dec!(450.25)));
}

#[test]
fn run_report_rejects_fields_outside_the_data_source() {
    let service = service();
    let mut report = Report::new("Broken", ReportType::Custom, DataSource::Payments);
    report.filters.push(ReportFilter::new(
        "client_name",
        FilterOperator::Equals,
        CellValue::Text("Acme".to_string()),
    ));
    let report = service.create_report(report).unwrap();

    let err = service
        .run_report(report.id, ReportDataset::default())
        .unwrap_err();
    assert!(matches!(err, ReportingError::UnknownField(_)));
}

#[test]
fn first_dashboard_becomes_default_and_default_is_exclusive() {
    let service = service();
    let finance = service.create_dashboard(Dashboard::new("Finance")).unwrap();
    let ops = service.create_dashboard(Dashboard::new("Ops")).unwrap();
    assert!(finance.is_default);
    assert!(!ops.is_default);

    service.set_default_dashboard(ops.id).unwrap();
    let defaults: Vec<String> = service
        .dashboards()
        .into_iter()
        .filter(|dashboard| dashboard.is_default)
        .map(|dashboard| dashboard.name)
        .collect();
    assert_eq!(defaults, vec!["Ops".to_string()]);

    service.fetch_dashboards().unwrap();
    assert_eq!(
        service
            .dashboards()
            .iter()
            .filter(|dashboard| dashboard.is_default)
            .count(),
        1
    );
}

#[test]
fn widgets_follow_their_reports() {
    let service = service();
    let report = service.create_report(overdue_by_client()).unwrap();
    let dashboard = service.create_dashboard(Dashboard::new("Finance")).unwrap();

    let err = service
        .add_widget(
            dashboard.id,
            DashboardWidget::new("Ghost", WidgetKind::Chart, Some(Uuid::new_v4())),
        )
        .unwrap_err();
    assert!(matches!(err, ReportingError::NotFound(_)));

    service
        .add_widget(
            dashboard.id,
            DashboardWidget::new("Overdue", WidgetKind::Chart, Some(report.id)),
        )
        .unwrap();
    let with_metric = service
        .add_widget(
            dashboard.id,
            DashboardWidget::new("Revenue", WidgetKind::Metric, None),
        )
        .unwrap();
    assert_eq!(with_metric.widgets.len(), 2);
    assert_eq!(with_metric.widgets[1].position.column, 1);

    service.delete_report(report.id).unwrap();
    let remaining = &service.dashboards()[0].widgets;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "Revenue");

    let widget_id = remaining[0].id;
    let emptied = service.remove_widget(dashboard.id, widget_id).unwrap();
    assert!(emptied.widgets.is_empty());
    let err = service.remove_widget(dashboard.id, widget_id).unwrap_err();
    assert!(matches!(err, ReportingError::NotFound(_)));
}

#[test]
fn reports_and_dashboards_survive_reload() {
    let store = Arc::new(SqliteDocumentStore::new(open_db_in_memory().unwrap()));
    let clock = Arc::new(FixedClock::on(date(2026, 3, 15)));
    let writer = ReportingService::new(store.clone(), clock.clone());
    let report = writer.create_report(overdue_by_client()).unwrap();
    writer.create_dashboard(Dashboard::new("Finance")).unwrap();

    let reader = ReportingService::new(store, clock);
    reader.load_all().unwrap();
    assert_eq!(reader.reports(), vec![report]);
    assert_eq!(reader.dashboards().len(), 1);
    assert!(reader.dashboards()[0].is_default);
}
