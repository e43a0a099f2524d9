//! Record mappers for reports and dashboards.

use super::{Record, RecordMapper, SchemaResult};
use crate::model::dashboard::Dashboard;
use crate::model::report::{DataSource, Report, ReportType};

impl RecordMapper for Report {
    const RECORD_TYPE: &'static str = "Report";
    const SCHEMA_VERSION: i64 = 1;

    fn record_id(&self) -> String {
        self.id.to_string()
    }

    fn to_record(&self) -> SchemaResult<Record> {
        let mut record = Record::versioned(Self::RECORD_TYPE, self.record_id(), Self::SCHEMA_VERSION);
        record.set("name", self.name.as_str());
        record.set_opt("description", self.description.clone());
        record.set("report_type", self.report_type.as_str());
        record.set("data_source", self.data_source.as_str());
        record.set("created_at", self.created_at);
        record.set("updated_at", self.updated_at);
        record.set_blob("filters", &self.filters)?;
        record.set_blob("visualizations", &self.visualizations)?;
        record.set_blob("formatting", &self.formatting)?;
        if let Some(schedule) = &self.schedule {
            record.set_blob("schedule", schedule)?;
        }
        Ok(record)
    }

    fn from_record(record: &Record) -> SchemaResult<Self> {
        record.expect_type(Self::RECORD_TYPE)?;
        record.check_schema_version(Self::SCHEMA_VERSION)?;

        Ok(Self {
            id: record.id_uuid()?,
            name: record.text("name")?.to_string(),
            description: record.opt_text("description")?,
            report_type: record.enumeration("report_type", ReportType::parse)?,
            data_source: record.enumeration("data_source", DataSource::parse)?,
            filters: record.blob("filters")?,
            visualizations: record.blob("visualizations")?,
            formatting: record.blob("formatting")?,
            schedule: record.opt_blob("schedule")?,
            created_at: record.timestamp("created_at")?,
            updated_at: record.timestamp("updated_at")?,
        })
    }
}

impl RecordMapper for Dashboard {
    const RECORD_TYPE: &'static str = "Dashboard";
    const SCHEMA_VERSION: i64 = 1;

    fn record_id(&self) -> String {
        self.id.to_string()
    }

    fn to_record(&self) -> SchemaResult<Record> {
        let mut record = Record::versioned(Self::RECORD_TYPE, self.record_id(), Self::SCHEMA_VERSION);
        record.set("name", self.name.as_str());
        record.set_opt("description", self.description.clone());
        record.set("refresh_interval_secs", i64::from(self.refresh_interval_secs));
        record.set("is_default", self.is_default);
        record.set("created_at", self.created_at);
        record.set("updated_at", self.updated_at);
        record.set_blob("widgets", &self.widgets)?;
        Ok(record)
    }

    fn from_record(record: &Record) -> SchemaResult<Self> {
        record.expect_type(Self::RECORD_TYPE)?;
        record.check_schema_version(Self::SCHEMA_VERSION)?;

        let refresh = record.integer("refresh_interval_secs")?;
        let refresh_interval_secs =
            u32::try_from(refresh).map_err(|_| super::SchemaError::InvalidValue {
                field: "refresh_interval_secs".to_string(),
                message: format!("{refresh} is out of range"),
            })?;

        Ok(Self {
            id: record.id_uuid()?,
            name: record.text("name")?.to_string(),
            description: record.opt_text("description")?,
            widgets: record.blob("widgets")?,
            refresh_interval_secs,
            is_default: record.boolean("is_default")?,
            created_at: record.timestamp("created_at")?,
            updated_at: record.timestamp("updated_at")?,
        })
    }
}
