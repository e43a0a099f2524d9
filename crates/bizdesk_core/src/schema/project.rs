//! Record mappers for project boards and tasks.

use super::{Record, RecordMapper, SchemaResult};
use crate::model::project::{ProjectBoard, ProjectTask, TaskPriority, TaskStatus};

impl RecordMapper for ProjectBoard {
    const RECORD_TYPE: &'static str = "ProjectBoard";
    const SCHEMA_VERSION: i64 = 1;

    fn record_id(&self) -> String {
        self.id.to_string()
    }

    fn to_record(&self) -> SchemaResult<Record> {
        let mut record = Record::versioned(Self::RECORD_TYPE, self.record_id(), Self::SCHEMA_VERSION);
        record.set("name", self.name.as_str());
        record.set_opt("description", self.description.clone());
        record.set("is_archived", self.is_archived);
        record.set("created_at", self.created_at);
        record.set_blob("columns", &self.columns)?;
        Ok(record)
    }

    fn from_record(record: &Record) -> SchemaResult<Self> {
        record.expect_type(Self::RECORD_TYPE)?;
        record.check_schema_version(Self::SCHEMA_VERSION)?;

        Ok(Self {
            id: record.id_uuid()?,
            name: record.text("name")?.to_string(),
            description: record.opt_text("description")?,
            columns: record.blob("columns")?,
            is_archived: record.boolean("is_archived")?,
            created_at: record.timestamp("created_at")?,
        })
    }
}

impl RecordMapper for ProjectTask {
    const RECORD_TYPE: &'static str = "ProjectTask";
    const SCHEMA_VERSION: i64 = 1;

    fn record_id(&self) -> String {
        self.id.to_string()
    }

    fn to_record(&self) -> SchemaResult<Record> {
        let mut record = Record::versioned(Self::RECORD_TYPE, self.record_id(), Self::SCHEMA_VERSION);
        record.set("board_id", self.board_id);
        record.set("title", self.title.as_str());
        record.set_opt("description", self.description.clone());
        record.set("status", self.status.as_str());
        record.set("priority", self.priority.as_str());
        record.set_opt("assignee", self.assignee.clone());
        record.set_opt("due_date", self.due_date);
        record.set_opt("estimated_hours", self.estimated_hours);
        record.set("created_at", self.created_at);
        record.set("updated_at", self.updated_at);
        Ok(record)
    }

    fn from_record(record: &Record) -> SchemaResult<Self> {
        record.expect_type(Self::RECORD_TYPE)?;
        record.check_schema_version(Self::SCHEMA_VERSION)?;

        Ok(Self {
            id: record.id_uuid()?,
            board_id: record.uuid("board_id")?,
            title: record.text("title")?.to_string(),
            description: record.opt_text("description")?,
            status: record.enumeration("status", TaskStatus::parse)?,
            priority: record.enumeration("priority", TaskPriority::parse)?,
            assignee: record.opt_text("assignee")?,
            due_date: record.opt_date("due_date")?,
            estimated_hours: record.opt_decimal("estimated_hours")?,
            created_at: record.timestamp("created_at")?,
            updated_at: record.timestamp("updated_at")?,
        })
    }
}
