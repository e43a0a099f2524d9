//! Record mappers for invoices, payments and bank accounts.

use super::{Record, RecordMapper, SchemaResult};
use crate::model::bank_account::{BankAccount, BankAccountType};
use crate::model::invoice::{Invoice, InvoiceStatus};
use crate::model::payment::{PaymentMethod, PaymentRecord, PaymentStatus};

impl RecordMapper for Invoice {
    const RECORD_TYPE: &'static str = "Invoice";
    const SCHEMA_VERSION: i64 = 1;

    fn record_id(&self) -> String {
        self.id.to_string()
    }

    fn to_record(&self) -> SchemaResult<Record> {
        let mut record = Record::versioned(Self::RECORD_TYPE, self.record_id(), Self::SCHEMA_VERSION);
        record.set("invoice_number", self.invoice_number.as_str());
        record.set("client_id", self.client_id);
        record.set("client_name", self.client_name.as_str());
        record.set("issue_date", self.issue_date);
        record.set("due_date", self.due_date);
        record.set("status", self.status.as_str());
        record.set("subtotal", self.subtotal);
        record.set("tax_amount", self.tax_amount);
        record.set("discount_amount", self.discount_amount);
        record.set("total_amount", self.total_amount);
        record.set("currency", self.currency.as_str());
        record.set_opt("notes", self.notes.clone());
        record.set_opt("payment_terms", self.payment_terms.clone());
        record.set("created_at", self.created_at);
        record.set("updated_at", self.updated_at);
        record.set_blob("line_items", &self.line_items)?;
        record.set_blob("payment_history", &self.payment_history)?;
        record.set_blob("tax_details", &self.tax_details)?;
        Ok(record)
    }

    fn from_record(record: &Record) -> SchemaResult<Self> {
        record.expect_type(Self::RECORD_TYPE)?;
        record.check_schema_version(Self::SCHEMA_VERSION)?;

        Ok(Self {
            id: record.id_uuid()?,
            invoice_number: record.text("invoice_number")?.to_string(),
            client_id: record.uuid("client_id")?,
            client_name: record.text("client_name")?.to_string(),
            issue_date: record.date("issue_date")?,
            due_date: record.date("due_date")?,
            status: record.enumeration("status", InvoiceStatus::parse)?,
            line_items: record.blob("line_items")?,
            subtotal: record.decimal("subtotal")?,
            tax_amount: record.decimal("tax_amount")?,
            discount_amount: record.decimal("discount_amount")?,
            total_amount: record.decimal("total_amount")?,
            currency: record.text("currency")?.to_string(),
            notes: record.opt_text("notes")?,
            payment_terms: record.opt_text("payment_terms")?,
            payment_history: record.blob("payment_history")?,
            tax_details: record.blob("tax_details")?,
            created_at: record.timestamp("created_at")?,
            updated_at: record.timestamp("updated_at")?,
        })
    }
}

impl RecordMapper for PaymentRecord {
    const RECORD_TYPE: &'static str = "PaymentRecord";
    const SCHEMA_VERSION: i64 = 1;

    fn record_id(&self) -> String {
        self.id.to_string()
    }

    fn to_record(&self) -> SchemaResult<Record> {
        let mut record = Record::versioned(Self::RECORD_TYPE, self.record_id(), Self::SCHEMA_VERSION);
        record.set("invoice_id", self.invoice_id);
        record.set("amount", self.amount);
        record.set("currency", self.currency.as_str());
        record.set("method", self.method.as_str());
        record.set("status", self.status.as_str());
        record.set("payment_date", self.payment_date);
        record.set_opt("reference", self.reference.clone());
        record.set_opt("fees", self.fees);
        record.set_opt("notes", self.notes.clone());
        record.set_blob("refunds", &self.refunds)?;
        Ok(record)
    }

    fn from_record(record: &Record) -> SchemaResult<Self> {
        record.expect_type(Self::RECORD_TYPE)?;
        record.check_schema_version(Self::SCHEMA_VERSION)?;

        Ok(Self {
            id: record.id_uuid()?,
            invoice_id: record.uuid("invoice_id")?,
            amount: record.decimal("amount")?,
            currency: record.text("currency")?.to_string(),
            method: record.enumeration("method", PaymentMethod::parse)?,
            status: record.enumeration("status", PaymentStatus::parse)?,
            payment_date: record.timestamp("payment_date")?,
            reference: record.opt_text("reference")?,
            fees: record.opt_decimal("fees")?,
            refunds: record.blob("refunds")?,
            notes: record.opt_text("notes")?,
        })
    }
}

impl RecordMapper for BankAccount {
    const RECORD_TYPE: &'static str = "BankAccount";
    const SCHEMA_VERSION: i64 = 1;

    fn record_id(&self) -> String {
        self.id.to_string()
    }

    fn to_record(&self) -> SchemaResult<Record> {
        let mut record = Record::versioned(Self::RECORD_TYPE, self.record_id(), Self::SCHEMA_VERSION);
        record.set("account_name", self.account_name.as_str());
        record.set("bank_name", self.bank_name.as_str());
        record.set("account_number_masked", self.account_number_masked.as_str());
        record.set("account_type", self.account_type.as_str());
        record.set("currency", self.currency.as_str());
        record.set("current_balance", self.current_balance);
        record.set("is_primary", self.is_primary);
        record.set("is_active", self.is_active);
        record.set_opt("last_synced_at", self.last_synced_at);
        Ok(record)
    }

    fn from_record(record: &Record) -> SchemaResult<Self> {
        record.expect_type(Self::RECORD_TYPE)?;
        record.check_schema_version(Self::SCHEMA_VERSION)?;

        Ok(Self {
            id: record.id_uuid()?,
            account_name: record.text("account_name")?.to_string(),
            bank_name: record.text("bank_name")?.to_string(),
            account_number_masked: record.text("account_number_masked")?.to_string(),
            account_type: record.enumeration("account_type", BankAccountType::parse)?,
            currency: record.text("currency")?.to_string(),
            current_balance: record.decimal("current_balance")?,
            is_primary: record.boolean("is_primary")?,
            is_active: record.boolean("is_active")?,
            last_synced_at: record.opt_timestamp("last_synced_at")?,
        })
    }
}
