//! CSV export of invoices and payments.
//!
//! Fixed column order, one header line, one line per record. Fields that
//! contain commas, quotes or newlines are quoted by the `csv` writer.

use crate::model::invoice::Invoice;
use crate::model::payment::PaymentRecord;
use csv::WriterBuilder;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

pub const INVOICE_CSV_HEADER: [&str; 10] = [
    "Invoice Number",
    "Client",
    "Issue Date",
    "Due Date",
    "Status",
    "Subtotal",
    "Tax",
    "Discount",
    "Total",
    "Currency",
];

pub const PAYMENT_CSV_HEADER: [&str; 8] = [
    "Payment ID",
    "Invoice ID",
    "Amount",
    "Currency",
    "Method",
    "Status",
    "Date",
    "Reference",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Io(std::io::Error),
    Encoding(std::string::FromUtf8Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "csv write failed: {err}"),
            Self::Io(err) => write!(f, "csv flush failed: {err}"),
            Self::Encoding(err) => write!(f, "csv output is not UTF-8: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Encoding(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

pub fn write_invoices_csv<W: Write>(writer: W, invoices: &[Invoice]) -> Result<(), ExportError> {
    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(INVOICE_CSV_HEADER)?;
    for invoice in invoices {
        csv.write_record([
            invoice.invoice_number.clone(),
            invoice.client_name.clone(),
            invoice.issue_date.format(DATE_FORMAT).to_string(),
            invoice.due_date.format(DATE_FORMAT).to_string(),
            invoice.status.as_str().to_string(),
            invoice.subtotal.to_string(),
            invoice.tax_amount.to_string(),
            invoice.discount_amount.to_string(),
            invoice.total_amount.to_string(),
            invoice.currency.clone(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_payments_csv<W: Write>(
    writer: W,
    payments: &[PaymentRecord],
) -> Result<(), ExportError> {
    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(PAYMENT_CSV_HEADER)?;
    for payment in payments {
        csv.write_record([
            payment.id.to_string(),
            payment.invoice_id.to_string(),
            payment.amount.to_string(),
            payment.currency.clone(),
            payment.method.as_str().to_string(),
            payment.status.as_str().to_string(),
            payment.payment_date.format(DATE_FORMAT).to_string(),
            payment.reference.clone().unwrap_or_default(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn export_invoices_csv(invoices: &[Invoice]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_invoices_csv(&mut buffer, invoices)?;
    String::from_utf8(buffer).map_err(ExportError::Encoding)
}

pub fn export_payments_csv(payments: &[PaymentRecord]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_payments_csv(&mut buffer, payments)?;
    String::from_utf8(buffer).map_err(ExportError::Encoding)
}
