//! BizDesk command-line front end.
//!
//! # Responsibility
//! - Run read-mostly jobs (analytics, reconciliation, CSV export) against a
//!   local store file.
//! - Keep output deterministic: `key=value` lines or raw CSV.

use bizdesk_core::financial::{write_invoices_csv, write_payments_csv};
use bizdesk_core::{
    core_version, init_logging_from_config, open_db, AppConfig, Clock, FinancialService,
    FinancialSettings, FixedClock, SqliteDocumentStore, SystemClock,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use std::error::Error;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "bizdesk", version, about = "Invoicing and payments toolkit")]
struct Cli {
    /// Store database file (overrides `db_path` from the config file).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output file (stdout when omitted).
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Evaluate overdue status as of this date (YYYY-MM-DD) instead of today.
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print revenue, outstanding and overdue figures.
    Analytics,
    /// Recompute every invoice status from its payments and persist changes.
    Reconcile,
    /// Write all invoices as CSV.
    ExportInvoices,
    /// Write all payments as CSV.
    ExportPayments,
    /// Print the core library version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut out = open_output(cli.out.as_ref())?;
    if let Command::Version = cli.command {
        writeln!(out, "bizdesk_core version={}", core_version())?;
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    init_logging_from_config(&config)?;

    let db_path = cli
        .db
        .clone()
        .or_else(|| config.db_path.clone())
        .ok_or("no database file: pass --db or set db_path in the config file")?;
    let store = Arc::new(SqliteDocumentStore::new(open_db(&db_path)?));
    let clock: Arc<dyn Clock> = match cli.today {
        Some(date) => Arc::new(FixedClock::on(date)),
        None => Arc::new(SystemClock),
    };
    let service = FinancialService::new(store, clock, FinancialSettings::from_config(&config));
    let reconciled = service.load_and_reconcile()?;
    info!(
        "event=cli_command module=cli status=start command={:?} db={}",
        cli.command,
        db_path.display()
    );

    match cli.command {
        Command::Analytics => {
            let analytics = service.analytics();
            writeln!(out, "invoices={}", analytics.invoice_count)?;
            writeln!(out, "paid={}", analytics.paid_count)?;
            writeln!(out, "overdue={}", analytics.overdue_count)?;
            writeln!(out, "total_revenue={}", analytics.total_revenue)?;
            writeln!(out, "outstanding_amount={}", analytics.outstanding_amount)?;
            writeln!(out, "overdue_amount={}", analytics.overdue_amount)?;
            writeln!(out, "average_invoice_amount={}", analytics.average_invoice_amount)?;
            if let Some(days) = analytics.average_days_to_payment {
                writeln!(out, "average_days_to_payment={days}")?;
            }
            if let Some(rate) = analytics.collection_rate {
                writeln!(out, "collection_rate={rate}")?;
            }
            for (month, revenue) in &analytics.revenue_by_month {
                writeln!(out, "revenue_month.{month}={revenue}")?;
            }
            for (method, count) in &analytics.payment_method_counts {
                writeln!(out, "payment_method.{}={count}", method.as_str())?;
            }
        }
        Command::Reconcile => {
            for outcome in &reconciled {
                writeln!(
                    out,
                    "invoice={} from={} to={} total_paid={} remaining={}",
                    outcome.invoice_id,
                    outcome.previous_status,
                    outcome.status,
                    outcome.total_paid,
                    outcome.remaining_amount
                )?;
            }
            writeln!(out, "changed={}", reconciled.len())?;
        }
        Command::ExportInvoices => write_invoices_csv(&mut out, &service.invoices())?,
        Command::ExportPayments => write_payments_csv(&mut out, &service.payments())?,
        Command::Version => {}
    }

    out.flush()?;
    Ok(())
}

fn open_output(path: Option<&PathBuf>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    })
}
