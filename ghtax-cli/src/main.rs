use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

use ghtax_cli::{app, config, logging};
use ghtax_core::calculations::{VatType, WithholdingCategory};
use ghtax_core::db::DbConfig;
use ghtax_core::{DateRange, IncomeRecord, Ledger};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Ghana PAYE, SSNIT, VAT and levy calculator.
#[derive(Debug, Parser)]
#[command(name = "ghtax", version, about, long_about = None)]
struct Cli {
    /// TOML rate table. The 2024 statutory rates are used when omitted.
    #[arg(long, global = true)]
    rates: Option<PathBuf>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Storage backend to use.
    #[arg(long, global = true, default_value = "memory")]
    backend: String,

    /// Backend connection string.
    #[arg(long, global = true, default_value = ":memory:")]
    db: String,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// PAYE on a monthly taxable income.
    Paye {
        #[arg(long)]
        income: Decimal,
    },

    /// Full payslip for one employee.
    Payslip {
        #[arg(long)]
        basic: Decimal,
        #[arg(long, default_value = "0")]
        allowances: Decimal,
        #[arg(long, default_value = "0")]
        relief: Decimal,
        /// Voluntary Tier 3 rate as a fraction, e.g. 0.05.
        #[arg(long)]
        tier3: Option<Decimal>,
    },

    /// Payslips for every row of a payroll CSV.
    Payroll {
        #[arg(long)]
        file: PathBuf,
        /// Defaults to today.
        #[arg(long)]
        pay_date: Option<NaiveDate>,
    },

    /// VAT and levies on a VAT-exclusive sale.
    Sale {
        #[arg(long)]
        amount: Decimal,
    },

    /// Input VAT contained in a VAT-inclusive expense.
    Expense {
        #[arg(long)]
        amount: Decimal,
        /// standard, flat or zero.
        #[arg(long, default_value = "standard")]
        vat_type: VatType,
    },

    /// Withholding tax on a supplier payment.
    Withholding {
        #[arg(long)]
        amount: Decimal,
        /// goods, works, services or exempt.
        #[arg(long)]
        category: WithholdingCategory,
    },

    /// Check and post the entries of a journal CSV.
    Journal {
        #[arg(long)]
        file: PathBuf,
    },

    /// VAT return over sales and expense CSVs.
    VatReturn {
        #[arg(long)]
        sales: PathBuf,
        #[arg(long)]
        expenses: PathBuf,
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },

    /// Print the effective rate table as TOML.
    Rates,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open: {}", path.display()))
}

fn period(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Option<DateRange>> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => bail!("--from {from} is after --to {to}"),
        (Some(from), Some(to)) => Ok(Some(DateRange::new(from, to))),
        _ => Ok(None),
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    logging::init_logging(level, cli.log_file.as_deref())?;

    let rates = config::load_rate_table(cli.rates.as_deref())?;

    let db_config = DbConfig {
        backend: cli.backend,
        connection_string: cli.db,
    };
    debug!("opening {} backend", db_config.backend);
    let registry = app::build_registry();
    let repo = registry.create(&db_config).await?;
    let ledger = Ledger::new(&*repo, rates)?;

    let report = match cli.command {
        Command::Paye { income } => app::paye_report(ledger.rates(), income)?,
        Command::Payslip {
            basic,
            allowances,
            relief,
            tier3,
        } => {
            let mut income = IncomeRecord::new(basic, allowances, relief);
            income.tier3_rate = tier3;
            app::payslip_report(ledger.payroll_calculator(), &income)?
        }
        Command::Payroll { file, pay_date } => {
            let pay_date = pay_date.unwrap_or_else(|| Local::now().date_naive());
            app::payroll_report(&ledger, open(&file)?, pay_date)
                .await
                .with_context(|| format!("Failed to process payroll: {}", file.display()))?
        }
        Command::Sale { amount } => app::sale_report(ledger.rates(), amount)?,
        Command::Expense { amount, vat_type } => {
            app::expense_report(ledger.rates(), amount, vat_type)?
        }
        Command::Withholding { amount, category } => {
            app::withholding_report(ledger.rates(), amount, category)?
        }
        Command::Journal { file } => app::journal_report(&ledger, open(&file)?)
            .await
            .with_context(|| format!("Failed to process journal: {}", file.display()))?,
        Command::VatReturn {
            sales,
            expenses,
            from,
            to,
        } => {
            let range = period(from, to)?;
            app::vat_return_report(&ledger, open(&sales)?, open(&expenses)?, range)
                .await
                .context("Failed to build VAT return")?
        }
        Command::Rates => app::rates_report(ledger.rates())?,
    };

    print!("{report}");
    Ok(())
}
