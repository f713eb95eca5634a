use std::path::PathBuf;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

use tax_core::{FilingStatus, TaxCalculator, TaxCalculatorError, TaxComputationInput, TaxTables};
use tax_cli::app::{self, OutputFormat};
use tax_cli::config::AppConfig;
use tax_cli::utils::parse_amount;
use tax_cli::{batch, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Federal income tax estimator.
///
/// Computes adjusted gross income and the tax owed before and after credits
/// from income, filing status, deductions and credits.
#[derive(Debug, Parser)]
#[command(name = "tax-calculator", version)]
struct Cli {
    /// TOML config file with logging and table overrides.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directive (e.g. `debug`); overrides the config and RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate the tax for one set of inputs.
    Calculate(CalculateArgs),

    /// Show the standard deduction and bracket tables in use.
    Tables {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Estimate the tax for every row of a CSV file.
    Batch {
        /// CSV with columns income,filing_status[,deductions][,credits].
        #[arg(short, long)]
        file: PathBuf,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

#[derive(Debug, Args)]
struct CalculateArgs {
    /// Annual income, e.g. `50000` or `$50,000`.
    #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
    income: Decimal,

    /// Single, Married Filing Jointly, Married Filing Separately or
    /// Head of Household (codes S, MFJ, MFS, HOH also accepted).
    #[arg(long, default_value = "Single")]
    filing_status: String,

    /// Deductions claimed in addition to the standard deduction.
    #[arg(long, value_parser = parse_amount, allow_hyphen_values = true, default_value = "0")]
    deductions: Decimal,

    /// Non-refundable credits.
    #[arg(long, value_parser = parse_amount, allow_hyphen_values = true, default_value = "0")]
    credits: Decimal,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Also show how the income was split across brackets.
    #[arg(long)]
    breakdown: bool,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    app::apply_logging(&config.logging, cli.log_level.as_deref())?;

    let custom_tables: Option<TaxTables> = config.tables.load()?;
    let calculator = match &custom_tables {
        Some(tables) => TaxCalculator::new(tables),
        None => TaxCalculator::federal(),
    };
    debug!(custom_tables = custom_tables.is_some(), "tables selected");

    match cli.command {
        Command::Calculate(args) => {
            let filing_status: FilingStatus = args
                .filing_status
                .parse()
                .map_err(TaxCalculatorError::from)?;
            let input = TaxComputationInput {
                income: args.income,
                filing_status,
                deductions: args.deductions,
                credits: args.credits,
            };
            let out = app::calculate(&calculator, &input, args.format, args.breakdown)?;
            println!("{}", out.trim_end());
        }
        Command::Tables { format } => {
            let out = app::render_tables(calculator.tables(), format)?;
            println!("{}", out.trim_end());
        }
        Command::Batch { file, format } => {
            let requests = batch::load_from_file(&file)?;
            let total = requests.len();
            let outcomes = batch::compute_all(&calculator, requests);
            let (out, failed) = app::render_batch(&outcomes, format)?;
            println!("{}", out.trim_end());
            if failed > 0 {
                bail!("{failed} of {total} rows failed");
            }
        }
    }

    Ok(())
}
