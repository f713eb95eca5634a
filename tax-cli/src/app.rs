//! Rendering of calculation results, tables and batch outcomes for the
//! command line.

use std::fmt::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::calculations::common::format_usd;
use tax_core::{
    BracketSlice, TaxCalculator, TaxComputationInput, TaxComputationResult, TaxTables,
};
use tracing::{info, warn};

use crate::batch::BatchOutcome;
use crate::config::LoggingConfig;
use crate::logging;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct CalculationReport<'a> {
    input: &'a TaxComputationInput,
    result: &'a TaxComputationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    breakdown: Option<&'a [BracketSlice]>,
}

#[derive(Debug, Serialize)]
struct BatchRowReport<'a> {
    row: usize,
    input: &'a TaxComputationInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a TaxComputationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Applies the config's logging section. `override_level` (from the command
/// line) wins over the configured level.
pub fn apply_logging(
    config: &LoggingConfig,
    override_level: Option<&str>,
) -> Result<()> {
    if let Some(level) = override_level.or(config.level.as_deref()) {
        logging::set_log_level(level)?;
    }
    if let Some(path) = &config.file {
        logging::enable_file_logging(path)?;
        info!(file = %path.display(), "file logging enabled");
    }
    Ok(())
}

/// Runs one calculation and renders it.
pub fn calculate(
    calculator: &TaxCalculator<'_>,
    input: &TaxComputationInput,
    format: OutputFormat,
    with_breakdown: bool,
) -> Result<String> {
    let result = calculator.compute(input)?;
    let breakdown = with_breakdown.then(|| calculator.bracket_slices(result.adjusted_gross_income));

    match format {
        OutputFormat::Text => {
            let mut out = render_result(&result);
            if let Some(slices) = &breakdown {
                out.push('\n');
                out.push_str(&render_breakdown(slices));
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let report = CalculationReport {
                input,
                result: &result,
                breakdown: breakdown.as_deref(),
            };
            serde_json::to_string_pretty(&report).context("failed to serialize result")
        }
    }
}

/// The three result lines, one amount per line.
pub fn render_result(result: &TaxComputationResult) -> String {
    format!(
        "Adjusted Gross Income:    {}\n\
         Tax Owed Before Credits:  {}\n\
         Tax Owed After Credits:   {}\n",
        format_usd(result.adjusted_gross_income),
        format_usd(result.tax_before_credits),
        format_usd(result.tax_after_credits),
    )
}

/// One line per bracket that received income.
pub fn render_breakdown(slices: &[BracketSlice]) -> String {
    let mut out = String::from("Bracket breakdown:\n");
    for slice in slices {
        let range = match slice.upper_bound {
            Some(upper) => format!("{} - {}", format_usd(slice.lower_bound), format_usd(upper)),
            None => format!("{} and up", format_usd(slice.lower_bound)),
        };
        let _ = writeln!(
            out,
            "  {:>5}%  {:<32} {:>16} taxed {:>14}",
            percent(slice.rate),
            range,
            format_usd(slice.taxable_amount),
            format_usd(slice.tax),
        );
    }
    out
}

/// The standard deduction table followed by the bracket table.
pub fn render_tables(
    tables: &TaxTables,
    format: OutputFormat,
) -> Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(tables).context("failed to serialize tables");
    }

    let mut out = String::from("Standard deductions:\n");
    for (status, amount) in tables.standard_deductions.iter() {
        let _ = writeln!(out, "  {:<27} {:>12}", status.label(), format_usd(amount));
    }

    out.push_str("\nTax brackets:\n");
    for bracket in &tables.brackets {
        let bound = bracket
            .upper_bound
            .map(format_usd)
            .unwrap_or_else(|| "no limit".to_string());
        let _ = writeln!(
            out,
            "  {:>5}%  up to {}",
            percent(bracket.rate),
            bound
        );
    }
    Ok(out)
}

/// Renders every batch row and returns the number of failed rows alongside.
pub fn render_batch(
    outcomes: &[BatchOutcome],
    format: OutputFormat,
) -> Result<(String, usize)> {
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    for outcome in outcomes {
        if let Err(err) = &outcome.result {
            warn!(row = outcome.row, %err, "batch row failed");
        }
    }

    let out = match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for outcome in outcomes {
                let _ = writeln!(
                    out,
                    "Row {}: {} ({}), income {}, deductions {}, credits {}",
                    outcome.row,
                    outcome.input.filing_status,
                    outcome.input.filing_status.code(),
                    format_usd(outcome.input.income),
                    format_usd(outcome.input.deductions),
                    format_usd(outcome.input.credits),
                );
                match &outcome.result {
                    Ok(result) => {
                        for line in render_result(result).lines() {
                            let _ = writeln!(out, "  {line}");
                        }
                    }
                    Err(err) => {
                        let _ = writeln!(out, "  error: {err}");
                    }
                }
            }
            out
        }
        OutputFormat::Json => {
            let rows: Vec<_> = outcomes
                .iter()
                .map(|outcome| BatchRowReport {
                    row: outcome.row,
                    input: &outcome.input,
                    result: outcome.result.as_ref().ok(),
                    error: outcome.result.as_ref().err().map(ToString::to_string),
                })
                .collect();
            serde_json::to_string_pretty(&rows).context("failed to serialize batch results")?
        }
    };

    Ok((out, failed))
}

fn percent(rate: Decimal) -> String {
    (rate * Decimal::ONE_HUNDRED).normalize().to_string()
}
