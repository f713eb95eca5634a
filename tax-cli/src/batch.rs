//! CSV loader for batches of calculation requests.
//!
//! ## CSV Format
//!
//! Columns are matched by header name, so order does **not** matter. Header
//! names are case-sensitive.
//!
//! | Column          | Required | Type    | Notes                                   |
//! |-----------------|----------|---------|-----------------------------------------|
//! | `income`        | yes      | decimal | e.g. `75000.00`                         |
//! | `filing_status` | yes      | string  | Label (`Single`) or code (`S`, `MFJ`…)  |
//! | `deductions`    | no       | decimal | Empty cell or missing column means `0`  |
//! | `credits`       | no       | decimal | Empty cell or missing column means `0`  |
//!
//! ### Example
//!
//! ```csv
//! income,filing_status,deductions,credits
//! 50000,Single,,
//! 100000,Married Filing Jointly,5000,2000
//! ```
use std::path::Path;

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{TaxCalculator, TaxCalculatorError, TaxComputationInput, TaxComputationResult};

#[derive(Debug, Deserialize)]
struct CsvRow {
    income: Decimal,
    filing_status: String,
    deductions: Option<Decimal>,
    credits: Option<Decimal>,
}

/// Errors that can occur while loading a batch file.
#[derive(Debug, thiserror::Error)]
pub enum BatchLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `filing_status` cell did not name a known status. `row` is 1-based,
    /// not counting the header.
    #[error("unrecognised filing status '{status}' on row {row}")]
    InvalidFilingStatus { status: String, row: usize },
}

/// One computed row of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// 1-based row number, not counting the header.
    pub row: usize,
    pub input: TaxComputationInput,
    pub result: Result<TaxComputationResult, TaxCalculatorError>,
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<TaxComputationInput, BatchLoadError> {
    TaxComputationInput::parse(
        row.income,
        &row.filing_status,
        row.deductions.unwrap_or_default(),
        row.credits.unwrap_or_default(),
    )
    .map_err(|_| BatchLoadError::InvalidFilingStatus {
        status: row.filing_status.clone(),
        row: row_number,
    })
}

/// Parse CSV text and return one request per row, in file order.
///
/// # Errors
///
/// * [BatchLoadError::Parse] – if the CSV is structurally invalid or a
///   required field cannot be deserialised.
/// * [BatchLoadError::InvalidFilingStatus] – if any row names an unknown
///   filing status.
pub fn load_from_str(input: &str) -> Result<Vec<TaxComputationInput>, BatchLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &Path) -> anyhow::Result<Vec<TaxComputationInput>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read batch file '{}'", path.display()))?;
    let requests = load_from_str(&contents)
        .with_context(|| format!("failed to parse batch file '{}'", path.display()))?;
    Ok(requests)
}

/// Compute every request independently; a failing row does not stop the rest.
pub fn compute_all(
    calculator: &TaxCalculator<'_>,
    requests: Vec<TaxComputationInput>,
) -> Vec<BatchOutcome> {
    requests
        .into_iter()
        .enumerate()
        .map(|(idx, input)| BatchOutcome {
            row: idx + 1,
            result: calculator.compute(&input),
            input,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::FilingStatus;

    const MINIMAL_CSV: &str = "\
income,filing_status
50000,Single
";

    const FULL_CSV: &str = "\
income,filing_status,deductions,credits
50000,Single,,
100000,Married Filing Jointly,5000,2000
1000000,S,0,0
";

    // =========================================================================
    // load_from_str tests
    // =========================================================================

    #[test]
    fn test_minimal_columns_default_to_zero() {
        let requests = load_from_str(MINIMAL_CSV).unwrap();

        assert_eq!(
            requests,
            vec![TaxComputationInput {
                income: dec!(50000),
                filing_status: FilingStatus::Single,
                deductions: dec!(0),
                credits: dec!(0),
            }]
        );
    }

    #[test]
    fn test_full_columns() {
        let requests = load_from_str(FULL_CSV).unwrap();

        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].filing_status, FilingStatus::MarriedFilingJointly);
        assert_eq!(requests[1].deductions, dec!(5000));
        assert_eq!(requests[1].credits, dec!(2000));
        assert_eq!(requests[2].filing_status, FilingStatus::Single);
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let csv = "credits,filing_status,income\n100,HOH,40000\n";

        let requests = load_from_str(csv).unwrap();

        assert_eq!(requests[0].filing_status, FilingStatus::HeadOfHousehold);
        assert_eq!(requests[0].income, dec!(40000));
        assert_eq!(requests[0].credits, dec!(100));
    }

    #[test]
    fn test_header_only_yields_no_requests() {
        let requests = load_from_str("income,filing_status\n").unwrap();

        assert!(requests.is_empty());
    }

    #[test]
    fn test_invalid_filing_status_reports_row() {
        let csv = "income,filing_status\n50000,Single\n60000,Unknown\n";

        let err = load_from_str(csv).unwrap_err();

        match err {
            BatchLoadError::InvalidFilingStatus { status, row } => {
                assert_eq!(status, "Unknown");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidFilingStatus, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_column() {
        let err = load_from_str("filing_status\nSingle\n").unwrap_err();

        assert!(matches!(err, BatchLoadError::Parse(_)));
    }

    #[test]
    fn test_non_numeric_income() {
        let err = load_from_str("income,filing_status\nlots,Single\n").unwrap_err();

        assert!(matches!(err, BatchLoadError::Parse(_)));
    }

    // =========================================================================
    // compute_all tests
    // =========================================================================

    #[test]
    fn test_compute_all_numbers_rows_and_keeps_going() {
        let csv = "income,filing_status,credits\n-5,Single,\n50000,Single,\n";
        let requests = load_from_str(csv).unwrap();

        let outcomes = compute_all(&TaxCalculator::federal(), requests);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].row, 1);
        assert_eq!(
            outcomes[0].result,
            Err(TaxCalculatorError::InvalidInput {
                field: "income",
                value: dec!(-5)
            })
        );
        assert_eq!(outcomes[1].row, 2);
        assert_eq!(
            outcomes[1].result.as_ref().unwrap().tax_after_credits,
            dec!(4240.50)
        );
    }
}
