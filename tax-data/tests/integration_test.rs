//! Integration tests for table loading from the CSV files on disk.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::{FilingStatus, TableError, TaxCalculator, TaxComputationInput, TaxTables};
use tax_data::{TableLoadError, TaxTableLoader};

fn crate_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn test_shipped_tables_match_built_in_tables() {
    let tables = TaxTableLoader::load(
        &crate_path("data/standard_deductions.csv"),
        &crate_path("data/tax_brackets.csv"),
    )
    .expect("Failed to load shipped tables");

    assert_eq!(&tables, TaxTables::federal());
}

#[test]
fn test_loaded_tables_drive_calculator() {
    let tables = TaxTableLoader::load(
        &crate_path("tests/fixtures/coded_deductions.csv"),
        &crate_path("tests/fixtures/flat_brackets.csv"),
    )
    .expect("Failed to load fixture tables");
    let calculator = TaxCalculator::new(&tables);

    let input = TaxComputationInput {
        income: dec!(50000),
        filing_status: FilingStatus::HeadOfHousehold,
        deductions: dec!(5000),
        credits: dec!(1000),
    };
    let result = calculator.compute(&input).expect("calculation should succeed");

    // AGI: 50000 - (5000 + 15000) = 30000; 30000 * 0.15 = 4500
    assert_eq!(result.adjusted_gross_income, dec!(30000));
    assert_eq!(result.tax_before_credits, dec!(4500));
    assert_eq!(result.tax_after_credits, dec!(3500));
}

#[test]
fn test_out_of_order_brackets_are_rejected() {
    let err = TaxTableLoader::load(
        &crate_path("data/standard_deductions.csv"),
        &crate_path("tests/fixtures/bad_brackets.csv"),
    )
    .expect_err("descending bounds should be rejected");

    assert!(matches!(
        err,
        TableLoadError::InvalidTable {
            table: "bracket",
            source: TableError::NonIncreasingBound { index: 1, .. }
        }
    ));
}
