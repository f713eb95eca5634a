use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    BracketTable, FilingStatus, StandardDeductionTable, TableError, TaxBracket, TaxTables,
};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading table data.
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unrecognised filing status '{status}' on row {row}")]
    InvalidFilingStatus { status: String, row: usize },

    #[error("invalid {table} table: {source}")]
    InvalidTable {
        table: &'static str,
        #[source]
        source: TableError,
    },

    #[error("failed to open '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<csv::Error> for TableLoadError {
    fn from(err: csv::Error) -> Self {
        TableLoadError::CsvParse(err.to_string())
    }
}

/// A single row of the bracket CSV file.
///
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.10 for 10%)
/// - `upper_bound`: Cumulative income up to which the rate applies (empty for unlimited)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub rate: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
}

/// A single row of the standard deduction CSV file.
///
/// `filing_status` accepts anything [`FilingStatus`] parses: the label
/// ("Head of Household") or the short code ("HOH").
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StandardDeductionRecord {
    pub filing_status: String,
    pub amount: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn read_records<R, T>(reader: R) -> Result<Vec<T>, TableLoadError>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        records.push(result?);
    }

    Ok(records)
}

fn open(path: &Path) -> Result<File, TableLoadError> {
    File::open(path).map_err(|source| TableLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loader for deduction and bracket tables stored as CSV.
///
/// Every table is validated by `tax-core` before it is returned, so a
/// successful load always yields tables the calculator can use.
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse a bracket table from CSV with columns `rate,upper_bound`.
    ///
    /// Rows must be in ascending order; only the last row may leave
    /// `upper_bound` empty.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<BracketTable, TableLoadError> {
        let records: Vec<BracketRecord> = read_records(reader)?;
        debug!(rows = records.len(), "parsed bracket records");

        let brackets = records
            .into_iter()
            .map(|record| TaxBracket {
                rate: record.rate,
                upper_bound: record.upper_bound,
            })
            .collect();

        BracketTable::new(brackets).map_err(|source| TableLoadError::InvalidTable {
            table: "bracket",
            source,
        })
    }

    /// Parse a standard deduction table from CSV with columns `filing_status,amount`.
    pub fn parse_standard_deductions<R: Read>(
        reader: R
    ) -> Result<StandardDeductionTable, TableLoadError> {
        let records: Vec<StandardDeductionRecord> = read_records(reader)?;
        debug!(rows = records.len(), "parsed standard deduction records");

        let entries = records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| {
                let status = record.filing_status.parse::<FilingStatus>().map_err(|_| {
                    TableLoadError::InvalidFilingStatus {
                        status: record.filing_status.clone(),
                        row: idx + 1,
                    }
                })?;
                Ok((status, record.amount))
            })
            .collect::<Result<Vec<_>, TableLoadError>>()?;

        StandardDeductionTable::new(entries).map_err(|source| TableLoadError::InvalidTable {
            table: "standard deduction",
            source,
        })
    }

    /// Read both tables from disk.
    pub fn load(
        standard_deductions: &Path,
        brackets: &Path,
    ) -> Result<TaxTables, TableLoadError> {
        let tables = TaxTables {
            standard_deductions: Self::parse_standard_deductions(open(standard_deductions)?)?,
            brackets: Self::parse_brackets(open(brackets)?)?,
        };

        info!(
            standard_deductions = %standard_deductions.display(),
            brackets = %brackets.display(),
            bracket_count = tables.brackets.len(),
            "loaded tax tables"
        );

        Ok(tables)
    }
}
