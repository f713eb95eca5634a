//! Progressive income tax calculation.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Adjusted gross income: income - (deductions + standard deduction), minimum 0 |
//! | 2    | Tax before credits: each slice of AGI taxed at the rate of the bracket it falls in |
//! | 3    | Tax after credits: tax before credits - credits, minimum 0 |
//!
//! Credits are non-refundable: they can reduce the liability to zero but
//! never below it.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{FilingStatus, TaxCalculator, TaxComputationInput};
//!
//! let input = TaxComputationInput {
//!     income: dec!(50000),
//!     filing_status: FilingStatus::Single,
//!     deductions: dec!(0),
//!     credits: dec!(0),
//! };
//!
//! let result = TaxCalculator::federal().compute(&input).unwrap();
//!
//! assert_eq!(result.adjusted_gross_income, dec!(37050));
//! assert_eq!(result.tax_before_credits, dec!(4240.50));
//! assert_eq!(result.tax_after_credits, dec!(4240.50));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::floor_at_zero;
use crate::{
    BracketSlice, ParseFilingStatusError, TaxComputationInput, TaxComputationResult, TaxTables,
};

/// Errors that can occur during a tax calculation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxCalculatorError {
    /// The filing status is unknown or has no standard deduction.
    #[error("invalid filing status '{0}'")]
    InvalidFilingStatus(String),

    /// A monetary input was negative.
    #[error("{field} must not be negative, got {value}")]
    InvalidInput { field: &'static str, value: Decimal },
}

impl From<ParseFilingStatusError> for TaxCalculatorError {
    fn from(err: ParseFilingStatusError) -> Self {
        Self::InvalidFilingStatus(err.0)
    }
}

/// Calculator for federal income tax.
///
/// Holds no state beyond a shared borrow of the tables, so one instance can
/// serve any number of concurrent requests.
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    tables: &'a TaxTables,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'a TaxTables {
        self.tables
    }
}

impl TaxCalculator<'static> {
    /// A calculator over the built-in federal tables.
    pub fn federal() -> Self {
        Self::new(TaxTables::federal())
    }
}

impl Default for TaxCalculator<'static> {
    fn default() -> Self {
        Self::federal()
    }
}

impl TaxCalculator<'_> {
    /// Computes adjusted gross income and tax before and after credits.
    ///
    /// # Errors
    ///
    /// Returns [`TaxCalculatorError`] if:
    /// - income, deductions or credits is negative
    /// - the tables have no standard deduction for the filing status
    pub fn compute(
        &self,
        input: &TaxComputationInput,
    ) -> Result<TaxComputationResult, TaxCalculatorError> {
        ensure_non_negative("income", input.income)?;
        ensure_non_negative("deductions", input.deductions)?;
        ensure_non_negative("credits", input.credits)?;

        let standard_deduction = self
            .tables
            .standard_deductions
            .get(input.filing_status)
            .ok_or_else(|| {
                TaxCalculatorError::InvalidFilingStatus(input.filing_status.to_string())
            })?;

        let adjusted_gross_income =
            self.adjusted_gross_income(input.income, input.deductions, standard_deduction);

        let tax_before_credits: Decimal = self
            .bracket_slices(adjusted_gross_income)
            .iter()
            .map(|slice| slice.tax)
            .sum();

        let tax_after_credits = self.tax_after_credits(tax_before_credits, input.credits);

        debug!(
            filing_status = %input.filing_status,
            %adjusted_gross_income,
            %tax_before_credits,
            %tax_after_credits,
            "computed income tax"
        );

        Ok(TaxComputationResult {
            adjusted_gross_income,
            tax_before_credits,
            tax_after_credits,
        })
    }

    /// Splits `adjusted_gross_income` across the bracket table.
    ///
    /// Returns one slice per bracket that received income, lowest first.
    /// The slices' `taxable_amount`s sum to `adjusted_gross_income` and their
    /// `tax`es sum to the tax before credits.
    pub fn bracket_slices(
        &self,
        adjusted_gross_income: Decimal,
    ) -> Vec<BracketSlice> {
        let mut slices = Vec::new();
        let mut remaining = adjusted_gross_income;
        let mut lower_bound = Decimal::ZERO;

        for bracket in &self.tables.brackets {
            if remaining <= Decimal::ZERO {
                break;
            }

            let taxable_amount = match bracket.upper_bound {
                Some(upper_bound) => remaining.min(upper_bound - lower_bound),
                None => remaining,
            };

            slices.push(BracketSlice {
                rate: bracket.rate,
                lower_bound,
                upper_bound: bracket.upper_bound,
                taxable_amount,
                tax: taxable_amount * bracket.rate,
            });

            remaining -= taxable_amount;
            if let Some(upper_bound) = bracket.upper_bound {
                lower_bound = upper_bound;
            }
        }

        slices
    }

    /// Income left after the claimed and standard deductions, minimum 0.
    fn adjusted_gross_income(
        &self,
        income: Decimal,
        deductions: Decimal,
        standard_deduction: Decimal,
    ) -> Decimal {
        floor_at_zero(income.saturating_sub(deductions.saturating_add(standard_deduction)))
    }

    /// Non-refundable credits, so the result never drops below 0.
    fn tax_after_credits(
        &self,
        tax_before_credits: Decimal,
        credits: Decimal,
    ) -> Decimal {
        floor_at_zero(tax_before_credits - credits)
    }
}

fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), TaxCalculatorError> {
    if value < Decimal::ZERO {
        return Err(TaxCalculatorError::InvalidInput { field, value });
    }
    Ok(())
}
