//! Federal income tax calculation.
//!
//! [`TaxCalculator`] turns a [`TaxComputationInput`](crate::TaxComputationInput)
//! into adjusted gross income, tax before credits and tax after credits using
//! a standard deduction table and a marginal bracket table.

pub mod common;
pub mod income_tax;

pub use income_tax::{TaxCalculator, TaxCalculatorError};
