//! Loading of standard deduction and bracket tables from CSV files.
//!
//! The built-in federal tables live in `tax-core`; this crate lets a caller
//! substitute alternate tables kept in `data/`-style CSV files.

mod loader;

pub use loader::{
    BracketRecord, StandardDeductionRecord, TableLoadError, TaxTableLoader,
};
