pub mod calculations;
pub mod models;

pub use calculations::{TaxCalculator, TaxCalculatorError};
pub use models::*;
