mod filing_status;
mod standard_deduction;
mod table_error;
mod tax_bracket;
mod tax_computation;
mod tax_tables;

pub use filing_status::{FilingStatus, ParseFilingStatusError};
pub use standard_deduction::StandardDeductionTable;
pub use table_error::TableError;
pub use tax_bracket::{BracketSlice, BracketTable, TaxBracket};
pub use tax_computation::{TaxComputationInput, TaxComputationResult};
pub use tax_tables::TaxTables;
