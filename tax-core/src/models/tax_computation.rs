use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FilingStatus, ParseFilingStatusError};

/// A single calculation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputationInput {
    /// Annual income before any deduction.
    pub income: Decimal,

    /// Selects the standard deduction.
    pub filing_status: FilingStatus,

    /// Deductions claimed on top of the standard deduction.
    pub deductions: Decimal,

    /// Non-refundable credits subtracted from the computed tax.
    pub credits: Decimal,
}

impl TaxComputationInput {
    /// Builds a request from a raw filing status string as supplied by a caller.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFilingStatusError`] when `filing_status` names no known status.
    pub fn parse(
        income: Decimal,
        filing_status: &str,
        deductions: Decimal,
        credits: Decimal,
    ) -> Result<Self, ParseFilingStatusError> {
        Ok(Self {
            income,
            filing_status: filing_status.parse()?,
            deductions,
            credits,
        })
    }
}

/// Values produced by a calculation, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputationResult {
    pub adjusted_gross_income: Decimal,
    pub tax_before_credits: Decimal,
    pub tax_after_credits: Decimal,
}
