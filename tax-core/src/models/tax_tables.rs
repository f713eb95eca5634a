use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::{BracketTable, StandardDeductionTable};

static FEDERAL: LazyLock<TaxTables> = LazyLock::new(|| TaxTables {
    standard_deductions: StandardDeductionTable::federal(),
    brackets: BracketTable::federal(),
});

/// The two static tables a calculation is parameterised by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTables {
    pub standard_deductions: StandardDeductionTable,
    pub brackets: BracketTable,
}

impl TaxTables {
    /// Process-wide federal tables. Built on first use and never mutated.
    pub fn federal() -> &'static TaxTables {
        &FEDERAL
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn federal_returns_the_same_instance() {
        let first = TaxTables::federal();
        let second = TaxTables::federal();

        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn federal_holds_federal_tables() {
        let tables = TaxTables::federal();

        assert_eq!(tables.brackets, BracketTable::federal());
        assert_eq!(tables.standard_deductions, StandardDeductionTable::federal());
    }
}
