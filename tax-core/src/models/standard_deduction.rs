use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FilingStatus, TableError};

const FEDERAL_STANDARD_DEDUCTIONS: [(FilingStatus, i64); 4] = [
    (FilingStatus::Single, 12_950),
    (FilingStatus::MarriedFilingJointly, 25_900),
    (FilingStatus::MarriedFilingSeparately, 12_950),
    (FilingStatus::HeadOfHousehold, 19_400),
];

/// Standard deduction amount for every [`FilingStatus`].
///
/// Construction guarantees exactly one non-negative amount per status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<FilingStatus, Decimal>",
    into = "BTreeMap<FilingStatus, Decimal>"
)]
pub struct StandardDeductionTable {
    amounts: BTreeMap<FilingStatus, Decimal>,
}

impl StandardDeductionTable {
    /// Builds a table from `(status, amount)` pairs.
    ///
    /// # Errors
    ///
    /// - [`TableError::DuplicateDeduction`] if a status appears twice
    /// - [`TableError::NegativeDeduction`] if an amount is below zero
    /// - [`TableError::MissingDeduction`] if a status has no entry
    pub fn new<I>(entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (FilingStatus, Decimal)>,
    {
        let mut amounts = BTreeMap::new();

        for (status, amount) in entries {
            if amount < Decimal::ZERO {
                return Err(TableError::NegativeDeduction { status, amount });
            }
            if amounts.insert(status, amount).is_some() {
                return Err(TableError::DuplicateDeduction(status));
            }
        }

        if let Some(missing) = FilingStatus::ALL
            .into_iter()
            .find(|status| !amounts.contains_key(status))
        {
            return Err(TableError::MissingDeduction(missing));
        }

        Ok(Self { amounts })
    }

    pub fn federal() -> Self {
        let amounts = FEDERAL_STANDARD_DEDUCTIONS
            .into_iter()
            .map(|(status, amount)| (status, Decimal::from(amount)))
            .collect();

        Self { amounts }
    }

    pub fn get(
        &self,
        status: FilingStatus,
    ) -> Option<Decimal> {
        self.amounts.get(&status).copied()
    }

    /// Entries in [`FilingStatus`] declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FilingStatus, Decimal)> + '_ {
        self.amounts.iter().map(|(status, amount)| (*status, *amount))
    }
}

impl TryFrom<BTreeMap<FilingStatus, Decimal>> for StandardDeductionTable {
    type Error = TableError;

    fn try_from(amounts: BTreeMap<FilingStatus, Decimal>) -> Result<Self, Self::Error> {
        Self::new(amounts)
    }
}

impl From<StandardDeductionTable> for BTreeMap<FilingStatus, Decimal> {
    fn from(table: StandardDeductionTable) -> Self {
        table.amounts
    }
}
