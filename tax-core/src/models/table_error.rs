use rust_decimal::Decimal;
use thiserror::Error;

use super::FilingStatus;

/// Reasons a standard deduction table or bracket table is rejected.
///
/// Bracket indices are zero-based positions in the table as supplied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("bracket table is empty")]
    EmptyBrackets,

    #[error("bracket {index} has rate {rate} outside [0, 1]")]
    RateOutOfRange { index: usize, rate: Decimal },

    #[error("bracket {index} rate {rate} is lower than the previous rate {previous}")]
    DecreasingRate {
        index: usize,
        rate: Decimal,
        previous: Decimal,
    },

    #[error("bracket {index} upper bound {bound} does not exceed the previous bound {previous}")]
    NonIncreasingBound {
        index: usize,
        bound: Decimal,
        previous: Decimal,
    },

    #[error("last bracket must be unbounded, found upper bound {0}")]
    BoundedLastBracket(Decimal),

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBracketNotLast(usize),

    #[error("no standard deduction for filing status '{0}'")]
    MissingDeduction(FilingStatus),

    #[error("more than one standard deduction for filing status '{0}'")]
    DuplicateDeduction(FilingStatus),

    #[error("standard deduction for '{status}' is negative: {amount}")]
    NegativeDeduction {
        status: FilingStatus,
        amount: Decimal,
    },
}
