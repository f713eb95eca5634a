use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TableError;

/// Federal marginal brackets as (rate in hundredths, cumulative upper bound in dollars).
const FEDERAL_BRACKETS: [(i64, Option<i64>); 7] = [
    (10, Some(10_275)),
    (12, Some(41_775)),
    (22, Some(89_075)),
    (24, Some(170_050)),
    (32, Some(215_950)),
    (35, Some(539_900)),
    (37, None),
];

/// One marginal bracket.
///
/// `upper_bound` is the cumulative income up to which `rate` applies.
/// `None` marks the top bracket, which covers all remaining income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub rate: Decimal,
    pub upper_bound: Option<Decimal>,
}

/// An ordered, validated sequence of [`TaxBracket`]s.
///
/// The bounds partition `[0, ∞)` into contiguous segments starting at zero,
/// rates never decrease, and the last bracket is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

/// The portion of income that fell into a single bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub rate: Decimal,
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub taxable_amount: Decimal,
    pub tax: Decimal,
}

impl BracketTable {
    /// Validates `brackets` and wraps them in a table.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] describing the first violated rule.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, TableError> {
        if brackets.is_empty() {
            return Err(TableError::EmptyBrackets);
        }

        let last = brackets.len() - 1;
        let mut previous_rate = Decimal::ZERO;
        let mut previous_bound = Decimal::ZERO;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(TableError::RateOutOfRange {
                    index,
                    rate: bracket.rate,
                });
            }
            if bracket.rate < previous_rate {
                return Err(TableError::DecreasingRate {
                    index,
                    rate: bracket.rate,
                    previous: previous_rate,
                });
            }
            previous_rate = bracket.rate;

            match bracket.upper_bound {
                Some(bound) if index == last => return Err(TableError::BoundedLastBracket(bound)),
                Some(bound) if bound <= previous_bound => {
                    return Err(TableError::NonIncreasingBound {
                        index,
                        bound,
                        previous: previous_bound,
                    });
                }
                Some(bound) => previous_bound = bound,
                None if index != last => return Err(TableError::UnboundedBracketNotLast(index)),
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    /// The federal bracket schedule used when no other table is configured.
    pub fn federal() -> Self {
        let brackets = FEDERAL_BRACKETS
            .iter()
            .map(|&(rate, bound)| TaxBracket {
                rate: Decimal::new(rate, 2),
                upper_bound: bound.map(Decimal::from),
            })
            .collect();

        Self { brackets }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaxBracket> {
        self.brackets.iter()
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = TableError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}

impl<'a> IntoIterator for &'a BracketTable {
    type Item = &'a TaxBracket;
    type IntoIter = std::slice::Iter<'a, TaxBracket>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn bracket(
        rate: Decimal,
        upper_bound: Option<Decimal>,
    ) -> TaxBracket {
        TaxBracket { rate, upper_bound }
    }

    #[test]
    fn federal_table_passes_validation() {
        let federal = BracketTable::federal();

        let validated = BracketTable::new(federal.brackets().to_vec());

        assert_eq!(validated, Ok(federal));
    }

    #[test]
    fn federal_table_matches_published_schedule() {
        let federal = BracketTable::federal();

        assert_eq!(federal.len(), 7);
        assert_eq!(federal.brackets()[0], bracket(dec!(0.10), Some(dec!(10275))));
        assert_eq!(federal.brackets()[3], bracket(dec!(0.24), Some(dec!(170050))));
        assert_eq!(federal.brackets()[5], bracket(dec!(0.35), Some(dec!(539900))));
        assert_eq!(federal.brackets()[6], bracket(dec!(0.37), None));
    }

    #[test]
    fn single_unbounded_bracket_is_valid() {
        let table = BracketTable::new(vec![bracket(dec!(0.20), None)]);

        assert!(table.is_ok());
    }

    #[test]
    fn rejects_empty_table() {
        assert_eq!(BracketTable::new(vec![]), Err(TableError::EmptyBrackets));
    }

    #[test]
    fn rejects_rate_above_one() {
        let result = BracketTable::new(vec![bracket(dec!(1.5), None)]);

        assert_eq!(
            result,
            Err(TableError::RateOutOfRange {
                index: 0,
                rate: dec!(1.5)
            })
        );
    }

    #[test]
    fn rejects_negative_rate() {
        let result = BracketTable::new(vec![bracket(dec!(-0.1), None)]);

        assert!(matches!(result, Err(TableError::RateOutOfRange { index: 0, .. })));
    }

    #[test]
    fn rejects_decreasing_rate() {
        let result = BracketTable::new(vec![
            bracket(dec!(0.20), Some(dec!(1000))),
            bracket(dec!(0.10), None),
        ]);

        assert_eq!(
            result,
            Err(TableError::DecreasingRate {
                index: 1,
                rate: dec!(0.10),
                previous: dec!(0.20)
            })
        );
    }

    #[test]
    fn rejects_non_increasing_bounds() {
        let result = BracketTable::new(vec![
            bracket(dec!(0.10), Some(dec!(1000))),
            bracket(dec!(0.12), Some(dec!(1000))),
            bracket(dec!(0.22), None),
        ]);

        assert_eq!(
            result,
            Err(TableError::NonIncreasingBound {
                index: 1,
                bound: dec!(1000),
                previous: dec!(1000)
            })
        );
    }

    #[test]
    fn rejects_zero_first_bound() {
        let result = BracketTable::new(vec![
            bracket(dec!(0.10), Some(dec!(0))),
            bracket(dec!(0.12), None),
        ]);

        assert!(matches!(result, Err(TableError::NonIncreasingBound { index: 0, .. })));
    }

    #[test]
    fn rejects_bounded_last_bracket() {
        let result = BracketTable::new(vec![
            bracket(dec!(0.10), Some(dec!(1000))),
            bracket(dec!(0.12), Some(dec!(5000))),
        ]);

        assert_eq!(result, Err(TableError::BoundedLastBracket(dec!(5000))));
    }

    #[test]
    fn rejects_unbounded_bracket_before_last() {
        let result = BracketTable::new(vec![
            bracket(dec!(0.10), None),
            bracket(dec!(0.12), None),
        ]);

        assert_eq!(result, Err(TableError::UnboundedBracketNotLast(0)));
    }

    #[test]
    fn deserialization_validates_table() {
        let json = r#"[{"rate":"0.30","upper_bound":"100"},{"rate":"0.10","upper_bound":null}]"#;

        let result: Result<BracketTable, _> = serde_json::from_str(json);

        let err = result.expect_err("decreasing rate should be rejected");
        assert!(err.to_string().contains("lower than the previous rate"));
    }
}
