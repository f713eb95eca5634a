use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string does not name one of the supported filing statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognised filing status '{0}'")]
pub struct ParseFilingStatusError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
}

impl FilingStatus {
    /// Every filing status, in the order they are presented to a user.
    pub const ALL: [FilingStatus; 4] = [
        Self::Single,
        Self::MarriedFilingJointly,
        Self::MarriedFilingSeparately,
        Self::HeadOfHousehold,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::MarriedFilingSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the display label ("Married Filing Jointly"), the short code
/// ("MFJ") or the identifier form ("married_filing_jointly",
/// "MarriedFilingJointly"). Matching ignores case, surrounding whitespace,
/// and separators.
impl FromStr for FilingStatus {
    type Err = ParseFilingStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "single" | "s" => Ok(Self::Single),
            "marriedfilingjointly" | "mfj" => Ok(Self::MarriedFilingJointly),
            "marriedfilingseparately" | "mfs" => Ok(Self::MarriedFilingSeparately),
            "headofhousehold" | "hoh" => Ok(Self::HeadOfHousehold),
            _ => Err(ParseFilingStatusError(s.to_string())),
        }
    }
}
