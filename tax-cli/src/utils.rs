use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a dollar amount.
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseAmountError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes a typed amount: trims whitespace, drops a `$` sign and the
/// comma thousands separators, so `"-$1,234.50"` becomes `"-1234.50"`.
fn normalize_amount(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect()
}

/// Parses a dollar amount as typed by a user.
///
/// Accepts a `$` sign and comma thousands separators (e.g. `"$50,000"`).
/// Empty or whitespace-only input is treated as 0. Negative amounts parse
/// successfully; rejecting them is the calculator's job.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid amount: {}", e);
        ParseAmountError {
            input: s.to_string(),
            source: e,
        }
    })
}
