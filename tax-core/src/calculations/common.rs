//! Common utility functions for tax calculations.
//!
//! This module provides the clamping, rounding and currency formatting shared
//! by the calculator and its callers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative values to zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::floor_at_zero;
///
/// assert_eq!(floor_at_zero(dec!(-25.00)), dec!(0));
/// assert_eq!(floor_at_zero(dec!(25.00)), dec!(25.00));
/// ```
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Formats an amount as US dollars with thousands separators and two decimals.
///
/// The amount is rounded half-up to cents first.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::format_usd;
///
/// assert_eq!(format_usd(dec!(12345.67)), "$12,345.67");
/// assert_eq!(format_usd(dec!(4240.5)), "$4,240.50");
/// assert_eq!(format_usd(dec!(0)), "$0.00");
/// ```
pub fn format_usd(amount: Decimal) -> String {
    let mut cents = round_half_up(amount).abs();
    cents.rescale(2);
    let digits = cents.to_string();
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !cents.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{sign}${grouped}.{fraction}")
}
