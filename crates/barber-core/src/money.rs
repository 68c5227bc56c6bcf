//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  Summing a month of haircuts as floats drifts by fractions of a        │
//! │  centavo that eventually show up in the two-decimal totals.            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer centavos                                         │
//! │    "35,50" → 3550, every sum is exact                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use barber_core::money::Money;
//!
//! let haircut = Money::parse_lenient("35,50");
//! let beard = Money::from_cents(2000);
//! assert_eq!((haircut + beard).to_string(), "55.50");
//!
//! // Garbage input from a form field is zero, not an error
//! assert!(Money::parse_lenient("abc").is_zero());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest BRL unit).
///
/// Signed so a discount larger than the services can be represented before
/// the total is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use barber_core::money::Money;
    ///
    /// let price = Money::from_cents(3550); // R$ 35,50
    /// assert_eq!(price.cents(), 3550);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the value, or zero when it is negative.
    ///
    /// ## Example
    /// ```rust
    /// use barber_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-500).clamp_non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(500).clamp_non_negative().cents(), 500);
    /// ```
    #[inline]
    pub const fn clamp_non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Parses a form amount, falling back to zero.
    ///
    /// Empty, missing or malformed input is zero. This mirrors how the
    /// register form has always behaved: a blank "Barba" field simply
    /// means no beard service.
    ///
    /// ## Accepted Grammar
    /// ```text
    ///   [+|-] digits [ (.|,) digits ]
    ///
    ///   "35"        → 35.00
    ///   "35,5"      → 35.50
    ///   "1.234,56"  → 1234.56   (last separator is the decimal one)
    ///   "1,234.56"  → 1234.56
    ///   "1.000.000" → 1000000.00 (repeated separator = thousands)
    ///   "9.999"     → 10.00     (third decimal rounds half away from zero)
    /// ```
    pub fn parse_lenient(raw: &str) -> Money {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Money::zero();
        }
        parse_cents(trimmed).map(Money).unwrap_or_default()
    }

    /// Parses an amount with the same grammar as [`Money::parse_lenient`],
    /// but reports malformed input instead of defaulting.
    ///
    /// ## Example
    /// ```rust
    /// use barber_core::money::Money;
    ///
    /// assert_eq!(Money::parse_strict("Valor", "12.50").unwrap().cents(), 1250);
    /// assert!(Money::parse_strict("Valor", "doze").is_err());
    /// ```
    pub fn parse_strict(field: &str, raw: &str) -> Result<Money, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }
        parse_cents(trimmed)
            .map(Money)
            .map_err(|reason| ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: reason.to_string(),
            })
    }
}

/// Parses a trimmed, non-empty decimal string into centavos.
fn parse_cents(s: &str) -> Result<i64, &'static str> {
    let (negative, body) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    if body.is_empty() {
        return Err("missing digits");
    }
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
    {
        return Err("only digits and a decimal separator are allowed");
    }

    let decimal_sep = decimal_separator(body);
    let (int_part, frac_part) = match decimal_sep {
        Some(idx) => (&body[..idx], &body[idx + 1..]),
        None => (body, ""),
    };

    if frac_part.contains(['.', ',']) {
        return Err("separator after the decimal point");
    }
    if let Some(idx) = decimal_sep {
        let sep = char::from(body.as_bytes()[idx]);
        if int_part.contains(sep) {
            return Err("decimal separator repeated");
        }
    }

    let int_digits: String = int_part.chars().filter(char::is_ascii_digit).collect();
    if int_digits.is_empty() && frac_part.is_empty() {
        return Err("missing digits");
    }

    let units: i64 = if int_digits.is_empty() {
        0
    } else {
        int_digits.parse().map_err(|_| "amount too large")?
    };

    let mut frac = frac_part.bytes().map(|b| i64::from(b - b'0'));
    let tens = frac.next().unwrap_or(0);
    let ones = frac.next().unwrap_or(0);
    let round_up = frac.next().is_some_and(|d| d >= 5);

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(tens * 10 + ones + i64::from(round_up)))
        .ok_or("amount too large")?;

    Ok(if negative { -cents } else { cents })
}

/// Locates the decimal separator, if any.
///
/// With both `.` and `,` present, the last one wins. With a single kind,
/// one occurrence is a decimal point and several are thousands separators.
fn decimal_separator(body: &str) -> Option<usize> {
    let last_dot = body.rfind('.');
    let last_comma = body.rfind(',');

    match (last_dot, last_comma) {
        (Some(d), Some(c)) => Some(d.max(c)),
        (Some(idx), None) | (None, Some(idx)) => {
            let sep = body.as_bytes()[idx];
            let occurrences = body.bytes().filter(|&b| b == sep).count();
            (occurrences == 1).then_some(idx)
        }
        (None, None) => None,
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders two decimals with a dot, e.g. `35.50`.
///
/// ## Note
/// This is the format of the history table and the CSV export. Pages add
/// the `R$` prefix themselves.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Arithmetic saturates at the i64 bounds instead of wrapping or panicking.

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(3550).to_string(), "35.50");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse_plain_and_comma_decimals() {
        assert_eq!(Money::parse_lenient("35").cents(), 3500);
        assert_eq!(Money::parse_lenient("35.5").cents(), 3550);
        assert_eq!(Money::parse_lenient("35,5").cents(), 3550);
        assert_eq!(Money::parse_lenient(" 12,34 ").cents(), 1234);
        assert_eq!(Money::parse_lenient(",50").cents(), 50);
        assert_eq!(Money::parse_lenient("10.").cents(), 1000);
    }

    #[test]
    fn test_parse_thousands_separators() {
        assert_eq!(Money::parse_lenient("1.234,56").cents(), 123_456);
        assert_eq!(Money::parse_lenient("1,234.56").cents(), 123_456);
        assert_eq!(Money::parse_lenient("1.000.000").cents(), 100_000_000);
    }

    #[test]
    fn test_parse_rounds_third_decimal() {
        assert_eq!(Money::parse_lenient("9.994").cents(), 999);
        assert_eq!(Money::parse_lenient("9.995").cents(), 1000);
        assert_eq!(Money::parse_lenient("-1.005").cents(), -101);
    }

    #[test]
    fn test_parse_lenient_defaults_to_zero() {
        assert!(Money::parse_lenient("").is_zero());
        assert!(Money::parse_lenient("   ").is_zero());
        assert!(Money::parse_lenient("abc").is_zero());
        assert!(Money::parse_lenient("12a").is_zero());
        assert!(Money::parse_lenient("-").is_zero());
        assert!(Money::parse_lenient("1.2,3.4").is_zero());
        assert!(Money::parse_lenient("99999999999999999999").is_zero());
    }

    #[test]
    fn test_parse_negative() {
        let m = Money::parse_lenient("-5");
        assert_eq!(m.cents(), -500);
        assert!(m.is_negative());
    }

    #[test]
    fn test_parse_strict_reports_errors() {
        assert!(matches!(
            Money::parse_strict("Total", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            Money::parse_strict("Total", "R$ 10"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_sum_and_clamp() {
        let total: Money = [3500, 2000, -6000]
            .into_iter()
            .map(Money::from_cents)
            .sum();
        assert_eq!(total.cents(), -500);
        assert_eq!(total.clamp_non_negative(), Money::zero());
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);
        let min = Money::from_cents(i64::MIN);
        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(min - Money::from_cents(1), min);

        let mut acc = max;
        acc += max;
        assert_eq!(acc, max);
        acc -= min;
        assert_eq!(acc, max);

        let total: Money = [max, max, max].into_iter().sum();
        assert_eq!(total, max);
    }
}
