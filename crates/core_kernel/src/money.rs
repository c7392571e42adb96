//! US dollar amounts with cent precision
//!
//! Every amount that crosses a quote, invoice or payment boundary is a [`Usd`].
//! Values are rounded to cents on construction (midpoint away from zero), so
//! sums of stored components always equal the stored total exactly.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount must not be negative: {0}")]
    Negative(Decimal),

    #[error("Percentage must be between 0 and 100, got {0}")]
    PercentOutOfRange(Decimal),

    #[error("Overflow during calculation")]
    Overflow,
}

/// A dollar amount rounded to whole cents
///
/// Serialized as a JSON number (e.g. `1200.5`) so API clients can treat
/// it as a plain numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Usd(Decimal);

impl Usd {
    pub const ZERO: Usd = Usd(Decimal::ZERO);

    /// Creates an amount, rounding half-cents away from zero
    pub fn new(amount: Decimal) -> Self {
        Self(round_cents(amount))
    }

    /// Creates an amount from whole cents
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Creates an amount that must be zero or greater
    pub fn non_negative(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative(amount));
        }
        Ok(Self::new(amount))
    }

    /// Creates an amount that must be strictly greater than zero
    pub fn positive(amount: Decimal) -> Result<Self, MoneyError> {
        let usd = Self::new(amount);
        if !usd.is_positive() {
            return Err(MoneyError::InvalidAmount(format!(
                "expected a positive amount, got {amount}"
            )));
        }
        Ok(usd)
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount in whole cents
    pub fn cents(&self) -> i64 {
        (self.0 * dec!(100)).trunc().to_i64().unwrap_or(i64::MAX)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Checked addition that reports overflow instead of panicking
    pub fn checked_add(&self, other: &Usd) -> Result<Usd, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Self::new)
            .ok_or(MoneyError::Overflow)
    }

    pub fn checked_sub(&self, other: &Usd) -> Result<Usd, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Self::new)
            .ok_or(MoneyError::Overflow)
    }

    /// Applies a percentage and rounds the result to cents
    pub fn percent_of(&self, rate: Percent) -> Usd {
        Self::new(self.0 * rate.as_fraction())
    }

    /// Formats as `$1,234.56`, negatives as `-$1,234.56`
    pub fn to_display(&self) -> String {
        self.to_string()
    }
}

fn round_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{:.2}", self.0.abs());
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{sign}${grouped}.{fraction}")
    }
}

impl FromStr for Usd {
    type Err = MoneyError;

    /// Parses `1234.5`, `$1,234.50` or `-$12`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let digits: String = rest
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        let value = Decimal::from_str(&digits)
            .map_err(|_| MoneyError::InvalidAmount(s.to_string()))?;
        Ok(Self::new(if negative { -value } else { value }))
    }
}

impl Serialize for Usd {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Usd {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Usd::new)
    }
}

impl From<Usd> for Decimal {
    fn from(usd: Usd) -> Decimal {
        usd.0
    }
}

impl Add for Usd {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.0 + other.0)
    }
}

impl Sub for Usd {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.0 - other.0)
    }
}

impl Neg for Usd {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Usd {
    fn sum<I: Iterator<Item = Usd>>(iter: I) -> Self {
        iter.fold(Usd::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Usd> for Usd {
    fn sum<I: Iterator<Item = &'a Usd>>(iter: I) -> Self {
        iter.fold(Usd::ZERO, |acc, x| acc + *x)
    }
}

/// A percentage between 0 and 100 inclusive (e.g. a premium tax rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Hash)]
pub struct Percent(Decimal);

impl Percent {
    /// Creates a rate from a percentage (e.g. 5 for 5%)
    pub fn new(percentage: Decimal) -> Result<Self, MoneyError> {
        if percentage < Decimal::ZERO || percentage > dec!(100) {
            return Err(MoneyError::PercentOutOfRange(percentage));
        }
        Ok(Self(percentage.normalize()))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as a fraction (5% -> 0.05)
    pub fn as_fraction(&self) -> Decimal {
        self.0 / dec!(100)
    }
}

impl TryFrom<Decimal> for Percent {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Percent::new(value)
    }
}

impl From<Percent> for Decimal {
    fn from(p: Percent) -> Decimal {
        p.0
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = rust_decimal::serde::float::deserialize(deserializer)?;
        Percent::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_rounds_half_cent_away_from_zero() {
        assert_eq!(Usd::new(dec!(10.005)).amount(), dec!(10.01));
        assert_eq!(Usd::new(dec!(-10.005)).amount(), dec!(-10.01));
        assert_eq!(Usd::new(dec!(10.004)).amount(), dec!(10.00));
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Usd::new(dec!(1000000)).to_string(), "$1,000,000.00");
        assert_eq!(Usd::new(dec!(999.9)).to_string(), "$999.90");
        assert_eq!(Usd::new(dec!(0)).to_string(), "$0.00");
        assert_eq!(Usd::new(dec!(-1234.5)).to_string(), "-$1,234.50");
    }

    #[test]
    fn test_percent_of() {
        let carrier = Usd::new(dec!(1000));
        let tax = carrier.percent_of(Percent::new(dec!(5)).unwrap());
        assert_eq!(tax.amount(), dec!(50.00));
    }

    #[test]
    fn test_percent_range() {
        assert!(Percent::new(dec!(100)).is_ok());
        assert!(Percent::new(dec!(0)).is_ok());
        assert_eq!(
            Percent::new(dec!(100.01)),
            Err(MoneyError::PercentOutOfRange(dec!(100.01)))
        );
        assert!(Percent::new(dec!(-1)).is_err());
    }

    #[test]
    fn test_non_negative_rejects_negative() {
        assert!(Usd::non_negative(dec!(-0.01)).is_err());
        assert!(Usd::non_negative(dec!(0)).is_ok());
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Usd::new(dec!(1200.5))).unwrap();
        assert_eq!(json, "1200.5");
        let back: Usd = serde_json::from_str("1200.50").unwrap();
        assert_eq!(back, Usd::new(dec!(1200.50)));
    }
}
