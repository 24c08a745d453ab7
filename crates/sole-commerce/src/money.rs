//! Money type for representing monetary values.
//!
//! Uses an integer count of the currency's minor unit to avoid the
//! floating-point drift that plagues cart arithmetic. Decimal strings coming
//! from the API or from an operator's keyboard are parsed through
//! `rust_decimal` and rounded to that minor unit.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CommerceError;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Indonesian rupiah. Prices are whole rupiah.
    #[default]
    IDR,
    USD,
    EUR,
    SGD,
}

impl Currency {
    /// Get the currency code (e.g., "IDR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::IDR => "IDR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::SGD => "SGD",
        }
    }

    /// Get the currency symbol (e.g., "Rp").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::IDR => "Rp",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::SGD => "S$",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::IDR => 0,
            _ => 2,
        }
    }

    /// Thousands separator used when displaying amounts.
    fn group_separator(&self) -> char {
        match self {
            Currency::IDR | Currency::EUR => '.',
            _ => ',',
        }
    }

    /// Decimal separator used when displaying amounts.
    fn decimal_separator(&self) -> char {
        match self {
            Currency::IDR | Currency::EUR => ',',
            _ => '.',
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "IDR" => Some(Currency::IDR),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "SGD" => Some(Currency::SGD),
            _ => None,
        }
    }

    fn minor_factor(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (whole rupiah for
/// IDR, cents for USD). Amounts are not ordered across currencies; compare
/// with [`Money::exceeds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Parse a decimal string such as `"100000.00"` into money.
    ///
    /// Rounds half away from zero to the currency's minor unit. Anything that
    /// is not a plain finite decimal number is rejected.
    ///
    /// ```
    /// use sole_commerce::money::{Money, Currency};
    /// let price = Money::parse("100000.00", Currency::IDR).unwrap();
    /// assert_eq!(price.amount_minor, 100_000);
    /// ```
    pub fn parse(input: &str, currency: Currency) -> Result<Self, CommerceError> {
        Self::from_decimal(parse_decimal(input)?, currency)
    }

    /// Convert a `Decimal` into money, rounding to the minor unit.
    pub fn from_decimal(value: Decimal, currency: Currency) -> Result<Self, CommerceError> {
        let scaled = value
            .checked_mul(Decimal::from(currency.minor_factor()))
            .ok_or(CommerceError::Overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let amount_minor = scaled.to_i64().ok_or(CommerceError::Overflow)?;
        Ok(Self::new(amount_minor, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Convert to an exact decimal value in major units.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.amount_minor, self.currency.decimal_places())
    }

    /// Convert to a float in major units, for JSON payloads.
    pub fn to_f64(&self) -> f64 {
        self.amount_minor as f64 / self.currency.minor_factor() as f64
    }

    /// Plain decimal string in major units, suitable for an input field
    /// (e.g., "80000" or "49.99").
    pub fn to_input_string(&self) -> String {
        self.to_decimal().to_string()
    }

    /// Format as a display string (e.g., "Rp 80.000").
    pub fn display(&self) -> String {
        format!("{} {}", self.currency.symbol(), self.display_amount())
    }

    /// Format the amount with grouping but without symbol (e.g., "80.000").
    pub fn display_amount(&self) -> String {
        let factor = self.currency.minor_factor();
        let abs = self.amount_minor.unsigned_abs();
        let major = abs / factor as u64;
        let minor = abs % factor as u64;

        let digits = major.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.currency.group_separator());
            }
            grouped.push(ch);
        }

        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let places = self.currency.decimal_places() as usize;
        if places == 0 {
            format!("{sign}{grouped}")
        } else {
            format!(
                "{sign}{grouped}{}{:0places$}",
                self.currency.decimal_separator(),
                minor
            )
        }
    }

    /// Try to add another Money value, returning None on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_minor
            .checked_add(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_minor
            .checked_sub(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Multiply by a scalar, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_minor
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Whether `self` is strictly greater than `other`; `None` on currency mismatch.
    pub fn exceeds(&self, other: &Money) -> Option<bool> {
        (self.currency == other.currency).then_some(self.amount_minor > other.amount_minor)
    }

    /// The larger of `self - other` and zero.
    pub fn saturating_difference(&self, other: &Money) -> Option<Money> {
        self.try_subtract(other)
            .map(|diff| if diff.is_negative() { Money::zero(self.currency) } else { diff })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Parse a plain finite decimal string without rounding it.
pub fn parse_decimal(input: &str) -> Result<Decimal, CommerceError> {
    let trimmed = input.trim();
    Decimal::from_str(trimmed).map_err(|_| CommerceError::InvalidAmount(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_minor() {
        let m = Money::new(80_000, Currency::IDR);
        assert_eq!(m.amount_minor, 80_000);
        assert_eq!(m.currency, Currency::IDR);
    }

    #[test]
    fn test_parse_api_price_string() {
        let m = Money::parse("100000.00", Currency::IDR).unwrap();
        assert_eq!(m.amount_minor, 100_000);

        let m = Money::parse(" 49.99 ", Currency::USD).unwrap();
        assert_eq!(m.amount_minor, 4999);
    }

    #[test]
    fn test_parse_rounds_half_away_from_zero() {
        let m = Money::parse("1500.5", Currency::IDR).unwrap();
        assert_eq!(m.amount_minor, 1501);

        let m = Money::parse("0.005", Currency::USD).unwrap();
        assert_eq!(m.amount_minor, 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("abc", Currency::IDR).is_err());
        assert!(Money::parse("", Currency::IDR).is_err());
        assert!(Money::parse("NaN", Currency::IDR).is_err());
        assert!(Money::parse("12,000", Currency::IDR).is_err());
    }

    #[test]
    fn test_parse_keeps_sign() {
        let m = Money::parse("-10", Currency::IDR).unwrap();
        assert!(m.is_negative());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(80_000, Currency::IDR).display(), "Rp 80.000");
        assert_eq!(Money::new(1_250_000, Currency::IDR).display(), "Rp 1.250.000");
        assert_eq!(Money::new(999, Currency::IDR).display(), "Rp 999");
        assert_eq!(Money::new(123_456, Currency::USD).display(), "$ 1,234.56");
        assert_eq!(Money::new(-5_000, Currency::IDR).display(), "Rp -5.000");
    }

    #[test]
    fn test_input_string() {
        assert_eq!(Money::new(80_000, Currency::IDR).to_input_string(), "80000");
        assert_eq!(Money::new(4999, Currency::USD).to_input_string(), "49.99");
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(1000, Currency::IDR);
        let b = Money::new(300, Currency::IDR);
        assert_eq!(a.try_add(&b).unwrap().amount_minor, 1300);
        assert_eq!(a.try_subtract(&b).unwrap().amount_minor, 700);
        assert_eq!(a.try_multiply(3).unwrap().amount_minor, 3000);
    }

    #[test]
    fn test_saturating_difference() {
        let a = Money::new(1000, Currency::IDR);
        let b = Money::new(3000, Currency::IDR);
        assert_eq!(a.saturating_difference(&b).unwrap(), Money::zero(Currency::IDR));
        assert_eq!(b.saturating_difference(&a).unwrap().amount_minor, 2000);
    }

    #[test]
    fn test_currency_mismatch_is_none() {
        let idr = Money::new(1000, Currency::IDR);
        let usd = Money::new(1000, Currency::USD);
        assert!(idr.try_add(&usd).is_none());
    }

    #[test]
    fn test_overflow_is_none() {
        let m = Money::new(i64::MAX, Currency::IDR);
        assert!(m.try_multiply(2).is_none());
        assert!(m.try_add(&Money::new(1, Currency::IDR)).is_none());
    }

    #[test]
    fn test_exceeds_same_currency_only() {
        let small = Money::new(1000, Currency::IDR);
        let large = Money::new(3000, Currency::IDR);
        assert_eq!(large.exceeds(&small), Some(true));
        assert_eq!(small.exceeds(&large), Some(false));
        assert_eq!(small.exceeds(&small), Some(false));
        assert_eq!(large.exceeds(&Money::new(1, Currency::USD)), None);
    }

    #[test]
    fn test_parse_decimal_keeps_fraction() {
        let value = parse_decimal(" 80000.4 ").unwrap();
        assert_eq!(value.to_string(), "80000.4");
        assert!(parse_decimal("80k").is_err());
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("IDR"), Some(Currency::IDR));
        assert_eq!(Currency::from_code("usd"), Some(Currency::USD));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
