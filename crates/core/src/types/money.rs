//! Exact decimal currency amounts.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rejected price input.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyError {
    #[error("price must be a positive number")]
    NotPositive,
    #[error("price must have at most 2 decimal places")]
    TooPrecise,
    #[error("price must not exceed 99999999.99")]
    TooLarge,
}

/// A currency amount.
///
/// Arithmetic is exact. Serialization rounds half away from zero to cents
/// and always writes two decimal places as a JSON string, so `12.5`
/// becomes `"12.50"`. Deserialization accepts either a string or a number.
///
/// ```
/// use emporium_core::Money;
/// use rust_decimal::Decimal;
///
/// let unit = Money::new(Decimal::new(1050, 2));
/// assert_eq!(unit.times(3).to_string(), "31.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    const CENTS: u32 = 2;

    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Largest catalog price, matching the `NUMERIC(10, 2)` column.
    #[must_use]
    pub fn max_price() -> Self {
        Self(Decimal::new(9_999_999_999, Self::CENTS))
    }

    /// Largest order total, matching the `NUMERIC(12, 2)` column.
    #[must_use]
    pub fn max_order_total() -> Self {
        Self(Decimal::new(999_999_999_999, Self::CENTS))
    }

    /// Validate a catalog price: positive, no finer than cents, at most
    /// [`Money::max_price`].
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError`] if the amount is zero, negative, has more
    /// than two significant decimal places, or is too large to store.
    pub fn price(amount: Decimal) -> Result<Self, MoneyError> {
        if amount <= Decimal::ZERO {
            return Err(MoneyError::NotPositive);
        }
        if amount.normalize().scale() > Self::CENTS {
            return Err(MoneyError::TooPrecise);
        }
        if amount > Self::max_price().0 {
            return Err(MoneyError::TooLarge);
        }
        Ok(Self(amount))
    }

    /// The exact underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// `self × quantity`, exact.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Rounded to cents, half away from zero, with scale fixed at 2.
    #[must_use]
    pub fn rounded(self) -> Self {
        let mut cents = self
            .0
            .round_dp_with_strategy(Self::CENTS, RoundingStrategy::MidpointAwayFromZero);
        cents.rescale(Self::CENTS);
        Self(cents)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rounded().0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_serializes_two_places() {
        let json = serde_json::to_string(&Money::new(dec("12.5"))).unwrap();
        assert_eq!(json, "\"12.50\"");
        let json = serde_json::to_string(&Money::new(dec("7"))).unwrap();
        assert_eq!(json, "\"7.00\"");
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(Money::new(dec("2.345")).to_string(), "2.35");
        assert_eq!(Money::new(dec("2.344")).to_string(), "2.34");
    }

    #[test]
    fn test_deserializes_string_or_number() {
        let from_str: Money = serde_json::from_str("\"19.99\"").unwrap();
        let from_num: Money = serde_json::from_str("19.99").unwrap();
        assert_eq!(from_str, from_num);
        assert_eq!(from_num.amount(), dec("19.99"));
    }

    #[test]
    fn test_sum_is_exact() {
        // 0.1 + 0.2 must not drift
        let total: Money = [dec("0.10"), dec("0.20")].into_iter().map(Money::new).sum();
        assert_eq!(total.amount(), dec("0.30"));
    }

    #[test]
    fn test_times() {
        let total = Money::new(dec("10.00")).times(2) + Money::new(dec("5.50")).times(1);
        assert_eq!(total.to_string(), "25.50");
    }

    #[test]
    fn test_price_validation() {
        assert!(Money::price(dec("9.99")).is_ok());
        assert!(Money::price(dec("9.990")).is_ok());
        assert_eq!(Money::price(dec("0")), Err(MoneyError::NotPositive));
        assert_eq!(Money::price(dec("-1.00")), Err(MoneyError::NotPositive));
        assert_eq!(Money::price(dec("1.001")), Err(MoneyError::TooPrecise));
    }

    #[test]
    fn test_price_upper_bound() {
        assert!(Money::price(dec("99999999.99")).is_ok());
        assert_eq!(Money::price(dec("100000000.00")), Err(MoneyError::TooLarge));
        assert_eq!(Money::price(dec("123456789")), Err(MoneyError::TooLarge));
    }
}
