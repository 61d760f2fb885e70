use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

/// days in the actual/365 year basis
pub const DAYS_IN_YEAR: u32 = 365;

/// baht amount, carried at full decimal precision and rounded only when reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// largest principal or event amount accepted as input (1e15 baht)
    pub const MAX_INPUT: Money = Money(dec!(1000000000000000));

    /// largest running balance a calculation may reach (1e20 baht)
    pub const MAX_BALANCE: Money = Money(dec!(100000000000000000000));

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d)
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> std::result::Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?))
    }

    /// create from whole baht
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to 2 decimal places, half-up
    pub fn round_money(&self) -> Self {
        Money(self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// portion of this amount at a fractional rate (0.15 for 15%)
    pub fn portion(&self, fraction: Decimal) -> Self {
        Money(self.0 * fraction)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money(self.0 * other)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

/// annual interest rate, stored as a fraction (0.05 for 5%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// largest annual rate accepted as input, in percent
    pub const MAX_PERCENTAGE: Decimal = dec!(1000);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 2.5 for 2.5%)
    pub fn from_percentage(p: Decimal) -> Self {
        Rate(p / Decimal::ONE_HUNDRED)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// daily rate on the actual/365 basis, regardless of leap years
    pub fn daily_rate(&self) -> Rate {
        Rate(self.0 / Decimal::from(DAYS_IN_YEAR))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_is_half_up() {
        assert_eq!(Money::from(dec!(98.625)).round_money(), Money::from(dec!(98.63)));
        assert_eq!(Money::from(dec!(0.005)).round_money(), Money::from(dec!(0.01)));
        assert_eq!(Money::from(dec!(7397.2605)).round_money(), Money::from(dec!(7397.26)));
        // bankers rounding would give 2.12 here
        assert_eq!(Money::from(dec!(2.125)).round_money().to_string(), "2.13");
    }

    #[test]
    fn test_full_precision_is_kept_between_operations() {
        let daily = Rate::from_percentage(dec!(2)).daily_rate();
        let principal = Money::from_major(10_000);

        let mut accrued = Money::ZERO;
        for _ in 0..180 {
            accrued += principal * daily.as_decimal();
        }

        assert_eq!(accrued.round_money(), Money::from(dec!(98.63)));
    }

    #[test]
    fn test_rate_conversions() {
        let rate = Rate::from_percentage(dec!(5));
        assert_eq!(rate.as_decimal(), dec!(0.05));
        assert_eq!(rate.as_percentage(), dec!(5));
        assert_eq!(rate.to_string(), "5.00%");
    }

    #[test]
    fn test_sum() {
        let total: Money = [dec!(1.10), dec!(2.20), dec!(3.30)]
            .into_iter()
            .map(Money::from)
            .sum();
        assert_eq!(total, Money::from(dec!(6.60)));
    }
}
