use chrono::NaiveDate;

use crate::calendar::{days_inclusive, is_accrual_day};
use crate::decimal::{Money, Rate};
use crate::results::Step;

/// actual/365 daily accrual
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualEngine {
    daily_rate: Rate,
}

impl AccrualEngine {
    pub fn new(annual_rate: Rate) -> Self {
        Self {
            daily_rate: annual_rate.daily_rate(),
        }
    }

    pub fn daily_rate(&self) -> Rate {
        self.daily_rate
    }

    /// interest earned by `balance` on `date`; zero outside the accrual windows
    pub fn interest_for_day(&self, balance: Money, date: NaiveDate) -> Money {
        if self.daily_rate.is_zero() || !is_accrual_day(date) {
            return Money::ZERO;
        }
        balance * self.daily_rate.as_decimal()
    }
}

/// interest pending payout, plus the open diagnostic sub-period
///
/// `pending` runs from one payout to the next. The sub-period is narrower:
/// it is also cut by every timeline event so each [`Step`] covers a stretch
/// of constant principal.
#[derive(Debug, Clone, PartialEq)]
pub struct AccrualWindow {
    pending: Money,
    period_start: NaiveDate,
    period_principal: Money,
    period_interest: Money,
}

impl AccrualWindow {
    pub fn open(start: NaiveDate, principal: Money) -> Self {
        Self {
            pending: Money::ZERO,
            period_start: start,
            period_principal: principal,
            period_interest: Money::ZERO,
        }
    }

    pub fn accrue(&mut self, interest: Money) {
        self.pending += interest;
        self.period_interest += interest;
    }

    /// unrounded interest accrued since the last payout
    pub fn pending(&self) -> Money {
        self.pending
    }

    pub fn period_start(&self) -> NaiveDate {
        self.period_start
    }

    /// whether a payout on `date` has anything to close
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.pending.is_positive() || self.period_start < date
    }

    /// interest accrued in the current sub-period
    pub fn period_interest(&self) -> Money {
        self.period_interest
    }

    /// end the sub-period on `through`, returning its step when it covers any days
    pub fn close_period(&mut self, through: NaiveDate) -> Option<Step> {
        let step = if self.period_start <= through {
            Some(Step {
                from_date: self.period_start,
                to_date: through,
                days: days_inclusive(self.period_start, through).max(1),
                principal: self.period_principal.round_money(),
                gross_interest: self.period_interest.round_money(),
            })
        } else {
            None
        };
        self.period_interest = Money::ZERO;
        step
    }

    /// begin a new sub-period on `date` at the given principal
    pub fn reopen(&mut self, date: NaiveDate, principal: Money) {
        self.period_start = date;
        self.period_principal = principal;
        self.period_interest = Money::ZERO;
    }

    /// restate the open sub-period's principal without ending it
    pub fn rebase(&mut self, principal: Money) {
        self.period_principal = principal;
    }

    /// hand the pending interest over to a payout
    pub fn take_pending(&mut self) -> Money {
        std::mem::replace(&mut self.pending, Money::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_daily_interest_uses_365_even_in_leap_years() {
        let engine = AccrualEngine::new(Rate::from_percentage(dec!(5)));
        let principal = Money::from_major(10_000);

        let normal = engine.interest_for_day(principal, d(2023, 3, 1));
        let leap_day = engine.interest_for_day(principal, d(2024, 2, 29));

        assert_eq!(normal, leap_day);
        assert_eq!(normal.round_money(), Money::from(dec!(1.37)));
    }

    #[test]
    fn test_no_accrual_on_new_years_eve_or_at_zero_rate() {
        let engine = AccrualEngine::new(Rate::from_percentage(dec!(5)));
        assert!(engine.interest_for_day(Money::from_major(10_000), d(2025, 12, 31)).is_zero());
        assert!(engine.interest_for_day(Money::from_major(10_000), d(2025, 12, 30)).is_positive());

        let zero = AccrualEngine::new(Rate::ZERO);
        assert!(zero.interest_for_day(Money::from_major(10_000), d(2025, 3, 1)).is_zero());
    }

    #[test]
    fn test_window_closes_steps() {
        let engine = AccrualEngine::new(Rate::from_percentage(dec!(2)));
        let principal = Money::from_major(10_000);
        let mut window = AccrualWindow::open(d(2023, 1, 1), principal);

        let mut date = d(2023, 1, 1);
        while date < d(2023, 6, 30) {
            window.accrue(engine.interest_for_day(principal, date));
            date = date.succ_opt().unwrap();
        }
        assert!(window.is_due_on(d(2023, 6, 30)));

        let step = window.close_period(d(2023, 6, 29)).unwrap();
        assert_eq!(step.from_date, d(2023, 1, 1));
        assert_eq!(step.to_date, d(2023, 6, 29));
        assert_eq!(step.days, 180);
        assert_eq!(step.gross_interest, Money::from(dec!(98.63)));
        assert!(window.period_interest().is_zero());

        assert_eq!(window.take_pending().round_money(), Money::from(dec!(98.63)));
        assert!(window.pending().is_zero());
    }

    #[test]
    fn test_empty_period_yields_no_step() {
        let mut window = AccrualWindow::open(d(2025, 3, 15), Money::from_major(1));
        assert!(window.close_period(d(2025, 3, 14)).is_none());
        assert!(!window.is_due_on(d(2025, 3, 15)));

        window.reopen(d(2025, 3, 16), Money::from_major(2));
        assert_eq!(window.period_start(), d(2025, 3, 16));
    }

    #[test]
    fn test_rebase_keeps_period_open() {
        let engine = AccrualEngine::new(Rate::from_percentage(dec!(2)));
        let mut window = AccrualWindow::open(d(2025, 12, 31), Money::from_major(1_000));
        window.rebase(Money::from_major(1_100));
        window.accrue(engine.interest_for_day(Money::from_major(1_100), d(2026, 1, 1)));

        let step = window.close_period(d(2026, 1, 1)).unwrap();
        assert_eq!(step.from_date, d(2025, 12, 31));
        assert_eq!(step.principal, Money::from_major(1_100));
        assert_eq!(step.days, 2);
    }
}
