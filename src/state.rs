use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::interest::PayoutAssessment;
use crate::results::YearSummary;
use crate::types::{InterestMethod, YearMode};

/// running balance of the account and the net amount the saver put in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holdings {
    pub balance: Money,
    /// opening principal plus deposits minus withdrawals
    pub contributions: Money,
}

impl Holdings {
    pub fn opening(principal: Money) -> Self {
        Self {
            balance: principal,
            contributions: principal,
        }
    }
}

/// year-scoped tracking state, replaced rather than mutated as the walk advances
///
/// A fresh context starts every calendar year in `CompoundAtPayout`. The
/// first payout that lifts year-to-date gross interest above the exemption
/// threshold latches `SimpleDueTo20k`; from then on net interest collects in
/// `net_pending_credit` and only reaches the balance when the year closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearContext {
    pub year: i32,
    pub mode: YearMode,
    /// year-to-date gross interest of all payouts, also the threshold comparison base
    pub gross: Money,
    /// year-to-date tax withheld
    pub tax: Money,
    /// net interest held back while in simple mode
    pub net_pending_credit: Money,
}

impl YearContext {
    pub fn open(year: i32) -> Self {
        Self {
            year,
            mode: YearMode::CompoundAtPayout,
            gross: Money::ZERO,
            tax: Money::ZERO,
            net_pending_credit: Money::ZERO,
        }
    }

    /// cumulative gross interest the threshold is measured against
    pub fn cumulative_gross(&self) -> Money {
        self.gross
    }

    /// switch to simple mode for the rest of the year; there is no way back
    pub fn latch_simple(self) -> Self {
        Self {
            mode: YearMode::SimpleDueTo20k,
            ..self
        }
    }

    /// book an assessed payout, crediting the balance or the pending bucket
    pub fn settle_payout(self, holdings: Holdings, assessment: &PayoutAssessment) -> (Self, Holdings) {
        let mut next = Self {
            gross: self.gross + assessment.gross,
            tax: self.tax + assessment.tax,
            ..self
        };
        let mut holdings = holdings;

        match assessment.method {
            InterestMethod::Compound => {
                holdings.balance += assessment.net;
            }
            InterestMethod::Simple => {
                next = next.latch_simple();
                next.net_pending_credit += assessment.net;
            }
        }

        (next, holdings)
    }

    /// fold the year into its summary, crediting any deferred interest
    pub fn close(self, holdings: Holdings) -> (Holdings, YearSummary) {
        let mut holdings = holdings;
        if self.mode.is_simple() {
            holdings.balance += self.net_pending_credit;
        }

        let gross = self.gross.round_money();
        let tax = self.tax.round_money();

        let summary = YearSummary {
            year: self.year,
            mode: self.mode,
            gross_interest: gross,
            tax,
            net_interest: (gross - tax).round_money(),
            closing_balance: holdings.balance.round_money(),
        };

        (holdings, summary)
    }
}
