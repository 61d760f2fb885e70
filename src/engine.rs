use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calendar::{add_days, format_date, is_payout_date, is_same_day, is_year_end, parse_date};
use crate::config::{CalculationInput, TaxPolicy};
use crate::decimal::{Money, Rate};
use crate::errors::{Result, SavingsError};
use crate::interest::{AccrualEngine, AccrualWindow, WithholdingRules};
use crate::results::{CalculationResult, Payout, Step, YearSummary};
use crate::state::{Holdings, YearContext};
use crate::timeline::EventTimeline;

/// run a calculation under the Thai Revenue Department policy
pub fn compute_savings(input: &CalculationInput) -> Result<CalculationResult> {
    SavingsCalculator::default().calculate(input)
}

/// savings calculator bound to a tax policy
#[derive(Debug, Clone, Copy, Default)]
pub struct SavingsCalculator {
    policy: TaxPolicy,
}

impl SavingsCalculator {
    pub fn new(policy: TaxPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &TaxPolicy {
        &self.policy
    }

    /// validate the input and walk the range
    pub fn calculate(&self, input: &CalculationInput) -> Result<CalculationResult> {
        let result = self
            .plan(input)
            .and_then(|walk| walk.run())
            .inspect_err(|e| {
                warn!(error = %e, start = %input.start_date, end = %input.end_date, "savings calculation rejected")
            })?;

        info!(
            start = %input.start_date,
            end = %input.end_date,
            payouts = result.payouts.len(),
            ending_balance = %result.ending_balance,
            net_interest = %result.net_interest_total,
            "savings calculation complete"
        );
        Ok(result)
    }

    fn plan(&self, input: &CalculationInput) -> Result<DayWalk> {
        input.resolved_timezone()?;

        if input.principal_start.is_negative() {
            return Err(SavingsError::validation(format!(
                "starting principal cannot be negative, got {}",
                input.principal_start
            )));
        }
        if input.principal_start > Money::MAX_INPUT {
            return Err(SavingsError::validation(format!(
                "starting principal {} exceeds the supported maximum of {}",
                input.principal_start,
                Money::MAX_INPUT
            )));
        }
        if input.annual_rate_pct < Decimal::ZERO {
            return Err(SavingsError::validation(format!(
                "annual rate cannot be negative, got {}%",
                input.annual_rate_pct
            )));
        }
        if input.annual_rate_pct > Rate::MAX_PERCENTAGE {
            return Err(SavingsError::validation(format!(
                "annual rate {}% exceeds the supported maximum of {}%",
                input.annual_rate_pct,
                Rate::MAX_PERCENTAGE
            )));
        }

        let start = parse_date(&input.start_date)?;
        let end = parse_date(&input.end_date)?;
        if start > end {
            return Err(SavingsError::validation(format!(
                "start date {} is after end date {}",
                input.start_date, input.end_date
            )));
        }

        let timeline = EventTimeline::prepare(&input.events, start, end)?;

        if let Some(cfg) = input.withholding_tax {
            if cfg.enabled && cfg.rate < Decimal::ZERO {
                return Err(SavingsError::validation(format!(
                    "withholding tax rate cannot be negative, got {}",
                    cfg.rate
                )));
            }
        }

        Ok(DayWalk::new(
            start,
            end,
            input.principal_start,
            AccrualEngine::new(Rate::from_percentage(input.annual_rate_pct)),
            WithholdingRules::from_input(input, self.policy),
            timeline,
        ))
    }
}

/// mutable state of one walk over the range
///
/// Each day applies the events dated that day (deposits first), pays out on
/// 30 June / 31 December, accrues the day's interest on the resulting
/// balance, and closes the year on 31 December or the last day of the range.
struct DayWalk {
    start: NaiveDate,
    end: NaiveDate,
    accrual: AccrualEngine,
    rules: WithholdingRules,
    timeline: EventTimeline,
    holdings: Holdings,
    year: YearContext,
    window: AccrualWindow,
    payouts: Vec<Payout>,
    year_summaries: Vec<YearSummary>,
    steps: Vec<Step>,
}

impl DayWalk {
    fn new(
        start: NaiveDate,
        end: NaiveDate,
        principal: Money,
        accrual: AccrualEngine,
        rules: WithholdingRules,
        timeline: EventTimeline,
    ) -> Self {
        Self {
            start,
            end,
            accrual,
            rules,
            timeline,
            holdings: Holdings::opening(principal),
            year: YearContext::open(start.year()),
            window: AccrualWindow::open(start, principal),
            payouts: Vec::new(),
            year_summaries: Vec::new(),
            steps: Vec::new(),
        }
    }

    fn run(mut self) -> Result<CalculationResult> {
        let mut date = self.start;
        while date <= self.end {
            self.apply_events(date)?;

            if is_payout_date(date) && self.window.is_due_on(date) {
                self.finalize_payout(date);
            }

            let interest = self.accrual.interest_for_day(self.holdings.balance, date);
            self.window.accrue(interest);

            if is_year_end(date) || is_same_day(date, self.end) {
                self.finalize_year(date);
            }

            self.ensure_representable(date)?;
            date = add_days(date, 1);
        }

        if self.window.period_interest().is_positive() {
            if let Some(step) = self.window.close_period(self.end) {
                self.steps.push(step);
            }
        }

        Ok(self.finish())
    }

    /// balance and deferred credit must stay at or below `Money::MAX_BALANCE`
    fn ensure_representable(&self, date: NaiveDate) -> Result<()> {
        if self.holdings.balance > Money::MAX_BALANCE || self.year.net_pending_credit > Money::MAX_BALANCE {
            return Err(SavingsError::validation(format!(
                "balance on {} grows beyond the supported maximum of {}",
                format_date(date),
                Money::MAX_BALANCE
            )));
        }
        Ok(())
    }

    fn apply_events(&mut self, date: NaiveDate) -> Result<()> {
        while let Some(event) = self.timeline.next_due(date) {
            if let Some(step) = self.window.close_period(add_days(date, -1)) {
                self.steps.push(step);
            }
            self.holdings = event.apply(self.holdings)?;
            self.window.reopen(date, self.holdings.balance);
        }
        Ok(())
    }

    fn finalize_payout(&mut self, date: NaiveDate) {
        let assessment = self.rules.assess(&self.year, self.window.take_pending());

        if let Some(step) = self.window.close_period(add_days(date, -1)) {
            self.steps.push(step);
        }

        let (year, holdings) = self.year.settle_payout(self.holdings, &assessment);
        self.year = year;
        self.holdings = holdings;

        debug!(
            date = %format_date(date),
            gross = %assessment.gross,
            tax = %assessment.tax,
            status = ?assessment.tax_status,
            method = ?assessment.method,
            "interest paid out"
        );

        self.payouts.push(Payout {
            date,
            gross_interest: assessment.gross,
            tax: assessment.tax,
            net_interest: assessment.net,
            balance_after_payout: self.holdings.balance.round_money(),
            cumulative_ytd_gross: assessment.cumulative_gross.round_money(),
            remaining_to_threshold: assessment.remaining_to_threshold.round_money(),
            threshold_crossed: assessment.threshold_crossed,
            tax_status: assessment.tax_status,
            interest_method: assessment.method,
            taxable_amount: assessment.taxable.round_money(),
            running_ytd_tax: self.year.tax.round_money(),
        });

        self.window.reopen(date, self.holdings.balance);
    }

    fn finalize_year(&mut self, date: NaiveDate) {
        let (holdings, summary) = self.year.close(self.holdings);
        self.holdings = holdings;
        if summary.mode.is_simple() && date < self.end {
            // deferred interest was just credited; the next step starts from it
            self.window.rebase(self.holdings.balance);
        }

        debug!(
            year = summary.year,
            mode = ?summary.mode,
            gross = %summary.gross_interest,
            closing_balance = %summary.closing_balance,
            "year closed"
        );
        self.year_summaries.push(summary);

        if date < self.end {
            self.year = YearContext::open(date.year() + 1);
        }
    }

    fn finish(self) -> CalculationResult {
        let gross: Money = self.payouts.iter().map(|p| p.gross_interest).sum();
        let tax: Money = self.payouts.iter().map(|p| p.tax).sum();

        CalculationResult {
            ending_balance: self.holdings.balance.round_money(),
            total_contributions: self.holdings.contributions.round_money(),
            gross_interest_total: gross.round_money(),
            withholding_tax_total: tax.round_money(),
            net_interest_total: (gross - tax).round_money(),
            accrued_unpaid_interest: self.window.pending().round_money(),
            payouts: self.payouts,
            year_summaries: self.year_summaries,
            steps: self.steps,
        }
    }
}
