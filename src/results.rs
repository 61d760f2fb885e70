use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{InterestMethod, TaxStatus, YearMode};

/// interest credited on a 30 june / 31 december payout date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub date: NaiveDate,
    pub gross_interest: Money,
    pub tax: Money,
    pub net_interest: Money,
    pub balance_after_payout: Money,
    pub cumulative_ytd_gross: Money,
    pub remaining_to_threshold: Money,
    /// only the payout that takes the year over the threshold
    pub threshold_crossed: bool,
    pub tax_status: TaxStatus,
    pub interest_method: InterestMethod,
    /// base the tax was computed on; the whole year's gross on a crossing payout
    pub taxable_amount: Money,
    pub running_ytd_tax: Money,
}

/// totals of one calendar year of the range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: i32,
    pub mode: YearMode,
    pub gross_interest: Money,
    pub tax: Money,
    pub net_interest: Money,
    pub closing_balance: Money,
}

/// diagnostic accrual sub-period at constant principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub days: i64,
    pub principal: Money,
    pub gross_interest: Money,
}

/// everything a savings calculation reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub ending_balance: Money,
    pub total_contributions: Money,
    pub gross_interest_total: Money,
    pub withholding_tax_total: Money,
    pub net_interest_total: Money,
    /// interest accrued after the last payout of the range, never credited
    pub accrued_unpaid_interest: Money,
    pub payouts: Vec<Payout>,
    pub year_summaries: Vec<YearSummary>,
    pub steps: Vec<Step>,
}

impl CalculationResult {
    pub fn payouts_in_year(&self, year: i32) -> impl Iterator<Item = &Payout> {
        self.payouts.iter().filter(move |p| p.date.year() == year)
    }

    pub fn summary_for(&self, year: i32) -> Option<&YearSummary> {
        self.year_summaries.iter().find(|s| s.year == year)
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
