use rust_decimal::Decimal;

use crate::config::{CalculationInput, TaxPolicy};
use crate::decimal::Money;
use crate::state::YearContext;
use crate::types::{InterestMethod, TaxStatus};

/// everything decided about one payout before it is booked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayoutAssessment {
    /// gross interest, rounded to 2 dp
    pub gross: Money,
    pub tax: Money,
    pub net: Money,
    /// base the tax was computed on
    pub taxable: Money,
    /// year-to-date gross including this payout
    pub cumulative_gross: Money,
    pub remaining_to_threshold: Money,
    pub threshold_crossed: bool,
    pub tax_status: TaxStatus,
    pub method: InterestMethod,
}

/// withholding switches resolved from the calculation input
///
/// Interest is exempt while a year's gross stays at or below the threshold.
/// The payout that takes the year over it withholds retroactively:
///
/// ```text
/// tax_this_payout = rate × ytd_gross_after_payout − ytd_tax_already_withheld
/// ```
///
/// Later payouts that year withhold the policy rate on their own gross.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WithholdingRules {
    pub policy: TaxPolicy,
    /// explicit per-payout rate, when configured and non-zero
    pub explicit_rate: Option<Decimal>,
    /// threshold rule applies and is not overridden
    pub threshold_rule_active: bool,
}

impl WithholdingRules {
    pub fn new(policy: TaxPolicy, explicit_rate: Option<Decimal>, apply_20k_rule: bool, override_keep_compounding: bool) -> Self {
        Self {
            policy,
            explicit_rate,
            threshold_rule_active: apply_20k_rule && !override_keep_compounding,
        }
    }

    pub fn from_input(input: &CalculationInput, policy: TaxPolicy) -> Self {
        Self::new(
            policy,
            input.withholding_tax.and_then(|cfg| cfg.explicit_rate()),
            input.apply_20k_rule,
            input.override_keep_compounding,
        )
    }

    /// decide tax, net and crediting method for a payout of `pending_gross`
    ///
    /// An explicit withholding rate always wins over the policy rate for the
    /// tax amount; the threshold rule still decides the status and the switch
    /// to simple interest.
    pub fn assess(&self, year: &YearContext, pending_gross: Money) -> PayoutAssessment {
        let gross = pending_gross.round_money();
        let previous = year.cumulative_gross();
        let cumulative = previous + gross;
        let threshold = self.policy.exemption_threshold;
        let policy_rate = self.policy.threshold_tax_rate;

        let mut tax = Money::ZERO;
        let mut taxable = Money::ZERO;
        if let Some(rate) = self.explicit_rate {
            taxable = gross;
            tax = gross.portion(rate).round_money();
        }

        let mut tax_status = TaxStatus::None;
        let mut threshold_crossed = false;
        let mut method = InterestMethod::Compound;

        if self.threshold_rule_active {
            if previous <= threshold && cumulative > threshold {
                threshold_crossed = true;
                tax_status = TaxStatus::ThresholdCrossed;
                method = InterestMethod::Simple;
                if self.explicit_rate.is_none() {
                    taxable = cumulative;
                    tax = (cumulative.portion(policy_rate) - year.tax).round_money();
                }
            } else if previous > threshold {
                tax_status = TaxStatus::AboveThreshold;
                method = InterestMethod::Simple;
                if self.explicit_rate.is_none() {
                    taxable = gross;
                    tax = gross.portion(policy_rate).round_money();
                }
            }
        }

        PayoutAssessment {
            gross,
            tax,
            net: gross - tax,
            taxable,
            cumulative_gross: cumulative,
            remaining_to_threshold: self.policy.remaining_to_threshold(cumulative),
            threshold_crossed,
            tax_status,
            method,
        }
    }
}
