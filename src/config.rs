use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calendar::{end_date_from_tenure, format_date, parse_date};
use crate::decimal::Money;
use crate::errors::{Result, SavingsError};
use crate::types::{EventKind, Timezone};

/// savings calculation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    pub principal_start: Money,
    /// annual rate in percent (2.5 for 2.5%)
    pub annual_rate_pct: Decimal,
    /// first day of the range, `YYYY-MM-DD`
    pub start_date: String,
    /// last day of the range (inclusive), `YYYY-MM-DD`
    pub end_date: String,
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
    #[serde(default = "default_true", rename = "apply20kRule")]
    pub apply_20k_rule: bool,
    #[serde(default)]
    pub override_keep_compounding: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withholding_tax: Option<WithholdingTaxConfig>,
    /// only `Asia/Bangkok` is accepted; absent means Bangkok
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

fn default_true() -> bool {
    true
}

impl CalculationInput {
    pub fn builder() -> CalculationInputBuilder {
        CalculationInputBuilder::new()
    }

    /// parse from the JSON shape the form layer submits
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SavingsError::validation(format!(
            "malformed calculation input: {}",
            e
        )))
    }

    pub(crate) fn resolved_timezone(&self) -> Result<Timezone> {
        match &self.timezone {
            Some(name) => name.parse(),
            None => Ok(Timezone::default()),
        }
    }
}

/// deposit or withdrawal on a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub amount: Money,
}

impl TimelineEvent {
    pub fn deposit(date: impl Into<String>, amount: Money) -> Self {
        Self {
            date: date.into(),
            kind: EventKind::Deposit,
            amount,
        }
    }

    pub fn withdraw(date: impl Into<String>, amount: Money) -> Self {
        Self {
            date: date.into(),
            kind: EventKind::Withdraw,
            amount,
        }
    }
}

/// explicit withholding tax applied to every payout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WithholdingTaxConfig {
    pub enabled: bool,
    /// fraction of gross interest (0.15 for 15%)
    pub rate: Decimal,
}

impl WithholdingTaxConfig {
    pub fn new(rate: Decimal) -> Self {
        Self { enabled: true, rate }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            rate: Decimal::ZERO,
        }
    }

    /// the configured rate, when it actually withholds anything
    pub fn explicit_rate(&self) -> Option<Decimal> {
        if self.enabled && !self.rate.is_zero() {
            Some(self.rate)
        } else {
            None
        }
    }
}

/// regulatory constants of the savings interest exemption
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxPolicy {
    /// yearly gross interest that stays exempt from withholding
    pub exemption_threshold: Money,
    /// withholding rate once the threshold is passed
    pub threshold_tax_rate: Decimal,
}

impl TaxPolicy {
    /// Thai Revenue Department savings policy: 20,000 THB a year, 15% above it
    pub fn thai_revenue_department() -> Self {
        Self {
            exemption_threshold: Money::from_major(20_000),
            threshold_tax_rate: dec!(0.15),
        }
    }

    /// how much more interest fits under the threshold
    pub fn remaining_to_threshold(&self, cumulative_gross: Money) -> Money {
        if cumulative_gross < self.exemption_threshold {
            self.exemption_threshold - cumulative_gross
        } else {
            Money::ZERO
        }
    }
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self::thai_revenue_department()
    }
}

/// builder for calculation inputs
pub struct CalculationInputBuilder {
    principal: Option<Money>,
    annual_rate_pct: Option<Decimal>,
    start_date: Option<String>,
    end_date: Option<String>,
    tenure_months: Option<u32>,
    events: Vec<TimelineEvent>,
    apply_20k_rule: bool,
    override_keep_compounding: bool,
    withholding_tax: Option<WithholdingTaxConfig>,
    timezone: Option<String>,
}

impl CalculationInputBuilder {
    pub fn new() -> Self {
        Self {
            principal: None,
            annual_rate_pct: None,
            start_date: None,
            end_date: None,
            tenure_months: None,
            events: Vec::new(),
            apply_20k_rule: true,
            override_keep_compounding: false,
            withholding_tax: None,
            timezone: None,
        }
    }

    pub fn principal(mut self, amount: Money) -> Self {
        self.principal = Some(amount);
        self
    }

    pub fn annual_rate_pct(mut self, rate: Decimal) -> Self {
        self.annual_rate_pct = Some(rate);
        self
    }

    pub fn start_date(mut self, date: &str) -> Self {
        self.start_date = Some(date.to_string());
        self
    }

    pub fn end_date(mut self, date: &str) -> Self {
        self.end_date = Some(date.to_string());
        self
    }

    /// derive the end date from a term in months instead of giving it directly
    pub fn tenure_months(mut self, months: u32) -> Self {
        self.tenure_months = Some(months);
        self
    }

    pub fn deposit(mut self, date: &str, amount: Money) -> Self {
        self.events.push(TimelineEvent::deposit(date, amount));
        self
    }

    pub fn withdraw(mut self, date: &str, amount: Money) -> Self {
        self.events.push(TimelineEvent::withdraw(date, amount));
        self
    }

    pub fn event(mut self, event: TimelineEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn apply_20k_rule(mut self, apply: bool) -> Self {
        self.apply_20k_rule = apply;
        self
    }

    pub fn override_keep_compounding(mut self, keep: bool) -> Self {
        self.override_keep_compounding = keep;
        self
    }

    pub fn withholding_tax(mut self, rate: Decimal) -> Self {
        self.withholding_tax = Some(WithholdingTaxConfig::new(rate));
        self
    }

    pub fn timezone(mut self, timezone: &str) -> Self {
        self.timezone = Some(timezone.to_string());
        self
    }

    pub fn build(self) -> Result<CalculationInput> {
        let principal_start = self.principal.ok_or_else(|| SavingsError::validation("principal is required"))?;
        let annual_rate_pct = self
            .annual_rate_pct
            .ok_or_else(|| SavingsError::validation("annual rate is required"))?;
        let start_date = self
            .start_date
            .ok_or_else(|| SavingsError::validation("start date is required"))?;

        let end_date = match (self.end_date, self.tenure_months) {
            (Some(end), None) => end,
            (None, Some(months)) => format_date(end_date_from_tenure(parse_date(&start_date)?, months)?),
            (Some(_), Some(_)) => {
                return Err(SavingsError::validation("give either an end date or a tenure, not both"));
            }
            (None, None) => return Err(SavingsError::validation("end date or tenure is required")),
        };

        Ok(CalculationInput {
            principal_start,
            annual_rate_pct,
            start_date,
            end_date,
            events: self.events,
            apply_20k_rule: self.apply_20k_rule,
            override_keep_compounding: self.override_keep_compounding,
            withholding_tax: self.withholding_tax,
            timezone: self.timezone,
        })
    }
}

impl Default for CalculationInputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let input = CalculationInput::builder()
            .principal(Money::from_major(100_000))
            .annual_rate_pct(dec!(1))
            .start_date("2025-01-01")
            .end_date("2025-12-31")
            .build()
            .unwrap();

        assert!(input.apply_20k_rule);
        assert!(!input.override_keep_compounding);
        assert!(input.withholding_tax.is_none());
        assert!(input.events.is_empty());
        assert_eq!(input.resolved_timezone().unwrap(), Timezone::AsiaBangkok);
    }

    #[test]
    fn test_builder_tenure() {
        let input = CalculationInput::builder()
            .principal(Money::from_major(50_000))
            .annual_rate_pct(dec!(1.5))
            .start_date("2025-01-01")
            .tenure_months(12)
            .build()
            .unwrap();

        assert_eq!(input.end_date, "2025-12-31");
    }

    #[test]
    fn test_builder_requires_fields() {
        let missing_rate = CalculationInput::builder()
            .principal(Money::from_major(1_000))
            .start_date("2025-01-01")
            .end_date("2025-12-31")
            .build();
        assert!(matches!(missing_rate, Err(SavingsError::Validation { .. })));

        let both_ends = CalculationInput::builder()
            .principal(Money::from_major(1_000))
            .annual_rate_pct(dec!(1))
            .start_date("2025-01-01")
            .end_date("2025-12-31")
            .tenure_months(6)
            .build();
        assert!(both_ends.is_err());
    }

    #[test]
    fn test_json_defaults_and_names() {
        let input = CalculationInput::from_json(
            r#"{
                "principalStart": "200000",
                "annualRatePct": "2.2",
                "startDate": "2025-01-01",
                "endDate": "2025-12-31",
                "events": [
                    { "date": "2025-03-15", "type": "deposit", "amount": "50000" },
                    { "date": "2025-09-01", "type": "withdraw", "amount": "30000" }
                ]
            }"#,
        )
        .unwrap();

        assert!(input.apply_20k_rule);
        assert!(!input.override_keep_compounding);
        assert_eq!(input.annual_rate_pct, dec!(2.2));
        assert_eq!(input.events.len(), 2);
        assert_eq!(input.events[1].kind, EventKind::Withdraw);
        assert_eq!(input.events[0].amount, Money::from_major(50_000));

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["apply20kRule"], serde_json::Value::Bool(true));
        assert!(json.get("withholdingTax").is_none());
    }

    #[test]
    fn test_malformed_json_is_a_validation_error() {
        let err = CalculationInput::from_json(r#"{ "principalStart": "1" }"#).unwrap_err();
        assert!(matches!(err, SavingsError::Validation { .. }));
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let base = r#""annualRatePct": "1", "startDate": "2025-01-01", "endDate": "2025-12-31""#;
        for principal in ["NaN", "Infinity", "\"NaN\"", "1e400"] {
            let json = format!(r#"{{ "principalStart": {}, {} }}"#, principal, base);
            let err = CalculationInput::from_json(&json).unwrap_err();
            assert!(matches!(err, SavingsError::Validation { .. }), "{}", principal);
        }
    }

    #[test]
    fn test_unsupported_timezone() {
        let input = CalculationInput::builder()
            .principal(Money::from_major(1_000))
            .annual_rate_pct(dec!(1))
            .start_date("2025-01-01")
            .end_date("2025-12-31")
            .timezone("Europe/London")
            .build()
            .unwrap();
        assert!(matches!(input.resolved_timezone(), Err(SavingsError::Validation { .. })));
    }

    #[test]
    fn test_explicit_rate() {
        assert_eq!(WithholdingTaxConfig::new(dec!(0.15)).explicit_rate(), Some(dec!(0.15)));
        assert_eq!(WithholdingTaxConfig::new(Decimal::ZERO).explicit_rate(), None);
        assert_eq!(WithholdingTaxConfig::disabled().explicit_rate(), None);
    }

    #[test]
    fn test_remaining_to_threshold() {
        let policy = TaxPolicy::default();
        assert_eq!(policy.remaining_to_threshold(Money::from(dec!(493.15))), Money::from(dec!(19506.85)));
        assert_eq!(policy.remaining_to_threshold(Money::from_major(20_000)), Money::ZERO);
        assert_eq!(policy.remaining_to_threshold(Money::from_major(25_000)), Money::ZERO);
    }
}
