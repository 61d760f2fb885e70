use std::collections::BTreeMap;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::{bangkok_today, format_date, previous_business_day};
use crate::errors::{Result, SavingsError};

/// fallbacks tried after today before giving up
pub const DEFAULT_LOOKBACK_DAYS: u32 = 10;

/// min/max published for one product, in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RateRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl RateRange {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    /// midpoint of the published bounds, or whichever one is present
    pub fn average(&self) -> Option<Decimal> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some((min + max) / Decimal::TWO),
            (Some(only), None) | (None, Some(only)) => Some(only),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankRateRecord {
    pub bank: String,
    pub bank_type: String,
    pub savings: RateRange,
}

/// all bank rates published for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    pub period: NaiveDate,
    pub records: Vec<BankRateRecord>,
}

impl RateTable {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// average savings rate of `bank` in percent, ready for `annual_rate_pct`
    pub fn savings_rate_for(&self, bank: &str) -> Option<Decimal> {
        self.records
            .iter()
            .find(|r| r.bank.eq_ignore_ascii_case(bank))
            .and_then(|r| r.savings.average())
    }

    /// records grouped by bank type, types in name order
    pub fn by_bank_type(&self) -> BTreeMap<&str, Vec<&BankRateRecord>> {
        let mut groups: BTreeMap<&str, Vec<&BankRateRecord>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(record.bank_type.as_str()).or_default().push(record);
        }
        groups
    }
}

/// anything that can answer "what was published on this day"
pub trait RateSource {
    /// `Ok(None)` when nothing was published for `date`
    fn rates_for(&self, date: NaiveDate) -> Result<Option<RateTable>>;
}

/// most recent non-empty table on or before `today`
///
/// Nothing is published on weekends and today's table may not be out yet, so
/// this tries `today` and then up to `max_lookback` previous business days. A
/// failing source is treated like a day without data.
pub fn latest_rate_table<S: RateSource + ?Sized>(source: &S, today: NaiveDate, max_lookback: u32) -> Result<RateTable> {
    let mut date = today;
    for attempt in 0..=max_lookback {
        match source.rates_for(date) {
            Ok(Some(table)) if !table.is_empty() => {
                debug!(date = %format_date(date), attempt, banks = table.records.len(), "deposit rates found");
                return Ok(table);
            }
            Ok(_) => {}
            Err(e) => warn!(date = %format_date(date), error = %e, "deposit rate lookup failed"),
        }
        date = previous_business_day(date);
    }

    Err(SavingsError::RateUnavailable {
        lookback_days: max_lookback,
    })
}

/// [`latest_rate_table`] from the current Bangkok date with the default lookback
pub fn latest_rate_table_now<S: RateSource + ?Sized>(source: &S, time: &SafeTimeProvider) -> Result<RateTable> {
    latest_rate_table(source, bangkok_today(time), DEFAULT_LOOKBACK_DAYS)
}
