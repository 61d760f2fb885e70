use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SavingsError;

/// balance-changing timeline event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Deposit,
    Withdraw,
}

impl EventKind {
    /// deposits sort ahead of withdrawals dated the same day
    pub(crate) fn same_day_rank(&self) -> u8 {
        match self {
            EventKind::Deposit => 0,
            EventKind::Withdraw => 1,
        }
    }
}

/// compounding mode of one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YearMode {
    /// net interest is added to the balance at each payout
    #[default]
    CompoundAtPayout,
    /// yearly interest passed the exemption threshold; net interest is held
    /// back and credited once at year end
    SimpleDueTo20k,
}

impl YearMode {
    pub fn is_simple(&self) -> bool {
        matches!(self, YearMode::SimpleDueTo20k)
    }
}

/// tax situation of a single payout relative to the exemption threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaxStatus {
    #[default]
    None,
    ThresholdCrossed,
    AboveThreshold,
}

/// how a payout's net interest reached the balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestMethod {
    Compound,
    Simple,
}

/// civil calendars the engine accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timezone {
    #[default]
    #[serde(rename = "Asia/Bangkok")]
    AsiaBangkok,
}

impl Timezone {
    pub fn name(&self) -> &'static str {
        match self {
            Timezone::AsiaBangkok => "Asia/Bangkok",
        }
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Timezone {
    type Err = SavingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Asia/Bangkok" => Ok(Timezone::AsiaBangkok),
            other => Err(SavingsError::validation(format!(
                "only Asia/Bangkok timezone is supported, got {:?}",
                other
            ))),
        }
    }
}
