use chrono::NaiveDate;
use tracing::trace;

use crate::calendar::{format_date, parse_date};
use crate::config::TimelineEvent;
use crate::decimal::Money;
use crate::errors::{Result, SavingsError};
use crate::state::Holdings;
use crate::types::EventKind;

/// validated event with a parsed date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub amount: Money,
}

impl ScheduledEvent {
    /// adjust balance and contributions; a withdrawal may not overdraw the account
    pub fn apply(&self, holdings: Holdings) -> Result<Holdings> {
        match self.kind {
            EventKind::Deposit => Ok(Holdings {
                balance: holdings.balance + self.amount,
                contributions: holdings.contributions + self.amount,
            }),
            EventKind::Withdraw => {
                let balance = holdings.balance - self.amount;
                if balance.is_negative() {
                    return Err(SavingsError::InsufficientBalance {
                        date: self.date,
                        balance: holdings.balance.round_money(),
                        requested: self.amount,
                    });
                }
                Ok(Holdings {
                    balance,
                    contributions: holdings.contributions - self.amount,
                })
            }
        }
    }
}

/// ordered events plus a cursor into them
///
/// Events are validated and sorted once; the day walk then drains them
/// through [`EventTimeline::next_due`] so each is applied exactly once.
#[derive(Debug, Clone, Default)]
pub struct EventTimeline {
    events: Vec<ScheduledEvent>,
    cursor: usize,
}

impl EventTimeline {
    /// validate, guard same-day sequencing and sort the raw events
    pub fn prepare(raw: &[TimelineEvent], start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let mut events = raw
            .iter()
            .map(|event| validate_event(event, start, end))
            .collect::<Result<Vec<_>>>()?;

        // checked in submission order, before sorting would hide it
        for pair in events.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.date == next.date && prev.kind == EventKind::Withdraw && next.kind == EventKind::Deposit {
                return Err(SavingsError::Sequencing { date: next.date });
            }
        }

        // stable, so equal (date, kind) keep submission order
        events.sort_by_key(|e| (e.date, e.kind.same_day_rank()));

        Ok(Self { events, cursor: 0 })
    }

    /// next unapplied event dated on or before `date`
    pub fn next_due(&mut self, date: NaiveDate) -> Option<ScheduledEvent> {
        let event = *self.events.get(self.cursor)?;
        if event.date > date {
            return None;
        }
        self.cursor += 1;
        trace!(date = %format_date(event.date), kind = ?event.kind, amount = %event.amount, "timeline event due");
        Some(event)
    }

    pub fn events(&self) -> &[ScheduledEvent] {
        &self.events
    }

    pub fn remaining(&self) -> usize {
        self.events.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.events.len()
    }
}

fn validate_event(event: &TimelineEvent, start: NaiveDate, end: NaiveDate) -> Result<ScheduledEvent> {
    if !event.amount.is_positive() {
        return Err(SavingsError::validation(format!(
            "event amount must be positive, got {}",
            event.amount
        )));
    }

    if event.amount > Money::MAX_INPUT {
        return Err(SavingsError::validation(format!(
            "event amount {} exceeds the supported maximum of {}",
            event.amount,
            Money::MAX_INPUT
        )));
    }

    let date = parse_date(&event.date)?;
    if date < start || date > end {
        return Err(SavingsError::validation(format!(
            "event date {} must be within the calculation range {} to {}",
            event.date,
            format_date(start),
            format_date(end)
        )));
    }

    Ok(ScheduledEvent {
        date,
        kind: event.kind,
        amount: event.amount,
    })
}
