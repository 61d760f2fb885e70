use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use hourglass_rs::SafeTimeProvider;

use crate::errors::{Result, SavingsError};

/// Asia/Bangkok has no daylight saving, so a fixed offset is exact
pub const BANGKOK_UTC_OFFSET_HOURS: i64 = 7;

/// parse a strict `YYYY-MM-DD` string into a calendar date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !well_formed {
        return Err(SavingsError::format(format!(
            "date must be in YYYY-MM-DD format, got {:?}",
            value
        )));
    }

    // shape is checked above, so the slices are all digits
    let year: i32 = value[0..4].parse().map_err(|_| invalid_date(value))?;
    let month: u32 = value[5..7].parse().map_err(|_| invalid_date(value))?;
    let day: u32 = value[8..10].parse().map_err(|_| invalid_date(value))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid_date(value))
}

fn invalid_date(value: &str) -> SavingsError {
    SavingsError::format(format!("invalid date: {}", value))
}

/// format a calendar date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

/// 30 June or 31 December
pub fn is_payout_date(date: NaiveDate) -> bool {
    matches!((date.month(), date.day()), (6, 30) | (12, 31))
}

/// whether a day earns interest in the semiannual windows
///
/// The June window runs through 29 June and the 30 June accrual opens the
/// second half-year, which runs through 30 December. 31 December is the
/// only day of the year that accrues nothing.
pub fn is_accrual_day(date: NaiveDate) -> bool {
    !(date.month() == 12 && date.day() == 31)
}

pub fn is_year_end(date: NaiveDate) -> bool {
    date.month() == 12 && date.day() == 31
}

/// 31 December of the date's year, or `range_end` when that comes first
pub fn year_end_clipped(date: NaiveDate, range_end: NaiveDate) -> NaiveDate {
    let year_end = NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(range_end);
    year_end.min(range_end)
}

/// number of days from `from` to `to`, both ends included
pub fn days_inclusive(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days() + 1
}

/// gregorian leap year rule
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// current Bangkok civil date according to the time provider
///
/// The only helper that looks at a wall clock; everything else works on
/// dates that are already UTC+7 civil dates.
pub fn bangkok_today(time: &SafeTimeProvider) -> NaiveDate {
    (time.now() + Duration::hours(BANGKOK_UTC_OFFSET_HOURS)).date_naive()
}

/// add calendar months, clamping to the last day of a shorter month
pub fn add_months_clamped(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| SavingsError::validation(format!(
            "adding {} months to {} leaves the supported calendar",
            months,
            format_date(date)
        )))
}

/// last day of a term of `months` starting on `start`
pub fn end_date_from_tenure(start: NaiveDate, months: u32) -> Result<NaiveDate> {
    Ok(add_days(add_months_clamped(start, months)?, -1))
}

/// the weekday before `date`, skipping saturdays and sundays
pub fn previous_business_day(date: NaiveDate) -> NaiveDate {
    let mut cursor = add_days(date, -1);
    while matches!(cursor.weekday(), Weekday::Sat | Weekday::Sun) {
        cursor = add_days(cursor, -1);
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_and_format() {
        let date = parse_date("2025-06-30").unwrap();
        assert_eq!(date, d(2025, 6, 30));
        assert_eq!(format_date(date), "2025-06-30");
        assert_eq!(format_date(d(2024, 2, 9)), "2024-02-09");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for bad in ["2025-6-30", "2025/06/30", "20250630", "2025-06-30T00:00", " 2025-06-30", "abcd-ef-gh", ""] {
            assert!(
                matches!(parse_date(bad), Err(SavingsError::Format { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert!(matches!(parse_date("2025-02-30"), Err(SavingsError::Format { .. })));
        assert!(matches!(parse_date("2025-02-29"), Err(SavingsError::Format { .. })));
        assert!(matches!(parse_date("2025-13-01"), Err(SavingsError::Format { .. })));
        assert!(matches!(parse_date("2025-04-31"), Err(SavingsError::Format { .. })));
        assert!(parse_date("2024-02-29").is_ok());
    }

    #[test]
    fn test_payout_and_accrual_days() {
        assert!(is_payout_date(d(2025, 6, 30)));
        assert!(is_payout_date(d(2025, 12, 31)));
        assert!(!is_payout_date(d(2025, 6, 29)));
        assert!(!is_payout_date(d(2025, 7, 1)));
        assert!(!is_payout_date(d(2025, 12, 30)));

        assert!(is_accrual_day(d(2025, 6, 30)));
        assert!(is_accrual_day(d(2025, 12, 30)));
        assert!(is_accrual_day(d(2025, 1, 1)));
        assert!(!is_accrual_day(d(2025, 12, 31)));
    }

    #[test]
    fn test_year_end_clipping() {
        assert_eq!(year_end_clipped(d(2025, 3, 1), d(2027, 1, 1)), d(2025, 12, 31));
        assert_eq!(year_end_clipped(d(2025, 3, 1), d(2025, 8, 15)), d(2025, 8, 15));
        assert!(is_year_end(d(2024, 12, 31)));
        assert!(!is_year_end(d(2024, 12, 30)));
    }

    #[test]
    fn test_days_inclusive() {
        assert_eq!(days_inclusive(d(2023, 1, 1), d(2023, 6, 29)), 180);
        assert_eq!(days_inclusive(d(2023, 6, 30), d(2023, 12, 30)), 184);
        assert_eq!(days_inclusive(d(2024, 1, 1), d(2024, 6, 29)), 181);
        assert_eq!(days_inclusive(d(2025, 5, 5), d(2025, 5, 5)), 1);
    }

    #[test]
    fn test_leap_year() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
    }

    #[test]
    fn test_add_days_crosses_boundaries() {
        assert_eq!(add_days(d(2024, 2, 28), 1), d(2024, 2, 29));
        assert_eq!(add_days(d(2023, 2, 28), 1), d(2023, 3, 1));
        assert_eq!(add_days(d(2025, 12, 31), 1), d(2026, 1, 1));
        assert_eq!(add_days(d(2026, 1, 1), -1), d(2025, 12, 31));
    }

    #[test]
    fn test_same_day_and_ordering() {
        assert!(is_same_day(d(2025, 6, 30), parse_date("2025-06-30").unwrap()));
        assert!(!is_same_day(d(2025, 6, 30), d(2025, 7, 1)));
        assert!(d(2025, 6, 30) < d(2025, 7, 1));
    }

    #[test]
    fn test_bangkok_today_normalizes_late_utc_evening() {
        // 18:30 UTC on the 31st is already 01:30 on new year's day in Bangkok
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 12, 31, 18, 30, 0).unwrap(),
        ));
        assert_eq!(bangkok_today(&time), d(2026, 1, 1));

        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 12, 31, 16, 59, 59).unwrap(),
        ));
        assert_eq!(bangkok_today(&time), d(2025, 12, 31));
    }

    #[test]
    fn test_end_date_from_tenure() {
        assert_eq!(end_date_from_tenure(d(2025, 1, 15), 12).unwrap(), d(2026, 1, 14));
        assert_eq!(end_date_from_tenure(d(2025, 1, 1), 6).unwrap(), d(2025, 6, 30));
        // 31 jan + 1 month clamps to 28 feb, then back one day
        assert_eq!(end_date_from_tenure(d(2025, 1, 31), 1).unwrap(), d(2025, 2, 27));
        assert_eq!(add_months_clamped(d(2024, 1, 31), 1).unwrap(), d(2024, 2, 29));
    }

    #[test]
    fn test_previous_business_day_skips_weekend() {
        // 2025-06-30 is a monday
        assert_eq!(previous_business_day(d(2025, 6, 30)), d(2025, 6, 27));
        assert_eq!(previous_business_day(d(2025, 7, 2)), d(2025, 7, 1));
        assert_eq!(previous_business_day(d(2025, 6, 29)), d(2025, 6, 27));
    }
}
