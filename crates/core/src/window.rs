//! Calendar window arithmetic.
//!
//! All windows are half-open `[start, end)` intervals in UTC: a day runs
//! from midnight to the next midnight, a week from the most recent Monday
//! at or before the given date, a month from the first of the month to the
//! first of the next.

use chrono::{DateTime, Datelike, Duration, Months, NaiveTime, Utc};

/// Midnight at the start of `date`'s day.
fn midnight(date: DateTime<Utc>) -> DateTime<Utc> {
    date.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// The day containing `date`: `[midnight, midnight + 24h)`.
pub fn day_window(date: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = midnight(date);
    (start, start + Duration::days(1))
}

/// The week containing `date`, anchored on the most recent Monday at or
/// before it: `[monday midnight, +7 days)`.
pub fn week_window(date: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let days_from_monday = i64::from(date.weekday().num_days_from_monday());
    let start = midnight(date) - Duration::days(days_from_monday);
    (start, start + Duration::days(7))
}

/// The month containing `date`: `[first of month, first of next month)`.
pub fn month_window(date: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let first = date
        .date_naive()
        .with_day(1)
        .expect("day 1 exists in every month")
        .and_time(NaiveTime::MIN)
        .and_utc();
    let next = first
        .checked_add_months(Months::new(1))
        .expect("month arithmetic stays in chrono's supported range");
    (first, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn day_window_spans_midnight_to_midnight() {
        let date = Utc.with_ymd_and_hms(2021, 6, 20, 15, 42, 7).unwrap();

        let (start, end) = day_window(date);

        assert_eq!(start, Utc.with_ymd_and_hms(2021, 6, 20, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2021, 6, 21, 0, 0, 0).unwrap());
    }

    #[test]
    fn week_window_anchors_on_most_recent_monday() {
        // 2021-06-20 is a Sunday.
        let date = Utc.with_ymd_and_hms(2021, 6, 20, 12, 0, 0).unwrap();

        let (start, end) = week_window(date);

        assert_eq!(start, Utc.with_ymd_and_hms(2021, 6, 14, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2021, 6, 21, 0, 0, 0).unwrap());
    }

    #[test]
    fn week_window_on_a_monday_starts_that_day() {
        let date = Utc.with_ymd_and_hms(2021, 6, 14, 8, 30, 0).unwrap();

        let (start, _) = week_window(date);

        assert_eq!(start, Utc.with_ymd_and_hms(2021, 6, 14, 0, 0, 0).unwrap());
    }

    #[test]
    fn month_window_runs_first_to_first() {
        let date = Utc.with_ymd_and_hms(2021, 6, 20, 12, 0, 0).unwrap();

        let (start, end) = month_window(date);

        assert_eq!(start, Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2021, 7, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn month_window_wraps_the_year_boundary() {
        let date = Utc.with_ymd_and_hms(2021, 12, 31, 23, 59, 59).unwrap();

        let (start, end) = month_window(date);

        assert_eq!(start, Utc.with_ymd_and_hms(2021, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());
    }
}
