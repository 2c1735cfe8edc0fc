//! Date-only calendar arithmetic shared by the resolver and describer.
//!
//! Every month and year step goes through [`date_from_parts`], which
//! normalises out-of-range components by carrying them forward (or
//! backward) the way wall-calendar rollover does: month 13 of 2024 is
//! January 2025, and day 31 of April is May 1. Nothing here clamps.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Weekday};

use crate::error::{ChoreError, Result};

/// English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English weekday names, indexed 0 = Sunday .. 6 = Saturday.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

// ── Rollover arithmetic ─────────────────────────────────────────────────────

/// Build a date from components that may be out of range.
///
/// `month` is 1-based and may be anything (0 is December of the previous
/// year, 13 is January of the next). `day` is 1-based and may overflow the
/// month in either direction. Returns `None` only when the result falls
/// outside chrono's representable range.
///
/// ```
/// use chrono::NaiveDate;
/// use chore_engine::calendar::date_from_parts;
///
/// // February 29 in a non-leap year rolls into March.
/// assert_eq!(date_from_parts(2025, 2, 29), NaiveDate::from_ymd_opt(2025, 3, 1));
/// // Month 13 rolls into the next year.
/// assert_eq!(date_from_parts(2024, 13, 5), NaiveDate::from_ymd_opt(2025, 1, 5));
/// ```
pub fn date_from_parts(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    let month0 = month.checked_sub(1)?;
    let year = year.checked_add(month0.div_euclid(12))?;
    let month = (month0.rem_euclid(12) + 1) as u32;
    let first = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, 1)?;
    add_days(first, day.checked_sub(1)?)
}

/// Add a signed number of days, `None` on overflow.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(chrono::Duration::try_days(days)?)
}

/// Move `date` by `months`, keeping its day of month and letting it roll
/// over: January 31 plus one month is March 2 (or March 1 in a leap year).
pub fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    date_from_parts(
        i64::from(date.year()),
        i64::from(date.month()).checked_add(months)?,
        i64::from(date.day()),
    )
}

/// Move `date` by `years`, keeping month and day. February 29 rolls into
/// March 1 when the target year is not a leap year.
pub fn add_years(date: NaiveDate, years: i64) -> Option<NaiveDate> {
    date_from_parts(
        i64::from(date.year()).checked_add(years)?,
        i64::from(date.month()),
        i64::from(date.day()),
    )
}

/// Months between the start of `from`'s month and the start of `to`'s.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let index = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
    index(to) - index(from)
}

/// The `n`th (1-based) occurrence of `weekday` in a month, counted from day 1.
///
/// Returns `None` if that occurrence does not exist in the month (e.g. a
/// fifth Monday) or the month is invalid.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    if n == 0 {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let diff = (weekday.num_days_from_sunday() + 7 - first.weekday().num_days_from_sunday()) % 7;
    let target = add_days(first, i64::from(diff) + 7 * (i64::from(n) - 1))?;
    (target.month() == month).then_some(target)
}

/// The last occurrence of `weekday` in a month.
pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = add_months(first, 1)?.pred_opt()?;
    let diff = (last.weekday().num_days_from_sunday() + 7 - weekday.num_days_from_sunday()) % 7;
    add_days(last, -i64::from(diff))
}

// ── Weekday and month naming ────────────────────────────────────────────────

/// Convert a 0 = Sunday .. 6 = Saturday index into a [`Weekday`].
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Inverse of [`weekday_from_index`].
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

pub fn weekday_name(index: u8) -> Option<&'static str> {
    WEEKDAY_NAMES.get(usize::from(index)).copied()
}

pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTH_NAMES.get(index).copied()
}

/// English ordinal suffix for a day number: 1 → "st", 12 → "th", 22 → "nd".
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// A day number followed by its ordinal suffix, e.g. `"21st"`.
pub fn with_ordinal_suffix(day: u32) -> String {
    format!("{day}{}", ordinal_suffix(day))
}

// ── Parsing helpers ─────────────────────────────────────────────────────────

/// Parse a weekday given as a name, a three-letter abbreviation, or a digit
/// 0..6 (0 = Sunday). Case-insensitive.
pub fn parse_weekday(s: &str) -> Option<u8> {
    let s = s.trim().to_lowercase();
    let index = match s.as_str() {
        "sunday" | "sun" | "0" => 0,
        "monday" | "mon" | "1" => 1,
        "tuesday" | "tue" | "tues" | "2" => 2,
        "wednesday" | "wed" | "3" => 3,
        "thursday" | "thu" | "thurs" | "4" => 4,
        "friday" | "fri" | "5" => 5,
        "saturday" | "sat" | "6" => 6,
        _ => return None,
    };
    Some(index)
}

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp. A timestamp is an
/// instant, so it is read as the calendar date it falls on in the local
/// zone: older stores wrote local midnight as a UTC string.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    parse_date_in(s, &Local)
}

/// [`parse_date`] with timestamps converted to the calendar of `tz`.
pub fn parse_date_in<Tz: TimeZone>(s: &str, tz: &Tz) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(tz).date_naive()))
        .map_err(|e| ChoreError::InvalidDate(format!("'{s}': {e}")))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── date_from_parts tests ───────────────────────────────────────────

    #[test]
    fn test_parts_in_range() {
        assert_eq!(date_from_parts(2024, 3, 15), Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_parts_day_overflows_short_month() {
        assert_eq!(date_from_parts(2024, 4, 31), Some(date(2024, 5, 1)));
        assert_eq!(date_from_parts(2023, 2, 31), Some(date(2023, 3, 3)));
    }

    #[test]
    fn test_parts_leap_day() {
        assert_eq!(date_from_parts(2024, 2, 29), Some(date(2024, 2, 29)));
        assert_eq!(date_from_parts(2025, 2, 29), Some(date(2025, 3, 1)));
    }

    #[test]
    fn test_parts_month_overflow_carries_year() {
        assert_eq!(date_from_parts(2024, 13, 1), Some(date(2025, 1, 1)));
        assert_eq!(date_from_parts(2024, 25, 10), Some(date(2026, 1, 10)));
    }

    #[test]
    fn test_parts_month_zero_is_previous_december() {
        assert_eq!(date_from_parts(2024, 0, 15), Some(date(2023, 12, 15)));
    }

    #[test]
    fn test_parts_day_zero_is_previous_month_end() {
        assert_eq!(date_from_parts(2024, 3, 0), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_parts_out_of_range_year() {
        assert_eq!(date_from_parts(i64::MAX, 1, 1), None);
    }

    // ── add_months / add_years tests ────────────────────────────────────

    #[test]
    fn test_add_months_forward_across_year() {
        assert_eq!(add_months(date(2024, 11, 15), 3), Some(date(2025, 2, 15)));
    }

    #[test]
    fn test_add_months_backward_across_year() {
        assert_eq!(add_months(date(2024, 1, 15), -1), Some(date(2023, 12, 15)));
    }

    #[test]
    fn test_add_months_rolls_month_end_over() {
        // February 31 does not exist: two days past February 29.
        assert_eq!(add_months(date(2024, 1, 31), 1), Some(date(2024, 3, 2)));
        assert_eq!(add_months(date(2023, 1, 31), 1), Some(date(2023, 3, 3)));
        assert_eq!(add_months(date(2024, 3, 31), 1), Some(date(2024, 5, 1)));
    }

    #[test]
    fn test_add_years_leap_day() {
        assert_eq!(add_years(date(2024, 2, 29), 1), Some(date(2025, 3, 1)));
        assert_eq!(add_years(date(2024, 2, 29), 4), Some(date(2028, 2, 29)));
    }

    #[test]
    fn test_months_between() {
        assert_eq!(months_between(date(2024, 1, 31), date(2024, 2, 1)), 1);
        assert_eq!(months_between(date(2024, 6, 1), date(2034, 6, 30)), 120);
        assert_eq!(months_between(date(2024, 1, 1), date(2023, 12, 31)), -1);
    }

    // ── weekday-of-month tests ──────────────────────────────────────────

    #[test]
    fn test_first_monday_of_april_2024() {
        // April 1 2024 is a Monday
        assert_eq!(
            nth_weekday_of_month(2024, 4, Weekday::Mon, 1),
            Some(date(2024, 4, 1))
        );
    }

    #[test]
    fn test_third_tuesday_of_march_2024() {
        assert_eq!(
            nth_weekday_of_month(2024, 3, Weekday::Tue, 3),
            Some(date(2024, 3, 19))
        );
    }

    #[test]
    fn test_fourth_sunday_of_february_2026() {
        // Feb 1 2026 is a Sunday
        assert_eq!(
            nth_weekday_of_month(2026, 2, Weekday::Sun, 4),
            Some(date(2026, 2, 22))
        );
    }

    #[test]
    fn test_fifth_occurrence_missing() {
        assert_eq!(nth_weekday_of_month(2024, 2, Weekday::Mon, 5), None);
    }

    #[test]
    fn test_last_friday_of_march_2024() {
        assert_eq!(
            last_weekday_of_month(2024, 3, Weekday::Fri),
            Some(date(2024, 3, 29))
        );
    }

    #[test]
    fn test_last_weekday_when_month_ends_on_it() {
        // Dec 31 2024 is a Tuesday
        assert_eq!(
            last_weekday_of_month(2024, 12, Weekday::Tue),
            Some(date(2024, 12, 31))
        );
    }

    #[test]
    fn test_last_thursday_of_leap_february() {
        // Feb 29 2024 is a Thursday
        assert_eq!(
            last_weekday_of_month(2024, 2, Weekday::Thu),
            Some(date(2024, 2, 29))
        );
    }

    // ── naming tests ────────────────────────────────────────────────────

    #[test]
    fn test_weekday_index_roundtrip_sunday_first() {
        assert_eq!(weekday_from_index(0), Some(Weekday::Sun));
        assert_eq!(weekday_from_index(6), Some(Weekday::Sat));
        assert_eq!(weekday_from_index(7), None);
        assert_eq!(weekday_index(Weekday::Wed), 3);
    }

    #[test]
    fn test_month_name_bounds() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_ordinal_suffixes() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (20, "20th"),
            (21, "21st"),
            (22, "22nd"),
            (23, "23rd"),
            (30, "30th"),
            (31, "31st"),
        ];
        for (day, expected) in cases {
            assert_eq!(with_ordinal_suffix(day), expected, "day {day}");
        }
    }

    // ── parsing tests ───────────────────────────────────────────────────

    #[test]
    fn test_parse_weekday_variants() {
        assert_eq!(parse_weekday("Friday"), Some(5));
        assert_eq!(parse_weekday("sun"), Some(0));
        assert_eq!(parse_weekday(" 3 "), Some(3));
        assert_eq!(parse_weekday("7"), None);
        assert_eq!(parse_weekday("someday"), None);
    }

    #[test]
    fn test_parse_date_plain() {
        assert_eq!(parse_date("2024-01-10").unwrap(), date(2024, 1, 10));
    }

    #[test]
    fn test_parse_date_plain_ignores_zone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(parse_date_in("2024-01-10", &tokyo).unwrap(), date(2024, 1, 10));
    }

    #[test]
    fn test_parse_date_rfc3339_uses_calendar_of_zone() {
        // Local midnight in Berlin, written as UTC by older stores.
        let berlin = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(
            parse_date_in("2024-01-09T23:00:00.000Z", &berlin).unwrap(),
            date(2024, 1, 10)
        );

        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(
            parse_date_in("2024-01-10T02:30:00Z", &new_york).unwrap(),
            date(2024, 1, 9)
        );
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(matches!(
            parse_date("10/01/2024"),
            Err(ChoreError::InvalidDate(_))
        ));
    }
}
