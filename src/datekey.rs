use chrono::{Datelike, NaiveDate};

/// Canonical day key: `"YYYY-MM-DD"` with a zero-based month (00–11),
/// month and day zero-padded to two digits. Keys sort chronologically
/// within a year and serve as set members and note references.
pub fn format_date_key(year: i32, month: u32, day: u32) -> String {
    format!("{}-{:02}-{:02}", year, month, day)
}

/// Canonical month key: `"YYYY-MM"`, zero-based month.
pub fn format_month_key(year: i32, month: u32) -> String {
    format!("{}-{:02}", year, month)
}

/// Inverse of `format_date_key`. Returns the (year, month, day) triple,
/// month zero-based, or `None` when the string is not a valid key for a
/// real calendar date.
pub fn parse_date_key(key: &str) -> Option<(i32, u32, u32)> {
    let mut parts = key.splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    if month > 11 || day < 1 || day > days_in_month(year, month) {
        return None;
    }
    Some((year, month, day))
}

/// Inverse of `format_month_key`.
pub fn parse_month_key(key: &str) -> Option<(i32, u32)> {
    let mut parts = key.splitn(2, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    if month > 11 {
        return None;
    }
    Some((year, month))
}

/// Number of days in the zero-based `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = match NaiveDate::from_ymd_opt(year, month + 1, 1) {
        Some(d) => d,
        None => return 0,
    };
    let next = if month == 11 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 2, 1)
    };
    next.and_then(|n| n.pred_opt())
        .map(|d| d.day())
        .unwrap_or_else(|| first.day())
}

/// Weekday of day 1 of the zero-based `month`, 0 = Sunday .. 6 = Saturday.
pub fn first_weekday_of_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn total_days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Converts a zero-based (year, month, day) triple to a `NaiveDate`.
/// Valid calendar inputs only; callers gate anything user-supplied
/// through `parse_date_key` first.
pub fn to_naive_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month + 1, day)
}

/// Formats a `NaiveDate` back into a day key (month becomes zero-based).
pub fn date_key_of(date: NaiveDate) -> String {
    format_date_key(date.year(), date.month0(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_key_round_trips() {
        for &(y, m, d) in &[(2024, 0, 1), (2024, 11, 31), (2023, 1, 28), (2000, 1, 29)] {
            let key = format_date_key(y, m, d);
            assert_eq!(parse_date_key(&key), Some((y, m, d)), "key {}", key);
        }
    }

    #[test]
    fn date_key_padding() {
        assert_eq!(format_date_key(2024, 0, 5), "2024-00-05");
        assert_eq!(format_date_key(2024, 11, 31), "2024-11-31");
        assert_eq!(format_month_key(2024, 3), "2024-03");
    }

    #[test]
    fn rejects_invalid_keys() {
        assert_eq!(parse_date_key("2024-12-01"), None); // month out of range
        assert_eq!(parse_date_key("2023-01-29"), None); // Feb 29 in a common year
        assert_eq!(parse_date_key("garbage"), None);
        assert_eq!(parse_month_key("2024-12"), None);
    }

    #[test]
    fn leap_year_rule() {
        assert_eq!(total_days_in_year(2000), 366);
        assert_eq!(total_days_in_year(1900), 365);
        assert_eq!(total_days_in_year(2024), 366);
        assert_eq!(total_days_in_year(2023), 365);
    }

    #[test]
    fn february_length() {
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(2024, 0), 31);
        assert_eq!(days_in_month(2024, 11), 31);
    }

    #[test]
    fn first_weekday() {
        // 2024-01-01 was a Monday, 2023-01-01 a Sunday.
        assert_eq!(first_weekday_of_month(2024, 0), 1);
        assert_eq!(first_weekday_of_month(2023, 0), 0);
    }
}
