use chrono::{Datelike, Days, NaiveDate, Weekday};

pub const MONDAY: u32 = 0;
pub const FRIDAY: u32 = 4;

/// Weekday index with Monday = 0 through Sunday = 6.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Days elapsed since the most recent Friday (0 when `date` is a Friday).
pub fn days_since_friday(date: NaiveDate) -> u64 {
    ((weekday_index(date) + 7 - FRIDAY) % 7) as u64
}

/// Subtracts whole days, saturating at the earliest representable date.
pub fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN)
}

/// `DD.MM`, the form used in backup worksheet names.
pub fn format_day_month(date: NaiveDate) -> String {
    date.format("%d.%m").to_string()
}

/// `DD/MM/YYYY`, the form shown to operators.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `YYYY-MM-DD`, used as the cache key for a day's tables.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Expands a two-digit year using the POSIX `%y` pivot.
pub fn expand_two_digit_year(year: i32) -> i32 {
    if year < 70 {
        2000 + year
    } else {
        1900 + year
    }
}
