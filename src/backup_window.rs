//! Weekly backup worksheet resolution.
//!
//! The emergency purchasing team closes a backup worksheet every Monday for
//! the work week that just ended. Worksheets are named after their Monday to
//! Friday span, e.g. `"02.06 a 06.06"`.

use crate::utils::{
    days_before, days_since_friday, format_day_month, is_weekend, weekday_index, MONDAY,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monday to Friday span identifying one backup worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackupWindow {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
}

impl BackupWindow {
    /// Worksheet label: `"{DD.MM} a {DD.MM}"`.
    pub fn label(&self) -> String {
        format!(
            "{} a {}",
            format_day_month(self.week_start),
            format_day_month(self.week_end)
        )
    }
}

impl fmt::Display for BackupWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

pub struct BackupWindowResolver;

impl BackupWindowResolver {
    /// Maps `today` to the most recently *closed* work week.
    ///
    /// - Monday: the Friday three days ago.
    /// - Saturday/Sunday: the Friday of the current calendar week.
    /// - Tuesday to Friday: one week before the most recent Friday.
    pub fn resolve(today: NaiveDate) -> BackupWindow {
        let week_end = if weekday_index(today) == MONDAY {
            days_before(today, 3)
        } else {
            let since_friday = days_since_friday(today);
            if is_weekend(today) {
                days_before(today, since_friday)
            } else {
                days_before(today, since_friday + 7)
            }
        };

        BackupWindow {
            week_start: days_before(week_end, 4),
            week_end,
        }
    }
}

pub fn resolve_backup_window(today: NaiveDate) -> BackupWindow {
    BackupWindowResolver::resolve(today)
}

/// Name of the backup worksheet that is authoritative on `today`.
pub fn backup_sheet_name(today: NaiveDate) -> String {
    BackupWindowResolver::resolve(today).label()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Days, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monday_points_to_previous_friday() {
        let window = BackupWindowResolver::resolve(date(2025, 6, 9));
        assert_eq!(window.week_end, date(2025, 6, 6));
        assert_eq!(window.week_start, date(2025, 6, 2));
        assert_eq!(window.label(), "02.06 a 06.06");
    }

    #[test]
    fn test_tuesday_skips_the_most_recent_friday() {
        let window = BackupWindowResolver::resolve(date(2025, 6, 10));
        assert_eq!(window.week_end, date(2025, 5, 30));
        assert_eq!(window.week_start, date(2025, 5, 26));
        assert_eq!(window.label(), "26.05 a 30.05");
    }

    #[test]
    fn test_friday_does_not_point_to_itself() {
        let window = BackupWindowResolver::resolve(date(2025, 6, 13));
        assert_eq!(window.label(), "02.06 a 06.06");
    }

    #[test]
    fn test_weekend_points_to_the_friday_just_passed() {
        assert_eq!(backup_sheet_name(date(2025, 6, 14)), "09.06 a 13.06");
        assert_eq!(backup_sheet_name(date(2025, 6, 15)), "09.06 a 13.06");
    }

    #[test]
    fn test_window_spanning_month_and_year() {
        // Monday 2025-01-06 -> Friday 2025-01-03, Monday 2024-12-30
        assert_eq!(backup_sheet_name(date(2025, 1, 6)), "30.12 a 03.01");
    }

    #[test]
    fn test_every_day_maps_to_monday_through_friday() {
        let mut today = date(2024, 1, 1);
        let end = date(2026, 12, 31);
        while today <= end {
            let window = BackupWindowResolver::resolve(today);
            assert_eq!(window.week_end.weekday(), Weekday::Fri, "{}", today);
            assert_eq!(window.week_start.weekday(), Weekday::Mon, "{}", today);
            assert_eq!((window.week_end - window.week_start).num_days(), 4);
            assert!(window.week_end < today, "window must be closed on {}", today);
            assert!((today - window.week_end).num_days() <= 13);
            today = today + Days::new(1);
        }
    }

    #[test]
    fn test_display_matches_label() {
        let window = resolve_backup_window(date(2025, 6, 10));
        assert_eq!(window.to_string(), window.label());
    }
}
