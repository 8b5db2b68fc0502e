//! Human labels for timestamps shown in the pull request list.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const DAY_MS: i64 = 86_400_000;

/// Label for when a pull request was last updated, relative to `now`.
///
/// Anything newer than a day reads "yesterday", anything newer than a week
/// reads "last week", and older timestamps are rendered as a calendar date in
/// `now`'s time zone.
pub fn updated_label<Tz: TimeZone>(updated_at: DateTime<Utc>, now: &DateTime<Tz>) -> String {
    let elapsed = now.clone().signed_duration_since(updated_at);

    if elapsed < Duration::milliseconds(DAY_MS) {
        "yesterday".to_string()
    } else if elapsed < Duration::milliseconds(7 * DAY_MS) {
        "last week".to_string()
    } else {
        let local = updated_at.with_timezone(&now.timezone());
        format!(
            "on {} {}, {}",
            MONTH_NAMES[local.month0() as usize],
            local.day(),
            local.year()
        )
    }
}

/// Footer label for the moment a refresh was applied.
pub fn last_updated_label<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    format!(
        "Last updated on {} {}, {}, {}:{:02}",
        MONTH_NAMES[now.month0() as usize],
        now.day(),
        now.year(),
        now.hour(),
        now.minute()
    )
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 5, 0).unwrap()
    }

    #[rstest]
    #[case::one_hour(3_600_000, "yesterday")]
    #[case::just_under_a_day(DAY_MS - 1, "yesterday")]
    #[case::exactly_a_day(DAY_MS, "last week")]
    #[case::just_under_a_week(7 * DAY_MS - 1, "last week")]
    #[case::eight_days(8 * DAY_MS, "on Mar 7, 2024")]
    fn labels_by_elapsed_time(#[case] elapsed_ms: i64, #[case] expected: &str) {
        let updated_at = now() - Duration::milliseconds(elapsed_ms);

        assert_eq!(updated_label(updated_at, &now()), expected);
    }

    #[test]
    fn future_timestamps_read_as_recent() {
        let updated_at = now() + Duration::hours(2);

        assert_eq!(updated_label(updated_at, &now()), "yesterday");
    }

    #[test]
    fn old_dates_cross_year_boundaries() {
        let updated_at = Utc.with_ymd_and_hms(2023, 12, 31, 12, 0, 0).unwrap();

        assert_eq!(updated_label(updated_at, &now()), "on Dec 31, 2023");
    }

    #[test]
    fn last_updated_pads_minutes() {
        assert_eq!(last_updated_label(&now()), "Last updated on Mar 15, 2024, 9:05");
    }

    #[test]
    fn last_updated_keeps_two_digit_minutes() {
        let at = Utc.with_ymd_and_hms(2024, 11, 2, 17, 42, 0).unwrap();

        assert_eq!(last_updated_label(&at), "Last updated on Nov 2, 2024, 17:42");
    }
}
