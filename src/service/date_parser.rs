//! Rule-based date/time guessing for scheduling requests.
//!
//! Only three relative phrases are understood ("tomorrow", "next week" and
//! the implicit "today"); everything else falls through to the defaults.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use regex::Regex;

pub const DEFAULT_HOUR: u32 = 14;
pub const DEFAULT_MINUTE: u32 = 0;

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2}):?(\d{0,2})\s*(am|pm)?").expect("Invalid time regex")
});

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*(minutes?|mins?|hours?|hrs?)\b").expect("Invalid duration regex")
});

/// Resolves `text` to a concrete date-time relative to `now`.
///
/// Hours and minutes are not range-checked: "25:00" lands at 01:00 on the
/// following day.
pub fn parse_date_time(text: &str, now: DateTime<Tz>) -> DateTime<Tz> {
    let lower = text.to_lowercase();
    let mut date = now.date_naive();
    if lower.contains("tomorrow") {
        date += Duration::days(1);
    } else if lower.contains("next week") {
        date += Duration::days(7);
    }

    let (hour, minute) = extract_time(&lower);
    let naive = date.and_time(NaiveTime::MIN)
        + Duration::hours(i64::from(hour))
        + Duration::minutes(i64::from(minute));
    localize(&now.timezone(), naive)
}

/// Returns `(hour, minute)` in 24-hour form. Defaults to 14:00 when the
/// text carries no digits.
pub fn extract_time(text: &str) -> (u32, u32) {
    let lower = text.to_lowercase();
    let Some(caps) = TIME_RE.captures(&lower) else {
        return (DEFAULT_HOUR, DEFAULT_MINUTE);
    };

    let mut hour: u32 = caps[1].parse().unwrap_or(DEFAULT_HOUR);
    let minute: u32 = caps
        .get(2)
        .map(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .and_then(|m| m.parse().ok())
        .unwrap_or(DEFAULT_MINUTE);

    match caps.get(3).map(|m| m.as_str()) {
        Some("pm") if hour != 12 => hour += 12,
        Some("am") if hour == 12 => hour = 0,
        _ => {}
    }
    (hour, minute)
}

pub fn extract_duration(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    if lower.contains("half an hour") {
        return Some(30);
    }
    let caps = DURATION_RE.captures(&lower)?;
    let amount: u32 = caps[1].parse().ok()?;
    if caps[2].starts_with('h') {
        amount.checked_mul(60)
    } else {
        Some(amount)
    }
}

/// Pins a wall-clock time to `tz`. A time skipped by a spring-forward jump
/// moves an hour later, past the gap.
pub fn localize(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike, Utc};
    use chrono_tz::America::New_York;

    fn now() -> DateTime<Tz> {
        New_York.with_ymd_and_hms(2026, 2, 10, 9, 15, 42).unwrap()
    }

    #[test]
    fn tomorrow_shifts_one_day_and_defaults_to_two_pm() {
        let parsed = parse_date_time("Schedule a meeting tomorrow afternoon", now());
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2026, 2, 11).unwrap());
        assert_eq!((parsed.hour(), parsed.minute(), parsed.second()), (14, 0, 0));
    }

    #[test]
    fn next_week_shifts_seven_days() {
        let parsed = parse_date_time("team sync next week at 10am", now());
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2026, 2, 17).unwrap());
        assert_eq!((parsed.hour(), parsed.minute()), (10, 0));
    }

    #[test]
    fn tomorrow_wins_over_next_week() {
        let parsed = parse_date_time("tomorrow, not next week", now());
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2026, 2, 11).unwrap());
    }

    #[test]
    fn other_phrases_stay_on_today() {
        let parsed = parse_date_time("next Monday in two hours", now());
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
        assert_eq!(parsed.hour(), 14);
    }

    #[test]
    fn twelve_hour_clock_converts() {
        assert_eq!(extract_time("2:30 pm"), (14, 30));
        assert_eq!(extract_time("12:00 am"), (0, 0));
        assert_eq!(extract_time("12:15 PM"), (12, 15));
        assert_eq!(extract_time("at 7am"), (7, 0));
        assert_eq!(extract_time("at 11:45pm"), (23, 45));
    }

    #[test]
    fn bare_hour_is_taken_literally() {
        assert_eq!(extract_time("call at 9"), (9, 0));
        assert_eq!(extract_time("standup 16:30"), (16, 30));
    }

    #[test]
    fn missing_time_defaults() {
        assert_eq!(extract_time("lunch with Sam"), (14, 0));
    }

    #[test]
    fn out_of_range_hour_rolls_over() {
        let parsed = parse_date_time("today at 25:00", now());
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2026, 2, 11).unwrap());
        assert_eq!(parsed.hour(), 1);
    }

    #[test]
    fn time_in_spring_forward_gap_moves_past_it() {
        let before_jump = New_York.with_ymd_and_hms(2026, 3, 7, 10, 0, 0).unwrap();
        let parsed = parse_date_time("tomorrow at 2:30 am", before_jump);
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
        assert_eq!((parsed.hour(), parsed.minute()), (3, 30));
        assert_eq!(
            parsed.to_utc(),
            Utc.with_ymd_and_hms(2026, 3, 8, 7, 30, 0).unwrap()
        );
    }

    #[test]
    fn durations_are_read_in_minutes() {
        assert_eq!(extract_duration("a 45 minute call"), Some(45));
        assert_eq!(extract_duration("2 hours please"), Some(120));
        assert_eq!(extract_duration("half an hour"), Some(30));
        assert_eq!(extract_duration("quick chat"), None);
    }
}
