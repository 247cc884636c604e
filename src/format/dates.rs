use std::fmt;

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};

/// Average month length used by [`time_between`].
const SECONDS_PER_MONTH: f64 = 2_629_743.83;

const EMPTY_DATES: [&str; 2] = ["0000-00-00", "0000-00-00 00:00:00"];

/// Parses `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS` (a `T` separator also works).
///
/// Empty input and the all-zero placeholder dates yield `None`.
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() || EMPTY_DATES.contains(&input) {
        return None;
    }

    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parses `input` and renders it with a strftime `format`.
///
/// Returns `None` when the date does not parse or the format string holds an
/// unknown specifier.
///
/// ```
/// use textfmt::format::format_date;
///
/// assert_eq!(
///     format_date("2024-03-05", "%B %-d, %Y").as_deref(),
///     Some("March 5, 2024")
/// );
/// assert_eq!(format_date("0000-00-00", "%Y"), None);
/// ```
pub fn format_date(input: &str, format: &str) -> Option<String> {
    let date = parse_date(input)?;
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        tracing::debug!(format, "Invalid date format string");
        return None;
    }
    Some(date.format_with_items(items.iter()).to_string())
}

/// First day of the week containing `date`, for weeks starting on `week_start`.
pub fn first_day_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (date.weekday().num_days_from_sunday() + 7 - week_start.num_days_from_sunday()) % 7;
    date - Days::new(u64::from(offset))
}

/// Last day of the week containing `date`, for weeks starting on `week_start`.
///
/// ```
/// use chrono::{NaiveDate, Weekday};
/// use textfmt::format::{first_day_of_week, last_day_of_week};
///
/// // Wednesday
/// let date = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
/// assert_eq!(first_day_of_week(date, Weekday::Sun), NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
/// assert_eq!(last_day_of_week(date, Weekday::Sun), NaiveDate::from_ymd_opt(2024, 5, 18).unwrap());
/// assert_eq!(first_day_of_week(date, Weekday::Mon), NaiveDate::from_ymd_opt(2024, 5, 13).unwrap());
/// ```
pub fn last_day_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    first_day_of_week(date, week_start) + Days::new(6)
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let last = days_in_month(date.year(), date.month());
    date + Days::new(u64::from(last - date.day()))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Unit returned by [`time_between`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BetweenUnit {
    #[default]
    Seconds,
    Months,
}

/// Time from `start` to `end`; negative when `end` comes first.
///
/// Months use an average length of 2629743.83 seconds and round down, or up
/// when `include_partial` is set.
pub fn time_between(
    start: NaiveDateTime,
    end: NaiveDateTime,
    unit: BetweenUnit,
    include_partial: bool,
) -> i64 {
    let seconds = (end - start).num_seconds();
    match unit {
        BetweenUnit::Seconds => seconds,
        BetweenUnit::Months => {
            let months = seconds as f64 / SECONDS_PER_MONTH;
            if include_partial {
                months.ceil() as i64
            } else {
                months.floor() as i64
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl IntervalUnit {
    /// Largest first.
    const ALL: [(IntervalUnit, u64); 7] = [
        (IntervalUnit::Year, 31_536_000),
        (IntervalUnit::Month, 2_628_000),
        (IntervalUnit::Week, 604_800),
        (IntervalUnit::Day, 86_400),
        (IntervalUnit::Hour, 3_600),
        (IntervalUnit::Minute, 60),
        (IntervalUnit::Second, 1),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IntervalUnit::Year => "year",
            IntervalUnit::Month => "month",
            IntervalUnit::Week => "week",
            IntervalUnit::Day => "day",
            IntervalUnit::Hour => "hour",
            IntervalUnit::Minute => "minute",
            IntervalUnit::Second => "second",
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distance between a date and "now", in the largest unit that fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeInterval {
    pub number: u64,
    /// `None` when both instants are equal.
    pub unit: Option<IntervalUnit>,
    /// `true` when `date` is at or before `now`.
    pub past: bool,
}

/// Measures `date` against `now` in whole years, months, weeks and so on.
pub fn relative_interval(date: NaiveDateTime, now: NaiveDateTime) -> RelativeInterval {
    let seconds = (now - date).num_seconds();
    let past = seconds >= 0;
    let seconds = seconds.unsigned_abs();

    IntervalUnit::ALL
        .iter()
        .find(|(_, size)| seconds >= *size)
        .map(|&(unit, size)| RelativeInterval {
            number: seconds / size,
            unit: Some(unit),
            past,
        })
        .unwrap_or(RelativeInterval {
            number: 0,
            unit: None,
            past,
        })
}

/// Human wording of [`relative_interval`].
///
/// Past dates read "3 minutes ago"; future ones "until tomorrow",
/// "until next week" or "for 2 more hours".
///
/// ```
/// use textfmt::format::{parse_date, relative_interval_str};
///
/// let now = parse_date("2024-05-15 12:00:00").unwrap();
/// let earlier = parse_date("2024-05-15 11:57:00").unwrap();
/// let later = parse_date("2024-05-16 13:00:00").unwrap();
///
/// assert_eq!(relative_interval_str(earlier, now), "3 minutes ago");
/// assert_eq!(relative_interval_str(later, now), "until tomorrow");
/// assert_eq!(relative_interval_str(now, now), "just now");
/// ```
pub fn relative_interval_str(date: NaiveDateTime, now: NaiveDateTime) -> String {
    let interval = relative_interval(date, now);
    let Some(unit) = interval.unit else {
        return "just now".to_string();
    };

    let units = super::pluralize(unit.as_str(), interval.number as i64, None);
    if interval.past {
        return format!("{} {} ago", interval.number, units);
    }

    match (interval.number, unit) {
        (1, IntervalUnit::Day) => "until tomorrow".to_string(),
        (1, IntervalUnit::Minute | IntervalUnit::Second) => format!("for 1 more {}", units),
        (1, _) => format!("until next {}", unit),
        (n, _) => format!("for {} more {}", n, units),
    }
}
