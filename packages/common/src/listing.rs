//! Client-side listing filters applied on top of repository results.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDateTime, TimeDelta, TimeZone, Utc};

use crate::category::CategoryFilter;
use crate::website::Website;

/// Recency window, always relative to a caller-supplied `now`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeFilter {
    #[default]
    All,
    /// Since local midnight of `now`'s calendar day.
    Today,
    /// Same local wall-clock time seven calendar days before `now`. Across a
    /// DST change the window is 167 or 169 hours long.
    Week,
    /// `now` with the month field decremented and the day-of-month kept.
    ///
    /// The day is not clamped: when the previous month is shorter, the date
    /// rolls forward into the current month (31 March becomes 3 March, or
    /// 2 March in a leap year), which narrows the window.
    Month,
}

impl TimeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Earliest creation time kept by this filter, or `None` for `All`.
    pub fn cutoff<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
        let tz = now.timezone();
        let cutoff = match self {
            Self::All => return None,
            Self::Today => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .and_then(|midnight| resolve_local(&tz, midnight))
                .unwrap_or_else(|| now.clone()),
            Self::Week => now
                .naive_local()
                .checked_sub_days(Days::new(7))
                .and_then(|naive| resolve_local(&tz, naive))
                .unwrap_or_else(|| now.clone() - TimeDelta::days(7)),
            Self::Month => previous_month_overflowing(now.naive_local())
                .and_then(|naive| resolve_local(&tz, naive))
                .unwrap_or_else(|| now.clone()),
        };
        Some(cutoff.with_timezone(&Utc))
    }
}

/// Same wall-clock time one month earlier, with day overflow rolling into the
/// following month.
fn previous_month_overflowing(local: NaiveDateTime) -> Option<NaiveDateTime> {
    use chrono::{Datelike, NaiveDate};

    let date = local.date();
    let (year, month) = match date.month() {
        1 => (date.year() - 1, 12),
        m => (date.year(), m - 1),
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let shifted = first.checked_add_days(Days::new(u64::from(date.day() - 1)))?;
    Some(shifted.and_time(local.time()))
}

/// Map a local wall-clock time to an instant. Times that fall into a DST gap
/// move forward by an hour.
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + TimeDelta::hours(1))).earliest())
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown time filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimeFilterError {
    invalid: String,
}

impl fmt::Display for ParseTimeFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid time filter '{}'. Valid values: all, today, week, month",
            self.invalid
        )
    }
}

impl std::error::Error for ParseTimeFilterError {}

impl FromStr for TimeFilter {
    type Err = ParseTimeFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(ParseTimeFilterError {
                invalid: s.to_string(),
            }),
        }
    }
}

/// Apply the category filter, then the time filter. Input order is kept;
/// nothing is re-sorted.
pub fn view<Tz: TimeZone>(
    records: Vec<Website>,
    category: CategoryFilter,
    time: TimeFilter,
    now: &DateTime<Tz>,
) -> Vec<Website> {
    let cutoff = time.cutoff(now);
    records
        .into_iter()
        .filter(|w| category.matches(w.category))
        .filter(|w| cutoff.is_none_or(|c| w.created_at >= c))
        .collect()
}
