// 📅 Temporal Model - calendar days, months and years
//
// Every date in the static content is a string written by hand in the admin
// generator. We keep the raw text (so records serialize back exactly as they
// were loaded) next to the parsed calendar day.
//
// Accepted forms:
// 1. "2024-01-05"                 plain calendar date
// 2. "2024-01-05T14:30" / ":00"   local date-time
// 3. "2024-01-05T14:30:00-03:00"  RFC 3339 (offset ignored, wall-clock kept)

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::format::month_name;

// ============================================================================
// PARSE ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    #[error("empty date")]
    Empty,

    #[error("'{0}' is not a calendar date")]
    Invalid(String),

    #[error("'{0}' is not a year")]
    InvalidYear(String),

    #[error("'{0}' is not a month (1-12)")]
    InvalidMonth(String),
}

// ============================================================================
// ISO DATE
// ============================================================================

/// A date field as written in the JSON resources.
///
/// The calendar day is the date as written: time of day and offset never
/// move a record to another day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IsoDate {
    raw: String,
    day: NaiveDate,
    time: Option<NaiveTime>,
}

impl IsoDate {
    pub fn parse(text: &str) -> Result<Self, DateParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DateParseError::Empty);
        }

        if let Ok(day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(IsoDate {
                raw: text.to_string(),
                day,
                time: None,
            });
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            let local = dt.naive_local();
            return Ok(IsoDate {
                raw: text.to_string(),
                day: local.date(),
                time: Some(local.time()),
            });
        }

        for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, pattern) {
                return Ok(IsoDate {
                    raw: text.to_string(),
                    day: dt.date(),
                    time: Some(dt.time()),
                });
            }
        }

        Err(DateParseError::Invalid(text.to_string()))
    }

    /// Build from a calendar day (time unknown). Mostly for tests and defaults.
    pub fn from_day(day: NaiveDate) -> Self {
        IsoDate {
            raw: day.format("%Y-%m-%d").to_string(),
            day,
            time: None,
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Full timestamp for ordering; a bare date sorts at midnight.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.day.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }

    pub fn month_year(&self) -> MonthYear {
        MonthYear::from_date(self.day)
    }
}

impl TryFrom<String> for IsoDate {
    type Error = DateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        IsoDate::parse(&value)
    }
}

impl From<IsoDate> for String {
    fn from(value: IsoDate) -> Self {
        value.raw
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ============================================================================
// YEAR / MONTH FIELDS
// ============================================================================

/// A year written as a string field ("2024").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Year(pub i32);

impl Year {
    pub fn parse(text: &str) -> Result<Self, DateParseError> {
        let trimmed = text.trim();
        match trimmed.parse::<i32>() {
            Ok(year) if trimmed.len() == 4 && year > 0 => Ok(Year(year)),
            _ => Err(DateParseError::InvalidYear(text.to_string())),
        }
    }
}

impl TryFrom<String> for Year {
    type Error = DateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Year::parse(&value)
    }
}

impl From<Year> for String {
    fn from(value: Year) -> Self {
        value.0.to_string()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month written as a string field ("1".."12", leading zero allowed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(pub u32);

impl Month {
    pub fn parse(text: &str) -> Result<Self, DateParseError> {
        match text.trim().parse::<u32>() {
            Ok(month) if (1..=12).contains(&month) => Ok(Month(month)),
            _ => Err(DateParseError::InvalidMonth(text.to_string())),
        }
    }
}

impl TryFrom<String> for Month {
    type Error = DateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Month::parse(&value)
    }
}

impl From<Month> for String {
    fn from(value: Month) -> Self {
        value.0.to_string()
    }
}

// ============================================================================
// MONTH / YEAR
// ============================================================================

/// A calendar month. Field order matters: the derived `Ord` compares the
/// numeric year first, then the numeric month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthYear {
    pub year: i32,
    pub month: u32,
}

impl MonthYear {
    /// `None` for a month outside 1..=12 or a year chrono cannot represent.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| MonthYear { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        MonthYear {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Clamps to the representable range when the fields were set by hand.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(if self.year < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
    }

    pub fn last_day(&self) -> NaiveDate {
        let last = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year, 12, 31)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1).and_then(|day| day.pred_opt())
        };
        last.unwrap_or_else(|| self.first_day())
    }

    /// Following month. Stays put at the last representable month.
    pub fn next(&self) -> MonthYear {
        if self.month == 12 {
            self.year
                .checked_add(1)
                .and_then(|year| MonthYear::new(year, 1))
                .unwrap_or(*self)
        } else {
            MonthYear { year: self.year, month: self.month + 1 }
        }
    }

    /// Preceding month. Stays put at the first representable month.
    pub fn previous(&self) -> MonthYear {
        if self.month == 1 {
            self.year
                .checked_sub(1)
                .and_then(|year| MonthYear::new(year, 12))
                .unwrap_or(*self)
        } else {
            MonthYear { year: self.year, month: self.month - 1 }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Every day of the month, first to last.
    pub fn days(&self) -> Vec<NaiveDate> {
        days_in_interval(self.first_day(), self.last_day()).collect()
    }

    /// Display label, e.g. "Janeiro de 2024"
    pub fn label(&self) -> String {
        format!("{} de {}", month_name(self.month).unwrap_or("?"), self.year)
    }

    /// Group key text, e.g. "2024-1" (month is not padded)
    pub fn key(&self) -> String {
        format!("{}-{}", self.year, self.month)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

// ============================================================================
// DAY HELPERS
// ============================================================================

/// Every calendar day in `[start, end]`, inclusive. Empty when `end < start`.
pub fn days_in_interval(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(start), |day| day.succ_opt()).take_while(move |day| *day <= end)
}

/// Month grid in weeks starting on Sunday. Cells outside the month are `None`.
pub fn calendar_weeks(month: MonthYear) -> Vec<[Option<NaiveDate>; 7]> {
    let mut weeks = Vec::new();
    let mut week: [Option<NaiveDate>; 7] = [None; 7];

    for day in month.days() {
        let column = day.weekday().num_days_from_sunday() as usize;
        week[column] = Some(day);
        if day.weekday() == Weekday::Sat {
            weeks.push(week);
            week = [None; 7];
        }
    }

    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }

    weeks
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        let date = IsoDate::parse("2024-01-05").unwrap();
        assert_eq!(date.day(), ymd(2024, 1, 5));
        assert!(date.time().is_none());
        assert_eq!(date.as_str(), "2024-01-05");
    }

    #[test]
    fn test_parse_date_time_keeps_wall_clock_day() {
        let date = IsoDate::parse("2024-03-10T23:30:00-03:00").unwrap();
        assert_eq!(date.day(), ymd(2024, 3, 10));
        assert_eq!(date.time(), NaiveTime::from_hms_opt(23, 30, 0));

        let local = IsoDate::parse("2024-03-10T08:15").unwrap();
        assert_eq!(local.day(), ymd(2024, 3, 10));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(IsoDate::parse("  "), Err(DateParseError::Empty));
        assert!(IsoDate::parse("2024-13-01").is_err());
        assert!(IsoDate::parse("05/01/2024").is_err());
    }

    #[test]
    fn test_serde_keeps_raw_text() {
        let date: IsoDate = serde_json::from_str("\"2024-02-29T10:00:00\"").unwrap();
        assert_eq!(date.day(), ymd(2024, 2, 29));
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2024-02-29T10:00:00\"");
    }

    #[test]
    fn test_year_and_month_fields() {
        assert_eq!(Year::parse("2023").unwrap(), Year(2023));
        assert!(Year::parse("23").is_err());
        assert_eq!(Month::parse("09").unwrap(), Month(9));
        assert!(Month::parse("0").is_err());
        assert!(Month::parse("13").is_err());
    }

    #[test]
    fn test_month_year_ordering_is_numeric() {
        let sept = MonthYear::new(2024, 9).unwrap();
        let oct = MonthYear::new(2024, 10).unwrap();
        let dec_prev = MonthYear::new(2023, 12).unwrap();

        assert!(oct > sept);
        assert!(sept > dec_prev);
        // The composed strings would sort the other way round
        assert!(oct.key() < sept.key());
    }

    #[test]
    fn test_month_navigation() {
        let jan = MonthYear::new(2024, 1).unwrap();
        assert_eq!(jan.previous(), MonthYear::new(2023, 12).unwrap());
        assert_eq!(jan.previous().next(), jan);
        assert_eq!(MonthYear::new(2024, 2).unwrap().last_day(), ymd(2024, 2, 29));
        assert_eq!(jan.days().len(), 31);
        assert_eq!(jan.label(), "Janeiro de 2024");
    }

    #[test]
    fn test_days_in_interval_inclusive() {
        let days: Vec<_> = days_in_interval(ymd(2024, 1, 30), ymd(2024, 2, 2)).collect();
        assert_eq!(days, vec![ymd(2024, 1, 30), ymd(2024, 1, 31), ymd(2024, 2, 1), ymd(2024, 2, 2)]);

        assert_eq!(days_in_interval(ymd(2024, 1, 2), ymd(2024, 1, 1)).count(), 0);
    }

    #[test]
    fn test_calendar_weeks_start_on_sunday() {
        // 1 September 2024 is a Sunday, 30 September a Monday
        let weeks = calendar_weeks(MonthYear::new(2024, 9).unwrap());
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0][0], Some(ymd(2024, 9, 1)));
        assert_eq!(weeks[4][1], Some(ymd(2024, 9, 30)));
        assert_eq!(weeks[4][2], None);

        // 1 February 2024 is a Thursday
        let feb = calendar_weeks(MonthYear::new(2024, 2).unwrap());
        assert_eq!(feb[0][3], None);
        assert_eq!(feb[0][4], Some(ymd(2024, 2, 1)));
    }

    #[test]
    fn test_month_year_at_representable_bounds() {
        assert!(MonthYear::new(300_000, 1).is_none());
        assert!(MonthYear::new(i32::MAX, 12).is_none());
        assert!(MonthYear::new(2024, 0).is_none());
        assert!(MonthYear::new(2024, 13).is_none());

        let last = MonthYear::from_date(NaiveDate::MAX);
        assert_eq!(MonthYear::new(last.year, last.month), Some(last));
        assert_eq!(last.last_day(), NaiveDate::MAX);
        assert_eq!(last.next(), last);
        assert_eq!(last.days().len(), 31);
        let weeks = calendar_weeks(last);
        assert!(weeks.iter().flatten().flatten().any(|day| *day == NaiveDate::MAX));

        let first = MonthYear::from_date(NaiveDate::MIN);
        assert_eq!(first.first_day(), NaiveDate::MIN);
        assert_eq!(first.previous(), first);
        assert!(!calendar_weeks(first).is_empty());

        // Fields set by hand past the range still produce a grid
        let beyond = MonthYear { year: 300_000, month: 1 };
        assert_eq!(beyond.last_day(), NaiveDate::MAX);
        assert_eq!(calendar_weeks(beyond).len(), 1);
    }
}
