use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// `rocYear = civilYear - 1911`; ROC year 1 is 1912.
pub const ROC_EPOCH_OFFSET: i32 = 1911;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Input does not match any recognized date encoding.
    Malformed(String),
    /// Numerically well-formed but not a real calendar date, or the ROC year
    /// would be non-positive.
    InvalidDate(String),
    /// Caller contract violation; surfaced immediately, never swallowed.
    InvalidArgument(String),
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::Malformed(input) => write!(f, "unrecognized date format: {input}"),
            CalendarError::InvalidDate(detail) => write!(f, "invalid date: {detail}"),
            CalendarError::InvalidArgument(detail) => write!(f, "invalid argument: {detail}"),
        }
    }
}

impl std::error::Error for CalendarError {}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearStyle {
    /// `113/01/05` — the form most of the ledger sheets use.
    #[default]
    Plain,
    /// `088/01/05` — fixed-width year for aligned listings.
    Padded,
}

pub fn roc_year(date: NaiveDate) -> i32 {
    date.year() - ROC_EPOCH_OFFSET
}

fn guarded_roc_year(date: NaiveDate) -> Result<i32, CalendarError> {
    let roc = roc_year(date);
    if roc < 1 {
        return Err(CalendarError::InvalidDate(format!(
            "year {} predates the ROC epoch",
            date.year()
        )));
    }
    Ok(roc)
}

/// Compact storage form `RRRMMDD`, always 7 digits.
pub fn to_compact(date: NaiveDate) -> Result<String, CalendarError> {
    let roc = guarded_roc_year(date)?;
    Ok(format!("{:03}{:02}{:02}", roc, date.month(), date.day()))
}

pub fn to_display(date: NaiveDate) -> Result<String, CalendarError> {
    to_display_styled(date, YearStyle::default())
}

pub fn to_display_styled(date: NaiveDate, style: YearStyle) -> Result<String, CalendarError> {
    let roc = guarded_roc_year(date)?;
    match style {
        YearStyle::Plain => Ok(format!("{}/{:02}/{:02}", roc, date.month(), date.day())),
        YearStyle::Padded => Ok(format!("{:03}/{:02}/{:02}", roc, date.month(), date.day())),
    }
}

/// `RRR/MM` label for the month the date falls in.
#[allow(dead_code)]
pub fn period_label(date: NaiveDate) -> Result<String, CalendarError> {
    AccountingPeriod::from_date(date).map(|period| period.label())
}

fn roc_to_civil(roc: i32, month: u32, day: u32, original: &str) -> Result<NaiveDate, CalendarError> {
    if roc < 1 {
        return Err(CalendarError::InvalidDate(format!(
            "non-positive ROC year in {original}"
        )));
    }
    NaiveDate::from_ymd_opt(roc + ROC_EPOCH_OFFSET, month, day)
        .ok_or_else(|| CalendarError::InvalidDate(format!("no such calendar day: {original}")))
}

pub fn parse_compact(input: &str) -> Result<NaiveDate, CalendarError> {
    let digits = input.trim();
    if digits.len() != 7 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CalendarError::Malformed(digits.to_string()));
    }

    let roc: i32 = digits[..3]
        .parse()
        .map_err(|_| CalendarError::Malformed(digits.to_string()))?;
    let month: u32 = digits[3..5]
        .parse()
        .map_err(|_| CalendarError::Malformed(digits.to_string()))?;
    let day: u32 = digits[5..7]
        .parse()
        .map_err(|_| CalendarError::Malformed(digits.to_string()))?;

    roc_to_civil(roc, month, day, digits)
}

// A 4-digit first segment is a Gregorian year; only 1-3 digits read as ROC.
fn is_roc_year_segment(part: &str) -> bool {
    (1..=3).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
}

fn is_digit_segment(part: &str, max_len: usize) -> bool {
    !part.is_empty() && part.len() <= max_len && part.bytes().all(|b| b.is_ascii_digit())
}

pub fn parse_display(input: &str) -> Result<NaiveDate, CalendarError> {
    let text = input.trim();
    let mut parts = text.split('/');
    let (Some(year_part), Some(month_part), Some(day_part), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(CalendarError::Malformed(text.to_string()));
    };

    if !is_roc_year_segment(year_part)
        || !is_digit_segment(month_part, 2)
        || !is_digit_segment(day_part, 2)
    {
        return Err(CalendarError::Malformed(text.to_string()));
    }

    let roc: i32 = year_part
        .parse()
        .map_err(|_| CalendarError::Malformed(text.to_string()))?;
    let month: u32 = month_part
        .parse()
        .map_err(|_| CalendarError::Malformed(text.to_string()))?;
    let day: u32 = day_part
        .parse()
        .map_err(|_| CalendarError::Malformed(text.to_string()))?;

    roc_to_civil(roc, month, day, text)
}

const GENERIC_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
const GENERIC_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Ordered strategy chain over the encodings seen in ledger sheets: compact
/// ROC, slash-delimited ROC, then common Gregorian forms. A strategy that
/// recognizes the shape but decodes to an impossible date stops the chain
/// with `InvalidDate`; only shape mismatches fall through.
pub fn parse_flexible(input: &str) -> Result<NaiveDate, CalendarError> {
    let text = input.trim();

    match parse_compact(text) {
        Ok(date) => return Ok(date),
        Err(err @ CalendarError::InvalidDate(_)) => return Err(err),
        Err(_) => {}
    }

    match parse_display(text) {
        Ok(date) => return Ok(date),
        Err(err @ CalendarError::InvalidDate(_)) => return Err(err),
        Err(_) => {}
    }

    for format in GENERIC_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date);
        }
    }
    for format in GENERIC_DATETIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(stamp.date());
        }
    }

    Err(CalendarError::Malformed(text.to_string()))
}

/// A billing month, distinct from the transaction date, recorded as
/// ROC year/month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountingPeriod {
    roc_year: i32,
    month: u32,
}

impl AccountingPeriod {
    pub fn new(roc_year: i32, month: u32) -> Result<Self, CalendarError> {
        if roc_year < 1 {
            return Err(CalendarError::InvalidDate(format!(
                "non-positive ROC year {roc_year}"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidDate(format!(
                "month {month} out of range"
            )));
        }
        Ok(Self { roc_year, month })
    }

    pub fn from_date(date: NaiveDate) -> Result<Self, CalendarError> {
        let roc_year = guarded_roc_year(date)?;
        Ok(Self {
            roc_year,
            month: date.month(),
        })
    }

    pub fn parse(input: &str) -> Result<Self, CalendarError> {
        let text = input.trim();
        let Some((year_part, month_part)) = text.split_once('/') else {
            return Err(CalendarError::Malformed(text.to_string()));
        };
        if !is_roc_year_segment(year_part) || !is_digit_segment(month_part, 2) {
            return Err(CalendarError::Malformed(text.to_string()));
        }

        let roc_year: i32 = year_part
            .parse()
            .map_err(|_| CalendarError::Malformed(text.to_string()))?;
        let month: u32 = month_part
            .parse()
            .map_err(|_| CalendarError::Malformed(text.to_string()))?;

        Self::new(roc_year, month)
    }

    #[allow(dead_code)]
    pub fn roc_year(&self) -> i32 {
        self.roc_year
    }

    #[allow(dead_code)]
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn label(&self) -> String {
        format!("{}/{:02}", self.roc_year, self.month)
    }

    /// One month earlier; `None` once the walk reaches ROC 1/01.
    pub fn prev(&self) -> Option<Self> {
        if self.month > 1 {
            Some(Self {
                roc_year: self.roc_year,
                month: self.month - 1,
            })
        } else if self.roc_year > 1 {
            Some(Self {
                roc_year: self.roc_year - 1,
                month: 12,
            })
        } else {
            None
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        // fields are validated in the constructors
        NaiveDate::from_ymd_opt(self.roc_year + ROC_EPOCH_OFFSET, self.month, 1)
            .expect("validated period maps to a civil date")
    }

    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.roc_year + 1, 1)
        } else {
            (self.roc_year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year + ROC_EPOCH_OFFSET, next_month, 1)
            .expect("validated period maps to a civil date")
            .pred_opt()
            .expect("first of a month has a predecessor")
    }
}

/// Finite, restartable walk over accounting periods, most recent first.
#[derive(Debug, Clone)]
pub struct RecentPeriods {
    cursor: Option<AccountingPeriod>,
    remaining: u32,
}

impl Iterator for RecentPeriods {
    type Item = AccountingPeriod;

    fn next(&mut self) -> Option<AccountingPeriod> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.cursor?;
        self.remaining -= 1;
        self.cursor = current.prev();
        Some(current)
    }
}

pub fn recent_periods(as_of: NaiveDate, count: u32) -> Result<RecentPeriods, CalendarError> {
    if count == 0 {
        return Err(CalendarError::InvalidArgument(
            "period count must be at least 1".to_string(),
        ));
    }
    Ok(RecentPeriods {
        cursor: Some(AccountingPeriod::from_date(as_of)?),
        remaining: count,
    })
}
