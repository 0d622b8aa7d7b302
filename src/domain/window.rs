use chrono::{Datelike, NaiveDate};

use crate::domain::roc::{AccountingPeriod, CalendarError};

/// "Current month plus the trailing three months", the query default used
/// throughout the ledger.
pub const DEFAULT_TRAILING_MONTHS: u32 = 3;

/// Closed date interval; `start <= end` holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    #[allow(dead_code)]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CalendarError> {
        if start > end {
            return Err(CalendarError::InvalidArgument(format!(
                "window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The current partial month plus `trailing_months` full months before
    /// it: `end = as_of`, `start` the first day of the month
    /// `trailing_months` before `as_of`'s.
    pub fn rolling(as_of: NaiveDate, trailing_months: u32) -> Self {
        let months = as_of.year() * 12 + as_of.month0() as i32 - trailing_months as i32;
        let year = months.div_euclid(12);
        let month = months.rem_euclid(12) as u32 + 1;
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .expect("first of a month is a valid date");
        Self { start, end: as_of }
    }

    /// The whole calendar month of one accounting period.
    pub fn for_period(period: AccountingPeriod) -> Self {
        Self {
            start: period.first_day(),
            end: period.last_day(),
        }
    }

    #[allow(dead_code)]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[allow(dead_code)]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("test date should be valid")
    }

    #[test]
    fn rolling_window_ends_at_as_of_and_starts_on_a_first() {
        let window = DateWindow::rolling(date(2024, 6, 20), DEFAULT_TRAILING_MONTHS);
        assert_eq!(window.end(), date(2024, 6, 20));
        assert_eq!(window.start(), date(2024, 3, 1));
        assert!(window.start() <= window.end());
    }

    #[test]
    fn rolling_window_rolls_across_year_boundary() {
        let window = DateWindow::rolling(date(2024, 2, 15), 3);
        assert_eq!(window.start(), date(2023, 11, 1));
        assert_eq!(window.end(), date(2024, 2, 15));
    }

    #[test]
    fn rolling_window_with_zero_trailing_covers_current_month_only() {
        let window = DateWindow::rolling(date(2024, 1, 5), 0);
        assert_eq!(window.start(), date(2024, 1, 1));
        assert_eq!(window.end(), date(2024, 1, 5));
    }

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let window = DateWindow::new(date(2023, 11, 1), date(2024, 2, 15))
            .expect("ordered bounds should construct");
        assert!(window.contains(date(2023, 11, 1)));
        assert!(window.contains(date(2024, 2, 15)));
        assert!(window.contains(date(2023, 12, 25)));
        assert!(!window.contains(date(2023, 10, 31)));
        assert!(!window.contains(date(2024, 2, 16)));
    }

    #[test]
    fn reversed_bounds_are_rejected() {
        assert!(matches!(
            DateWindow::new(date(2024, 2, 15), date(2023, 11, 1)),
            Err(CalendarError::InvalidArgument(_))
        ));
    }

    #[test]
    fn period_window_covers_the_whole_month() {
        let period = AccountingPeriod::parse("113/02").expect("period should parse");
        let window = DateWindow::for_period(period);
        assert_eq!(window.start(), date(2024, 2, 1));
        assert_eq!(window.end(), date(2024, 2, 29));
    }
}
