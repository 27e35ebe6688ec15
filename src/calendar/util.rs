use crate::config::{Abbrev, CalendarError};
use std::iter::successors;
use time::{Date, Duration, Month, Weekday, Weekday::*};

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u8;
    fn is_weekend(&self) -> bool;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u8 {
        self.number_days_from_sunday()
    }

    fn is_weekend(&self) -> bool {
        matches!(self, Saturday | Sunday)
    }
}

/// Convert a day-of-week number (0 = Sunday … 6 = Saturday) to a `Weekday`
pub(crate) fn weekday_from_index0(i: u8) -> Option<Weekday> {
    match i {
        0 => Some(Sunday),
        1 => Some(Monday),
        2 => Some(Tuesday),
        3 => Some(Wednesday),
        4 => Some(Thursday),
        5 => Some(Friday),
        6 => Some(Saturday),
        _ => None,
    }
}

/// Returns the most recent `first_day` on or before `date`
pub(crate) fn start_of_week(date: Date, first_day: Weekday) -> Result<Date, CalendarError> {
    let back = (date.weekday().index0() + 7 - first_day.index0()) % 7;
    n_days_before(date, back)
}

/// Returns the last day of the week (as aligned on `first_day`) containing
/// `date`
pub(crate) fn end_of_week(date: Date, first_day: Weekday) -> Result<Date, CalendarError> {
    n_days_after(start_of_week(date, first_day)?, 6)
}

/// The inclusive span of dates shown on a month's calendar: the whole month,
/// padded out on both ends to whole weeks
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub(crate) fn for_month(
        year: i32,
        month: Month,
        first_day: Weekday,
    ) -> Result<DateRange, CalendarError> {
        let first_of_month = Date::from_calendar_date(year, month, 1)?;
        let last_of_month = first_of_month.replace_day(month.length(year))?;
        let start = start_of_week(first_of_month, first_day)?;
        let end = end_of_week(last_of_month, first_day)?;
        Ok(DateRange { start, end })
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    /// Iterate over every date in the range in calendar order
    pub fn days(&self) -> impl Iterator<Item = Date> {
        let end = self.end;
        successors(Some(self.start), |d| d.next_day()).take_while(move |&d| d <= end)
    }

    pub fn week_count(&self) -> usize {
        let days = (self.end - self.start).whole_days() + 1;
        usize::try_from(days / 7).unwrap_or_default()
    }
}

/// A weekday label for the calendar header
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayName {
    pub(crate) full: String,
    pub(crate) abbreviated: String,
}

impl DayName {
    fn new(wd: Weekday, abbrev: Abbrev) -> DayName {
        let full = wd.to_string();
        let abbreviated = abbrev.apply(&full);
        DayName { full, abbreviated }
    }

    pub(crate) fn is_truncated(&self) -> bool {
        self.full != self.abbreviated
    }
}

/// Returns the names of the seven days of the week, starting at `first_day`
pub(crate) fn day_names(first_day: Weekday, abbrev: Abbrev) -> Vec<DayName> {
    successors(Some(first_day), |wd| Some(wd.next()))
        .take(DAYS_IN_WEEK)
        .map(|wd| DayName::new(wd, abbrev))
        .collect()
}

fn n_days_after(date: Date, n: u8) -> Result<Date, CalendarError> {
    date.checked_add(Duration::days(n.into()))
        .ok_or(CalendarError::OutOfTime)
}

fn n_days_before(date: Date, n: u8) -> Result<Date, CalendarError> {
    date.checked_sub(Duration::days(n.into()))
        .ok_or(CalendarError::OutOfTime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_start_of_week() {
        // 2006-08-01 was a Tuesday
        assert_eq!(
            start_of_week(date!(2006 - 08 - 01), Sunday),
            Ok(date!(2006 - 07 - 30))
        );
        assert_eq!(
            start_of_week(date!(2006 - 08 - 01), Monday),
            Ok(date!(2006 - 07 - 31))
        );
        assert_eq!(
            start_of_week(date!(2006 - 08 - 01), Tuesday),
            Ok(date!(2006 - 08 - 01))
        );
        assert_eq!(
            start_of_week(date!(2006 - 08 - 01), Wednesday),
            Ok(date!(2006 - 07 - 26))
        );
    }

    #[test]
    fn test_end_of_week() {
        assert_eq!(
            end_of_week(date!(2006 - 08 - 31), Sunday),
            Ok(date!(2006 - 09 - 02))
        );
        assert_eq!(
            end_of_week(date!(2006 - 08 - 31), Friday),
            Ok(date!(2006 - 08 - 31))
        );
        assert_eq!(
            end_of_week(date!(2006 - 08 - 31), Thursday),
            Ok(date!(2006 - 09 - 06))
        );
    }

    #[test]
    fn test_date_range_august_2006() {
        let range = DateRange::for_month(2006, Month::August, Sunday).expect("valid month");
        assert_eq!(range.start(), date!(2006 - 07 - 30));
        assert_eq!(range.end(), date!(2006 - 09 - 02));
        assert_eq!(range.week_count(), 5);
        assert_eq!(range.days().count(), 35);
    }

    #[test]
    fn test_date_range_monday_start() {
        let range = DateRange::for_month(2006, Month::August, Monday).expect("valid month");
        assert_eq!(range.start(), date!(2006 - 07 - 31));
        assert_eq!(range.end(), date!(2006 - 09 - 03));
    }

    #[test]
    fn test_date_range_exact_fit() {
        // February 2015 starts on a Sunday and has exactly four weeks
        let range = DateRange::for_month(2015, Month::February, Sunday).expect("valid month");
        assert_eq!(range.start(), date!(2015 - 02 - 01));
        assert_eq!(range.end(), date!(2015 - 02 - 28));
        assert_eq!(range.week_count(), 4);
    }

    #[test]
    fn test_date_range_ends_on_last_of_february() {
        // 2024-02-29 was a Thursday and 2023-02-28 a Tuesday
        let range = DateRange::for_month(2024, Month::February, Friday).expect("valid month");
        assert_eq!(range.end(), date!(2024 - 02 - 29));
        let range = DateRange::for_month(2023, Month::February, Wednesday).expect("valid month");
        assert_eq!(range.end(), date!(2023 - 02 - 28));
        // 1900 was not a leap year; 1900-02-28 was a Wednesday
        let range = DateRange::for_month(1900, Month::February, Thursday).expect("valid month");
        assert_eq!(range.end(), date!(1900 - 02 - 28));
    }

    #[test]
    fn test_date_range_spans_years() {
        let range = DateRange::for_month(2023, Month::December, Sunday).expect("valid month");
        assert_eq!(range.start(), date!(2023 - 11 - 26));
        assert_eq!(range.end(), date!(2024 - 01 - 06));
        assert_eq!(range.week_count(), 6);
    }

    #[test]
    fn test_date_range_whole_weeks() {
        for year in [1999, 2000, 2023, 2024] {
            for month in 1..=12 {
                let month = Month::try_from(month).expect("valid month number");
                for first in 0..7 {
                    let first = weekday_from_index0(first).expect("valid weekday number");
                    let range = DateRange::for_month(year, month, first).expect("valid month");
                    assert_eq!(range.start().weekday(), first);
                    assert_eq!(range.end().weekday(), first.previous());
                    assert_eq!(range.days().count() % DAYS_IN_WEEK, 0);
                    assert!(range.start().day() == 1 || range.start().month() != month);
                    assert!(range.days().any(|d| d.month() == month && d.day() == 1));
                }
            }
        }
    }

    #[test]
    fn test_date_range_end_of_time() {
        assert_eq!(
            DateRange::for_month(9999, Month::December, Sunday),
            Err(CalendarError::OutOfTime)
        );
    }

    #[test]
    fn test_weekday_from_index0() {
        for i in 0..7 {
            let wd = weekday_from_index0(i).expect("valid weekday number");
            assert_eq!(wd.index0(), i);
        }
        assert_eq!(weekday_from_index0(7), None);
    }

    #[test]
    fn test_day_names() {
        let names = day_names(Monday, Abbrev::default());
        let abbrevs = names
            .iter()
            .map(|dn| dn.abbreviated.as_str())
            .collect::<Vec<_>>();
        assert_eq!(abbrevs, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
        let first = names.first().expect("seven names");
        assert_eq!(first.full, "Monday");
        assert!(first.is_truncated());
    }

    #[test]
    fn test_day_names_full() {
        let names = day_names(Sunday, Abbrev::FULL);
        let first = names.first().expect("seven names");
        assert_eq!(first.full, "Sunday");
        assert_eq!(first.abbreviated, "Sunday");
        assert!(!names.iter().any(DayName::is_truncated));
    }
}
