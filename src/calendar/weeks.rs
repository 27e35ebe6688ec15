use super::util::{DateRange, DAYS_IN_WEEK};
use std::iter::successors;
use time::{Date, Month};

/// A date on the calendar grid, tagged with whether it falls inside the month
/// being displayed
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GridDay {
    pub(crate) date: Date,
    pub(crate) in_month: bool,
}

impl GridDay {
    fn new(date: Date, year: i32, month: Month) -> GridDay {
        GridDay {
            date,
            in_month: date.year() == year && date.month() == month,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Week([GridDay; DAYS_IN_WEEK]);

impl Week {
    pub(crate) fn days(&self) -> impl Iterator<Item = GridDay> + '_ {
        self.0.iter().copied()
    }

    pub(crate) fn first(&self) -> GridDay {
        self.0[0]
    }

    pub(crate) fn last(&self) -> GridDay {
        self.0[DAYS_IN_WEEK - 1]
    }
}

/// Iterator that chops a [`DateRange`] into consecutive seven-day weeks
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Weeks {
    next_start: Option<Date>,
    end: Date,
    year: i32,
    month: Month,
}

impl Weeks {
    pub(crate) fn new(range: DateRange, year: i32, month: Month) -> Weeks {
        Weeks {
            next_start: Some(range.start()),
            end: range.end(),
            year,
            month,
        }
    }
}

impl Iterator for Weeks {
    type Item = Week;

    fn next(&mut self) -> Option<Week> {
        let start = self.next_start.filter(|&d| d <= self.end)?;
        let mut dates = successors(Some(start), |d| d.next_day());
        let days = std::array::from_fn(|_| {
            let date = dates
                .next()
                .expect("DateRange should only contain representable dates");
            GridDay::new(date, self.year, self.month)
        });
        let week = Week(days);
        self.next_start = week.last().date.next_day();
        Some(week)
    }
}
