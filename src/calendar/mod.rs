mod cell;
mod render;
mod util;
mod weeks;
pub use self::cell::{Attributes, CellText, DayContent};
pub use self::render::Calendar;
pub use self::util::DateRange;
use crate::config::CalendarError;
use time::Date;

/// Hook for customizing the cell of each day on the calendar.  It is called
/// once per date, in grid order, and any error it returns aborts the render.
///
/// Any closure `Fn(Date) -> Result<DayContent, E>` is a `DayRenderer`.
pub trait DayRenderer {
    type Error;

    fn render_day(&self, date: Date) -> Result<DayContent, Self::Error>;
}

impl<F, E> DayRenderer for F
where
    F: Fn(Date) -> Result<DayContent, E>,
{
    type Error = E;

    fn render_day(&self, date: Date) -> Result<DayContent, E> {
        self(date)
    }
}

/// A `DayRenderer` that leaves every cell at its defaults
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct DefaultDays;

impl DayRenderer for DefaultDays {
    type Error = CalendarError;

    fn render_day(&self, _date: Date) -> Result<DayContent, CalendarError> {
        Ok(DayContent::Empty)
    }
}
