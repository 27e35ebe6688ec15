//! Render a month as a CSS-customizable XHTML calendar table.
//!
//! ```
//! use htmlcal::{calendar, CalendarError, CalendarOptions, DayContent};
//! use time::Date;
//!
//! let html = calendar(
//!     CalendarOptions::new().year(2006).month(8),
//!     |d: Date| -> Result<DayContent, CalendarError> {
//!         if d.day() % 2 == 0 {
//!             Ok(DayContent::pair(format!("-{}-", d.day()), [("class", "special_day")]))
//!         } else {
//!             Ok(DayContent::Empty)
//!         }
//!     },
//! )?;
//! assert!(html.contains(r#"<td class="special_day">-2-</td>"#));
//! # Ok::<(), CalendarError>(())
//! ```
mod calendar;
mod config;
pub mod markup;
pub use crate::calendar::{
    Attributes, Calendar, CellText, DateRange, DayContent, DayRenderer, DefaultDays,
};
pub use crate::config::{
    local_today, Abbrev, CalendarConfig, CalendarError, CalendarOptions, ConfigFileError,
};
pub use crate::markup::OutputOptions;

/// Render the calendar described by `options` as an XHTML `<table>`, calling
/// `days` to customize each day's cell.  Pass [`DefaultDays`] to use the
/// default cells throughout.
///
/// Today's date (for highlighting) is read from the local clock once, before
/// any cell is rendered.
///
/// # Errors
///
/// Option errors (missing year or month, out-of-range dates) are converted
/// into `days`'s error type.  Errors from `days` itself are returned as-is.
pub fn calendar<R>(options: CalendarOptions, days: R) -> Result<String, R::Error>
where
    R: DayRenderer,
    R::Error: From<CalendarError>,
{
    let calendar = Calendar::new(options.resolve()?)?;
    calendar.render(&days)
}
