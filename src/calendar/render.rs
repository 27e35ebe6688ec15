use super::cell::CellResult;
use super::util::{day_names, weekday_from_index0, DateRange, DAYS_IN_WEEK};
use super::weeks::Weeks;
use super::DayRenderer;
use crate::config::{CalendarConfig, CalendarError};
use crate::markup::Element;
use log::{debug, trace};
use time::{Month, Weekday};

/// Number of columns taken up by each previous/next month navigation cell
const NAVIGATION_COLSPAN: usize = 2;

/// A month calendar, ready to be rendered as an XHTML `<table>`:
///
/// ```text
/// <table class="calendar">
///   <thead>
///     <tr>[prev] <td class="monthName">August</td> [next]</tr>
///     <tr class="dayName"><th scope="col"><abbr title="Sunday">Sun</abbr></th> …</tr>
///   </thead>
///   <tbody>
///     <tr><td class="day otherMonth weekendDay">30</td> …</tr>
///     …
///   </tbody>
/// </table>
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Calendar {
    config: CalendarConfig,
    month: Month,
    first_day: Weekday,
    range: DateRange,
}

impl Calendar {
    /// Compute the calendar grid for a resolved configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configured month or first day of the week is out of
    /// range, or if the grid would extend beyond the dates representable by
    /// [`time::Date`].
    pub fn new(config: CalendarConfig) -> Result<Calendar, CalendarError> {
        let month = Month::try_from(config.month)?;
        let first_day = weekday_from_index0(config.first_day_of_week)
            .ok_or(CalendarError::InvalidWeekday(config.first_day_of_week))?;
        let range = DateRange::for_month(config.year, month, first_day)?;
        debug!(
            "Calendar for {month} {} runs from {} to {} ({} weeks)",
            config.year,
            range.start(),
            range.end(),
            range.week_count()
        );
        Ok(Calendar {
            config,
            month,
            first_day,
            range,
        })
    }

    pub fn date_range(&self) -> DateRange {
        self.range
    }

    /// Render the calendar and serialize it according to the configured
    /// output options.  Errors returned by `days` are passed through
    /// unchanged, and nothing is rendered.
    pub fn render<R: DayRenderer>(&self, days: &R) -> Result<String, R::Error> {
        Ok(self.to_element(days)?.to_xhtml(self.config.output))
    }

    /// Build the calendar's `<table>` element
    pub fn to_element<R: DayRenderer>(&self, days: &R) -> Result<Element, R::Error> {
        Ok(Element::new("table")
            .with_attr("border", "0")
            .with_attr("cellpadding", "0")
            .with_attr("cellspacing", "0")
            .with_attr("class", self.config.table_class.as_str())
            .with_child(self.header())
            .with_child(self.body(days)?))
    }

    fn header(&self) -> Element {
        let mut thead = Element::new("thead");
        if self.config.month_header {
            thead.push(self.month_row());
        }
        thead.push(self.day_name_row());
        thead
    }

    fn month_row(&self) -> Element {
        let mut colspan = DAYS_IN_WEEK;
        let mut tr = Element::new("tr");
        if let Some(text) = &self.config.previous_month_text {
            colspan -= NAVIGATION_COLSPAN;
            tr.push(navigation_cell(text));
        }
        tr.push(
            Element::new("td")
                .with_attr("class", self.config.month_name_class.as_str())
                .with_attr("colspan", colspan.to_string())
                .with_child(self.month.to_string()),
        );
        // The month name has already been laid out at this point, so the
        // next-month cell does not narrow it.
        if let Some(text) = &self.config.next_month_text {
            tr.push(navigation_cell(text));
        }
        tr
    }

    fn day_name_row(&self) -> Element {
        let mut tr = Element::new("tr").with_attr("class", self.config.day_name_class.as_str());
        for name in day_names(self.first_day, self.config.abbrev) {
            let th = Element::new("th").with_attr("scope", "col");
            let th = if name.is_truncated() {
                th.with_child(
                    Element::new("abbr")
                        .with_attr("title", name.full)
                        .with_child(name.abbreviated),
                )
            } else {
                th.with_child(name.full)
            };
            tr.push(th);
        }
        tr
    }

    fn body<R: DayRenderer>(&self, days: &R) -> Result<Element, R::Error> {
        let mut tbody = Element::new("tbody");
        for week in Weeks::new(self.range, self.config.year, self.month) {
            trace!("Rendering week starting {}", week.first().date);
            let mut tr = Element::new("tr");
            for day in week.days() {
                tr.push(CellResult::resolve(&self.config, day, days)?.into_element());
            }
            tbody.push(tr);
        }
        Ok(tbody)
    }
}

fn navigation_cell(text: &str) -> Element {
    Element::new("td")
        .with_attr("colspan", NAVIGATION_COLSPAN.to_string())
        .with_child(text)
}
