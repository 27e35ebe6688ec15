use crate::markup::OutputOptions;
use log::{debug, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::{error::ComponentRange, Date, OffsetDateTime};

const DEFAULT_TABLE_CLASS: &str = "calendar";
const DEFAULT_MONTH_NAME_CLASS: &str = "monthName";
const DEFAULT_OTHER_MONTH_CLASS: &str = "otherMonth";
const DEFAULT_DAY_NAME_CLASS: &str = "dayName";
const DEFAULT_DAY_CLASS: &str = "day";
const DEFAULT_WEEKEND_CLASS: &str = "weekend";
const DEFAULT_TODAY_CLASS: &str = "today";

/// Calendar options as supplied by the caller.  Every field is optional;
/// [`CalendarOptions::resolve()`] fills in the defaults and checks that a
/// year and month were given.
///
/// Options can be built in code:
///
/// ```
/// let opts = htmlcal::CalendarOptions::new().year(2006).month(8).accessible(true);
/// ```
///
/// or deserialized from a TOML table whose keys are the field names.  Keys
/// that name no option are ignored.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct CalendarOptions {
    pub year: Option<i32>,
    /// 1 = January … 12 = December
    pub month: Option<u8>,
    pub table_class: Option<String>,
    pub month_name_class: Option<String>,
    pub other_month_class: Option<String>,
    pub day_name_class: Option<String>,
    pub day_class: Option<String>,
    pub abbrev: Option<Abbrev>,
    /// 0 = Sunday … 6 = Saturday
    pub first_day_of_week: Option<u8>,
    pub accessible: Option<bool>,
    pub show_today: Option<bool>,
    pub previous_month_text: Option<String>,
    pub next_month_text: Option<String>,
    pub month_header: Option<bool>,
    pub weekend_class: Option<String>,
    pub today_class: Option<String>,
    pub output: Option<OutputOptions>,
}

impl CalendarOptions {
    pub fn new() -> CalendarOptions {
        CalendarOptions::default()
    }

    pub fn from_toml_str(s: &str) -> Result<CalendarOptions, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<CalendarOptions, ConfigFileError> {
        let path = path.as_ref();
        debug!("Reading calendar options from {}", path.display());
        let src = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_owned(),
            source,
        })?;
        CalendarOptions::from_toml_str(&src).map_err(|source| ConfigFileError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: u8) -> Self {
        self.month = Some(month);
        self
    }

    pub fn table_class<S: Into<String>>(mut self, class: S) -> Self {
        self.table_class = Some(class.into());
        self
    }

    pub fn month_name_class<S: Into<String>>(mut self, class: S) -> Self {
        self.month_name_class = Some(class.into());
        self
    }

    pub fn other_month_class<S: Into<String>>(mut self, class: S) -> Self {
        self.other_month_class = Some(class.into());
        self
    }

    pub fn day_name_class<S: Into<String>>(mut self, class: S) -> Self {
        self.day_name_class = Some(class.into());
        self
    }

    pub fn day_class<S: Into<String>>(mut self, class: S) -> Self {
        self.day_class = Some(class.into());
        self
    }

    pub fn abbrev(mut self, abbrev: Abbrev) -> Self {
        self.abbrev = Some(abbrev);
        self
    }

    pub fn first_day_of_week(mut self, wd: u8) -> Self {
        self.first_day_of_week = Some(wd);
        self
    }

    pub fn accessible(mut self, flag: bool) -> Self {
        self.accessible = Some(flag);
        self
    }

    pub fn show_today(mut self, flag: bool) -> Self {
        self.show_today = Some(flag);
        self
    }

    pub fn previous_month_text<S: Into<String>>(mut self, text: S) -> Self {
        self.previous_month_text = Some(text.into());
        self
    }

    pub fn next_month_text<S: Into<String>>(mut self, text: S) -> Self {
        self.next_month_text = Some(text.into());
        self
    }

    pub fn month_header(mut self, flag: bool) -> Self {
        self.month_header = Some(flag);
        self
    }

    pub fn weekend_class<S: Into<String>>(mut self, class: S) -> Self {
        self.weekend_class = Some(class.into());
        self
    }

    pub fn today_class<S: Into<String>>(mut self, class: S) -> Self {
        self.today_class = Some(class.into());
        self
    }

    pub fn output(mut self, output: OutputOptions) -> Self {
        self.output = Some(output);
        self
    }

    /// Overlay `overrides` on top of `self`: every field set in `overrides`
    /// replaces the corresponding field of `self` wholesale.
    pub fn merge(self, overrides: CalendarOptions) -> CalendarOptions {
        CalendarOptions {
            year: overrides.year.or(self.year),
            month: overrides.month.or(self.month),
            table_class: overrides.table_class.or(self.table_class),
            month_name_class: overrides.month_name_class.or(self.month_name_class),
            other_month_class: overrides.other_month_class.or(self.other_month_class),
            day_name_class: overrides.day_name_class.or(self.day_name_class),
            day_class: overrides.day_class.or(self.day_class),
            abbrev: overrides.abbrev.or(self.abbrev),
            first_day_of_week: overrides.first_day_of_week.or(self.first_day_of_week),
            accessible: overrides.accessible.or(self.accessible),
            show_today: overrides.show_today.or(self.show_today),
            previous_month_text: overrides.previous_month_text.or(self.previous_month_text),
            next_month_text: overrides.next_month_text.or(self.next_month_text),
            month_header: overrides.month_header.or(self.month_header),
            weekend_class: overrides.weekend_class.or(self.weekend_class),
            today_class: overrides.today_class.or(self.today_class),
            output: overrides.output.or(self.output),
        }
    }

    /// Resolve the options against the current local date.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::MissingArgument`] if the year or month is
    /// unset.  The year is checked first.
    pub fn resolve(self) -> Result<CalendarConfig, CalendarError> {
        self.resolve_with_today(local_today())
    }

    /// Like [`CalendarOptions::resolve()`], but with an explicit "today"
    pub fn resolve_with_today(self, today: Date) -> Result<CalendarConfig, CalendarError> {
        let Some(year) = self.year else {
            return Err(CalendarError::MissingArgument("year"));
        };
        let Some(month) = self.month else {
            return Err(CalendarError::MissingArgument("month"));
        };
        debug!("Resolved calendar options for {year:04}-{month:02}; today is {today}");
        Ok(CalendarConfig {
            year,
            month,
            table_class: or_default(self.table_class, DEFAULT_TABLE_CLASS),
            month_name_class: or_default(self.month_name_class, DEFAULT_MONTH_NAME_CLASS),
            other_month_class: or_default(self.other_month_class, DEFAULT_OTHER_MONTH_CLASS),
            day_name_class: or_default(self.day_name_class, DEFAULT_DAY_NAME_CLASS),
            day_class: or_default(
                self.day_class.filter(|c| c.split_whitespace().next().is_some()),
                DEFAULT_DAY_CLASS,
            ),
            abbrev: self.abbrev.unwrap_or_default(),
            first_day_of_week: self.first_day_of_week.unwrap_or(0),
            accessible: self.accessible.unwrap_or(false),
            show_today: self.show_today.unwrap_or(true),
            previous_month_text: self.previous_month_text,
            next_month_text: self.next_month_text,
            month_header: self.month_header.unwrap_or(true),
            weekend_class: or_default(self.weekend_class, DEFAULT_WEEKEND_CLASS),
            today_class: or_default(self.today_class, DEFAULT_TODAY_CLASS),
            output: self.output.unwrap_or_default(),
            today,
        })
    }
}

/// Fully-resolved calendar settings
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CalendarConfig {
    pub year: i32,
    pub month: u8,
    pub table_class: String,
    pub month_name_class: String,
    pub other_month_class: String,
    pub day_name_class: String,
    /// Base class of each day cell.  Never blank: a blank `day_class` option
    /// resolves to `"day"`.
    pub day_class: String,
    pub abbrev: Abbrev,
    pub first_day_of_week: u8,
    pub accessible: bool,
    pub show_today: bool,
    pub previous_month_text: Option<String>,
    pub next_month_text: Option<String>,
    pub month_header: bool,
    /// Accepted for compatibility; weekend days are always marked with the
    /// `weekendDay` class.
    pub weekend_class: String,
    /// Accepted for compatibility; today is always marked with the `today`
    /// class.
    pub today_class: String,
    pub output: OutputOptions,
    /// The date highlighted as "today", captured once when the options were
    /// resolved
    pub today: Date,
}

/// An inclusive range of character indices used to abbreviate weekday names.
/// Negative indices count backwards from the end of the name, so `[0, 2]`
/// keeps the first three letters and `[0, -1]` keeps the whole name.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(from = "(i32, i32)")]
pub struct Abbrev {
    pub start: i32,
    pub end: i32,
}

impl Abbrev {
    pub const FULL: Abbrev = Abbrev { start: 0, end: -1 };

    pub fn new(start: i32, end: i32) -> Abbrev {
        Abbrev { start, end }
    }

    /// Returns the slice of `name` selected by this range.  A range that
    /// starts beyond either end of the name selects nothing.
    pub fn apply(self, name: &str) -> String {
        let len = i64::try_from(name.chars().count()).unwrap_or(i64::MAX);
        let from_end = |i: i32| {
            let i = i64::from(i);
            if i < 0 {
                i + len
            } else {
                i
            }
        };
        let start = from_end(self.start);
        if !(0..=len).contains(&start) {
            return String::new();
        }
        let end = from_end(self.end).min(len - 1);
        let (Ok(skip), Ok(take)) = (usize::try_from(start), usize::try_from(end - start + 1)) else {
            return String::new();
        };
        name.chars().skip(skip).take(take).collect()
    }
}

impl Default for Abbrev {
    fn default() -> Abbrev {
        Abbrev { start: 0, end: 2 }
    }
}

impl From<(i32, i32)> for Abbrev {
    fn from((start, end): (i32, i32)) -> Abbrev {
        Abbrev { start, end }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum CalendarError {
    /// A required option was not supplied
    #[error("No {0} given")]
    MissingArgument(&'static str),
    #[error("invalid calendar date")]
    InvalidDate(#[from] ComponentRange),
    #[error("invalid first day of week {0}; expected 0 (Sunday) through 6 (Saturday)")]
    InvalidWeekday(u8),
    #[error("reached the end of time")]
    OutOfTime,
}

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

fn or_default(value: Option<String>, default: &str) -> String {
    value.unwrap_or_else(|| default.to_owned())
}

/// Today's date on the local clock, or in UTC if the local offset cannot be
/// determined
pub fn local_today() -> Date {
    match OffsetDateTime::now_local() {
        Ok(now) => now.date(),
        Err(e) => {
            warn!("Failed to determine local date ({e}); using UTC instead");
            OffsetDateTime::now_utc().date()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2006 - 08 - 15);

    #[test]
    fn test_missing_year() {
        let r = CalendarOptions::new().month(1).resolve_with_today(TODAY);
        assert_eq!(r, Err(CalendarError::MissingArgument("year")));
    }

    #[test]
    fn test_missing_month() {
        let r = CalendarOptions::new().year(1).resolve_with_today(TODAY);
        assert_eq!(r, Err(CalendarError::MissingArgument("month")));
    }

    #[test]
    fn test_missing_both_reports_year() {
        let e = CalendarOptions::new()
            .resolve_with_today(TODAY)
            .expect_err("resolution should fail");
        assert_eq!(e, CalendarError::MissingArgument("year"));
        assert_eq!(e.to_string(), "No year given");
    }

    #[test]
    fn test_defaults() {
        let cfg = CalendarOptions::new()
            .year(2006)
            .month(8)
            .resolve_with_today(TODAY)
            .expect("resolution should succeed");
        assert_eq!(cfg.table_class, "calendar");
        assert_eq!(cfg.month_name_class, "monthName");
        assert_eq!(cfg.other_month_class, "otherMonth");
        assert_eq!(cfg.day_name_class, "dayName");
        assert_eq!(cfg.day_class, "day");
        assert_eq!(cfg.abbrev, Abbrev::new(0, 2));
        assert_eq!(cfg.first_day_of_week, 0);
        assert!(!cfg.accessible);
        assert!(cfg.show_today);
        assert_eq!(cfg.previous_month_text, None);
        assert_eq!(cfg.next_month_text, None);
        assert!(cfg.month_header);
        assert_eq!(cfg.weekend_class, "weekend");
        assert_eq!(cfg.today_class, "today");
        assert_eq!(cfg.output, OutputOptions::default());
        assert_eq!(cfg.today, TODAY);
    }

    #[test]
    fn test_no_range_validation() {
        let cfg = CalendarOptions::new()
            .year(2006)
            .month(13)
            .first_day_of_week(9)
            .resolve_with_today(TODAY)
            .expect("resolution should succeed");
        assert_eq!(cfg.month, 13);
        assert_eq!(cfg.first_day_of_week, 9);
    }

    #[test]
    fn test_merge_is_shallow() {
        let base = CalendarOptions::new()
            .year(2006)
            .day_class("base")
            .output(OutputOptions { indent: Some(2) });
        let overrides = CalendarOptions::new()
            .month(8)
            .day_class("over")
            .output(OutputOptions::default());
        let merged = base.merge(overrides);
        assert_eq!(merged.year, Some(2006));
        assert_eq!(merged.month, Some(8));
        assert_eq!(merged.day_class.as_deref(), Some("over"));
        assert_eq!(merged.output, Some(OutputOptions { indent: None }));
    }

    #[test]
    fn test_from_toml() {
        let opts = CalendarOptions::from_toml_str(concat!(
            "year = 2006\n",
            "month = 8\n",
            "abbrev = [0, -1]\n",
            "first_day_of_week = 1\n",
            "previous_month_text = \"PREVIOUS\"\n",
            "\n",
            "[output]\n",
            "indent = 2\n",
        ))
        .expect("TOML should parse");
        assert_eq!(
            opts,
            CalendarOptions::new()
                .year(2006)
                .month(8)
                .abbrev(Abbrev::FULL)
                .first_day_of_week(1)
                .previous_month_text("PREVIOUS")
                .output(OutputOptions { indent: Some(2) })
        );
    }

    #[test]
    fn test_from_toml_unknown_key_ignored() {
        let opts = CalendarOptions::from_toml_str(concat!(
            "year = 2006\n",
            "colour = \"red\"\n",
            "\n",
            "[output]\n",
            "indent = 2\n",
            "encoding = \"UTF-8\"\n",
        ))
        .expect("TOML should parse");
        assert_eq!(
            opts,
            CalendarOptions::new()
                .year(2006)
                .output(OutputOptions { indent: Some(2) })
        );
    }

    #[test]
    fn test_blank_day_class_uses_default() {
        for blank in ["", "   "] {
            let cfg = CalendarOptions::new()
                .year(2006)
                .month(8)
                .day_class(blank)
                .resolve_with_today(TODAY)
                .expect("resolution should succeed");
            assert_eq!(cfg.day_class, "day");
        }
    }

    #[test]
    fn test_abbrev() {
        assert_eq!(Abbrev::default().apply("Sunday"), "Sun");
        assert_eq!(Abbrev::new(0, 0).apply("Sunday"), "S");
        assert_eq!(Abbrev::FULL.apply("Sunday"), "Sunday");
        assert_eq!(Abbrev::new(1, 3).apply("Monday"), "ond");
        assert_eq!(Abbrev::new(-3, -1).apply("Friday"), "day");
        assert_eq!(Abbrev::new(0, 20).apply("Friday"), "Friday");
        assert_eq!(Abbrev::new(3, 1).apply("Friday"), "");
        assert_eq!(Abbrev::new(10, 12).apply("Friday"), "");
        assert_eq!(Abbrev::new(-10, 2).apply("Friday"), "");
    }
}
