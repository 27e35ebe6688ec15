use super::util::WeekdayExt;
use super::weeks::GridDay;
use super::DayRenderer;
use crate::config::CalendarConfig;
use crate::markup::{Element, Node};
use std::collections::BTreeMap;

/// Class added to Saturday and Sunday cells
const WEEKEND_CLASS: &str = "weekendDay";

/// Class added to the cell for today's date
const TODAY_CLASS: &str = "today";

/// Class of the `<span>` naming the month of a day outside the displayed
/// month in accessible mode
const HIDDEN_CLASS: &str = "hidden";

/// Attributes of a day's `<td>` element
pub type Attributes = BTreeMap<String, String>;

/// The content of a day's cell
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CellText {
    /// Text to be escaped and inserted as-is
    Plain(String),
    /// A pre-built element
    Markup(Element),
}

impl From<String> for CellText {
    fn from(s: String) -> CellText {
        CellText::Plain(s)
    }
}

impl From<&str> for CellText {
    fn from(s: &str) -> CellText {
        CellText::Plain(s.to_owned())
    }
}

impl From<Element> for CellText {
    fn from(e: Element) -> CellText {
        CellText::Markup(e)
    }
}

impl From<CellText> for Node {
    fn from(text: CellText) -> Node {
        match text {
            CellText::Plain(s) => Node::Text(s),
            CellText::Markup(e) => Node::Element(e),
        }
    }
}

/// What a [`DayRenderer`] returns for a single day.  Anything it leaves out
/// is filled in with the defaults: the day of the month as the text, and no
/// attributes beyond the computed `class`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum DayContent {
    /// Custom text plus custom `<td>` attributes.  A `class` attribute
    /// replaces the configured `day_class`.
    Pair(CellText, Attributes),
    /// Custom text with default attributes
    Text(CellText),
    /// Use the defaults for everything
    #[default]
    Empty,
}

impl DayContent {
    pub fn text<T: Into<CellText>>(text: T) -> DayContent {
        DayContent::Text(text.into())
    }

    pub fn pair<T, I, K, V>(text: T, attributes: I) -> DayContent
    where
        T: Into<CellText>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        DayContent::Pair(
            text.into(),
            attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    fn into_parts(self) -> (Option<CellText>, Attributes) {
        match self {
            DayContent::Pair(text, attrs) => (Some(text), attrs),
            DayContent::Text(text) => (Some(text), Attributes::new()),
            DayContent::Empty => (None, Attributes::new()),
        }
    }
}

/// A fully-resolved day cell
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CellResult {
    pub(crate) text: CellText,
    pub(crate) attributes: Attributes,
    pub(crate) class_list: Vec<String>,
    /// Name of the day's month, shown to screen readers only
    pub(crate) hidden_label: Option<String>,
}

impl CellResult {
    pub(crate) fn resolve<R: DayRenderer>(
        config: &CalendarConfig,
        day: GridDay,
        days: &R,
    ) -> Result<CellResult, R::Error> {
        let (text, mut attributes) = days.render_day(day.date)?.into_parts();
        let text = text.unwrap_or_else(|| CellText::Plain(day.date.day().to_string()));
        // A caller-supplied class only replaces the base class if it has at
        // least one token.
        let base = attributes
            .remove("class")
            .filter(|c| c.split_whitespace().next().is_some())
            .unwrap_or_else(|| config.day_class.clone());
        let other_month = (!day.in_month).then_some(config.other_month_class.as_str());
        let weekend = day.date.weekday().is_weekend().then_some(WEEKEND_CLASS);
        let today = (config.show_today && day.date == config.today).then_some(TODAY_CLASS);
        let entries = [Some(base.as_str()), other_month, weekend, today]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        let class_list = class_list(&entries);
        let hidden_label =
            (config.accessible && !day.in_month).then(|| day.date.month().to_string());
        Ok(CellResult {
            text,
            attributes,
            class_list,
            hidden_label,
        })
    }

    pub(crate) fn class(&self) -> String {
        self.class_list.join(" ")
    }

    pub(crate) fn into_element(self) -> Element {
        let class = self.class();
        let mut attributes = self.attributes;
        attributes.insert(String::from("class"), class);
        let mut td = Element::new("td");
        for (key, value) in attributes {
            td.set_attr(key, value);
        }
        td.push(self.text);
        if let Some(label) = self.hidden_label {
            td.push(
                Element::new("span")
                    .with_attr("class", HIDDEN_CLASS)
                    .with_child(label),
            );
        }
        td
    }
}

// Splits each entry into whitespace-separated tokens and drops empty and
// repeated tokens, keeping the first occurrence of each.
fn class_list(entries: &[&str]) -> Vec<String> {
    let mut classes: Vec<String> = Vec::new();
    for token in entries.iter().flat_map(|s| s.split_whitespace()) {
        if !classes.iter().any(|c| c == token) {
            classes.push(token.to_owned());
        }
    }
    classes
}
