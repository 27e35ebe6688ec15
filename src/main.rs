use anyhow::Context;
use flexi_logger::Logger;
use htmlcal::{
    local_today, Calendar, CalendarError, CalendarOptions, DefaultDays, OutputOptions,
};
use lexopt::{Arg, Parser, ValueExt};
use log::debug;
use std::path::PathBuf;
use time::Date;

const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        config: Option<PathBuf>,
        options: CalendarOptions,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut config = None;
        let mut options = CalendarOptions::new();
        let mut year = None;
        let mut month = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('f') | Arg::Long("first-day") => {
                    options = options.first_day_of_week(parser.value()?.parse()?);
                }
                Arg::Long("accessible") => options = options.accessible(true),
                Arg::Long("no-today") => options = options.show_today(false),
                Arg::Long("no-month-header") => options = options.month_header(false),
                Arg::Long("previous") => {
                    options = options.previous_month_text(parser.value()?.string()?);
                }
                Arg::Long("next") => {
                    options = options.next_month_text(parser.value()?.string()?);
                }
                Arg::Long("indent") => {
                    options = options.output(OutputOptions {
                        indent: Some(parser.value()?.parse()?),
                    });
                }
                Arg::Value(value) if year.is_none() => year = Some(value),
                Arg::Value(value) if month.is_none() => month = Some(value),
                _ => return Err(arg.unexpected()),
            }
        }
        match (year, month) {
            (Some(year), Some(month)) => {
                options = options.year(year.parse()?).month(month.parse()?);
            }
            (Some(_), None) => return Err(lexopt::Error::from("expected both a YEAR and a MONTH")),
            (None, _) => (),
        }
        Ok(Command::Run { config, options })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run { config, options } => {
                let base = match config {
                    Some(path) => CalendarOptions::from_toml_file(path)?,
                    None => CalendarOptions::new(),
                };
                let html = render(base.merge(options), local_today())
                    .context("failed to render calendar")?;
                println!("{html}");
                Ok(())
            }
            Command::Help => {
                println!("Usage: htmlcal [<options>] [YEAR MONTH]");
                println!();
                println!("Render a month as a CSS-customizable XHTML calendar table");
                println!();
                println!("Options:");
                println!("  -c, --config FILE     Read calendar options from a TOML file");
                println!("  -f, --first-day N     Start weeks on day N (0 = Sunday … 6 = Saturday)");
                println!("      --accessible      Label days from adjacent months for screen readers");
                println!("      --no-today        Do not highlight today's date");
                println!("      --no-month-header Omit the row with the month's name");
                println!("      --previous TEXT   Show TEXT left of the month's name");
                println!("      --next TEXT       Show TEXT right of the month's name");
                println!("      --indent N        Pretty-print with N spaces per level");
                println!("  -h, --help            Display this help message and exit");
                println!("  -V, --version         Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Render `options` with `today` both highlighted and standing in for any
/// missing year or month
fn render(mut options: CalendarOptions, today: Date) -> Result<String, CalendarError> {
    if options.year.is_none() || options.month.is_none() {
        debug!("No year/month given; defaulting to the current month");
        options.year = options.year.or(Some(today.year()));
        options.month = options.month.or(Some(u8::from(today.month())));
    }
    Calendar::new(options.resolve_with_today(today)?)?.render(&DefaultDays)
}

fn main() -> anyhow::Result<()> {
    let _logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)
        .context("failed to configure logging")?
        .start()
        .context("failed to start logger")?;
    Command::from_parser(Parser::from_env())?.run()
}
