//! Line-oriented interactive shell over a browsing session

use crate::render;
use ivrstats_core::format::{END_LABEL, START_LABEL};
use ivrstats_core::{Command, DateFields, LocationFilter, Session};
use std::io::{BufRead, Write};
use thiserror::Error;

/// Help text printed by the `help` command
pub const HELP: &str = "\
Commands:
  location <name>      select a location (\"All Locations\" for none)
  start <YYYY-MM-DD>   set the start date
  end <YYYY-MM-DD>     set the end date
  filter               filter by the start and end dates
  dates <start> <end>  set both dates and filter
  clear                clear every filter
  show                 print the visible calls
  summary              print the call totals
  locations            list known locations
  help                 show this help
  quit                 leave the shell";

/// Errors reading a shell line
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShellError {
    /// Command word not recognised
    #[error("Unknown command: {0} (type `help` for a list)")]
    UnknownCommand(String),

    /// Command given without its argument
    #[error("Missing argument for `{command}`: expected {expected}")]
    MissingArgument {
        /// Command word
        command: &'static str,
        /// Description of the expected argument
        expected: &'static str,
    },
}

/// One parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Select a location
    Location(String),
    /// Set the start date field
    Start(String),
    /// Set the end date field
    End(String),
    /// Filter by the date fields
    Filter,
    /// Set both date fields and filter
    Dates(String, String),
    /// Clear every filter
    Clear,
    /// Print the visible calls
    Show,
    /// Print the totals
    Summary,
    /// List known locations
    Locations,
    /// Print help
    Help,
    /// Leave the shell
    Quit,
    /// Blank line
    Empty,
}

impl std::str::FromStr for Input {
    type Err = ShellError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        let argument = |command: &'static str, expected: &'static str| {
            if rest.is_empty() {
                Err(ShellError::MissingArgument { command, expected })
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Empty),
            "location" | "loc" => argument("location", "a location name").map(Self::Location),
            "start" => argument("start", "a YYYY-MM-DD date").map(Self::Start),
            "end" => argument("end", "a YYYY-MM-DD date").map(Self::End),
            "filter" => Ok(Self::Filter),
            "dates" => match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
                [start, end] => Ok(Self::Dates((*start).to_string(), (*end).to_string())),
                _ => Err(ShellError::MissingArgument {
                    command: "dates",
                    expected: "a start and an end date",
                }),
            },
            "clear" => Ok(Self::Clear),
            "show" | "list" => Ok(Self::Show),
            "summary" => Ok(Self::Summary),
            "locations" => Ok(Self::Locations),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(ShellError::UnknownCommand(other.to_string())),
        }
    }
}

/// Widget state of the shell: location selector and the two date fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields {
    /// Location selector value
    pub location: LocationFilter,
    /// Start date field text
    pub start: String,
    /// End date field text
    pub end: String,
}

impl Default for Fields {
    fn default() -> Self {
        Self {
            location: LocationFilter::All,
            start: START_LABEL.to_string(),
            end: END_LABEL.to_string(),
        }
    }
}

impl Fields {
    fn dates(&self) -> DateFields {
        DateFields::new(self.start.clone(), self.end.clone())
    }

    fn set_start(&mut self, date: &str) {
        self.start = format!("{START_LABEL} {date}");
    }

    fn set_end(&mut self, date: &str) {
        self.end = format!("{END_LABEL} {date}");
    }
}

/// What the caller should do after a line has been handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// Stop reading
    Quit,
}

/// Interactive shell state
#[derive(Debug)]
pub struct Shell {
    session: Session,
    fields: Fields,
}

impl Shell {
    /// Shell over `session` with empty fields
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            fields: Fields::default(),
        }
    }

    /// The underlying session
    #[cfg(test)]
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Current widget state
    #[cfg(test)]
    #[must_use]
    pub const fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Handle one parsed line, writing any output to `out`
    ///
    /// Session errors are written to `err` and do not stop the shell.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `out` or `err` fails.
    pub fn execute<W: Write, E: Write>(
        &mut self,
        input: Input,
        out: &mut W,
        err: &mut E,
    ) -> std::io::Result<Flow> {
        let command = match input {
            Input::Location(name) => {
                let location = LocationFilter::from_selection(&name);
                Some(Command::LocationChanged {
                    location,
                    dates: self.fields.dates(),
                })
            }
            Input::Start(date) => {
                self.fields.set_start(&date);
                None
            }
            Input::End(date) => {
                self.fields.set_end(&date);
                None
            }
            Input::Dates(start, end) => {
                self.fields.set_start(&start);
                self.fields.set_end(&end);
                Some(self.date_filter_command())
            }
            Input::Filter => Some(self.date_filter_command()),
            Input::Clear => Some(Command::ClearFilter),
            Input::Show => {
                render::write_table(out, self.session.visible())?;
                render::write_summary(out, &self.session.summary())?;
                None
            }
            Input::Summary => {
                render::write_summary(out, &self.session.summary())?;
                None
            }
            Input::Locations => {
                for entry in self.session.selector_entries() {
                    writeln!(out, "{entry}")?;
                }
                None
            }
            Input::Help => {
                writeln!(out, "{HELP}")?;
                None
            }
            Input::Quit => return Ok(Flow::Quit),
            Input::Empty => None,
        };

        if let Some(command) = command {
            self.dispatch(command, out, err)?;
        }
        Ok(Flow::Continue)
    }

    /// Read lines from `input` until it ends or `quit` is entered
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub fn run<R: BufRead, W: Write, E: Write>(
        &mut self,
        input: R,
        out: &mut W,
        err: &mut E,
    ) -> std::io::Result<()> {
        write!(out, "> ")?;
        out.flush()?;

        for line in input.lines() {
            let flow = match line?.parse::<Input>() {
                Ok(parsed) => self.execute(parsed, out, err)?,
                Err(e) => {
                    writeln!(err, "{e}")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                return Ok(());
            }
            write!(out, "> ")?;
            out.flush()?;
        }

        writeln!(out)
    }

    fn date_filter_command(&self) -> Command {
        Command::ApplyDateFilter {
            location: self.fields.location.clone(),
            dates: self.fields.dates(),
        }
    }

    fn dispatch<W: Write, E: Write>(
        &mut self,
        command: Command,
        out: &mut W,
        err: &mut E,
    ) -> std::io::Result<()> {
        let clear = matches!(command, Command::ClearFilter);
        let selected = match &command {
            Command::LocationChanged { location, .. } => Some(location.clone()),
            _ => None,
        };

        match self.session.handle(command) {
            Ok(()) => {
                if clear {
                    self.fields = Fields::default();
                } else if let Some(location) = selected {
                    self.fields.location = location;
                }
                render::write_summary(out, &self.session.summary())
            }
            Err(e) => writeln!(err, "{e}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ivrstats_core::{CallRecord, Outcome, RecordStore};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn record(location: &str, day: u32, outcome: &str) -> CallRecord {
        CallRecord {
            location: location.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            caller: "(555) 123-4567".to_string(),
            destination: "(555) 000-1000".to_string(),
            duration: 61,
            outcome: Outcome::from(outcome),
        }
    }

    fn shell() -> Shell {
        Shell::new(Session::new(
            vec!["North".to_string(), "South".to_string()],
            RecordStore::new(vec![
                record("North", 20, "Released by caller"),
                record("South", 10, "Released by IVR"),
                record("North", 5, "1 -> 2001"),
            ]),
        ))
    }

    fn run(shell: &mut Shell, script: &str) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        shell.run(script.as_bytes(), &mut out, &mut err).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[rstest]
    #[case("location North", Input::Location("North".to_string()))]
    #[case("  LOCATION   All Locations ", Input::Location("All Locations".to_string()))]
    #[case("start 2024-01-01", Input::Start("2024-01-01".to_string()))]
    #[case("end 2024-01-31", Input::End("2024-01-31".to_string()))]
    #[case("dates 2024-01-01 2024-01-31", Input::Dates("2024-01-01".to_string(), "2024-01-31".to_string()))]
    #[case("filter", Input::Filter)]
    #[case("clear", Input::Clear)]
    #[case("list", Input::Show)]
    #[case("exit", Input::Quit)]
    #[case("", Input::Empty)]
    fn test_parse_input(#[case] line: &str, #[case] expected: Input) {
        assert_eq!(line.parse::<Input>().unwrap(), expected);
    }

    #[rstest]
    #[case("location", ShellError::MissingArgument { command: "location", expected: "a location name" })]
    #[case("dates 2024-01-01", ShellError::MissingArgument { command: "dates", expected: "a start and an end date" })]
    #[case("sort timestamp", ShellError::UnknownCommand("sort".to_string()))]
    fn test_parse_input_errors(#[case] line: &str, #[case] expected: ShellError) {
        assert_eq!(line.parse::<Input>().unwrap_err(), expected);
    }

    #[test]
    fn test_location_then_date_filter() {
        let mut shell = shell();
        let (out, err) = run(
            &mut shell,
            "location North\nstart 2024-01-01\nend 2024-01-10\nfilter\n",
        );

        assert!(err.is_empty(), "unexpected errors: {err}");
        assert!(out.contains("Total: 2  Abandoned: 1  Kicked off: 0"));
        assert_eq!(shell.session().visible_len(), 1);
        assert_eq!(shell.fields().location, LocationFilter::Named("North".to_string()));
    }

    #[test]
    fn test_filter_without_dates_reports_error() {
        let mut shell = shell();
        let (_, err) = run(&mut shell, "filter\n");

        assert!(err.contains("Please choose a start and end date"));
        assert_eq!(shell.session().visible_len(), 3);
    }

    #[test]
    fn test_reversed_dates_keep_view() {
        let mut shell = shell();
        let (_, err) = run(
            &mut shell,
            "location South\ndates 2024-01-31 2024-01-01\n",
        );

        assert!(err.contains("comes before start date"));
        assert_eq!(shell.session().visible_len(), 1);
    }

    #[test]
    fn test_clear_resets_fields() {
        let mut shell = shell();
        let (out, _) = run(
            &mut shell,
            "location South\ndates 2024-01-01 2024-01-31\nclear\n",
        );

        assert_eq!(shell.fields(), &Fields::default());
        assert_eq!(shell.session().visible_len(), 3);
        assert!(out.contains("Total: 3  Abandoned: 1  Kicked off: 1"));
    }

    #[test]
    fn test_unknown_location_and_command_continue() {
        let mut shell = shell();
        let (out, err) = run(&mut shell, "location West\nbogus\nsummary\nquit\nshow\n");

        assert!(err.contains("Unknown location: West"));
        assert!(err.contains("Unknown command: bogus"));
        assert!(out.contains("Total: 3"));
        assert!(!out.contains("Location:"), "output after quit: {out}");
        assert_eq!(shell.fields().location, LocationFilter::All);
    }

    #[test]
    fn test_locations_lists_sentinel_first() {
        let mut shell = shell();
        let (out, _) = run(&mut shell, "locations\n");

        let lines: Vec<&str> = out
            .lines()
            .map(|line| line.trim_start_matches("> "))
            .filter(|line| !line.is_empty())
            .collect();
        assert_eq!(lines, vec!["All Locations", "North", "South"]);
    }
}
