use chrono::NaiveDate;

use crate::error::Error;

/// Date format of protocol file names and command-line arguments.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Parse a `DD.MM.YYYY` date. Empty or malformed input yields `None`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// An inclusive range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn single(day: NaiveDate) -> Self {
        DateRange::new(day, day)
    }

    /// Build the optional filter from the date arguments following the
    /// directory: none means no filter, one selects a single day, two give
    /// the bounds.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Option<DateRange>, Error> {
        let parse = |arg: &S| {
            let arg = arg.as_ref();
            parse_date(arg).ok_or_else(|| Error::InvalidDate(arg.to_owned()))
        };

        match args {
            [] => Ok(None),
            [day] => Ok(Some(DateRange::single(parse(day)?))),
            [start, end] => Ok(Some(DateRange::new(parse(start)?, parse(end)?))),
            _ => Err(Error::InvalidDate(
                args.iter()
                    .map(|a| a.as_ref())
                    .collect::<Vec<_>>()
                    .join(" "),
            )),
        }
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether a `DD.MM.YYYY` string lies in the range. Unparseable dates,
    /// including the empty string, never match.
    pub fn matches(&self, date: &str) -> bool {
        parse_date(date).is_some_and(|d| self.contains(d))
    }
}
