//! The three-field daily record and the month key derived from it.

use std::{fmt, num::ParseFloatError};

use thiserror::Error;

/// A record that names a month but cannot be read. Skipping it or folding
/// in a guessed value would silently bias the mean, so these are fatal for
/// the unit processing the record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("date `{0}` is too short to name a month")]
    TruncatedDate(String),
    #[error("bad maximum temperature `{value}`")]
    BadMaxTemp {
        value: String,
        #[source]
        source: ParseFloatError,
    },
}

/// One `DDMMYYYY,minTemp,maxTemp` input line. Only the date and the
/// maximum temperature take part in the aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record<'a> {
    pub date: &'a str,
    pub min: &'a str,
    pub max: &'a str,
}

impl<'a> Record<'a> {
    /// Splits a line into its three fields.
    ///
    /// Lines with any other field count are not records and are dropped
    /// without notice, blank lines included.
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut fields = line.split(',');
        let (Some(date), Some(min), Some(max), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return None;
        };
        Some(Self { date, min, max })
    }

    /// The month key this record contributes to.
    pub fn month_key(&self) -> Result<MonthKey<'a>, RecordError> {
        MonthKey::of_date(self.date)
    }

    /// The day's maximum temperature.
    pub fn max_temp(&self) -> Result<f64, RecordError> {
        self.max.parse().map_err(|source| RecordError::BadMaxTemp {
            value: self.max.to_string(),
            source,
        })
    }
}

/// `MMYYYY` month identifier, borrowed from a record's date field.
///
/// Purely a function of the date string: equality and hashing are on the
/// string content, so the same month lands on the same key no matter which
/// unit saw the record or in what order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey<'a>(&'a str);

impl<'a> MonthKey<'a> {
    /// Drops the day (`DD`) prefix of a `DDMMYYYY` date.
    pub fn of_date(date: &'a str) -> Result<Self, RecordError> {
        match date.get(2..) {
            Some(month) => Ok(Self(month)),
            None => Err(RecordError::TruncatedDate(date.to_string())),
        }
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

impl std::borrow::Borrow<str> for MonthKey<'_> {
    fn borrow(&self) -> &str {
        self.0
    }
}

impl fmt::Display for MonthKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
