//! Resolution of human-phrased relative review dates ("3 weeks ago",
//! "a month ago", "moments ago") into absolute UTC timestamps.
//!
//! Months are always 30 days and years always 365 days. Stored timestamps
//! and `--from-date` comparisons rely on these exact widths, so they are
//! not calendar-aware.

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelativeTimeError {
    #[error("relative date is empty")]
    Empty,

    #[error("unrecognized time unit \"{0}\"")]
    UnrecognizedUnit(String),

    #[error("malformed quantity in relative date \"{phrase}\"")]
    MalformedQuantity { phrase: String },

    #[error("relative date \"{phrase}\" is out of range")]
    OutOfRange { phrase: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Moment,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    /// Returns the unit and whether the token was the plural form.
    fn parse(token: &str) -> Option<(Self, bool)> {
        let parsed = match token {
            "moment" => (Self::Moment, false),
            "moments" => (Self::Moment, true),
            "minute" => (Self::Minute, false),
            "minutes" => (Self::Minute, true),
            "hour" => (Self::Hour, false),
            "hours" => (Self::Hour, true),
            "day" => (Self::Day, false),
            "days" => (Self::Day, true),
            "week" => (Self::Week, false),
            "weeks" => (Self::Week, true),
            "month" => (Self::Month, false),
            "months" => (Self::Month, true),
            "year" => (Self::Year, false),
            "years" => (Self::Year, true),
            _ => return None,
        };
        Some(parsed)
    }

    fn span(self, quantity: i64) -> Option<TimeDelta> {
        match self {
            Self::Moment => TimeDelta::try_seconds(1),
            Self::Minute => TimeDelta::try_minutes(quantity),
            Self::Hour => TimeDelta::try_hours(quantity),
            Self::Day => TimeDelta::try_days(quantity),
            Self::Week => TimeDelta::try_weeks(quantity),
            Self::Month => TimeDelta::try_days(quantity.checked_mul(30)?),
            Self::Year => TimeDelta::try_days(quantity.checked_mul(365)?),
        }
    }
}

/// Resolves `phrase` to an absolute instant relative to `anchor`.
///
/// Accepts `"<quantity> <unit>"` or `"<unit>"`, optionally followed by
/// `ago`. A singular unit always means one of that unit, whatever word
/// precedes it (`"a month"`, `"an hour"`, `"1 day"`). Any form of
/// `moment` resolves to one second before `anchor`.
///
/// # Errors
///
/// - [`RelativeTimeError::Empty`] for a blank phrase.
/// - [`RelativeTimeError::UnrecognizedUnit`] when the unit token is unknown.
/// - [`RelativeTimeError::MalformedQuantity`] when a plural unit's quantity
///   is missing or not a positive integer.
/// - [`RelativeTimeError::OutOfRange`] when the offset cannot be represented.
pub fn resolve(phrase: &str, anchor: DateTime<Utc>) -> Result<DateTime<Utc>, RelativeTimeError> {
    let lowered = phrase.to_lowercase();
    let mut tokens: Vec<&str> = lowered.split_whitespace().collect();
    if tokens.last() == Some(&"ago") {
        tokens.pop();
    }

    let Some((unit_token, quantity_tokens)) = tokens.split_last() else {
        return Err(RelativeTimeError::Empty);
    };

    let (unit, plural) = Unit::parse(unit_token)
        .ok_or_else(|| RelativeTimeError::UnrecognizedUnit((*unit_token).to_string()))?;

    let quantity = if plural && unit != Unit::Moment {
        parse_quantity(quantity_tokens).ok_or_else(|| RelativeTimeError::MalformedQuantity {
            phrase: phrase.to_string(),
        })?
    } else {
        1
    };

    unit.span(quantity)
        .and_then(|span| anchor.checked_sub_signed(span))
        .ok_or_else(|| RelativeTimeError::OutOfRange {
            phrase: phrase.to_string(),
        })
}

fn parse_quantity(tokens: &[&str]) -> Option<i64> {
    match tokens {
        [single] => single.parse::<u32>().ok().filter(|n| *n > 0).map(i64::from),
        _ => None,
    }
}
