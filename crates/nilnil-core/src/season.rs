// Season codes ("9394") and their display labels ("1993-94").

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeasonCodeError {
    #[error("season code `{0}` must be exactly four digits, e.g. 9394")]
    Malformed(String),

    #[error("season start year {0} cannot be written as a two-digit season code")]
    YearOutOfRange(u32),
}

/// Two-digit year to a full year: below 50 is 20xx, otherwise 19xx.
fn full_year(two_digits: u32) -> u32 {
    if two_digits < 50 {
        2000 + two_digits
    } else {
        1900 + two_digits
    }
}

fn split_digits(code: &str) -> Option<(u32, u32)> {
    if code.len() != 4 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let first = code[..2].parse().ok()?;
    let second = code[2..].parse().ok()?;
    Some((first, second))
}

/// Display label for a season code, e.g. `9394` -> `1993-94`.
///
/// Anything that is not four ASCII digits is returned unchanged.
pub fn season_label(code: &str) -> String {
    match split_digits(code) {
        Some((first, second)) => format!("{}-{:02}", full_year(first), full_year(second) % 100),
        None => code.to_string(),
    }
}

/// A validated four-digit season code.
///
/// Ordered chronologically by start year, so `9899` < `9900` < `0001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeasonCode(String);

impl SeasonCode {
    /// Code for the season starting in `year`, e.g. 1993 -> `9394`.
    pub fn from_start_year(year: u32) -> Result<Self, SeasonCodeError> {
        if !(1950..=2048).contains(&year) {
            return Err(SeasonCodeError::YearOutOfRange(year));
        }
        Ok(Self(format!("{:02}{:02}", year % 100, (year + 1) % 100)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full calendar year the season starts in.
    pub fn start_year(&self) -> u32 {
        // Validated on construction; both halves are digits.
        full_year(self.0[..2].parse().unwrap_or(0))
    }

    pub fn label(&self) -> String {
        season_label(&self.0)
    }
}

impl FromStr for SeasonCode {
    type Err = SeasonCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        match split_digits(code) {
            Some(_) => Ok(Self(code.to_string())),
            None => Err(SeasonCodeError::Malformed(s.to_string())),
        }
    }
}

impl TryFrom<String> for SeasonCode {
    type Error = SeasonCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeasonCode> for String {
    fn from(code: SeasonCode) -> Self {
        code.0
    }
}

impl fmt::Display for SeasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for SeasonCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start_year()
            .cmp(&other.start_year())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for SeasonCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Every season code whose start year lies in `first..=last`.
pub fn season_range(first: u32, last: u32) -> Result<Vec<SeasonCode>, SeasonCodeError> {
    (first..=last).map(SeasonCode::from_start_year).collect()
}
