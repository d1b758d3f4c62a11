//! Regex patterns for ride receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ExtractionError;

lazy_static! {
    /// Long-form date: "January 5, 2024". Groups: month name, day, year.
    pub static ref DATE_LONG: Regex = Regex::new(
        r"(January|February|March|April|May|June|July|August|September|October|November|December) (\d+), (\d+)"
    ).unwrap();

    /// Receipt total in the fixed currency. Group: amount.
    pub static ref FARE_TOTAL: Regex = Regex::new(
        r"Total\s+CA\$(\d+\.\d+)"
    ).unwrap();

    /// Clock time with an optional leading numeric date: "1/5/24 3:00 PM".
    /// Groups: month, day, year (all optional together), hour, minute, meridiem.
    pub static ref CLOCK_TIME: Regex = Regex::new(
        r"(?:(\d+)/(\d+)/(\d+))?\s*(\d+):(\d+)\s(AM|PM)"
    ).unwrap();
}

/// The three patterns the trip parser matches against.
///
/// Custom patterns must keep the capture-group layout of the defaults:
/// the date pattern has 3 groups (month name, day, year), the fare pattern
/// at least 1 (amount) and the time pattern 6 (month, day, year, hour,
/// minute, AM/PM).
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub date: Regex,
    pub fare: Regex,
    pub time: Regex,
}

impl PatternSet {
    /// Build a pattern set, checking the capture-group layout.
    pub fn new(date: Regex, fare: Regex, time: Regex) -> Result<Self, ExtractionError> {
        check_groups("date", &date, 3)?;
        check_groups("fare", &fare, 1)?;
        check_groups("time", &time, 6)?;
        Ok(Self { date, fare, time })
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            date: DATE_LONG.clone(),
            fare: FARE_TOTAL.clone(),
            time: CLOCK_TIME.clone(),
        }
    }
}

fn check_groups(field: &str, pattern: &Regex, expected: usize) -> Result<(), ExtractionError> {
    // captures_len counts the implicit whole-match group
    let groups = pattern.captures_len() - 1;
    if groups < expected {
        return Err(ExtractionError::Pattern {
            field: field.to_string(),
            reason: format!("expected {} capture groups, found {}", expected, groups),
        });
    }
    Ok(())
}
