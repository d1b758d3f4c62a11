//! Trip date extraction.

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use super::{ExtractionMatch, FieldExtractor, distinct_sources};
use crate::error::ExtractionError;

/// Long-form date extractor ("January 5, 2024").
pub struct DateExtractor<'a> {
    pattern: &'a Regex,
}

impl<'a> DateExtractor<'a> {
    pub fn new(pattern: &'a Regex) -> Self {
        Self { pattern }
    }
}

impl FieldExtractor for DateExtractor<'_> {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Extract the one date a receipt refers to.
///
/// The distinct set of matched strings must have exactly one member; no
/// match and several different matches are both ambiguous.
pub fn extract_trip_date(pattern: &Regex, text: &str) -> Result<NaiveDate, ExtractionError> {
    let matches = DateExtractor::new(pattern).extract_all(text);
    let distinct = distinct_sources(&matches);

    if distinct.len() != 1 {
        return Err(ExtractionError::AmbiguousField {
            field: "date".to_string(),
            matches: matches.into_iter().map(|m| m.source).collect(),
        });
    }

    let date = parse_long_date(pattern, &distinct[0])?;
    debug!("date: {} ({} matches)", date, matches.len());
    Ok(date)
}

/// Parse a string matched by the date pattern.
pub fn parse_long_date(pattern: &Regex, s: &str) -> Result<NaiveDate, ExtractionError> {
    let parse_error = || ExtractionError::Parse {
        field: "date".to_string(),
        value: s.to_string(),
    };

    let caps = pattern.captures(s).ok_or_else(parse_error)?;
    let month = caps.get(1).and_then(|m| month_from_name(m.as_str())).ok_or_else(parse_error)?;
    let day: u32 = caps.get(2).and_then(|m| m.as_str().parse().ok()).ok_or_else(parse_error)?;
    let year: i32 = caps.get(3).and_then(|m| m.as_str().parse().ok()).ok_or_else(parse_error)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(parse_error)
}

fn month_from_name(month: &str) -> Option<u32> {
    let number = match month.to_lowercase().as_str() {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::rules::patterns::DATE_LONG;

    #[test]
    fn test_single_date() {
        let date = extract_trip_date(&DATE_LONG, "Trip on January 5, 2024 downtown").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn test_repeated_identical_date_is_one() {
        let text = "January 5, 2024 ... receipt for January 5, 2024";
        let date = extract_trip_date(&DATE_LONG, text).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn test_two_distinct_dates_fail() {
        let err = extract_trip_date(&DATE_LONG, "January 5, 2024 and January 6, 2024").unwrap_err();
        match err {
            ExtractionError::AmbiguousField { field, matches } => {
                assert_eq!(field, "date");
                assert_eq!(matches, vec!["January 5, 2024", "January 6, 2024"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_date_fails() {
        let err = extract_trip_date(&DATE_LONG, "Total CA$12.34").unwrap_err();
        assert!(matches!(err, ExtractionError::AmbiguousField { ref matches, .. } if matches.is_empty()));
    }

    #[test]
    fn test_impossible_date_is_parse_error() {
        let err = extract_trip_date(&DATE_LONG, "February 30, 2024").unwrap_err();
        assert!(matches!(err, ExtractionError::Parse { .. }));
    }

    #[test]
    fn test_extractor_positions() {
        let text = "x March 3, 2023";
        let found = DateExtractor::new(&DATE_LONG).extract(text).unwrap();
        assert_eq!(found.position, Some((2, 15)));
        assert_eq!(found.value, "March 3, 2023");
    }
}
