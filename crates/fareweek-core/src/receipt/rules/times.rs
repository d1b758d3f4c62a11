//! Trip time extraction.
//!
//! A receipt usually carries several clock times (request, pickup,
//! drop-off), some prefixed with their own numeric date. Every match is
//! resolved to a full timestamp and the earliest one wins.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use tracing::debug;

use super::{ExtractionMatch, FieldExtractor};
use crate::error::ExtractionError;

/// Raw pieces of one clock-time match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFragment {
    /// Month, day and year of a leading `M/D/YY` date, if present.
    pub date: Option<(String, String, String)>,
    pub hour: String,
    pub minute: String,
    /// `AM` or `PM`.
    pub meridiem: String,
}

/// Clock time extractor ("1/5/24 3:00 PM", "3:00 PM").
pub struct TimeExtractor<'a> {
    pattern: &'a Regex,
}

impl<'a> TimeExtractor<'a> {
    pub fn new(pattern: &'a Regex) -> Self {
        Self { pattern }
    }
}

impl FieldExtractor for TimeExtractor<'_> {
    type Output = ExtractionMatch<TimeFragment>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let date = match (caps.get(1), caps.get(2), caps.get(3)) {
                    (Some(m), Some(d), Some(y)) => {
                        Some((m.as_str().to_string(), d.as_str().to_string(), y.as_str().to_string()))
                    }
                    _ => None,
                };
                let fragment = TimeFragment {
                    date,
                    hour: group_str(&caps, 4),
                    minute: group_str(&caps, 5),
                    meridiem: group_str(&caps, 6),
                };
                Some(
                    ExtractionMatch::new(fragment, whole.as_str().trim())
                        .with_position(whole.start(), whole.end()),
                )
            })
            .collect()
    }
}

fn group_str(caps: &Captures<'_>, i: usize) -> String {
    caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default()
}

/// Extract the time of day a trip started.
///
/// Matches without their own date are placed on `date`. The earliest
/// resolved timestamp gives the time.
pub fn extract_trip_time(
    pattern: &Regex,
    text: &str,
    date: NaiveDate,
) -> Result<NaiveTime, ExtractionError> {
    let matches = TimeExtractor::new(pattern).extract_all(text);

    let mut earliest: Option<NaiveDateTime> = None;
    for m in &matches {
        let timestamp = resolve_timestamp(date, &m.value)?;
        earliest = Some(earliest.map_or(timestamp, |e| e.min(timestamp)));
    }

    let earliest = earliest.ok_or_else(|| ExtractionError::MissingField("time".to_string()))?;
    debug!("time: {} (earliest of {} matches)", earliest, matches.len());
    Ok(earliest.time())
}

/// Resolve one fragment to a timestamp.
///
/// Two-digit years in a leading date are taken as 20YY.
pub fn resolve_timestamp(date: NaiveDate, fragment: &TimeFragment) -> Result<NaiveDateTime, ExtractionError> {
    let day = match &fragment.date {
        Some((month, day, year)) => {
            let value = format!("{}/{}/{}", month, day, year);
            numeric_date(month, day, year).ok_or(ExtractionError::Parse {
                field: "time".to_string(),
                value,
            })?
        }
        None => date,
    };

    let clock = clock_time(&fragment.hour, &fragment.minute, &fragment.meridiem).ok_or_else(|| {
        ExtractionError::Parse {
            field: "time".to_string(),
            value: format!("{}:{} {}", fragment.hour, fragment.minute, fragment.meridiem),
        }
    })?;

    Ok(day.and_time(clock))
}

fn numeric_date(month: &str, day: &str, year: &str) -> Option<NaiveDate> {
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    let year = if year < 100 { 2000 + year } else { year };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn clock_time(hour: &str, minute: &str, meridiem: &str) -> Option<NaiveTime> {
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }

    let hour = match meridiem.to_ascii_uppercase().as_str() {
        "AM" => hour % 12,
        "PM" => hour % 12 + 12,
        _ => return None,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}
