//! Trip data models.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One parsed ride.
///
/// The record owns its `document` until the report emitter moves the file
/// into an output directory. An empty `document` path means there is no
/// file to attach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRecord {
    /// Calendar date of the trip.
    pub date: NaiveDate,

    /// Time of day the trip started (earliest timestamp on the receipt).
    pub time: NaiveTime,

    /// Fare in the fixed receipt currency.
    pub fare: Decimal,

    /// Receipt document attached to the report.
    pub document: PathBuf,
}

impl TripRecord {
    pub fn new(date: NaiveDate, time: NaiveTime, fare: Decimal, document: impl Into<PathBuf>) -> Self {
        Self {
            date,
            time,
            fare,
            document: document.into(),
        }
    }

    /// Batch deduplication key.
    pub fn key(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.time)
    }

    /// Whether the record carries a document to move into the report.
    pub fn has_document(&self) -> bool {
        !self.document.as_os_str().is_empty()
    }

    /// Path of the attached document, if any.
    pub fn document(&self) -> Option<&Path> {
        self.has_document().then_some(self.document.as_path())
    }
}

/// Fields parsed from receipt text, before a document is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTrip {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub fare: Decimal,
    /// Reported but non-fatal problems (e.g. an ambiguous fare).
    pub warnings: Vec<String>,
}

impl ParsedTrip {
    /// Attach the materialized document.
    pub fn into_record(self, document: impl Into<PathBuf>) -> TripRecord {
        TripRecord::new(self.date, self.time, self.fare, document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_absent() {
        let trip = TripRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            NaiveTime::from_hms_opt(14, 45, 0).unwrap(),
            Decimal::new(1234, 2),
            PathBuf::new(),
        );

        assert!(!trip.has_document());
        assert!(trip.document().is_none());
    }

    #[test]
    fn test_key_is_date_and_time() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let trip = TripRecord::new(date, time, Decimal::ONE, "receipt.pdf");

        assert_eq!(trip.key(), (date, time));
        assert_eq!(trip.document(), Some(Path::new("receipt.pdf")));
    }
}
