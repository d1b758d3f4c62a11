//! Ride receipt parser.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use super::rules::{PatternSet, extract_fare, extract_trip_date, extract_trip_time};
use super::{ReceiptParser, Result};
use crate::document;
use crate::models::trip::{ParsedTrip, TripRecord};

/// Extracts date, time and fare from receipt text.
///
/// An ambiguous date is fatal. An ambiguous fare is only reported in
/// [`ParsedTrip::warnings`]; the first total is used.
#[derive(Debug, Clone, Default)]
pub struct TripParser {
    patterns: PatternSet,
}

impl TripParser {
    /// Create a parser with the default receipt patterns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom pattern set.
    pub fn with_patterns(mut self, patterns: PatternSet) -> Self {
        self.patterns = patterns;
        self
    }

    /// Pattern set in use.
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Read a receipt from disk, parse it and attach its PDF.
    pub fn parse_receipt(&self, receipt: &Path) -> crate::Result<TripRecord> {
        info!("parsing {}", receipt.display());

        let text = document::extract_text(receipt)?;
        let parsed = self.parse(&text)?;
        let pdf = document::materialize(receipt)?;

        info!(
            "pdf: {}, date: {}, time: {}, total: {}",
            pdf.display(),
            parsed.date,
            parsed.time,
            parsed.fare
        );

        Ok(parsed.into_record(pdf))
    }
}

impl ReceiptParser for TripParser {
    fn parse(&self, text: &str) -> Result<ParsedTrip> {
        let start = Instant::now();
        let mut warnings = Vec::new();

        let date = extract_trip_date(&self.patterns.date, text)?;

        let fare = extract_fare(&self.patterns.fare, text)?;
        warnings.extend(fare.warning);

        let time = extract_trip_time(&self.patterns.time, text, date)?;

        debug!("Parsed trip in {:?}", start.elapsed());

        Ok(ParsedTrip {
            date,
            time,
            fare: fare.value,
            warnings,
        })
    }
}
