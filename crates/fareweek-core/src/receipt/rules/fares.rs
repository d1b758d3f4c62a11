//! Trip fare extraction.

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;
use tracing::warn;

use super::{ExtractionMatch, FieldExtractor, distinct_sources};
use crate::error::ExtractionError;

/// Fare total extractor ("Total CA$12.34").
pub struct FareExtractor<'a> {
    pattern: &'a Regex,
}

impl<'a> FareExtractor<'a> {
    pub fn new(pattern: &'a Regex) -> Self {
        Self { pattern }
    }
}

impl FieldExtractor for FareExtractor<'_> {
    type Output = ExtractionMatch<Option<Decimal>>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let amount = caps.get(1)?;
                Some(
                    ExtractionMatch::new(Decimal::from_str(amount.as_str()).ok(), amount.as_str())
                        .with_position(amount.start(), amount.end()),
                )
            })
            .collect()
    }
}

/// The fare chosen for a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareMatch {
    /// First matched amount.
    pub value: Decimal,
    /// Ambiguity report when the text had several distinct totals.
    pub warning: Option<String>,
}

/// Extract the fare of a trip.
///
/// Several distinct totals are reported but not fatal: the first one in
/// text order is used. No total at all is an error.
pub fn extract_fare(pattern: &Regex, text: &str) -> Result<FareMatch, ExtractionError> {
    let matches = FareExtractor::new(pattern).extract_all(text);
    let distinct = distinct_sources(&matches);

    let sources: Vec<String> = matches.iter().map(|m| m.source.clone()).collect();
    let first = matches
        .into_iter()
        .next()
        .ok_or_else(|| ExtractionError::MissingField("fare".to_string()))?;

    let warning = (distinct.len() != 1).then(|| {
        let message = format!("Expected 1 'fare' field, got {:?}", sources);
        warn!("{}", message);
        message
    });

    let value = first.value.ok_or_else(|| ExtractionError::Parse {
        field: "fare".to_string(),
        value: first.source.clone(),
    })?;

    Ok(FareMatch { value, warning })
}
