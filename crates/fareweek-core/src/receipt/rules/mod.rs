//! Rule-based field extractors for ride receipts.

pub mod dates;
pub mod fares;
pub mod patterns;
pub mod times;

pub use dates::{DateExtractor, extract_trip_date, parse_long_date};
pub use fares::{FareExtractor, FareMatch, extract_fare};
pub use patterns::PatternSet;
pub use times::{TimeExtractor, extract_trip_time, resolve_timestamp};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Extract all occurrences of the field, in text order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value matched in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Distinct matched source strings, in order of first appearance.
pub fn distinct_sources<T>(matches: &[ExtractionMatch<T>]) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::new();
    for m in matches {
        if !distinct.contains(&m.source) {
            distinct.push(m.source.clone());
        }
    }
    distinct
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_sources_keeps_order() {
        let matches = vec![
            ExtractionMatch::new((), "b"),
            ExtractionMatch::new((), "a"),
            ExtractionMatch::new((), "b"),
        ];
        assert_eq!(distinct_sources(&matches), vec!["b", "a"]);
    }
}
