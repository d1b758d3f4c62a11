//! Ride receipt field extraction module.

mod parser;
pub mod rules;

pub use parser::TripParser;
pub use rules::PatternSet;

use crate::error::ExtractionError;
use crate::models::trip::ParsedTrip;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for receipt text parsers.
pub trait ReceiptParser {
    /// Parse trip fields from normalized receipt text.
    fn parse(&self, text: &str) -> Result<ParsedTrip>;
}
