//! Error types for the fareweek-core library.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

/// Main error type for the fareweek library.
#[derive(Error, Debug)]
pub enum FareweekError {
    /// Document reading or rendering error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Trip field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Report emission error.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// Mail source or sink error.
    #[error("mail error: {0}")]
    Mail(#[from] MailError),

    /// Two trips in one batch share a date and time.
    #[error("input contains multiple trips at {date} {time}")]
    DuplicateTrip { date: NaiveDate, time: NaiveTime },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading and materializing receipt documents.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Failed to render a receipt into a PDF.
    #[error("failed to render {path}: {reason}")]
    Render { path: String, reason: String },

    /// I/O error while reading the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to trip field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A field matched zero or several distinct values.
    #[error("expected 1 '{field}' field, got {matches:?}")]
    AmbiguousField { field: String, matches: Vec<String> },

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },

    /// A custom pattern does not expose the capture groups the parser needs.
    #[error("invalid {field} pattern: {reason}")]
    Pattern { field: String, reason: String },
}

/// Errors related to report emission.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Failed to read the spreadsheet template.
    #[error("failed to read template {path}: {reason}")]
    Template { path: String, reason: String },

    /// Failed to write the filled spreadsheet.
    #[error("failed to write report {path}: {reason}")]
    Write { path: String, reason: String },

    /// A day column falls past `Z`.
    #[error("column offset {0} is past column Z")]
    ColumnOutOfRange(usize),

    /// I/O error while materializing the output directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the mailbox source and the mail sink.
#[derive(Error, Debug)]
pub enum MailError {
    /// Failed to parse a stored message.
    #[error("failed to parse message {path}: {reason}")]
    Parse { path: String, reason: String },

    /// Failed to build an outgoing message.
    #[error("failed to compose message: {0}")]
    Compose(String),

    /// SMTP delivery failed.
    #[error("failed to deliver message: {0}")]
    Transport(String),

    /// Login was refused.
    #[error(
        "failed to login to {0} with the provided credentials; \
         you may need an app password for this account"
    )]
    Auth(String),

    /// I/O error while reading messages or attachments.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the fareweek library.
pub type Result<T> = std::result::Result<T, FareweekError>;
