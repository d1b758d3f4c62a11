//! Core library for ride receipt processing.
//!
//! This crate provides:
//! - Receipt text extraction (HTML and PDF) and PDF materialization
//! - Trip field extraction (date, fare, time of day) with ambiguity rules
//! - Sunday-based weekly grouping and expense form filling
//! - Fetching receipts from saved mail and sending finished reports

pub mod document;
pub mod error;
pub mod mail;
pub mod models;
pub mod pipeline;
pub mod receipt;
pub mod report;

pub use document::{DocumentFormat, TextExtractor, extract_text, materialize};
pub use error::{FareweekError, Result};
pub use mail::{FetchedDocument, MailboxSource, SearchRange, SmtpMailer, compose_report};
pub use models::{ConfigLookup, ParsedTrip, Settings, TripRecord};
pub use receipt::{PatternSet, ReceiptParser, TripParser};
pub use report::{ReportEmitter, ReportLayout, WeekBucket, group_weeks};
