//! Mail plumbing around the report pipeline.
//!
//! [`MailboxSource`] turns saved receipt messages into HTML documents the
//! pipeline can parse, and [`SmtpMailer`] sends finished report directories.

mod sink;
mod source;

pub use sink::{
    ComposedReport, SUBJECT_PREFIX, SUBMISSION_PORT, SmtpMailer, compose_report, guess_content_type,
    report_body, report_subject,
};
pub use source::{
    BodyFormat, FetchedDocument, MailboxSource, SEARCH_DATE_FORMAT, SearchRange, message_id_local,
};

use crate::error::MailError;

/// Result type for mail operations.
pub type Result<T> = std::result::Result<T, MailError>;
