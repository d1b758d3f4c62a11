//! Receipt messages read from a directory of saved `.eml` files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate};
use mailparse::{MailHeaderMap, ParsedMail, dateparse, parse_mail};
use tracing::{debug, info, warn};

use super::Result;
use crate::error::MailError;

/// Date format of `--since`/`--until` arguments, e.g. `08-Jan-2024`.
pub const SEARCH_DATE_FORMAT: &str = "%d-%b-%Y";

/// Sent-date window of the messages to fetch.
///
/// `since` is inclusive, `until` exclusive. Dates are compared in UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchRange {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl SearchRange {
    pub fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { since, until }
    }

    /// Parse a `DD-Mon-YYYY` date.
    pub fn parse_date(value: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), SEARCH_DATE_FORMAT).map_err(|_| {
            MailError::Parse {
                path: value.to_string(),
                reason: "date must look like 08-Jan-2024".to_string(),
            }
        })
    }

    /// Whether the range has no bounds.
    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.since.is_none_or(|since| date >= since) && self.until.is_none_or(|until| date < until)
    }
}

/// Body format of a fetched message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Html,
    Plain,
}

/// A receipt body taken from one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    /// Local part of the message id.
    pub id: String,
    pub body: String,
    pub format: BodyFormat,
}

impl FetchedDocument {
    /// File name the document is saved under.
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}_{}.html", prefix, self.id)
    }

    /// Write the document to `<dir>/<prefix>_<id>.html`.
    ///
    /// Plain-text bodies are wrapped in a `<pre>` block.
    pub fn save(&self, dir: &Path, prefix: &str) -> Result<PathBuf> {
        let path = dir.join(self.file_name(prefix));
        let content = match self.format {
            BodyFormat::Html => self.body.trim_end().to_string(),
            BodyFormat::Plain => format!(
                "<html><body><pre>{}</pre></body></html>",
                escape_html(self.body.trim_end())
            ),
        };
        fs::write(&path, content)?;
        Ok(path)
    }
}

/// Reads receipt messages from a directory of `.eml` files.
#[derive(Debug, Clone)]
pub struct MailboxSource {
    dir: PathBuf,
    sender: Option<String>,
    range: SearchRange,
    required: Vec<String>,
    excluded: Vec<String>,
}

impl MailboxSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sender: None,
            range: SearchRange::default(),
            required: Vec::new(),
            excluded: Vec::new(),
        }
    }

    /// Keep only messages whose `From` header contains `sender`.
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        let sender = sender.into();
        self.sender = (!sender.is_empty()).then_some(sender);
        self
    }

    pub fn with_range(mut self, range: SearchRange) -> Self {
        self.range = range;
        self
    }

    /// Keep only messages whose body contains every phrase.
    pub fn with_required_text(mut self, phrases: Vec<String>) -> Self {
        self.required = phrases;
        self
    }

    /// Drop messages whose body contains any phrase.
    pub fn with_excluded_text(mut self, phrases: Vec<String>) -> Self {
        self.excluded = phrases;
        self
    }

    /// The `.eml` files of the directory, sorted by name.
    pub fn message_files(&self) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case("eml"))
            })
            .collect();
        files.sort();
        Ok(files)
    }

    /// Read every matching message. Unreadable messages are skipped.
    pub fn fetch(&self) -> Result<Vec<FetchedDocument>> {
        let files = self.message_files()?;
        info!("found {} message files in {}", files.len(), self.dir.display());

        let mut documents = Vec::new();
        for path in files {
            match self.read_message(&path) {
                Ok(Some(doc)) => documents.push(doc),
                Ok(None) => debug!("Skipping {}", path.display()),
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }
        info!("{} matching messages", documents.len());
        Ok(documents)
    }

    /// Read one message, returning `None` when it does not match the filters.
    pub fn read_message(&self, path: &Path) -> Result<Option<FetchedDocument>> {
        let bytes = fs::read(path)?;
        let mail = parse_mail(&bytes).map_err(|e| MailError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        if let Some(sender) = &self.sender {
            let from = mail.headers.get_first_value("From").unwrap_or_default();
            if !from.to_lowercase().contains(&sender.to_lowercase()) {
                return Ok(None);
            }
        }

        if !self.range.is_unbounded() {
            match sent_date(&mail) {
                Some(date) if self.range.contains(date) => {}
                _ => return Ok(None),
            }
        }

        let Some((body, format)) = best_body(&mail) else {
            return Ok(None);
        };
        if !self.required.iter().all(|p| body.contains(p.as_str()))
            || self.excluded.iter().any(|p| body.contains(p.as_str()))
        {
            return Ok(None);
        }

        let id = mail
            .headers
            .get_first_value("Message-Id")
            .map(|v| message_id_local(&v))
            .filter(|id| !id.is_empty())
            .or_else(|| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .unwrap_or_default();

        info!(
            "Message-Id: {} Date: {}",
            id,
            mail.headers.get_first_value("Date").unwrap_or_default()
        );

        Ok(Some(FetchedDocument { id, body, format }))
    }
}

/// Local part of a message id: `<abc@host>` gives `abc`.
///
/// Path separators are replaced so the id is usable as a file name.
pub fn message_id_local(value: &str) -> String {
    let trimmed = value.trim().trim_start_matches('<').trim_end_matches('>');
    let local = trimmed.split('@').next().unwrap_or_default();
    local.replace(['/', '\\'], "_")
}

fn sent_date(mail: &ParsedMail) -> Option<NaiveDate> {
    let header = mail.headers.get_first_value("Date")?;
    let timestamp = dateparse(&header).ok()?;
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

/// The first `text/html` part, falling back to the first `text/plain` part.
fn best_body(mail: &ParsedMail) -> Option<(String, BodyFormat)> {
    fn walk(mail: &ParsedMail, mime: &str) -> Option<String> {
        if mail.ctype.mimetype.eq_ignore_ascii_case(mime) {
            if let Ok(body) = mail.get_body() {
                return Some(body);
            }
        }
        mail.subparts.iter().find_map(|part| walk(part, mime))
    }

    walk(mail, "text/html")
        .map(|b| (b, BodyFormat::Html))
        .or_else(|| walk(mail, "text/plain").map(|b| (b, BodyFormat::Plain)))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HTML_MESSAGE: &str = "From: Rides <noreply@rides.example>\r\n\
        To: me@example.com\r\n\
        Subject: Your trip\r\n\
        Date: Wed, 10 Jan 2024 15:04:05 +0000\r\n\
        Message-Id: <abc123@rides.example>\r\n\
        MIME-Version: 1.0\r\n\
        Content-Type: multipart/alternative; boundary=\"XX\"\r\n\
        \r\n\
        --XX\r\n\
        Content-Type: text/plain; charset=utf-8\r\n\
        \r\n\
        plain version\r\n\
        --XX\r\n\
        Content-Type: text/html; charset=utf-8\r\n\
        \r\n\
        <p>January 10, 2024</p><p>Total CA$9.50</p>\r\n\
        --XX--\r\n";

    const PLAIN_MESSAGE: &str = "From: friend@example.com\r\n\
        Date: Mon, 15 Jan 2024 09:00:00 +0000\r\n\
        Message-Id: <zzz@example.com>\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        Lunch <today>?\r\n";

    fn mailbox() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.eml"), PLAIN_MESSAGE).unwrap();
        fs::write(dir.path().join("a.eml"), HTML_MESSAGE).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        dir
    }

    #[test]
    fn test_message_id_local() {
        assert_eq!(message_id_local("<abc123@rides.example>"), "abc123");
        assert_eq!(message_id_local("  plain  "), "plain");
        assert_eq!(message_id_local("<a/b@host>"), "a_b");
    }

    #[test]
    fn test_parse_search_date() {
        assert_eq!(
            SearchRange::parse_date("08-Jan-2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
        );
        assert!(SearchRange::parse_date("2024-01-08").is_err());
    }

    #[test]
    fn test_range_bounds() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let range = SearchRange::new(Some(d(8)), Some(d(15)));
        assert!(range.contains(d(8)));
        assert!(range.contains(d(14)));
        assert!(!range.contains(d(15)));
        assert!(!range.contains(d(7)));
        assert!(SearchRange::default().contains(d(1)));
    }

    #[test]
    fn test_fetch_all_sorted() {
        let dir = mailbox();
        let docs = MailboxSource::new(dir.path()).fetch().unwrap();

        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["abc123", "zzz"]);
        assert_eq!(docs[0].format, BodyFormat::Html);
        assert!(docs[0].body.contains("Total CA$9.50"));
        assert_eq!(docs[1].format, BodyFormat::Plain);
    }

    #[test]
    fn test_sender_and_range_filters() {
        let dir = mailbox();
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();

        let by_sender = MailboxSource::new(dir.path())
            .with_sender("noreply@rides.example")
            .fetch()
            .unwrap();
        assert_eq!(by_sender.len(), 1);
        assert_eq!(by_sender[0].id, "abc123");

        let by_date = MailboxSource::new(dir.path())
            .with_range(SearchRange::new(Some(d(11)), None))
            .fetch()
            .unwrap();
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_date[0].id, "zzz");
    }

    #[test]
    fn test_body_text_filters() {
        let dir = mailbox();
        let docs = MailboxSource::new(dir.path())
            .with_required_text(vec!["Total".to_string()])
            .fetch()
            .unwrap();
        assert_eq!(docs.len(), 1);

        let docs = MailboxSource::new(dir.path())
            .with_excluded_text(vec!["Lunch".to_string()])
            .fetch()
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "abc123");
    }

    #[test]
    fn test_save_documents() {
        let mailbox = mailbox();
        let out = tempfile::tempdir().unwrap();
        let docs = MailboxSource::new(mailbox.path()).fetch().unwrap();

        let html = docs[0].save(out.path(), "fareweek").unwrap();
        assert_eq!(html, out.path().join("fareweek_abc123.html"));
        assert!(fs::read_to_string(&html).unwrap().contains("CA$9.50"));

        let plain = docs[1].save(out.path(), "fareweek").unwrap();
        let content = fs::read_to_string(plain).unwrap();
        assert!(content.starts_with("<html><body><pre>"));
        assert!(content.contains("Lunch &lt;today&gt;?"));
    }
}
