//! Sending report directories by mail.

use std::fs;
use std::path::{Path, PathBuf};

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, warn};

use super::Result;
use crate::error::MailError;

/// Subject prefix of report messages.
pub const SUBJECT_PREFIX: &str = "[Ride Expense Report]";

/// SMTP submission port.
pub const SUBMISSION_PORT: u16 = 587;

const OCTET_STREAM: &str = "application/octet-stream";

/// A report message ready to send.
#[derive(Debug, Clone)]
pub struct ComposedReport {
    pub subject: String,
    pub body: String,
    /// Attached file names, in attachment order.
    pub attachments: Vec<String>,
    pub message: Message,
}

/// Subject for a report directory named `<prefix>_<MMDD>-<MMDD>`.
pub fn report_subject(dir: &Path, prefix: &str) -> String {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let label = match name.strip_prefix(prefix).and_then(|rest| rest.strip_prefix('_')) {
        Some(label) => label,
        None => {
            warn!(
                "{} does not look like a directory created by fareweek",
                dir.display()
            );
            name.split_once('_').map_or(name, |(_, rest)| rest)
        }
    };

    match label.split_once('-') {
        Some((start, end)) => format!("{} {} to {}", SUBJECT_PREFIX, start, end),
        None => format!("{} {}", SUBJECT_PREFIX, label),
    }
}

/// Plain-text body for a report with `trips` receipts.
pub fn report_body(trips: usize) -> String {
    let (trip_word, receipt_word) = if trips == 1 {
        ("trip", "receipt")
    } else {
        ("trips", "receipts")
    };
    format!(
        "I took {} {} this week.\n\n\
         My {} and expense form are attached. If you need anything else, please let me know.\n",
        trips, trip_word, receipt_word
    )
}

/// Guess a MIME type from the file extension.
pub fn guess_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "html" | "htm" => "text/html",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => OCTET_STREAM,
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Build the report message for `dir`, attaching every regular file in it.
pub fn compose_report(dir: &Path, from: &str, to: &str, prefix: &str) -> Result<ComposedReport> {
    let from: Mailbox = from
        .parse()
        .map_err(|e| MailError::Compose(format!("invalid sender '{}': {}", from, e)))?;
    let to: Mailbox = to
        .parse()
        .map_err(|e| MailError::Compose(format!("invalid recipient '{}': {}", to, e)))?;

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let subject = report_subject(dir, prefix);
    let body = report_body(files.iter().filter(|p| is_pdf(p)).count());

    let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(body.clone()));
    let mut attachments = Vec::with_capacity(files.len());
    for path in &files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let content_type = ContentType::parse(guess_content_type(path))
            .map_err(|e| MailError::Compose(e.to_string()))?;
        debug!("Attaching {} ({})", name, guess_content_type(path));

        multipart = multipart.singlepart(Attachment::new(name.clone()).body(fs::read(path)?, content_type));
        attachments.push(name);
    }

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(subject.clone())
        .multipart(multipart)
        .map_err(|e| MailError::Compose(e.to_string()))?;

    Ok(ComposedReport {
        subject,
        body,
        attachments,
        message,
    })
}

/// Delivers report messages over SMTP submission with STARTTLS.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    host: String,
    username: String,
    password: String,
    port: u16,
    dry_run: bool,
}

impl SmtpMailer {
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            port: SUBMISSION_PORT,
            dry_run: false,
        }
    }

    /// Compose and log messages without connecting.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Mail the report directory `dir` to `to` from the login address.
    pub async fn send_dir(&self, dir: &Path, to: &str, prefix: &str) -> Result<ComposedReport> {
        info!("Sending {} to {} via {}", dir.display(), to, self.username);
        let report = compose_report(dir, &self.username, to, prefix)?;
        for name in &report.attachments {
            info!("{}", name);
        }
        self.send(&report).await?;
        Ok(report)
    }

    /// Deliver a composed report.
    pub async fn send(&self, report: &ComposedReport) -> Result<()> {
        if self.dry_run {
            info!("dry run, not sending '{}'", report.subject);
            return Ok(());
        }

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(self.port)
            .credentials(Credentials::new(self.username.clone(), self.password.clone()))
            .build();

        transport.send(report.message.clone()).await.map_err(|e| {
            if e.status().is_some_and(|code| code.to_string() == "535") {
                self.login_refused()
            } else {
                MailError::Transport(e.to_string())
            }
        })?;

        info!("Sent '{}'", report.subject);
        Ok(())
    }

    fn login_refused(&self) -> MailError {
        MailError::Auth(self.username.clone())
    }
}
