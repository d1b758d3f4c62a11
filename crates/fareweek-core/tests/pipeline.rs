//! End-to-end runs of the receipt pipeline over temporary directories.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use umya_spreadsheet::{reader, writer};

use fareweek_core::error::FareweekError;
use fareweek_core::models::config::{ADDRESS_LINE1, MANAGER, NAME, OFFICE};
use fareweek_core::pipeline;
use fareweek_core::{ReportEmitter, TripParser, TripRecord};

fn receipt(dir: &Path, name: &str, date: &str, short: &str, times: &[&str], total: &str) -> PathBuf {
    let stamps: String = times
        .iter()
        .map(|t| format!("<tr><td>{} {}</td></tr>", short, t))
        .collect();
    let html = format!(
        "<html><head><style>p {{ color: red }}</style></head><body>\
         <h2>Thanks for riding</h2><p>{}</p>\
         <table><tr><td>Total</td><td>CA${}</td></tr>{}</table>\
         </body></html>\n",
        date, total, stamps
    );
    let path = dir.join(name);
    fs::write(&path, html).unwrap();
    path
}

fn template(dir: &Path) -> PathBuf {
    let path = dir.join("template.xlsx");
    let book = umya_spreadsheet::new_file();
    writer::xlsx::write(&book, &path).unwrap();
    path
}

fn config() -> HashMap<String, String> {
    HashMap::from([
        (NAME.to_string(), "Pat Doe".to_string()),
        (OFFICE.to_string(), "Main Office".to_string()),
        (MANAGER.to_string(), "Sam Lee".to_string()),
        (ADDRESS_LINE1.to_string(), "1 Main St".to_string()),
    ])
}

fn cell(report: &Path, coordinate: &str) -> String {
    let book = reader::xlsx::read(report).unwrap();
    book.get_active_sheet().get_value(coordinate)
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_two_weeks_of_receipts() {
    let inbox = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let template = template(inbox.path());

    let paths = vec![
        receipt(inbox.path(), "a.html", "January 14, 2024", "1/14/24", &["7:05 PM"], "7.00"),
        receipt(inbox.path(), "b.html", "January 10, 2024", "1/10/24", &["5:40 PM", "5:20 PM"], "20.00"),
        receipt(inbox.path(), "c.html", "January 8, 2024", "1/8/24", &["9:15 AM"], "12.34"),
        receipt(inbox.path(), "d.html", "January 10, 2024", "1/10/24", &["8:00 AM"], "5.50"),
    ];

    let config = config();
    let emitter = ReportEmitter::new(&template, &config).with_output_root(out.path());
    let dirs = pipeline::run(&paths, &TripParser::new(), &emitter, false).unwrap();

    assert_eq!(
        dirs,
        vec![
            out.path().join("fareweek_0107-0113"),
            out.path().join("fareweek_0114-0120"),
        ]
    );

    assert_eq!(
        file_names(&dirs[0]),
        vec!["0107-0113.xlsx", "0108-09AM.pdf", "0110-05PM.pdf", "0110-08AM.pdf"]
    );
    assert_eq!(file_names(&dirs[1]), vec!["0114-0120.xlsx", "0114-07PM.pdf"]);

    let report = dirs[0].join("0107-0113.xlsx");
    assert_eq!(cell(&report, "B10"), "01-07-2024");
    assert_eq!(cell(&report, "N10"), "01-13-2024");
    assert_eq!(cell(&report, "D11"), "Pat Doe");
    assert_eq!(cell(&report, "D12"), "Main Office");
    assert_eq!(cell(&report, "B27"), "");
    assert_eq!(cell(&report, "D27"), "12.34");
    assert_eq!(cell(&report, "H27"), "25.5");
    assert_eq!(cell(&report, "N2"), "01-13-2024");
    assert_eq!(cell(&report, "N3"), "Pat Doe");
    assert_eq!(cell(&report, "N4"), "");
    assert_eq!(cell(&report, "N5"), "Sam Lee");
    assert_eq!(cell(&report, "N6"), "");

    // Rendered PDFs were moved, sources stay.
    assert!(!inbox.path().join("c.pdf").exists());
    assert!(inbox.path().join("c.html").exists());
}

#[test]
fn test_address_written_on_request() {
    let inbox = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let template = template(inbox.path());
    let paths = vec![receipt(inbox.path(), "a.html", "January 8, 2024", "1/8/24", &["9:15 AM"], "12.34")];

    let config = config();
    let emitter = ReportEmitter::new(&template, &config).with_output_root(out.path());
    let dirs = pipeline::run(&paths, &TripParser::new(), &emitter, true).unwrap();

    let report = dirs[0].join("0107-0113.xlsx");
    assert_eq!(cell(&report, "N6"), "1 Main St");
    assert_eq!(cell(&report, "N7"), "");
}

#[test]
fn test_duplicate_trips_abort_before_output() {
    let inbox = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let template = template(inbox.path());
    let paths = vec![
        receipt(inbox.path(), "a.html", "January 8, 2024", "1/8/24", &["9:15 AM"], "12.34"),
        receipt(inbox.path(), "b.html", "January 8, 2024", "1/8/24", &["9:15 AM"], "3.00"),
    ];

    let config = config();
    let emitter = ReportEmitter::new(&template, &config).with_output_root(out.path());
    let err = pipeline::run(&paths, &TripParser::new(), &emitter, false).unwrap_err();

    assert!(matches!(err, FareweekError::DuplicateTrip { .. }));
    assert!(file_names(out.path()).is_empty());
}

#[test]
fn test_ambiguous_date_aborts_batch() {
    let inbox = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let template = template(inbox.path());
    let paths = vec![receipt(
        inbox.path(),
        "a.html",
        "January 8, 2024 or January 9, 2024",
        "1/8/24",
        &["9:15 AM"],
        "12.34",
    )];

    let config = config();
    let emitter = ReportEmitter::new(&template, &config).with_output_root(out.path());
    let err = pipeline::run(&paths, &TripParser::new(), &emitter, false).unwrap_err();

    assert!(matches!(err, FareweekError::Extraction(_)));
    assert!(file_names(out.path()).is_empty());
}

#[test]
fn test_emitting_documentless_week_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let template = template(dir.path());
    let config = config();
    let emitter = ReportEmitter::new(&template, &config).with_output_root(dir.path());

    let start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
    let trips = || {
        vec![TripRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            Decimal::new(875, 2),
            "",
        )]
    };

    let first = emitter.emit(start, trips(), false).unwrap();
    let report = first.join("0107-0113.xlsx");
    let before = cell(&report, "F27");

    let second = emitter.emit(start, trips(), false).unwrap();
    assert_eq!(first, second);
    assert_eq!(cell(&report, "F27"), before);
    assert_eq!(before, "8.75");
    assert_eq!(file_names(&first), vec!["0107-0113.xlsx"]);
}
