//! Fill the expense form for one week and gather its receipts.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, info, warn};
use umya_spreadsheet::{Spreadsheet, Worksheet, reader, writer};

use super::layout::ReportLayout;
use super::week::{WeekBucket, daily_totals, week_end};
use super::{date_full, document_name, document_stem, week_label};
use crate::error::ReportError;
use crate::models::config::{self, ConfigLookup};
use crate::models::trip::TripRecord;

/// Writes weekly expense reports from a spreadsheet template.
///
/// Each call reads the template once and writes the filled copy into a new
/// `<prefix>_<MMDD>-<MMDD>` directory under the output root.
pub struct ReportEmitter<'a> {
    template: PathBuf,
    layout: ReportLayout,
    output_root: PathBuf,
    config: &'a dyn ConfigLookup,
}

impl<'a> ReportEmitter<'a> {
    /// Create an emitter writing into the current directory.
    pub fn new(template: impl Into<PathBuf>, config: &'a dyn ConfigLookup) -> Self {
        Self {
            template: template.into(),
            layout: ReportLayout::default(),
            output_root: PathBuf::from("."),
            config,
        }
    }

    /// Use a custom cell layout.
    pub fn with_layout(mut self, layout: ReportLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Create output directories under `root`.
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    /// Emit the report of one bucket.
    pub fn emit_bucket(&self, bucket: WeekBucket, with_address: bool) -> crate::Result<PathBuf> {
        self.emit(bucket.start, bucket.trips, with_address)
    }

    /// Fill the template for the week starting `start` and move every
    /// trip's document into the output directory.
    pub fn emit(
        &self,
        start: NaiveDate,
        trips: Vec<TripRecord>,
        with_address: bool,
    ) -> crate::Result<PathBuf> {
        info!("wkstart: {}, {} trips", start, trips.len());

        let mut book = reader::xlsx::read(&self.template).map_err(|e| ReportError::Template {
            path: self.template.display().to_string(),
            reason: e.to_string(),
        })?;
        self.fill(&mut book, start, &trips, with_address)?;

        let label = week_label(start);
        let dir = self
            .output_root
            .join(format!("{}_{}", self.layout.output_prefix, label));
        fs::create_dir_all(&dir).map_err(ReportError::from)?;

        let report = dir.join(format!("{}.xlsx", label));
        writer::xlsx::write(&book, &report).map_err(|e| ReportError::Write {
            path: report.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!("Wrote report to {}", report.display());

        let mut taken = HashSet::new();
        for trip in &trips {
            let Some(document) = trip.document() else {
                warn!("No document to attach for trip on {} {}", trip.date, trip.time);
                continue;
            };
            let name = unique_name(trip, document, &mut taken);
            move_file(document, &dir.join(&name)).map_err(ReportError::from)?;
            debug!("Moved {} to {}", document.display(), name);
        }

        Ok(dir)
    }

    fn fill(
        &self,
        book: &mut Spreadsheet,
        start: NaiveDate,
        trips: &[TripRecord],
        with_address: bool,
    ) -> Result<(), ReportError> {
        let layout = &self.layout;
        let totals = daily_totals(start, trips);
        let customer = self.config.get_or(config::NAME, "");
        let location = self.config.get_or(config::OFFICE, "");

        let sheet = book.get_active_sheet_mut();
        for (day, total) in totals.iter().enumerate() {
            let date = start + Duration::days(day as i64);
            set_text(sheet, &layout.day_cell(day, layout.date_row)?, &date_full(date));
            set_text(sheet, &layout.day_cell(day, layout.customer_row)?, &customer);
            set_text(sheet, &layout.day_cell(day, layout.location_row)?, &location);
            if !total.is_zero() {
                let cell = layout.day_cell(day, layout.fare_row)?;
                sheet
                    .get_cell_mut(cell.as_str())
                    .set_value_number(total.to_f64().unwrap_or_default());
            }
        }

        set_text(sheet, &layout.week_end_cell, &date_full(week_end(start)));

        let mut personal = layout.personal_cells.clone();
        if with_address {
            personal.extend(layout.address_cells.iter().cloned());
        }
        for (key, cell) in &personal {
            set_text(sheet, cell, &self.config.get_or(key, ""));
        }

        Ok(())
    }
}

fn set_text(sheet: &mut Worksheet, cell: &str, value: &str) {
    sheet.get_cell_mut(cell).set_value_string(value);
}

/// Pick the attachment name for a trip, avoiding names already taken in
/// this report. Trips sharing a clock hour get the minutes spelled out.
fn unique_name(trip: &TripRecord, document: &Path, taken: &mut HashSet<String>) -> String {
    let extension = document
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("pdf")
        .to_lowercase();

    let hourly = document_name(trip.date, trip.time, false, &extension);
    if taken.insert(hourly.clone()) {
        return hourly;
    }

    let mut name = document_name(trip.date, trip.time, true, &extension);
    let mut n = 2;
    while !taken.insert(name.clone()) {
        name = format!("{}-{}.{}", document_stem(trip.date, trip.time, true), n, extension);
        n += 1;
    }
    name
}

/// Move a file, copying across filesystems when a rename is not possible.
fn move_file(src: &Path, dst: &Path) -> std::io::Result<()> {
    if fs::rename(src, dst).is_ok() {
        return Ok(());
    }
    fs::copy(src, dst)?;
    fs::remove_file(src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn trip(date: NaiveDate, h: u32, m: u32, document: &str) -> TripRecord {
        TripRecord::new(
            date,
            NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            Decimal::from_str("1.00").unwrap(),
            document,
        )
    }

    #[test]
    fn test_unique_name_same_hour() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let mut taken = HashSet::new();
        let a = unique_name(&trip(date, 14, 15, "a.pdf"), Path::new("a.pdf"), &mut taken);
        let b = unique_name(&trip(date, 14, 45, "b.pdf"), Path::new("b.pdf"), &mut taken);
        let c = unique_name(&trip(date, 9, 0, "c.PDF"), Path::new("c.PDF"), &mut taken);

        assert_eq!(a, "0110-02PM.pdf");
        assert_eq!(b, "0110-0245PM.pdf");
        assert_eq!(c, "0110-09AM.pdf");
    }

    #[test]
    fn test_missing_template_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let config: HashMap<String, String> = HashMap::new();
        let emitter = ReportEmitter::new(dir.path().join("missing.xlsx"), &config)
            .with_output_root(dir.path());

        let err = emitter
            .emit(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(), Vec::new(), false)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::FareweekError::Report(ReportError::Template { .. })
        ));
    }

    #[test]
    fn test_move_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.pdf");
        let dst = dir.path().join("b.pdf");
        fs::write(&src, b"x").unwrap();

        move_file(&src, &dst).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"x");
    }
}
