//! Receipt batch processing: parse, check, group and emit.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{FareweekError, Result};
use crate::models::trip::TripRecord;
use crate::receipt::TripParser;
use crate::report::{ReportEmitter, group_weeks};

/// Parse every receipt in order. The first failure aborts the batch.
pub fn parse_receipts<P: AsRef<Path>>(paths: &[P], parser: &TripParser) -> Result<Vec<TripRecord>> {
    paths
        .iter()
        .map(|path| parser.parse_receipt(path.as_ref()))
        .collect()
}

/// Reject batches where two trips share a date and time.
pub fn ensure_unique(trips: &[TripRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(trips.len());
    for trip in trips {
        if !seen.insert(trip.key()) {
            return Err(FareweekError::DuplicateTrip {
                date: trip.date,
                time: trip.time,
            });
        }
    }
    Ok(())
}

/// Process a batch of receipts into weekly reports.
///
/// Returns the report directories in week order.
pub fn run<P: AsRef<Path>>(
    paths: &[P],
    parser: &TripParser,
    emitter: &ReportEmitter<'_>,
    with_address: bool,
) -> Result<Vec<PathBuf>> {
    let trips = parse_receipts(paths, parser)?;
    emit_trips(trips, emitter, with_address)
}

/// Check, group and emit already parsed trips.
pub fn emit_trips(
    trips: Vec<TripRecord>,
    emitter: &ReportEmitter<'_>,
    with_address: bool,
) -> Result<Vec<PathBuf>> {
    ensure_unique(&trips)?;
    if trips.is_empty() {
        warn!("No trips to report");
    }

    let buckets = group_weeks(trips);
    info!("{} week(s) to report", buckets.len());

    buckets
        .into_iter()
        .map(|bucket| emitter.emit_bucket(bucket, with_address))
        .collect()
}
