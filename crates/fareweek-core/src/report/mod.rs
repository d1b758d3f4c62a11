//! Weekly report generation.
//!
//! Trips are bucketed into Sunday-to-Saturday weeks and each week is written
//! as a filled copy of the expense form alongside its receipt documents.

mod emitter;
pub mod layout;
pub mod week;

pub use emitter::ReportEmitter;
pub use layout::ReportLayout;
pub use week::{WeekBucket, daily_totals, group_weeks, week_end, week_start, weekday_index};

use chrono::{NaiveDate, NaiveTime};

/// Date as written into the form, `MM-DD-YYYY`.
pub fn date_full(date: NaiveDate) -> String {
    date.format("%m-%d-%Y").to_string()
}

/// Date as used in directory names, `MMDD`.
pub fn date_short(date: NaiveDate) -> String {
    date.format("%m%d").to_string()
}

/// `MMDD-MMDD` label of the week starting `start`.
pub fn week_label(start: NaiveDate) -> String {
    format!("{}-{}", date_short(start), date_short(week_end(start)))
}

/// Base name of a trip document, `MMDD-HHAM` or with minutes `MMDD-HHMMAM`.
pub fn document_stem(date: NaiveDate, time: NaiveTime, with_minutes: bool) -> String {
    let clock = if with_minutes { "%I%M%p" } else { "%I%p" };
    format!("{}-{}", date_short(date), time.format(clock))
}

/// File name of a trip document with the given extension.
pub fn document_name(date: NaiveDate, time: NaiveTime, with_minutes: bool, extension: &str) -> String {
    format!("{}.{}", document_stem(date, time, with_minutes), extension)
}
