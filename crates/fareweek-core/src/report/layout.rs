//! Cell layout of the expense form template.
//!
//! Day columns are addressed with single letters only: day `i` lives in
//! column `base + stride * i`, looked up in a 26-entry table. Offsets past
//! `Z` are rejected rather than rolled over to `AA`, so the layout must
//! keep all seven day columns within `A..=Z`.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::models::config;

/// Column letters addressable by the layout.
const COLUMN_LETTERS: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Letter of the zero-based column `index`, if it is within `A..=Z`.
pub fn column_letter(index: usize) -> Option<char> {
    COLUMN_LETTERS.get(index).copied()
}

/// Zero-based index of a column letter.
pub fn column_index(letter: char) -> Option<usize> {
    COLUMN_LETTERS
        .iter()
        .position(|c| *c == letter.to_ascii_uppercase())
}

/// Fixed cell positions of the expense form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLayout {
    /// Column of Sunday.
    pub base_column: char,

    /// Columns between consecutive days.
    pub column_stride: usize,

    /// Row holding each day's date.
    pub date_row: u32,

    /// Row holding the customer name.
    pub customer_row: u32,

    /// Row holding the office location.
    pub location_row: u32,

    /// Row holding each day's fare total.
    pub fare_row: u32,

    /// Cell holding the week-end date.
    pub week_end_cell: String,

    /// Personal settings keys and the cells they fill.
    pub personal_cells: Vec<(String, String)>,

    /// Address settings keys and cells, filled only when requested.
    pub address_cells: Vec<(String, String)>,

    /// Prefix of output directory names.
    pub output_prefix: String,
}

impl Default for ReportLayout {
    fn default() -> Self {
        let pair = |key: &str, cell: &str| (key.to_string(), cell.to_string());
        Self {
            base_column: 'B',
            column_stride: 2,
            date_row: 10,
            customer_row: 11,
            location_row: 12,
            fare_row: 27,
            week_end_cell: "N2".to_string(),
            personal_cells: vec![
                pair(config::NAME, "N3"),
                pair(config::DEPT, "N4"),
                pair(config::MANAGER, "N5"),
            ],
            address_cells: vec![
                pair(config::ADDRESS_LINE1, "N6"),
                pair(config::ADDRESS_LINE2, "N7"),
            ],
            output_prefix: "fareweek".to_string(),
        }
    }
}

impl ReportLayout {
    /// Column letter of the day `weekday` (Sunday = 0).
    pub fn day_column(&self, weekday: usize) -> Result<char, ReportError> {
        let offset = column_index(self.base_column).unwrap_or(COLUMN_LETTERS.len())
            + self.column_stride * weekday;
        column_letter(offset).ok_or(ReportError::ColumnOutOfRange(offset))
    }

    /// Cell address of `row` in the column of `weekday`.
    pub fn day_cell(&self, weekday: usize, row: u32) -> Result<String, ReportError> {
        Ok(format!("{}{}", self.day_column(weekday)?, row))
    }
}
