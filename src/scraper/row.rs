//! Parsing of rendered quote-table rows.

use crate::models::RawQuoteRow;
use tracing::debug;

/// Minimum number of cells a quotes row must carry.
pub const MIN_CELLS: usize = 7;

/// Cell index of the contract month label.
const CONTRACT_CELL: usize = 0;

/// Cell index of the settlement price.
const SETTLE_CELL: usize = 6;

/// Why a table row produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSkip {
    /// The row had fewer than [`MIN_CELLS`] cells.
    TooFewCells(usize),
    /// The settle cell did not contain a usable number.
    UnparsableSettle(String),
}

/// Keeps only ASCII digits and decimal points.
fn clean_number(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Parses one row given the inner text of each of its cells.
///
/// # Errors
/// Returns the reason the row was skipped.
pub fn parse_row<S: AsRef<str>>(cells: &[S]) -> Result<RawQuoteRow, RowSkip> {
    if cells.len() < MIN_CELLS {
        return Err(RowSkip::TooFewCells(cells.len()));
    }

    let contract = cells[CONTRACT_CELL].as_ref().trim().to_string();
    let settle_raw = cells[SETTLE_CELL].as_ref().trim();
    let settle = clean_number(settle_raw)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RowSkip::UnparsableSettle(settle_raw.to_string()))?;

    Ok(RawQuoteRow { contract, settle })
}

/// Parses every row, dropping the ones that fail.
#[must_use]
pub fn collect_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Vec<RawQuoteRow> {
    let mut skipped = 0usize;
    let parsed: Vec<RawQuoteRow> = rows
        .iter()
        .filter_map(|cells| match parse_row(cells) {
            Ok(row) => Some(row),
            Err(reason) => {
                debug!("Skipping quote row: {:?}", reason);
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        debug!("Parsed {} rows, skipped {}", parsed.len(), skipped);
    }
    parsed
}
