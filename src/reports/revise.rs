// src/reports/revise.rs
//
// Secondary export: listings whose combined price crosses the free-shipping
// threshold get re-listed at ceil(price + shipping). Pure read + emit, the
// store is never mutated here.

use std::path::Path;

use crate::db::connection::Database;
use crate::db::listings::{self, ReviseCandidate};
use crate::errors::SyncError;

/// Marketplace bulk-upload smart header. The upload tool keys the whole file
/// off this exact string, so it goes out verbatim.
pub const ACTION_HEADER: &str =
    "*Action(SiteID=Italy|Country=IT|Currency=EUR|Version=745|CC=UTF-8)";

pub const REVISE_ACTION: &str = "Revise";

/// Combined price above which a listing qualifies for revision.
pub const REVISE_PRICE_THRESHOLD: f64 = 30.0;

/// Write the revision file and return how many listings qualified.
pub fn export_revise_csv(db: &Database, output: &Path) -> Result<usize, SyncError> {
    let candidates =
        db.with_conn(|conn| listings::revision_candidates(conn, REVISE_PRICE_THRESHOLD))?;
    write_revise_csv(&candidates, output)?;
    Ok(candidates.len())
}

/// The upload format is semicolon-delimited with every field quoted.
pub fn write_revise_csv(
    candidates: &[ReviseCandidate],
    output: &Path,
) -> Result<(), SyncError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .quote_style(csv::QuoteStyle::Always)
        .from_path(output)
        .map_err(|e| SyncError::CsvError(format!("Cannot open {}: {e}", output.display())))?;

    wtr.write_record([ACTION_HEADER, "ItemID", "StartPrice"])
        .map_err(|e| SyncError::CsvError(e.to_string()))?;

    for c in candidates {
        let start_price = (c.price + c.shipping).ceil() as i64;
        let start_price = start_price.to_string();
        wtr.write_record([REVISE_ACTION, c.marketplace_id.as_str(), start_price.as_str()])
            .map_err(|e| SyncError::CsvError(e.to_string()))?;
    }

    wtr.flush()
        .map_err(|e| SyncError::CsvError(e.to_string()))?;
    Ok(())
}
