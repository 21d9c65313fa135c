use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::{info, warn};

use crate::db::connection::Database;
use crate::db::listings;
use crate::domain::changes::ChangeFlags;
use crate::domain::listing::IncomingRecord;
use crate::errors::SyncError;
use crate::ingest::rows::RowRejection;
use crate::ingest::{clean_feed, discover_input_file, FEED_V1};

/// Where rejected rows get dumped for operator review.
const REJECTED_ROWS_FILE: &str = "rejected_rows.json";

#[derive(Debug, Default, Serialize)]
pub struct SyncOutcome {
    pub created: u64,
    pub updated: u64,
    pub closed: u64,
    pub rejected: Vec<RowRejection>,
}

/// Diff one snapshot of the feed against the persisted listings.
///
/// Every row id loaded up front is a closure candidate; rows matched by the
/// feed drop out of that set, and whatever remains at the end was absent
/// from the snapshot and gets flagged closed. Change bits accumulate on
/// matched rows, feed-carried fields are overwritten unconditionally, and a
/// rejected row is skipped without disturbing its persisted record.
///
/// Runs against whatever connection it is handed; callers wrap it in a
/// transaction so the whole batch commits or none of it does.
pub fn reconcile<I>(conn: &Connection, rows: I) -> Result<SyncOutcome, SyncError>
where
    I: IntoIterator<Item = Result<IncomingRecord, RowRejection>>,
{
    let now = Utc::now().naive_utc();
    let mut closure_candidates = listings::load_all_ids(conn)?;
    let mut outcome = SyncOutcome::default();

    for row in rows {
        let rec = match row {
            Ok(rec) => rec,
            Err(rej) => {
                warn!(
                    line = rej.line,
                    listing_id = %rej.listing_id,
                    field = rej.field,
                    reason = %rej.reason,
                    "rejected feed row"
                );
                outcome.rejected.push(rej);
                continue;
            }
        };

        match listings::find_by_listing_id(conn, &rec.listing_id)? {
            Some(existing) => {
                // still listed, so not a closure candidate
                closure_candidates.remove(&existing.id);

                let mut changes = existing.changes;
                if existing.units_sold != rec.units_sold {
                    changes = changes.with(ChangeFlags::UNITS_SOLD);
                }
                if existing.price != rec.price {
                    changes = changes.with(ChangeFlags::PRICE);
                }
                if existing.shipping != rec.shipping {
                    changes = changes.with(ChangeFlags::SHIPPING);
                }

                listings::update_from_feed(conn, existing.id, &rec, changes, now)?;
                outcome.updated += 1;
            }
            None => {
                listings::insert_from_feed(conn, &rec, now)?;
                outcome.created += 1;
            }
        }
    }

    for id in &closure_candidates {
        listings::mark_closed(conn, *id)?;
    }
    outcome.closed = closure_candidates.len() as u64;

    Ok(outcome)
}

/// One full sync run: discover the feed, clean it, reconcile inside a single
/// transaction, and consume the input file only after the commit succeeds.
pub fn run_sync(db: &Database, input_dir: &Path) -> Result<SyncOutcome, SyncError> {
    let input_path = discover_input_file(input_dir)?;
    info!(path = %input_path.display(), "ingesting feed");
    let cleaned = clean_feed(&input_path)?;

    let outcome = db.with_conn(|conn| {
        let tx = conn
            .transaction()
            .map_err(|e| SyncError::DbError(e.to_string()))?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(cleaned.as_bytes());

        let rows = rdr.records().enumerate().map(|(i, rec)| {
            let line = (i + 2) as u64; // header is line 1
            match rec {
                Ok(rec) => FEED_V1.parse_row(line, &rec),
                Err(e) => Err(RowRejection {
                    line,
                    listing_id: String::new(),
                    field: "row",
                    reason: e.to_string(),
                }),
            }
        });

        let outcome = reconcile(&tx, rows)?;
        tx.commit().map_err(|e| SyncError::DbError(e.to_string()))?;
        Ok(outcome)
    })?;

    if !outcome.rejected.is_empty() {
        save_rejections_debug(&outcome.rejected, REJECTED_ROWS_FILE)
            .map_err(|e| SyncError::IoError(format!("Cannot write rejection report: {e}")))?;
        info!(
            count = outcome.rejected.len(),
            file = REJECTED_ROWS_FILE,
            "wrote rejection report"
        );
    }

    // the feed is consumed so the next delivery is the only file in the dir
    fs::remove_file(&input_path)
        .map_err(|e| SyncError::IoError(format!("Cannot remove consumed feed: {e}")))?;

    Ok(outcome)
}

fn save_rejections_debug(rejections: &[RowRejection], filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, rejections)?;
    Ok(())
}
