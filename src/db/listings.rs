use crate::domain::changes::ChangeFlags;
use crate::domain::listing::{IncomingRecord, ListingRecord};
use crate::errors::SyncError;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;

/// One listing eligible for the revision export.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviseCandidate {
    pub marketplace_id: String,
    pub price: f64,
    pub shipping: f64,
}

fn record_from_row(row: &Row) -> rusqlite::Result<ListingRecord> {
    Ok(ListingRecord {
        id: row.get(0)?,
        marketplace_id: row.get(1)?,
        listing_id: row.get(2)?,
        title: row.get(3)?,
        quantity: row.get(4)?,
        units_sold: row.get(5)?,
        price: row.get(6)?,
        shipping: row.get(7)?,
        closed: row.get(8)?,
        changes: ChangeFlags::from_bits(row.get(9)?),
        first_seen_at: row.get(10)?,
        last_synced_at: row.get(11)?,
    })
}

/// All internal row ids currently in the table. At the start of a sync this
/// is the candidate set for closure; matched rows get removed as the feed is
/// walked.
pub fn load_all_ids(conn: &Connection) -> Result<HashSet<i64>, SyncError> {
    let mut stmt = conn
        .prepare("SELECT id FROM listings")
        .map_err(|e| SyncError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| row.get::<_, i64>(0))
        .map_err(|e| SyncError::DbError(e.to_string()))?;

    let mut ids = HashSet::new();
    for r in rows {
        ids.insert(r.map_err(|e| SyncError::DbError(e.to_string()))?);
    }
    Ok(ids)
}

pub fn find_by_listing_id(
    conn: &Connection,
    listing_id: &str,
) -> Result<Option<ListingRecord>, SyncError> {
    conn.query_row(
        r#"
        SELECT id, marketplace_id, listing_id, title, quantity, units_sold,
               price, shipping, closed, changes, first_seen_at, last_synced_at
        FROM listings
        WHERE listing_id = ?1
        "#,
        params![listing_id],
        record_from_row,
    )
    .optional()
    .map_err(|e| SyncError::DbError(e.to_string()))
}

/// First sighting of a listing id: fresh row, empty change bitmask.
/// A duplicate listing id here is a real constraint violation and propagates.
pub fn insert_from_feed(
    conn: &Connection,
    rec: &IncomingRecord,
    now: NaiveDateTime,
) -> Result<(), SyncError> {
    conn.execute(
        r#"
        INSERT INTO listings (
            listing_id, title, quantity, units_sold, price, shipping,
            closed, changes, first_seen_at, last_synced_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 0, ?7, ?7)
        "#,
        params![
            rec.listing_id,
            rec.title,
            rec.quantity,
            rec.units_sold,
            rec.price,
            rec.shipping,
            now,
        ],
    )
    .map_err(|e| SyncError::DbError(e.to_string()))?;
    Ok(())
}

/// Overwrite the feed-carried fields on a matched row. `closed` is left
/// untouched: a reappearing closed listing stays closed until an explicit
/// reset (see reset_all_closed).
pub fn update_from_feed(
    conn: &Connection,
    id: i64,
    rec: &IncomingRecord,
    changes: ChangeFlags,
    now: NaiveDateTime,
) -> Result<(), SyncError> {
    conn.execute(
        r#"
        UPDATE listings SET
            listing_id = ?2,
            title = ?3,
            quantity = ?4,
            units_sold = ?5,
            price = ?6,
            shipping = ?7,
            changes = ?8,
            last_synced_at = ?9
        WHERE id = ?1
        "#,
        params![
            id,
            rec.listing_id,
            rec.title,
            rec.quantity,
            rec.units_sold,
            rec.price,
            rec.shipping,
            changes.bits(),
            now,
        ],
    )
    .map_err(|e| SyncError::DbError(e.to_string()))?;
    Ok(())
}

pub fn mark_closed(conn: &Connection, id: i64) -> Result<(), SyncError> {
    conn.execute("UPDATE listings SET closed = 1 WHERE id = ?1", params![id])
        .map_err(|e| SyncError::DbError(e.to_string()))?;
    Ok(())
}

/// Whole-table reset of the closed flag. Idempotent.
pub fn reset_all_closed(conn: &Connection) -> Result<usize, SyncError> {
    conn.execute("UPDATE listings SET closed = 0", [])
        .map_err(|e| SyncError::DbError(e.to_string()))
}

/// Whole-table reset of the change bitmask. Idempotent.
pub fn reset_all_changes(conn: &Connection) -> Result<usize, SyncError> {
    conn.execute("UPDATE listings SET changes = 0", [])
        .map_err(|e| SyncError::DbError(e.to_string()))
}

/// Listings that are live on the marketplace (non-empty marketplace_id) and
/// whose combined price exceeds the threshold.
pub fn revision_candidates(
    conn: &Connection,
    threshold: f64,
) -> Result<Vec<ReviseCandidate>, SyncError> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT marketplace_id, price, shipping
            FROM listings
            WHERE marketplace_id != '' AND price + shipping > ?1
            "#,
        )
        .map_err(|e| SyncError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![threshold], |row| {
            Ok(ReviseCandidate {
                marketplace_id: row.get(0)?,
                price: row.get(1)?,
                shipping: row.get(2)?,
            })
        })
        .map_err(|e| SyncError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| SyncError::DbError(e.to_string()))?);
    }
    Ok(out)
}
