use crate::db::connection::{init_db, Database};
use crate::db::listings;
use crate::domain::listing::{IncomingRecord, ListingRecord};
use crate::errors::SyncError;
use crate::ingest::rows::RowRejection;
use crate::sync::{reconcile, SyncOutcome};
use rusqlite::params;
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns a fresh test database using the production schema.
///
/// The connection slot is thread-local, so each test should create exactly
/// one Database.
pub fn make_db(tag: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "feedsync_{tag}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db).expect("Failed to initialize DB");
    db
}

pub fn incoming(listing_id: &str, price: f64, shipping: f64, units_sold: i64) -> IncomingRecord {
    IncomingRecord {
        listing_id: listing_id.to_string(),
        title: format!("Item {listing_id}"),
        quantity: 1,
        units_sold,
        price,
        shipping,
    }
}

pub fn rejection(line: u64, listing_id: &str, field: &'static str) -> RowRejection {
    RowRejection {
        line,
        listing_id: listing_id.to_string(),
        field,
        reason: "invalid digit found in string".to_string(),
    }
}

/// Run one reconciliation batch inside a committed transaction, the same way
/// run_sync does.
pub fn run_rows(
    db: &Database,
    rows: Vec<Result<IncomingRecord, RowRejection>>,
) -> SyncOutcome {
    db.with_conn(|conn| {
        let tx = conn
            .transaction()
            .map_err(|e| SyncError::DbError(e.to_string()))?;
        let outcome = reconcile(&tx, rows)?;
        tx.commit().map_err(|e| SyncError::DbError(e.to_string()))?;
        Ok(outcome)
    })
    .expect("reconcile run failed")
}

pub fn get(db: &Database, listing_id: &str) -> Option<ListingRecord> {
    db.with_conn(|conn| listings::find_by_listing_id(conn, listing_id))
        .expect("lookup failed")
}

pub fn set_marketplace_id(db: &Database, listing_id: &str, marketplace_id: &str) {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE listings SET marketplace_id = ?1 WHERE listing_id = ?2",
            params![marketplace_id, listing_id],
        )
        .map_err(|e| SyncError::DbError(e.to_string()))?;
        Ok(())
    })
    .expect("update failed");
}
