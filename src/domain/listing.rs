use chrono::NaiveDateTime;

use crate::domain::changes::ChangeFlags;

/// A persisted marketplace listing as stored in the `listings` table.
///
/// Rows are never deleted: a listing that disappears from a snapshot is
/// flagged `closed` instead, so the history of everything ever listed
/// survives across syncs.
#[derive(Debug, Clone)]
pub struct ListingRecord {
    pub id: i64,
    /// External marketplace item id; empty until the listing goes live there.
    pub marketplace_id: String,
    /// Stable export-side identifier, unique across all rows. The
    /// reconciliation key.
    pub listing_id: String,
    pub title: String,
    pub quantity: i64,
    pub units_sold: i64,
    pub price: f64,
    pub shipping: f64,
    pub closed: bool,
    pub changes: ChangeFlags,
    pub first_seen_at: Option<NaiveDateTime>,
    pub last_synced_at: Option<NaiveDateTime>,
}

/// One parsed data row from the marketplace export, before reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingRecord {
    pub listing_id: String,
    pub title: String,
    pub quantity: i64,
    pub units_sold: i64,
    pub price: f64,
    pub shipping: f64,
}
