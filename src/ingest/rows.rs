use csv::StringRecord;
use serde::Serialize;

use crate::domain::listing::IncomingRecord;

/// Width of the currency marker the export prepends to money columns.
const CURRENCY_PREFIX_LEN: usize = 7;

/// One rejected feed row, kept for operator review. The batch continues
/// without it.
#[derive(Debug, Clone, Serialize)]
pub struct RowRejection {
    pub line: u64,
    pub listing_id: String,
    pub field: &'static str,
    pub reason: String,
}

/// Named column layout of one version of the marketplace export.
///
/// The export is positional with no negotiation, so each layout revision
/// gets its own schema constant instead of bare indexes at the use sites.
pub struct FeedSchema {
    pub version: &'static str,
    listing_id: usize,
    title: usize,
    quantity: usize,
    units_sold: usize,
    price: usize,
    shipping: usize,
}

/// The layout the marketplace has shipped since we started consuming it.
pub const FEED_V1: FeedSchema = FeedSchema {
    version: "v1",
    listing_id: 2,
    title: 3,
    quantity: 4,
    units_sold: 5,
    price: 8,
    shipping: 9,
};

impl FeedSchema {
    /// Shipping is the rightmost column this schema reads.
    fn min_columns(&self) -> usize {
        self.shipping + 1
    }

    /// Parse one data row, or explain exactly which field broke.
    pub fn parse_row(
        &self,
        line: u64,
        rec: &StringRecord,
    ) -> Result<IncomingRecord, RowRejection> {
        // listing id first so rejections can name the row even when a later
        // column is the broken one
        let listing_id = rec.get(self.listing_id).unwrap_or("").trim().to_string();

        if rec.len() < self.min_columns() {
            return Err(RowRejection {
                line,
                listing_id,
                field: "row",
                reason: format!(
                    "schema {} expects at least {} columns, got {}",
                    self.version,
                    self.min_columns(),
                    rec.len()
                ),
            });
        }
        if listing_id.is_empty() {
            return Err(RowRejection {
                line,
                listing_id,
                field: "listing_id",
                reason: "empty listing id".to_string(),
            });
        }

        let reject = |field: &'static str, reason: String| RowRejection {
            line,
            listing_id: listing_id.clone(),
            field,
            reason,
        };

        let quantity =
            parse_int(&rec[self.quantity]).map_err(|e| reject("quantity", e))?;
        let units_sold =
            parse_int(&rec[self.units_sold]).map_err(|e| reject("units_sold", e))?;
        let price = parse_money(&rec[self.price]).map_err(|e| reject("price", e))?;
        let shipping =
            parse_money(&rec[self.shipping]).map_err(|e| reject("shipping", e))?;

        Ok(IncomingRecord {
            listing_id,
            title: rec[self.title].to_string(),
            quantity,
            units_sold,
            price,
            shipping,
        })
    }
}

fn parse_int(raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| format!("{e} (raw: {raw:?})"))
}

/// Money columns look like `<7-char currency marker><amount>`, with `,` as
/// thousands separator. Strip both, keep the number.
pub fn parse_money(raw: &str) -> Result<f64, String> {
    let cleaned = raw.replace(',', "");
    let trimmed = cleaned.trim();
    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() <= CURRENCY_PREFIX_LEN {
        return Err(format!("too short for a money field (raw: {raw:?})"));
    }
    let amount: String = chars[CURRENCY_PREFIX_LEN..].iter().collect();
    amount
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("{e} (raw: {raw:?})"))
}
