//! Instrument registry wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fields for registering an instrument (the global security definition).
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentDraft {
    /// 12-character ISIN.
    pub isin: String,
    /// Display name.
    pub name: String,
    /// e.g. `EQUITY`, `ETF`.
    pub instrument_type: String,
}

/// A registered instrument.
#[derive(Debug, Clone, Deserialize)]
pub struct Instrument {
    pub instrument_id: Uuid,
    pub isin: String,
    pub name: String,
    pub instrument_type: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for registering a listing (one tradeable line of an instrument).
#[derive(Debug, Clone, Serialize)]
pub struct ListingDraft {
    pub instrument_id: Uuid,
    pub ticker: String,
    pub exchange: String,
    /// Settlement currency (ISO 4217).
    pub trading_currency: String,
    /// Quote scale, e.g. `GBX` for pence-quoted UK lines.
    pub quote_scale: String,
    pub is_primary: bool,
}

/// A registered listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub listing_id: Uuid,
    pub instrument_id: Uuid,
    pub ticker: String,
    pub exchange: String,
    pub trading_currency: String,
    pub quote_scale: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}
