//! Portfolio wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fields for creating a portfolio.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioDraft {
    /// Display name.
    pub name: String,
    /// Base reporting currency (ISO 4217).
    pub base_currency: String,
    /// Tax wrapper, e.g. `ISA`, `SIPP`, `GIA`.
    pub tax_profile: String,
}

/// A portfolio owned by the authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct Portfolio {
    pub portfolio_id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    pub base_currency: String,
    pub tax_profile: String,
    pub is_enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// One constituent entry in a bulk upsert.
#[derive(Debug, Clone, Serialize)]
pub struct ConstituentItem {
    pub listing_id: Uuid,
    pub sleeve_code: String,
    pub is_monitored: bool,
}

/// Bulk constituent replacement for a portfolio.
#[derive(Debug, Clone, Serialize)]
pub struct ConstituentBulkUpsert {
    pub items: Vec<ConstituentItem>,
    /// When true, constituents absent from `items` are removed.
    pub replace_missing: bool,
}

/// A constituent row as stored by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioConstituent {
    pub portfolio_id: Uuid,
    pub listing_id: Uuid,
    pub sleeve_code: String,
    pub is_monitored: bool,
    pub created_at: DateTime<Utc>,
}

/// Result summary of a bulk upsert.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertSummary {
    pub status: String,
    pub updated_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portfolio_decodes() {
        let raw = r#"{
            "portfolio_id": "0b7a3c44-61f7-4f0e-a9d0-7f8a3b6c1d2e",
            "owner_user_id": "6f0d7c2e-9f3a-4e58-8c7b-2c1d5a9e4b10",
            "name": "Core ISA",
            "base_currency": "GBP",
            "tax_profile": "ISA",
            "is_enabled": true,
            "created_at": "2025-11-02T09:30:00Z"
        }"#;
        let portfolio: Portfolio = serde_json::from_str(raw).unwrap();
        assert_eq!(portfolio.name, "Core ISA");
        assert_eq!(portfolio.base_currency, "GBP");
        assert!(portfolio.is_enabled);
    }

    #[test]
    fn test_bulk_upsert_serializes() {
        let upsert = ConstituentBulkUpsert {
            items: vec![ConstituentItem {
                listing_id: Uuid::nil(),
                sleeve_code: "CORE".into(),
                is_monitored: true,
            }],
            replace_missing: false,
        };
        let value = serde_json::to_value(&upsert).unwrap();
        assert_eq!(value["items"][0]["sleeve_code"], "CORE");
        assert_eq!(value["replace_missing"], false);
    }
}
