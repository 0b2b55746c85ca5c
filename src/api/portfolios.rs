//! Portfolio endpoints.

use uuid::Uuid;

use crate::client::TaClient;
use crate::error::Result;
use crate::models::portfolio::{
    ConstituentBulkUpsert, Portfolio, PortfolioConstituent, PortfolioDraft, UpsertSummary,
};
use crate::transport::ApiRequest;

/// Fetch the portfolios owned by the current user.
pub(crate) async fn list_portfolios(client: &TaClient) -> Result<Vec<Portfolio>> {
    let exchange = client.execute(ApiRequest::get("/portfolios")).await?;
    exchange.decode()
}

/// Create a portfolio.
pub(crate) async fn create_portfolio(
    client: &TaClient,
    draft: PortfolioDraft,
) -> Result<Portfolio> {
    let body = serde_json::to_value(&draft)?;
    let exchange = client
        .execute(ApiRequest::post("/portfolios").json(body))
        .await?;
    exchange.decode()
}

/// Fetch a portfolio's constituents. Portfolios owned by someone else come
/// back 403, which surfaces as an API error.
pub(crate) async fn portfolio_constituents(
    client: &TaClient,
    portfolio_id: Uuid,
) -> Result<Vec<PortfolioConstituent>> {
    let path = format!("/portfolios/{}/constituents", portfolio_id);
    let exchange = client.execute(ApiRequest::get(path)).await?;
    exchange.decode()
}

/// Bulk-upsert a portfolio's constituents, optionally removing rows missing
/// from the submitted set.
pub(crate) async fn upsert_constituents(
    client: &TaClient,
    portfolio_id: Uuid,
    upsert: ConstituentBulkUpsert,
) -> Result<UpsertSummary> {
    let path = format!("/portfolios/{}/constituents", portfolio_id);
    let body = serde_json::to_value(&upsert)?;
    let exchange = client.execute(ApiRequest::put(path).json(body)).await?;
    exchange.decode()
}
