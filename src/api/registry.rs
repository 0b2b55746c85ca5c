//! Instrument and listing registry endpoints.

use crate::client::TaClient;
use crate::error::Result;
use crate::models::registry::{Instrument, InstrumentDraft, Listing, ListingDraft};
use crate::transport::ApiRequest;

/// Register an instrument. A duplicate ISIN comes back 409 with the server's
/// detail message.
pub(crate) async fn register_instrument(
    client: &TaClient,
    draft: InstrumentDraft,
) -> Result<Instrument> {
    let body = serde_json::to_value(&draft)?;
    let exchange = client
        .execute(ApiRequest::post("/registry/instruments").json(body))
        .await?;
    exchange.decode()
}

/// Register a listing of an instrument on an exchange.
pub(crate) async fn register_listing(client: &TaClient, draft: ListingDraft) -> Result<Listing> {
    let body = serde_json::to_value(&draft)?;
    let exchange = client
        .execute(ApiRequest::post("/registry/listings").json(body))
        .await?;
    exchange.decode()
}
