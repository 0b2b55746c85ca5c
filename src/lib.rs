//! # ta-client
//!
//! Rust client library for the Trading Assistant API.
//!
//! Authentication is handled transparently: the client keeps the access token
//! in memory, and when a request fails because the token expired, one shared
//! renewal runs against the refresh endpoint while the failed request (and any
//! concurrent ones) wait to be replayed with the fresh credential.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ta_client::{LoginCredentials, Result, TaClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = TaClient::builder()
//!         .base_url("https://trading.example.com/api/v1")
//!         .build()?;
//!
//!     // Sign in; the renewal cookie lands in the transport's cookie store.
//!     client
//!         .login(LoginCredentials::new("ops@example.com", "hunter2"))
//!         .await?;
//!
//!     // Calls after this point renew the session on demand.
//!     for portfolio in client.list_portfolios().await? {
//!         println!("{} ({})", portfolio.name, portfolio.base_currency);
//!     }
//!     Ok(())
//! }
//! ```

pub(crate) mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod transport;

// Re-exports for ergonomic usage
pub use auth::classify::{classify, Disposition};
pub use auth::session::{Session, SessionEvent, SessionStore, SignOutReason};
pub use client::{TaClient, TaClientBuilder};
pub use error::{Error, Result};
pub use models::auth::{Identity, LoginCredentials, LogoutAck, TokenGrant};
pub use models::portfolio::{
    ConstituentBulkUpsert, ConstituentItem, Portfolio, PortfolioConstituent, PortfolioDraft,
    UpsertSummary,
};
pub use models::registry::{Instrument, InstrumentDraft, Listing, ListingDraft};
pub use transport::{ApiRequest, Exchange, HttpTransport, Transport};
