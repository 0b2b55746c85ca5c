//! Main client entry point.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use crate::auth::classify::{classify, Disposition};
use crate::auth::renewal::RenewalCoordinator;
use crate::auth::session::{SessionEvent, SessionStore};
use crate::config;
use crate::error::{Error, Result};
use crate::models::auth::{Identity, LoginCredentials};
use crate::models::portfolio::{
    ConstituentBulkUpsert, Portfolio, PortfolioConstituent, PortfolioDraft, UpsertSummary,
};
use crate::models::registry::{Instrument, InstrumentDraft, Listing, ListingDraft};
use crate::transport::{ApiRequest, Exchange, HttpTransport, Transport};

/// Trading Assistant API client.
///
/// Owns the session and renews it transparently: a request that fails with
/// 401 on a renewable path triggers one shared renewal and is replayed with
/// the fresh credential, so callers never see the expiry.
///
/// # Examples
///
/// ```rust,no_run
/// use ta_client::{LoginCredentials, TaClient};
///
/// # async fn example() -> ta_client::Result<()> {
/// let client = TaClient::builder()
///     .base_url("https://trading.example.com/api/v1")
///     .build()?;
///
/// let identity = client
///     .login(LoginCredentials::new("ops@example.com", "hunter2"))
///     .await?;
/// println!("signed in as {}", identity.email);
///
/// let portfolios = client.list_portfolios().await?;
/// println!("{} portfolios", portfolios.len());
/// # Ok(())
/// # }
/// ```
pub struct TaClient {
    pub(crate) session: Arc<SessionStore>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) renewal: Arc<RenewalCoordinator>,
}

impl TaClient {
    /// Create a builder for configuring the client.
    pub fn builder() -> TaClientBuilder {
        TaClientBuilder::new()
    }

    /// Run one request through the authenticated pipeline: attach the current
    /// credential, dispatch, classify, and recover through the renewal
    /// coordinator when the session has expired.
    pub(crate) async fn execute(&self, request: ApiRequest) -> Result<Exchange> {
        let request = request.with_bearer(self.session.credential());
        let exchange = self.transport.exchange(&request).await?;
        match classify(exchange.status, &request.path, request.retried) {
            Disposition::Success => Ok(exchange),
            Disposition::NeedsRenewal => {
                Arc::clone(&self.renewal).recover(request, exchange).await
            }
            Disposition::Exempt | Disposition::Fatal => {
                Err(Error::from_response(exchange.status, &exchange.body))
            }
        }
    }

    /// The identity of the signed-in user, if any. Synchronous snapshot.
    pub fn current_identity(&self) -> Option<Identity> {
        self.session.current_identity()
    }

    /// Whether a session is currently established.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.session.subscribe()
    }

    /// Get a reference to the session store.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Sign in with email and password.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<Identity> {
        crate::api::auth::login(self, credentials).await
    }

    /// Probe for an existing session once at startup. Returns `Ok(None)` when
    /// the probe is rejected, leaving the session anonymous.
    pub async fn initialize(&self) -> Result<Option<Identity>> {
        crate::api::auth::initialize(self).await
    }

    /// Sign out remotely and end the local session.
    pub async fn sign_out(&self) -> Result<()> {
        crate::api::auth::sign_out(self).await
    }

    /// List the portfolios owned by the current user.
    pub async fn list_portfolios(&self) -> Result<Vec<Portfolio>> {
        crate::api::portfolios::list_portfolios(self).await
    }

    /// Create a portfolio.
    pub async fn create_portfolio(&self, draft: PortfolioDraft) -> Result<Portfolio> {
        crate::api::portfolios::create_portfolio(self, draft).await
    }

    /// Fetch a portfolio's constituents.
    pub async fn portfolio_constituents(
        &self,
        portfolio_id: Uuid,
    ) -> Result<Vec<PortfolioConstituent>> {
        crate::api::portfolios::portfolio_constituents(self, portfolio_id).await
    }

    /// Bulk-upsert a portfolio's constituents.
    pub async fn upsert_constituents(
        &self,
        portfolio_id: Uuid,
        upsert: ConstituentBulkUpsert,
    ) -> Result<UpsertSummary> {
        crate::api::portfolios::upsert_constituents(self, portfolio_id, upsert).await
    }

    /// Register an instrument.
    pub async fn register_instrument(&self, draft: InstrumentDraft) -> Result<Instrument> {
        crate::api::registry::register_instrument(self, draft).await
    }

    /// Register a listing of an instrument on an exchange.
    pub async fn register_listing(&self, draft: ListingDraft) -> Result<Listing> {
        crate::api::registry::register_listing(self, draft).await
    }
}

/// Builder for [`TaClient`].
pub struct TaClientBuilder {
    base_url: Option<String>,
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl TaClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            connect_timeout: None,
            request_timeout: None,
            transport: None,
        }
    }

    /// Set the API base URL, including the version prefix.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the per-request timeout. This also bounds how long a renewal can
    /// hold its waiters.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Substitute a custom transport. Base URL and timeout settings are
    /// ignored when one is provided.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<TaClient> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let base_url = self
                    .base_url
                    .as_deref()
                    .unwrap_or(config::DEFAULT_BASE_URL);
                let base_url = Url::parse(base_url)
                    .map_err(|e| Error::Config(format!("invalid base URL {base_url:?}: {e}")))?;
                Arc::new(HttpTransport::with_timeouts(
                    base_url,
                    self.connect_timeout.unwrap_or(config::CONNECT_TIMEOUT),
                    self.request_timeout.unwrap_or(config::REQUEST_TIMEOUT),
                )?)
            }
        };

        let session = Arc::new(SessionStore::new());
        let renewal = Arc::new(RenewalCoordinator::new(
            Arc::clone(&session),
            Arc::clone(&transport),
        ));

        info!("TaClient initialized");
        Ok(TaClient {
            session,
            transport,
            renewal,
        })
    }
}

impl Default for TaClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
