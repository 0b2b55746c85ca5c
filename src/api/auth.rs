//! Authentication operations: login, the startup probe, and sign-out.

use tracing::{debug, warn};

use crate::auth::session::SignOutReason;
use crate::client::TaClient;
use crate::config;
use crate::error::{Error, Result};
use crate::models::auth::{Identity, LoginCredentials, TokenGrant};
use crate::transport::ApiRequest;

/// Exchange credentials for a session.
///
/// Submits the OAuth2 password form, then probes the identity endpoint with
/// the granted token before promoting the session. The login path is exempt
/// from renewal, so bad credentials surface directly.
pub(crate) async fn login(client: &TaClient, credentials: LoginCredentials) -> Result<Identity> {
    debug!("Submitting login credentials");
    let request = ApiRequest::post(config::LOGIN_PATH).form(credentials.form_fields());
    let exchange = client.execute(request).await?;
    let grant: TokenGrant = exchange.decode()?;

    // The session is not established yet, so the probe carries the fresh
    // token explicitly and goes straight to the transport.
    let probe = ApiRequest::get(config::ME_PATH).with_bearer(Some(grant.access_token.clone()));
    let exchange = client.transport.exchange(&probe).await?;
    if !exchange.status.is_success() {
        return Err(Error::from_response(exchange.status, &exchange.body));
    }
    let identity: Identity = exchange.decode()?;

    client.session.establish(identity.clone(), grant.access_token);
    Ok(identity)
}

/// Probe the current session once at startup.
///
/// An unauthenticated probe is a normal outcome, not an error: the session
/// stays anonymous and the caller gets `Ok(None)`. The probe path is exempt,
/// so this can never trigger a renewal.
pub(crate) async fn initialize(client: &TaClient) -> Result<Option<Identity>> {
    let credential = client.session.credential();
    match client.execute(ApiRequest::get(config::ME_PATH)).await {
        Ok(exchange) => {
            let identity: Identity = exchange.decode()?;
            if let Some(token) = credential {
                client.session.establish(identity.clone(), token);
            }
            Ok(Some(identity))
        }
        Err(Error::Unauthorized { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

/// End the session remotely and locally.
///
/// The remote call clears the renewal cookies on the server. Its failure is
/// logged and swallowed; the local session always ends.
pub(crate) async fn sign_out(client: &TaClient) -> Result<()> {
    if let Err(err) = client.execute(ApiRequest::post(config::LOGOUT_PATH)).await {
        warn!(error = %err, "Remote sign-out failed; ending session locally");
    }
    client.session.demote(SignOutReason::Explicit);
    Ok(())
}
