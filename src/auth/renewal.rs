//! Single-flight session renewal.
//!
//! All requests whose exchange classified as needing renewal funnel into the
//! [`RenewalCoordinator`]. The first caller becomes the leader and starts the
//! one renewal operation; everyone else (the leader included) parks as a
//! waiter in a FIFO queue and is replayed once the renewal settles.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::auth::classify::{classify, Disposition};
use crate::auth::session::{SessionStore, SignOutReason};
use crate::config;
use crate::error::{Error, Result};
use crate::models::auth::{Identity, TokenGrant};
use crate::transport::{ApiRequest, Exchange, Transport};

/// A parked caller: its request (already marked retried) and the handle used
/// to deliver the replay outcome.
struct PendingRequest {
    request: ApiRequest,
    completer: oneshot::Sender<Result<Exchange>>,
}

/// Coordinator state. The queue exists only while a renewal is in flight.
enum RenewalState {
    Idle,
    Renewing(Vec<PendingRequest>),
}

/// Serializes session renewal: at most one renewal exchange in flight, with
/// concurrent authentication failures queued behind it in insertion order.
///
/// The state lock is never held across an await point. The renewal itself
/// runs on a detached task, so a caller dropping its future mid-renewal
/// cannot strand the remaining waiters.
pub(crate) struct RenewalCoordinator {
    state: Mutex<RenewalState>,
    session: Arc<SessionStore>,
    transport: Arc<dyn Transport>,
}

impl RenewalCoordinator {
    pub(crate) fn new(session: Arc<SessionStore>, transport: Arc<dyn Transport>) -> Self {
        Self {
            state: Mutex::new(RenewalState::Idle),
            session,
            transport,
        }
    }

    /// Entry point for a request whose exchange came back 401 on a renewable
    /// path. Joins (or starts) the in-flight renewal and resolves with the
    /// request's replay outcome.
    ///
    /// `failed` is the exchange that sent the request here; it is surfaced
    /// directly if the request turns out to be exempt. Exempt and
    /// already-retried requests must never enter the waiter queue, even if
    /// misclassified upstream.
    pub(crate) async fn recover(
        self: Arc<Self>,
        request: ApiRequest,
        failed: Exchange,
    ) -> Result<Exchange> {
        if request.retried || config::is_renewal_exempt(&request.path) {
            return Err(Error::from_response(failed.status, &failed.body));
        }

        let path = request.path.clone();
        let (completer, outcome) = oneshot::channel();
        let pending = PendingRequest {
            request: request.mark_retried(),
            completer,
        };

        let is_leader = {
            let mut state = self
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match &mut *state {
                RenewalState::Idle => {
                    *state = RenewalState::Renewing(vec![pending]);
                    true
                }
                RenewalState::Renewing(queue) => {
                    queue.push(pending);
                    false
                }
            }
        };

        if is_leader {
            debug!(path = path.as_str(), "Session renewal started");
            tokio::spawn(Arc::clone(&self).drive_renewal());
        } else {
            debug!(path = path.as_str(), "Queued behind in-flight renewal");
        }

        match outcome.await {
            Ok(result) => result,
            // The drive task fulfils every waiter before exiting; losing the
            // sender means that task died.
            Err(_) => Err(Error::RenewalFailed {
                reason: "renewal task dropped before completion".into(),
            }),
        }
    }

    /// Performs the renewal exchange, then settles the queue: replay each
    /// waiter in insertion order on success, or reject them all and end the
    /// session on failure.
    async fn drive_renewal(self: Arc<Self>) {
        let outcome = self.renew_session().await;

        // Restore Idle before replaying: replays are already marked retried,
        // and failures arriving during the replays belong to the next epoch.
        let waiters = {
            let mut state = self
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match std::mem::replace(&mut *state, RenewalState::Idle) {
                RenewalState::Renewing(queue) => queue,
                RenewalState::Idle => Vec::new(),
            }
        };

        match outcome {
            Ok(()) => {
                info!(waiters = waiters.len(), "Session renewed; replaying queued requests");
                for waiter in waiters {
                    let result = self.replay(waiter.request).await;
                    let _ = waiter.completer.send(result);
                }
            }
            Err(err) => {
                warn!(error = %err, waiters = waiters.len(), "Session renewal failed");
                let reason = err.to_string();
                for waiter in waiters {
                    let _ = waiter.completer.send(Err(Error::RenewalFailed {
                        reason: reason.clone(),
                    }));
                }
                self.session.demote(SignOutReason::Expired);
            }
        }
    }

    /// The renewal operation itself: one cookie-authenticated refresh
    /// exchange, then one identity probe with the fresh token. Both go
    /// straight to the transport so they can never re-enter this coordinator.
    async fn renew_session(&self) -> Result<()> {
        let refresh = ApiRequest::post(config::REFRESH_PATH);
        let exchange = self.transport.exchange(&refresh).await?;
        if !exchange.status.is_success() {
            return Err(Error::from_response(exchange.status, &exchange.body));
        }
        let grant: TokenGrant = exchange.decode()?;

        let probe = ApiRequest::get(config::ME_PATH).with_bearer(Some(grant.access_token.clone()));
        let exchange = self.transport.exchange(&probe).await?;
        if !exchange.status.is_success() {
            return Err(Error::from_response(exchange.status, &exchange.body));
        }
        let identity: Identity = exchange.decode()?;

        self.session.establish(identity, grant.access_token);
        Ok(())
    }

    /// Re-dispatch a queued request exactly once with the renewed credential.
    /// The request is marked retried, so a second 401 surfaces instead of
    /// re-queueing.
    async fn replay(&self, request: ApiRequest) -> Result<Exchange> {
        let request = request.with_bearer(self.session.credential());
        debug!(path = request.path.as_str(), "Replaying request");
        let exchange = self.transport.exchange(&request).await?;
        match classify(exchange.status, &request.path, request.retried) {
            Disposition::Success => Ok(exchange),
            _ => Err(Error::from_response(exchange.status, &exchange.body)),
        }
    }
}
