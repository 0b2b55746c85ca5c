//! Process-wide session state and lifecycle events.

use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::models::auth::Identity;

/// Capacity of the session event channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// The authenticated-identity state shared across all outbound requests.
#[derive(Debug, Clone, Default)]
pub enum Session {
    /// No credential; requests go out anonymous.
    #[default]
    Anonymous,
    /// A live session and its bearer credential.
    Authenticated {
        /// The authenticated principal.
        identity: Identity,
        /// Bearer token attached to outbound requests.
        access_token: String,
    },
}

impl Session {
    /// The current identity, if authenticated.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { identity, .. } => Some(identity),
        }
    }

    /// The current bearer credential, if authenticated.
    pub fn credential(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { access_token, .. } => Some(access_token),
        }
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutReason {
    /// The user signed out.
    Explicit,
    /// Renewal failed; the session could not be kept alive.
    Expired,
}

/// Session lifecycle notifications for presentation layers.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A session was established or renewed.
    Established {
        /// The (possibly re-confirmed) principal.
        identity: Identity,
    },
    /// The session ended. Exactly one event per transition to anonymous.
    SignedOut {
        /// What ended it.
        reason: SignOutReason,
    },
}

/// Owns the [`Session`] and broadcasts its lifecycle.
///
/// Reads are synchronous. Mutation happens only through
/// [`SessionStore::establish`] and [`SessionStore::demote`], called by the
/// renewal coordinator's terminal outcomes and the explicit
/// login/initialize/sign-out operations.
pub struct SessionStore {
    state: RwLock<Session>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// Create a store holding an anonymous session.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(Session::Anonymous),
            events,
        }
    }

    /// Current identity, or `None` when anonymous.
    pub fn current_identity(&self) -> Option<Identity> {
        self.read().identity().cloned()
    }

    /// Current bearer credential, or `None` when anonymous.
    pub fn credential(&self) -> Option<String> {
        self.read().credential().map(String::from)
    }

    /// True when a session is live.
    pub fn is_authenticated(&self) -> bool {
        self.read().identity().is_some()
    }

    /// Subscribe to session lifecycle events.
    ///
    /// Events are best-effort: with no subscribers they are dropped, and a
    /// lagging subscriber observes the standard broadcast lag error.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Promote the session and announce it.
    pub(crate) fn establish(&self, identity: Identity, access_token: String) {
        {
            let mut state = self
                .state
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *state = Session::Authenticated {
                identity: identity.clone(),
                access_token,
            };
        }
        info!(email = identity.email.as_str(), "Session established");
        let _ = self.events.send(SessionEvent::Established { identity });
    }

    /// Demote the session to anonymous.
    ///
    /// Emits one `SignedOut` event per actual transition; demoting an already
    /// anonymous session is a no-op, which keeps the sign-out signal
    /// idempotent. Returns whether a live session was ended.
    pub(crate) fn demote(&self, reason: SignOutReason) -> bool {
        let was_authenticated = {
            let mut state = self
                .state
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let was = state.identity().is_some();
            *state = Session::Anonymous;
            was
        };

        if was_authenticated {
            info!(?reason, "Session ended");
            let _ = self.events.send(SessionEvent::SignedOut { reason });
        } else {
            debug!(?reason, "Demote on anonymous session ignored");
        }
        was_authenticated
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn identity(email: &str) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: email.into(),
            is_bootstrap_admin: false,
        }
    }

    #[test]
    fn test_starts_anonymous() {
        let store = SessionStore::new();
        assert!(store.current_identity().is_none());
        assert!(store.credential().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_establish_exposes_identity_and_credential() {
        let store = SessionStore::new();
        store.establish(identity("ops@example.com"), "tok-1".into());

        assert_eq!(
            store.current_identity().map(|i| i.email),
            Some("ops@example.com".to_string())
        );
        assert_eq!(store.credential().as_deref(), Some("tok-1"));
    }

    #[test]
    fn test_establish_emits_event() {
        let store = SessionStore::new();
        let mut events = store.subscribe();

        store.establish(identity("ops@example.com"), "tok-1".into());

        match events.try_recv().unwrap() {
            SessionEvent::Established { identity } => {
                assert_eq!(identity.email, "ops@example.com");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_demote_is_idempotent() {
        let store = SessionStore::new();
        let mut events = store.subscribe();
        store.establish(identity("ops@example.com"), "tok-1".into());
        let _ = events.try_recv().unwrap();

        assert!(store.demote(SignOutReason::Expired));
        assert!(!store.demote(SignOutReason::Expired));
        assert!(!store.demote(SignOutReason::Explicit));

        match events.try_recv().unwrap() {
            SessionEvent::SignedOut { reason } => assert_eq!(reason, SignOutReason::Expired),
            other => panic!("unexpected event: {:?}", other),
        }
        // Only the first demote emitted anything.
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_demote_on_fresh_store_emits_nothing() {
        let store = SessionStore::new();
        let mut events = store.subscribe();

        assert!(!store.demote(SignOutReason::Explicit));
        assert!(events.try_recv().is_err());
    }
}
