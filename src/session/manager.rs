use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::events::{ListenerRegistry, LogoutReason, SessionEvent};
use crate::api::ApiClient;
use crate::error::{ApiError, SessionError};
use crate::models::{decode_claims, Credentials, SessionClaims, TokenPair};
use crate::store::SessionStore;

/// Where the session currently sits in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Initializing,
    Unauthenticated,
    Authenticated,
    Refreshing,
}

/// Read-only view of the session handed to consumers.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub claims: Option<SessionClaims>,
    pub login_message: Option<String>,
}

struct SessionState {
    phase: SessionPhase,
    tokens: Option<TokenPair>,
    claims: Option<SessionClaims>,
    login_message: Option<String>,
}

/// Owns the current token pair, the claims decoded from it, and the persisted
/// session record. Sole writer of both; everything else gets snapshots and
/// events.
///
/// Invariant: `claims` is present iff `tokens` is present and the access
/// token decoded successfully. Every failure path lands in
/// `Unauthenticated`, never in a partial state.
///
/// Constructed explicitly at application start and shared by `Arc` handle;
/// dropping the handle (and its [`super::refresher::RefreshTimer`]) tears
/// the session down.
pub struct SessionManager {
    api: ApiClient,
    store: Arc<dyn SessionStore>,
    state: Mutex<SessionState>,
    /// Single-flight guard: overlapping refresh attempts (timer fire plus an
    /// expiry check landing together) serialize instead of racing.
    refresh_gate: tokio::sync::Mutex<()>,
    listeners: ListenerRegistry,
}

impl SessionManager {
    pub fn new(api: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        SessionManager {
            api,
            store,
            state: Mutex::new(SessionState {
                phase: SessionPhase::Initializing,
                tokens: None,
                claims: None,
                login_message: None,
            }),
            refresh_gate: tokio::sync::Mutex::new(()),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Register a listener for session state changes.
    pub fn subscribe(&self, listener: impl Fn(&SessionEvent) + Send + Sync + 'static) {
        self.listeners.subscribe(listener);
    }

    /// Seed the session from the persisted record. Called once at startup.
    ///
    /// A found record whose access token decodes moves us straight to
    /// `Authenticated`; expiry is checked only afterwards, by the same
    /// token-change trigger that runs after login.
    pub async fn initialize(&self) {
        let seeded = match self.store.load() {
            Ok(Some(pair)) => match decode_claims(&pair.access) {
                Ok(claims) => Some((pair, claims)),
                Err(e) => {
                    warn!("Persisted access token failed to decode, discarding record: {}", e);
                    if let Err(e) = self.store.clear() {
                        warn!("Failed to clear unreadable session record: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to load persisted session record: {}", e);
                None
            }
        };

        match seeded {
            Some((pair, claims)) => {
                info!("Restored persisted session for sub={:?}", claims.sub);
                let expired = claims.expired_at(Utc::now().timestamp());
                self.install(pair, claims.clone());
                self.listeners.emit(&SessionEvent::Authenticated { claims });
                if expired {
                    info!("Restored access token is expired, refreshing");
                    let _ = self.refresh().await;
                }
            }
            None => {
                self.state_lock().phase = SessionPhase::Unauthenticated;
            }
        }
    }

    /// Exchange credentials for a token pair at the backend.
    ///
    /// On success the pair is installed, claims decoded, the record
    /// persisted, and `Authenticated` emitted. On failure the session stays
    /// `Unauthenticated` and a display message is recorded alongside the
    /// returned error; nothing panics.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), SessionError> {
        let pair = match self.api.obtain_tokens(credentials).await {
            Ok(pair) => pair,
            Err(ApiError::Rejected { detail, status, .. }) => {
                debug!("Login rejected with status {}: {}", status, detail);
                return Err(self.fail_login(SessionError::InvalidCredentials { message: detail }));
            }
            Err(e) => {
                warn!("Login request failed: {}", e);
                return Err(self.fail_login(SessionError::NetworkFailure {
                    reason: e.to_string(),
                }));
            }
        };

        let claims = match decode_claims(&pair.access) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Access token from login failed to decode: {}", e);
                return Err(self.fail_login(SessionError::InvalidCredentials {
                    message: "Received an unreadable access token.".to_string(),
                }));
            }
        };

        if let Err(e) = self.store.save(&pair) {
            warn!("Failed to persist session record: {}", e);
        }
        info!("Logged in as sub={:?}", claims.sub);
        let expired = claims.expired_at(Utc::now().timestamp());
        self.install(pair, claims.clone());
        self.state_lock().login_message = None;
        self.listeners.emit(&SessionEvent::Authenticated { claims });

        if expired {
            info!("Access token from login is already expired, refreshing");
            self.refresh().await?;
        }
        Ok(())
    }

    /// End the session. Synchronous, always succeeds, idempotent.
    pub fn logout(&self) {
        self.clear_session(LogoutReason::UserRequested);
    }

    /// Rotate the token pair via the backend refresh endpoint.
    ///
    /// Fail-closed: a missing refresh token, a network error, a non-success
    /// status, or an undecodable rotated access token all end in a forced
    /// logout. No retries, no partial credential state.
    pub async fn refresh(&self) -> Result<(), SessionError> {
        let _flight = self.refresh_gate.lock().await;

        let refresh_token = {
            let mut state = self.state_lock();
            match state.tokens.as_ref().map(|pair| pair.refresh.clone()) {
                Some(token) => {
                    state.phase = SessionPhase::Refreshing;
                    token
                }
                None => {
                    drop(state);
                    // No refresh token is treated the same as a failed
                    // refresh, without attempting a network call.
                    debug!("Refresh requested without a refresh token, logging out");
                    self.clear_session(LogoutReason::RefreshFailed);
                    return Err(SessionError::SessionExpiredAndUnrecoverable);
                }
            }
        };

        let rotated = match self.api.refresh_tokens(&refresh_token).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Token refresh failed, logging out: {}", e);
                self.clear_session(LogoutReason::RefreshFailed);
                return Err(SessionError::SessionExpiredAndUnrecoverable);
            }
        };

        let claims = match decode_claims(&rotated.access) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Rotated access token failed to decode, logging out: {}", e);
                self.clear_session(LogoutReason::RefreshFailed);
                return Err(SessionError::SessionExpiredAndUnrecoverable);
            }
        };

        if let Err(e) = self.store.save(&rotated) {
            warn!("Failed to persist refreshed session record: {}", e);
        }
        if claims.expired_at(Utc::now().timestamp()) {
            // Recursion cut-point for the token-change trigger: a rotation
            // that hands back a stale token waits for the periodic timer.
            warn!("Rotated access token is already expired; leaving it to the next scheduled refresh");
        }
        debug!("Session tokens rotated for sub={:?}", claims.sub);
        self.install(rotated, claims.clone());
        self.listeners.emit(&SessionEvent::Refreshed { claims });
        Ok(())
    }

    // -- Read model

    pub fn phase(&self) -> SessionPhase {
        self.state_lock().phase
    }

    pub fn is_authenticated(&self) -> bool {
        self.state_lock().tokens.is_some()
    }

    /// Claims decoded from the current access token, if a session exists.
    pub fn claims(&self) -> Option<SessionClaims> {
        self.state_lock().claims.clone()
    }

    /// Current access token, for collaborators that attach bearer headers.
    pub fn access_token(&self) -> Option<String> {
        self.state_lock()
            .tokens
            .as_ref()
            .map(|pair| pair.access.clone())
    }

    /// The latest login-failure message, for display next to the login form.
    pub fn login_message(&self) -> Option<String> {
        self.state_lock().login_message.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state_lock();
        SessionSnapshot {
            phase: state.phase,
            claims: state.claims.clone(),
            login_message: state.login_message.clone(),
        }
    }

    // -- Internals

    fn state_lock(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn install(&self, tokens: TokenPair, claims: SessionClaims) {
        let mut state = self.state_lock();
        state.tokens = Some(tokens);
        state.claims = Some(claims);
        state.phase = SessionPhase::Authenticated;
    }

    fn fail_login(&self, error: SessionError) -> SessionError {
        let mut state = self.state_lock();
        state.login_message = Some(match &error {
            SessionError::InvalidCredentials { message } => message.clone(),
            _ => "Could not reach the server. Please try again.".to_string(),
        });
        // A failed login from a logged-out state stays Unauthenticated; a
        // failed re-login attempt leaves the existing session untouched.
        if state.tokens.is_none() {
            state.phase = SessionPhase::Unauthenticated;
        }
        error
    }

    fn clear_session(&self, reason: LogoutReason) {
        {
            let mut state = self.state_lock();
            state.tokens = None;
            state.claims = None;
            state.phase = SessionPhase::Unauthenticated;
        }
        // Logout always succeeds; a store failure is logged, not surfaced.
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear persisted session record: {}", e);
        }
        self.listeners.emit(&SessionEvent::LoggedOut { reason });
    }
}
