//! Explicit state-change notification for session consumers.
//!
//! Instead of ambient reactive subscriptions, interested parties (the view
//! layer, the refresh timer, loggers) register listeners and receive every
//! state transition as an event. Navigation is driven off these: a consumer
//! routes to the landing view on `Authenticated` and back to the login view
//! on `LoggedOut`.

use std::sync::Mutex;

use crate::models::SessionClaims;

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogoutReason {
    /// Explicit user-initiated logout.
    UserRequested,
    /// Refresh failed (or no refresh token was available); the session was
    /// force-closed. Never shown as an interactive error, only observable
    /// as this state change.
    RefreshFailed,
}

/// State-change events published by the session manager.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// A session was established (startup seed or login).
    Authenticated { claims: SessionClaims },
    /// The token pair was rotated; the session continues.
    Refreshed { claims: SessionClaims },
    /// The session ended and all credentials were cleared.
    LoggedOut { reason: LogoutReason },
}

type Listener = Box<dyn Fn(&SessionEvent) + Send + Sync>;

/// Registered listeners, notified in subscription order.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Mutex<Vec<Listener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        ListenerRegistry::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&SessionEvent) + Send + Sync + 'static) {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        listeners.push(Box::new(listener));
    }

    pub fn emit(&self, event: &SessionEvent) {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for listener in listeners.iter() {
            listener(event);
        }
    }
}
