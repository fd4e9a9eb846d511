use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use super::manager::SessionManager;

/// Handle for the periodic refresh task. Dropping it aborts the task, so the
/// timer never outlives the scope that owns the session.
pub struct RefreshTimer {
    handle: JoinHandle<()>,
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns the recurring refresh: every `period`, if a session holds tokens,
/// attempt a refresh unconditionally — no expiry pre-check, the backend
/// decides whether the rotation succeeds.
pub fn start_auto_refresh(session: Arc<SessionManager>, period: Duration) -> RefreshTimer {
    let handle = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so the timer only
        // fires after a full period.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if session.is_authenticated() {
                match session.refresh().await {
                    Ok(()) => debug!("Scheduled token refresh complete"),
                    Err(e) => warn!("Scheduled token refresh failed: {}", e),
                }
            } else {
                debug!("No session tokens, skipping scheduled refresh");
            }
        }
    });
    RefreshTimer { handle }
}
