//! Application startup and session wiring.
//!
//! Builds the store, API client, and session manager from the loaded
//! configuration, seeds the session from the persisted record, and runs the
//! background refresh timer until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::api::ApiClient;
use crate::config::ConfigV1;
use crate::session::{start_auto_refresh, SessionEvent, SessionManager};
use crate::store::create_store;

/// Initializes the session manager and runs until ctrl-c.
///
/// Consumers embedding the crate wire their own listeners and navigation;
/// this binary just logs the transitions it observes.
pub async fn run(config: ConfigV1) -> Result<(), Box<dyn std::error::Error>> {
    let store = create_store(&config.storage);
    let api = ApiClient::new(&config.api);
    let session = Arc::new(SessionManager::new(api, store));

    session.subscribe(|event| match event {
        SessionEvent::Authenticated { claims } => {
            info!("Session established for sub={:?}", claims.sub)
        }
        SessionEvent::Refreshed { claims } => {
            info!("Session tokens rotated for sub={:?}", claims.sub)
        }
        SessionEvent::LoggedOut { reason } => info!("Session ended ({:?})", reason),
    });

    session.initialize().await;
    info!("Session manager ready, phase: {:?}", session.phase());

    let timer = start_auto_refresh(
        session.clone(),
        Duration::from_secs(config.session.refresh_interval_secs),
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutting down, stopping refresh timer");
    drop(timer);

    Ok(())
}
