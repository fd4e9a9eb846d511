pub mod events;
pub mod manager;
pub mod refresher;

// Re-export the primary session items so code outside can do
// "use crate::session::{SessionManager, SessionEvent};"
pub use events::{LogoutReason, SessionEvent};
pub use manager::{SessionManager, SessionPhase, SessionSnapshot};
pub use refresher::{start_auto_refresh, RefreshTimer};
