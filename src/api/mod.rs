pub mod client;

// Re-export so code outside can do "use crate::api::ApiClient;"
pub use client::ApiClient;
