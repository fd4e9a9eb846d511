//! Library exports for koii-session, shared between the binary and tests.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod startup;
pub mod store;
pub mod utils;
