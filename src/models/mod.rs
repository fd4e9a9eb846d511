pub mod claims;
pub mod tokens;

// Re-export the primary model items so code outside can do
// "use crate::models::{TokenPair, SessionClaims};"
pub use claims::{decode_claims, is_expired, is_expired_at, SessionClaims};
pub use tokens::{Credentials, TokenPair};
