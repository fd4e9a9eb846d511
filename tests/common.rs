use std::sync::Arc;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use koii_session::api::ApiClient;
use koii_session::config::ApiConfig;
use koii_session::session::SessionManager;
use koii_session::store::SessionStore;
use serde_json::json;

/// Mint an HS256 test token with the given subject and optional expiry.
pub fn mint_token(sub: &str, exp: Option<i64>) -> String {
    let claims = match exp {
        Some(exp) => json!({"sub": sub, "exp": exp}),
        None => json!({"sub": sub}),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"backend-signing-secret"),
    )
    .expect("Failed to encode test token")
}

/// An expiry comfortably in the future.
pub fn future_exp() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

/// An expiry already in the past.
pub fn past_exp() -> i64 {
    chrono::Utc::now().timestamp() - 3600
}

/// Build a session manager pointed at a mock backend.
pub fn build_session(base_url: &str, store: Arc<dyn SessionStore>) -> Arc<SessionManager> {
    let api = ApiClient::new(&ApiConfig {
        base_url: base_url.to_string(),
        timeout_in_ms: Some(3000),
    });
    Arc::new(SessionManager::new(api, store))
}

/// JSON body for a successful token endpoint response.
pub fn token_body(access: &str, refresh: &str) -> String {
    json!({"access": access, "refresh": refresh}).to_string()
}
