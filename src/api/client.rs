use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{Credentials, TokenPair};

const TOKEN_PATH: &str = "token/";
const REFRESH_PATH: &str = "token/refresh/";

/// Client for the backend token endpoints.
///
/// This covers exactly the two endpoints the session manager consumes:
/// obtaining a pair from credentials and rotating a pair from a refresh
/// token. No retries; failure classification is left to the caller.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(ms) = config.timeout_in_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        ApiClient {
            // Building the default client only fails on broken TLS setups.
            http: builder.build().unwrap_or_default(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// POST `token/` with an email/password pair, returning a fresh TokenPair.
    pub async fn obtain_tokens(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        self.post_for_tokens(TOKEN_PATH, credentials).await
    }

    /// POST `token/refresh/` with the current refresh token.
    pub async fn refresh_tokens(&self, refresh: &str) -> Result<TokenPair, ApiError> {
        self.post_for_tokens(REFRESH_PATH, &serde_json::json!({ "refresh": refresh }))
            .await
    }

    async fn post_for_tokens<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<TokenPair, ApiError> {
        let url = self.endpoint(path);
        debug!("Sending token request to: {}", url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network {
                endpoint: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if status.is_success() {
            response.json::<TokenPair>().await.map_err(|e| {
                warn!("Token endpoint returned an unparseable body: {}", e);
                ApiError::Malformed {
                    endpoint: url,
                    reason: e.to_string(),
                }
            })
        } else {
            // Error payloads carry a human-readable "detail" field.
            let detail = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
                .unwrap_or_else(|| format!("request failed with status {}", status));
            Err(ApiError::Rejected {
                endpoint: url,
                status: status.as_u16(),
                detail,
            })
        }
    }
}
