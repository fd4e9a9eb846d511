use std::collections::HashMap;

use chrono::Utc;
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Identity claims decoded from an access token.
///
/// Always derived by [`decode_claims`] from the token string, never
/// hand-constructed. `exp`/`iat` are unix timestamps in seconds; any claim
/// fields we don't explicitly model land in `extra`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionClaims {
    pub sub: Option<String>,
    pub exp: Option<i64>,
    pub iat: Option<i64>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl SessionClaims {
    /// True iff an `exp` claim exists and lies strictly before `now`.
    pub fn expired_at(&self, now: i64) -> bool {
        match self.exp {
            Some(exp) => exp < now,
            // A token without an expiry claim never expires.
            None => false,
        }
    }
}

/// Decodes the claims embedded in an access token.
///
/// This is client-side consumption of a token the backend signed: the
/// signature is deliberately NOT verified, and expiry is not enforced here
/// (expiry policy lives in [`is_expired`]). A malformed token is an error,
/// which callers treat as "no session".
pub fn decode_claims(token: &str) -> Result<SessionClaims, String> {
    let header =
        decode_header(token).map_err(|e| format!("Failed to decode token header: {}", e))?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.set_required_spec_claims::<&str>(&[]);

    let decoded = decode::<SessionClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| format!("Failed to decode token claims: {}", e))?;
    debug!("Decoded access token claims: {:?}", decoded.claims);

    Ok(decoded.claims)
}

/// Pure expiry check against an explicit clock, `now` in unix seconds.
///
/// Returns true iff the token decodes and carries an `exp` claim strictly
/// earlier than `now`. No `exp` claim means the token never expires; an
/// undecodable token is reported as not expired, and rejected instead
/// wherever claims are installed.
pub fn is_expired_at(token: &str, now: i64) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.expired_at(now),
        Err(_) => false,
    }
}

/// Expiry check against the current wall clock.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde_json::json;

    fn mint(claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("Failed to encode test token")
    }

    #[test]
    fn test_decode_claims_extracts_sub_and_exp() {
        let token = mint(json!({"sub": "42", "exp": 4102444800i64, "hunt": "koii"}));
        let claims = decode_claims(&token).expect("decode should succeed");
        assert_eq!(claims.sub.as_deref(), Some("42"));
        assert_eq!(claims.exp, Some(4102444800));
        assert_eq!(claims.extra.get("hunt"), Some(&json!("koii")));
    }

    #[test]
    fn test_decode_claims_rejects_malformed_token() {
        assert!(decode_claims("not.a.token").is_err());
        assert!(decode_claims("").is_err());
    }

    #[test]
    fn test_decode_does_not_verify_signature() {
        // Same payload signed with a different secret still decodes; the
        // client consumes tokens, it does not verify them.
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({"sub": "42", "exp": 4102444800i64}),
            &EncodingKey::from_secret(b"completely-different-secret"),
        )
        .expect("Failed to encode test token");
        assert!(decode_claims(&token).is_ok());
    }

    #[test]
    fn test_decode_accepts_unverifiable_signature_segment() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

        // Hand-assembled token with a junk signature segment, like a backend
        // whose signing scheme we know nothing about.
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"42","exp":4102444800}"#);
        let token = format!("{}.{}.{}", header, payload, "x");

        let claims = decode_claims(&token).expect("decode should succeed");
        assert_eq!(claims.sub.as_deref(), Some("42"));
    }

    #[test]
    fn test_is_expired_before_and_after_exp() {
        let exp = 1_700_000_000i64;
        let token = mint(json!({"sub": "42", "exp": exp}));
        assert!(!is_expired_at(&token, exp - 1));
        assert!(is_expired_at(&token, exp + 1));
        // Strict comparison: a token is not expired at its exact exp second.
        assert!(!is_expired_at(&token, exp));
    }

    #[test]
    fn test_token_without_exp_never_expires() {
        let token = mint(json!({"sub": "42"}));
        assert!(!is_expired_at(&token, 0));
        assert!(!is_expired_at(&token, i64::MAX));
        assert!(!is_expired(&token));
    }

    #[test]
    fn test_undecodable_token_reported_not_expired() {
        assert!(!is_expired_at("garbage", i64::MAX));
    }

    #[test]
    fn test_wall_clock_expiry_far_past_and_future() {
        let past = mint(json!({"sub": "42", "exp": 1i64}));
        let future = mint(json!({"sub": "42", "exp": 4102444800i64}));
        assert!(is_expired(&past));
        assert!(!is_expired(&future));
    }
}
