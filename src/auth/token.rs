//! Credential validation
//!
//! Reads the claims of a JWT without checking its signature. The backend is
//! the only verifier; this check just avoids sending a request that is bound
//! to fail. Every failure mode counts as "invalid".

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Why a credential was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token has no expiry claim")]
    MissingExpiry,

    #[error("Token expired")]
    Expired,
}

/// Claims read from the token payload
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Expiry as seconds since the Unix epoch
    #[serde(default)]
    pub exp: Option<f64>,

    #[serde(default)]
    pub iat: Option<f64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// Expiry as a timestamp, when present and representable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp
            .and_then(|exp| DateTime::from_timestamp_millis((exp * 1000.0) as i64))
    }

    /// A string claim from the payload (e.g. `email`, `sub`)
    pub fn string_claim(&self, name: &str) -> Option<&str> {
        self.extra.get(name).and_then(|v| v.as_str())
    }
}

/// Decode the payload segment of a JWT
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Malformed(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let payload = segments[1].trim_end_matches('=');
    if payload.is_empty() {
        return Err(TokenError::Malformed("empty payload".to_string()));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|e| TokenError::Malformed(format!("payload is not base64: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::Malformed(format!("payload is not a claims object: {}", e)))
}

/// Validate a credential against the given instant
pub fn validate_at(token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
    let claims = decode_claims(token)?;
    let exp = claims.exp.ok_or(TokenError::MissingExpiry)?;

    let now_secs = now.timestamp_millis() as f64 / 1000.0;
    if exp <= now_secs {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

/// Whether a credential can still be presented to the backend
pub fn is_valid_token(token: &str) -> bool {
    !token.is_empty() && validate_at(token, Utc::now()).is_ok()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Unsigned token with the given JSON payload
    pub fn token_with_payload(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{}.{}.signature", header, body)
    }

    /// Token whose expiry is `secs` seconds from now (negative = past)
    pub fn token_expiring_in(secs: i64) -> String {
        let exp = Utc::now().timestamp() + secs;
        token_with_payload(&serde_json::json!({ "exp": exp, "email": "ada@example.com" }))
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_future_expiry_is_valid() {
        let token = token_expiring_in(3600);
        assert!(is_valid_token(&token));

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.string_claim("email"), Some("ada@example.com"));
        assert!(claims.expires_at().unwrap() > Utc::now());
    }

    #[test]
    fn test_past_expiry_rejected_regardless_of_other_claims() {
        let past = Utc::now().timestamp() - 10;
        let token = token_with_payload(&json!({
            "exp": past,
            "iat": past - 3600,
            "role": "admin",
            "email_verified": true,
        }));

        assert!(!is_valid_token(&token));
        assert_eq!(validate_at(&token, Utc::now()).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_expiry_equal_to_now_is_rejected() {
        let now = Utc::now();
        let token = token_with_payload(&json!({ "exp": now.timestamp() }));
        let at_expiry = DateTime::from_timestamp(now.timestamp(), 0).unwrap();

        assert_eq!(validate_at(&token, at_expiry).unwrap_err(), TokenError::Expired);
        assert!(validate_at(&token, at_expiry - Duration::seconds(1)).is_ok());
    }

    #[test]
    fn test_missing_expiry_rejected() {
        let token = token_with_payload(&json!({ "sub": "user-1" }));
        assert_eq!(
            validate_at(&token, Utc::now()).unwrap_err(),
            TokenError::MissingExpiry
        );
        assert!(!is_valid_token(&token));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(!is_valid_token(""));
        assert!(!is_valid_token("not-a-jwt"));
        assert!(!is_valid_token("a.%%%.c"));
        assert!(!is_valid_token(&format!(
            "h.{}.s",
            URL_SAFE_NO_PAD.encode("[1, 2, 3]")
        )));
    }

    #[test]
    fn test_non_numeric_expiry_rejected() {
        let token = token_with_payload(&json!({ "exp": "tomorrow" }));
        assert!(matches!(
            decode_claims(&token).unwrap_err(),
            TokenError::Malformed(_)
        ));
    }
}
