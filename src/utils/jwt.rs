//! Unverified JWT payload inspection
//!
//! The access tokens issued by the hosted auth backend are JWTs. The client
//! never verifies their signatures (the backend does), but it does peek at
//! the payload to read expiry and identity claims, e.g. to decide whether a
//! stored token pair needs a refresh before use.

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Decode the payload section of a JWT without verifying its signature
///
/// # Errors
///
/// Returns an error if the token is not a three-part JWT, the payload is not
/// valid base64, or the decoded payload is not valid JSON.
pub fn decode_jwt_payload(token: &str) -> Result<Value, String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid JWT format".to_string());
    }

    let payload_b64 = parts[1];
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .or_else(|_| general_purpose::STANDARD.decode(payload_b64))
        .map_err(|_| "Base64 decode failed")?;

    let payload_str = String::from_utf8(payload_bytes).map_err(|_| "UTF-8 decode failed")?;

    serde_json::from_str(&payload_str).map_err(|_| "JSON parse failed".to_string())
}

/// Read the `exp` claim of a JWT access token
///
/// Returns `None` for tokens that are not JWTs or carry no usable expiry;
/// callers treat that as "expiry unknown" rather than as an error.
#[must_use]
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let claims = decode_jwt_payload(token).ok()?;
    let exp = claims.get("exp")?.as_i64()?;
    DateTime::from_timestamp(exp, 0)
}

/// Read the `email` claim of a JWT access token, if present
#[must_use]
pub fn token_email(token: &str) -> Option<String> {
    let claims = decode_jwt_payload(token).ok()?;
    claims
        .get("email")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token(payload: &Value) -> String {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{header}.{body}.fakesignature")
    }

    #[test]
    fn test_decode_payload_claims() {
        let token = make_token(&serde_json::json!({
            "sub": "user-1",
            "email": "test@example.com",
            "exp": 1_900_000_000
        }));

        let claims = decode_jwt_payload(&token).unwrap();
        assert_eq!(claims["sub"], "user-1");
        assert_eq!(token_email(&token), Some("test@example.com".to_string()));
        assert_eq!(
            token_expiry(&token).unwrap(),
            DateTime::from_timestamp(1_900_000_000, 0).unwrap()
        );
    }

    #[test]
    fn test_invalid_token_shapes_rejected() {
        assert!(decode_jwt_payload("").is_err());
        assert!(decode_jwt_payload("only.two").is_err());
        assert!(decode_jwt_payload("a.!!!notbase64!!!.c").is_err());
    }

    #[test]
    fn test_missing_claims_yield_none() {
        let token = make_token(&serde_json::json!({"sub": "user-1"}));
        assert_eq!(token_expiry(&token), None);
        assert_eq!(token_email(&token), None);
    }
}
