//! Bearer token codec
//!
//! This module reads the claims the console needs out of a JWT issued by the
//! backend: who the token belongs to and when it expires. The signature is
//! never checked here; the backend remains the only party that trusts a
//! token. Anything that does not look like a token decodes to `None`.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

/// Identity claim emitted by the backend's identity framework
pub const IDENTITY_NAME_CLAIM: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";

/// Claims decoded from a bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    /// Principal identity (the user's email)
    pub email: String,
    /// Expiration time, seconds since the epoch
    pub exp: i64,
    /// Issuer, informational only
    pub issuer: Option<String>,
    /// Audience, informational only
    pub audience: Option<String>,
}

impl DecodedToken {
    /// Expiration time as a timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Decode the claims of a token without verifying it
pub fn decode(token: &str) -> Option<DecodedToken> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        debug!("Rejecting token: expected 3 segments, got {}", segments.len());
        return None;
    }

    let payload = decode_segment(segments[1])?;
    let claims: Map<String, Value> = match serde_json::from_slice(&payload) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Rejecting token: payload is not a JSON object: {}", e);
            return None;
        }
    };

    let Some(exp) = claims.get("exp").and_then(numeric_seconds) else {
        debug!("Rejecting token: no expiration claim");
        return None;
    };

    let email = [IDENTITY_NAME_CLAIM, "name", "email"]
        .iter()
        .find_map(|key| claims.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    Some(DecodedToken {
        email,
        exp,
        issuer: string_claim(&claims, "iss"),
        audience: string_claim(&claims, "aud"),
    })
}

/// Whether a token decodes and has not expired yet
pub fn is_valid(token: &str) -> bool {
    is_valid_at(token, Utc::now().timestamp())
}

/// Whether a token decodes and expires strictly after `now` (epoch seconds)
pub fn is_valid_at(token: &str, now: i64) -> bool {
    decode(token).is_some_and(|claims| claims.exp > now)
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let trimmed = segment.trim_end_matches('=');
    match URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
    {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            debug!("Rejecting token: payload is not base64: {}", e);
            None
        }
    }
}

fn numeric_seconds(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|secs| secs.trunc() as i64))
}

fn string_claim(claims: &Map<String, Value>, key: &str) -> Option<String> {
    claims.get(key).and_then(Value::as_str).map(str::to_string)
}
