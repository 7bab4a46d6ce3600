//! Bearer token inspection

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use log::warn;

/// Extract the subject (`sub`, falling back to `user_id`) from a JWT-style
/// token without verifying it.
///
/// Best effort: any decode failure is logged and yields `None`.
pub fn token_subject(token: &str) -> Option<String> {
    let Some(payload) = token.split('.').nth(1) else {
        warn!("Token has no payload segment; skipping subject header");
        return None;
    };

    let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to decode token payload: {}", e);
            return None;
        }
    };

    let claims: serde_json::Value = match serde_json::from_slice(&bytes) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Failed to parse token claims: {}", e);
            return None;
        }
    };

    claims
        .get("sub")
        .or_else(|| claims.get("user_id"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
