//! `Authorization` header parsing and unverified expiry decoding.

use base64::Engine as _;

use crate::error::AuthError;

/// Extract the bearer token from an `Authorization` header value.
///
/// A missing or blank header is an anonymous caller (`Ok(None)`). Any other
/// scheme, or `Bearer` with no token, is malformed.
///
/// # Errors
///
/// Returns `AuthError::MalformedHeader` for a non-bearer or empty credential.
pub fn parse_authorization(header: Option<&str>) -> Result<Option<&str>, AuthError> {
    let Some(value) = header.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| AuthError::MalformedHeader("missing credentials".into()))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader(format!(
            "unsupported scheme '{scheme}'"
        )));
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader("empty bearer token".into()));
    }
    Ok(Some(token))
}

/// Decode JWT `exp` claim without signature verification.
///
/// Only used to skip a JWKS round-trip for tokens that are already expired.
/// Use [`crate::jwks::ClerkJwks::validate`] for real validation.
///
/// # Errors
///
/// Returns `AuthError::Other` if the JWT format is invalid or the `exp` claim
/// is missing or cannot be parsed.
pub fn decode_expiry(jwt: &str) -> Result<chrono::DateTime<chrono::Utc>, AuthError> {
    let parts: Vec<&str> = jwt.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::Other("invalid JWT format".into()));
    }
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| AuthError::Other(format!("base64 decode failed: {e}")))?;
    let value: serde_json::Value = serde_json::from_slice(&payload)
        .map_err(|e| AuthError::Other(format!("JSON parse failed: {e}")))?;
    let exp = value["exp"]
        .as_i64()
        .ok_or_else(|| AuthError::Other("missing exp claim".into()))?;
    chrono::DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| AuthError::Other("invalid exp timestamp".into()))
}

#[cfg(test)]
pub(crate) fn make_jwt_with_exp(exp: i64) -> String {
    let header = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256"}"#);
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .encode(format!(r#"{{"sub":"user_123","exp":{exp}}}"#));
    let signature = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode("fake_sig");
    format!("{header}.{payload}.{signature}")
}
