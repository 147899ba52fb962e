use std::sync::Arc;

use clerk_rs::ClerkConfiguration;
use clerk_rs::clerk::Clerk;
use clerk_rs::validators::authorizer::validate_jwt;
use clerk_rs::validators::jwks::MemoryCacheJwksProvider;

use crate::claims::SessionClaims;
use crate::error::AuthError;

/// Clerk session token validator.
///
/// Built once at startup and shared by every invocation. The
/// `MemoryCacheJwksProvider` caches Clerk's public keys for one hour, so one
/// instance should live as long as the process.
#[derive(Clone)]
pub struct ClerkJwks {
    provider: Arc<MemoryCacheJwksProvider>,
    expected_issuer: Option<String>,
}

impl ClerkJwks {
    /// Create a validator that fetches keys with the Clerk Backend API secret.
    ///
    /// When `expected_issuer` is set, tokens from any other issuer are rejected.
    #[must_use]
    pub fn new(secret_key: &str, expected_issuer: Option<&str>) -> Self {
        let config = ClerkConfiguration::new(None, None, Some(secret_key.to_string()), None);
        let clerk = Clerk::new(config);
        Self {
            provider: Arc::new(MemoryCacheJwksProvider::new(clerk)),
            expected_issuer: expected_issuer.map(String::from),
        }
    }

    /// Validate a Clerk session JWT and extract its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::JwksValidation` if the token is invalid, expired,
    /// or the JWKS endpoint is unreachable, and `AuthError::IssuerMismatch`
    /// if the issuer differs from the configured one.
    pub async fn validate(&self, jwt: &str) -> Result<SessionClaims, AuthError> {
        let clerk_jwt = validate_jwt(jwt, Arc::clone(&self.provider))
            .await
            .map_err(|e| AuthError::JwksValidation(e.to_string()))?;

        let expires_at = chrono::DateTime::from_timestamp(i64::from(clerk_jwt.exp), 0)
            .ok_or_else(|| AuthError::JwksValidation("invalid exp timestamp".into()))?;

        check_issuer(self.expected_issuer.as_deref(), &clerk_jwt.iss)?;

        Ok(SessionClaims {
            subject: clerk_jwt.sub.clone(),
            issuer: clerk_jwt.iss.clone(),
            expires_at,
        })
    }
}

fn check_issuer(expected: Option<&str>, actual: &str) -> Result<(), AuthError> {
    match expected {
        Some(expected) if expected.trim_end_matches('/') != actual.trim_end_matches('/') => {
            Err(AuthError::IssuerMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
        _ => Ok(()),
    }
}
