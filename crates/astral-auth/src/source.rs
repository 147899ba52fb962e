//! Identity sources: where an invocation's caller identity comes from.

use astral_core::errors::CoreError;
use astral_core::identity::IdentityClaim;
use astral_core::ports::IdentitySource;
use async_trait::async_trait;

use crate::bearer::{decode_expiry, parse_authorization};
use crate::claims::SessionClaims;
use crate::error::AuthError;
use crate::jwks::ClerkJwks;

/// Identity from a Clerk session token carried in the `Authorization` header.
///
/// The header is kept raw and only parsed when the identity is requested, so a
/// malformed header fails the invocation through the gate instead of at
/// request intake.
#[derive(Clone)]
pub struct ClerkSession {
    authorization: Option<String>,
    jwks: Option<ClerkJwks>,
}

impl ClerkSession {
    #[must_use]
    pub fn new(authorization: Option<&str>, jwks: Option<ClerkJwks>) -> Self {
        Self {
            authorization: authorization.map(String::from),
            jwks,
        }
    }

    /// Validate the session token, if any.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` for a malformed header, an expired or invalid
    /// token, or a token presented while Clerk is not configured.
    pub async fn resolve(&self) -> Result<Option<SessionClaims>, AuthError> {
        let Some(token) = parse_authorization(self.authorization.as_deref())? else {
            return Ok(None);
        };
        let jwks = self.jwks.as_ref().ok_or(AuthError::NotConfigured)?;

        if let Ok(expires_at) = decode_expiry(token) {
            if expires_at <= chrono::Utc::now() {
                tracing::debug!(%expires_at, "rejecting expired session token without JWKS lookup");
                return Err(AuthError::JwksValidation("token expired".into()));
            }
        }

        let claims = jwks.validate(token).await?;
        tracing::debug!(subject = %claims.subject, "session token validated");
        Ok(Some(claims))
    }
}

#[async_trait]
impl IdentitySource for ClerkSession {
    async fn identity(&self) -> Result<Option<IdentityClaim>, CoreError> {
        let claims = self
            .resolve()
            .await
            .map_err(|e| CoreError::Other(anyhow::Error::new(e)))?;
        Ok(claims.as_ref().map(SessionClaims::to_identity))
    }
}

/// Fixed identity, for trusted internal callers and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<IdentityClaim>);

impl StaticIdentity {
    /// No caller identity.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }

    /// A caller authenticated as `subject`.
    #[must_use]
    pub fn subject(subject: impl Into<String>) -> Self {
        Self(Some(IdentityClaim::for_subject(subject)))
    }
}

#[async_trait]
impl IdentitySource for StaticIdentity {
    async fn identity(&self) -> Result<Option<IdentityClaim>, CoreError> {
        Ok(self.0.clone())
    }
}
