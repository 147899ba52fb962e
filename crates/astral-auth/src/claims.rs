use astral_core::identity::IdentityClaim;
use chrono::{DateTime, Utc};

/// Parsed and validated Clerk session token claims.
///
/// Wraps the relevant fields from `clerk-rs::ClerkJwt`. Produced by JWKS
/// validation, converted to an [`IdentityClaim`] for the identity gate.
#[derive(Debug, Clone)]
pub struct SessionClaims {
    /// Clerk user ID (`sub` claim).
    pub subject: String,
    /// Token issuer (`iss` claim).
    pub issuer: String,
    /// Token expiration time (from `exp` claim).
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    /// Convert to the lightweight claim handed to the identity gate.
    #[must_use]
    pub fn to_identity(&self) -> IdentityClaim {
        IdentityClaim {
            subject: self.subject.clone(),
            issuer: Some(self.issuer.clone()),
            expires_at: Some(self.expires_at),
        }
    }
}
