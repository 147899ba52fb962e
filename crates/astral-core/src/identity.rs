use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Authenticated caller identity for a single backend invocation.
///
/// Produced by `astral-auth` from a validated Clerk session token, consumed by
/// the identity gate. Contains only data fields, no auth logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IdentityClaim {
    /// Clerk user ID (JWT `sub` claim). Matches `UserRecord::clerk_id`.
    pub subject: String,
    /// Token issuer (JWT `iss` claim), e.g. the Clerk frontend API URL.
    pub issuer: Option<String>,
    /// Token expiration time, if the claim came from a token.
    pub expires_at: Option<DateTime<Utc>>,
}

impl IdentityClaim {
    /// Claim with only a subject, as produced by test and service identities.
    #[must_use]
    pub fn for_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            issuer: None,
            expires_at: None,
        }
    }
}
