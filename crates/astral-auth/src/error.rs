use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed Authorization header: {0}")]
    MalformedHeader(String),

    #[error("JWKS validation failed: {0}")]
    JwksValidation(String),

    #[error("token issuer mismatch: expected {expected}, got {actual}")]
    IssuerMismatch { expected: String, actual: String },

    #[error("session token supplied but Clerk is not configured (set ASTRAL_CLERK__SECRET_KEY)")]
    NotConfigured,

    #[error("{0}")]
    Other(String),
}
