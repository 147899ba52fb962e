//! Cross-cutting error types for Astral.
//!
//! Domain-specific errors (`DatabaseError`, `AuthError`, `GateError`) are
//! defined in their respective crates. `CoreError` is the error type of the
//! capability traits in [`crate::ports`], so implementations in other crates
//! convert into it at the trait boundary.

use thiserror::Error;

/// Errors that can be raised by any Astral crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
