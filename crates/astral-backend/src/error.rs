//! Error type surfaced by backend functions.

use astral_auth::GateError;
use astral_db::error::DatabaseError;
use thiserror::Error;

/// Failure of a backend function invocation.
///
/// Gate refusals are passed through unchanged so the calling layer can tell
/// "authentication required" and "user not found" apart from domain errors.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The identity gate refused the caller.
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// The addressed entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Arguments failed validation.
    #[error("invalid input: {0}")]
    Validation(String),

    /// An identity-provider event could not be interpreted.
    #[error("invalid provider event: {0}")]
    InvalidEvent(String),
}
