//! The identity gate: first step of every authenticated backend function.
//!
//! Resolves the caller's identity claim, then maps its subject to the unique
//! application user. The user directory is only queried after an identity is
//! present. No domain data may be read or written before [`IdentityGate::authenticate`]
//! succeeds.

use astral_core::enums::Role;
use astral_core::errors::CoreError;
use astral_core::ports::{IdentitySource, UserDirectory};
use astral_core::user::UserRecord;
use thiserror::Error;

/// Reasons a gated invocation is refused.
#[derive(Debug, Error)]
pub enum GateError {
    /// The caller presented no identity.
    #[error("authentication required")]
    AuthenticationRequired,

    /// The identity is valid but no user record carries its subject.
    #[error("user not found for subject {subject}")]
    UserNotFound { subject: String },

    /// A role-gated function was called by a user without a role.
    #[error("user role not set")]
    RoleNotSet,

    /// The user's role does not satisfy the requirement.
    #[error("access denied: requires {required}")]
    Forbidden { required: String },

    /// The identity source could not produce a decision.
    #[error("identity provider error: {0}")]
    Identity(#[source] CoreError),

    /// The user lookup failed.
    #[error("user directory error: {0}")]
    Directory(#[source] CoreError),
}

/// Identity gate over injected capabilities.
///
/// Holds only borrowed capabilities and no state of its own, so dropping an
/// in-flight call needs no cleanup.
#[derive(Clone, Copy)]
pub struct IdentityGate<'a> {
    identity: &'a dyn IdentitySource,
    directory: &'a dyn UserDirectory,
}

impl<'a> IdentityGate<'a> {
    #[must_use]
    pub const fn new(identity: &'a dyn IdentitySource, directory: &'a dyn UserDirectory) -> Self {
        Self {
            identity,
            directory,
        }
    }

    /// Resolve the caller to their user record.
    ///
    /// # Errors
    ///
    /// `AuthenticationRequired` when there is no identity (the directory is not
    /// queried), `UserNotFound` when no record matches the subject, and
    /// `Identity`/`Directory` when a capability fails.
    pub async fn authenticate(&self) -> Result<UserRecord, GateError> {
        let Some(claim) = self.identity.identity().await.map_err(GateError::Identity)? else {
            tracing::debug!("rejecting anonymous caller");
            return Err(GateError::AuthenticationRequired);
        };

        match self
            .directory
            .user_by_subject(&claim.subject)
            .await
            .map_err(GateError::Directory)?
        {
            Some(user) => {
                tracing::debug!(subject = %claim.subject, user_id = %user.id, "caller authenticated");
                Ok(user)
            }
            None => {
                tracing::warn!(subject = %claim.subject, "authenticated subject has no user record");
                Err(GateError::UserNotFound {
                    subject: claim.subject,
                })
            }
        }
    }

    /// Like [`Self::authenticate`], but anonymous callers and unknown subjects
    /// yield `Ok(None)`. Capability failures still propagate.
    ///
    /// # Errors
    ///
    /// `Identity`/`Directory` when a capability fails.
    pub async fn authenticate_optional(&self) -> Result<Option<UserRecord>, GateError> {
        match self.authenticate().await {
            Ok(user) => Ok(Some(user)),
            Err(GateError::AuthenticationRequired | GateError::UserNotFound { .. }) => Ok(None),
            Err(other) => Err(other),
        }
    }

    /// Authenticate, then require a role at or above `required`.
    ///
    /// # Errors
    ///
    /// Any [`Self::authenticate`] error, `RoleNotSet`, or `Forbidden`.
    pub async fn require_role(&self, required: Role) -> Result<UserRecord, GateError> {
        let user = self.authenticate().await?;
        let role = user.role.ok_or(GateError::RoleNotSet)?;
        if !role.satisfies(required) {
            tracing::warn!(user_id = %user.id, %role, %required, "role check failed");
            return Err(GateError::Forbidden {
                required: required.to_string(),
            });
        }
        Ok(user)
    }

    /// Authenticate, then require one of `allowed` exactly.
    ///
    /// # Errors
    ///
    /// Any [`Self::authenticate`] error, or `Forbidden` when the user's role
    /// is missing or not in the set.
    pub async fn require_any_role(&self, allowed: &[Role]) -> Result<UserRecord, GateError> {
        let user = self.authenticate().await?;
        if user.role.is_some_and(|role| allowed.contains(&role)) {
            return Ok(user);
        }
        tracing::warn!(user_id = %user.id, role = ?user.role, "role set check failed");
        Err(GateError::Forbidden {
            required: allowed
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(" or "),
        })
    }
}
