//! Capability traits consumed by the identity gate.
//!
//! A backend function never sees a dynamically typed context. It is handed
//! exactly two capabilities: one that yields the caller's identity claim, and
//! one that looks a user up by the claim's subject. Production code backs them
//! with Clerk and libSQL; tests back them with in-memory fakes.

use async_trait::async_trait;

use crate::errors::CoreError;
use crate::identity::IdentityClaim;
use crate::user::UserRecord;

/// Source of the caller's identity for one invocation.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// The current identity claim, or `None` for an anonymous caller.
    ///
    /// Errors mean the provider could not decide (e.g. a token failed
    /// validation or the key set was unreachable), not that the caller is
    /// anonymous.
    async fn identity(&self) -> Result<Option<IdentityClaim>, CoreError>;
}

/// Exact-match lookup of user records by external subject.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// The unique user whose `clerk_id` equals `subject`, if any.
    async fn user_by_subject(&self, subject: &str) -> Result<Option<UserRecord>, CoreError>;
}
