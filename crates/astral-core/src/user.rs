use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::access::AccessState;
use crate::enums::Role;

/// Application-level user, keyed by the identity provider's subject.
///
/// At most one record exists per `clerk_id`; the database enforces this with
/// a unique index.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    /// Clerk user ID, stored in the JWT `sub` claim.
    pub clerk_id: String,
    /// Plan slug copied from provider metadata (`free_user`, `trial_user`, ...).
    pub plan: Option<String>,
    pub role: Option<Role>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Whether the user's role is teacher or admin.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.role.is_some_and(Role::is_staff)
    }

    /// Resolve plan and trial state against the configured paid plans.
    #[must_use]
    pub fn access(&self, paid_plans: &[String], now: DateTime<Utc>) -> AccessState {
        AccessState::resolve(self.plan.as_deref(), self.trial_ends_at, paid_plans, now)
    }
}

/// Attributes written when a user is created or refreshed from the identity
/// provider.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserAttributes {
    pub name: String,
    pub clerk_id: String,
    pub plan: Option<String>,
    pub role: Option<Role>,
    pub trial_ends_at: Option<DateTime<Utc>>,
}

impl UserAttributes {
    /// Minimal attributes: a name and a subject, no plan, role, or trial.
    #[must_use]
    pub fn new(name: impl Into<String>, clerk_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clerk_id: clerk_id.into(),
            plan: None,
            role: None,
            trial_ends_at: None,
        }
    }

    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }
}
