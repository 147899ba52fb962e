//! Plan and trial access resolution.
//!
//! Plans are free-form slugs copied from the identity provider. Two slugs are
//! reserved: `free_user` and `trial_user`. Any other slug is paid, optionally
//! restricted to an allow-list from configuration.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Plan slug for users without a subscription.
pub const PLAN_FREE: &str = "free_user";

/// Plan slug for users on a time-limited trial.
pub const PLAN_TRIAL: &str = "trial_user";

/// Resolved access for one user at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AccessState {
    pub has_paid_plan: bool,
    pub has_active_trial: bool,
    pub has_access: bool,
}

impl AccessState {
    /// Resolve access from a plan slug and trial end.
    ///
    /// An empty `paid_plans` list treats every non-reserved slug as paid.
    #[must_use]
    pub fn resolve(
        plan: Option<&str>,
        trial_ends_at: Option<DateTime<Utc>>,
        paid_plans: &[String],
        now: DateTime<Utc>,
    ) -> Self {
        let has_paid_plan = is_paid_plan(plan, paid_plans);
        let has_active_trial =
            plan == Some(PLAN_TRIAL) && trial_ends_at.is_some_and(|ends| ends > now);
        Self {
            has_paid_plan,
            has_active_trial,
            has_access: has_paid_plan || has_active_trial,
        }
    }

    /// State for anonymous callers and users without a record.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            has_paid_plan: false,
            has_active_trial: false,
            has_access: false,
        }
    }
}

/// Whether `plan` is a paid subscription.
#[must_use]
pub fn is_paid_plan(plan: Option<&str>, paid_plans: &[String]) -> bool {
    match plan {
        None | Some(PLAN_FREE | PLAN_TRIAL) => false,
        Some(p) if p.is_empty() => false,
        Some(p) => paid_plans.is_empty() || paid_plans.iter().any(|allowed| allowed == p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use rstest::rstest;

    #[rstest]
    #[case(None, false)]
    #[case(Some("free_user"), false)]
    #[case(Some("trial_user"), false)]
    #[case(Some(""), false)]
    #[case(Some("premium"), true)]
    fn paid_plan_without_allow_list(#[case] plan: Option<&str>, #[case] expected: bool) {
        assert_eq!(is_paid_plan(plan, &[]), expected);
    }

    #[test]
    fn paid_plan_respects_allow_list() {
        let allowed = vec!["premium".to_string(), "school".to_string()];
        assert!(is_paid_plan(Some("school"), &allowed));
        assert!(!is_paid_plan(Some("legacy"), &allowed));
    }

    #[test]
    fn active_trial_grants_access() {
        let now = Utc::now();
        let state = AccessState::resolve(Some(PLAN_TRIAL), Some(now + TimeDelta::days(3)), &[], now);
        assert!(state.has_active_trial);
        assert!(!state.has_paid_plan);
        assert!(state.has_access);
    }

    #[test]
    fn expired_trial_grants_nothing() {
        let now = Utc::now();
        let state = AccessState::resolve(Some(PLAN_TRIAL), Some(now - TimeDelta::seconds(1)), &[], now);
        assert_eq!(state, AccessState::none());
    }

    #[test]
    fn trial_end_on_other_plan_is_ignored() {
        let now = Utc::now();
        let state = AccessState::resolve(Some(PLAN_FREE), Some(now + TimeDelta::days(3)), &[], now);
        assert!(!state.has_access);
    }
}
