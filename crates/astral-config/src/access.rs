//! Plan and trial access configuration.

use serde::{Deserialize, Serialize};

/// Default trial length granted to newly provisioned users.
const fn default_trial_days() -> u32 {
    7
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccessConfig {
    /// Comma-separated plan slugs that count as paid. Empty means every plan
    /// other than `free_user` and `trial_user` is paid.
    #[serde(default)]
    pub paid_plans: String,

    /// Trial length for new users who arrive without a plan.
    #[serde(default = "default_trial_days")]
    pub trial_days: u32,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            paid_plans: String::new(),
            trial_days: default_trial_days(),
        }
    }
}

impl AccessConfig {
    /// Paid plan slugs, trimmed, with empty entries dropped.
    pub fn paid_plan_list(&self) -> Vec<String> {
        self.paid_plans
            .split(',')
            .map(str::trim)
            .filter(|plan| !plan.is_empty())
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = AccessConfig::default();
        assert_eq!(config.trial_days, 7);
        assert!(config.paid_plan_list().is_empty());
    }

    #[test]
    fn paid_plan_list_normalizes_entries() {
        let config = AccessConfig {
            paid_plans: " premium, ,school ,".into(),
            ..Default::default()
        };
        assert_eq!(config.paid_plan_list(), vec!["premium", "school"]);
    }
}
