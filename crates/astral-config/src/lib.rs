//! # astral-config
//!
//! Layered configuration loading for the Astral backend using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ASTRAL_*` prefix, `__` as separator)
//! 2. Project-level `.astral/config.toml`
//! 3. User-level `~/.config/astral/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ASTRAL_CLERK__SECRET_KEY` -> `clerk.secret_key`,
//! `ASTRAL_ACCESS__TRIAL_DAYS` -> `access.trial_days`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use astral_config::AstralConfig;
//!
//! let config = AstralConfig::load_with_dotenv().expect("config");
//! config.validate().expect("valid config");
//!
//! if config.clerk.is_configured() {
//!     println!("validating session tokens against Clerk");
//! }
//! ```

mod access;
mod clerk;
mod database;
mod error;
mod general;

pub use access::AccessConfig;
pub use clerk::ClerkConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AstralConfig {
    #[serde(default)]
    pub clerk: ClerkConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl AstralConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".astral/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("ASTRAL_").split("__"))
    }

    /// Reject combinations that would only fail later at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access.trial_days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "access.trial_days".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.general.meeting_join_window_secs < 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.meeting_join_window_secs".into(),
                reason: "must not be negative".into(),
            });
        }
        if self.database.is_remote() && self.database.auth_token.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "database",
                missing: "auth_token",
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("astral").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) looking for a `.env`
    /// file, then falls back to the current directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AstralConfig::default();
        assert!(!config.clerk.is_configured());
        assert!(!config.database.is_remote());
        assert_eq!(config.access.trial_days, 7);
        config.validate().unwrap();
    }

    #[test]
    fn zero_trial_days_rejected() {
        let mut config = AstralConfig::default();
        config.access.trial_days = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("access.trial_days"));
    }

    #[test]
    fn negative_join_window_rejected() {
        let mut config = AstralConfig::default();
        config.general.meeting_join_window_secs = -1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn remote_database_requires_token() {
        let mut config = AstralConfig::default();
        config.database.url = "libsql://astral-org.turso.io".into();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotConfigured {
                section: "database",
                missing: "auth_token"
            }
        ));
        assert_eq!(
            err.to_string(),
            "[database] is incomplete: auth_token must be set"
        );

        config.database.auth_token = "token".into();
        config.validate().unwrap();
    }
}
