//! Application state built at startup, and the per-call invocation context.

use anyhow::Context as _;
use astral_auth::{ClerkJwks, ClerkSession, IdentityGate};
use astral_config::AstralConfig;
use astral_core::ports::IdentitySource;
use astral_db::AstralDb;
use chrono::{DateTime, TimeDelta, Utc};

use crate::error::BackendError;
use crate::provisioning::{self, EventOutcome};

/// Function-level settings derived from configuration.
#[derive(Debug, Clone)]
pub struct FunctionSettings {
    /// Plan slugs that count as paid; empty means any non-reserved slug.
    pub paid_plans: Vec<String>,
    /// Trial length granted to new users who arrive without a plan.
    pub trial_length: TimeDelta,
    /// How far back the upcoming-meetings listing reaches.
    pub meeting_join_window: TimeDelta,
}

impl FunctionSettings {
    #[must_use]
    pub fn from_config(config: &AstralConfig) -> Self {
        Self {
            paid_plans: config.access.paid_plan_list(),
            trial_length: TimeDelta::days(i64::from(config.access.trial_days)),
            meeting_join_window: TimeDelta::try_seconds(config.general.meeting_join_window_secs)
                .unwrap_or(TimeDelta::MAX),
        }
    }
}

impl Default for FunctionSettings {
    fn default() -> Self {
        Self::from_config(&AstralConfig::default())
    }
}

/// Shared backend resources, initialized once at startup and dropped at
/// shutdown.
pub struct Backend {
    db: AstralDb,
    jwks: Option<ClerkJwks>,
    settings: FunctionSettings,
}

impl Backend {
    /// Open the database and build the session validator from configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the database cannot be opened.
    pub async fn init(config: &AstralConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid astral configuration")?;

        let db = if config.database.is_remote() {
            AstralDb::open_remote(&config.database.url, &config.database.auth_token)
                .await
                .context("failed to open remote database")?
        } else {
            AstralDb::open_local(&config.database.path)
                .await
                .with_context(|| format!("failed to open database at {}", config.database.path))?
        };

        let jwks = if config.clerk.is_configured() {
            Some(ClerkJwks::new(
                &config.clerk.secret_key,
                config.clerk.expected_issuer(),
            ))
        } else {
            tracing::warn!("clerk secret key not configured; every bearer token will be rejected");
            None
        };

        Ok(Self::from_parts(db, jwks, FunctionSettings::from_config(config)))
    }

    #[must_use]
    pub const fn from_parts(
        db: AstralDb,
        jwks: Option<ClerkJwks>,
        settings: FunctionSettings,
    ) -> Self {
        Self { db, jwks, settings }
    }

    /// Invocation for a remote request carrying this `Authorization` header.
    #[must_use]
    pub fn invocation(&self, authorization: Option<&str>) -> Invocation<'_> {
        Invocation::new(
            ClerkSession::new(authorization, self.jwks.clone()),
            &self.db,
            &self.settings,
            Utc::now(),
        )
    }

    /// Invocation with an explicit identity source and clock, for trusted
    /// internal callers and tests.
    #[must_use]
    pub fn invocation_with<'a>(
        &'a self,
        identity: impl IdentitySource + 'a,
        now: DateTime<Utc>,
    ) -> Invocation<'a> {
        Invocation::new(identity, &self.db, &self.settings, now)
    }

    /// Apply a verified identity-provider webhook body.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidEvent` for malformed bodies and
    /// `BackendError::Database` for failed writes.
    pub async fn handle_provider_event(&self, body: &str) -> Result<EventOutcome, BackendError> {
        let event = provisioning::parse_event(body)?;
        tracing::debug!(event_type = %event.event_type, "applying provider event");
        provisioning::apply_event(&self.db, &self.settings, &event, Utc::now()).await
    }

    #[must_use]
    pub const fn db(&self) -> &AstralDb {
        &self.db
    }

    #[must_use]
    pub const fn settings(&self) -> &FunctionSettings {
        &self.settings
    }
}

/// Everything one backend function call may touch.
///
/// The database is only reachable from inside this crate, and every function
/// here passes through [`Invocation::gate`] before using it.
pub struct Invocation<'a> {
    identity: Box<dyn IdentitySource + 'a>,
    db: &'a AstralDb,
    settings: &'a FunctionSettings,
    now: DateTime<Utc>,
}

impl<'a> Invocation<'a> {
    pub fn new(
        identity: impl IdentitySource + 'a,
        db: &'a AstralDb,
        settings: &'a FunctionSettings,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            identity: Box::new(identity),
            db,
            settings,
            now,
        }
    }

    /// The identity gate over this call's capabilities.
    #[must_use]
    pub fn gate(&self) -> IdentityGate<'_> {
        IdentityGate::new(self.identity.as_ref(), self.db)
    }

    /// Wall-clock time captured when the invocation was created.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    #[must_use]
    pub const fn settings(&self) -> &FunctionSettings {
        self.settings
    }

    pub(crate) const fn db(&self) -> &'a AstralDb {
        self.db
    }
}
