//! User repository: lookup by subject and provisioning writes.

use astral_core::access::PLAN_TRIAL;
use astral_core::ids::PREFIX_USER;
use astral_core::user::{UserAttributes, UserRecord};
use chrono::{DateTime, Utc};

use crate::AstralDb;
use crate::error::DatabaseError;
use crate::helpers::{from_optional_unix, get_opt_string, parse_datetime, parse_enum};

const USER_COLUMNS: &str =
    "id, name, clerk_id, plan, role, trial_ends_at, created_at, updated_at";

fn row_to_user(row: &libsql::Row) -> Result<UserRecord, DatabaseError> {
    let role = get_opt_string(row, 4)?
        .map(|s| parse_enum(&s))
        .transpose()?;
    Ok(UserRecord {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        clerk_id: row.get::<String>(2)?,
        plan: get_opt_string(row, 3)?,
        role,
        trial_ends_at: from_optional_unix(row.get::<Option<i64>>(5)?)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl AstralDb {
    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Duplicate` if a user with the same `clerk_id`
    /// already exists.
    pub async fn insert_user(&self, attrs: &UserAttributes) -> Result<UserRecord, DatabaseError> {
        let id = self.generate_id(PREFIX_USER).await?;
        self.conn()
            .execute(
                "INSERT INTO users (id, name, clerk_id, plan, role, trial_ends_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    id.as_str(),
                    attrs.name.as_str(),
                    attrs.clerk_id.as_str(),
                    attrs.plan.as_deref(),
                    attrs.role.map(|r| r.as_str()),
                    attrs.trial_ends_at.map(|dt| dt.timestamp())
                ],
            )
            .await
            .map_err(|e| {
                if DatabaseError::is_unique_violation(&e) {
                    DatabaseError::Duplicate {
                        entity: "user".into(),
                        key: attrs.clerk_id.clone(),
                    }
                } else {
                    DatabaseError::LibSql(e)
                }
            })?;
        tracing::info!(user_id = %id, clerk_id = %attrs.clerk_id, "user created");
        self.get_user(&id).await?.ok_or(DatabaseError::NoResult)
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Exact-match lookup through the unique `clerk_id` index.
    pub async fn user_by_clerk_id(
        &self,
        clerk_id: &str,
    ) -> Result<Option<UserRecord>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE clerk_id = ?1"),
                [clerk_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Create or refresh a user from identity-provider attributes.
    ///
    /// `name` is always overwritten. `plan`, `role` and `trial_ends_at` are
    /// only overwritten when the provider sent a value, so locally assigned
    /// trials survive later profile updates.
    pub async fn upsert_user_from_provider(
        &self,
        attrs: &UserAttributes,
    ) -> Result<UserRecord, DatabaseError> {
        let id = self.generate_id(PREFIX_USER).await?;
        self.conn()
            .execute(
                "INSERT INTO users (id, name, clerk_id, plan, role, trial_ends_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(clerk_id) DO UPDATE SET
                   name = excluded.name,
                   plan = COALESCE(excluded.plan, users.plan),
                   role = COALESCE(excluded.role, users.role),
                   trial_ends_at = COALESCE(excluded.trial_ends_at, users.trial_ends_at),
                   updated_at = datetime('now')",
                libsql::params![
                    id.as_str(),
                    attrs.name.as_str(),
                    attrs.clerk_id.as_str(),
                    attrs.plan.as_deref(),
                    attrs.role.map(|r| r.as_str()),
                    attrs.trial_ends_at.map(|dt| dt.timestamp())
                ],
            )
            .await?;
        tracing::debug!(clerk_id = %attrs.clerk_id, "user upserted from provider");
        self.user_by_clerk_id(&attrs.clerk_id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// Delete the user with this subject. Returns whether a row was removed.
    pub async fn delete_user_by_clerk_id(&self, clerk_id: &str) -> Result<bool, DatabaseError> {
        let affected = self
            .conn()
            .execute("DELETE FROM users WHERE clerk_id = ?1", [clerk_id])
            .await?;
        Ok(affected > 0)
    }

    /// Set the plan slug. Returns `false` if no user has this subject.
    pub async fn set_plan_by_clerk_id(
        &self,
        clerk_id: &str,
        plan: &str,
    ) -> Result<bool, DatabaseError> {
        let affected = self
            .conn()
            .execute(
                "UPDATE users SET plan = ?2, updated_at = datetime('now') WHERE clerk_id = ?1",
                libsql::params![clerk_id, plan],
            )
            .await?;
        Ok(affected > 0)
    }

    /// Put the user on a trial ending at `ends_at`. Returns `false` if no user
    /// has this subject.
    pub async fn set_trial_by_clerk_id(
        &self,
        clerk_id: &str,
        ends_at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let affected = self
            .conn()
            .execute(
                "UPDATE users SET plan = ?2, trial_ends_at = ?3, updated_at = datetime('now')
                 WHERE clerk_id = ?1",
                libsql::params![clerk_id, PLAN_TRIAL, ends_at.timestamp()],
            )
            .await?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use astral_core::enums::Role;
    use pretty_assertions::assert_eq;

    use super::*;

    async fn test_db() -> AstralDb {
        AstralDb::open_local(":memory:").await.unwrap()
    }

    fn whole_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
        DateTime::from_timestamp(dt.timestamp(), 0).unwrap()
    }

    #[tokio::test]
    async fn insert_and_lookup_by_clerk_id() {
        let db = test_db().await;
        let created = db
            .insert_user(&UserAttributes::new("Ada Lovelace", "user_ada").with_role(Role::Student))
            .await
            .unwrap();
        assert!(astral_core::ids::has_prefix(&created.id, PREFIX_USER));

        let found = db.user_by_clerk_id("user_ada").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.role, Some(Role::Student));
        assert!(found.plan.is_none());
    }

    #[tokio::test]
    async fn lookup_is_exact_match() {
        let db = test_db().await;
        db.insert_user(&UserAttributes::new("A", "user_12")).await.unwrap();
        db.insert_user(&UserAttributes::new("B", "user_1234")).await.unwrap();
        assert!(db.user_by_clerk_id("user_123").await.unwrap().is_none());
        assert!(db.user_by_clerk_id("USER_12").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_clerk_id_rejected() {
        let db = test_db().await;
        db.insert_user(&UserAttributes::new("First", "user_dup")).await.unwrap();
        let err = db
            .insert_user(&UserAttributes::new("Second", "user_dup"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate { ref key, .. } if key == "user_dup"));

        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM users WHERE clerk_id = 'user_dup'", ())
            .await
            .unwrap();
        let count = rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn upsert_creates_then_updates_single_row() {
        let db = test_db().await;
        let first = db
            .upsert_user_from_provider(&UserAttributes::new("Old Name", "user_up"))
            .await
            .unwrap();
        let second = db
            .upsert_user_from_provider(
                &UserAttributes::new("New Name", "user_up").with_role(Role::Teacher),
            )
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "New Name");
        assert_eq!(second.role, Some(Role::Teacher));
    }

    #[tokio::test]
    async fn upsert_keeps_local_trial_when_provider_sends_none() {
        let db = test_db().await;
        db.upsert_user_from_provider(&UserAttributes::new("Trial", "user_trial"))
            .await
            .unwrap();
        let ends = whole_seconds(Utc::now() + chrono::TimeDelta::days(7));
        assert!(db.set_trial_by_clerk_id("user_trial", ends).await.unwrap());

        let refreshed = db
            .upsert_user_from_provider(&UserAttributes::new("Trial Renamed", "user_trial"))
            .await
            .unwrap();
        assert_eq!(refreshed.plan.as_deref(), Some(PLAN_TRIAL));
        assert_eq!(refreshed.trial_ends_at, Some(ends));
        assert_eq!(refreshed.name, "Trial Renamed");
    }

    #[tokio::test]
    async fn plan_and_trial_updates_report_missing_users() {
        let db = test_db().await;
        assert!(!db.set_plan_by_clerk_id("user_ghost", "premium").await.unwrap());
        assert!(!db.set_trial_by_clerk_id("user_ghost", Utc::now()).await.unwrap());

        db.insert_user(&UserAttributes::new("Payer", "user_pay")).await.unwrap();
        assert!(db.set_plan_by_clerk_id("user_pay", "premium").await.unwrap());
        let user = db.user_by_clerk_id("user_pay").await.unwrap().unwrap();
        assert_eq!(user.plan.as_deref(), Some("premium"));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let db = test_db().await;
        db.insert_user(&UserAttributes::new("Gone", "user_gone")).await.unwrap();
        assert!(db.delete_user_by_clerk_id("user_gone").await.unwrap());
        assert!(!db.delete_user_by_clerk_id("user_gone").await.unwrap());
        assert!(db.user_by_clerk_id("user_gone").await.unwrap().is_none());
    }
}
