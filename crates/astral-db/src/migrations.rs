//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! database open. All statements use `IF NOT EXISTS` for idempotent re-running.

use crate::AstralDb;
use crate::error::DatabaseError;

/// Users table and its unique subject index.
const MIGRATION_001: &str = include_str!("../migrations/001_users.sql");
/// Meetings table and its start-time index.
const MIGRATION_002: &str = include_str!("../migrations/002_meetings.sql");

impl AstralDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_users: {e}")))?;
        self.conn
            .execute_batch(MIGRATION_002)
            .await
            .map_err(|e| DatabaseError::Migration(format!("002_meetings: {e}")))?;
        Ok(())
    }
}
