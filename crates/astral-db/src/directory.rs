//! [`UserDirectory`] backed by the users table.

use astral_core::errors::CoreError;
use astral_core::ports::UserDirectory;
use astral_core::user::UserRecord;
use async_trait::async_trait;

use crate::AstralDb;

#[async_trait]
impl UserDirectory for AstralDb {
    async fn user_by_subject(&self, subject: &str) -> Result<Option<UserRecord>, CoreError> {
        self.user_by_clerk_id(subject)
            .await
            .map_err(|e| CoreError::Other(anyhow::Error::new(e)))
    }
}
