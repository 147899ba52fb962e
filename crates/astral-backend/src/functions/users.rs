//! Queries about the calling user.

use astral_core::access::AccessState;
use astral_core::user::UserRecord;

use crate::context::Invocation;
use crate::error::BackendError;

/// The caller's user record, or `None` for anonymous or unprovisioned callers.
pub async fn current(inv: &Invocation<'_>) -> Result<Option<UserRecord>, BackendError> {
    Ok(inv.gate().authenticate_optional().await?)
}

/// The caller's user record; anonymous and unknown callers are refused.
pub async fn current_or_throw(inv: &Invocation<'_>) -> Result<UserRecord, BackendError> {
    Ok(inv.gate().authenticate().await?)
}

/// Plan and trial access for the caller.
pub async fn access(inv: &Invocation<'_>) -> Result<AccessState, BackendError> {
    let user = inv.gate().authenticate().await?;
    Ok(user.access(&inv.settings().paid_plans, inv.now()))
}
