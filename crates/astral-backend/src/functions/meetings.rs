//! Live-class meetings.
//!
//! Anyone may list upcoming meetings; join details are only revealed to
//! callers with access or a staff role. Mutations are staff-only.

use astral_core::access::AccessState;
use astral_core::enums::Role;
use astral_core::meeting::{Meeting, MeetingPatch, MeetingView, NewMeeting};

use crate::context::Invocation;
use crate::error::BackendError;

const STAFF: &[Role] = &[Role::Teacher, Role::Admin];

/// Meetings starting within the join window or later, earliest first.
///
/// Non-staff callers only see published meetings.
pub async fn list_upcoming(inv: &Invocation<'_>) -> Result<Vec<MeetingView>, BackendError> {
    let caller = inv.gate().authenticate_optional().await?;

    let is_staff = caller.as_ref().is_some_and(|u| u.is_staff());
    let access = caller.as_ref().map_or_else(AccessState::none, |u| {
        u.access(&inv.settings().paid_plans, inv.now())
    });
    let since = inv
        .now()
        .checked_sub_signed(inv.settings().meeting_join_window)
        .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC);

    let meetings = inv.db().list_meetings_since(since, is_staff).await?;
    tracing::debug!(
        count = meetings.len(),
        is_staff,
        has_access = access.has_access,
        "listing upcoming meetings"
    );
    Ok(meetings
        .into_iter()
        .map(|m| m.into_view(is_staff || access.has_access))
        .collect())
}

/// Schedule a meeting. Staff only.
pub async fn create(inv: &Invocation<'_>, input: NewMeeting) -> Result<Meeting, BackendError> {
    let user = inv.gate().require_any_role(STAFF).await?;
    validate_title(&input.title)?;

    let meeting = inv.db().insert_meeting(&user.id, &input).await?;
    tracing::info!(meeting_id = %meeting.id, user_id = %user.id, "meeting created");
    Ok(meeting)
}

/// Patch a meeting. Staff only; a patch that changes nothing is rejected.
pub async fn update(
    inv: &Invocation<'_>,
    id: &str,
    patch: MeetingPatch,
) -> Result<Meeting, BackendError> {
    let user = inv.gate().require_any_role(STAFF).await?;
    if patch.is_empty() {
        return Err(BackendError::Validation("meeting patch has no fields".into()));
    }
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }

    let meeting = inv
        .db()
        .update_meeting(id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(meeting_id = %id, user_id = %user.id, "meeting updated");
    Ok(meeting)
}

/// Delete a meeting. Staff only.
pub async fn remove(inv: &Invocation<'_>, id: &str) -> Result<(), BackendError> {
    let user = inv.gate().require_any_role(STAFF).await?;
    if !inv.db().delete_meeting(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(meeting_id = %id, user_id = %user.id, "meeting removed");
    Ok(())
}

fn validate_title(title: &str) -> Result<(), BackendError> {
    if title.trim().is_empty() {
        return Err(BackendError::Validation("meeting title must not be empty".into()));
    }
    Ok(())
}

fn not_found(id: &str) -> BackendError {
    BackendError::NotFound {
        entity: "meeting",
        id: id.to_string(),
    }
}
