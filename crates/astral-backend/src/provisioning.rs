//! User provisioning from identity-provider (Clerk) webhook events.
//!
//! The HTTP endpoint that receives and verifies webhooks lives outside this
//! crate; it hands the verified JSON body to [`parse_event`] and
//! [`apply_event`]. Replaying a user event updates the same row; the default
//! trial is only granted when `user.created` inserts a new user.

use astral_core::access::PLAN_FREE;
use astral_core::enums::Role;
use astral_core::user::UserAttributes;
use astral_db::AstralDb;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::context::FunctionSettings;
use crate::error::BackendError;

/// Unix timestamps below this are treated as non-timestamps when they arrive
/// as numeric strings.
const MIN_UNIX_SECONDS: i64 = 1_000_000_000;

/// Webhook envelope as sent by Clerk.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
}

/// Clerk user object, reduced to the fields provisioning reads.
#[derive(Debug, Clone, Deserialize)]
struct ProviderUser {
    id: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    public_metadata: Value,
}

#[derive(Debug, Clone, Deserialize)]
struct DeletedObject {
    id: Option<String>,
}

/// What applying an event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// User row created or refreshed. `trial_started` is set when a newly
    /// inserted user without a plan was put on the default trial.
    Upserted { user_id: String, trial_started: bool },
    /// `existed` is false when the user was already gone.
    Deleted { existed: bool },
    /// `applied` is false when no user matched the payer.
    PlanChanged { plan: String, applied: bool },
    /// Event type not handled, or subscription event without payer/plan.
    Ignored,
}

/// Parse a verified webhook body.
///
/// # Errors
///
/// Returns `BackendError::InvalidEvent` if the body is not a JSON event envelope.
pub fn parse_event(body: &str) -> Result<ProviderEvent, BackendError> {
    serde_json::from_str(body).map_err(|e| BackendError::InvalidEvent(e.to_string()))
}

/// Apply one provider event to the users table.
///
/// # Errors
///
/// Returns `BackendError::InvalidEvent` for a user event without an id, or
/// `BackendError::Database` if a write fails.
pub async fn apply_event(
    db: &AstralDb,
    settings: &FunctionSettings,
    event: &ProviderEvent,
    now: DateTime<Utc>,
) -> Result<EventOutcome, BackendError> {
    match event.event_type.as_str() {
        "user.created" | "user.updated" => {
            let user: ProviderUser = serde_json::from_value(event.data.clone())
                .map_err(|e| BackendError::InvalidEvent(format!("{}: {e}", event.event_type)))?;
            let attrs = attributes_from_provider(&user);
            let existed = db.user_by_clerk_id(&attrs.clerk_id).await?.is_some();
            let record = db.upsert_user_from_provider(&attrs).await?;

            let needs_trial = event.event_type == "user.created"
                && !existed
                && attrs.plan.as_deref().is_none_or(|p| p == PLAN_FREE)
                && !has_trial_hint(&user.public_metadata);
            if needs_trial {
                let ends_at = now
                    .checked_add_signed(settings.trial_length)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
                db.set_trial_by_clerk_id(&attrs.clerk_id, ends_at).await?;
                tracing::info!(user_id = %record.id, %ends_at, "trial started for new user");
            }
            Ok(EventOutcome::Upserted {
                user_id: record.id,
                trial_started: needs_trial,
            })
        }
        "user.deleted" => {
            let deleted: DeletedObject = serde_json::from_value(event.data.clone())
                .map_err(|e| BackendError::InvalidEvent(format!("user.deleted: {e}")))?;
            let id = deleted
                .id
                .ok_or_else(|| BackendError::InvalidEvent("user.deleted without id".into()))?;
            let existed = db.delete_user_by_clerk_id(&id).await?;
            if existed {
                tracing::info!(clerk_id = %id, "user deleted");
            } else {
                tracing::debug!(clerk_id = %id, "delete for unknown user ignored");
            }
            Ok(EventOutcome::Deleted { existed })
        }
        "subscription.created"
        | "subscription.updated"
        | "subscription.active"
        | "subscription.past_due" => {
            let payer = event.data.get("payer_id").and_then(Value::as_str);
            let plan = event
                .data
                .get("items")
                .and_then(|items| items.get(0))
                .and_then(|item| item.pointer("/plan/slug"))
                .and_then(Value::as_str);
            let (Some(payer), Some(plan)) = (payer, plan) else {
                tracing::debug!(event_type = %event.event_type, "subscription event without payer or plan");
                return Ok(EventOutcome::Ignored);
            };
            let applied = db.set_plan_by_clerk_id(payer, plan).await?;
            tracing::info!(clerk_id = %payer, plan, applied, "plan updated from subscription");
            Ok(EventOutcome::PlanChanged {
                plan: plan.to_string(),
                applied,
            })
        }
        other => {
            tracing::debug!(event_type = other, "unhandled provider event ignored");
            Ok(EventOutcome::Ignored)
        }
    }
}

fn attributes_from_provider(user: &ProviderUser) -> UserAttributes {
    let meta = &user.public_metadata;
    UserAttributes {
        name: display_name(user),
        clerk_id: user.id.clone(),
        plan: meta
            .get("plan")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .map(String::from),
        role: meta.get("role").and_then(|raw| parse_role(&user.id, raw)),
        trial_ends_at: meta.get("trialEndsAt").and_then(coerce_trial_ends_at),
    }
}

/// `"{first} {last}"` from the present parts, then username, then the subject.
fn display_name(user: &ProviderUser) -> String {
    let parts: Vec<&str> = [user.first_name.as_deref(), user.last_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if !parts.is_empty() {
        return parts.join(" ");
    }
    user.username
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| user.id.clone(), String::from)
}

fn parse_role(clerk_id: &str, raw: &Value) -> Option<Role> {
    if raw.is_null() {
        return None;
    }
    match serde_json::from_value::<Role>(raw.clone()) {
        Ok(role) => Some(role),
        Err(_) => {
            tracing::warn!(clerk_id, role = %raw, "ignoring unrecognised role in provider metadata");
            None
        }
    }
}

fn has_trial_hint(meta: &Value) -> bool {
    match meta.get("trialEndsAt") {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v.abs() > 0.0),
        Some(_) => true,
    }
}

/// Accept unix seconds as a number, a numeric string above
/// [`MIN_UNIX_SECONDS`], an RFC 3339 timestamp, or a `YYYY-MM-DD` date.
fn coerce_trial_ends_at(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::Number(n) => {
            let secs = n.as_i64().or_else(|| n.as_f64().and_then(whole_seconds))?;
            DateTime::from_timestamp(secs, 0)
        }
        Value::String(s) => {
            let s = s.trim();
            if let Some(secs) = numeric_seconds(s) {
                if secs > MIN_UNIX_SECONDS {
                    return DateTime::from_timestamp(secs, 0);
                }
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        _ => None,
    }
}

/// Truncate fractional JSON seconds. Out-of-range values saturate and are
/// then rejected by `DateTime::from_timestamp`.
#[allow(clippy::cast_possible_truncation)]
fn whole_seconds(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.floor() as i64)
}

/// Whole seconds from a decimal string such as `"1800000000"` or
/// `"1800000000.25"`.
fn numeric_seconds(s: &str) -> Option<i64> {
    let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    whole.parse().ok()
}
