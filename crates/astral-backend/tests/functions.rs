use astral_auth::{GateError, StaticIdentity};
use astral_backend::functions::{meetings, users};
use astral_backend::{Backend, BackendError, FunctionSettings};
use astral_core::enums::Role;
use astral_core::meeting::{MeetingPatch, NewMeeting};
use astral_core::user::UserAttributes;
use astral_db::AstralDb;
use chrono::{DateTime, TimeDelta, Utc};
use pretty_assertions::assert_eq;

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_800_000_000, 0).unwrap()
}

async fn backend() -> Backend {
    let db = AstralDb::open_local(":memory:").await.unwrap();
    Backend::from_parts(db, None, FunctionSettings::default())
}

async fn seed(backend: &Backend, attrs: UserAttributes) -> String {
    backend.db().insert_user(&attrs).await.unwrap().id
}

fn new_meeting(title: &str, start: DateTime<Utc>, published: bool) -> NewMeeting {
    NewMeeting {
        title: title.to_string(),
        description: None,
        start_time: start,
        meeting_number: "987 654 321".to_string(),
        passcode: "orbit".to_string(),
        published,
    }
}

// Scenario 1: no identity.
#[tokio::test]
async fn anonymous_caller_is_refused() {
    let backend = backend().await;
    let inv = backend.invocation_with(StaticIdentity::anonymous(), now());

    let err = users::current_or_throw(&inv).await.unwrap_err();
    assert!(matches!(err, BackendError::Gate(GateError::AuthenticationRequired)));
    assert_eq!(err.to_string(), GateError::AuthenticationRequired.to_string());
}

// Scenario 2: identity whose subject has no record.
#[tokio::test]
async fn unknown_subject_is_refused() {
    let backend = backend().await;
    seed(&backend, UserAttributes::new("Someone Else", "usr_999")).await;
    let inv = backend.invocation_with(StaticIdentity::subject("usr_123"), now());

    let err = users::current_or_throw(&inv).await.unwrap_err();
    match err {
        BackendError::Gate(GateError::UserNotFound { subject }) => assert_eq!(subject, "usr_123"),
        other => panic!("expected UserNotFound, got {other:?}"),
    }
}

// Scenario 3: identity whose subject has exactly one record.
#[tokio::test]
async fn known_subject_resolves_to_its_record() {
    let backend = backend().await;
    let id = seed(&backend, UserAttributes::new("Ada Lovelace", "usr_123")).await;
    seed(&backend, UserAttributes::new("Someone Else", "usr_999")).await;
    let inv = backend.invocation_with(StaticIdentity::subject("usr_123"), now());

    let user = users::current_or_throw(&inv).await.unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.clerk_id, "usr_123");
    assert_eq!(user.name, "Ada Lovelace");
}

#[tokio::test]
async fn current_is_none_for_anonymous_and_unprovisioned() {
    let backend = backend().await;

    let inv = backend.invocation_with(StaticIdentity::anonymous(), now());
    assert!(users::current(&inv).await.unwrap().is_none());

    let inv = backend.invocation_with(StaticIdentity::subject("usr_404"), now());
    assert!(users::current(&inv).await.unwrap().is_none());
}

#[tokio::test]
async fn access_reflects_trial_window() {
    let backend = backend().await;
    let mut attrs = UserAttributes::new("Trial User", "usr_trial").with_plan("trial_user");
    attrs.trial_ends_at = Some(now() + TimeDelta::days(2));
    seed(&backend, attrs).await;

    let inv = backend.invocation_with(StaticIdentity::subject("usr_trial"), now());
    let state = users::access(&inv).await.unwrap();
    assert!(state.has_active_trial);
    assert!(state.has_access);
    assert!(!state.has_paid_plan);

    let later = now() + TimeDelta::days(3);
    let inv = backend.invocation_with(StaticIdentity::subject("usr_trial"), later);
    let state = users::access(&inv).await.unwrap();
    assert!(!state.has_active_trial);
    assert!(!state.has_access);
}

#[tokio::test]
async fn bearer_without_clerk_config_is_an_identity_failure() {
    let backend = backend().await;
    let inv = backend.invocation(Some("Bearer not-a-real-token"));

    let err = users::current(&inv).await.unwrap_err();
    assert!(matches!(err, BackendError::Gate(GateError::Identity(_))));
}

#[tokio::test]
async fn missing_header_is_anonymous() {
    let backend = backend().await;
    let inv = backend.invocation(None);
    assert!(users::current(&inv).await.unwrap().is_none());
}

#[tokio::test]
async fn students_cannot_create_meetings() {
    let backend = backend().await;
    seed(&backend, UserAttributes::new("Student", "usr_s").with_role(Role::Student)).await;
    let inv = backend.invocation_with(StaticIdentity::subject("usr_s"), now());

    let err = meetings::create(&inv, new_meeting("Physics", now(), true))
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Gate(GateError::Forbidden { .. })));
}

#[tokio::test]
async fn roleless_users_cannot_create_meetings() {
    let backend = backend().await;
    seed(&backend, UserAttributes::new("Nobody", "usr_n")).await;
    let inv = backend.invocation_with(StaticIdentity::subject("usr_n"), now());

    let err = meetings::create(&inv, new_meeting("Physics", now(), true))
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Gate(GateError::RoleNotSet)));
}

#[tokio::test]
async fn anonymous_create_fails_before_validation() {
    let backend = backend().await;
    let inv = backend.invocation_with(StaticIdentity::anonymous(), now());

    let err = meetings::create(&inv, new_meeting("   ", now(), true))
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Gate(GateError::AuthenticationRequired)));
}

#[tokio::test]
async fn teacher_manages_meeting_lifecycle() {
    let backend = backend().await;
    let teacher_id = seed(
        &backend,
        UserAttributes::new("Teacher", "usr_t").with_role(Role::Teacher),
    )
    .await;
    let inv = backend.invocation_with(StaticIdentity::subject("usr_t"), now());

    let err = meetings::create(&inv, new_meeting("  ", now(), true))
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Validation(_)));

    let created = meetings::create(&inv, new_meeting("Chemistry", now(), false))
        .await
        .unwrap();
    assert_eq!(created.created_by, teacher_id);
    assert!(!created.published);

    let patch = MeetingPatch {
        published: Some(true),
        ..MeetingPatch::default()
    };
    let updated = meetings::update(&inv, &created.id, patch).await.unwrap();
    assert!(updated.published);
    assert_eq!(updated.title, "Chemistry");

    meetings::remove(&inv, &created.id).await.unwrap();
    let err = meetings::remove(&inv, &created.id).await.unwrap_err();
    assert!(matches!(err, BackendError::NotFound { entity: "meeting", .. }));

    let rename = MeetingPatch {
        title: Some("Organic Chemistry".into()),
        ..MeetingPatch::default()
    };
    let err = meetings::update(&inv, "mtg-00000000", rename)
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::NotFound { .. }));
}

#[tokio::test]
async fn empty_patch_is_rejected_without_touching_the_meeting() {
    let backend = backend().await;
    seed(
        &backend,
        UserAttributes::new("Teacher", "usr_t").with_role(Role::Teacher),
    )
    .await;
    let inv = backend.invocation_with(StaticIdentity::subject("usr_t"), now());
    let created = meetings::create(&inv, new_meeting("Biology", now(), false))
        .await
        .unwrap();

    let err = meetings::update(&inv, &created.id, MeetingPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Validation(_)));

    let stored = backend.db().get_meeting(&created.id).await.unwrap().unwrap();
    assert_eq!(stored, created);
}

#[tokio::test]
async fn empty_patch_from_student_is_refused_by_the_gate_first() {
    let backend = backend().await;
    seed(&backend, UserAttributes::new("Student", "usr_s").with_role(Role::Student)).await;
    let inv = backend.invocation_with(StaticIdentity::subject("usr_s"), now());

    let err = meetings::update(&inv, "mtg-00000000", MeetingPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Gate(GateError::Forbidden { .. })));
}

#[tokio::test]
async fn listing_hides_drafts_and_join_details_from_outsiders() {
    let backend = backend().await;
    seed(
        &backend,
        UserAttributes::new("Admin", "usr_a").with_role(Role::Admin),
    )
    .await;
    seed(
        &backend,
        UserAttributes::new("Free", "usr_f")
            .with_role(Role::Student)
            .with_plan("free_user"),
    )
    .await;
    seed(
        &backend,
        UserAttributes::new("Paid", "usr_p")
            .with_role(Role::Student)
            .with_plan("premium"),
    )
    .await;

    let admin = backend.invocation_with(StaticIdentity::subject("usr_a"), now());
    meetings::create(&admin, new_meeting("Published", now() + TimeDelta::hours(1), true))
        .await
        .unwrap();
    meetings::create(&admin, new_meeting("Draft", now() + TimeDelta::hours(2), false))
        .await
        .unwrap();
    meetings::create(&admin, new_meeting("Old", now() - TimeDelta::days(1), true))
        .await
        .unwrap();

    let listed = meetings::list_upcoming(&admin).await.unwrap();
    let titles: Vec<_> = listed.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Published", "Draft"]);
    assert!(listed.iter().all(|m| m.passcode.is_some()));

    let anon = backend.invocation_with(StaticIdentity::anonymous(), now());
    let listed = meetings::list_upcoming(&anon).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Published");
    assert!(listed[0].meeting_number.is_none());

    let free = backend.invocation_with(StaticIdentity::subject("usr_f"), now());
    let listed = meetings::list_upcoming(&free).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].passcode.is_none());

    let paid = backend.invocation_with(StaticIdentity::subject("usr_p"), now());
    let listed = meetings::list_upcoming(&paid).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].passcode.as_deref(), Some("orbit"));
}

#[tokio::test]
async fn listing_includes_meetings_inside_join_window() {
    let backend = backend().await;
    seed(
        &backend,
        UserAttributes::new("Teacher", "usr_t").with_role(Role::Teacher),
    )
    .await;
    let inv = backend.invocation_with(StaticIdentity::subject("usr_t"), now());
    meetings::create(&inv, new_meeting("Started", now() - TimeDelta::minutes(30), true))
        .await
        .unwrap();

    let listed = meetings::list_upcoming(&inv).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Started");
}
