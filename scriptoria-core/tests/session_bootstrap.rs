//! Session restore and name registration.

use scriptoria_core::testing::{sample_artifacts, Endpoint, MockBackend, MockReply, TestHarness};
use scriptoria_core::{ArtifactKey, NavOutcome, SessionError, StatusIndicator, ValidationError};

#[tokio::test]
async fn test_restore_unlocks_and_targets_first_artifact() {
    let backend = MockBackend::new()
        .with_user("Ada")
        .with_saved_results(sample_artifacts());
    let mut harness = TestHarness::with_backend(backend);

    assert!(harness.session.bootstrap().await);

    assert_eq!(harness.session.greeting(), "Ada");
    assert_eq!(harness.session.store().len(), 5);
    assert_eq!(
        harness.session.status(),
        &StatusIndicator::Active("Ready".to_string())
    );
    assert_eq!(
        harness.session.export_panel().map(|p| p.current),
        Some(ArtifactKey::Screenplay)
    );
    assert_eq!(
        harness.session.select(ArtifactKey::ShotList),
        NavOutcome::Activated { first_render: true }
    );
}

#[tokio::test]
async fn test_no_user_skips_results_lookup() {
    let mut harness = TestHarness::new();

    assert!(!harness.session.bootstrap().await);
    assert_eq!(harness.backend.calls(Endpoint::GetUser), 1);
    assert_eq!(harness.backend.calls(Endpoint::GetResults), 0);
    assert_eq!(harness.session.greeting(), "Director");
    assert_eq!(harness.session.status(), &StatusIndicator::Idle);
}

#[tokio::test]
async fn test_known_user_without_results_stays_locked() {
    let mut harness = TestHarness::with_backend(MockBackend::new().with_user("Grace"));

    assert!(!harness.session.bootstrap().await);
    assert_eq!(harness.session.user_name(), Some("Grace"));
    assert!(harness.session.navigator().is_locked(ArtifactKey::Screenplay));
}

#[tokio::test]
async fn test_bootstrap_errors_are_swallowed() {
    let backend = MockBackend::new()
        .with_reply(Endpoint::GetUser, MockReply::Network("connection refused".into()));
    let mut harness = TestHarness::with_backend(backend);
    assert!(!harness.session.bootstrap().await);
    assert!(harness.notices().is_empty());

    let backend = MockBackend::new()
        .with_user("Ada")
        .with_reply(Endpoint::GetResults, MockReply::fail(500, "cache offline"));
    let mut harness = TestHarness::with_backend(backend);
    assert!(!harness.session.bootstrap().await);
    assert!(harness.notices().is_empty());
    assert!(harness.session.store().is_empty());
}

#[tokio::test]
async fn test_enter_name() {
    let mut harness = TestHarness::new();

    let err = harness.session.enter_name("   ").await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::EmptyName)
    ));
    assert_eq!(harness.backend.calls(Endpoint::SetUser), 0);
    harness.notices();

    let stored = harness.session.enter_name("  Orson  ").await.unwrap();
    assert_eq!(stored, "Orson");
    assert_eq!(harness.session.greeting(), "Orson");
}

#[tokio::test]
async fn test_enter_name_failure_notice() {
    let backend = MockBackend::new().with_reply(Endpoint::SetUser, MockReply::fail(500, "db down"));
    let mut harness = TestHarness::with_backend(backend);

    assert!(harness.session.enter_name("Orson").await.is_err());
    assert_eq!(
        harness.notices(),
        vec!["Could not save name. Please try again.".to_string()]
    );
    assert_eq!(harness.session.greeting(), "Director");
}
