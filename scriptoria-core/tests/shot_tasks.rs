//! Storyboard image task tests.

use std::time::Duration;

use scriptoria_core::testing::{Endpoint, MockBackend, MockReply, TestHarness, SAMPLE_STORY};
use scriptoria_core::{SessionError, ShotAction, ShotStage, ShotStatus, ValidationError};

fn drain(harness: &mut TestHarness) {
    while let Some(event) = harness.session.try_next_event() {
        harness.session.handle(event);
    }
}

/// A harness whose store already holds the sample package.
async fn generated(backend: MockBackend) -> TestHarness {
    let mut harness = TestHarness::with_backend(backend);
    harness.generate(SAMPLE_STORY).await.unwrap();
    harness.notices();
    harness
}

fn stage(status: ShotStatus) -> Option<ShotStage> {
    match status {
        ShotStatus::Loading { stage, .. } => Some(stage),
        _ => None,
    }
}

#[tokio::test(start_paused = true)]
async fn test_shots_segmented_from_store() {
    let harness = generated(MockBackend::new()).await;
    let shots = harness.session.shots();
    assert_eq!(shots.len(), 3);
    assert!(shots[0].starts_with("SHOT 1:"));
    assert!(shots[2].starts_with("SHOT 3:"));
}

#[tokio::test(start_paused = true)]
async fn test_shots_load_concurrently() {
    let backend =
        MockBackend::new().with_delay(Endpoint::GenerateShotImage, Duration::from_secs(10));
    let mut harness = generated(backend).await;

    for index in 0..3 {
        assert!(harness.session.generate_shot(index).unwrap().is_some());
    }
    assert_eq!(harness.session.shot_board().loading_count(), 3);
    assert!(!harness.session.is_generating());

    harness.session.settle().await;
    for index in 0..3 {
        assert!(matches!(
            harness.session.shot_status(index),
            ShotStatus::Success { .. }
        ));
        assert_eq!(
            harness.session.shot_board().action(index),
            Some(ShotAction::Regenerate)
        );
    }
    assert_eq!(
        harness.backend.payloads(Endpoint::GenerateShotImage),
        harness.session.shots()
    );
}

#[tokio::test(start_paused = true)]
async fn test_stage_animation_advances_and_holds() {
    let backend =
        MockBackend::new().with_delay(Endpoint::GenerateShotImage, Duration::from_secs(10));
    let mut harness = generated(backend).await;
    harness.session.generate_shot(1).unwrap();
    assert_eq!(stage(harness.session.shot_status(1)), Some(ShotStage::Analyzing));

    tokio::time::sleep(Duration::from_millis(3600)).await;
    drain(&mut harness);
    assert_eq!(
        stage(harness.session.shot_status(1)),
        Some(ShotStage::CraftingPrompt)
    );

    tokio::time::sleep(Duration::from_millis(3500)).await;
    drain(&mut harness);
    assert_eq!(stage(harness.session.shot_status(1)), Some(ShotStage::Rendering));

    tokio::time::sleep(Duration::from_millis(2800)).await;
    drain(&mut harness);
    assert_eq!(stage(harness.session.shot_status(1)), Some(ShotStage::Rendering));

    harness.session.settle().await;
    assert!(matches!(
        harness.session.shot_status(1),
        ShotStatus::Success { .. }
    ));

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert!(harness.session.try_next_event().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_success_stores_image_and_prompt() {
    let backend = MockBackend::new().with_reply(
        Endpoint::GenerateShotImage,
        MockReply::image("/static/frames/1.png", "storm-lit lighthouse, wide lens"),
    );
    let mut harness = generated(backend).await;

    harness.session.generate_shot(0).unwrap();
    harness.session.settle().await;

    assert_eq!(
        harness.session.shot_status(0),
        ShotStatus::Success {
            image_url: "/static/frames/1.png".to_string(),
            prompt: "storm-lit lighthouse, wide lens".to_string(),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_retry_after_error_reuses_description() {
    let backend = MockBackend::new()
        .with_reply(Endpoint::GenerateShotImage, MockReply::fail(503, "GPU busy"))
        .with_delay(Endpoint::GenerateShotImage, Duration::from_secs(1));
    let mut harness = generated(backend).await;

    harness.session.generate_shot(2).unwrap();
    harness.session.settle().await;
    assert_eq!(
        harness.session.shot_status(2),
        ShotStatus::Error {
            message: "GPU busy".to_string()
        }
    );
    assert_eq!(harness.session.shot_board().action(2), Some(ShotAction::Retry));

    harness.session.retry_shot(2).unwrap();
    assert_eq!(stage(harness.session.shot_status(2)), Some(ShotStage::Analyzing));
    assert_eq!(harness.session.shot_board().action(2), None);

    harness.session.settle().await;
    assert!(matches!(
        harness.session.shot_status(2),
        ShotStatus::Success { .. }
    ));

    let payloads = harness.backend.payloads(Endpoint::GenerateShotImage);
    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[0], payloads[1]);
}

#[tokio::test(start_paused = true)]
async fn test_error_without_message_uses_fallback() {
    let backend = MockBackend::new().with_reply(
        Endpoint::GenerateShotImage,
        MockReply::Fail {
            status: 500,
            message: None,
        },
    );
    let mut harness = generated(backend).await;

    harness.session.generate_shot(0).unwrap();
    harness.session.settle().await;
    assert_eq!(
        harness.session.shot_status(0),
        ShotStatus::Error {
            message: "Image generation failed".to_string()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_same_shot_cannot_reenter_while_loading() {
    let backend =
        MockBackend::new().with_delay(Endpoint::GenerateShotImage, Duration::from_secs(5));
    let mut harness = generated(backend).await;

    assert!(harness.session.generate_shot(0).unwrap().is_some());
    assert!(harness.session.generate_shot(0).unwrap().is_none());
    harness.session.settle().await;

    assert_eq!(harness.backend.calls(Endpoint::GenerateShotImage), 1);
}

#[tokio::test(start_paused = true)]
async fn test_regeneration_resets_tasks_and_ignores_late_images() {
    let backend =
        MockBackend::new().with_delay(Endpoint::GenerateShotImage, Duration::from_secs(10));
    let mut harness = generated(backend).await;

    harness.session.generate_shot(0).unwrap();
    assert!(harness.session.shot_status(0).is_loading());

    harness.generate(SAMPLE_STORY).await.unwrap();
    assert_eq!(harness.session.shot_status(0), ShotStatus::Idle);

    tokio::time::sleep(Duration::from_secs(15)).await;
    let mut applied = Vec::new();
    while let Some(event) = harness.session.try_next_event() {
        applied.push(harness.session.handle(event));
    }
    assert!(applied.iter().all(|a| !a));
    assert_eq!(harness.session.shot_status(0), ShotStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_shot_is_rejected() {
    let mut harness = generated(MockBackend::new()).await;
    let err = harness.session.generate_shot(99).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::UnknownShot(99))
    ));
    assert!(matches!(
        harness.session.retry_shot(1),
        Err(SessionError::Validation(ValidationError::UnknownShot(1)))
    ));
    assert_eq!(harness.backend.calls(Endpoint::GenerateShotImage), 0);
}
