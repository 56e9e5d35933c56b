//! Navigation locking and export dispatch.

use scriptoria_core::testing::{Endpoint, MockBackend, MockReply, TestHarness, SAMPLE_STORY};
use scriptoria_core::{
    ArtifactKey, ExportFormat, NavOutcome, SessionConfig, SessionError, ValidationError, View,
};

fn harness_in(dir: &std::path::Path, backend: MockBackend) -> TestHarness {
    TestHarness::with_config(backend, SessionConfig::new(dir))
}

// =============================================================================
// NAVIGATION
// =============================================================================

#[tokio::test]
async fn test_locked_views_cannot_be_selected() {
    let mut harness = TestHarness::new();

    for key in ArtifactKey::ALL {
        assert_eq!(harness.session.select(key), NavOutcome::Locked);
    }
    assert_eq!(harness.session.active_view(), View::Input);
    assert!(harness.session.store().is_empty());
    assert_eq!(harness.session.export_panel(), None);
}

#[tokio::test]
async fn test_input_view_is_always_reachable() {
    let mut harness = TestHarness::new();
    harness.session.go_to_input();
    assert_eq!(harness.session.active_view(), View::Input);
    assert!(harness.session.take_focus_request());

    harness.generate(SAMPLE_STORY).await.unwrap();
    harness.session.select(ArtifactKey::Characters);
    harness.session.go_to_input();
    assert_eq!(harness.session.active_view(), View::Input);
    assert!(harness.session.take_focus_request());
}

#[tokio::test]
async fn test_selecting_view_renders_once_and_retargets_export() {
    let mut harness = TestHarness::new();
    harness.generate(SAMPLE_STORY).await.unwrap();

    assert_eq!(
        harness.session.select(ArtifactKey::SoundDesign),
        NavOutcome::Activated { first_render: true }
    );
    assert_eq!(
        harness.session.select(ArtifactKey::SoundDesign),
        NavOutcome::Activated {
            first_render: false
        }
    );

    let panel = harness.session.export_panel().unwrap();
    assert_eq!(panel.current, ArtifactKey::SoundDesign);
    assert_eq!(panel.available, ArtifactKey::ALL.to_vec());

    let rendered = harness.session.rendered(ArtifactKey::SoundDesign).unwrap();
    assert_eq!(rendered.icon, "🎵");
    assert_eq!(rendered.word_count_label(), "12 words generated");
}

// =============================================================================
// EXPORT
// =============================================================================

#[tokio::test]
async fn test_export_without_content_sends_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut harness = harness_in(dir.path(), MockBackend::new());

    let err = harness
        .session
        .export(ArtifactKey::Screenplay, ExportFormat::Pdf)
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::MissingArtifact(ArtifactKey::Screenplay))
    ));

    harness.session.settle().await;
    assert_eq!(harness.backend.calls(Endpoint::Export), 0);
    assert_eq!(
        harness.notices(),
        vec!["No content to export. Please generate first.".to_string()]
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_export_writes_document_with_deterministic_name() {
    let dir = tempfile::tempdir().unwrap();
    let backend = MockBackend::new()
        .with_reply(Endpoint::Export, MockReply::Document(b"%PDF-1.4 fake".to_vec()));
    let mut harness = harness_in(dir.path(), backend);
    harness.generate(SAMPLE_STORY).await.unwrap();
    harness.notices();

    harness
        .session
        .export(ArtifactKey::Screenplay, ExportFormat::Pdf)
        .unwrap();
    harness.session.settle().await;

    let path = dir.path().join("scriptoria_screenplay.pdf");
    assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4 fake");
    assert_eq!(harness.session.last_export(), Some(&Ok(path)));
    assert_eq!(
        harness.notices(),
        vec![
            "Preparing PDF download...".to_string(),
            "PDF downloaded!".to_string()
        ]
    );
    assert_eq!(
        harness.backend.payloads(Endpoint::Export),
        vec![harness.session.store().get(ArtifactKey::Screenplay).unwrap().to_string()]
    );
}

#[tokio::test]
async fn test_export_current_follows_selected_view() {
    let dir = tempfile::tempdir().unwrap();
    let mut harness = harness_in(dir.path(), MockBackend::new());
    harness.generate(SAMPLE_STORY).await.unwrap();

    harness.session.select(ArtifactKey::ShotList);
    harness.session.export_current(ExportFormat::Txt).unwrap();
    harness.session.settle().await;

    let written = std::fs::read_to_string(dir.path().join("scriptoria_shot_list.txt")).unwrap();
    assert!(written.starts_with("SHOT 1:"));
}

#[tokio::test]
async fn test_export_failure_reports_message() {
    let dir = tempfile::tempdir().unwrap();
    let backend = MockBackend::new()
        .with_reply(Endpoint::Export, MockReply::fail(500, "Renderer crashed"))
        .with_reply(
            Endpoint::Export,
            MockReply::Fail {
                status: 500,
                message: None,
            },
        );
    let mut harness = harness_in(dir.path(), backend);
    harness.generate(SAMPLE_STORY).await.unwrap();
    harness.notices();

    harness
        .session
        .export(ArtifactKey::Characters, ExportFormat::Docx)
        .unwrap();
    harness.session.settle().await;
    harness
        .session
        .export(ArtifactKey::Characters, ExportFormat::Docx)
        .unwrap();
    harness.session.settle().await;

    assert_eq!(
        harness.notices(),
        vec![
            "Preparing DOCX download...".to_string(),
            "Export failed: Renderer crashed".to_string(),
            "Preparing DOCX download...".to_string(),
            "Export failed: Export failed".to_string(),
        ]
    );
    assert!(!dir.path().join("scriptoria_characters.docx").exists());
}
