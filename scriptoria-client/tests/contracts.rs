//! Request/response contract tests against a mock studio backend.

use scriptoria_client::{ArtifactKey, Client, Error, ExportFormat};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> Client {
    Client::new(server.uri()).expect("client should build")
}

#[tokio::test]
async fn test_get_user_empty_name_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "" })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.get_user().await.unwrap(), None);
}

#[tokio::test]
async fn test_get_user_returns_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Ava" })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.get_user().await.unwrap().as_deref(), Some("Ava"));
}

#[tokio::test]
async fn test_set_user_posts_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/set_user"))
        .and(body_json(json!({ "name": "Ava" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "name": "Ava" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.set_user("Ava").await.unwrap(), "Ava");
}

#[tokio::test]
async fn test_set_user_rejected_by_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/set_user"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "Name is required" })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.set_user("").await.unwrap_err();
    assert_eq!(err.server_message(), Some("Name is required"));
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_generate_returns_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(body_json(json!({ "story": "A lighthouse keeper finds a map." })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "results": {
                "screenplay": "FADE IN:",
                "characters": "MARA, 40s",
                "sound_design": "Waves.",
                "script_breakdown": "Scene 1",
                "shot_list": "SHOT 1: Lighthouse"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let results = client
        .generate("A lighthouse keeper finds a map.")
        .await
        .unwrap();
    assert_eq!(results.len(), 5);
    assert_eq!(results[&ArtifactKey::ShotList], "SHOT 1: Lighthouse");
}

#[tokio::test]
async fn test_generate_error_message_is_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Story input is required" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.generate("   ").await.unwrap_err();
    assert!(matches!(err, Error::Service { status: 400, .. }));
    assert_eq!(err.to_string(), "Story input is required");
}

#[tokio::test]
async fn test_generate_without_results_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.generate("story").await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[tokio::test]
async fn test_generate_shot_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_shot_image"))
        .and(body_json(json!({ "shot_description": "SHOT 1: Wide on the pier" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "image_url": "/static/shots/1.png",
            "image_prompt": "cinematic wide shot of a pier at dusk"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let image = client
        .generate_shot_image("SHOT 1: Wide on the pier")
        .await
        .unwrap();
    assert_eq!(image.image_url, "/static/shots/1.png");
    assert_eq!(image.image_prompt, "cinematic wide shot of a pier at dusk");
}

#[tokio::test]
async fn test_export_returns_raw_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/export/shot_list/pdf"))
        .and(body_json(json!({ "content": "SHOT 1", "story": "" })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let bytes = client
        .export(ArtifactKey::ShotList, ExportFormat::Pdf, "SHOT 1", "")
        .await
        .unwrap();
    assert_eq!(bytes, b"%PDF-1.4");
}

#[tokio::test]
async fn test_export_failure_without_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/export/screenplay/docx"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .export(ArtifactKey::Screenplay, ExportFormat::Docx, "FADE IN:", "")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Status { status: 500 }));
    assert_eq!(err.user_message("Export failed"), "Export failed");
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Port 9 (discard) is essentially never listening on localhost.
    let client = Client::new("http://127.0.0.1:9").unwrap();
    let err = client.get_user().await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}
