use std::path::PathBuf;
use std::time::Duration;

use homedesign::config::AppConfig;
use homedesign::generator::{DesignError, generate_design};
use homedesign::unsplash::{ImageError, fetch_reference_image};
use httpmock::prelude::*;
use serde_json::json;

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        google_api_key: Some("google-key".to_string()),
        unsplash_access_key: Some("unsplash-key".to_string()),
        model: "gemini-test".to_string(),
        gemini_base_url: server.base_url(),
        unsplash_base_url: server.base_url(),
        request_timeout: Duration::from_secs(5),
        export_dir: PathBuf::from("."),
    }
}

#[tokio::test]
async fn generator_returns_model_text() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-test:generateContent")
                .header("x-goog-api-key", "google-key")
                .json_body(json!({"contents": [{"parts": [{"text": "Design a cabin"}]}]}));
            then.status(200).json_body(json!({
                "candidates": [{"content": {"parts": [{"text": "A timber cabin."}], "role": "model"}}]
            }));
        })
        .await;
    let config = config_for(&server);
    let client = config.http_client().unwrap();

    let plan = generate_design(&client, &config, "Design a cabin").await.unwrap();
    assert_eq!(plan.text, "A timber cabin.");
    mock.assert_async().await;
}

#[tokio::test]
async fn generator_reports_api_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(400).json_body(json!({
                "error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}
            }));
        })
        .await;
    let config = config_for(&server);
    let client = config.http_client().unwrap();

    let err = generate_design(&client, &config, "").await.unwrap_err();
    match err {
        DesignError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid. Please pass a valid API key.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn generator_handles_malformed_and_empty_bodies() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1beta/models/gemini-test:generateContent");
            then.status(200).body("<html>oops</html>");
        })
        .await;
    let config = config_for(&server);
    let client = config.http_client().unwrap();
    let err = generate_design(&client, &config, "prompt").await.unwrap_err();
    assert!(matches!(err, DesignError::Malformed(_)));

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({"candidates": []}));
        })
        .await;
    let config = config_for(&server);
    let err = generate_design(&client, &config, "prompt").await.unwrap_err();
    assert!(matches!(err, DesignError::EmptyResponse));
}

#[tokio::test]
async fn generator_fails_on_unreachable_host() {
    let mut config = config_for(&MockServer::start_async().await);
    config.gemini_base_url = "http://127.0.0.1:9".to_string();
    config.request_timeout = Duration::from_secs(2);
    let client = config.http_client().unwrap();
    let err = generate_design(&client, &config, "prompt").await.unwrap_err();
    assert!(matches!(err, DesignError::Transport(_)));
}

#[tokio::test]
async fn fetcher_returns_regular_url() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/photos/random")
                .query_param("query", "Minimalist")
                .query_param("client_id", "unsplash-key");
            then.status(200).json_body(json!({
                "id": "abc",
                "urls": {"raw": "https://images.example/raw", "regular": "https://images.example/regular"}
            }));
        })
        .await;
    let config = config_for(&server);
    let client = config.http_client().unwrap();

    let image = fetch_reference_image(&client, &config, "Minimalist").await.unwrap();
    assert_eq!(image.url.as_deref(), Some("https://images.example/regular"));
    mock.assert_async().await;
}

#[tokio::test]
async fn fetcher_treats_missing_field_as_absence() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/photos/random");
            then.status(200).json_body(json!({"id": "abc", "urls": {}}));
        })
        .await;
    let config = config_for(&server);
    let client = config.http_client().unwrap();

    let image = fetch_reference_image(&client, &config, "Colonial").await.unwrap();
    assert!(image.url.is_none());
}

#[tokio::test]
async fn fetcher_reports_failures() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/photos/random");
            then.status(404).json_body(json!({"errors": ["No photos found."]}));
        })
        .await;
    let config = config_for(&server);
    let client = config.http_client().unwrap();
    let err = fetch_reference_image(&client, &config, "").await.unwrap_err();
    assert!(matches!(err, ImageError::Status(404)));

    let mut config = config_for(&server);
    config.unsplash_access_key = None;
    let err = fetch_reference_image(&client, &config, "Modern").await.unwrap_err();
    assert!(matches!(err, ImageError::MissingAccessKey));
}
