use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use docxmart::config::AppConfig;
use docxmart::providers::{MockGenerator, MockReply};
use docxmart::server::{build_router, state::AppState};

const BOUNDARY: &str = "docxmart-test-boundary";

fn test_config(max_chunk_chars: usize) -> AppConfig {
    let mut config = AppConfig::default();
    config.chunking.max_chunk_chars = max_chunk_chars;
    config.assembly.pacing_ms = 0;
    config
}

fn app_with(generator: MockGenerator, max_chunk_chars: usize) -> Router {
    let state = AppState::with_generator(test_config(max_chunk_chars), Arc::new(generator));
    build_router(state)
}

fn app() -> Router {
    app_with(MockGenerator::new(), 3000)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

async fn create_session(app: &Router) -> String {
    let request = Request::post("/api/sessions").body(Body::empty()).unwrap();
    let (status, body) = send_json(app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

fn upload_request(session: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::post(format!("/api/sessions/{}/document", session))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn submit_request(session: &str, path: &str, body: Value) -> Request<Body> {
    Request::post(format!("/api/sessions/{}/{}", session, path))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_task_menu() {
    let app = app();
    let (status, body) =
        send_json(&app, Request::get("/api/tasks").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"].as_array().unwrap().len(), 4);
    assert_eq!(body["categories"][0]["name"], "General");
    assert_eq!(body["target_languages"].as_array().unwrap().len(), 16);
}

#[tokio::test]
async fn test_upload_and_submit() {
    let generator = MockGenerator::with_script([
        MockReply::Text("First half.".to_string()),
        MockReply::Text("Second half. User:".to_string()),
    ]);
    let app = app_with(generator, 12);
    let session = create_session(&app).await;

    let (status, upload) = send_json(
        &app,
        upload_request(&session, "notes.txt", b"first part\nsecond part"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(upload["file_type"], "txt");
    assert_eq!(upload["char_count"], 22);
    assert_eq!(upload["chunk_count"], 2);

    let (status, result) = send_json(
        &app,
        submit_request(&session, "submit", json!({"task": "Summarize a CV"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["transcript"], "First half. Second half. ");
    assert_eq!(result["chunks"], 2);
    assert!(result["failures"].as_array().unwrap().is_empty());

    let (_, state) = send_json(
        &app,
        Request::get(format!("/api/sessions/{}", session))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let messages = state["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "assistant");
    assert_eq!(messages[0]["content"], "First half. Second half. ");
    assert_eq!(state["submitting"], false);
}

#[tokio::test]
async fn test_failed_chunk_is_reported() {
    let generator = MockGenerator::with_script([
        MockReply::Fail("model overloaded".to_string()),
        MockReply::Text("Recovered.".to_string()),
    ]);
    let app = app_with(generator, 5);
    let session = create_session(&app).await;
    send(&app, upload_request(&session, "a.txt", b"aaaa\nbbbb")).await;

    let (status, result) = send_json(
        &app,
        submit_request(&session, "submit", json!({"task": "Summarize a CV"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["transcript"], "Recovered. ");
    assert_eq!(result["failures"][0]["chunk"], 1);
}

#[tokio::test]
async fn test_submit_without_document() {
    let app = app();
    let session = create_session(&app).await;

    let (status, body) = send_json(
        &app,
        submit_request(&session, "submit", json!({"task": "Summarize a CV"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "no_document");
}

#[tokio::test]
async fn test_translation_needs_target_language() {
    let app = app();
    let session = create_session(&app).await;
    send(&app, upload_request(&session, "a.txt", b"Hello there")).await;

    let (status, body) = send_json(
        &app,
        submit_request(
            &session,
            "submit",
            json!({"task": "Translate the document to another language"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request");
}

#[tokio::test]
async fn test_unsupported_upload_clears_document() {
    let app = app();
    let session = create_session(&app).await;

    let (status, _) = send(&app, upload_request(&session, "a.txt", b"keep me")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(&app, upload_request(&session, "sheet.xlsx", b"PK")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "unsupported_type");

    let (_, state) = send_json(
        &app,
        Request::get(format!("/api/sessions/{}", session))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert!(state["document"].is_null());
}

#[tokio::test]
async fn test_streaming_submit() {
    let app = app_with(MockGenerator::new(), 6);
    let session = create_session(&app).await;
    send(&app, upload_request(&session, "a.txt", b"alpha\nbravo")).await;

    let response = app
        .clone()
        .oneshot(submit_request(
            &session,
            "submit/stream",
            json!({"task": "Summarize a CV"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();

    assert_eq!(text.matches("event: progress").count(), 2);
    assert_eq!(text.matches("event: done").count(), 1);
    assert!(text.find("event: progress").unwrap() < text.find("event: done").unwrap());
}

#[tokio::test]
async fn test_one_submission_per_session() {
    let app = app_with(MockGenerator::with_script([MockReply::Hang]), 3000);
    let session = create_session(&app).await;
    send(&app, upload_request(&session, "a.txt", b"text")).await;

    // Headers come back as soon as the stream opens; the run keeps going
    let response = app
        .clone()
        .oneshot(submit_request(
            &session,
            "submit/stream",
            json!({"task": "Summarize a CV"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = send_json(
        &app,
        submit_request(&session, "submit", json!({"task": "Summarize a CV"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["type"], "session_busy");
}

#[tokio::test]
async fn test_delete_session() {
    let app = app();
    let session = create_session(&app).await;

    let (status, _) = send(
        &app,
        Request::delete(format!("/api/sessions/{}", session))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send_json(
        &app,
        Request::get(format!("/api/sessions/{}", session))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found");
}
