//! Route Tests
//!
//! Drives the full router with `oneshot` requests while both speech backends
//! are served by a mock server.

use std::io::Cursor;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use label_reader::core::{PlaceholderSummarizer, TtsRouter};
use label_reader::{ServerConfig, routes, state::AppState};

const BOUNDARY: &str = "label-reader-test-boundary";

struct TestApp {
    app: Router,
    state: Arc<AppState>,
    server: MockServer,
    _temp_dir: TempDir,
}

async fn test_app(max_images: usize) -> TestApp {
    test_app_with_limits(max_images, 20 * 1024 * 1024).await
}

async fn test_app_with_limits(max_images: usize, max_upload_bytes: usize) -> TestApp {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    let mut config = ServerConfig::with_api_key("hf_routes");
    config.host = "127.0.0.1".to_string();
    config.mandarin_tts_url = format!("{}/translate_tts", server.uri());
    config.taiwanese_tts_url = format!("{}/models/ylac/taigi-tts", server.uri());
    config.audio_temp_dir = temp_dir.path().to_path_buf();
    config.max_images_per_upload = max_images;
    config.max_upload_bytes = max_upload_bytes;

    let tts =
        TtsRouter::from_configs(config.mandarin_tts_config(), config.taiwanese_tts_config())
            .unwrap();
    let state = AppState::with_components(config, Arc::new(PlaceholderSummarizer), tts);

    TestApp {
        app: routes::create_app(state.clone()),
        state,
        server,
        _temp_dir: temp_dir,
    }
}

async fn mock_taiwanese(server: &MockServer, status: u16, body: &[u8]) {
    Mock::given(method("POST"))
        .and(path("/models/ylac/taigi-tts"))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

async fn mock_mandarin(server: &MockServer, status: u16, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

fn png() -> Vec<u8> {
    let img = RgbImage::from_pixel(2, 2, Rgb([10, 200, 10]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// Build a multipart/form-data body
fn multipart_body(fields: &[(&str, &str)], files: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (filename, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(uri: &str, cookie: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// `label_session=<id>` from a response's Set-Cookie header
fn session_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Submit the form once without files and return the new session cookie
async fn open_session(app: &Router) -> String {
    let body = multipart_body(&[("language", "chinese")], &[]);
    let response = app
        .clone()
        .oneshot(multipart_request("/process", None, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    session_cookie(&response)
}

#[tokio::test]
async fn test_health_check() {
    let t = test_app(20).await;
    let response = t.app.clone().oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "OK");
}

#[tokio::test]
async fn test_index_renders_initial_page_without_creating_session() {
    let t = test_app(20).await;
    let response = t.app.clone().oneshot(get("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(t.state.sessions.is_empty());

    let html = body_string(response).await;
    assert!(html.contains("🛍️ 商品標籤解讀器（含台語語音）"));
    assert!(html.contains("選擇語音語言"));
    assert!(html.contains(r#"value="chinese" checked"#));
    assert!(html.contains("重新開始"));
}

#[tokio::test]
async fn test_first_submit_creates_session() {
    let t = test_app(20).await;
    let cookie = open_session(&t.app).await;

    assert!(cookie.starts_with("label_session="));
    assert_eq!(t.state.sessions.len(), 1);
}

#[tokio::test]
async fn test_reset_without_session_creates_nothing() {
    let t = test_app(20).await;
    let reset = Request::builder()
        .method("POST")
        .uri("/reset")
        .body(Body::empty())
        .unwrap();
    let response = t.app.clone().oneshot(reset).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(t.state.sessions.is_empty());
}

#[tokio::test]
async fn test_known_session_gets_no_new_cookie() {
    let t = test_app(20).await;
    let cookie = open_session(&t.app).await;

    let response = t.app.clone().oneshot(get("/", Some(&cookie))).await.unwrap();
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_process_isolates_bad_image() {
    let t = test_app(20).await;
    mock_taiwanese(&t.server, 200, b"taigi-audio").await;
    let cookie = open_session(&t.app).await;

    let body = multipart_body(
        &[("language", "taiwanese")],
        &[
            ("one.png", png()),
            ("two.png", b"this is not an image".to_vec()),
            ("three.png", png()),
        ],
    );
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/process", Some(&cookie), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

    let html = body_string(t.app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains(r#"value="taiwanese" checked"#));
    assert!(html.contains("<h4>圖片 1 語音</h4>"));
    assert!(html.contains("處理圖片 2 時發生錯誤："));
    assert!(html.contains("<h4>圖片 3 語音</h4>"));
    assert_eq!(html.matches("總結：").count(), 2);

    let requests = t.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.method.as_str() == "POST"));
}

#[tokio::test]
async fn test_process_tts_failure_shows_summary_and_error() {
    let t = test_app(20).await;
    mock_mandarin(&t.server, 503, b"unavailable").await;
    let cookie = open_session(&t.app).await;

    let body = multipart_body(&[("language", "chinese")], &[("label.png", png())]);
    t.app
        .clone()
        .oneshot(multipart_request("/process", Some(&cookie), body))
        .await
        .unwrap();

    let html = body_string(t.app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("總結："));
    assert!(html.contains("語音合成失敗："));
    assert!(!html.contains("<audio"));
}

#[tokio::test]
async fn test_process_advanced_mode_note() {
    let t = test_app(20).await;
    mock_mandarin(&t.server, 200, b"zh-audio").await;
    let cookie = open_session(&t.app).await;

    let body = multipart_body(
        &[("language", "chinese"), ("advanced", "on")],
        &[("label.jpg", png())],
    );
    t.app
        .clone()
        .oneshot(multipart_request("/process", Some(&cookie), body))
        .await
        .unwrap();

    let html = body_string(t.app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("🔍 進階模式：可提供更多圖像細節與建議（尚未實作）"));
    assert!(html.contains("<audio controls>"));
}

#[tokio::test]
async fn test_switching_language_reprocesses_held_uploads() {
    let t = test_app(20).await;
    mock_mandarin(&t.server, 200, b"zh-audio").await;
    mock_taiwanese(&t.server, 200, b"tw-audio").await;
    let cookie = open_session(&t.app).await;

    let body = multipart_body(&[("language", "chinese")], &[("label.png", png())]);
    t.app
        .clone()
        .oneshot(multipart_request("/process", Some(&cookie), body))
        .await
        .unwrap();

    // No files this time: the held upload is processed again in Taiwanese
    let body = multipart_body(&[("language", "taiwanese")], &[]);
    t.app
        .clone()
        .oneshot(multipart_request("/process", Some(&cookie), body))
        .await
        .unwrap();

    let requests = t.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method.as_str(), "GET");
    assert_eq!(requests[1].method.as_str(), "POST");
}

#[tokio::test]
async fn test_reset_clears_session() {
    let t = test_app(20).await;
    mock_taiwanese(&t.server, 200, b"taigi-audio").await;
    let cookie = open_session(&t.app).await;

    let body = multipart_body(
        &[("language", "taiwanese"), ("advanced", "on")],
        &[("label.png", png())],
    );
    t.app
        .clone()
        .oneshot(multipart_request("/process", Some(&cookie), body))
        .await
        .unwrap();

    let reset = Request::builder()
        .method("POST")
        .uri("/reset")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = t.app.clone().oneshot(reset).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = body_string(t.app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains(r#"value="chinese" checked"#));
    assert!(!html.contains(r#"name="advanced" value="on" checked"#));
    assert!(!html.contains("總結："));
}

#[tokio::test]
async fn test_sessions_do_not_share_results() {
    let t = test_app(20).await;
    mock_mandarin(&t.server, 200, b"zh-audio").await;
    let first = open_session(&t.app).await;
    let second = open_session(&t.app).await;

    let body = multipart_body(&[("language", "chinese")], &[("label.png", png())]);
    t.app
        .clone()
        .oneshot(multipart_request("/process", Some(&first), body))
        .await
        .unwrap();

    let html = body_string(t.app.clone().oneshot(get("/", Some(&second))).await.unwrap()).await;
    assert!(!html.contains("總結："));
}

#[tokio::test]
async fn test_process_rejects_too_many_images() {
    let t = test_app(2).await;
    let body = multipart_body(
        &[],
        &[("a.png", png()), ("b.png", png()), ("c.png", png())],
    );

    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/process", None, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_json(response).await["error"]
            .as_str()
            .unwrap()
            .contains("too many images")
    );
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let t = test_app_with_limits(20, 1024).await;

    for uri in ["/process", "/api/labels"] {
        let body = multipart_body(&[("language", "chinese")], &[("big.png", vec![0u8; 10 * 1024])]);
        let response = t
            .app
            .clone()
            .oneshot(multipart_request(uri, None, body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE, "{uri}");
    }
    assert!(t.server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_speak_returns_audio() {
    let t = test_app(20).await;
    mock_taiwanese(&t.server, 200, b"taigi-audio").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/speak")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "text": "你好", "language": "taiwanese" }).to_string(),
        ))
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "audio/mpeg"
    );
    assert_eq!(body_string(response).await, "taigi-audio");
}

#[tokio::test]
async fn test_speak_backend_failure_is_bad_gateway() {
    let t = test_app(20).await;
    mock_taiwanese(&t.server, 500, b"internal").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/speak")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "text": "你好", "language": "taiwanese" }).to_string(),
        ))
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("HTTP 500"));
}

#[tokio::test]
async fn test_speak_rejects_blank_text() {
    let t = test_app(20).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/speak")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text":"   "}"#))
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(t.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_labels_api_returns_outcomes() {
    let t = test_app(20).await;
    mock_mandarin(&t.server, 200, &[1, 2, 3]).await;

    let body = multipart_body(
        &[("language", "chinese")],
        &[("a.png", png()), ("notes.txt", b"text".to_vec())],
    );
    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/api/labels", None, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["language"], "chinese");
    let outcomes = json["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 2);

    assert_eq!(outcomes[0]["caption"], "圖片 1");
    assert_eq!(outcomes[0]["audio_base64"], "AQID");
    assert!(outcomes[0]["error"].is_null());

    assert!(outcomes[1]["summary"].is_null());
    assert!(
        outcomes[1]["error"]
            .as_str()
            .unwrap()
            .starts_with("處理圖片 2 時發生錯誤：")
    );
}

#[tokio::test]
async fn test_labels_api_requires_images() {
    let t = test_app(20).await;
    let body = multipart_body(&[("language", "chinese")], &[]);

    let response = t
        .app
        .clone()
        .oneshot(multipart_request("/api/labels", None, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_providers_lists_both_backends() {
    let t = test_app(20).await;
    let response = t
        .app
        .clone()
        .oneshot(get("/api/providers", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["summarizer"], "placeholder");
    assert_eq!(json["providers"]["chinese"]["provider"], "mandarin");
    assert_eq!(json["providers"]["taiwanese"]["provider"], "taiwanese");
}
