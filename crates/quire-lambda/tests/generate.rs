use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use quire_export::error::ExportError;
use quire_export::pdf::PdfRenderer;
use quire_lambda::app;
use quire_lambda::state::AppState;
use quire_storage::error::StorageError;
use quire_storage::store::{NewObject, ObjectStore, StoredObject, Visibility};
use serde_json::{Value, json};
use tower::ServiceExt;

const FAKE_PDF: &[u8] = b"%PDF-1.7\nfake";

#[derive(Default)]
struct RecordingRenderer {
    html: Mutex<Vec<String>>,
}

#[async_trait]
impl PdfRenderer for RecordingRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, ExportError> {
        self.html.lock().unwrap().push(html.to_string());
        Ok(FAKE_PDF.to_vec())
    }
}

struct FailingRenderer(fn() -> ExportError);

#[async_trait]
impl PdfRenderer for FailingRenderer {
    async fn render_pdf(&self, _html: &str) -> Result<Vec<u8>, ExportError> {
        Err((self.0)())
    }
}

#[derive(Default)]
struct RecordingStore {
    objects: Mutex<Vec<NewObject>>,
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn create(&self, object: NewObject) -> Result<StoredObject, StorageError> {
        let stored = StoredObject {
            name: object.name.clone(),
            url: format!("https://files.test/{}", object.name),
        };
        self.objects.lock().unwrap().push(object);
        Ok(stored)
    }
}

struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    async fn create(&self, _object: NewObject) -> Result<StoredObject, StorageError> {
        Err(StorageError::Space {
            status: 503,
            message: "unavailable".to_string(),
        })
    }
}

struct Harness {
    renderer: Arc<RecordingRenderer>,
    store: Arc<RecordingStore>,
    app: Router,
}

fn harness() -> Harness {
    let renderer = Arc::new(RecordingRenderer::default());
    let store = Arc::new(RecordingStore::default());
    let app = app(
        AppState::new(renderer.clone(), store.clone()),
        1024 * 1024,
    );
    Harness {
        renderer,
        store,
        app,
    }
}

fn post_json(body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, text) = send(app, req).await;
    (status, serde_json::from_str(&text).unwrap())
}

#[tokio::test]
async fn valid_request_returns_url_of_one_public_pdf() {
    let h = harness();
    let req = post_json(&json!({
        "name": "greeting",
        "template": "<h1>Hello <%= name %></h1>",
        "params": { "name": "World" }
    }));

    let resp = h.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));
    let url = String::from_utf8(
        to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec(),
    )
    .unwrap();

    let html = h.renderer.html.lock().unwrap();
    assert_eq!(html.len(), 1);
    assert!(html[0].contains("Hello World"));

    let objects = h.store.objects.lock().unwrap();
    assert_eq!(objects.len(), 1);
    let object = &objects[0];
    assert!(object.name.ends_with(".pdf"));
    assert!(object.body.starts_with(b"%PDF"));
    assert_eq!(object.visibility, Visibility::Public);
    assert_eq!(object.display_name.as_deref(), Some("greeting.pdf"));
    assert_eq!(url, format!("https://files.test/{}", object.name));
}

#[tokio::test]
async fn non_post_methods_get_bare_404() {
    let h = harness();
    for method in [
        Method::GET,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::OPTIONS,
    ] {
        let req = Request::builder()
            .method(method.clone())
            .uri("/api/generate")
            .body(Body::from(json!({ "template": "x" }).to_string()))
            .unwrap();
        let (status, body) = send_json(&h.app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(body, json!({ "status": "error", "error": 404 }), "{method}");
    }
    assert!(h.store.objects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cors_preflight_gets_bare_404() {
    let h = harness();
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/generate")
        .header(header::ORIGIN, "https://app.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_json(&h.app, req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "error", "error": 404 }));
}

#[tokio::test]
async fn responses_allow_any_origin() {
    let h = harness();
    let mut req = post_json(&json!({ "template": "hi" }));
    req.headers_mut()
        .insert(header::ORIGIN, "https://app.example".parse().unwrap());
    let resp = h.app.clone().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn unknown_path_gets_bare_404() {
    let h = harness();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/other")
        .body(Body::from(json!({ "template": "x" }).to_string()))
        .unwrap();
    let (status, body) = send_json(&h.app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "error", "error": 404 }));
}

#[tokio::test]
async fn missing_template_is_400_with_issue_path() {
    let h = harness();
    let (status, body) = send_json(&h.app, post_json(&json!({ "params": {} }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], 400);
    let messages = body["messages"].as_array().unwrap();
    assert!(
        messages
            .iter()
            .any(|m| m["path"] == json!(["template"]) && m["message"] == "Required")
    );
    assert!(h.renderer.html.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_is_400() {
    let h = harness();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/generate")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send_json(&h.app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["messages"][0]["code"], "invalid_json");
}

#[tokio::test]
async fn template_error_is_500_with_line() {
    let h = harness();
    let req = post_json(&json!({ "template": "ok\n<%= missing %>" }));
    let (status, body) = send_json(&h.app, req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "template_error");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("line 2"), "{message}");
    assert!(message.contains("missing is not defined"), "{message}");
    assert!(h.renderer.html.lock().unwrap().is_empty());
    assert!(h.store.objects.lock().unwrap().is_empty());
}

async fn failing_render(make: fn() -> ExportError) -> (StatusCode, Value, usize) {
    let store = Arc::new(RecordingStore::default());
    let app = app(
        AppState::new(Arc::new(FailingRenderer(make)), store.clone()),
        1024,
    );
    let (status, body) = send_json(&app, post_json(&json!({ "template": "hi" }))).await;
    let stored = store.objects.lock().unwrap().len();
    (status, body, stored)
}

#[tokio::test]
async fn render_timeout_is_504_and_nothing_uploaded() {
    let (status, body, stored) = failing_render(|| ExportError::RenderTimeout {
        after: Duration::from_secs(60),
    })
    .await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(
        body,
        json!({ "status": "error", "error": 504, "code": "render_timeout" })
    );
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn browser_failure_is_503_without_detail() {
    let (status, body, stored) =
        failing_render(|| ExportError::BrowserLaunch("no chrome at /secret/path".to_string())).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "render_failed");
    assert!(!body.to_string().contains("/secret/path"));
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn upload_failure_is_502() {
    let app = app(
        AppState::new(Arc::new(RecordingRenderer::default()), Arc::new(FailingStore)),
        1024,
    );
    let (status, body) = send_json(&app, post_json(&json!({ "template": "hi" }))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body,
        json!({ "status": "error", "error": 502, "code": "upload_failed" })
    );
}

#[tokio::test]
async fn oversized_body_is_rejected_before_rendering() {
    let renderer = Arc::new(RecordingRenderer::default());
    let app = app(
        AppState::new(renderer.clone(), Arc::new(RecordingStore::default())),
        64,
    );
    let template = "x".repeat(1024);
    let (status, body) = send_json(&app, post_json(&json!({ "template": template }))).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], 413);
    assert!(renderer.html.lock().unwrap().is_empty());
}

#[tokio::test]
async fn same_request_twice_yields_distinct_urls() {
    let h = harness();
    let body = json!({ "template": "<p>same</p>" });

    let (s1, first) = send(&h.app, post_json(&body)).await;
    let (s2, second) = send(&h.app, post_json(&body)).await;

    assert_eq!(s1, StatusCode::OK);
    assert_eq!(s2, StatusCode::OK);
    assert_ne!(first, second);
    assert_eq!(h.store.objects.lock().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_do_not_share_params() {
    let h = harness();
    let n = 12;

    let tasks: Vec<_> = (0..n)
        .map(|i| {
            let app = h.app.clone();
            tokio::spawn(async move {
                let req = post_json(&json!({
                    "template": "<p>customer <%= id %></p>",
                    "params": { "id": format!("c{i}") }
                }));
                send(&app, req).await
            })
        })
        .collect();

    let mut urls = HashSet::new();
    for task in tasks {
        let (status, url) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        urls.insert(url);
    }
    assert_eq!(urls.len(), n);

    let html: HashSet<String> = h.renderer.html.lock().unwrap().iter().cloned().collect();
    let expected: HashSet<String> = (0..n).map(|i| format!("<p>customer c{i}</p>")).collect();
    assert_eq!(html, expected);
}
