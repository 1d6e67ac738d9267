use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use quire_storage::error::StorageError;
use quire_storage::space::SpaceStore;
use quire_storage::store::{NewObject, ObjectStore, Visibility};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn create_ok(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let name = body["name"].as_str().unwrap_or_default().to_string();
    captured.requests.lock().unwrap().push((auth, body));
    Json(json!({ "url": format!("https://space.test/objects/{name}") }))
}

async fn create_denied() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "code": 401, "detail": "Unauthorized" })),
    )
}

async fn create_without_url() -> Json<Value> {
    Json(json!({}))
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1")
}

fn pdf_object(name: &str) -> NewObject {
    NewObject {
        name: name.to_string(),
        body: b"%PDF-1.7 test".to_vec(),
        content_type: "application/pdf".to_string(),
        visibility: Visibility::Public,
        display_name: None,
    }
}

#[tokio::test]
async fn create_posts_base64_object_with_bearer_key() {
    let captured = Captured::default();
    let router = Router::new()
        .route("/v1/space/Create", post(create_ok))
        .with_state(captured.clone());
    let endpoint = serve(router).await;

    let store = SpaceStore::new("secret-key", format!("{endpoint}/")).unwrap();
    let stored = store.create(pdf_object("abc.pdf")).await.unwrap();

    assert_eq!(stored.name, "abc.pdf");
    assert_eq!(stored.url, "https://space.test/objects/abc.pdf");

    let requests = captured.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (auth, body) = &requests[0];
    assert_eq!(auth.as_deref(), Some("Bearer secret-key"));
    assert_eq!(body["name"], "abc.pdf");
    assert_eq!(body["visibility"], "public");
    let decoded = STANDARD.decode(body["object"].as_str().unwrap()).unwrap();
    assert_eq!(decoded, b"%PDF-1.7 test");
}

#[tokio::test]
async fn non_success_status_is_space_error() {
    let router = Router::new().route("/v1/space/Create", post(create_denied));
    let endpoint = serve(router).await;

    let store = SpaceStore::new("bad-key", endpoint).unwrap();
    let err = store.create(pdf_object("abc.pdf")).await.unwrap_err();

    match err {
        StorageError::Space { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("Unauthorized"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_url_is_rejected() {
    let router = Router::new().route("/v1/space/Create", post(create_without_url));
    let endpoint = serve(router).await;

    let store = SpaceStore::new("key", endpoint).unwrap();
    let err = store.create(pdf_object("abc.pdf")).await.unwrap_err();

    assert!(matches!(err, StorageError::Response(_)));
}

#[test]
fn empty_key_is_a_config_error() {
    let err = SpaceStore::new("", "https://space.test").unwrap_err();
    assert!(matches!(err, StorageError::Config(_)));
}

#[test]
fn debug_output_redacts_key() {
    let store = SpaceStore::new("super-secret", "https://space.test/v1/").unwrap();
    let debug = format!("{store:?}");
    assert!(!debug.contains("super-secret"));
    assert_eq!(store.endpoint(), "https://space.test/v1");
}
