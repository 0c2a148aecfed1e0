use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use jotion_server::{
    auth::create_access_token,
    create_router,
    store::{DocumentStore, MemoryDocumentStore},
    Config,
};
use jotion_shared::Document;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "integration-secret";

fn test_config() -> Config {
    Config {
        database_url: None,
        jwt_secret: SECRET.to_string(),
        jwt_expires_in: 3600,
        port: 0,
    }
}

fn app(store: Arc<MemoryDocumentStore>) -> Router {
    create_router(store, test_config())
}

fn bearer(subject: &str) -> String {
    let token = create_access_token(subject, None, SECRET, 3600).unwrap();
    format!("Bearer {}", token)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn create_request(auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/documents")
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("Authorization", auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn sidebar_request(auth: Option<&str>, parent: Option<Uuid>) -> Request<Body> {
    let uri = match parent {
        Some(id) => format!("/api/v1/documents/sidebar?parentDocument={}", id),
        None => "/api/v1/documents/sidebar".to_string(),
    };
    let mut builder = Request::builder().uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("Authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

fn titles(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_check() {
    let app = app(Arc::new(MemoryDocumentStore::new()));
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_and_list_tree() {
    let store = Arc::new(MemoryDocumentStore::new());
    let app = app(store.clone());
    let alice = bearer("user_alice");
    let bob = bearer("user_bob");

    let (status, body) = send(&app, create_request(Some(&alice), json!({ "title": "Alpha" }))).await;
    assert_eq!(status, StatusCode::OK);
    let alpha: Uuid = body["id"].as_str().unwrap().parse().unwrap();

    let (status, _) = send(
        &app,
        create_request(Some(&alice), json!({ "title": "Beta", "parentDocument": alpha })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, roots) = send(&app, sidebar_request(Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&roots), ["Alpha"]);
    assert_eq!(roots[0]["userId"], "user_alice");
    assert_eq!(roots[0]["isArchived"], false);
    assert_eq!(roots[0]["isPublished"], false);
    assert!(roots[0].get("parentDocument").is_none());

    let (_, children) = send(&app, sidebar_request(Some(&alice), Some(alpha))).await;
    assert_eq!(titles(&children), ["Beta"]);
    assert_eq!(children[0]["parentDocument"], alpha.to_string());

    let (status, others) = send(&app, sidebar_request(Some(&bob), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(titles(&others).is_empty());
}

#[tokio::test]
async fn missing_token_is_unauthorized_and_writes_nothing() {
    let store = Arc::new(MemoryDocumentStore::new());
    let app = app(store.clone());

    let (status, body) = send(&app, create_request(None, json!({ "title": "Untitled" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not authenticated");
    assert!(store.is_empty().await);

    let (status, _) = send(&app, sidebar_request(None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_token_is_unauthorized() {
    let store = Arc::new(MemoryDocumentStore::new());
    let app = app(store.clone());

    let forged = create_access_token("user_alice", None, "not-the-secret", 3600).unwrap();
    let auth = format!("Bearer {}", forged);

    let (status, _) = send(&app, create_request(Some(&auth), json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, sidebar_request(Some("Basic abc"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn archived_documents_are_hidden() {
    let store = Arc::new(MemoryDocumentStore::new());
    let mut archived = Document::new("user_alice", "Old", None);
    archived.is_archived = true;
    store.insert(&archived).await.unwrap();
    let app = app(store.clone());
    let alice = bearer("user_alice");

    send(&app, create_request(Some(&alice), json!({ "title": "New" }))).await;

    let (_, docs) = send(&app, sidebar_request(Some(&alice), None)).await;
    assert_eq!(titles(&docs), ["New"]);
}

#[tokio::test]
async fn foreign_parent_is_rejected() {
    let store = Arc::new(MemoryDocumentStore::new());
    let app = app(store.clone());

    let (_, body) = send(
        &app,
        create_request(Some(&bearer("user_bob")), json!({ "title": "Bob's" })),
    )
    .await;
    let bobs = body["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        create_request(
            Some(&bearer("user_alice")),
            json!({ "title": "Child", "parentDocument": bobs }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.len().await, 1);
}
