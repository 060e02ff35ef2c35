use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use flacon_shortlink::{RemoteShortLinks, RemoteShortLinksConfig, ShortLinks};
use flacon_core::ShortLinkError;
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<Value>>>,
}

impl Recorded {
    fn push(&self, body: Value) {
        self.requests.lock().unwrap().push(body);
    }

    fn all(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> RemoteShortLinks {
    RemoteShortLinks::new(
        RemoteShortLinksConfig::builder()
            .base_url(base_url)
            .api_key("secret-key")
            .build(),
    )
    .unwrap()
}

#[tokio::test]
async fn create_extracts_the_first_shortid() {
    let recorded = Recorded::default();
    let app = Router::new()
        .route(
            "/api/create",
            post(|State(rec): State<Recorded>, Json(body): Json<Value>| async move {
                rec.push(body);
                Json(json!({"shortUrl": [{"shortid": "abc123", "target": "x"}]}))
            }),
        )
        .with_state(recorded.clone());
    let base_url = spawn(app).await;

    let short_id = client(&base_url)
        .create("https://shop.example/aventus")
        .await
        .unwrap();

    assert_eq!(short_id, "abc123");
    let requests = recorded.all();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["apiKey"], "secret-key");
    assert_eq!(requests[0]["url"], "https://shop.example/aventus");
}

#[tokio::test]
async fn create_fails_on_non_success_status() {
    let app = Router::new().route(
        "/api/create",
        post(|| async { (StatusCode::FORBIDDEN, "bad api key") }),
    );
    let base_url = spawn(app).await;

    let err = client(&base_url).create("https://x.example").await.unwrap_err();

    assert!(matches!(err, ShortLinkError::Status { status: 403, .. }));
}

#[tokio::test]
async fn create_fails_on_empty_short_url_array() {
    let app = Router::new().route(
        "/api/create",
        post(|| async { Json(json!({"shortUrl": []})) }),
    );
    let base_url = spawn(app).await;

    let err = client(&base_url).create("https://x.example").await.unwrap_err();

    assert!(matches!(err, ShortLinkError::MalformedResponse(_)));
}

#[tokio::test]
async fn create_fails_on_malformed_body() {
    let app = Router::new().route(
        "/api/create",
        post(|| async { Json(json!({"unexpected": true})) }),
    );
    let base_url = spawn(app).await;

    let err = client(&base_url).create("https://x.example").await.unwrap_err();

    assert!(matches!(err, ShortLinkError::MalformedResponse(_)));
}

#[tokio::test]
async fn delete_posts_the_shortid() {
    let recorded = Recorded::default();
    let app = Router::new()
        .route(
            "/api/delete",
            post(|State(rec): State<Recorded>, Json(body): Json<Value>| async move {
                rec.push(body);
                StatusCode::OK
            }),
        )
        .with_state(recorded.clone());
    let base_url = spawn(app).await;

    client(&base_url).delete("abc123").await.unwrap();

    let requests = recorded.all();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["apiKey"], "secret-key");
    assert_eq!(requests[0]["shortid"], "abc123");
}

#[tokio::test]
async fn delete_surfaces_remote_failure() {
    let app = Router::new().route(
        "/api/delete",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base_url = spawn(app).await;

    let err = client(&base_url).delete("abc123").await.unwrap_err();

    assert!(matches!(err, ShortLinkError::Status { status: 500, .. }));
}
