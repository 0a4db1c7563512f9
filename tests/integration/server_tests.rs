//! Integration tests for the HTTP surface
//!
//! Requests go through the full router with `oneshot`; scan targets are served by
//! wiremock.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use contact_sweep::config::Config;
use contact_sweep::server::{router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_app(max_concurrency: usize) -> Router {
    let mut config = Config::default();
    config.scanner.max_concurrency = max_concurrency;
    config.scanner.request_timeout_ms = 5_000;
    router(AppState::new(&config).expect("Failed to build app state"))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_scan(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/scan")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn expect_bad_request(body: &str) -> String {
    let (status, json) = send(create_app(32), post_scan(body.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
    json["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_healthz() {
    let (status, body) = send(create_app(32), get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_index_gives_usage_hint() {
    let (status, body) = send(create_app(32), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("POST /scan"));
}

#[tokio::test]
async fn test_unknown_routes_are_not_found() {
    let (status, body) = send(create_app(32), get("/nowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not Found" }));

    let (status, body) = send(create_app(32), get("/scan")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not Found" }));
}

#[tokio::test]
async fn test_rejects_malformed_payloads() {
    assert_eq!(
        expect_bad_request("").await,
        "Request body must contain JSON data."
    );
    assert!(expect_bad_request("{not json")
        .await
        .starts_with("Invalid JSON payload"));
    assert_eq!(
        expect_bad_request("[1, 2]").await,
        "Payload must be a JSON object."
    );
    assert_eq!(
        expect_bad_request(r#"{"urls": []}"#).await,
        "Payload must include a non-empty 'urls' list."
    );
    assert_eq!(
        expect_bad_request(r#"{"urls": "example.com"}"#).await,
        "Payload must include a non-empty 'urls' list."
    );
    assert_eq!(
        expect_bad_request(r#"{"urls": [42]}"#).await,
        "'urls' must contain only strings."
    );
}

#[tokio::test]
async fn test_rejects_invalid_options() {
    assert!(
        expect_bad_request(r#"{"urls": ["example.com"], "concurrency": 0}"#)
            .await
            .starts_with("'concurrency' must be a positive integer")
    );
    assert!(
        expect_bad_request(r#"{"urls": ["example.com"], "concurrency": "4"}"#)
            .await
            .starts_with("'concurrency' must be a positive integer")
    );
    assert_eq!(
        expect_bad_request(r#"{"urls": ["example.com"], "timeout": -1}"#).await,
        "'timeout' must be a positive number when provided."
    );
    assert_eq!(
        expect_bad_request(r#"{"urls": ["example.com"], "user_agent": 7}"#).await,
        "'user_agent' must be a string when provided."
    );
}

#[tokio::test]
async fn test_scan_returns_results_in_submitted_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/one"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/two">two</a><p>one@example.com</p>"#)
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let payload = json!({
        "urls": [format!("{}/one", base_url), "ftp://files.test/", format!("{}/two", base_url)],
        "concurrency": 1000,
        "timeout": 5,
        "user_agent": null
    });
    let (status, body) = send(create_app(2), post_scan(payload.to_string())).await;

    assert_eq!(status, StatusCode::OK);

    let summary = &body["summary"];
    assert_eq!(summary["total"], 3);
    assert_eq!(summary["succeeded"], 1);
    assert_eq!(summary["failed"], 2);
    assert_eq!(summary["effective_concurrency"], 2);
    assert_eq!(summary["by_status"]["fetch_error"], 2);
    assert!(summary["duration_ms"].as_f64().unwrap() >= 0.0);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["url"], format!("{}/one", base_url));
    assert_eq!(results[0]["status"], "ok");
    assert_eq!(results[0]["http_status"], 200);
    assert_eq!(results[0]["emails"], json!(["one@example.com"]));
    assert_eq!(results[0]["counts"]["internal_links"], 1);

    assert_eq!(results[1]["status"], "fetch_error");
    assert!(results[1].get("http_status").is_none());
    assert_eq!(results[1]["links"], json!([]));

    assert_eq!(results[2]["status"], "fetch_error");
    assert_eq!(results[2]["http_status"], 500);
}
