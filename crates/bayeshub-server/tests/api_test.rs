//! End-to-end tests for the HTTP API
//!
//! Requests are driven straight through the router with `oneshot`, so no
//! socket is bound.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use bayeshub_server::{create_router, AppState, ServerConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    app_with(ServerConfig::default())
}

fn app_with(config: ServerConfig) -> Router {
    create_router(AppState::new(config, None))
}

async fn send(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let (status, text) = send_raw(app, method, uri, body).await;
    let value = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, value)
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn error_message(body: &Value) -> &str {
    body["error"].as_str().unwrap_or_default()
}

/// Create "things" and teach it a few fruits and computer brands
async fn seed_things(app: &Router) {
    let (status, _) = send(
        app,
        Method::PUT,
        "/classifier/things",
        r#"{"classes":["fruit","computer"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        app,
        Method::POST,
        "/classifier/things/train",
        r#"{"classes":["fruit"],"phrases":["apple banana","grapes apricot"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        app,
        Method::POST,
        "/classifier/things/train",
        r#"{"classes":["computer"],"phrases":["Dell laptop","HP desktop"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send_raw(&app(), Method::GET, "/health", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_create_classifier() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::PUT,
        "/classifier/test1",
        r#"{"classes":["good","bad"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "result": "ok" }));

    let (status, body) = send(
        &app,
        Method::PUT,
        "/classifier/test1",
        r#"{"classes":["good","bad"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error_message(&body).contains("already exists"));

    let (status, body) = send(&app, Method::PUT, "/classifier/test2", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("2 classes"));

    let (status, body) = send(
        &app,
        Method::PUT,
        "/classifier/test3",
        r#"{"classes":["good","good"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("more than once"));

    let (status, _) = send(&app, Method::PUT, "/classifier/test4", "{\"classes\":").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_classifier() {
    let app = app();

    let (status, body) = send(&app, Method::DELETE, "/classifier/missing", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error_message(&body).contains("not found"));

    send(
        &app,
        Method::PUT,
        "/classifier/doomed",
        r#"{"classes":["a","b"]}"#,
    )
    .await;
    let (status, body) = send(&app, Method::DELETE, "/classifier/doomed", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "ok");

    let (status, _) = send(&app, Method::GET, "/classifier/doomed", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_train_with_unknown_class() {
    let app = app();
    send(
        &app,
        Method::PUT,
        "/classifier/test1",
        r#"{"classes":["good","bad"]}"#,
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/classifier/test1/train",
        r#"{"classes":["good","ugly"],"phrases":["hello"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "model test1 does not have class ugly");

    // nothing was learned, not even under the valid class
    let (_, info) = send(&app, Method::GET, "/classifier/test1", "").await;
    assert_eq!(info["learned"], 0);

    let (status, _) = send(
        &app,
        Method::POST,
        "/classifier/nobody/train",
        r#"{"classes":["good"],"phrases":["hello"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_classifier_info() {
    let app = app();
    seed_things(&app).await;

    let (status, info) = send(&app, Method::GET, "/classifier/things", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["name"], "things");
    assert_eq!(info["learned"], 4);
    assert_eq!(info["classes"], json!(["fruit", "computer"]));
    assert_eq!(info["wordCount"], json!([4, 4]));
    assert_eq!(info["words"]["fruit"]["apple"], 0.25);
    assert!(info["words"]["computer"].get("apple").is_none());
}

#[tokio::test]
async fn test_predict() {
    let app = app();
    seed_things(&app).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/classifier/things/predict",
        r#"{"phrase":"banana"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 0);
    assert_eq!(body["name"], "fruit");
    assert_eq!(body["winner"], true);
    assert_eq!(body["percents"].as_array().unwrap().len(), 2);
    assert_eq!(body["raw"].as_array().unwrap().len(), 2);
    assert!(body["percent"].as_f64().unwrap() > 99.0);

    let (status, body) = send(
        &app,
        Method::GET,
        "/classifier/things/predict?phrase=Dell",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "computer");

    // Nothing in the phrase was ever seen
    let (status, body) = send(
        &app,
        Method::GET,
        "/classifier/things/predict",
        r#"{"phrase":"shoes socks"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["winner"], false);
}

#[tokio::test]
async fn test_predict_errors() {
    let app = app();
    seed_things(&app).await;

    let (status, _) = send(&app, Method::GET, "/classifier/things/predict", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::GET,
        "/classifier/things/predict",
        r#"{"words":"banana"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::GET,
        "/classifier/nothing/predict",
        r#"{"phrase":"banana"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &app,
        Method::PUT,
        "/classifier/blank",
        r#"{"classes":["a","b"]}"#,
    )
    .await;
    let (status, body) = send(
        &app,
        Method::GET,
        "/classifier/blank/predict",
        r#"{"phrase":"anything"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(&body).contains("no training observations"));
}

#[tokio::test]
async fn test_missing_classifier_is_reported_before_body_errors() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/classifier/missing/train", "garbage").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error_message(&body).contains("not found"));

    let (status, body) = send(
        &app,
        Method::GET,
        "/classifier/missing/predict",
        r#"{"nope":1}"#,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error_message(&body).contains("not found"));

    // an existing classifier still rejects the same bodies as malformed
    seed_things(&app).await;
    let (status, _) = send(&app, Method::POST, "/classifier/things/train", "garbage").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(
        &app,
        Method::GET,
        "/classifier/things/predict",
        r#"{"nope":1}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_import_round_trip() {
    let app = app();
    seed_things(&app).await;

    let (status, snapshot) = send(&app, Method::GET, "/classifier/things/export", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["classes"], json!(["fruit", "computer"]));
    assert_eq!(snapshot["learned"], 4);
    assert!(snapshot["obj"].as_str().is_some());

    let (status, _) = send(
        &app,
        Method::PUT,
        "/classifier/copy/import",
        &snapshot.to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, source) = send(&app, Method::GET, "/classifier/things", "").await;
    let (_, copy) = send(&app, Method::GET, "/classifier/copy", "").await;
    assert_eq!(copy["name"], "copy");
    assert_eq!(copy["learned"], source["learned"]);
    assert_eq!(copy["wordCount"], source["wordCount"]);
    assert_eq!(copy["words"], source["words"]);

    for phrase in ["banana", "Dell", "shoes socks"] {
        let body = json!({ "phrase": phrase }).to_string();
        let (_, a) = send(&app, Method::GET, "/classifier/things/predict", &body).await;
        let (_, b) = send(&app, Method::GET, "/classifier/copy/predict", &body).await;
        assert_eq!(a["id"], b["id"]);
        assert_eq!(a["raw"], b["raw"]);
        assert_eq!(a["winner"], b["winner"]);
    }

    // the legacy path serves the same snapshot
    let (status, raw) = send(&app, Method::GET, "/classifier/things/raw", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(raw, snapshot);
}

#[tokio::test]
async fn test_import_into_existing_name() {
    let app = app();
    seed_things(&app).await;
    let (_, snapshot) = send(&app, Method::GET, "/classifier/things/export", "").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/classifier/things/import",
        &snapshot.to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error_message(&body).contains("already exists"));
}

#[tokio::test]
async fn test_import_overwrite_policy() {
    let app = app_with(ServerConfig {
        import_overwrite: true,
        ..ServerConfig::default()
    });
    seed_things(&app).await;
    let (_, snapshot) = send(&app, Method::GET, "/classifier/things/export", "").await;

    send(
        &app,
        Method::POST,
        "/classifier/things/train",
        r#"{"classes":["fruit"],"phrases":["pear"]}"#,
    )
    .await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/classifier/things/import",
        &snapshot.to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, info) = send(&app, Method::GET, "/classifier/things", "").await;
    assert_eq!(info["learned"], 4);
}

#[tokio::test]
async fn test_import_rejects_bad_snapshots() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::PUT,
        "/classifier/broken/import",
        r#"{"classes":["a","b"],"obj":"!!not base64!!"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // "bm90IGpzb24=" is base64 for "not json"
    let (status, _) = send(
        &app,
        Method::PUT,
        "/classifier/broken/import",
        r#"{"classes":["a","b"],"obj":"bm90IGpzb24="}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, Method::PUT, "/classifier/broken/import", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/classifier/broken", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_classifiers() {
    let app = app();
    for name in ["zeta", "alpha", "mid"] {
        send(
            &app,
            Method::PUT,
            &format!("/classifier/{}", name),
            r#"{"classes":["a","b"]}"#,
        )
        .await;
    }

    let (status, body) = send(&app, Method::GET, "/classifiers", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classifiers"], json!(["alpha", "mid", "zeta"]));
}

#[tokio::test]
async fn test_diagnostic_log_drains() {
    let app = app_with(ServerConfig {
        diagnostic_log_capacity: 3,
        ..ServerConfig::default()
    });

    send(
        &app,
        Method::PUT,
        "/classifier/one",
        r#"{"classes":["a","b"]}"#,
    )
    .await;
    send(&app, Method::DELETE, "/classifier/ghost", "").await;

    let (status, body) = send(&app, Method::GET, "/log", "").await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // newest first
    assert!(entries[0].as_str().unwrap().contains("WARN"));
    assert!(entries[1].as_str().unwrap().contains("NOTICE"));

    let (_, body) = send(&app, Method::GET, "/log", "").await;
    assert!(body["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_body_limit() {
    let app = app_with(ServerConfig {
        max_body_bytes: 64,
        ..ServerConfig::default()
    });

    let phrases: Vec<String> = (0..50).map(|i| format!("phrase {}", i)).collect();
    let body = json!({ "classes": ["a"], "phrases": phrases }).to_string();
    let (status, _) = send_raw(&app, Method::POST, "/classifier/x/train", &body).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let with_handle = create_router(AppState::new(ServerConfig::default(), Some(handle)));

    let (status, _) = send_raw(&with_handle, Method::GET, "/metrics", "").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_raw(&app(), Method::GET, "/metrics", "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, body) = send(&app(), Method::GET, "/nowhere", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "not found");
}
