//! HTTP routes and handlers

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use bayeshub_classifiers::{prediction, training, ClassifierInfo, Prediction, Snapshot};
use bayeshub_core::Error;
use bayeshub_telemetry::Operation;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::AppError;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/log", get(drain_log))
        .route("/classifiers", get(list_classifiers))
        .route(
            "/classifier/:name",
            put(create_classifier)
                .delete(delete_classifier)
                .get(classifier_info),
        )
        .route("/classifier/:name/export", get(export_classifier))
        .route("/classifier/:name/raw", get(export_classifier))
        .route("/classifier/:name/import", put(import_classifier))
        .route("/classifier/:name/train", post(train_classifier))
        .route("/classifier/:name/predict", get(predict))
        .fallback(fallback)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Body of a create request
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub classes: Vec<String>,
}

/// Body of a train request: every phrase is learned under every class
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainRequest {
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub phrases: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    pub phrase: String,
}

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    pub phrase: Option<String>,
}

/// Wire form of a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Index of the winning class
    pub id: usize,
    /// Name of the winning class
    pub name: String,
    /// Percentage of the winning class
    pub percent: f64,
    /// Percentages for every class, in class order
    pub percents: Vec<f64>,
    /// Raw engine scores, in class order
    pub raw: Vec<f64>,
    /// Whether the winner was unambiguous
    pub winner: bool,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            id: prediction.winning_index,
            percent: prediction.winning_percentage(),
            name: prediction.winning_class,
            percents: prediction.percentages,
            raw: prediction.scores,
            winner: prediction.strict,
        }
    }
}

fn ok_body() -> Json<Value> {
    Json(json!({ "result": "ok" }))
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> bayeshub_core::Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::bad_request(e.to_string()))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    match &state.metrics_handle {
        Some(handle) => handle.render(),
        None => String::new(),
    }
}

async fn drain_log(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "entries": state.diagnostics.drain_to_list() }))
}

async fn list_classifiers(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let names = state.observe(Operation::List, "*", || Ok(state.registry.list()))?;
    Ok(Json(json!({ "classifiers": names })))
}

async fn create_classifier(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    state.observe(Operation::Create, &name, || {
        let req: CreateRequest = parse_body(&body)?;
        state.registry.create(&name, &req.classes)
    })?;

    state.diagnostics.notice(format!("created classifier {}", name));
    Ok(ok_body())
}

async fn delete_classifier(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.observe(Operation::Delete, &name, || state.registry.delete(&name))?;

    state.diagnostics.notice(format!("deleted classifier {}", name));
    Ok(ok_body())
}

async fn classifier_info(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ClassifierInfo>, AppError> {
    let info = state.observe(Operation::Info, &name, || state.registry.info(&name))?;
    Ok(Json(info))
}

async fn export_classifier(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Snapshot>, AppError> {
    let snapshot = state.observe(Operation::Export, &name, || state.registry.export(&name))?;
    debug!("Exported '{}' ({} encoded bytes)", name, snapshot.blob.len());
    Ok(Json(snapshot))
}

async fn import_classifier(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    state.observe(Operation::Import, &name, || {
        let snapshot: Snapshot = parse_body(&body)?;
        state.registry.import(&name, &snapshot)
    })?;

    state.diagnostics.notice(format!("imported classifier {}", name));
    Ok(ok_body())
}

async fn train_classifier(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let outcome = state.observe(Operation::Train, &name, || {
        let handle = state.registry.get(&name)?;
        let req: TrainRequest = parse_body(&body)?;
        training::train(&handle, &req.classes, &req.phrases)
    })?;

    debug!("Trained '{}' with {} observations", name, outcome.observations);
    Ok(ok_body())
}

/// Phrase comes from a JSON body, or from `?phrase=` when the body is empty
async fn predict(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<PredictQuery>,
    body: Bytes,
) -> Result<Json<PredictResponse>, AppError> {
    let result = state.observe(Operation::Predict, &name, || {
        let handle = state.registry.get(&name)?;
        let phrase = if body.iter().all(u8::is_ascii_whitespace) {
            query
                .phrase
                .ok_or_else(|| Error::bad_request("a phrase is required"))?
        } else {
            parse_body::<PredictRequest>(&body)?.phrase
        };
        prediction::predict(&handle, &phrase)
    })?;

    info!(
        "Predicted '{}' for classifier '{}' ({:.2}%)",
        result.winning_class,
        name,
        result.winning_percentage()
    );
    Ok(Json(result.into()))
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}
