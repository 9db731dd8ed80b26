use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// A stored runtime configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Runtime {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Deserialize)]
pub struct CreateRuntime {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Deserialize)]
pub struct UpdateRuntime {
    pub display_name: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// JSON error body used for server-side failures.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub reason: String,
    pub message: String,
}

pub const VERSION: &str = "1.0.0";

pub type Db = Arc<RwLock<HashMap<String, Runtime>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/runtimes", get(list_runtimes).post(create_runtime))
        .route(
            "/runtimes/{name}",
            get(get_runtime).put(update_runtime).delete(delete_runtime),
        )
        .route("/jobs", get(list_jobs))
        .route("/version", get(version))
        .route("/export/{size}", get(export))
        .route("/failing", get(failing))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_runtimes(State(db): State<Db>) -> Json<Vec<Runtime>> {
    let runtimes = db.read().await;
    let mut all: Vec<Runtime> = runtimes.values().cloned().collect();
    all.sort_by(|a, b| a.name.cmp(&b.name));
    Json(all)
}

async fn create_runtime(State(db): State<Db>, Json(input): Json<CreateRuntime>) -> Response {
    if input.name.trim().is_empty() {
        let body = ErrorBody {
            reason: "Bad Request".to_string(),
            message: "runtime name must not be empty".to_string(),
        };
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }

    let mut runtimes = db.write().await;
    if runtimes.contains_key(&input.name) {
        tracing::debug!(name = %input.name, "runtime already exists");
        return StatusCode::CONFLICT.into_response();
    }

    let runtime = Runtime {
        id: Uuid::new_v4(),
        display_name: input.display_name.unwrap_or_else(|| input.name.clone()),
        name: input.name,
        metadata: input.metadata,
    };
    runtimes.insert(runtime.name.clone(), runtime.clone());
    (StatusCode::CREATED, Json(runtime)).into_response()
}

async fn get_runtime(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> Result<Json<Runtime>, StatusCode> {
    let runtimes = db.read().await;
    runtimes.get(&name).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_runtime(
    State(db): State<Db>,
    Path(name): Path<String>,
    Json(input): Json<UpdateRuntime>,
) -> Result<Json<Runtime>, StatusCode> {
    let mut runtimes = db.write().await;
    let runtime = runtimes.get_mut(&name).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(display_name) = input.display_name {
        runtime.display_name = display_name;
    }
    if let Some(metadata) = input.metadata {
        runtime.metadata = metadata;
    }
    Ok(Json(runtime.clone()))
}

async fn delete_runtime(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let mut runtimes = db.write().await;
    runtimes.remove(&name).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

// Only GET is routed; any other method on /jobs gets the router's 405.
async fn list_jobs() -> Json<Vec<serde_json::Value>> {
    Json(Vec::new())
}

async fn version() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], VERSION)
}

/// `size` bytes of opaque export data.
async fn export(Path(size): Path<usize>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        vec![b'x'; size],
    )
}

async fn failing() -> (StatusCode, Json<ErrorBody>) {
    let body = ErrorBody {
        reason: "Internal Server Error".to_string(),
        message: "the server failed to process the request".to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body))
}
