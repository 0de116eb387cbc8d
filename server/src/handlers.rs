use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use common::{
    classify, ActionError, ErrorBody, FailureKind, MessageBody, Trigger, BUSINESS_TRIGGERS,
    RUN_TRIGGERS, TASK_NOT_RECOGNIZED,
};
use serde::Deserialize;
use serde_json::Value;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/read", get(read))
        .route("/run", post(run))
        .route("/run-business", post(run_business))
        .route("/agent", post(agent))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ReadParams {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskParams {
    pub task: String,
}

/// Error de acción convertido a respuesta HTTP con cuerpo JSON.
pub struct ApiError(ActionError);

impl From<ActionError> for ApiError {
    fn from(err: ActionError) -> Self {
        Self(err)
    }
}

pub fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::Forbidden => StatusCode::FORBIDDEN,
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody::from(&self.0);
        (status_for(body.error), Json(body)).into_response()
    }
}

/* ---------------- handlers HTTP ---------------- */

async fn home() -> Json<MessageBody> {
    Json(MessageBody::new("task runner is up"))
}

// Devuelve el contenido del archivo como texto plano (sólo dentro de data_root)
async fn read(
    State(state): State<AppState>,
    Query(params): Query<ReadParams>,
) -> Result<String, ApiError> {
    let root = state.settings.data_root.clone();
    let path = params.path;

    let content = tokio::task::spawn_blocking(move || common::files::read_file(&root, &path))
        .await
        .map_err(|e| ActionError::Aborted(e.to_string()))??;

    Ok(content)
}

async fn run(State(state): State<AppState>, Query(params): Query<TaskParams>) -> Response {
    run_with_table(&state, &params.task, RUN_TRIGGERS).await
}

async fn run_business(State(state): State<AppState>, Query(params): Query<TaskParams>) -> Response {
    run_with_table(&state, &params.task, BUSINESS_TRIGGERS).await
}

// Clasifica, ejecuta y responde. Tarea no reconocida -> 200 con mensaje.
async fn run_with_table(state: &AppState, task: &str, table: &[Trigger]) -> Response {
    let Some(action) = classify(task, table, &state.settings) else {
        info!("tarea no reconocida: {:?}", task);
        return Json(MessageBody::new(TASK_NOT_RECOGNIZED)).into_response();
    };

    info!("tarea {:?} -> {}", task, action.kind());

    match state.executor.execute(&action).await {
        Ok(output) => Json(output).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

// Manda la tarea cruda al proxy LLM, sin clasificar nada localmente
async fn agent(
    State(state): State<AppState>,
    Query(params): Query<TaskParams>,
) -> Result<Json<Value>, ApiError> {
    let reply = state.executor.llm().chat(&params.task).await?;
    Ok(Json(reply))
}
