//! HTTP route handlers for the ChatUIX API.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::services::ServeDir;

use crate::chat::{
    DispatchRequest, FallbackReply, Reply, SessionError, SessionId, SessionSnapshot,
    TurnOutcome, TurnRequest,
};

use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/chat", post(chat))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session).delete(delete_session))
        .route("/api/sessions/{id}/turns", post(session_turn));

    let router = match &state.config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "chatuix",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Stateless dispatch: the caller holds transcript and context.
///
/// An unreadable body gets the same fallback reply as a failed dispatch.
async fn chat(
    State(state): State<Arc<AppState>>,
    request: Result<Json<DispatchRequest>, JsonRejection>,
) -> Result<Json<Reply>, (StatusCode, Json<FallbackReply>)> {
    let Json(request) = request.map_err(|rejection| {
        tracing::warn!("Rejected chat request: {}", rejection.body_text());
        (StatusCode::INTERNAL_SERVER_ERROR, Json(FallbackReply::default()))
    })?;
    state
        .dispatcher
        .respond(&request)
        .map(Json)
        .map_err(|fallback| (StatusCode::INTERNAL_SERVER_ERROR, Json(fallback)))
}

fn session_error(err: SessionError) -> (StatusCode, String) {
    let status = match err {
        SessionError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionError::LimitReached(_) => StatusCode::SERVICE_UNAVAILABLE,
        SessionError::EmptyTurn => StatusCode::BAD_REQUEST,
    };
    (status, err.to_string())
}

async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<SessionSnapshot>), (StatusCode, String)> {
    state
        .sessions
        .create()
        .map(|snapshot| (StatusCode::CREATED, Json(snapshot)))
        .map_err(session_error)
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionSnapshot>, (StatusCode, String)> {
    state.sessions.get(id).map(Json).map_err(session_error)
}

async fn session_turn(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<TurnOutcome>, (StatusCode, String)> {
    let turn = request.into_turn().map_err(session_error)?;
    state
        .sessions
        .submit(id, &state.dispatcher, turn)
        .map(Json)
        .map_err(session_error)
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .sessions
        .remove(id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(session_error)
}
