//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::warn;

use crate::board::BoardError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/routes", get(list_routes))
        .route("/journeys", get(current_journeys))
        .route("/session", get(session_status))
        .route("/session/connect", post(connect))
        .route("/session/disconnect", post(disconnect))
        .route("/selection/next", post(next_route))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List the route catalog with the current selection.
async fn list_routes(State(state): State<AppState>) -> Result<Json<RoutesResponse>, AppError> {
    let status = state.board.status().await?;

    let routes = state
        .catalog
        .pairs()
        .iter()
        .enumerate()
        .map(|(index, pair)| RouteResult::from_pair(index, pair))
        .collect();

    Ok(Json(RoutesResponse {
        routes,
        selected: status.selection.current_index,
    }))
}

/// The journey list as last rendered.
async fn current_journeys(State(state): State<AppState>) -> Json<JourneysResponse> {
    let view = state.view.borrow();
    Json(JourneysResponse::from(&*view))
}

/// Session and selection state.
async fn session_status(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    let status = state.board.status().await?;
    Ok(Json(SessionResponse::from(&status)))
}

/// Connect to the worker.
async fn connect(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    state.board.connect()?;
    session_status(State(state)).await
}

/// Disconnect from the worker.
async fn disconnect(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    state.board.disconnect()?;
    session_status(State(state)).await
}

/// Select the next route and fetch its journeys.
async fn next_route(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    state.board.advance_selection()?;
    session_status(State(state)).await
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    Unavailable { message: String },
}

impl From<BoardError> for AppError {
    fn from(e: BoardError) -> Self {
        AppError::Unavailable {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message.clone()),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
