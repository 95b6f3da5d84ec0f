//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::domain::{DisplayWindow, InvalidSortMode, InvalidStopFlag, SortMode, StopFlag};
use crate::search::ControlError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", post(start_search).delete(stop_search))
        .route("/tickets", get(tickets))
        .route("/tickets/more", post(show_more))
        .route("/filters", put(set_filter))
        .route("/filters/all/toggle", post(toggle_all))
        .route("/sort", put(set_sort))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Start a new search, unless one is already running.
async fn start_search(State(state): State<AppState>) -> Json<StartResponse> {
    // The lifecycle runs detached; clients follow it through `/tickets`.
    let started = state.controller.start().is_some();
    if started {
        tracing::info!("search started");
    } else {
        tracing::debug!("search already running");
    }

    Json(StartResponse {
        started,
        status: state.controller.status().as_str(),
    })
}

/// Cancel the running search, keeping whatever it has found.
async fn stop_search(State(state): State<AppState>) -> Json<TicketsResponse> {
    state.controller.stop();
    Json(TicketsResponse::from_snapshot(&state.controller.snapshot()))
}

/// Current search status and the visible tickets.
async fn tickets(State(state): State<AppState>) -> Json<TicketsResponse> {
    Json(TicketsResponse::from_snapshot(&state.controller.snapshot()))
}

/// Reveal more tickets.
async fn show_more(
    State(state): State<AppState>,
    Query(req): Query<GrowRequest>,
) -> Result<Json<GrowResponse>, AppError> {
    let by = req.by.unwrap_or(DisplayWindow::STEP.get());
    let display_window = state.controller.grow_display_window(by)?;
    Ok(Json(GrowResponse { display_window }))
}

/// Set one stop-count checkbox.
async fn set_filter(
    State(state): State<AppState>,
    body: Result<Json<SetFilterRequest>, JsonRejection>,
) -> Result<Json<FilterResult>, AppError> {
    let Json(req) = body?;
    let flag: StopFlag = req.flag.parse().map_err(|e: InvalidStopFlag| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let filter = state.controller.set_filter(flag, req.value);
    Ok(Json(filter.into()))
}

/// Flip the "all" checkbox.
async fn toggle_all(State(state): State<AppState>) -> Json<FilterResult> {
    Json(state.controller.toggle_all().into())
}

/// Pick the sort order.
async fn set_sort(
    State(state): State<AppState>,
    body: Result<Json<SetSortRequest>, JsonRejection>,
) -> Result<Json<SortResponse>, AppError> {
    let Json(req) = body?;
    let mode: SortMode = req.mode.parse().map_err(|e: InvalidSortMode| AppError::BadRequest {
        message: e.to_string(),
    })?;

    state.controller.set_sort_mode(mode);
    Ok(Json(SortResponse {
        sort: mode.as_str(),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
}

impl From<ControlError> for AppError {
    fn from(e: ControlError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
        };

        tracing::warn!(%status, "{message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
