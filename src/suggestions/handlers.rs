use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::Response,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument, warn};

use super::{dto::CreateSuggestionRequest, repo, repo_types::Suggestion, services};
use crate::state::AppState;

pub fn suggestion_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/suggestions",
            get(list_suggestions)
                .post(create_suggestion)
                .options(preflight),
        )
        .route_layer(middleware::map_response(cors_headers))
}

#[instrument(skip(state))]
pub async fn list_suggestions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Suggestion>>, (StatusCode, String)> {
    let rows = repo::list_recent(&state.db).await.map_err(|e| {
        error!(error = %e, "list suggestions failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn create_suggestion(
    State(state): State<AppState>,
    payload: Bytes,
) -> Result<(StatusCode, Json<Suggestion>), (StatusCode, String)> {
    let body = CreateSuggestionRequest::from_slice(&payload).map_err(|e| {
        warn!(error = %e, "malformed suggestion body");
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    let suggestion = services::create_and_notify(&state, body.into())
        .await
        .map_err(|e| {
            error!(error = %e, "create suggestion failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {e}"),
            )
        })?;

    Ok((StatusCode::CREATED, Json(suggestion)))
}

pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn cors_headers(mut res: Response) -> Response {
    let headers = res.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    res
}
