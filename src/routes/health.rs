use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let connected = state.store().await.is_ok();
    let body = json!({
        "status": "ok",
        "connected": connected,
    });
    (StatusCode::OK, Json(body))
}
