use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    config::{forget_key, save_connection, StoreCredentials},
    dto::connection_dto::{ConnectPayload, ConnectionStatus},
    error::Result,
    AppState,
};

async fn status_of(state: &AppState) -> ConnectionStatus {
    let connected = state.store().await.is_ok();
    ConnectionStatus {
        connected,
        error: if connected { None } else { state.connection_error().await },
        load_error: state.session.read().await.load_error.clone(),
    }
}

#[axum::debug_handler]
pub async fn get_status(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(status_of(&state).await))
}

/// Connects with new credentials. Privileged keys are refused before any
/// client exists; a working connection is remembered locally.
#[axum::debug_handler]
pub async fn connect(
    State(state): State<AppState>,
    Json(payload): Json<ConnectPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let credentials = StoreCredentials::new(payload.url, payload.key);
    state.connect(&credentials).await?;

    if let Some(path) = &state.connection_file {
        if let Err(e) = save_connection(path, &credentials).await {
            tracing::warn!("Could not remember store connection in {:?}: {}", path, e);
        }
    }
    Ok(Json(status_of(&state).await))
}

#[axum::debug_handler]
pub async fn disconnect(State(state): State<AppState>) -> Result<impl IntoResponse> {
    state.disconnect().await;
    if let Some(path) = &state.connection_file {
        forget_key(path).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Manual refresh: reloads every collection, local edits since the last load are lost.
#[axum::debug_handler]
pub async fn refresh(State(state): State<AppState>) -> Result<impl IntoResponse> {
    state.refresh().await?;
    Ok(Json(status_of(&state).await))
}
