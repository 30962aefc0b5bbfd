use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    dto::settings_dto::UpdateSettingsPayload, error::Result,
    services::settings_service::SettingsService, AppState,
};

#[axum::debug_handler]
pub async fn get_settings(State(state): State<AppState>) -> Result<impl IntoResponse> {
    state.data_store().await?;
    Ok(Json(state.session.read().await.settings.clone()))
}

#[axum::debug_handler]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateSettingsPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let _slot = state.in_flight.acquire("settings:save")?;
    let service = SettingsService::new(state.data_store().await?, state.session.clone());
    let settings = service.update(payload.into()).await?;
    Ok(Json(settings))
}
