use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{
    error::Result,
    services::dashboard_service::{dashboard_stats, StatsWindow},
    utils::time::today,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub window: StatsWindow,
}

#[axum::debug_handler]
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse> {
    state.data_store().await?;
    let session = state.session.read().await;
    Ok(Json(dashboard_stats(&session, query.window, today())))
}
