use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{error::Result, services::search_service::search, AppState};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[axum::debug_handler]
pub async fn search_all(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    state.data_store().await?;
    let session = state.session.read().await;
    let results = search(
        &query.q,
        &session.candidates,
        &session.vacancies,
        &session.placements,
    );
    Ok(Json(results))
}
