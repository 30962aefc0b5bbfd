use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    dto::candidate_dto::{AddCandidatePayload, CandidateListResponse, EnhanceCandidateResponse},
    error::Result,
    services::candidate_service::CandidateService,
    AppState,
};

async fn service(state: &AppState) -> Result<CandidateService> {
    Ok(CandidateService::new(state.data_store().await?, state.session.clone()))
}

#[axum::debug_handler]
pub async fn list_candidates(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let items = service(&state).await?.list().await;
    let total = items.len();
    Ok(Json(CandidateListResponse { items, total }))
}

#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let candidate = service(&state).await?.get(&id).await?;
    Ok(Json(candidate))
}

#[axum::debug_handler]
pub async fn add_candidate(
    State(state): State<AppState>,
    Json(payload): Json<AddCandidatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let _slot = state.in_flight.acquire("candidate:add")?;
    let candidate = service(&state).await?.add(payload).await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

#[axum::debug_handler]
pub async fn enhance_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let _slot = state.in_flight.acquire(format!("candidate:enhance:{}", id))?;
    let (candidate, enhancement) = service(&state)
        .await?
        .enhance(&id, &state.ai_service)
        .await?;
    Ok(Json(EnhanceCandidateResponse {
        candidate,
        enhancement,
    }))
}
