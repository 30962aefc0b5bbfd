use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use validator::Validate;

use crate::{
    dto::placement_dto::{PlacementListResponse, PlacementResponse, RecordPlacementPayload},
    error::Result,
    services::placement_service::PlacementService,
    utils::time::today,
    AppState,
};

async fn service(state: &AppState) -> Result<PlacementService> {
    Ok(PlacementService::new(state.data_store().await?, state.session.clone()))
}

#[axum::debug_handler]
pub async fn list_placements(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let items = service(&state).await?.list(today()).await;
    let total = items.len();
    Ok(Json(PlacementListResponse { items, total }))
}

#[axum::debug_handler]
pub async fn record_placement(
    State(state): State<AppState>,
    Json(payload): Json<RecordPlacementPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let _slot = state.in_flight.acquire("placement:record")?;
    let outcome = service(&state).await?.record(payload).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

#[axum::debug_handler]
pub async fn mark_paid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let placement = service(&state).await?.mark_paid(&id).await?;
    let name = state
        .session
        .read()
        .await
        .candidate_name(&placement.candidate_id)
        .to_string();
    Ok(Json(PlacementResponse::new(placement, &name, today())))
}
