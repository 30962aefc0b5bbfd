use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    dto::cv_dto::{EntryCreatedResponse, SelectCandidatePayload},
    error::Result,
    models::cv::{EducationUpdate, ExperienceUpdate, ProfileUpdate},
    services::cv_studio_service::CvStudioService,
    AppState,
};

fn studio(state: &AppState) -> CvStudioService {
    CvStudioService::new(state.session.clone(), state.ids.clone())
}

#[axum::debug_handler]
pub async fn get_studio(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(studio(&state).current().await))
}

#[axum::debug_handler]
pub async fn select_candidate(
    State(state): State<AppState>,
    Json(payload): Json<SelectCandidatePayload>,
) -> Result<impl IntoResponse> {
    let response = studio(&state)
        .select(payload.candidate_id.as_deref())
        .await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn set_field(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<impl IntoResponse> {
    Ok(Json(studio(&state).set_field(update).await))
}

#[axum::debug_handler]
pub async fn add_education(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let (id, studio) = studio(&state).add_education().await;
    Ok((StatusCode::CREATED, Json(EntryCreatedResponse { id, studio })))
}

#[axum::debug_handler]
pub async fn update_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<EducationUpdate>,
) -> Result<impl IntoResponse> {
    Ok(Json(studio(&state).update_education(&id, update).await))
}

#[axum::debug_handler]
pub async fn remove_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(Json(studio(&state).remove_education(&id).await))
}

#[axum::debug_handler]
pub async fn add_experience(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let (id, studio) = studio(&state).add_experience().await;
    Ok((StatusCode::CREATED, Json(EntryCreatedResponse { id, studio })))
}

#[axum::debug_handler]
pub async fn update_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ExperienceUpdate>,
) -> Result<impl IntoResponse> {
    Ok(Json(studio(&state).update_experience(&id, update).await))
}

#[axum::debug_handler]
pub async fn remove_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(Json(studio(&state).remove_experience(&id).await))
}

#[axum::debug_handler]
pub async fn save_cv(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let _slot = state.in_flight.acquire("cv:save")?;
    let store = state.data_store().await?;
    let candidate = studio(&state).save(store.as_ref()).await?;
    Ok(Json(candidate))
}

#[axum::debug_handler]
pub async fn polish_cv(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let _slot = state.in_flight.acquire("cv:polish")?;
    let response = studio(&state).polish(&state.ai_service).await?;
    Ok(Json(response))
}

/// Printable A4 page of the open document.
#[axum::debug_handler]
pub async fn render_cv(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let html = studio(&state).render().await;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    ))
}
