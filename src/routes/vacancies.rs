use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::vacancy_dto::{AddVacancyPayload, MatchingCandidatesResponse, VacancyListResponse},
    error::Result,
    models::vacancy::Vacancy,
    services::vacancy_service::VacancyService,
    AppState,
};

async fn service(state: &AppState) -> Result<VacancyService> {
    Ok(VacancyService::new(state.data_store().await?, state.session.clone()))
}

#[utoipa::path(
    post,
    path = "/api/vacancies",
    request_body = AddVacancyPayload,
    responses(
        (status = 201, description = "Vacancy created successfully", body = Json<Vacancy>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Another vacancy is being saved")
    )
)]
#[axum::debug_handler]
pub async fn create_vacancy(
    State(state): State<AppState>,
    Json(payload): Json<AddVacancyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let _slot = state.in_flight.acquire("vacancy:add")?;
    let vacancy = service(&state).await?.create(payload).await?;
    Ok((StatusCode::CREATED, Json(vacancy)))
}

#[utoipa::path(
    get,
    path = "/api/vacancies",
    responses(
        (status = 200, description = "List of vacancies", body = Json<VacancyListResponse>),
        (status = 503, description = "Not connected to the record store")
    )
)]
#[axum::debug_handler]
pub async fn list_vacancies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let items = service(&state).await?.list().await;
    let total = items.len();
    let open = items.iter().filter(|v| v.is_open()).count();
    Ok(Json(VacancyListResponse { items, total, open }))
}

#[utoipa::path(
    get,
    path = "/api/vacancies/{id}",
    params(
        ("id" = String, Path, description = "Vacancy ID")
    ),
    responses(
        (status = 200, description = "Vacancy found", body = Json<Vacancy>),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn get_vacancy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let vacancy = service(&state).await?.get_by_id(&id).await?;
    Ok(Json(vacancy))
}

#[utoipa::path(
    post,
    path = "/api/vacancies/{id}/toggle-status",
    params(
        ("id" = String, Path, description = "Vacancy ID")
    ),
    responses(
        (status = 200, description = "Vacancy status switched between OPEN and FILLED", body = Json<Vacancy>),
        (status = 404, description = "Vacancy not found"),
        (status = 502, description = "Store rejected the update")
    )
)]
#[axum::debug_handler]
pub async fn toggle_vacancy_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let vacancy = service(&state).await?.toggle_status(&id).await?;
    Ok(Json(vacancy))
}

#[utoipa::path(
    get,
    path = "/api/vacancies/{id}/candidates",
    params(
        ("id" = String, Path, description = "Vacancy ID")
    ),
    responses(
        (status = 200, description = "Active candidates for an open vacancy", body = Json<MatchingCandidatesResponse>),
        (status = 400, description = "Vacancy is filled"),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn matching_candidates(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let (vacancy, candidates) = service(&state).await?.matching_candidates(&id).await?;
    Ok(Json(MatchingCandidatesResponse {
        vacancy,
        candidates,
    }))
}
