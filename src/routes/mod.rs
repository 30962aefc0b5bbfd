pub mod candidates;
pub mod connection;
pub mod cv_studio;
pub mod dashboard;
pub mod export;
pub mod health;
pub mod placements;
pub mod search;
pub mod settings;
pub mod vacancies;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn app(state: AppState) -> Router {
    let connection_api = Router::new()
        .route(
            "/api/connection",
            get(connection::get_status)
                .post(connection::connect)
                .delete(connection::disconnect),
        )
        .route("/api/refresh", post(connection::refresh));

    let records_api = Router::new()
        .route(
            "/api/candidates",
            get(candidates::list_candidates).post(candidates::add_candidate),
        )
        .route("/api/candidates/:id", get(candidates::get_candidate))
        .route(
            "/api/candidates/:id/enhance",
            post(candidates::enhance_candidate),
        )
        .route(
            "/api/vacancies",
            get(vacancies::list_vacancies).post(vacancies::create_vacancy),
        )
        .route("/api/vacancies/:id", get(vacancies::get_vacancy))
        .route(
            "/api/vacancies/:id/toggle-status",
            post(vacancies::toggle_vacancy_status),
        )
        .route(
            "/api/vacancies/:id/candidates",
            get(vacancies::matching_candidates),
        )
        .route(
            "/api/placements",
            get(placements::list_placements).post(placements::record_placement),
        )
        .route("/api/placements/:id/mark-paid", post(placements::mark_paid))
        .route("/api/placements/export", get(export::export_commissions))
        .route(
            "/api/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/api/search", get(search::search_all))
        .route("/api/dashboard/stats", get(dashboard::get_dashboard_stats));

    let studio_api = Router::new()
        .route("/api/studio", get(cv_studio::get_studio))
        .route("/api/studio/select", post(cv_studio::select_candidate))
        .route(
            "/api/studio/profile",
            patch(cv_studio::set_field),
        )
        .route("/api/studio/educations", post(cv_studio::add_education))
        .route(
            "/api/studio/educations/:id",
            patch(cv_studio::update_education).delete(cv_studio::remove_education),
        )
        .route("/api/studio/experiences", post(cv_studio::add_experience))
        .route(
            "/api/studio/experiences/:id",
            patch(cv_studio::update_experience)
                .delete(cv_studio::remove_experience),
        )
        .route("/api/studio/save", post(cv_studio::save_cv))
        .route("/api/studio/polish", post(cv_studio::polish_cv))
        .route("/api/studio/render", get(cv_studio::render_cv));

    Router::new()
        .route("/health", get(health::health))
        .merge(connection_api)
        .merge(records_api)
        .merge(studio_api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
