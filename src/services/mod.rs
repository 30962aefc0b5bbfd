pub mod ai_service;
pub mod candidate_service;
pub mod commission_service;
pub mod cv_studio_service;
pub mod dashboard_service;
pub mod export_service;
pub mod placement_service;
pub mod render_service;
pub mod search_service;
pub mod settings_service;
pub mod vacancy_service;
