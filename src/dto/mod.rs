pub mod candidate_dto;
pub mod connection_dto;
pub mod cv_dto;
pub mod placement_dto;
pub mod settings_dto;
pub mod vacancy_dto;
