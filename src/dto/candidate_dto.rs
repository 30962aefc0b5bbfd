use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::candidate::Candidate;
use crate::services::ai_service::CandidateEnhancement;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCandidatePayload {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "Mobile number is required"))]
    pub mobile: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub education: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateListResponse {
    pub items: Vec<Candidate>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceCandidateResponse {
    pub candidate: Candidate,
    pub enhancement: CandidateEnhancement,
}
