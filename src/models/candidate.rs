use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::cv::CvDocument;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateStatus {
    #[default]
    Active,
    Placed,
    Archived,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Active => "ACTIVE",
            CandidateStatus::Placed => "PLACED",
            CandidateStatus::Archived => "ARCHIVED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(CandidateStatus::Active),
            "PLACED" => Some(CandidateStatus::Placed),
            "ARCHIVED" => Some(CandidateStatus::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub full_name: String,
    pub mobile: String,
    pub address: String,
    pub skills: String,
    pub experience: String,
    pub education: String,
    pub status: CandidateStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub is_ai_enhanced: bool,
    pub cv_data: Option<CvDocument>,
}
