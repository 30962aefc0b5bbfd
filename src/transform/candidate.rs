use serde_json::Value as JsonValue;

use super::{coerce_text, text, RecordBuilder};
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::models::cv::CvDocument;
use crate::utils::time::parse_timestamp;

pub fn from_record(record: &JsonValue) -> Candidate {
    let status_raw = text(record, &["status"]);
    Candidate {
        id: text(record, &["id"]),
        full_name: text(record, &["full_name"]),
        mobile: text(record, &["mobile"]),
        address: text(record, &["address"]),
        skills: coerce_text(record.get("skills")),
        experience: coerce_text(record.get("experience")),
        education: coerce_text(record.get("education")),
        status: CandidateStatus::parse(&status_raw).unwrap_or_default(),
        created_at: record
            .get("created_at")
            .and_then(|v| v.as_str())
            .and_then(parse_timestamp),
        is_ai_enhanced: record
            .get("is_ai_enhanced")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        cv_data: cv_data(record),
    }
}

fn cv_data(record: &JsonValue) -> Option<CvDocument> {
    let raw = record.get("cv_data").filter(|v| !v.is_null())?;
    // Some rows hold the document as serialized text.
    let parsed = match raw {
        JsonValue::String(s) => serde_json::from_str(s),
        other => serde_json::from_value(other.clone()),
    };
    match parsed {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::warn!("Ignoring unreadable cv_data on candidate {:?}: {}", record.get("id"), e);
            None
        }
    }
}

/// Columns to write for a candidate; unset fields are left untouched by the store.
#[derive(Debug, Clone, Default)]
pub struct CandidatePatch {
    pub full_name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub status: Option<CandidateStatus>,
    pub cv_data: Option<CvDocument>,
    pub is_ai_enhanced: Option<bool>,
}

impl CandidatePatch {
    pub fn status(status: CandidateStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn to_record(&self) -> JsonValue {
        let cv_data = self
            .cv_data
            .as_ref()
            .and_then(|cv| serde_json::to_value(cv).ok());
        RecordBuilder::default()
            .maybe("full_name", self.full_name.clone())
            .maybe("mobile", self.mobile.clone())
            .maybe("address", self.address.clone())
            .maybe("skills", self.skills.clone())
            .maybe("experience", self.experience.clone())
            .maybe("education", self.education.clone())
            .maybe("status", self.status.map(|s| s.as_str()))
            .maybe("cv_data", cv_data)
            .maybe("is_ai_enhanced", self.is_ai_enhanced)
            .build()
    }

    /// Applies the same changes to an in-memory candidate.
    pub fn apply(&self, candidate: &mut Candidate) {
        if let Some(v) = &self.full_name {
            candidate.full_name = v.clone();
        }
        if let Some(v) = &self.mobile {
            candidate.mobile = v.clone();
        }
        if let Some(v) = &self.address {
            candidate.address = v.clone();
        }
        if let Some(v) = &self.skills {
            candidate.skills = v.clone();
        }
        if let Some(v) = &self.experience {
            candidate.experience = v.clone();
        }
        if let Some(v) = &self.education {
            candidate.education = v.clone();
        }
        if let Some(v) = self.status {
            candidate.status = v;
        }
        if let Some(v) = &self.cv_data {
            candidate.cv_data = Some(v.clone());
        }
        if let Some(v) = self.is_ai_enhanced {
            candidate.is_ai_enhanced = v;
        }
    }
}
