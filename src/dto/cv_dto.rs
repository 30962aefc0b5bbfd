use serde::{Deserialize, Serialize};

use crate::models::cv::CvDocument;
use crate::session::CvStudio;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectCandidatePayload {
    /// `None` starts a blank document for a new candidate.
    #[serde(default)]
    pub candidate_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioResponse {
    pub candidate_id: Option<String>,
    pub generation: u64,
    pub document: CvDocument,
}

impl From<&CvStudio> for StudioResponse {
    fn from(studio: &CvStudio) -> Self {
        Self {
            candidate_id: studio.candidate_id.clone(),
            generation: studio.generation,
            document: studio.document.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryCreatedResponse {
    pub id: String,
    #[serde(flatten)]
    pub studio: StudioResponse,
}
