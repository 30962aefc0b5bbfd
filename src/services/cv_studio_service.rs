//! Commands of the CV Studio: selecting whose CV is open, editing the
//! document, saving it back to the candidate and AI polishing.

use std::sync::Arc;
use tokio::sync::RwLock;
use validator::Validate;

use crate::database::{RecordStore, Table};
use crate::dto::cv_dto::StudioResponse;
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::models::cv::{CvDocument, EducationUpdate, ExperienceUpdate, ProfileUpdate};
use crate::services::ai_service::AIService;
use crate::services::render_service::render_cv;
use crate::session::Session;
use crate::transform::candidate::{from_record, CandidatePatch};
use crate::utils::id::IdGenerator;

/// Editing commands only touch the session; they need no store.
#[derive(Clone)]
pub struct CvStudioService {
    session: Arc<RwLock<Session>>,
    ids: Arc<dyn IdGenerator>,
}

impl CvStudioService {
    pub fn new(session: Arc<RwLock<Session>>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { session, ids }
    }

    pub async fn current(&self) -> StudioResponse {
        StudioResponse::from(&self.session.read().await.studio)
    }

    /// Opens a candidate's CV, or a blank document when `candidate_id` is `None`.
    pub async fn select(&self, candidate_id: Option<&str>) -> Result<StudioResponse> {
        let mut session = self.session.write().await;
        let document = match candidate_id {
            Some(id) => {
                let candidate = session
                    .candidate(id)
                    .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))?;
                CvDocument::for_candidate(candidate)
            }
            None => CvDocument::default(),
        };
        session
            .studio
            .replace(candidate_id.map(|id| id.to_string()), document);
        Ok(StudioResponse::from(&session.studio))
    }

    pub async fn set_field(&self, update: ProfileUpdate) -> StudioResponse {
        let mut session = self.session.write().await;
        session.studio.document.set_field(update);
        StudioResponse::from(&session.studio)
    }

    pub async fn add_education(&self) -> (String, StudioResponse) {
        let mut session = self.session.write().await;
        let id = session.studio.document.add_education(self.ids.as_ref());
        (id, StudioResponse::from(&session.studio))
    }

    pub async fn remove_education(&self, id: &str) -> StudioResponse {
        let mut session = self.session.write().await;
        if !session.studio.document.remove_education(id) {
            tracing::debug!("No education entry {} to remove", id);
        }
        StudioResponse::from(&session.studio)
    }

    pub async fn update_education(&self, id: &str, update: EducationUpdate) -> StudioResponse {
        let mut session = self.session.write().await;
        session.studio.document.update_education(id, update);
        StudioResponse::from(&session.studio)
    }

    pub async fn add_experience(&self) -> (String, StudioResponse) {
        let mut session = self.session.write().await;
        let id = session.studio.document.add_experience(self.ids.as_ref());
        (id, StudioResponse::from(&session.studio))
    }

    pub async fn remove_experience(&self, id: &str) -> StudioResponse {
        let mut session = self.session.write().await;
        if !session.studio.document.remove_experience(id) {
            tracing::debug!("No experience entry {} to remove", id);
        }
        StudioResponse::from(&session.studio)
    }

    pub async fn update_experience(&self, id: &str, update: ExperienceUpdate) -> StudioResponse {
        let mut session = self.session.write().await;
        session.studio.document.update_experience(id, update);
        StudioResponse::from(&session.studio)
    }

    /// Printable page for the open document with the agency's branding.
    pub async fn render(&self) -> String {
        let session = self.session.read().await;
        render_cv(&session.studio.document, &session.settings)
    }

    /// Writes the document to its candidate, creating the candidate when the
    /// studio was started blank. Flat profile columns are back-filled from
    /// the document.
    pub async fn save(&self, store: &dyn RecordStore) -> Result<Candidate> {
        let (existing, candidate_id, document, generation) = {
            let session = self.session.read().await;
            let candidate_id = session.studio.candidate_id.clone();
            let existing = match candidate_id.as_deref() {
                Some(id) => Some(
                    session
                        .candidate(id)
                        .cloned()
                        .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))?,
                ),
                None => None,
            };
            (
                existing,
                candidate_id,
                session.studio.document.clone(),
                session.studio.generation,
            )
        };
        document.validate()?;

        let mut patch = CandidatePatch {
            full_name: Some(document.full_name.clone()),
            mobile: Some(document.mobile.clone()),
            address: Some(document.address.clone()),
            skills: Some(document.skills.clone()),
            experience: Some(document.experience_summary()),
            education: Some(document.education_summary()),
            cv_data: Some(document),
            ..Default::default()
        };

        match (candidate_id, existing) {
            (Some(id), Some(mut candidate)) => {
                store
                    .update(Table::Candidates, &id, patch.to_record())
                    .await?;
                let mut session = self.session.write().await;
                match session.candidate_mut(&id) {
                    Some(current) => {
                        patch.apply(current);
                        candidate = current.clone();
                    }
                    None => patch.apply(&mut candidate),
                }
                tracing::info!("CV saved for candidate {}", id);
                Ok(candidate)
            }
            _ => {
                patch.status = Some(CandidateStatus::Active);
                patch.is_ai_enhanced = Some(false);
                let row = store.insert(Table::Candidates, patch.to_record()).await?;
                let candidate = from_record(&row);

                let mut session = self.session.write().await;
                session.candidates.insert(0, candidate.clone());
                // The open document now belongs to the new candidate, unless
                // another one was opened meanwhile.
                if session.studio.generation == generation {
                    session.studio.candidate_id = Some(candidate.id.clone());
                }
                tracing::info!("Candidate {} created from CV Studio", candidate.id);
                Ok(candidate)
            }
        }
    }

    /// Merges an AI rewrite of summary, experiences and skills into the open
    /// document. The result is dropped if the document was replaced while the
    /// request was outstanding.
    pub async fn polish(&self, ai: &AIService) -> Result<StudioResponse> {
        let (document, generation) = {
            let session = self.session.read().await;
            (session.studio.document.clone(), session.studio.generation)
        };

        let polish = ai.polish_cv(&document).await?;

        let mut session = self.session.write().await;
        if session.studio.generation != generation {
            tracing::warn!(
                "Discarding CV polish for generation {}, studio is at {}",
                generation,
                session.studio.generation
            );
            return Err(Error::Conflict(
                "CV document was replaced while polishing; result discarded".to_string(),
            ));
        }
        polish.merge_into(&mut session.studio.document, self.ids.as_ref());
        Ok(StudioResponse::from(&session.studio))
    }
}
