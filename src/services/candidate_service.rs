use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::{RecordStore, Table};
use crate::dto::candidate_dto::AddCandidatePayload;
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::services::ai_service::{AIService, CandidateEnhancement};
use crate::session::Session;
use crate::transform::candidate::{from_record, CandidatePatch};

#[derive(Clone)]
pub struct CandidateService {
    store: Arc<dyn RecordStore>,
    session: Arc<RwLock<Session>>,
}

impl CandidateService {
    pub fn new(store: Arc<dyn RecordStore>, session: Arc<RwLock<Session>>) -> Self {
        Self { store, session }
    }

    pub async fn list(&self) -> Vec<Candidate> {
        self.session.read().await.candidates.clone()
    }

    pub async fn get(&self, id: &str) -> Result<Candidate> {
        self.session
            .read()
            .await
            .candidate(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))
    }

    /// New candidates start ACTIVE, not AI-enhanced and without a CV document.
    pub async fn add(&self, payload: AddCandidatePayload) -> Result<Candidate> {
        let patch = CandidatePatch {
            full_name: Some(payload.full_name),
            mobile: Some(payload.mobile),
            address: Some(payload.address),
            skills: Some(payload.skills),
            experience: Some(payload.experience),
            education: Some(payload.education),
            status: Some(CandidateStatus::Active),
            cv_data: None,
            is_ai_enhanced: Some(false),
        };
        let row = self.store.insert(Table::Candidates, patch.to_record()).await?;
        let candidate = from_record(&row);
        tracing::info!("Candidate {} added", candidate.id);

        self.session
            .write()
            .await
            .candidates
            .insert(0, candidate.clone());
        Ok(candidate)
    }

    /// Asks the AI for a polished profile and stores the polished skills.
    pub async fn enhance(
        &self,
        id: &str,
        ai: &AIService,
    ) -> Result<(Candidate, CandidateEnhancement)> {
        let mut candidate = self.get(id).await?;
        let enhancement = ai.enhance_candidate(&candidate).await?;

        let patch = CandidatePatch {
            skills: Some(enhancement.skills.clone()),
            is_ai_enhanced: Some(true),
            ..Default::default()
        };
        self.store
            .update(Table::Candidates, id, patch.to_record())
            .await?;

        let mut session = self.session.write().await;
        match session.candidate_mut(id) {
            Some(current) => {
                patch.apply(current);
                candidate = current.clone();
            }
            None => patch.apply(&mut candidate),
        }
        Ok((candidate, enhancement))
    }
}
