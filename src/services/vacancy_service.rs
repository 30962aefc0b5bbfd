use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::{RecordStore, Table};
use crate::dto::vacancy_dto::AddVacancyPayload;
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::models::vacancy::{Vacancy, VacancyStatus};
use crate::session::Session;
use crate::transform::vacancy::{from_record, VacancyPatch};

#[derive(Clone)]
pub struct VacancyService {
    store: Arc<dyn RecordStore>,
    session: Arc<RwLock<Session>>,
}

impl VacancyService {
    pub fn new(store: Arc<dyn RecordStore>, session: Arc<RwLock<Session>>) -> Self {
        Self { store, session }
    }

    pub async fn list(&self) -> Vec<Vacancy> {
        self.session.read().await.vacancies.clone()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Vacancy> {
        self.session
            .read()
            .await
            .vacancy(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Vacancy {} not found", id)))
    }

    pub async fn create(&self, payload: AddVacancyPayload) -> Result<Vacancy> {
        let count = payload.headcount();
        let patch = VacancyPatch {
            company_name: Some(payload.company_name),
            contact_person: Some(payload.contact_person),
            phone: Some(payload.phone),
            address: Some(payload.address),
            role: Some(payload.role),
            count: Some(count),
            timing: Some(payload.timing),
            required_skills: Some(payload.required_skills),
            salary: Some(payload.salary),
            remarks: Some(payload.remarks),
            status: Some(VacancyStatus::Open),
        };
        let row = self.store.insert(Table::Vacancies, patch.to_record()).await?;
        let vacancy = from_record(&row);
        tracing::info!("Vacancy {} opened at {}", vacancy.id, vacancy.company_name);

        self.session.write().await.vacancies.insert(0, vacancy.clone());
        Ok(vacancy)
    }

    /// OPEN <-> FILLED. Local state changes only once the store accepted it.
    pub async fn toggle_status(&self, id: &str) -> Result<Vacancy> {
        let current = self.get_by_id(id).await?;
        let next = current.status.toggled();
        self.store
            .update(Table::Vacancies, id, VacancyPatch::status(next).to_record())
            .await?;

        let mut session = self.session.write().await;
        let vacancy = match session.vacancies.iter_mut().find(|v| v.id == id) {
            Some(v) => {
                v.status = next;
                v.clone()
            }
            None => Vacancy {
                status: next,
                ..current
            },
        };
        tracing::info!("Vacancy {} is now {}", id, next.as_str());
        Ok(vacancy)
    }

    /// ACTIVE candidates that may be proposed for an OPEN vacancy.
    pub async fn matching_candidates(&self, id: &str) -> Result<(Vacancy, Vec<Candidate>)> {
        let session = self.session.read().await;
        let vacancy = session
            .vacancy(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Vacancy {} not found", id)))?;
        if !vacancy.is_open() {
            return Err(Error::BadRequest(format!(
                "Vacancy {} is {} and cannot be matched",
                id,
                vacancy.status.as_str()
            )));
        }
        let candidates = session
            .candidates
            .iter()
            .filter(|c| c.status == CandidateStatus::Active)
            .cloned()
            .collect();
        Ok((vacancy, candidates))
    }
}
