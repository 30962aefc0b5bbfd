use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;
use validator::Validate;

use crate::database::{RecordStore, Table};
use crate::dto::placement_dto::{PlacementResponse, RecordPlacementOutcome, RecordPlacementPayload};
use crate::error::{Error, Result};
use crate::models::candidate::CandidateStatus;
use crate::models::placement::{PaymentStatus, Placement};
use crate::services::commission_service::derive_commission;
use crate::session::Session;
use crate::transform::candidate::CandidatePatch;
use crate::transform::placement::{from_record, payment_status_patch, NewPlacement};

#[derive(Clone)]
pub struct PlacementService {
    store: Arc<dyn RecordStore>,
    session: Arc<RwLock<Session>>,
}

impl PlacementService {
    pub fn new(store: Arc<dyn RecordStore>, session: Arc<RwLock<Session>>) -> Self {
        Self { store, session }
    }

    pub async fn list(&self, today: NaiveDate) -> Vec<PlacementResponse> {
        let session = self.session.read().await;
        session
            .placements
            .iter()
            .map(|p| PlacementResponse::new(p.clone(), session.candidate_name(&p.candidate_id), today))
            .collect()
    }

    /// Stores the placement with its commission, then marks the candidate as
    /// placed. The two writes are not atomic: when the second one fails the
    /// placement stays recorded and the outcome carries a warning.
    pub async fn record(&self, payload: RecordPlacementPayload) -> Result<RecordPlacementOutcome> {
        payload.validate()?;

        let (candidate, percent) = {
            let session = self.session.read().await;
            let candidate = session
                .candidate(&payload.candidate_id)
                .cloned()
                .ok_or_else(|| {
                    Error::NotFound(format!("Candidate {} not found", payload.candidate_id))
                })?;
            (candidate, session.settings.commission_percent)
        };

        let commission = derive_commission(payload.salary, percent, payload.joining_date);
        let new = NewPlacement {
            candidate_id: candidate.id.clone(),
            company_name: payload.company_name,
            job_role: payload.job_role,
            salary: payload.salary,
            joining_date: payload.joining_date,
            commission_amount: commission.amount,
            commission_due_date: commission.due_date,
            payment_status: PaymentStatus::Pending,
        };
        let row = self.store.insert(Table::Placements, new.to_record()).await?;
        let placement = from_record(&row);
        tracing::info!(
            "Placement {} recorded for candidate {} (commission {} due {})",
            placement.id,
            candidate.id,
            commission.amount,
            commission.due_date
        );
        self.session.write().await.placements.insert(0, placement.clone());

        let patch = CandidatePatch::status(CandidateStatus::Placed);
        match self
            .store
            .update(Table::Candidates, &candidate.id, patch.to_record())
            .await
        {
            Ok(_) => {
                let mut session = self.session.write().await;
                let updated = match session.candidate_mut(&candidate.id) {
                    Some(current) => {
                        patch.apply(current);
                        current.clone()
                    }
                    None => {
                        let mut updated = candidate;
                        patch.apply(&mut updated);
                        updated
                    }
                };
                Ok(RecordPlacementOutcome {
                    placement,
                    candidate: Some(updated),
                    warning: None,
                })
            }
            Err(e) => {
                tracing::error!(
                    "Placement {} saved but candidate {} could not be marked PLACED: {}",
                    placement.id,
                    candidate.id,
                    e
                );
                Ok(RecordPlacementOutcome {
                    placement,
                    candidate: Some(candidate),
                    warning: Some(format!(
                        "Placement recorded, but the candidate status could not be updated: {}",
                        e
                    )),
                })
            }
        }
    }

    /// PENDING (or overdue) to PAID. Already paid placements are returned as they are.
    pub async fn mark_paid(&self, id: &str) -> Result<Placement> {
        let current = self
            .session
            .read()
            .await
            .placements
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Placement {} not found", id)))?;
        if current.payment_status == PaymentStatus::Paid {
            return Ok(current);
        }

        self.store
            .update(Table::Placements, id, payment_status_patch(PaymentStatus::Paid))
            .await?;

        let mut session = self.session.write().await;
        let placement = match session.placement_mut(id) {
            Some(p) => {
                p.payment_status = PaymentStatus::Paid;
                p.clone()
            }
            None => Placement {
                payment_status: PaymentStatus::Paid,
                ..current
            },
        };
        tracing::info!("Commission for placement {} marked as paid", id);
        Ok(placement)
    }
}
