use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::candidate::Candidate;
use crate::models::placement::{PaymentStatus, Placement};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordPlacementPayload {
    #[validate(length(min = 1, message = "Select a candidate"))]
    pub candidate_id: String,
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "Job role is required"))]
    pub job_role: String,
    #[validate(custom(function = "validate_positive_salary"))]
    pub salary: Decimal,
    pub joining_date: NaiveDate,
}

fn validate_positive_salary(salary: &Decimal) -> Result<(), ValidationError> {
    if *salary <= Decimal::ZERO {
        let mut err = ValidationError::new("positive_salary");
        err.message = Some("Salary must be greater than zero".into());
        return Err(err);
    }
    Ok(())
}

/// A placement as shown to the user, with the payment status as of today.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementResponse {
    #[serde(flatten)]
    pub placement: Placement,
    pub candidate_name: String,
    pub effective_payment_status: PaymentStatus,
}

impl PlacementResponse {
    pub fn new(placement: Placement, candidate_name: &str, today: NaiveDate) -> Self {
        let effective_payment_status = placement.effective_payment_status(today);
        Self {
            placement,
            candidate_name: candidate_name.to_string(),
            effective_payment_status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementListResponse {
    pub items: Vec<PlacementResponse>,
    pub total: usize,
}

/// Outcome of recording a placement. `warning` is set when the placement was
/// stored but the candidate could not be marked as placed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPlacementOutcome {
    pub placement: Placement,
    pub candidate: Option<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(salary: serde_json::Value) -> RecordPlacementPayload {
        serde_json::from_value(json!({
            "candidateId": "c1",
            "companyName": "Acme",
            "jobRole": "Driver",
            "salary": salary,
            "joiningDate": "2024-03-01"
        }))
        .unwrap()
    }

    #[test]
    fn salary_must_be_positive() {
        assert!(payload(json!(0)).validate().is_err());
        assert!(payload(json!("-10.5")).validate().is_err());
        assert!(payload(json!(25000)).validate().is_ok());
    }
}
