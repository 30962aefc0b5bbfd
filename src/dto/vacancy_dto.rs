use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::models::candidate::Candidate;
use crate::models::vacancy::Vacancy;
use crate::transform::vacancy::positive_count;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddVacancyPayload {
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    /// Number or numeric text, as typed into the form.
    #[serde(default)]
    pub count: Option<JsonValue>,
    #[serde(default)]
    pub timing: String,
    #[serde(default)]
    pub required_skills: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub remarks: String,
}

impl AddVacancyPayload {
    pub fn headcount(&self) -> u32 {
        self.count.as_ref().and_then(positive_count).unwrap_or(1)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancyListResponse {
    pub items: Vec<Vacancy>,
    pub total: usize,
    pub open: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingCandidatesResponse {
    pub vacancy: Vacancy,
    pub candidates: Vec<Candidate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn headcount_defaults_to_one() {
        let payload: AddVacancyPayload = serde_json::from_value(json!({
            "companyName": "Acme", "role": "Driver", "count": "3"
        }))
        .unwrap();
        assert_eq!(payload.headcount(), 3);

        let payload: AddVacancyPayload = serde_json::from_value(json!({
            "companyName": "Acme", "role": "Driver", "count": "many"
        }))
        .unwrap();
        assert_eq!(payload.headcount(), 1);
    }
}
