use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VacancyStatus {
    #[default]
    Open,
    Filled,
}

impl VacancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VacancyStatus::Open => "OPEN",
            VacancyStatus::Filled => "FILLED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Some(VacancyStatus::Open),
            "FILLED" => Some(VacancyStatus::Filled),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            VacancyStatus::Open => VacancyStatus::Filled,
            VacancyStatus::Filled => VacancyStatus::Open,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vacancy {
    pub id: String,
    pub company_name: String,
    pub contact_person: String,
    pub phone: String,
    pub address: String,
    pub role: String,
    /// Headcount requested, always at least 1.
    pub count: u32,
    pub timing: String,
    pub required_skills: String,
    pub salary: String,
    pub remarks: String,
    pub status: VacancyStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl Vacancy {
    pub fn is_open(&self) -> bool {
        self.status == VacancyStatus::Open
    }
}
