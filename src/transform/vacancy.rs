use serde_json::Value as JsonValue;

use super::{text, RecordBuilder};
use crate::models::vacancy::{Vacancy, VacancyStatus};
use crate::utils::time::parse_timestamp;

pub fn from_record(record: &JsonValue) -> Vacancy {
    Vacancy {
        id: text(record, &["id"]),
        company_name: text(record, &["company_name"]),
        contact_person: text(record, &["contact_person"]),
        phone: text(record, &["phone_number", "phone"]),
        address: text(record, &["address"]),
        role: text(record, &["role"]),
        count: headcount(record),
        timing: text(record, &["timing"]),
        required_skills: text(record, &["required_skills"]),
        salary: text(record, &["salary"]),
        remarks: text(record, &["remarks"]),
        status: status(record),
        created_at: record
            .get("created_at")
            .and_then(|v| v.as_str())
            .and_then(parse_timestamp),
    }
}

fn headcount(record: &JsonValue) -> u32 {
    ["count", "candidates_needed"]
        .iter()
        .filter_map(|k| record.get(*k))
        .find_map(positive_count)
        .unwrap_or(1)
}

/// Headcount from a number or numeric text; zero and garbage count as absent.
pub fn positive_count(value: &JsonValue) -> Option<u32> {
    let n = match value {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    n.filter(|n| *n > 0).and_then(|n| u32::try_from(n).ok())
}

/// Older rows only carry an `is_open` flag.
fn status(record: &JsonValue) -> VacancyStatus {
    if let Some(status) = record
        .get("status")
        .and_then(|v| v.as_str())
        .and_then(VacancyStatus::parse)
    {
        return status;
    }
    match record.get("is_open").and_then(|v| v.as_bool()) {
        Some(true) => VacancyStatus::Open,
        _ => VacancyStatus::Filled,
    }
}

#[derive(Debug, Clone, Default)]
pub struct VacancyPatch {
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
    pub count: Option<u32>,
    pub timing: Option<String>,
    pub required_skills: Option<String>,
    pub salary: Option<String>,
    pub remarks: Option<String>,
    pub status: Option<VacancyStatus>,
}

impl VacancyPatch {
    pub fn status(status: VacancyStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn to_record(&self) -> JsonValue {
        RecordBuilder::default()
            .maybe("company_name", self.company_name.clone())
            .maybe("contact_person", self.contact_person.clone())
            .maybe("phone_number", self.phone.clone())
            .maybe("address", self.address.clone())
            .maybe("role", self.role.clone())
            .maybe("count", self.count)
            .maybe("timing", self.timing.clone())
            .maybe("required_skills", self.required_skills.clone())
            .maybe("salary", self.salary.clone())
            .maybe("remarks", self.remarks.clone())
            .maybe("status", self.status.map(|s| s.as_str()))
            .build()
    }
}
