//! The working résumé document edited in the CV Studio.
//!
//! Entries in `educations` and `experiences` carry identifiers issued by an
//! [`IdGenerator`]; an identifier never changes once issued and insertion order
//! is kept. Nothing here validates content, empty entries are legal. The only
//! checks happen at save time through [`Validate`].

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::candidate::Candidate;
use crate::utils::id::IdGenerator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryType {
    #[default]
    Fresher,
    Experienced,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum EducationLevel {
    Masters,
    Bachelors,
    #[default]
    Plus2,
    #[serde(rename = "SEE")]
    See,
    Other,
}

impl EducationLevel {
    /// Display rank, highest qualification first.
    pub fn rank(&self) -> u8 {
        match self {
            EducationLevel::Masters => 4,
            EducationLevel::Bachelors => 3,
            EducationLevel::Plus2 => 2,
            EducationLevel::See => 1,
            EducationLevel::Other => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EducationLevel::Masters => "Masters",
            EducationLevel::Bachelors => "Bachelors",
            EducationLevel::Plus2 => "Plus2",
            EducationLevel::See => "SEE",
            EducationLevel::Other => "Other",
        }
    }
}

impl From<String> for EducationLevel {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Masters" => EducationLevel::Masters,
            "Bachelors" => EducationLevel::Bachelors,
            "Plus2" => EducationLevel::Plus2,
            "SEE" => EducationLevel::See,
            _ => EducationLevel::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub id: String,
    pub level: EducationLevel,
    pub degree: String,
    pub board: String,
    pub year: String,
    pub marks: String,
    pub is_equivalent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub id: String,
    pub company: String,
    pub role: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
    pub responsibilities: String,
}

impl ExperienceEntry {
    /// The stored end date is ignored while the position is current.
    pub fn effective_end_date(&self) -> Option<&str> {
        if self.is_current {
            None
        } else {
            Some(self.end_date.as_str())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CvDocument {
    #[validate(length(min = 1, message = "Full Name and Mobile are required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "Full Name and Mobile are required"))]
    pub mobile: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    pub summary_type: SummaryType,
    pub summary: String,
    pub educations: Vec<EducationEntry>,
    pub experiences: Vec<ExperienceEntry>,
    pub skills: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certifications: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awards: Option<String>,
}

/// A single scalar profile field assignment, e.g. `{"field": "summary", "value": "..."}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ProfileUpdate {
    FullName(String),
    Mobile(String),
    Address(String),
    Email(String),
    Linkedin(String),
    Github(String),
    SummaryType(SummaryType),
    Summary(String),
    Skills(String),
    Languages(String),
    Certifications(String),
    Projects(String),
    Awards(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum EducationUpdate {
    Level(EducationLevel),
    Degree(String),
    Board(String),
    Year(String),
    Marks(String),
    IsEquivalent(bool),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ExperienceUpdate {
    Company(String),
    Role(String),
    Location(String),
    StartDate(String),
    EndDate(String),
    IsCurrent(bool),
    Responsibilities(String),
}

impl CvDocument {
    /// Builds the studio document for a candidate: the embedded document when
    /// there is one, otherwise a draft seeded from the flat profile text.
    /// Identity fields always come from the candidate record.
    pub fn for_candidate(candidate: &Candidate) -> Self {
        let mut doc = match &candidate.cv_data {
            Some(cv) => cv.clone(),
            None => CvDocument {
                email: Some(String::new()),
                summary_type: if candidate.experience.to_lowercase().contains("fresher") {
                    SummaryType::Fresher
                } else {
                    SummaryType::Experienced
                },
                skills: candidate.skills.clone(),
                ..Default::default()
            },
        };
        doc.full_name = candidate.full_name.clone();
        doc.mobile = candidate.mobile.clone();
        doc.address = candidate.address.clone();
        doc
    }

    pub fn set_field(&mut self, update: ProfileUpdate) {
        match update {
            ProfileUpdate::FullName(v) => self.full_name = v,
            ProfileUpdate::Mobile(v) => self.mobile = v,
            ProfileUpdate::Address(v) => self.address = v,
            ProfileUpdate::Email(v) => self.email = Some(v),
            ProfileUpdate::Linkedin(v) => self.linkedin = Some(v),
            ProfileUpdate::Github(v) => self.github = Some(v),
            ProfileUpdate::SummaryType(v) => self.summary_type = v,
            ProfileUpdate::Summary(v) => self.summary = v,
            ProfileUpdate::Skills(v) => self.skills = v,
            ProfileUpdate::Languages(v) => self.languages = Some(v),
            ProfileUpdate::Certifications(v) => self.certifications = Some(v),
            ProfileUpdate::Projects(v) => self.projects = Some(v),
            ProfileUpdate::Awards(v) => self.awards = Some(v),
        }
    }

    pub fn add_education(&mut self, ids: &dyn IdGenerator) -> String {
        let id = ids.next_id();
        self.educations.push(EducationEntry {
            id: id.clone(),
            ..Default::default()
        });
        id
    }

    /// Returns false when no entry has the identifier.
    pub fn remove_education(&mut self, id: &str) -> bool {
        let before = self.educations.len();
        self.educations.retain(|e| e.id != id);
        self.educations.len() != before
    }

    pub fn update_education(&mut self, id: &str, update: EducationUpdate) -> bool {
        let Some(entry) = self.educations.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        match update {
            EducationUpdate::Level(v) => entry.level = v,
            EducationUpdate::Degree(v) => entry.degree = v,
            EducationUpdate::Board(v) => entry.board = v,
            EducationUpdate::Year(v) => entry.year = v,
            EducationUpdate::Marks(v) => entry.marks = v,
            EducationUpdate::IsEquivalent(v) => entry.is_equivalent = v,
        }
        true
    }

    pub fn add_experience(&mut self, ids: &dyn IdGenerator) -> String {
        let id = ids.next_id();
        self.experiences.push(ExperienceEntry {
            id: id.clone(),
            ..Default::default()
        });
        id
    }

    pub fn remove_experience(&mut self, id: &str) -> bool {
        let before = self.experiences.len();
        self.experiences.retain(|e| e.id != id);
        self.experiences.len() != before
    }

    pub fn update_experience(&mut self, id: &str, update: ExperienceUpdate) -> bool {
        let Some(entry) = self.experiences.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        match update {
            ExperienceUpdate::Company(v) => entry.company = v,
            ExperienceUpdate::Role(v) => entry.role = v,
            ExperienceUpdate::Location(v) => entry.location = v,
            ExperienceUpdate::StartDate(v) => entry.start_date = v,
            ExperienceUpdate::EndDate(v) => entry.end_date = v,
            ExperienceUpdate::IsCurrent(v) => entry.is_current = v,
            ExperienceUpdate::Responsibilities(v) => entry.responsibilities = v,
        }
        true
    }

    /// Flat text written back to the candidate's `experience` column.
    pub fn experience_summary(&self) -> String {
        let joined = self
            .experiences
            .iter()
            .map(|e| format!("{} at {}", e.role, e.company))
            .collect::<Vec<_>>()
            .join(", ");
        if joined.is_empty() {
            "Fresher".to_string()
        } else {
            joined
        }
    }

    /// Flat text written back to the candidate's `education` column.
    pub fn education_summary(&self) -> String {
        let joined = self
            .educations
            .iter()
            .map(|e| e.degree.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        if joined.is_empty() {
            "Not Specified".to_string()
        } else {
            joined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::CandidateStatus;
    use crate::utils::id::SequentialIds;

    fn candidate(cv: Option<CvDocument>) -> Candidate {
        Candidate {
            id: "c1".into(),
            full_name: "Sita Sharma".into(),
            mobile: "9800000001".into(),
            address: "Pokhara".into(),
            skills: "Excel, Tally".into(),
            experience: "Fresher".into(),
            education: "BBS".into(),
            status: CandidateStatus::Active,
            created_at: None,
            is_ai_enhanced: false,
            cv_data: cv,
        }
    }

    #[test]
    fn add_update_remove_education_restores_collection() {
        let ids = SequentialIds::new("edu");
        let mut doc = CvDocument::default();
        let keep = doc.add_education(&ids);
        doc.update_education(&keep, EducationUpdate::Degree("SLC".into()));
        let before = doc.educations.clone();

        let id = doc.add_education(&ids);
        assert!(doc.update_education(&id, EducationUpdate::Degree("BSc CS".into())));
        assert_eq!(doc.educations[1].degree, "BSc CS");
        assert!(doc.remove_education(&id));

        assert_eq!(doc.educations, before);
    }

    #[test]
    fn new_education_uses_defaults() {
        let ids = SequentialIds::new("edu");
        let mut doc = CvDocument::default();
        let id = doc.add_education(&ids);
        let entry = &doc.educations[0];
        assert_eq!(entry.id, id);
        assert_eq!(entry.level, EducationLevel::Plus2);
        assert!(entry.degree.is_empty() && entry.board.is_empty());
        assert!(!entry.is_equivalent);
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let ids = SequentialIds::new("x");
        let mut doc = CvDocument::default();
        doc.add_experience(&ids);
        let before = doc.clone();

        assert!(!doc.remove_experience("missing"));
        assert!(!doc.update_experience("missing", ExperienceUpdate::Role("CEO".into())));
        assert!(!doc.update_education("missing", EducationUpdate::IsEquivalent(true)));
        assert_eq!(doc, before);
    }

    #[test]
    fn experience_updates_touch_only_the_target() {
        let ids = SequentialIds::new("exp");
        let mut doc = CvDocument::default();
        let a = doc.add_experience(&ids);
        let b = doc.add_experience(&ids);
        doc.update_experience(&b, ExperienceUpdate::IsCurrent(true));
        doc.update_experience(&b, ExperienceUpdate::EndDate("2023-01".into()));

        assert_eq!(doc.experiences[0].id, a);
        assert!(!doc.experiences[0].is_current);
        assert!(doc.experiences[1].is_current);
        assert_eq!(doc.experiences[1].effective_end_date(), None);
    }

    #[test]
    fn field_updates_parse_from_json() {
        let update: EducationUpdate =
            serde_json::from_value(serde_json::json!({"field": "level", "value": "Masters"})).unwrap();
        assert_eq!(update, EducationUpdate::Level(EducationLevel::Masters));

        let update: ProfileUpdate =
            serde_json::from_value(serde_json::json!({"field": "summaryType", "value": "Experienced"}))
                .unwrap();
        let mut doc = CvDocument::default();
        doc.set_field(update);
        assert_eq!(doc.summary_type, SummaryType::Experienced);

        let wrong_type = serde_json::from_value::<ExperienceUpdate>(
            serde_json::json!({"field": "isCurrent", "value": "yes"}),
        );
        assert!(wrong_type.is_err());
    }

    #[test]
    fn hydrates_from_flat_profile_without_cv() {
        let doc = CvDocument::for_candidate(&candidate(None));
        assert_eq!(doc.full_name, "Sita Sharma");
        assert_eq!(doc.summary_type, SummaryType::Fresher);
        assert_eq!(doc.skills, "Excel, Tally");
        assert!(doc.educations.is_empty() && doc.experiences.is_empty());
    }

    #[test]
    fn hydrates_embedded_cv_with_candidate_identity() {
        let embedded = CvDocument {
            full_name: "Old Name".into(),
            summary: "Detail oriented".into(),
            ..Default::default()
        };
        let doc = CvDocument::for_candidate(&candidate(Some(embedded)));
        assert_eq!(doc.full_name, "Sita Sharma");
        assert_eq!(doc.mobile, "9800000001");
        assert_eq!(doc.summary, "Detail oriented");
    }

    #[test]
    fn unknown_education_level_reads_as_other() {
        let entry: EducationEntry =
            serde_json::from_value(serde_json::json!({"id": "e1", "level": "PhD"})).unwrap();
        assert_eq!(entry.level, EducationLevel::Other);
        assert_eq!(serde_json::to_value(EducationLevel::See).unwrap(), "SEE");
    }

    #[test]
    fn save_requires_name_and_mobile() {
        let mut doc = CvDocument::default();
        assert!(doc.validate().is_err());
        doc.full_name = "Ram".into();
        doc.mobile = "98".into();
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn flat_summaries_fall_back_when_empty() {
        let ids = SequentialIds::new("s");
        let mut doc = CvDocument::default();
        assert_eq!(doc.experience_summary(), "Fresher");
        assert_eq!(doc.education_summary(), "Not Specified");

        let id = doc.add_experience(&ids);
        doc.update_experience(&id, ExperienceUpdate::Role("Cashier".into()));
        doc.update_experience(&id, ExperienceUpdate::Company("Bhatbhateni".into()));
        assert_eq!(doc.experience_summary(), "Cashier at Bhatbhateni");
    }
}
