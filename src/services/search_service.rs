use serde::Serialize;

use crate::models::candidate::Candidate;
use crate::models::placement::Placement;
use crate::models::vacancy::Vacancy;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub candidates: Vec<Candidate>,
    pub vacancies: Vec<Vacancy>,
    /// Matched on company and role only; candidate names are not searched here.
    pub placements: Vec<Placement>,
}

/// Case-insensitive substring search across the three collections, keeping
/// input order. A blank query matches nothing.
pub fn search(
    query: &str,
    candidates: &[Candidate],
    vacancies: &[Vacancy],
    placements: &[Placement],
) -> SearchResults {
    let query = query.trim();
    if query.is_empty() {
        return SearchResults::default();
    }
    let needle = query.to_lowercase();
    let hit = |field: &str| field.to_lowercase().contains(&needle);

    SearchResults {
        query: query.to_string(),
        candidates: candidates
            .iter()
            .filter(|c| hit(&c.full_name) || hit(&c.skills) || hit(&c.mobile) || hit(c.status.as_str()))
            .cloned()
            .collect(),
        vacancies: vacancies
            .iter()
            .filter(|v| hit(&v.role) || hit(&v.company_name) || hit(&v.required_skills))
            .cloned()
            .collect(),
        placements: placements
            .iter()
            .filter(|p| hit(&p.company_name) || hit(&p.job_role))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::CandidateStatus;
    use crate::models::placement::PaymentStatus;
    use crate::models::vacancy::VacancyStatus;
    use rust_decimal::Decimal;

    fn candidate(id: &str, name: &str, skills: &str, status: CandidateStatus) -> Candidate {
        Candidate {
            id: id.into(),
            full_name: name.into(),
            mobile: format!("98000{}", id),
            address: String::new(),
            skills: skills.into(),
            experience: String::new(),
            education: String::new(),
            status,
            created_at: None,
            is_ai_enhanced: false,
            cv_data: None,
        }
    }

    fn vacancy(id: &str, company: &str, role: &str) -> Vacancy {
        Vacancy {
            id: id.into(),
            company_name: company.into(),
            contact_person: String::new(),
            phone: String::new(),
            address: String::new(),
            role: role.into(),
            count: 1,
            timing: String::new(),
            required_skills: "Accounting".into(),
            salary: String::new(),
            remarks: String::new(),
            status: VacancyStatus::Open,
            created_at: None,
        }
    }

    fn placement(id: &str, company: &str, role: &str) -> Placement {
        Placement {
            id: id.into(),
            candidate_id: "1".into(),
            company_name: company.into(),
            job_role: role.into(),
            salary: Decimal::from(20000),
            joining_date: None,
            commission_amount: Decimal::from(2000),
            commission_due_date: None,
            payment_status: PaymentStatus::Pending,
        }
    }

    fn fixtures() -> (Vec<Candidate>, Vec<Vacancy>, Vec<Placement>) {
        (
            vec![
                candidate("1", "Anil Rai", "Accounting, Tally", CandidateStatus::Active),
                candidate("2", "Binita KC", "Nursing", CandidateStatus::Placed),
                candidate("3", "Chandra Rai", "Driving", CandidateStatus::Active),
            ],
            vec![
                vacancy("v1", "Nabil Bank", "Accountant"),
                vacancy("v2", "Grande Hospital", "Nurse"),
            ],
            vec![placement("p1", "Grande Hospital", "Staff Nurse")],
        )
    }

    #[test]
    fn empty_query_returns_nothing() {
        let (c, v, p) = fixtures();
        for q in ["", "   "] {
            let results = search(q, &c, &v, &p);
            assert!(results.candidates.is_empty());
            assert!(results.vacancies.is_empty());
            assert!(results.placements.is_empty());
        }
    }

    #[test]
    fn matches_are_case_insensitive_and_ordered() {
        let (c, v, p) = fixtures();
        let results = search("RAI", &c, &v, &p);
        let ids: Vec<_> = results.candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(results.vacancies.is_empty());
    }

    #[test]
    fn candidate_status_and_vacancy_skills_are_searched() {
        let (c, v, p) = fixtures();
        let results = search("placed", &c, &v, &p);
        assert_eq!(results.candidates.len(), 1);
        assert_eq!(results.candidates[0].id, "2");

        let results = search("accounting", &c, &v, &p);
        assert_eq!(results.candidates.len(), 1);
        assert_eq!(results.vacancies.len(), 2);
    }

    #[test]
    fn placements_match_company_and_role_only() {
        let (c, v, p) = fixtures();
        assert_eq!(search("nurse", &c, &v, &p).placements.len(), 1);
        assert!(search("Anil", &c, &v, &p).placements.is_empty());
    }
}
