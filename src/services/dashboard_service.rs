use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::candidate::CandidateStatus;
use crate::models::placement::{PaymentStatus, Placement};
use crate::session::Session;

const UPCOMING_DAYS: i64 = 7;
const RECENT_PER_KIND: usize = 3;
const RECENT_TOTAL: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsWindow {
    Today,
    Week,
    #[default]
    Month,
}

impl StatsWindow {
    /// First day counted in the window.
    pub fn start(&self, today: NaiveDate) -> NaiveDate {
        match self {
            StatsWindow::Today => today,
            StatsWindow::Week => today - Duration::days(7),
            StatsWindow::Month => today - Duration::days(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Candidate,
    Vacancy,
    Placement,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub kind: ActivityKind,
    pub title: String,
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingCommission {
    pub placement_id: String,
    pub candidate_name: String,
    pub company_name: String,
    pub commission_amount: Decimal,
    pub commission_due_date: Option<NaiveDate>,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub window: StatsWindow,
    pub total_candidates: usize,
    pub open_vacancies: usize,
    pub new_candidates: usize,
    pub new_vacancies: usize,
    pub placements_count: usize,
    pub revenue: Decimal,
    pub collected_revenue: Decimal,
    pub pending_revenue: Decimal,
    /// Share of candidates already placed, as a whole percent.
    pub placement_success_rate: u32,
    pub upcoming_commissions: Vec<UpcomingCommission>,
    pub recent_activity: Vec<Activity>,
}

pub fn dashboard_stats(session: &Session, window: StatsWindow, today: NaiveDate) -> DashboardStats {
    let start = window.start(today);
    let created_in_window = |at: &Option<DateTime<Utc>>| at.map_or(false, |at| at.date_naive() >= start);
    let joined_in_window = |p: &&Placement| p.joining_date.map_or(false, |d| d >= start);

    let windowed: Vec<&Placement> = session.placements.iter().filter(joined_in_window).collect();
    let sum = |paid: bool| -> Decimal {
        session
            .placements
            .iter()
            .filter(|p| (p.payment_status == PaymentStatus::Paid) == paid)
            .map(|p| p.commission_amount)
            .sum()
    };

    let placed = session
        .candidates
        .iter()
        .filter(|c| c.status == CandidateStatus::Placed)
        .count();
    let placement_success_rate = if session.candidates.is_empty() {
        0
    } else {
        ((placed as f64 / session.candidates.len() as f64) * 100.0).round() as u32
    };

    DashboardStats {
        window,
        total_candidates: session.candidates.len(),
        open_vacancies: session.vacancies.iter().filter(|v| v.is_open()).count(),
        new_candidates: session.candidates.iter().filter(|c| created_in_window(&c.created_at)).count(),
        new_vacancies: session.vacancies.iter().filter(|v| created_in_window(&v.created_at)).count(),
        placements_count: windowed.len(),
        revenue: windowed.iter().map(|p| p.commission_amount).sum(),
        collected_revenue: sum(true),
        pending_revenue: sum(false),
        placement_success_rate,
        upcoming_commissions: upcoming_commissions(session, today),
        recent_activity: recent_activity(session),
    }
}

/// Unpaid commissions due within the next week, overdue ones included, earliest first.
pub fn upcoming_commissions(session: &Session, today: NaiveDate) -> Vec<UpcomingCommission> {
    let horizon = today + Duration::days(UPCOMING_DAYS);
    let mut due: Vec<&Placement> = session
        .placements
        .iter()
        .filter(|p| p.payment_status != PaymentStatus::Paid)
        .filter(|p| p.commission_due_date.map_or(false, |d| d <= horizon))
        .collect();
    due.sort_by_key(|p| p.commission_due_date);
    due.into_iter()
        .map(|p| UpcomingCommission {
            placement_id: p.id.clone(),
            candidate_name: session.candidate_name(&p.candidate_id).to_string(),
            company_name: p.company_name.clone(),
            commission_amount: p.commission_amount,
            commission_due_date: p.commission_due_date,
            payment_status: p.effective_payment_status(today),
        })
        .collect()
}

fn recent_activity(session: &Session) -> Vec<Activity> {
    let midnight = |d: NaiveDate| d.and_time(NaiveTime::MIN).and_utc();
    let mut activity: Vec<Activity> = session
        .candidates
        .iter()
        .take(RECENT_PER_KIND)
        .map(|c| Activity {
            kind: ActivityKind::Candidate,
            title: format!("New Candidate: {}", c.full_name),
            at: c.created_at,
        })
        .chain(session.placements.iter().take(RECENT_PER_KIND).map(|p| Activity {
            kind: ActivityKind::Placement,
            title: format!(
                "Placement: {} at {}",
                session.candidate_name(&p.candidate_id),
                p.company_name
            ),
            at: p.joining_date.map(midnight),
        }))
        .chain(session.vacancies.iter().take(RECENT_PER_KIND).map(|v| Activity {
            kind: ActivityKind::Vacancy,
            title: format!("New Vacancy: {} at {}", v.role, v.company_name),
            at: v.created_at,
        }))
        .collect();
    // Undated entries sort last.
    activity.sort_by(|a, b| b.at.cmp(&a.at));
    activity.truncate(RECENT_TOTAL);
    activity
}
