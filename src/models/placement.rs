use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Overdue,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Overdue => "OVERDUE",
            PaymentStatus::Paid => "PAID",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(PaymentStatus::Pending),
            "OVERDUE" => Some(PaymentStatus::Overdue),
            "PAID" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub id: String,
    pub candidate_id: String,
    pub company_name: String,
    pub job_role: String,
    pub salary: Decimal,
    pub joining_date: Option<NaiveDate>,
    /// Fixed at creation from the commission percent in force at the time.
    pub commission_amount: Decimal,
    pub commission_due_date: Option<NaiveDate>,
    pub payment_status: PaymentStatus,
}

impl Placement {
    /// OVERDUE is never stored by this system; it is a pending commission past its due date.
    pub fn effective_payment_status(&self, today: NaiveDate) -> PaymentStatus {
        match (self.payment_status, self.commission_due_date) {
            (PaymentStatus::Pending, Some(due)) if due < today => PaymentStatus::Overdue,
            (status, _) => status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(status: PaymentStatus, due: Option<NaiveDate>) -> Placement {
        Placement {
            id: "p1".into(),
            candidate_id: "c1".into(),
            company_name: "Acme".into(),
            job_role: "Clerk".into(),
            salary: Decimal::new(20000, 0),
            joining_date: None,
            commission_amount: Decimal::new(2000, 0),
            commission_due_date: due,
            payment_status: status,
        }
    }

    #[test]
    fn pending_past_due_reads_as_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let due = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(
            placement(PaymentStatus::Pending, due).effective_payment_status(today),
            PaymentStatus::Overdue
        );
        assert_eq!(
            placement(PaymentStatus::Paid, due).effective_payment_status(today),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn pending_on_due_date_is_not_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(
            placement(PaymentStatus::Pending, Some(today)).effective_payment_status(today),
            PaymentStatus::Pending
        );
        assert_eq!(
            placement(PaymentStatus::Pending, None).effective_payment_status(today),
            PaymentStatus::Pending
        );
    }
}
