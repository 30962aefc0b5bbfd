use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use super::{decimal, decimal_to_json, text, RecordBuilder};
use crate::models::placement::{PaymentStatus, Placement};
use crate::utils::time::parse_date;

pub fn from_record(record: &JsonValue) -> Placement {
    let date = |key: &str| {
        record
            .get(key)
            .and_then(|v| v.as_str())
            .and_then(parse_date)
    };
    Placement {
        id: text(record, &["id"]),
        candidate_id: text(record, &["candidate_id"]),
        company_name: text(record, &["company_name"]),
        job_role: text(record, &["job_role"]),
        salary: decimal(record.get("salary")).unwrap_or(Decimal::ZERO),
        joining_date: date("joining_date"),
        commission_amount: decimal(record.get("commission_amount")).unwrap_or(Decimal::ZERO),
        commission_due_date: date("commission_due_date"),
        payment_status: record
            .get("payment_status")
            .and_then(|v| v.as_str())
            .and_then(PaymentStatus::parse)
            .unwrap_or_default(),
    }
}

/// A placement about to be inserted, commission already derived.
#[derive(Debug, Clone)]
pub struct NewPlacement {
    pub candidate_id: String,
    pub company_name: String,
    pub job_role: String,
    pub salary: Decimal,
    pub joining_date: NaiveDate,
    pub commission_amount: Decimal,
    pub commission_due_date: NaiveDate,
    pub payment_status: PaymentStatus,
}

impl NewPlacement {
    pub fn to_record(&self) -> JsonValue {
        RecordBuilder::default()
            .set("candidate_id", self.candidate_id.clone())
            .set("company_name", self.company_name.clone())
            .set("job_role", self.job_role.clone())
            .set("salary", decimal_to_json(self.salary))
            .set("joining_date", self.joining_date.format("%Y-%m-%d").to_string())
            .set("commission_amount", decimal_to_json(self.commission_amount))
            .set(
                "commission_due_date",
                self.commission_due_date.format("%Y-%m-%d").to_string(),
            )
            .set("payment_status", self.payment_status.as_str())
            .build()
    }
}

pub fn payment_status_patch(status: PaymentStatus) -> JsonValue {
    RecordBuilder::default()
        .set("payment_status", status.as_str())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_commission_columns() {
        let p = from_record(&json!({
            "id": "p1",
            "candidate_id": "c1",
            "company_name": "Himalayan Bank",
            "job_role": "Teller",
            "salary": 30000,
            "joining_date": "2024-04-01T00:00:00.000Z",
            "commission_amount": "3000.00",
            "commission_due_date": "2024-05-01",
            "payment_status": "PAID"
        }));
        assert_eq!(p.salary, Decimal::new(30000, 0));
        assert_eq!(p.commission_amount, Decimal::new(300000, 2));
        assert_eq!(p.joining_date, NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(p.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn rows_without_commission_tracking_default_to_pending_zero() {
        let p = from_record(&json!({"id": "p2", "salary": 15000, "joining_date": "2024-04-01"}));
        assert_eq!(p.commission_amount, Decimal::ZERO);
        assert_eq!(p.commission_due_date, None);
        assert_eq!(p.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn new_placement_record_shape() {
        let new = NewPlacement {
            candidate_id: "c1".into(),
            company_name: "Acme".into(),
            job_role: "Driver".into(),
            salary: Decimal::new(25000, 0),
            joining_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            commission_amount: Decimal::new(2500, 0),
            commission_due_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            payment_status: PaymentStatus::Pending,
        };
        let record = new.to_record();
        assert_eq!(record["salary"], json!("25000"));
        assert_eq!(record["commission_due_date"], "2024-01-31");
        assert_eq!(record["payment_status"], "PENDING");
    }
}
