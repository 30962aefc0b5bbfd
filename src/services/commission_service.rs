use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::utils::time::add_calendar_days;

/// Calendar days between joining and the commission falling due.
pub const COMMISSION_DUE_DAYS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

/// `amount = salary * percent / 100`, due 30 calendar days after joining.
/// Callers reject non-positive salaries before getting here.
pub fn derive_commission(salary: Decimal, commission_percent: Decimal, joining_date: NaiveDate) -> Commission {
    Commission {
        amount: salary * commission_percent / Decimal::ONE_HUNDRED,
        due_date: add_calendar_days(joining_date, COMMISSION_DUE_DAYS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn amount_is_exact_percentage_of_salary() {
        let cases = [
            ("25000", "10", "2500"),
            ("18500.50", "12.5", "2312.5625"),
            ("1", "0", "0"),
            ("99999.99", "100", "99999.99"),
            ("333.33", "33.33", "111.098889"),
        ];
        for (salary, percent, expected) in cases {
            let c = derive_commission(
                Decimal::from_str(salary).unwrap(),
                Decimal::from_str(percent).unwrap(),
                date(2024, 1, 1),
            );
            assert_eq!(c.amount, Decimal::from_str(expected).unwrap(), "{} @ {}%", salary, percent);
        }
    }

    #[test]
    fn due_date_is_thirty_calendar_days_later() {
        let p = Decimal::from(10);
        let s = Decimal::from(1000);
        assert_eq!(derive_commission(s, p, date(2024, 1, 15)).due_date, date(2024, 2, 14));
        assert_eq!(derive_commission(s, p, date(2024, 2, 1)).due_date, date(2024, 3, 2));
        assert_eq!(derive_commission(s, p, date(2023, 12, 20)).due_date, date(2024, 1, 19));
    }
}
