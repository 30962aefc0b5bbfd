use chrono::{DateTime, Days, NaiveDate, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn add_calendar_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp and keeps the date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc).date_naive()))
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            // PostgREST can return timestamps without the `T` separator.
            DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z")
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_timestamp_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15"), Some(expected));
        assert_eq!(parse_date("2024-01-15T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_date("2024-01-15 08:00:00+00"), Some(expected));
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn adds_calendar_days_across_month_end() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(add_calendar_days(start, 30), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn parses_postgrest_timestamps() {
        assert!(parse_timestamp("2024-05-01T10:00:00+00:00").is_some());
        assert!(parse_timestamp("2024-05-01 10:00:00.123+00").is_some());
    }
}
