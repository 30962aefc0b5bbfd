use serde_json::Value as JsonValue;

use super::{decimal, decimal_to_json, text, RecordBuilder};
use crate::models::settings::{
    AppSettings, DEFAULT_ADDRESS, DEFAULT_AGENCY_NAME, DEFAULT_COMMISSION_PERCENT, DEFAULT_LOGO_URL,
};
use rust_decimal::Decimal;

pub fn from_record(record: &JsonValue) -> AppSettings {
    let or_default = |value: String, default: &str| {
        if value.is_empty() {
            default.to_string()
        } else {
            value
        }
    };
    AppSettings {
        agency_name: or_default(text(record, &["agency_name"]), DEFAULT_AGENCY_NAME),
        logo_url: or_default(text(record, &["logo_url"]), DEFAULT_LOGO_URL),
        commission_percent: decimal(record.get("commission_percent"))
            .filter(|p| *p >= Decimal::ZERO && *p <= Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::from(DEFAULT_COMMISSION_PERCENT)),
        address: or_default(text(record, &["address"]), DEFAULT_ADDRESS),
        contact: text(record, &["contact"]),
    }
}

pub fn to_record(settings: &AppSettings) -> JsonValue {
    RecordBuilder::default()
        .set("agency_name", settings.agency_name.clone())
        .set("logo_url", settings.logo_url.clone())
        .set("commission_percent", decimal_to_json(settings.commission_percent))
        .set("address", settings.address.clone())
        .set("contact", settings.contact.clone())
        .build()
}
