use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_AGENCY_NAME: &str = "Career Job Solution";
pub const DEFAULT_LOGO_URL: &str = "https://cdn-icons-png.flaticon.com/512/3135/3135768.png";
pub const DEFAULT_ADDRESS: &str = "Pokhara, Nepal";
pub const DEFAULT_CONTACT: &str = "+977 9800000000";
pub const DEFAULT_COMMISSION_PERCENT: i64 = 10;

/// Agency-wide configuration. Exactly one row exists in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub agency_name: String,
    pub logo_url: String,
    pub commission_percent: Decimal,
    pub address: String,
    pub contact: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            agency_name: DEFAULT_AGENCY_NAME.to_string(),
            logo_url: DEFAULT_LOGO_URL.to_string(),
            commission_percent: Decimal::from(DEFAULT_COMMISSION_PERCENT),
            address: DEFAULT_ADDRESS.to_string(),
            contact: DEFAULT_CONTACT.to_string(),
        }
    }
}
