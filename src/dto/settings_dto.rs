use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::settings::AppSettings;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsPayload {
    #[validate(length(min = 1, message = "Agency name is required"))]
    pub agency_name: String,
    #[serde(default)]
    pub logo_url: String,
    #[validate(custom(function = "validate_percent"))]
    pub commission_percent: Decimal,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact: String,
}

fn validate_percent(percent: &Decimal) -> Result<(), ValidationError> {
    if *percent < Decimal::ZERO || *percent > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("percent_range");
        err.message = Some("Commission percent must be between 0 and 100".into());
        return Err(err);
    }
    Ok(())
}

impl From<UpdateSettingsPayload> for AppSettings {
    fn from(p: UpdateSettingsPayload) -> Self {
        Self {
            agency_name: p.agency_name,
            logo_url: p.logo_url,
            commission_percent: p.commission_percent,
            address: p.address,
            contact: p.contact,
        }
    }
}
