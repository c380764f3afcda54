use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{validate_amount, validate_not_empty, validate_phone};

// Request para crear una zona tarifaria
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRateZoneRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom = "validate_amount")]
    pub daily_surcharge: Decimal,
}

// Request para actualizar una zona tarifaria
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRateZoneRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "validate_amount")]
    pub daily_surcharge: Option<Decimal>,
}

// Request para crear una sede
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocationRequest {
    #[validate(length(min = 1, max = 150), custom = "validate_not_empty")]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    pub rate_zone_id: Option<Uuid>,
}

// Request para actualizar una sede
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLocationRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    pub rate_zone_id: Option<Uuid>,
}
