use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{validate_amount, validate_non_negative, validate_not_empty};

// Request para registrar una intervención
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMaintenanceRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_not_empty")]
    pub kind: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    pub performed_on: NaiveDate,
    #[validate(custom = "validate_non_negative")]
    pub mileage: Option<i32>,
    #[validate(custom = "validate_amount")]
    pub cost: Option<Decimal>,
}
