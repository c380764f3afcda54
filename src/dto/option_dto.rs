use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{validate_amount, validate_not_empty};

// Request para crear una opción adicional
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOptionRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom = "validate_amount")]
    pub price: Decimal,
    #[serde(default = "default_true")]
    pub per_day: bool,
}

// Request para actualizar una opción (desactivar en lugar de borrar)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOptionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "validate_amount")]
    pub price: Option<Decimal>,
    pub per_day: Option<bool>,
    pub active: Option<bool>,
}

fn default_true() -> bool {
    true
}
