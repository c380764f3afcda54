//! Modelo de AdditionalOption
//!
//! Catálogo de extras (silla infantil, GPS, conductor adicional...).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Opción adicional - mapea a la tabla additional_options
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdditionalOption {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub per_day: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
