//! Modelo de MaintenanceRecord
//!
//! Historial de intervenciones sobre un vehículo (revisión, neumáticos, ITV...).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub kind: String,
    pub description: String,
    pub performed_on: NaiveDate,
    pub mileage: Option<i32>,
    pub cost: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}
