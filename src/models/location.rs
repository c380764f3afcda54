//! Modelos de Location y RateZone
//!
//! Las sedes de recogida/devolución pertenecen opcionalmente a una zona
//! tarifaria, que añade un recargo diario al precio del vehículo.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Zona tarifaria - mapea a la tabla rate_zones
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RateZone {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub daily_surcharge: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sede - mapea a la tabla locations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: Option<String>,
    pub rate_zone_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
