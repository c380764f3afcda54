//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y su estado de flota.
//! Mapea exactamente a la tabla `vehicles`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "vehicle_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    Available,
    Reserved,
    Rented,
    Maintenance,
    OutOfService,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "AVAILABLE",
            VehicleStatus::Reserved => "RESERVED",
            VehicleStatus::Rented => "RENTED",
            VehicleStatus::Maintenance => "MAINTENANCE",
            VehicleStatus::OutOfService => "OUT_OF_SERVICE",
        }
    }

    /// Estados ligados a un alquiler; sólo las transiciones de alquiler los escriben
    pub fn is_rental_linked(&self) -> bool {
        matches!(self, VehicleStatus::Reserved | VehicleStatus::Rented)
    }

    /// Estados fijados manualmente por el equipo de flota
    pub fn is_fleet_hold(&self) -> bool {
        matches!(self, VehicleStatus::Maintenance | VehicleStatus::OutOfService)
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub license_plate: String,
    pub vin: Option<String>,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub category: String,
    pub fuel_type: String,
    pub transmission: Option<String>,
    pub seats: Option<i32>,
    pub mileage: i32,
    pub daily_rate: Decimal,
    pub status: VehicleStatus,
    pub home_location_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
