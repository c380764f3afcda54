//! Modelo de Rental
//!
//! Alquileres, su estado de ciclo de vida y el snapshot de opciones
//! contratadas. Mapea a las tablas `rentals` y `rental_options`.

use chrono::{DateTime, NaiveDate, Utc};
use rand::{distributions::Alphanumeric, Rng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

/// Estado del alquiler - mapea al ENUM rental_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "rental_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    Reserved,
    Active,
    Extended,
    Completed,
    Cancelled,
}

impl RentalStatus {
    /// Estados que retienen el vehículo
    pub const HOLDING: [RentalStatus; 3] = [
        RentalStatus::Reserved,
        RentalStatus::Active,
        RentalStatus::Extended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Reserved => "RESERVED",
            RentalStatus::Active => "ACTIVE",
            RentalStatus::Extended => "EXTENDED",
            RentalStatus::Completed => "COMPLETED",
            RentalStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RentalStatus::Completed | RentalStatus::Cancelled)
    }

    pub fn holds_vehicle(&self) -> bool {
        !self.is_terminal()
    }

    /// El vehículo está físicamente en manos del cliente
    pub fn is_on_road(&self) -> bool {
        matches!(self, RentalStatus::Active | RentalStatus::Extended)
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rental principal - mapea exactamente a la tabla rentals
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rental {
    pub id: Uuid,
    pub reference: String,
    pub vehicle_id: Uuid,
    pub customer_id: Uuid,
    pub pickup_location_id: Uuid,
    pub return_location_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: RentalStatus,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub options: Vec<RentalOptionLine>,
}

impl Rental {
    pub fn interval(&self) -> RentalInterval {
        RentalInterval {
            rental_id: self.id,
            reference: self.reference.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
        }
    }

    /// Número de días facturables
    pub fn billable_days(&self) -> i64 {
        billable_days(self.start_date, self.end_date)
    }
}

/// Opción contratada con precio congelado en el momento de la reserva
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct RentalOptionLine {
    pub option_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub per_day: bool,
}

/// Intervalo reservado de un vehículo, lo mínimo para detectar solapes
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct RentalInterval {
    #[sqlx(rename = "id")]
    pub rental_id: Uuid,
    pub reference: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: RentalStatus,
}

/// Días facturables entre dos fechas (mínimo uno)
pub fn billable_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(1)
}

/// Generar la referencia legible de un contrato, p.ej. `RNT-202405-K3X9QF`
pub fn generate_reference(start_date: NaiveDate) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect();
    format!("RNT-{}-{}", start_date.format("%Y%m"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(RentalStatus::Completed.is_terminal());
        assert!(RentalStatus::Cancelled.is_terminal());
        for status in RentalStatus::HOLDING {
            assert!(status.holds_vehicle());
        }
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&RentalStatus::Extended).unwrap(), "\"EXTENDED\"");
        let parsed: RentalStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(parsed, RentalStatus::Cancelled);
    }

    #[test]
    fn test_billable_days() {
        assert_eq!(billable_days(date(1), date(5)), 4);
        assert_eq!(billable_days(date(5), date(6)), 1);
    }

    #[test]
    fn test_generate_reference() {
        let reference = generate_reference(date(3));
        assert!(reference.starts_with("RNT-202405-"));
        assert_eq!(reference.len(), "RNT-202405-".len() + 6);
        assert!(reference[11..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
