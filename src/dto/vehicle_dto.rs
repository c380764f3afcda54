use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::api_response::Pagination,
    models::vehicle::VehicleStatus,
    utils::validation::{
        validate_license_plate, validate_non_negative, validate_not_empty, validate_positive_amount,
        validate_vin,
    },
};

// Request para crear un vehículo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_license_plate")]
    pub license_plate: String,
    #[validate(custom = "validate_vin")]
    pub vin: Option<String>,
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub brand: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub model: String,
    #[validate(range(min = 1950, max = 2100))]
    pub year: Option<i32>,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(length(min = 1, max = 20))]
    pub fuel_type: String,
    #[validate(length(max = 20))]
    pub transmission: Option<String>,
    #[validate(range(min = 1, max = 60))]
    pub seats: Option<i32>,
    #[validate(custom = "validate_non_negative")]
    pub mileage: Option<i32>,
    #[validate(custom = "validate_positive_amount")]
    pub daily_rate: Decimal,
    pub home_location_id: Option<Uuid>,
}

// Request para actualizar un vehículo (el estado tiene su propio endpoint)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(custom = "validate_license_plate")]
    pub license_plate: Option<String>,
    #[validate(custom = "validate_vin")]
    pub vin: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub brand: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,
    #[validate(range(min = 1950, max = 2100))]
    pub year: Option<i32>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub fuel_type: Option<String>,
    #[validate(length(max = 20))]
    pub transmission: Option<String>,
    #[validate(range(min = 1, max = 60))]
    pub seats: Option<i32>,
    #[validate(custom = "validate_non_negative")]
    pub mileage: Option<i32>,
    #[validate(custom = "validate_positive_amount")]
    pub daily_rate: Option<Decimal>,
    pub home_location_id: Option<Uuid>,
}

// Request de cambio manual de estado de flota
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleStatusRequest {
    pub status: VehicleStatus,
}

// Query del listado de vehículos
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleListQuery {
    pub status: Option<VehicleStatus>,
    pub category: Option<String>,
    pub home_location_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl VehicleListQuery {
    pub fn page(&self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

// Query de vehículos libres en un intervalo
#[derive(Debug, Clone, Deserialize)]
pub struct AvailableVehiclesQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateVehicleRequest {
        CreateVehicleRequest {
            license_plate: "AB-123-CD".to_string(),
            vin: Some("WVWZZZ1JZXW000001".to_string()),
            brand: "Peugeot".to_string(),
            model: "208".to_string(),
            year: Some(2022),
            category: "COMPACT".to_string(),
            fuel_type: "PETROL".to_string(),
            transmission: Some("MANUAL".to_string()),
            seats: Some(5),
            mileage: Some(12_000),
            daily_rate: Decimal::new(3900, 2),
            home_location_id: None,
        }
    }

    #[test]
    fn test_valid_vehicle() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_fields() {
        let mut bad = request();
        bad.daily_rate = Decimal::ZERO;
        bad.vin = Some("SHORTVIN".to_string());
        bad.mileage = Some(-5);
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("daily_rate"));
        assert!(fields.contains_key("vin"));
        assert!(fields.contains_key("mileage"));
    }
}
