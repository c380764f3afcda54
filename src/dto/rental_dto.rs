use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::api_response::Pagination,
    models::rental::{Rental, RentalInterval, RentalOptionLine, RentalStatus},
    repositories::rental_store::RentalFilters,
    services::pricing::OptionSelection,
};

// Request para comprobar disponibilidad de un vehículo
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityRequest {
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Alquiler en edición, que no cuenta como conflicto
    pub exclude_rental_id: Option<Uuid>,
}

// Response de disponibilidad
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub available: bool,
    pub conflicts: Vec<RentalInterval>,
}

// Request para crear una reserva
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRentalRequest {
    pub vehicle_id: Uuid,
    pub customer_id: Uuid,
    pub pickup_location_id: Uuid,
    /// Por defecto la misma sede de recogida
    pub return_location_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub options: Vec<OptionSelection>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

// Request para modificar una reserva antes de la recogida
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRentalRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub pickup_location_id: Option<Uuid>,
    pub return_location_id: Option<Uuid>,
    /// Si se envía, sustituye la selección de opciones completa
    #[validate(length(max = 20))]
    pub options: Option<Vec<OptionSelection>>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

// Request para prolongar un alquiler en curso
#[derive(Debug, Clone, Deserialize)]
pub struct ExtendRentalRequest {
    pub new_end_date: NaiveDate,
}

// Request de cambio de estado
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionRequest {
    pub status: RentalStatus,
}

// Query del listado de alquileres
#[derive(Debug, Clone, Deserialize)]
pub struct RentalListQuery {
    pub status: Option<RentalStatus>,
    pub vehicle_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<RentalListQuery> for RentalFilters {
    fn from(query: RentalListQuery) -> Self {
        let page = Pagination {
            limit: query.limit,
            offset: query.offset,
        };
        Self {
            status: query.status,
            vehicle_id: query.vehicle_id,
            customer_id: query.customer_id,
            from: query.from,
            to: query.to,
            limit: page.limit(),
            offset: page.offset(),
        }
    }
}

// Response de alquiler
#[derive(Debug, Serialize)]
pub struct RentalResponse {
    pub id: Uuid,
    pub reference: String,
    pub vehicle_id: Uuid,
    pub customer_id: Uuid,
    pub pickup_location_id: Uuid,
    pub return_location_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub billable_days: i64,
    pub status: RentalStatus,
    pub total_amount: Decimal,
    pub options: Vec<RentalOptionLine>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Rental> for RentalResponse {
    fn from(rental: Rental) -> Self {
        Self {
            billable_days: rental.billable_days(),
            id: rental.id,
            reference: rental.reference,
            vehicle_id: rental.vehicle_id,
            customer_id: rental.customer_id,
            pickup_location_id: rental.pickup_location_id,
            return_location_id: rental.return_location_id,
            start_date: rental.start_date,
            end_date: rental.end_date,
            status: rental.status,
            total_amount: rental.total_amount,
            options: rental.options,
            notes: rental.notes,
            created_by: rental.created_by,
            created_at: rental.created_at,
            updated_at: rental.updated_at,
        }
    }
}
