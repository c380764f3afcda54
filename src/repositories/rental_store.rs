//! Contrato de persistencia de alquileres
//!
//! Cada operación de escritura es atómica: comprobación de disponibilidad,
//! validación de la transición y escritura del alquiler y del vehículo
//! ocurren bajo el mismo bloqueo del vehículo.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    models::{
        rental::{Rental, RentalInterval, RentalOptionLine, RentalStatus},
        vehicle::VehicleStatus,
    },
    services::{pricing::QuoteInputs, rental_lifecycle::ScheduleChangeKind},
    utils::errors::AppResult,
};

/// Alquiler listo para insertarse en estado RESERVED
#[derive(Debug, Clone)]
pub struct RentalDraft {
    pub reference: String,
    pub vehicle_id: Uuid,
    pub customer_id: Uuid,
    pub pickup_location_id: Uuid,
    pub return_location_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub options: Vec<RentalOptionLine>,
    pub created_by: Uuid,
}

/// Nuevas fechas, sedes y opciones de un alquiler existente
#[derive(Debug, Clone)]
pub struct ScheduleChange {
    pub kind: ScheduleChangeKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub pickup_location_id: Uuid,
    pub return_location_id: Uuid,
    pub notes: Option<String>,
    pub total_amount: Decimal,
    pub options: Vec<RentalOptionLine>,
}

/// Filtros para el listado de alquileres
#[derive(Debug, Clone, Default)]
pub struct RentalFilters {
    pub status: Option<RentalStatus>,
    pub vehicle_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    /// Alquileres que siguen en curso en o después de esta fecha
    pub from: Option<NaiveDate>,
    /// Alquileres que empiezan en o antes de esta fecha
    pub to: Option<NaiveDate>,
    pub limit: i64,
    pub offset: i64,
}

impl RentalFilters {
    pub fn matches(&self, rental: &Rental) -> bool {
        self.status.map_or(true, |s| rental.status == s)
            && self.vehicle_id.map_or(true, |id| rental.vehicle_id == id)
            && self.customer_id.map_or(true, |id| rental.customer_id == id)
            && self.from.map_or(true, |from| rental.end_date >= from)
            && self.to.map_or(true, |to| rental.start_date <= to)
    }
}

#[async_trait]
pub trait RentalStore: Send + Sync {
    async fn find_rental(&self, id: Uuid) -> AppResult<Option<Rental>>;

    async fn list_rentals(&self, filters: &RentalFilters) -> AppResult<Vec<Rental>>;

    /// Intervalos no terminales del vehículo
    async fn holding_intervals(&self, vehicle_id: Uuid) -> AppResult<Vec<RentalInterval>>;

    async fn vehicle_status(&self, vehicle_id: Uuid) -> AppResult<Option<VehicleStatus>>;

    /// Tarifa del vehículo, recargo de la sede de recogida y catálogo de opciones pedidas
    async fn quote_inputs(
        &self,
        vehicle_id: Uuid,
        pickup_location_id: Uuid,
        option_ids: &[Uuid],
    ) -> AppResult<QuoteInputs>;

    /// Inserta el alquiler en RESERVED si el vehículo está libre en esas fechas
    async fn book(&self, draft: RentalDraft) -> AppResult<Rental>;

    /// Modifica fechas/sedes/opciones, re-comprobando disponibilidad sin contar el propio alquiler
    async fn reschedule(&self, id: Uuid, change: ScheduleChange) -> AppResult<Rental>;

    /// Cambia el estado y aplica el efecto sobre el vehículo
    async fn transition(&self, id: Uuid, target: RentalStatus) -> AppResult<Rental>;

    /// Borra un alquiler terminado o cancelado
    async fn delete_rental(&self, id: Uuid) -> AppResult<()>;
}

/// Estados de los demás alquileres que retienen el vehículo
pub fn other_holds(intervals: &[RentalInterval], rental_id: Uuid) -> Vec<RentalStatus> {
    intervals
        .iter()
        .filter(|i| i.rental_id != rental_id && i.status.holds_vehicle())
        .map(|i| i.status)
        .collect()
}
