//! Servicio de alquileres
//!
//! Orquesta disponibilidad, precio y ciclo de vida sobre un `RentalStore`.
//! Cada operación de escritura recibe explícitamente el usuario autenticado.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::rental_dto::{
        AvailabilityRequest, AvailabilityResponse, CreateRentalRequest, ExtendRentalRequest,
        UpdateRentalRequest,
    },
    middleware::auth::AuthenticatedUser,
    models::{
        rental::{generate_reference, Rental, RentalOptionLine, RentalStatus},
        staff::Permission,
    },
    repositories::rental_store::{RentalDraft, RentalFilters, RentalStore, ScheduleChange},
    services::{
        availability::conflicts,
        pricing::{quote, snapshot_options, OptionSelection},
        rental_lifecycle::{ensure_amendable, ScheduleChangeKind},
    },
    utils::{
        errors::{bad_request_error, not_found_error, AppResult},
        validation::{ensure_date_range, merge_optional_text},
    },
};

#[derive(Clone)]
pub struct RentalService {
    store: Arc<dyn RentalStore>,
}

impl RentalService {
    pub fn new(store: Arc<dyn RentalStore>) -> Self {
        Self { store }
    }

    /// ¿Está libre el vehículo en `[start_date, end_date]`?
    pub async fn check_availability(&self, request: &AvailabilityRequest) -> AppResult<AvailabilityResponse> {
        ensure_date_range(request.start_date, request.end_date)?;
        if self.store.vehicle_status(request.vehicle_id).await?.is_none() {
            return Err(not_found_error("Vehicle", &request.vehicle_id.to_string()));
        }

        let intervals = self.store.holding_intervals(request.vehicle_id).await?;
        let blocking: Vec<_> = conflicts(
            &intervals,
            request.start_date,
            request.end_date,
            request.exclude_rental_id,
        )
        .into_iter()
        .cloned()
        .collect();

        Ok(AvailabilityResponse {
            vehicle_id: request.vehicle_id,
            start_date: request.start_date,
            end_date: request.end_date,
            available: blocking.is_empty(),
            conflicts: blocking,
        })
    }

    pub async fn create_rental(
        &self,
        actor: &AuthenticatedUser,
        request: CreateRentalRequest,
    ) -> AppResult<Rental> {
        actor.require(Permission::ManageBookings)?;
        request.validate()?;
        validate_selections(&request.options)?;
        ensure_date_range(request.start_date, request.end_date)?;

        let (options, total_amount) = self
            .price(
                request.vehicle_id,
                request.pickup_location_id,
                request.start_date,
                request.end_date,
                Pricing::Select(&request.options),
            )
            .await?;

        let draft = RentalDraft {
            reference: generate_reference(request.start_date),
            vehicle_id: request.vehicle_id,
            customer_id: request.customer_id,
            pickup_location_id: request.pickup_location_id,
            return_location_id: request.return_location_id.unwrap_or(request.pickup_location_id),
            start_date: request.start_date,
            end_date: request.end_date,
            total_amount,
            notes: request.notes,
            options,
            created_by: actor.staff_id,
        };

        let rental = self.store.book(draft).await?;
        info!("✅ {} reservó {} para el vehículo {}", actor.email, rental.reference, rental.vehicle_id);
        Ok(rental)
    }

    pub async fn get_rental(&self, id: Uuid) -> AppResult<Rental> {
        self.store
            .find_rental(id)
            .await?
            .ok_or_else(|| not_found_error("Rental", &id.to_string()))
    }

    pub async fn list_rentals(&self, filters: &RentalFilters) -> AppResult<Vec<Rental>> {
        self.store.list_rentals(filters).await
    }

    /// Modificar fechas, sedes, opciones o notas de una reserva
    pub async fn update_rental(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: UpdateRentalRequest,
    ) -> AppResult<Rental> {
        actor.require(Permission::ManageBookings)?;
        request.validate()?;
        if let Some(selections) = &request.options {
            validate_selections(selections)?;
        }

        let current = self.get_rental(id).await?;
        ensure_amendable(current.status)?;

        let start_date = request.start_date.unwrap_or(current.start_date);
        let end_date = request.end_date.unwrap_or(current.end_date);
        ensure_date_range(start_date, end_date)?;
        let pickup_location_id = request.pickup_location_id.unwrap_or(current.pickup_location_id);

        let pricing = match &request.options {
            Some(selections) => Pricing::Select(selections),
            None => Pricing::Keep(&current.options),
        };
        let (options, total_amount) = self
            .price(current.vehicle_id, pickup_location_id, start_date, end_date, pricing)
            .await?;

        let change = ScheduleChange {
            kind: ScheduleChangeKind::Amend,
            start_date,
            end_date,
            pickup_location_id,
            return_location_id: request.return_location_id.unwrap_or(current.return_location_id),
            notes: merge_optional_text(request.notes, current.notes),
            total_amount,
            options,
        };
        self.store.reschedule(id, change).await
    }

    /// Prolongar un alquiler ACTIVE/EXTENDED hasta `new_end_date`
    pub async fn extend_rental(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: ExtendRentalRequest,
    ) -> AppResult<Rental> {
        actor.require(Permission::ManageBookings)?;

        let current = self.get_rental(id).await?;
        ensure_date_range(current.start_date, request.new_end_date)?;

        let (options, total_amount) = self
            .price(
                current.vehicle_id,
                current.pickup_location_id,
                current.start_date,
                request.new_end_date,
                Pricing::Keep(&current.options),
            )
            .await?;

        let change = ScheduleChange {
            kind: ScheduleChangeKind::Extend,
            start_date: current.start_date,
            end_date: request.new_end_date,
            pickup_location_id: current.pickup_location_id,
            return_location_id: current.return_location_id,
            notes: current.notes,
            total_amount,
            options,
        };
        let rental = self.store.reschedule(id, change).await?;
        info!("📆 {} prolongado hasta {}", rental.reference, rental.end_date);
        Ok(rental)
    }

    /// Cambiar el estado de un alquiler. EXTENDED sólo se alcanza con `extend_rental`.
    pub async fn transition_rental(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        target: RentalStatus,
    ) -> AppResult<Rental> {
        actor.require(Permission::ManageBookings)?;
        if target == RentalStatus::Extended {
            return Err(bad_request_error(
                "EXTENDED requires a new end date; use the extend operation",
            ));
        }

        let rental = self.store.transition(id, target).await?;
        info!("🔄 {} movió {} a {}", actor.email, rental.reference, rental.status);
        Ok(rental)
    }

    pub async fn delete_rental(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        actor.require(Permission::DeleteRentals)?;
        self.store.delete_rental(id).await
    }

    async fn price(
        &self,
        vehicle_id: Uuid,
        pickup_location_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        pricing: Pricing<'_>,
    ) -> AppResult<(Vec<RentalOptionLine>, Decimal)> {
        let option_ids: Vec<Uuid> = match pricing {
            Pricing::Select(selections) => selections.iter().map(|s| s.option_id).collect(),
            Pricing::Keep(_) => Vec::new(),
        };
        let inputs = self
            .store
            .quote_inputs(vehicle_id, pickup_location_id, &option_ids)
            .await?;

        let lines = match pricing {
            Pricing::Select(selections) => snapshot_options(selections, &inputs.options)?,
            Pricing::Keep(lines) => lines.to_vec(),
        };
        let total = quote(start_date, end_date, inputs.daily_rate, inputs.zone_surcharge, &lines);
        Ok((lines, total))
    }
}

/// Origen de las líneas de opciones al presupuestar
#[derive(Clone, Copy)]
enum Pricing<'a> {
    /// Nueva selección: precios actuales del catálogo
    Select(&'a [OptionSelection]),
    /// Líneas ya contratadas: se respetan los precios congelados
    Keep(&'a [RentalOptionLine]),
}

fn validate_selections(selections: &[OptionSelection]) -> AppResult<()> {
    for selection in selections {
        selection.validate()?;
    }
    Ok(())
}
