//! Store de alquileres en memoria
//!
//! Misma semántica que `RentalRepository` sin base de datos: un único
//! `Mutex` asíncrono cubre la comprobación y la escritura de cada operación.
//! Se usa en los tests de integración y del router.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    models::{
        option::AdditionalOption,
        rental::{Rental, RentalInterval, RentalStatus},
        vehicle::VehicleStatus,
    },
    repositories::rental_store::{
        other_holds, RentalDraft, RentalFilters, RentalStore, ScheduleChange,
    },
    services::{
        availability::ensure_available,
        pricing::QuoteInputs,
        rental_lifecycle::{
            ensure_deletable, ensure_pickup_allowed, ensure_transition, plan_schedule_change,
            vehicle_effect,
        },
    },
    utils::errors::{not_found_error, AppResult},
};

#[derive(Debug, Clone)]
struct FleetEntry {
    status: VehicleStatus,
    daily_rate: Decimal,
}

#[derive(Default)]
struct MemoryState {
    vehicles: HashMap<Uuid, FleetEntry>,
    /// Recargo diario de la zona de cada sede
    locations: HashMap<Uuid, Decimal>,
    customers: HashSet<Uuid>,
    options: HashMap<Uuid, AdditionalOption>,
    rentals: HashMap<Uuid, Rental>,
}

impl MemoryState {
    fn holding(&self, vehicle_id: Uuid) -> Vec<RentalInterval> {
        let mut intervals: Vec<RentalInterval> = self
            .rentals
            .values()
            .filter(|r| r.vehicle_id == vehicle_id && r.status.holds_vehicle())
            .map(Rental::interval)
            .collect();
        intervals.sort_by_key(|i| i.start_date);
        intervals
    }

    fn vehicle_mut(&mut self, vehicle_id: Uuid) -> AppResult<&mut FleetEntry> {
        self.vehicles
            .get_mut(&vehicle_id)
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))
    }

    fn ensure_location(&self, location_id: Uuid) -> AppResult<()> {
        if self.locations.contains_key(&location_id) {
            Ok(())
        } else {
            Err(not_found_error("Location", &location_id.to_string()))
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryRentalStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRentalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_vehicle(&self, daily_rate: Decimal) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().await.vehicles.insert(
            id,
            FleetEntry {
                status: VehicleStatus::Available,
                daily_rate,
            },
        );
        id
    }

    pub async fn add_location(&self, zone_surcharge: Decimal) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().await.locations.insert(id, zone_surcharge);
        id
    }

    pub async fn add_customer(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().await.customers.insert(id);
        id
    }

    pub async fn add_option(&self, option: AdditionalOption) -> Uuid {
        let id = option.id;
        self.state.lock().await.options.insert(id, option);
        id
    }

    /// Estado manual de flota (mantenimiento, fuera de servicio)
    pub async fn set_vehicle_status(&self, vehicle_id: Uuid, status: VehicleStatus) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.vehicle_mut(vehicle_id)?.status = status;
        Ok(())
    }
}

#[async_trait]
impl RentalStore for InMemoryRentalStore {
    async fn find_rental(&self, id: Uuid) -> AppResult<Option<Rental>> {
        Ok(self.state.lock().await.rentals.get(&id).cloned())
    }

    async fn list_rentals(&self, filters: &RentalFilters) -> AppResult<Vec<Rental>> {
        let state = self.state.lock().await;
        let mut rentals: Vec<Rental> = state
            .rentals
            .values()
            .filter(|r| filters.matches(r))
            .cloned()
            .collect();
        rentals.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.created_at.cmp(&a.created_at)));

        Ok(rentals
            .into_iter()
            .skip(filters.offset.max(0) as usize)
            .take(filters.limit.max(0) as usize)
            .collect())
    }

    async fn holding_intervals(&self, vehicle_id: Uuid) -> AppResult<Vec<RentalInterval>> {
        Ok(self.state.lock().await.holding(vehicle_id))
    }

    async fn vehicle_status(&self, vehicle_id: Uuid) -> AppResult<Option<VehicleStatus>> {
        Ok(self.state.lock().await.vehicles.get(&vehicle_id).map(|v| v.status))
    }

    async fn quote_inputs(
        &self,
        vehicle_id: Uuid,
        pickup_location_id: Uuid,
        option_ids: &[Uuid],
    ) -> AppResult<QuoteInputs> {
        let state = self.state.lock().await;
        let vehicle = state
            .vehicles
            .get(&vehicle_id)
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;
        let zone_surcharge = *state
            .locations
            .get(&pickup_location_id)
            .ok_or_else(|| not_found_error("Location", &pickup_location_id.to_string()))?;

        Ok(QuoteInputs {
            daily_rate: vehicle.daily_rate,
            zone_surcharge,
            options: option_ids
                .iter()
                .filter_map(|id| state.options.get(id).cloned())
                .collect(),
        })
    }

    async fn book(&self, draft: RentalDraft) -> AppResult<Rental> {
        let mut state = self.state.lock().await;

        if !state.customers.contains(&draft.customer_id) {
            return Err(not_found_error("Customer", &draft.customer_id.to_string()));
        }
        state.ensure_location(draft.pickup_location_id)?;
        state.ensure_location(draft.return_location_id)?;

        let vehicle_status = state.vehicle_mut(draft.vehicle_id)?.status;
        let intervals = state.holding(draft.vehicle_id);
        ensure_available(&intervals, draft.start_date, draft.end_date, None)?;

        let now = Utc::now();
        let rental = Rental {
            id: Uuid::new_v4(),
            reference: draft.reference,
            vehicle_id: draft.vehicle_id,
            customer_id: draft.customer_id,
            pickup_location_id: draft.pickup_location_id,
            return_location_id: draft.return_location_id,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: RentalStatus::Reserved,
            total_amount: draft.total_amount,
            notes: draft.notes,
            created_by: Some(draft.created_by),
            created_at: now,
            updated_at: now,
            options: draft.options,
        };

        let holds: Vec<RentalStatus> = intervals.iter().map(|i| i.status).collect();
        let effect = vehicle_effect(RentalStatus::Reserved, vehicle_status, &holds);
        let vehicle = state.vehicle_mut(rental.vehicle_id)?;
        vehicle.status = effect.apply(vehicle.status);

        state.rentals.insert(rental.id, rental.clone());
        Ok(rental)
    }

    async fn reschedule(&self, id: Uuid, change: ScheduleChange) -> AppResult<Rental> {
        let mut state = self.state.lock().await;

        state.ensure_location(change.pickup_location_id)?;
        state.ensure_location(change.return_location_id)?;

        let current = state
            .rentals
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error("Rental", &id.to_string()))?;

        let next_status = plan_schedule_change(
            change.kind,
            current.status,
            (current.start_date, current.end_date),
            (change.start_date, change.end_date),
        )?;
        let intervals = state.holding(current.vehicle_id);
        ensure_available(&intervals, change.start_date, change.end_date, Some(id))?;

        let rental = Rental {
            start_date: change.start_date,
            end_date: change.end_date,
            pickup_location_id: change.pickup_location_id,
            return_location_id: change.return_location_id,
            notes: change.notes,
            total_amount: change.total_amount,
            options: change.options,
            status: next_status,
            updated_at: Utc::now(),
            ..current
        };
        state.rentals.insert(id, rental.clone());
        Ok(rental)
    }

    async fn transition(&self, id: Uuid, target: RentalStatus) -> AppResult<Rental> {
        let mut state = self.state.lock().await;

        let current = state
            .rentals
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error("Rental", &id.to_string()))?;
        ensure_transition(current.status, target)?;

        let intervals = state.holding(current.vehicle_id);
        let others = other_holds(&intervals, id);
        if target == RentalStatus::Active {
            ensure_pickup_allowed(&others)?;
        }
        let vehicle = state.vehicle_mut(current.vehicle_id)?;
        let effect = vehicle_effect(target, vehicle.status, &others);
        vehicle.status = effect.apply(vehicle.status);

        let rental = Rental {
            status: target,
            updated_at: Utc::now(),
            ..current
        };
        state.rentals.insert(id, rental.clone());
        Ok(rental)
    }

    async fn delete_rental(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.lock().await;

        let status = state
            .rentals
            .get(&id)
            .map(|r| r.status)
            .ok_or_else(|| not_found_error("Rental", &id.to_string()))?;
        ensure_deletable(status)?;

        state.rentals.remove(&id);
        Ok(())
    }
}
