use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    models::{
        option::AdditionalOption,
        rental::{Rental, RentalInterval, RentalOptionLine, RentalStatus},
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
            vehicle_effect, VehicleEffect,
        },
    },
    utils::errors::{internal_error, not_found_error, AppResult},
};

const RENTAL_COLUMNS: &str = "id, reference, vehicle_id, customer_id, pickup_location_id, \
     return_location_id, start_date, end_date, status, total_amount, notes, created_by, \
     created_at, updated_at";

#[derive(FromRow)]
struct OptionLineRow {
    rental_id: Uuid,
    #[sqlx(flatten)]
    line: RentalOptionLine,
}

/// Store de alquileres sobre PostgreSQL.
///
/// Las escrituras abren una transacción y bloquean la fila del vehículo
/// (`SELECT ... FOR UPDATE`) antes de leer sus intervalos; la constraint
/// `rentals_no_overlap` queda como última barrera.
#[derive(Clone)]
pub struct RentalRepository {
    pool: PgPool,
}

impl RentalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn attach_options(&self, rentals: &mut [Rental]) -> AppResult<()> {
        if rentals.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = rentals.iter().map(|r| r.id).collect();
        let rows = sqlx::query_as::<_, OptionLineRow>(
            "SELECT rental_id, option_id, name, quantity, unit_price, per_day \
             FROM rental_options WHERE rental_id = ANY($1) ORDER BY name",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_rental: HashMap<Uuid, Vec<RentalOptionLine>> = HashMap::new();
        for row in rows {
            by_rental.entry(row.rental_id).or_default().push(row.line);
        }
        for rental in rentals.iter_mut() {
            rental.options = by_rental.remove(&rental.id).unwrap_or_default();
        }
        Ok(())
    }
}

async fn lock_vehicle(conn: &mut PgConnection, vehicle_id: Uuid) -> AppResult<VehicleStatus> {
    let row: Option<(VehicleStatus,)> =
        sqlx::query_as("SELECT status FROM vehicles WHERE id = $1 FOR UPDATE")
            .bind(vehicle_id)
            .fetch_optional(&mut *conn)
            .await?;

    row.map(|(status,)| status)
        .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))
}

async fn set_vehicle_status(
    conn: &mut PgConnection,
    vehicle_id: Uuid,
    current: VehicleStatus,
    effect: VehicleEffect,
) -> AppResult<()> {
    let next = effect.apply(current);
    if next == current {
        return Ok(());
    }
    let result = sqlx::query("UPDATE vehicles SET status = $2, updated_at = NOW() WHERE id = $1")
        .bind(vehicle_id)
        .bind(next)
        .execute(&mut *conn)
        .await?;
    // La fila está bloqueada desde el inicio de la transacción
    if result.rows_affected() != 1 {
        return Err(internal_error(&format!(
            "vehicle {} disappeared while locked",
            vehicle_id
        )));
    }
    debug!("🚗 Vehículo {}: {} -> {}", vehicle_id, current, next);
    Ok(())
}

async fn fetch_holding(conn: &mut PgConnection, vehicle_id: Uuid) -> AppResult<Vec<RentalInterval>> {
    let intervals = sqlx::query_as::<_, RentalInterval>(
        "SELECT id, reference, start_date, end_date, status FROM rentals \
         WHERE vehicle_id = $1 AND status IN ('RESERVED', 'ACTIVE', 'EXTENDED') \
         ORDER BY start_date",
    )
    .bind(vehicle_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(intervals)
}

/// Lee el alquiler bloqueando su fila; el vehículo ya debe estar bloqueado
async fn fetch_rental_for_update(conn: &mut PgConnection, id: Uuid) -> AppResult<Rental> {
    let sql = format!("SELECT {} FROM rentals WHERE id = $1 FOR UPDATE", RENTAL_COLUMNS);
    sqlx::query_as::<_, Rental>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| not_found_error("Rental", &id.to_string()))
}

async fn vehicle_of(conn: &mut PgConnection, rental_id: Uuid) -> AppResult<Uuid> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT vehicle_id FROM rentals WHERE id = $1")
        .bind(rental_id)
        .fetch_optional(&mut *conn)
        .await?;
    row.map(|(vehicle_id,)| vehicle_id)
        .ok_or_else(|| not_found_error("Rental", &rental_id.to_string()))
}

async fn replace_options(
    conn: &mut PgConnection,
    rental_id: Uuid,
    options: &[RentalOptionLine],
) -> AppResult<()> {
    sqlx::query("DELETE FROM rental_options WHERE rental_id = $1")
        .bind(rental_id)
        .execute(&mut *conn)
        .await?;

    for line in options {
        sqlx::query(
            "INSERT INTO rental_options (rental_id, option_id, name, quantity, unit_price, per_day) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(rental_id)
        .bind(line.option_id)
        .bind(&line.name)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.per_day)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl RentalStore for RentalRepository {
    async fn find_rental(&self, id: Uuid) -> AppResult<Option<Rental>> {
        let sql = format!("SELECT {} FROM rentals WHERE id = $1", RENTAL_COLUMNS);
        let rental = sqlx::query_as::<_, Rental>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match rental {
            Some(rental) => {
                let mut rentals = [rental];
                self.attach_options(&mut rentals).await?;
                let [rental] = rentals;
                Ok(Some(rental))
            }
            None => Ok(None),
        }
    }

    async fn list_rentals(&self, filters: &RentalFilters) -> AppResult<Vec<Rental>> {
        let sql = format!(
            "SELECT {} FROM rentals \
             WHERE ($1::rental_status IS NULL OR status = $1) \
               AND ($2::uuid IS NULL OR vehicle_id = $2) \
               AND ($3::uuid IS NULL OR customer_id = $3) \
               AND ($4::date IS NULL OR end_date >= $4) \
               AND ($5::date IS NULL OR start_date <= $5) \
             ORDER BY start_date DESC, created_at DESC \
             LIMIT $6 OFFSET $7",
            RENTAL_COLUMNS
        );
        let mut rentals = sqlx::query_as::<_, Rental>(&sql)
            .bind(filters.status)
            .bind(filters.vehicle_id)
            .bind(filters.customer_id)
            .bind(filters.from)
            .bind(filters.to)
            .bind(filters.limit)
            .bind(filters.offset)
            .fetch_all(&self.pool)
            .await?;

        self.attach_options(&mut rentals).await?;
        Ok(rentals)
    }

    async fn holding_intervals(&self, vehicle_id: Uuid) -> AppResult<Vec<RentalInterval>> {
        let mut conn = self.pool.acquire().await?;
        fetch_holding(&mut conn, vehicle_id).await
    }

    async fn vehicle_status(&self, vehicle_id: Uuid) -> AppResult<Option<VehicleStatus>> {
        let row: Option<(VehicleStatus,)> = sqlx::query_as("SELECT status FROM vehicles WHERE id = $1")
            .bind(vehicle_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(status,)| status))
    }

    async fn quote_inputs(
        &self,
        vehicle_id: Uuid,
        pickup_location_id: Uuid,
        option_ids: &[Uuid],
    ) -> AppResult<QuoteInputs> {
        let (daily_rate,): (Decimal,) = sqlx::query_as("SELECT daily_rate FROM vehicles WHERE id = $1")
            .bind(vehicle_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;

        let (zone_surcharge,): (Option<Decimal>,) = sqlx::query_as(
            "SELECT rz.daily_surcharge FROM locations l \
             LEFT JOIN rate_zones rz ON rz.id = l.rate_zone_id \
             WHERE l.id = $1",
        )
        .bind(pickup_location_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found_error("Location", &pickup_location_id.to_string()))?;

        let options = if option_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, AdditionalOption>(
                "SELECT id, name, description, price, per_day, active, created_at \
                 FROM additional_options WHERE id = ANY($1)",
            )
            .bind(option_ids)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(QuoteInputs {
            daily_rate,
            zone_surcharge: zone_surcharge.unwrap_or(Decimal::ZERO),
            options,
        })
    }

    async fn book(&self, draft: RentalDraft) -> AppResult<Rental> {
        let mut tx = self.pool.begin().await?;

        let vehicle_status = lock_vehicle(&mut tx, draft.vehicle_id).await?;
        let intervals = fetch_holding(&mut tx, draft.vehicle_id).await?;
        ensure_available(&intervals, draft.start_date, draft.end_date, None)?;

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO rentals (id, reference, vehicle_id, customer_id, pickup_location_id, \
             return_location_id, start_date, end_date, status, total_amount, notes, created_by, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13) \
             RETURNING {}",
            RENTAL_COLUMNS
        );
        let mut rental = sqlx::query_as::<_, Rental>(&sql)
            .bind(Uuid::new_v4())
            .bind(&draft.reference)
            .bind(draft.vehicle_id)
            .bind(draft.customer_id)
            .bind(draft.pickup_location_id)
            .bind(draft.return_location_id)
            .bind(draft.start_date)
            .bind(draft.end_date)
            .bind(RentalStatus::Reserved)
            .bind(draft.total_amount)
            .bind(&draft.notes)
            .bind(draft.created_by)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        replace_options(&mut tx, rental.id, &draft.options).await?;

        let holds: Vec<RentalStatus> = intervals.iter().map(|i| i.status).collect();
        let effect = vehicle_effect(RentalStatus::Reserved, vehicle_status, &holds);
        set_vehicle_status(&mut tx, draft.vehicle_id, vehicle_status, effect).await?;

        tx.commit().await?;

        rental.options = draft.options;
        info!("📅 Alquiler {} reservado ({} → {})", rental.reference, rental.start_date, rental.end_date);
        Ok(rental)
    }

    async fn reschedule(&self, id: Uuid, change: ScheduleChange) -> AppResult<Rental> {
        let mut tx = self.pool.begin().await?;

        let vehicle_id = vehicle_of(&mut tx, id).await?;
        lock_vehicle(&mut tx, vehicle_id).await?;
        let current = fetch_rental_for_update(&mut tx, id).await?;

        let next_status = plan_schedule_change(
            change.kind,
            current.status,
            (current.start_date, current.end_date),
            (change.start_date, change.end_date),
        )?;
        let intervals = fetch_holding(&mut tx, vehicle_id).await?;
        ensure_available(&intervals, change.start_date, change.end_date, Some(id))?;

        let sql = format!(
            "UPDATE rentals SET start_date = $2, end_date = $3, pickup_location_id = $4, \
             return_location_id = $5, notes = $6, total_amount = $7, status = $8, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            RENTAL_COLUMNS
        );
        let mut rental = sqlx::query_as::<_, Rental>(&sql)
            .bind(id)
            .bind(change.start_date)
            .bind(change.end_date)
            .bind(change.pickup_location_id)
            .bind(change.return_location_id)
            .bind(&change.notes)
            .bind(change.total_amount)
            .bind(next_status)
            .fetch_one(&mut *tx)
            .await?;

        replace_options(&mut tx, id, &change.options).await?;
        tx.commit().await?;

        rental.options = change.options;
        Ok(rental)
    }

    async fn transition(&self, id: Uuid, target: RentalStatus) -> AppResult<Rental> {
        let mut tx = self.pool.begin().await?;

        let vehicle_id = vehicle_of(&mut tx, id).await?;
        let vehicle_status = lock_vehicle(&mut tx, vehicle_id).await?;
        let current = fetch_rental_for_update(&mut tx, id).await?;
        ensure_transition(current.status, target)?;

        let intervals = fetch_holding(&mut tx, vehicle_id).await?;
        let others = other_holds(&intervals, id);
        if target == RentalStatus::Active {
            ensure_pickup_allowed(&others)?;
        }
        let effect = vehicle_effect(target, vehicle_status, &others);

        let sql = format!(
            "UPDATE rentals SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            RENTAL_COLUMNS
        );
        let rental = sqlx::query_as::<_, Rental>(&sql)
            .bind(id)
            .bind(target)
            .fetch_one(&mut *tx)
            .await?;

        set_vehicle_status(&mut tx, vehicle_id, vehicle_status, effect).await?;
        tx.commit().await?;

        info!("🔄 Alquiler {}: {} -> {}", rental.reference, current.status, target);
        let mut rentals = [rental];
        self.attach_options(&mut rentals).await?;
        let [rental] = rentals;
        Ok(rental)
    }

    async fn delete_rental(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let vehicle_id = vehicle_of(&mut tx, id).await?;
        lock_vehicle(&mut tx, vehicle_id).await?;
        let current = fetch_rental_for_update(&mut tx, id).await?;
        ensure_deletable(current.status)?;

        sqlx::query("DELETE FROM rentals WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("🗑️ Alquiler {} eliminado", current.reference);
        Ok(())
    }
}
