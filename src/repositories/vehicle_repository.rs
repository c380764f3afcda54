use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::models::{rental::RentalStatus, vehicle::{Vehicle, VehicleStatus}};
use crate::services::rental_lifecycle::manual_vehicle_status;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::{merge_optional_text, normalize_plate};

const VEHICLE_COLUMNS: &str = "id, license_plate, vin, brand, model, year, category, fuel_type, \
     transmission, seats, mileage, daily_rate, status, home_location_id, created_at, updated_at";

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<Vehicle> {
        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO vehicles (id, license_plate, vin, brand, model, year, category, fuel_type,
                                  transmission, seats, mileage, daily_rate, status, home_location_id,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'AVAILABLE', $13, $14, $14)
            RETURNING {}
            "#,
            VEHICLE_COLUMNS
        );

        let vehicle = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(Uuid::new_v4())
            .bind(normalize_plate(&request.license_plate))
            .bind(request.vin.map(|v| v.trim().to_uppercase()))
            .bind(request.brand.trim())
            .bind(request.model.trim())
            .bind(request.year)
            .bind(request.category)
            .bind(request.fuel_type)
            .bind(request.transmission)
            .bind(request.seats)
            .bind(request.mileage.unwrap_or(0))
            .bind(request.daily_rate)
            .bind(request.home_location_id)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let sql = format!("SELECT {} FROM vehicles WHERE id = $1", VEHICLE_COLUMNS);
        let vehicle = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn list(
        &self,
        status: Option<VehicleStatus>,
        category: Option<&str>,
        home_location_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Vehicle>> {
        let sql = format!(
            r#"
            SELECT {} FROM vehicles
            WHERE ($1::vehicle_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR category = $2)
              AND ($3::uuid IS NULL OR home_location_id = $3)
            ORDER BY license_plate
            LIMIT $4 OFFSET $5
            "#,
            VEHICLE_COLUMNS
        );
        let vehicles = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(status)
            .bind(category)
            .bind(home_location_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    /// Vehículos sin alquiler no terminal que solape `[start, end]`
    pub async fn find_available(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        category: Option<&str>,
    ) -> AppResult<Vec<Vehicle>> {
        let sql = format!(
            r#"
            SELECT {} FROM vehicles v
            WHERE v.status NOT IN ('MAINTENANCE', 'OUT_OF_SERVICE')
              AND ($3::text IS NULL OR v.category = $3)
              AND NOT EXISTS (
                  SELECT 1 FROM rentals r
                  WHERE r.vehicle_id = v.id
                    AND r.status IN ('RESERVED', 'ACTIVE', 'EXTENDED')
                    AND r.start_date <= $2
                    AND r.end_date >= $1
              )
            ORDER BY v.daily_rate, v.license_plate
            "#,
            VEHICLE_COLUMNS
        );
        let vehicles = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(start)
            .bind(end)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    pub async fn update(&self, id: Uuid, request: UpdateVehicleRequest) -> AppResult<Vehicle> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        let sql = format!(
            r#"
            UPDATE vehicles
            SET license_plate = $2, vin = $3, brand = $4, model = $5, year = $6, category = $7,
                fuel_type = $8, transmission = $9, seats = $10, mileage = $11, daily_rate = $12,
                home_location_id = $13, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VEHICLE_COLUMNS
        );
        let vehicle = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(id)
            .bind(request.license_plate.map(|p| normalize_plate(&p)).unwrap_or(current.license_plate))
            .bind(request.vin.map(|v| v.trim().to_uppercase()).or(current.vin))
            .bind(request.brand.unwrap_or(current.brand))
            .bind(request.model.unwrap_or(current.model))
            .bind(request.year.or(current.year))
            .bind(request.category.unwrap_or(current.category))
            .bind(request.fuel_type.unwrap_or(current.fuel_type))
            .bind(merge_optional_text(request.transmission, current.transmission))
            .bind(request.seats.or(current.seats))
            .bind(request.mileage.unwrap_or(current.mileage))
            .bind(request.daily_rate.unwrap_or(current.daily_rate))
            .bind(request.home_location_id.or(current.home_location_id))
            .fetch_one(&self.pool)
            .await?;

        Ok(vehicle)
    }

    /// Estado manual de flota, bajo el mismo bloqueo que las transiciones de alquiler
    pub async fn set_status(&self, id: Uuid, target: VehicleStatus) -> AppResult<Vehicle> {
        let mut tx = self.pool.begin().await?;

        let (current,): (VehicleStatus,) =
            sqlx::query_as("SELECT status FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        let holds: Vec<(RentalStatus,)> = sqlx::query_as(
            "SELECT status FROM rentals WHERE vehicle_id = $1 AND status IN ('RESERVED', 'ACTIVE', 'EXTENDED')",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;
        let holds: Vec<RentalStatus> = holds.into_iter().map(|(s,)| s).collect();

        let next = manual_vehicle_status(current, target, &holds)?;

        let sql = format!(
            "UPDATE vehicles SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            VEHICLE_COLUMNS
        );
        let vehicle = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(id)
            .bind(next)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("🚗 Vehículo {}: {} -> {}", vehicle.license_plate, current, next);
        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let (has_rentals,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM rentals WHERE vehicle_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if has_rentals {
            return Err(AppError::Conflict(
                "Vehicle has rental history; set it OUT_OF_SERVICE instead".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }

        Ok(())
    }
}
