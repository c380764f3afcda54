use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::location_dto::{
    CreateLocationRequest, CreateRateZoneRequest, UpdateLocationRequest, UpdateRateZoneRequest,
};
use crate::models::location::{Location, RateZone};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::merge_optional_text;

const LOCATION_COLUMNS: &str = "id, name, address, city, phone, rate_zone_id, created_at, updated_at";
const ZONE_COLUMNS: &str = "id, name, description, daily_surcharge, created_at, updated_at";

pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateLocationRequest) -> AppResult<Location> {
        let sql = format!(
            r#"
            INSERT INTO locations (id, name, address, city, phone, rate_zone_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {}
            "#,
            LOCATION_COLUMNS
        );
        let location = sqlx::query_as::<_, Location>(&sql)
            .bind(Uuid::new_v4())
            .bind(request.name.trim())
            .bind(request.address)
            .bind(request.city)
            .bind(request.phone)
            .bind(request.rate_zone_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(location)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Location>> {
        let sql = format!("SELECT {} FROM locations WHERE id = $1", LOCATION_COLUMNS);
        let location = sqlx::query_as::<_, Location>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(location)
    }

    pub async fn list(&self) -> AppResult<Vec<Location>> {
        let sql = format!("SELECT {} FROM locations ORDER BY city, name", LOCATION_COLUMNS);
        let locations = sqlx::query_as::<_, Location>(&sql).fetch_all(&self.pool).await?;

        Ok(locations)
    }

    pub async fn update(&self, id: Uuid, request: UpdateLocationRequest) -> AppResult<Location> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Location", &id.to_string()))?;

        let sql = format!(
            r#"
            UPDATE locations
            SET name = $2, address = $3, city = $4, phone = $5, rate_zone_id = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            LOCATION_COLUMNS
        );
        let location = sqlx::query_as::<_, Location>(&sql)
            .bind(id)
            .bind(request.name.unwrap_or(current.name))
            .bind(request.address.unwrap_or(current.address))
            .bind(request.city.unwrap_or(current.city))
            .bind(request.phone.or(current.phone))
            .bind(request.rate_zone_id.or(current.rate_zone_id))
            .fetch_one(&self.pool)
            .await?;

        Ok(location)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let (in_use,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM rentals WHERE pickup_location_id = $1 OR return_location_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        if in_use {
            return Err(AppError::Conflict("Location is referenced by rentals".to_string()));
        }

        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found_error("Location", &id.to_string()));
        }

        Ok(())
    }
}

pub struct RateZoneRepository {
    pool: PgPool,
}

impl RateZoneRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateRateZoneRequest) -> AppResult<RateZone> {
        let sql = format!(
            r#"
            INSERT INTO rate_zones (id, name, description, daily_surcharge, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {}
            "#,
            ZONE_COLUMNS
        );
        let zone = sqlx::query_as::<_, RateZone>(&sql)
            .bind(Uuid::new_v4())
            .bind(request.name.trim())
            .bind(request.description)
            .bind(request.daily_surcharge)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(zone)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RateZone>> {
        let sql = format!("SELECT {} FROM rate_zones WHERE id = $1", ZONE_COLUMNS);
        let zone = sqlx::query_as::<_, RateZone>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(zone)
    }

    pub async fn list(&self) -> AppResult<Vec<RateZone>> {
        let sql = format!("SELECT {} FROM rate_zones ORDER BY name", ZONE_COLUMNS);
        let zones = sqlx::query_as::<_, RateZone>(&sql).fetch_all(&self.pool).await?;

        Ok(zones)
    }

    pub async fn update(&self, id: Uuid, request: UpdateRateZoneRequest) -> AppResult<RateZone> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Rate zone", &id.to_string()))?;

        let sql = format!(
            r#"
            UPDATE rate_zones
            SET name = $2, description = $3, daily_surcharge = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ZONE_COLUMNS
        );
        let zone = sqlx::query_as::<_, RateZone>(&sql)
            .bind(id)
            .bind(request.name.unwrap_or(current.name))
            .bind(merge_optional_text(request.description, current.description))
            .bind(request.daily_surcharge.unwrap_or(current.daily_surcharge))
            .fetch_one(&self.pool)
            .await?;

        Ok(zone)
    }

    /// Las sedes de la zona quedan sin zona (sin recargo)
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM rate_zones WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found_error("Rate zone", &id.to_string()));
        }

        Ok(())
    }
}
