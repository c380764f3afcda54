use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::location_dto::{
    CreateLocationRequest, CreateRateZoneRequest, UpdateLocationRequest, UpdateRateZoneRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    location::{Location, RateZone},
    staff::Permission,
};
use crate::repositories::location_repository::{LocationRepository, RateZoneRepository};
use crate::utils::errors::{not_found_error, AppResult};

/// Sedes y zonas tarifarias
pub struct LocationController {
    locations: LocationRepository,
    zones: RateZoneRepository,
}

impl LocationController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            locations: LocationRepository::new(pool.clone()),
            zones: RateZoneRepository::new(pool),
        }
    }

    pub async fn create_location(
        &self,
        actor: &AuthenticatedUser,
        request: CreateLocationRequest,
    ) -> AppResult<ApiResponse<Location>> {
        actor.require(Permission::ManageFleet)?;
        request.validate()?;
        let location = self.locations.create(request).await?;
        Ok(ApiResponse::success_with_message(location, "Sede creada exitosamente"))
    }

    pub async fn get_location(&self, id: Uuid) -> AppResult<Location> {
        self.locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Location", &id.to_string()))
    }

    pub async fn list_locations(&self) -> AppResult<Vec<Location>> {
        self.locations.list().await
    }

    pub async fn update_location(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: UpdateLocationRequest,
    ) -> AppResult<ApiResponse<Location>> {
        actor.require(Permission::ManageFleet)?;
        request.validate()?;
        let location = self.locations.update(id, request).await?;
        Ok(ApiResponse::success(location))
    }

    pub async fn delete_location(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        actor.require(Permission::ManageFleet)?;
        self.locations.delete(id).await
    }

    pub async fn create_zone(
        &self,
        actor: &AuthenticatedUser,
        request: CreateRateZoneRequest,
    ) -> AppResult<ApiResponse<RateZone>> {
        actor.require(Permission::ManageFleet)?;
        request.validate()?;
        let zone = self.zones.create(request).await?;
        Ok(ApiResponse::success_with_message(zone, "Zona tarifaria creada exitosamente"))
    }

    pub async fn get_zone(&self, id: Uuid) -> AppResult<RateZone> {
        self.zones
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Rate zone", &id.to_string()))
    }

    pub async fn list_zones(&self) -> AppResult<Vec<RateZone>> {
        self.zones.list().await
    }

    pub async fn update_zone(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: UpdateRateZoneRequest,
    ) -> AppResult<ApiResponse<RateZone>> {
        actor.require(Permission::ManageFleet)?;
        request.validate()?;
        let zone = self.zones.update(id, request).await?;
        Ok(ApiResponse::success(zone))
    }

    pub async fn delete_zone(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        actor.require(Permission::ManageFleet)?;
        self.zones.delete(id).await
    }
}
