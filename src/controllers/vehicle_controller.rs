use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::maintenance_dto::CreateMaintenanceRequest;
use crate::dto::vehicle_dto::{
    AvailableVehiclesQuery, CreateVehicleRequest, UpdateVehicleRequest, VehicleListQuery,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{maintenance::MaintenanceRecord, staff::Permission, vehicle::{Vehicle, VehicleStatus}};
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation::ensure_date_range;

pub struct VehicleController {
    repository: VehicleRepository,
    maintenance: MaintenanceRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            maintenance: MaintenanceRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateVehicleRequest,
    ) -> AppResult<ApiResponse<Vehicle>> {
        actor.require(Permission::ManageFleet)?;
        request.validate()?;

        let vehicle = self.repository.create(request).await?;
        info!("🚗 {} registró el vehículo {}", actor.email, vehicle.license_plate);
        Ok(ApiResponse::success_with_message(vehicle, "Vehículo creado exitosamente"))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Vehicle> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    pub async fn list(&self, query: VehicleListQuery) -> AppResult<Vec<Vehicle>> {
        let page = query.page();
        self.repository
            .list(
                query.status,
                query.category.as_deref(),
                query.home_location_id,
                page.limit(),
                page.offset(),
            )
            .await
    }

    /// Vehículos reservables en el intervalo pedido
    pub async fn available(&self, query: AvailableVehiclesQuery) -> AppResult<Vec<Vehicle>> {
        ensure_date_range(query.start_date, query.end_date)?;
        self.repository
            .find_available(query.start_date, query.end_date, query.category.as_deref())
            .await
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> AppResult<ApiResponse<Vehicle>> {
        actor.require(Permission::ManageFleet)?;
        request.validate()?;

        let vehicle = self.repository.update(id, request).await?;
        Ok(ApiResponse::success_with_message(vehicle, "Vehículo actualizado exitosamente"))
    }

    pub async fn set_status(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        status: VehicleStatus,
    ) -> AppResult<ApiResponse<Vehicle>> {
        actor.require(Permission::ManageFleet)?;
        let vehicle = self.repository.set_status(id, status).await?;
        Ok(ApiResponse::success(vehicle))
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        actor.require(Permission::ManageFleet)?;
        self.repository.delete(id).await?;
        info!("🗑️ {} eliminó el vehículo {}", actor.email, id);
        Ok(())
    }

    pub async fn add_maintenance(
        &self,
        actor: &AuthenticatedUser,
        vehicle_id: Uuid,
        request: CreateMaintenanceRequest,
    ) -> AppResult<ApiResponse<MaintenanceRecord>> {
        actor.require(Permission::ManageFleet)?;
        request.validate()?;

        let record = self.maintenance.create(vehicle_id, request).await?;
        Ok(ApiResponse::success_with_message(record, "Intervención registrada"))
    }

    pub async fn list_maintenance(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>> {
        // 404 explícito para un vehículo inexistente en lugar de lista vacía
        self.get_by_id(vehicle_id).await?;
        self.maintenance.list_for_vehicle(vehicle_id).await
    }

    pub async fn delete_maintenance(
        &self,
        actor: &AuthenticatedUser,
        vehicle_id: Uuid,
        record_id: Uuid,
    ) -> AppResult<()> {
        actor.require(Permission::ManageFleet)?;
        self.maintenance.delete(vehicle_id, record_id).await
    }
}
