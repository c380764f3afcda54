use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::maintenance_dto::CreateMaintenanceRequest;
use crate::models::maintenance::MaintenanceRecord;
use crate::utils::errors::{not_found_error, AppResult};

const MAINTENANCE_COLUMNS: &str =
    "id, vehicle_id, kind, description, performed_on, mileage, cost, created_at";

pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registrar la intervención y, si trae kilometraje mayor, actualizar el del vehículo
    pub async fn create(
        &self,
        vehicle_id: Uuid,
        request: CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceRecord> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO maintenance_records (id, vehicle_id, kind, description, performed_on, mileage, cost, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            MAINTENANCE_COLUMNS
        );
        let record = sqlx::query_as::<_, MaintenanceRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(vehicle_id)
            .bind(request.kind.trim())
            .bind(request.description)
            .bind(request.performed_on)
            .bind(request.mileage)
            .bind(request.cost)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        if let Some(mileage) = record.mileage {
            sqlx::query(
                "UPDATE vehicles SET mileage = $2, updated_at = NOW() WHERE id = $1 AND mileage < $2",
            )
            .bind(vehicle_id)
            .bind(mileage)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(record)
    }

    pub async fn list_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>> {
        let sql = format!(
            "SELECT {} FROM maintenance_records WHERE vehicle_id = $1 ORDER BY performed_on DESC, created_at DESC",
            MAINTENANCE_COLUMNS
        );
        let records = sqlx::query_as::<_, MaintenanceRecord>(&sql)
            .bind(vehicle_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    pub async fn delete(&self, vehicle_id: Uuid, record_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM maintenance_records WHERE id = $1 AND vehicle_id = $2")
            .bind(record_id)
            .bind(vehicle_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found_error("Maintenance record", &record_id.to_string()));
        }

        Ok(())
    }
}
