use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::staff::{Staff, StaffRole};
use crate::utils::errors::AppResult;

const STAFF_COLUMNS: &str = "id, email, full_name, password_hash, role, active, created_at, updated_at";

/// Campos ya resueltos (hash incluido) para actualizar un miembro del personal
#[derive(Debug, Default)]
pub struct StaffChanges {
    pub full_name: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<StaffRole>,
    pub active: Option<bool>,
}

#[derive(Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        email: &str,
        full_name: &str,
        password_hash: &str,
        role: StaffRole,
    ) -> AppResult<Staff> {
        let sql = format!(
            r#"
            INSERT INTO staff (id, email, full_name, password_hash, role, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
            RETURNING {}
            "#,
            STAFF_COLUMNS
        );
        let staff = sqlx::query_as::<_, Staff>(&sql)
            .bind(Uuid::new_v4())
            .bind(email)
            .bind(full_name)
            .bind(password_hash)
            .bind(role)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(staff)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Staff>> {
        let sql = format!("SELECT {} FROM staff WHERE id = $1", STAFF_COLUMNS);
        let staff = sqlx::query_as::<_, Staff>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(staff)
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Staff>> {
        let sql = format!("SELECT {} FROM staff WHERE email = $1", STAFF_COLUMNS);
        let staff = sqlx::query_as::<_, Staff>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(staff)
    }

    pub async fn list(&self) -> AppResult<Vec<Staff>> {
        let sql = format!("SELECT {} FROM staff ORDER BY full_name", STAFF_COLUMNS);
        let staff = sqlx::query_as::<_, Staff>(&sql).fetch_all(&self.pool).await?;

        Ok(staff)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM staff")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn update(&self, id: Uuid, changes: StaffChanges) -> AppResult<Option<Staff>> {
        let sql = format!(
            r#"
            UPDATE staff
            SET full_name = COALESCE($2, full_name),
                password_hash = COALESCE($3, password_hash),
                role = COALESCE($4, role),
                active = COALESCE($5, active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            STAFF_COLUMNS
        );
        let staff = sqlx::query_as::<_, Staff>(&sql)
            .bind(id)
            .bind(changes.full_name)
            .bind(changes.password_hash)
            .bind(changes.role)
            .bind(changes.active)
            .fetch_optional(&self.pool)
            .await?;

        Ok(staff)
    }
}
