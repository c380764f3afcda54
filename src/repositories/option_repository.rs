use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::option_dto::{CreateOptionRequest, UpdateOptionRequest};
use crate::models::option::AdditionalOption;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::merge_optional_text;

const OPTION_COLUMNS: &str = "id, name, description, price, per_day, active, created_at";

pub struct OptionRepository {
    pool: PgPool,
}

impl OptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateOptionRequest) -> AppResult<AdditionalOption> {
        let sql = format!(
            r#"
            INSERT INTO additional_options (id, name, description, price, per_day, active, created_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6)
            RETURNING {}
            "#,
            OPTION_COLUMNS
        );
        let option = sqlx::query_as::<_, AdditionalOption>(&sql)
            .bind(Uuid::new_v4())
            .bind(request.name.trim())
            .bind(request.description)
            .bind(request.price)
            .bind(request.per_day)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(option)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AdditionalOption>> {
        let sql = format!("SELECT {} FROM additional_options WHERE id = $1", OPTION_COLUMNS);
        let option = sqlx::query_as::<_, AdditionalOption>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(option)
    }

    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<AdditionalOption>> {
        let sql = format!(
            "SELECT {} FROM additional_options WHERE $1 OR active ORDER BY name",
            OPTION_COLUMNS
        );
        let options = sqlx::query_as::<_, AdditionalOption>(&sql)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await?;

        Ok(options)
    }

    pub async fn update(&self, id: Uuid, request: UpdateOptionRequest) -> AppResult<AdditionalOption> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Option", &id.to_string()))?;

        let sql = format!(
            r#"
            UPDATE additional_options
            SET name = $2, description = $3, price = $4, per_day = $5, active = $6
            WHERE id = $1
            RETURNING {}
            "#,
            OPTION_COLUMNS
        );
        let option = sqlx::query_as::<_, AdditionalOption>(&sql)
            .bind(id)
            .bind(request.name.unwrap_or(current.name))
            .bind(merge_optional_text(request.description, current.description))
            .bind(request.price.unwrap_or(current.price))
            .bind(request.per_day.unwrap_or(current.per_day))
            .bind(request.active.unwrap_or(current.active))
            .fetch_one(&self.pool)
            .await?;

        Ok(option)
    }

    /// Las opciones ya contratadas se desactivan, no se borran
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let (in_use,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM rental_options WHERE option_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if in_use {
            return Err(AppError::Conflict(
                "Option appears on rentals; deactivate it instead".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM additional_options WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found_error("Option", &id.to_string()));
        }

        Ok(())
    }
}
