use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::customer_dto::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::models::customer::Customer;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::{merge_optional_text, normalize_email};

const CUSTOMER_COLUMNS: &str = "id, first_name, last_name, email, phone, driver_license_number, \
     date_of_birth, address, created_at, updated_at";

pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateCustomerRequest) -> AppResult<Customer> {
        let sql = format!(
            r#"
            INSERT INTO customers (id, first_name, last_name, email, phone, driver_license_number,
                                   date_of_birth, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        );
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(Uuid::new_v4())
            .bind(request.first_name.trim())
            .bind(request.last_name.trim())
            .bind(normalize_email(&request.email))
            .bind(request.phone)
            .bind(request.driver_license_number.trim().to_uppercase())
            .bind(request.date_of_birth)
            .bind(request.address)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(customer)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Customer>> {
        let sql = format!("SELECT {} FROM customers WHERE id = $1", CUSTOMER_COLUMNS);
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    pub async fn search(&self, search: Option<&str>, limit: i64, offset: i64) -> AppResult<Vec<Customer>> {
        let pattern = search.map(|s| format!("%{}%", s.trim()));
        let sql = format!(
            r#"
            SELECT {} FROM customers
            WHERE $1::text IS NULL
               OR first_name ILIKE $1
               OR last_name ILIKE $1
               OR email ILIKE $1
               OR driver_license_number ILIKE $1
            ORDER BY last_name, first_name
            LIMIT $2 OFFSET $3
            "#,
            CUSTOMER_COLUMNS
        );
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    pub async fn update(&self, id: Uuid, request: UpdateCustomerRequest) -> AppResult<Customer> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Customer", &id.to_string()))?;

        let sql = format!(
            r#"
            UPDATE customers
            SET first_name = $2, last_name = $3, email = $4, phone = $5, driver_license_number = $6,
                date_of_birth = $7, address = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        );
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .bind(request.first_name.unwrap_or(current.first_name))
            .bind(request.last_name.unwrap_or(current.last_name))
            .bind(request.email.map(|e| normalize_email(&e)).unwrap_or(current.email))
            .bind(request.phone.unwrap_or(current.phone))
            .bind(
                request
                    .driver_license_number
                    .map(|n| n.trim().to_uppercase())
                    .unwrap_or(current.driver_license_number),
            )
            .bind(request.date_of_birth.or(current.date_of_birth))
            .bind(merge_optional_text(request.address, current.address))
            .fetch_one(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Un cliente con alquileres registrados no se borra
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let (has_rentals,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM rentals WHERE customer_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if has_rentals {
            return Err(AppError::Conflict("Customer has rentals and cannot be deleted".to_string()));
        }

        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found_error("Customer", &id.to_string()));
        }

        Ok(())
    }
}
