use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::customer_dto::{CreateCustomerRequest, CustomerListQuery, UpdateCustomerRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{customer::Customer, staff::Permission};
use crate::repositories::customer_repository::CustomerRepository;
use crate::utils::errors::{not_found_error, AppResult};

pub struct CustomerController {
    repository: CustomerRepository,
}

impl CustomerController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CustomerRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateCustomerRequest,
    ) -> AppResult<ApiResponse<Customer>> {
        actor.require(Permission::ManageBookings)?;
        request.validate()?;

        let customer = self.repository.create(request).await?;
        info!("👤 {} registró al cliente {}", actor.email, customer.full_name());
        Ok(ApiResponse::success_with_message(customer, "Cliente creado exitosamente"))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Customer> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Customer", &id.to_string()))
    }

    pub async fn list(&self, query: CustomerListQuery) -> AppResult<Vec<Customer>> {
        let page = query.page();
        let search = query.search.as_deref().filter(|s| !s.trim().is_empty());
        self.repository.search(search, page.limit(), page.offset()).await
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: UpdateCustomerRequest,
    ) -> AppResult<ApiResponse<Customer>> {
        actor.require(Permission::ManageBookings)?;
        request.validate()?;

        let customer = self.repository.update(id, request).await?;
        Ok(ApiResponse::success_with_message(customer, "Cliente actualizado exitosamente"))
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        actor.require(Permission::ManageBookings)?;
        self.repository.delete(id).await
    }
}
