use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::option_dto::{CreateOptionRequest, UpdateOptionRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{option::AdditionalOption, staff::Permission};
use crate::repositories::option_repository::OptionRepository;
use crate::utils::errors::{not_found_error, AppResult};

pub struct OptionController {
    repository: OptionRepository,
}

impl OptionController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: OptionRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateOptionRequest,
    ) -> AppResult<ApiResponse<AdditionalOption>> {
        actor.require(Permission::ManageFleet)?;
        request.validate()?;
        let option = self.repository.create(request).await?;
        Ok(ApiResponse::success_with_message(option, "Opción creada exitosamente"))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<AdditionalOption> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Option", &id.to_string()))
    }

    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<AdditionalOption>> {
        self.repository.list(include_inactive).await
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: UpdateOptionRequest,
    ) -> AppResult<ApiResponse<AdditionalOption>> {
        actor.require(Permission::ManageFleet)?;
        request.validate()?;
        let option = self.repository.update(id, request).await?;
        Ok(ApiResponse::success(option))
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        actor.require(Permission::ManageFleet)?;
        self.repository.delete(id).await
    }
}
