use uuid::Uuid;

use crate::dto::api_response::ApiResponse;
use crate::dto::rental_dto::{
    AvailabilityRequest, AvailabilityResponse, CreateRentalRequest, ExtendRentalRequest,
    RentalListQuery, RentalResponse, UpdateRentalRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::rental::RentalStatus;
use crate::repositories::rental_store::RentalFilters;
use crate::services::RentalService;
use crate::utils::errors::AppResult;

pub struct RentalController {
    service: RentalService,
}

impl RentalController {
    pub fn new(service: RentalService) -> Self {
        Self { service }
    }

    pub async fn check_availability(&self, request: AvailabilityRequest) -> AppResult<AvailabilityResponse> {
        self.service.check_availability(&request).await
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateRentalRequest,
    ) -> AppResult<ApiResponse<RentalResponse>> {
        let rental = self.service.create_rental(actor, request).await?;
        Ok(ApiResponse::success_with_message(rental.into(), "Reserva creada exitosamente"))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<RentalResponse> {
        Ok(self.service.get_rental(id).await?.into())
    }

    pub async fn list(&self, query: RentalListQuery) -> AppResult<Vec<RentalResponse>> {
        let filters = RentalFilters::from(query);
        let rentals = self.service.list_rentals(&filters).await?;
        Ok(rentals.into_iter().map(RentalResponse::from).collect())
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: UpdateRentalRequest,
    ) -> AppResult<ApiResponse<RentalResponse>> {
        let rental = self.service.update_rental(actor, id, request).await?;
        Ok(ApiResponse::success_with_message(rental.into(), "Reserva actualizada exitosamente"))
    }

    pub async fn extend(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: ExtendRentalRequest,
    ) -> AppResult<ApiResponse<RentalResponse>> {
        let rental = self.service.extend_rental(actor, id, request).await?;
        Ok(ApiResponse::success_with_message(rental.into(), "Alquiler prolongado"))
    }

    pub async fn transition(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        target: RentalStatus,
    ) -> AppResult<ApiResponse<RentalResponse>> {
        let rental = self.service.transition_rental(actor, id, target).await?;
        Ok(ApiResponse::success(rental.into()))
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        self.service.delete_rental(actor, id).await
    }
}
