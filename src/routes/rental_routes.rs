use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::rental_controller::RentalController;
use crate::dto::api_response::ApiResponse;
use crate::dto::rental_dto::{
    AvailabilityRequest, AvailabilityResponse, CreateRentalRequest, ExtendRentalRequest,
    RentalListQuery, RentalResponse, TransitionRequest, UpdateRentalRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::rental::RentalStatus;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_rental_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_rental).get(list_rentals))
        .route("/availability", post(check_availability))
        .route("/:id", get(get_rental).put(update_rental).delete(delete_rental))
        .route("/:id/status", post(transition_rental))
        .route("/:id/pickup", post(pickup_rental))
        .route("/:id/return", post(return_rental))
        .route("/:id/cancel", post(cancel_rental))
        .route("/:id/extend", post(extend_rental))
}

fn controller(state: &AppState) -> RentalController {
    RentalController::new(state.rental_service())
}

async fn check_availability(
    State(state): State<AppState>,
    Json(request): Json<AvailabilityRequest>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let response = controller(&state).check_availability(request).await?;
    Ok(Json(response))
}

async fn create_rental(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateRentalRequest>,
) -> Result<Json<ApiResponse<RentalResponse>>, AppError> {
    let response = controller(&state).create(&user, request).await?;
    Ok(Json(response))
}

async fn list_rentals(
    State(state): State<AppState>,
    Query(query): Query<RentalListQuery>,
) -> Result<Json<Vec<RentalResponse>>, AppError> {
    let response = controller(&state).list(query).await?;
    Ok(Json(response))
}

async fn get_rental(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RentalResponse>, AppError> {
    let response = controller(&state).get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_rental(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRentalRequest>,
) -> Result<Json<ApiResponse<RentalResponse>>, AppError> {
    let response = controller(&state).update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_rental(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    controller(&state).delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Alquiler eliminado exitosamente")))
}

async fn transition_rental(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<ApiResponse<RentalResponse>>, AppError> {
    let response = controller(&state).transition(&user, id, request.status).await?;
    Ok(Json(response))
}

async fn pickup_rental(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RentalResponse>>, AppError> {
    let response = controller(&state).transition(&user, id, RentalStatus::Active).await?;
    Ok(Json(response))
}

async fn return_rental(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RentalResponse>>, AppError> {
    let response = controller(&state).transition(&user, id, RentalStatus::Completed).await?;
    Ok(Json(response))
}

async fn cancel_rental(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RentalResponse>>, AppError> {
    let response = controller(&state).transition(&user, id, RentalStatus::Cancelled).await?;
    Ok(Json(response))
}

async fn extend_rental(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ExtendRentalRequest>,
) -> Result<Json<ApiResponse<RentalResponse>>, AppError> {
    let response = controller(&state).extend(&user, id, request).await?;
    Ok(Json(response))
}
