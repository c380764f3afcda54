use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::location_controller::LocationController;
use crate::dto::api_response::ApiResponse;
use crate::dto::location_dto::{
    CreateLocationRequest, CreateRateZoneRequest, UpdateLocationRequest, UpdateRateZoneRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::location::{Location, RateZone};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_location_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route("/:id", get(get_location).put(update_location).delete(delete_location))
}

pub fn create_rate_zone_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_zones).post(create_zone))
        .route("/:id", get(get_zone).put(update_zone).delete(delete_zone))
}

async fn create_location(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<Json<ApiResponse<Location>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    Ok(Json(controller.create_location(&user, request).await?))
}

async fn list_locations(State(state): State<AppState>) -> Result<Json<Vec<Location>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    Ok(Json(controller.list_locations().await?))
}

async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Location>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    Ok(Json(controller.get_location(id).await?))
}

async fn update_location(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<ApiResponse<Location>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    Ok(Json(controller.update_location(&user, id, request).await?))
}

async fn delete_location(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    controller.delete_location(&user, id).await?;
    Ok(Json(ApiResponse::message("Sede eliminada exitosamente")))
}

async fn create_zone(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateRateZoneRequest>,
) -> Result<Json<ApiResponse<RateZone>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    Ok(Json(controller.create_zone(&user, request).await?))
}

async fn list_zones(State(state): State<AppState>) -> Result<Json<Vec<RateZone>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    Ok(Json(controller.list_zones().await?))
}

async fn get_zone(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RateZone>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    Ok(Json(controller.get_zone(id).await?))
}

async fn update_zone(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRateZoneRequest>,
) -> Result<Json<ApiResponse<RateZone>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    Ok(Json(controller.update_zone(&user, id, request).await?))
}

async fn delete_zone(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = LocationController::new(state.pool.clone());
    controller.delete_zone(&user, id).await?;
    Ok(Json(ApiResponse::message("Zona tarifaria eliminada exitosamente")))
}
