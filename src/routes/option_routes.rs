use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::option_controller::OptionController;
use crate::dto::api_response::ApiResponse;
use crate::dto::option_dto::{CreateOptionRequest, UpdateOptionRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::option::AdditionalOption;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[derive(Debug, Deserialize)]
struct OptionListQuery {
    #[serde(default)]
    include_inactive: bool,
}

pub fn create_option_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_options).post(create_option))
        .route("/:id", get(get_option).put(update_option).delete(delete_option))
}

async fn create_option(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateOptionRequest>,
) -> Result<Json<ApiResponse<AdditionalOption>>, AppError> {
    let controller = OptionController::new(state.pool.clone());
    Ok(Json(controller.create(&user, request).await?))
}

async fn list_options(
    State(state): State<AppState>,
    Query(query): Query<OptionListQuery>,
) -> Result<Json<Vec<AdditionalOption>>, AppError> {
    let controller = OptionController::new(state.pool.clone());
    Ok(Json(controller.list(query.include_inactive).await?))
}

async fn get_option(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdditionalOption>, AppError> {
    let controller = OptionController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_option(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOptionRequest>,
) -> Result<Json<ApiResponse<AdditionalOption>>, AppError> {
    let controller = OptionController::new(state.pool.clone());
    Ok(Json(controller.update(&user, id, request).await?))
}

async fn delete_option(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = OptionController::new(state.pool.clone());
    controller.delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Opción eliminada exitosamente")))
}
