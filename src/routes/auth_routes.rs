use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::dto::api_response::ApiResponse;
use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::dto::staff_dto::{CreateStaffRequest, StaffResponse, UpdateStaffRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::services::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas públicas
pub fn create_login_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Rutas protegidas de `/auth`
pub fn create_me_router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

pub fn create_staff_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_staff).post(create_staff))
        .route("/:id", get(get_staff).put(update_staff).delete(deactivate_staff))
}

fn service(state: &AppState) -> AuthService {
    AuthService::new(state.pool.clone(), &state.config)
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(service(&state).login(request).await?))
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<StaffResponse>, AppError> {
    Ok(Json(service(&state).me(&user).await?))
}

async fn list_staff(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<StaffResponse>>, AppError> {
    Ok(Json(service(&state).list_staff(&user).await?))
}

async fn get_staff(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<StaffResponse>, AppError> {
    Ok(Json(service(&state).get_staff(&user, id).await?))
}

async fn create_staff(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateStaffRequest>,
) -> Result<Json<ApiResponse<StaffResponse>>, AppError> {
    let staff = service(&state).create_staff(&user, request).await?;
    Ok(Json(ApiResponse::success_with_message(staff, "Personal creado exitosamente")))
}

async fn update_staff(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStaffRequest>,
) -> Result<Json<ApiResponse<StaffResponse>>, AppError> {
    let staff = service(&state).update_staff(&user, id, request).await?;
    Ok(Json(ApiResponse::success(staff)))
}

async fn deactivate_staff(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StaffResponse>>, AppError> {
    let staff = service(&state).deactivate_staff(&user, id).await?;
    Ok(Json(ApiResponse::success_with_message(staff, "Personal desactivado")))
}
