//! Servicio de autenticación y gestión del personal
//!
//! Login con bcrypt + JWT, alta del primer administrador y CRUD de staff.

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::EnvironmentConfig,
    dto::{
        auth_dto::{LoginRequest, LoginResponse},
        staff_dto::{CreateStaffRequest, StaffResponse, UpdateStaffRequest},
    },
    middleware::auth::AuthenticatedUser,
    models::staff::{Permission, Staff, StaffRole},
    repositories::staff_repository::{StaffChanges, StaffRepository},
    utils::{
        errors::{not_found_error, AppError, AppResult},
        jwt::{generate_token, JwtConfig},
        validation::normalize_email,
    },
};

pub struct AuthService {
    repository: StaffRepository,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            repository: StaffRepository::new(pool),
            jwt: JwtConfig::from(config),
        }
    }

    /// Autenticar a un miembro del personal y emitir su token
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;
        let email = normalize_email(&request.email);

        let staff = match self.repository.find_by_email(&email).await? {
            Some(staff) if staff.active => staff,
            _ => {
                warn!("🔒 Login rechazado para {}", email);
                return Err(invalid_credentials());
            }
        };

        if !verify(&request.password, &staff.password_hash).map_err(|e| AppError::Hash(e.to_string()))? {
            warn!("🔒 Contraseña incorrecta para {}", email);
            return Err(invalid_credentials());
        }

        let token = generate_token(staff.id, &staff.email, staff.role, &self.jwt)?;
        info!("✅ Login de {} ({})", staff.email, staff.role);
        Ok(LoginResponse::bearer(token, self.jwt.expiration, staff.into()))
    }

    /// Perfil del usuario del token
    pub async fn me(&self, user: &AuthenticatedUser) -> AppResult<StaffResponse> {
        self.repository
            .find_by_id(user.staff_id)
            .await?
            .map(StaffResponse::from)
            .ok_or_else(|| not_found_error("Staff", &user.staff_id.to_string()))
    }

    /// Crear el primer ADMIN si la tabla de personal está vacía
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> AppResult<Option<Staff>> {
        if self.repository.count().await? > 0 {
            return Ok(None);
        }

        let password_hash = hash_password(password)?;
        let admin = self
            .repository
            .create(&normalize_email(email), "Administrator", &password_hash, StaffRole::Admin)
            .await?;
        info!("👤 Administrador inicial creado: {}", admin.email);
        Ok(Some(admin))
    }

    pub async fn list_staff(&self, actor: &AuthenticatedUser) -> AppResult<Vec<StaffResponse>> {
        actor.require(Permission::ManageStaff)?;
        let staff = self.repository.list().await?;
        Ok(staff.into_iter().map(StaffResponse::from).collect())
    }

    pub async fn get_staff(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<StaffResponse> {
        actor.require(Permission::ManageStaff)?;
        self.repository
            .find_by_id(id)
            .await?
            .map(StaffResponse::from)
            .ok_or_else(|| not_found_error("Staff", &id.to_string()))
    }

    pub async fn create_staff(
        &self,
        actor: &AuthenticatedUser,
        request: CreateStaffRequest,
    ) -> AppResult<StaffResponse> {
        actor.require(Permission::ManageStaff)?;
        request.validate()?;

        let password_hash = hash_password(&request.password)?;
        let staff = self
            .repository
            .create(
                &normalize_email(&request.email),
                request.full_name.trim(),
                &password_hash,
                request.role,
            )
            .await?;
        info!("👤 {} dio de alta a {} ({})", actor.email, staff.email, staff.role);
        Ok(staff.into())
    }

    pub async fn update_staff(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: UpdateStaffRequest,
    ) -> AppResult<StaffResponse> {
        actor.require(Permission::ManageStaff)?;
        request.validate()?;
        if id == actor.staff_id && (request.active == Some(false) || request.role.is_some()) {
            return Err(AppError::BadRequest(
                "You cannot change your own role or deactivate yourself".to_string(),
            ));
        }

        let changes = StaffChanges {
            full_name: request.full_name,
            password_hash: request.password.as_deref().map(hash_password).transpose()?,
            role: request.role,
            active: request.active,
        };
        self.repository
            .update(id, changes)
            .await?
            .map(StaffResponse::from)
            .ok_or_else(|| not_found_error("Staff", &id.to_string()))
    }

    /// Baja lógica: el personal nunca se borra porque firma los alquileres
    pub async fn deactivate_staff(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<StaffResponse> {
        self.update_staff(
            actor,
            id,
            UpdateStaffRequest {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".to_string())
}

pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))
}
