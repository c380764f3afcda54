//! Middleware de autenticación JWT
//!
//! Este módulo maneja la extracción del bearer token y la identidad del
//! miembro del personal que se pasa explícitamente a los servicios.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    models::staff::{Permission, StaffRole},
    state::AppState,
    utils::{
        errors::{forbidden_error, AppError, AppResult},
        jwt::{extract_token_from_header, verify_token, JwtClaims, JwtConfig},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub staff_id: Uuid,
    pub email: String,
    pub role: StaffRole,
}

impl AuthenticatedUser {
    /// Comprobar que el rol concede el permiso pedido
    pub fn require(&self, permission: Permission) -> AppResult<()> {
        if self.role.allows(permission) {
            Ok(())
        } else {
            Err(forbidden_error(
                &format!("{:?}", permission),
                &format!("role {} lacks this permission", self.role),
            ))
        }
    }
}

impl TryFrom<JwtClaims> for AuthenticatedUser {
    type Error = AppError;

    fn try_from(claims: JwtClaims) -> Result<Self, Self::Error> {
        let staff_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("ID de personal inválido".to_string()))?;
        Ok(Self {
            staff_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Middleware de autenticación JWT.
///
/// Sin estado en servidor: una cuenta desactivada conserva acceso hasta que
/// caduque su token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &JwtConfig::from(&state.config))?;
    let user = AuthenticatedUser::try_from(claims)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
