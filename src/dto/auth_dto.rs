use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::staff_dto::StaffResponse;

// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub staff: StaffResponse,
}

impl LoginResponse {
    pub fn bearer(token: String, expires_in: u64, staff: StaffResponse) -> Self {
        Self {
            token,
            token_type: "Bearer",
            expires_in,
            staff,
        }
    }
}
