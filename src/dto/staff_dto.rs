use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::staff::{Staff, StaffRole};

// Request para dar de alta a un miembro del personal
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStaffRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 150))]
    pub full_name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub role: StaffRole,
}

// Request para actualizar un miembro del personal
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStaffRequest {
    #[validate(length(min = 1, max = 150))]
    pub full_name: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
    pub role: Option<StaffRole>,
    pub active: Option<bool>,
}

// Response de personal (sin hash de contraseña)
#[derive(Debug, Clone, Serialize)]
pub struct StaffResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: StaffRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Staff> for StaffResponse {
    fn from(staff: Staff) -> Self {
        Self {
            id: staff.id,
            email: staff.email,
            full_name: staff.full_name,
            role: staff.role,
            active: staff.active,
            created_at: staff.created_at,
        }
    }
}
