//! Modelo de Staff
//!
//! Personal del back-office, sus roles y los permisos que concede cada rol.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

/// Roles del sistema - mapea al ENUM staff_role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "staff_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Admin,
    Manager,
    Agent,
}

/// Capacidades que se comprueban antes de cada operación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Clientes y alquileres del día a día
    ManageBookings,
    /// Vehículos, sedes, zonas, opciones y mantenimiento
    ManageFleet,
    /// Borrado definitivo de alquileres cerrados
    DeleteRentals,
    ManageStaff,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Admin => "ADMIN",
            StaffRole::Manager => "MANAGER",
            StaffRole::Agent => "AGENT",
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::ManageBookings => true,
            Permission::ManageFleet | Permission::DeleteRentals => {
                matches!(self, StaffRole::Admin | StaffRole::Manager)
            }
            Permission::ManageStaff => matches!(self, StaffRole::Admin),
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staff - mapea exactamente a la tabla staff
#[derive(Debug, Clone, FromRow)]
pub struct Staff {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: StaffRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_permissions() {
        assert!(StaffRole::Agent.allows(Permission::ManageBookings));
        assert!(!StaffRole::Agent.allows(Permission::ManageFleet));
        assert!(!StaffRole::Agent.allows(Permission::DeleteRentals));
        assert!(!StaffRole::Agent.allows(Permission::ManageStaff));
    }

    #[test]
    fn test_manager_permissions() {
        assert!(StaffRole::Manager.allows(Permission::ManageFleet));
        assert!(StaffRole::Manager.allows(Permission::DeleteRentals));
        assert!(!StaffRole::Manager.allows(Permission::ManageStaff));
    }

    #[test]
    fn test_admin_has_every_permission() {
        for permission in [
            Permission::ManageBookings,
            Permission::ManageFleet,
            Permission::DeleteRentals,
            Permission::ManageStaff,
        ] {
            assert!(StaffRole::Admin.allows(permission));
        }
    }
}
