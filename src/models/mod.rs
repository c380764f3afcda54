//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL definido en `migrations/`.

pub mod customer;
pub mod location;
pub mod maintenance;
pub mod option;
pub mod rental;
pub mod staff;
pub mod vehicle;

pub use customer::Customer;
pub use location::{Location, RateZone};
pub use maintenance::MaintenanceRecord;
pub use option::AdditionalOption;
pub use rental::{Rental, RentalInterval, RentalOptionLine, RentalStatus};
pub use staff::{Permission, Staff, StaffRole};
pub use vehicle::{Vehicle, VehicleStatus};
