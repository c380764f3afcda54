//! Services module
//!
//! Lógica de negocio: disponibilidad, ciclo de vida y precio de los
//! alquileres, más autenticación del personal.

pub mod auth_service;
pub mod availability;
pub mod pricing;
pub mod rental_lifecycle;
pub mod rental_service;

pub use auth_service::AuthService;
pub use rental_service::RentalService;
