//! Controllers
//!
//! Permisos, validación de DTOs y conversión a responses sobre los
//! repositorios y servicios.

pub mod customer_controller;
pub mod location_controller;
pub mod option_controller;
pub mod rental_controller;
pub mod vehicle_controller;
