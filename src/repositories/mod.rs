//! Repositorios
//!
//! Acceso a PostgreSQL con queries parametrizadas de `sqlx`. Los alquileres
//! pasan por el trait `RentalStore`, con una implementación en memoria.

pub mod customer_repository;
pub mod location_repository;
pub mod maintenance_repository;
pub mod memory_rental_store;
pub mod option_repository;
pub mod rental_repository;
pub mod rental_store;
pub mod staff_repository;
pub mod vehicle_repository;

pub use memory_rental_store::InMemoryRentalStore;
pub use rental_repository::RentalRepository;
pub use rental_store::{RentalFilters, RentalStore};
