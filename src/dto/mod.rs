//! DTOs de la API
//!
//! Requests validadas con `validator` y responses serializadas con `serde`.

pub mod api_response;
pub mod auth_dto;
pub mod customer_dto;
pub mod location_dto;
pub mod maintenance_dto;
pub mod option_dto;
pub mod rental_dto;
pub mod staff_dto;
pub mod vehicle_dto;

pub use api_response::{ApiResponse, Pagination};
