//! Back-office de alquiler de vehículos
//!
//! API REST para la flota, los clientes, las sedes y el ciclo de vida de
//! los alquileres, con comprobación de disponibilidad por vehículo.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
