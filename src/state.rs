//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    config::environment::EnvironmentConfig,
    middleware::rate_limit::RateLimitState,
    repositories::{rental_store::RentalStore, RentalRepository},
    services::RentalService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub rentals: Arc<dyn RentalStore>,
    pub rate_limit: RateLimitState,
}

impl AppState {
    /// Estado de producción: alquileres persistidos en PostgreSQL
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let rentals = Arc::new(RentalRepository::new(pool.clone()));
        Self::with_rental_store(pool, config, rentals)
    }

    /// Estado con un store de alquileres concreto (p.ej. en memoria)
    pub fn with_rental_store(pool: PgPool, config: EnvironmentConfig, rentals: Arc<dyn RentalStore>) -> Self {
        let rate_limit = RateLimitState::from_config(&config);
        Self {
            pool,
            config,
            rentals,
            rate_limit,
        }
    }

    pub fn rental_service(&self) -> RentalService {
        RentalService::new(self.rentals.clone())
    }
}
