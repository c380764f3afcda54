//! Rutas de la API
//!
//! `create_app_router` monta todos los routers bajo `/api`, con el
//! middleware de autenticación en todo salvo login y health.

pub mod auth_routes;
pub mod customer_routes;
pub mod location_routes;
pub mod option_routes;
pub mod rental_routes;
pub mod vehicle_routes;

use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing::error;

use crate::{
    database::ping,
    middleware::{auth_middleware, cors_layer, rate_limit_middleware},
    state::AppState,
};

pub fn create_app_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/auth", auth_routes::create_me_router())
        .nest("/rentals", rental_routes::create_rental_router())
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/customers", customer_routes::create_customer_router())
        .nest("/locations", location_routes::create_location_router())
        .nest("/rate-zones", location_routes::create_rate_zone_router())
        .nest("/options", option_routes::create_option_router())
        .nest("/staff", auth_routes::create_staff_router())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let api = Router::new()
        .nest("/auth", auth_routes::create_login_router())
        .merge(protected);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config))
                .layer(CompressionLayer::new())
                .layer(from_fn_with_state(state.clone(), rate_limit_middleware)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "up",
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        ),
        Err(e) => {
            error!("❌ Health check: base de datos inaccesible: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "down" })),
            )
        }
    }
}
