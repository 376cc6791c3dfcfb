//! Rutas de la API
//!
//! Cada recurso expone su propio router; `create_app_router` los monta bajo
//! `/api` junto con el health check, la traza HTTP y CORS.

pub mod checklist_model_routes;
pub mod form_routes;
pub mod registry_routes;
pub mod trip_routes;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::models::{Driver, Plate, Vehicle};
use crate::state::AppState;

pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/drivers", registry_routes::create_registry_router::<Driver>())
        .nest("/api/vehicles", registry_routes::create_registry_router::<Vehicle>())
        .nest("/api/plates", registry_routes::create_registry_router::<Plate>())
        .nest("/api/trips", trip_routes::create_trip_router())
        .nest("/api/form", form_routes::create_form_router())
        .nest("/api/checklist-model", checklist_model_routes::create_checklist_model_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check con el tamaño de cada colección sincronizada
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": state.config.environment,
        "collections": {
            "drivers": state.sync.drivers().len(),
            "vehicles": state.sync.vehicles().len(),
            "plates": state.sync.plates().len(),
            "trips": state.sync.trips().len(),
        }
    }))
}
