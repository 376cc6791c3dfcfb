use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::trip_controller::TripController;
use crate::dto::trip_dto::{DeleteTripQuery, TripListQuery};
use crate::dto::ApiResponse;
use crate::models::Trip;
use crate::services::TripExport;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips))
        .route("/:id", get(get_trip).delete(delete_trip))
        .route("/:id/export", get(export_trip))
}

async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<TripListQuery>,
) -> Result<Json<Vec<Trip>>, AppError> {
    let controller = TripController::new(&state);
    Ok(Json(controller.list(query)?))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Trip>, AppError> {
    let controller = TripController::new(&state);
    Ok(Json(controller.get(&id)?))
}

async fn export_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TripExport>, AppError> {
    let controller = TripController::new(&state);
    Ok(Json(controller.export(&id)?))
}

async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteTripQuery>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = TripController::new(&state);
    let response = controller.delete(&id, query).await?;
    Ok(Json(response))
}
