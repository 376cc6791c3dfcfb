use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;

use crate::controllers::registry_controller::RegistryController;
use crate::dto::registry_dto::AddRegistryEntryRequest;
use crate::dto::ApiResponse;
use crate::models::RegistryEntry;
use crate::state::{AppState, HasRegistry};
use crate::utils::errors::AppError;

/// Rutas de un registro (motoristas, vehículos o placas)
pub fn create_registry_router<T>() -> Router<AppState>
where
    T: RegistryEntry + Serialize,
    AppState: HasRegistry<T>,
{
    Router::new()
        .route("/", get(list_entries::<T>).post(add_entry::<T>))
        .route("/:id", delete(remove_entry::<T>))
}

async fn list_entries<T>(State(state): State<AppState>) -> Json<Vec<T>>
where
    T: RegistryEntry + Serialize,
    AppState: HasRegistry<T>,
{
    let controller = RegistryController::new(<AppState as HasRegistry<T>>::registry(&state));
    Json(controller.list())
}

async fn add_entry<T>(
    State(state): State<AppState>,
    Json(request): Json<AddRegistryEntryRequest>,
) -> Result<Json<ApiResponse<T>>, AppError>
where
    T: RegistryEntry + Serialize,
    AppState: HasRegistry<T>,
{
    let controller = RegistryController::new(<AppState as HasRegistry<T>>::registry(&state));
    let response = controller.add(request).await?;
    Ok(Json(response))
}

async fn remove_entry<T>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError>
where
    T: RegistryEntry + Serialize,
    AppState: HasRegistry<T>,
{
    let controller = RegistryController::new(<AppState as HasRegistry<T>>::registry(&state));
    let response = controller.remove(&id).await?;
    Ok(Json(response))
}
