use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};

use crate::controllers::checklist_model_controller::ChecklistModelController;
use crate::dto::checklist_model_dto::ChecklistModelItemRequest;
use crate::dto::ApiResponse;
use crate::models::ChecklistModelItem;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_checklist_model_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(add_item))
        .route("/:id", put(update_item).delete(remove_item))
}

async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<ChecklistModelItem>>, AppError> {
    let controller = ChecklistModelController::new(&state.checklist_model);
    Ok(Json(controller.list().await?))
}

async fn add_item(
    State(state): State<AppState>,
    Json(request): Json<ChecklistModelItemRequest>,
) -> Result<Json<ApiResponse<ChecklistModelItem>>, AppError> {
    let controller = ChecklistModelController::new(&state.checklist_model);
    Ok(Json(controller.add(request).await?))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ChecklistModelItemRequest>,
) -> Result<Json<ApiResponse<ChecklistModelItem>>, AppError> {
    let controller = ChecklistModelController::new(&state.checklist_model);
    Ok(Json(controller.update(&id, request).await?))
}

async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ChecklistModelController::new(&state.checklist_model);
    Ok(Json(controller.remove(&id).await?))
}
