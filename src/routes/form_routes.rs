use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};

use crate::controllers::form_controller::FormController;
use crate::dto::form_dto::{AddChecklistItemRequest, UpdateChecklistItemRequest, UpdateFormRequest};
use crate::dto::trip_dto::CreatedTripResponse;
use crate::dto::ApiResponse;
use crate::models::ChecklistItem;
use crate::services::TripFormView;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_form_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_form).patch(update_form))
        .route("/submit", post(submit_form))
        .route("/checklist", post(add_checklist_item))
        .route("/checklist/check-all", post(check_all_items))
        .route("/checklist/:id", patch(update_checklist_item).delete(remove_checklist_item))
}

async fn get_form(State(state): State<AppState>) -> Json<TripFormView> {
    Json(FormController::new(state).view().await)
}

async fn update_form(
    State(state): State<AppState>,
    Json(request): Json<UpdateFormRequest>,
) -> Result<Json<TripFormView>, AppError> {
    let response = FormController::new(state).update(request).await?;
    Ok(Json(response))
}

async fn submit_form(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CreatedTripResponse>>, AppError> {
    let response = FormController::new(state).submit().await?;
    Ok(Json(response))
}

async fn add_checklist_item(
    State(state): State<AppState>,
    Json(request): Json<AddChecklistItemRequest>,
) -> Result<Json<ApiResponse<ChecklistItem>>, AppError> {
    let response = FormController::new(state).add_item(request).await?;
    Ok(Json(response))
}

async fn update_checklist_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateChecklistItemRequest>,
) -> Result<Json<TripFormView>, AppError> {
    let response = FormController::new(state).update_item(&id, request).await?;
    Ok(Json(response))
}

async fn remove_checklist_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TripFormView>, AppError> {
    let response = FormController::new(state).remove_item(&id).await?;
    Ok(Json(response))
}

async fn check_all_items(State(state): State<AppState>) -> Json<TripFormView> {
    Json(FormController::new(state).check_all().await)
}
