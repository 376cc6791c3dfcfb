use chrono::Utc;
use validator::Validate;

use crate::dto::form_dto::{AddChecklistItemRequest, UpdateChecklistItemRequest, UpdateFormRequest};
use crate::dto::trip_dto::CreatedTripResponse;
use crate::dto::ApiResponse;
use crate::models::ChecklistItem;
use crate::services::TripFormView;
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppError, AppResult};

pub struct FormController {
    state: AppState,
}

impl FormController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn view(&self) -> TripFormView {
        self.state.form.lock().await.view(self.state.config.display_offset)
    }

    /// Aplicar los campos presentes. Si alguno es inválido no se aplica ninguno.
    /// Una selección vacía vuelve al primer elemento del registro, si lo hay.
    pub async fn update(&self, request: UpdateFormRequest) -> AppResult<TripFormView> {
        request.validate()?;
        let lists = self.state.registry_lists();
        let offset = self.state.config.display_offset;

        let mut form = self.state.form.lock().await;
        let mut draft = form.clone();

        if let Some(driver) = &request.driver {
            draft.select_driver(driver, &lists)?;
        }
        if let Some(vehicle) = &request.vehicle {
            draft.select_vehicle(vehicle, &lists)?;
        }
        if let Some(plate) = &request.plate {
            draft.select_plate(plate, &lists)?;
        }
        if let Some(km) = &request.km {
            draft.set_km(km);
        }
        if let Some(origin) = &request.origin {
            draft.set_origin(origin);
        }
        if let Some(destination) = &request.destination {
            draft.set_destination(destination);
        }
        if let Some(departure_time) = &request.departure_time {
            draft.set_departure_time(departure_time, offset)?;
        }

        draft.reconcile(&lists);
        *form = draft;
        Ok(form.view(offset))
    }

    /// El formulario queda libre mientras el almacén responde. La escritura corre
    /// en su propia tarea y siempre cierra el envío, aunque el cliente se desconecte.
    pub async fn submit(&self) -> AppResult<ApiResponse<CreatedTripResponse>> {
        let trip = self.state.form.lock().await.begin_submit()?;

        let state = self.state.clone();
        let id = tokio::spawn(async move {
            let result = state.trips.create_trip(trip).await;
            let lists = state.registry_lists();
            state.form.lock().await.finish_submit(result, &lists, Utc::now())
        })
        .await
        .map_err(|e| AppError::Internal(format!("submit task failed: {}", e)))??;

        Ok(ApiResponse::success_with_message(
            CreatedTripResponse { id },
            "Viagem registrada com sucesso.",
        ))
    }

    pub async fn add_item(&self, request: AddChecklistItemRequest) -> AppResult<ApiResponse<ChecklistItem>> {
        request.validate()?;
        let item = self.state.form.lock().await.add_item(&request.text, Utc::now())?;
        Ok(ApiResponse::success(item))
    }

    pub async fn update_item(&self, id: &str, request: UpdateChecklistItemRequest) -> AppResult<TripFormView> {
        request.validate()?;
        if request.text.is_none() && !request.toggle {
            return Err(validation_error("text", "Informe o novo texto ou marque o item."));
        }

        let mut form = self.state.form.lock().await;
        if let Some(text) = &request.text {
            form.edit_item(id, text)?;
        }
        if request.toggle {
            form.toggle_item(id)?;
        }
        Ok(form.view(self.state.config.display_offset))
    }

    pub async fn remove_item(&self, id: &str) -> AppResult<TripFormView> {
        let mut form = self.state.form.lock().await;
        form.remove_item(id)?;
        Ok(form.view(self.state.config.display_offset))
    }

    pub async fn check_all(&self) -> TripFormView {
        let mut form = self.state.form.lock().await;
        form.mark_all();
        form.view(self.state.config.display_offset)
    }
}
