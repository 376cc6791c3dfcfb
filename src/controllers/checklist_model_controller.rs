use validator::Validate;

use crate::dto::checklist_model_dto::ChecklistModelItemRequest;
use crate::dto::ApiResponse;
use crate::models::ChecklistModelItem;
use crate::services::ChecklistModelService;
use crate::utils::errors::AppResult;

pub struct ChecklistModelController<'a> {
    service: &'a ChecklistModelService,
}

impl<'a> ChecklistModelController<'a> {
    pub fn new(service: &'a ChecklistModelService) -> Self {
        Self { service }
    }

    pub async fn list(&self) -> AppResult<Vec<ChecklistModelItem>> {
        self.service.fetch().await
    }

    pub async fn add(&self, request: ChecklistModelItemRequest) -> AppResult<ApiResponse<ChecklistModelItem>> {
        request.validate()?;
        let item = self.service.add(&request.text).await?;
        Ok(ApiResponse::success_with_message(item, "Item adicionado ao modelo."))
    }

    pub async fn update(
        &self,
        id: &str,
        request: ChecklistModelItemRequest,
    ) -> AppResult<ApiResponse<ChecklistModelItem>> {
        request.validate()?;
        let item = self.service.update(id, &request.text).await?;
        Ok(ApiResponse::success_with_message(item, "Item atualizado."))
    }

    pub async fn remove(&self, id: &str) -> AppResult<ApiResponse<()>> {
        self.service.remove(id).await?;
        Ok(ApiResponse::message("Item removido do modelo."))
    }
}
