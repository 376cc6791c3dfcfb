use validator::Validate;

use crate::dto::registry_dto::AddRegistryEntryRequest;
use crate::dto::ApiResponse;
use crate::models::{RegistryEntry, RegistryKind};
use crate::services::RegistryService;
use crate::utils::errors::AppResult;

fn added_message(kind: RegistryKind) -> &'static str {
    match kind {
        RegistryKind::Driver => "Motorista adicionado.",
        RegistryKind::Vehicle => "Veículo adicionado.",
        RegistryKind::Plate => "Placa adicionada.",
    }
}

fn removed_message(kind: RegistryKind) -> &'static str {
    match kind {
        RegistryKind::Driver => "Motorista removido.",
        RegistryKind::Vehicle => "Veículo removido.",
        RegistryKind::Plate => "Placa removida.",
    }
}

pub struct RegistryController<'a, T: RegistryEntry> {
    service: &'a RegistryService<T>,
}

impl<'a, T: RegistryEntry> RegistryController<'a, T> {
    pub fn new(service: &'a RegistryService<T>) -> Self {
        Self { service }
    }

    pub fn list(&self) -> Vec<T> {
        self.service.list().as_ref().clone()
    }

    pub async fn add(&self, request: AddRegistryEntryRequest) -> AppResult<ApiResponse<T>> {
        request.validate()?;
        let entry = self.service.add(&request.value).await?;
        Ok(ApiResponse::success_with_message(entry, added_message(self.service.kind())))
    }

    pub async fn remove(&self, id: &str) -> AppResult<ApiResponse<()>> {
        self.service.remove(id).await?;
        Ok(ApiResponse::message(removed_message(self.service.kind())))
    }
}
