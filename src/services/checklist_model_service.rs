//! Modelo de checklist persistido
//!
//! Plantilla del checklist guardada en la colección `checklistModel`. No se
//! sincroniza en vivo: se lee bajo demanda y al arrancar para sembrar el formulario.

use std::sync::Arc;
use tracing::{error, info};

use super::normalization::normalize_checklist_model_item;
use crate::models::{ChecklistItem, ChecklistModelItem};
use crate::store::{Collection, DocumentStore, DocumentValue, Fields, StoreError};
use crate::utils::errors::{AppError, AppResult};

pub const BLANK_TEXT_NOTICE: &str = "O texto do item não pode estar vazio.";
const ADD_FAILED_NOTICE: &str = "Falha ao adicionar item ao modelo de checklist.";
const REMOVE_FAILED_NOTICE: &str = "Falha ao remover item do modelo de checklist.";
const UPDATE_FAILED_NOTICE: &str = "Falha ao atualizar item do modelo de checklist.";

fn prepare_text(raw: &str) -> AppResult<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(AppError::InvalidInput(BLANK_TEXT_NOTICE.to_string()));
    }
    Ok(text.to_string())
}

fn text_fields(text: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert("text".to_string(), DocumentValue::from(text));
    fields
}

#[derive(Clone)]
pub struct ChecklistModelService {
    store: Arc<dyn DocumentStore>,
}

impl ChecklistModelService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn fetch(&self) -> AppResult<Vec<ChecklistModelItem>> {
        let documents = self.store.fetch(Collection::ChecklistModel).await.map_err(|e| {
            error!("Error fetching checklist model: {}", e);
            AppError::from(e)
        })?;
        Ok(documents.iter().map(normalize_checklist_model_item).collect())
    }

    /// Plantilla para el formulario, todos los elementos sin marcar.
    /// `None` si el modelo está vacío.
    pub async fn template(&self) -> AppResult<Option<Vec<ChecklistItem>>> {
        let items = self.fetch().await?;
        if items.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            items
                .into_iter()
                .map(|item| ChecklistItem::new(item.id, item.text))
                .collect(),
        ))
    }

    pub async fn add(&self, raw: &str) -> AppResult<ChecklistModelItem> {
        let text = prepare_text(raw)?;
        let id = self
            .store
            .create(Collection::ChecklistModel, text_fields(&text))
            .await
            .map_err(|e| {
                error!("Error adding checklist model item: {}", e);
                AppError::remote_write(ADD_FAILED_NOTICE, e)
            })?;

        info!("✅ Item '{}' agregado al modelo de checklist", text);
        Ok(ChecklistModelItem { id, text })
    }

    pub async fn remove(&self, id: &str) -> AppResult<()> {
        self.store
            .delete(Collection::ChecklistModel, id)
            .await
            .map_err(|e| {
                error!("Error removing checklist model item {}: {}", id, e);
                AppError::remote_write(REMOVE_FAILED_NOTICE, e)
            })
    }

    pub async fn update(&self, id: &str, raw: &str) -> AppResult<ChecklistModelItem> {
        let text = prepare_text(raw)?;
        self.store
            .update(Collection::ChecklistModel, id, text_fields(&text))
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => {
                    AppError::NotFound(format!("Checklist model item with id '{}' not found", id))
                }
                other => {
                    error!("Error updating checklist model item {}: {}", id, other);
                    AppError::remote_write(UPDATE_FAILED_NOTICE, other)
                }
            })?;

        Ok(ChecklistModelItem { id: id.to_string(), text })
    }
}
