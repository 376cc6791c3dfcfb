//! Servicio de registros de referencia
//!
//! Alta y baja de motoristas, vehículos y placas. La unicidad se comprueba contra
//! el estado local sincronizado (lectura y luego escritura, sin atomicidad) y la
//! lista solo cambia cuando el almacén empuja el siguiente snapshot.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

use crate::models::{RegistryEntry, RegistryKind};
use crate::store::{DocumentStore, DocumentValue, Fields};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_plate;

/// Preparar el valor a guardar: recortar espacios y, para placas, canonicalizar
/// y exigir 7 caracteres alfanuméricos
pub fn prepare_value(kind: RegistryKind, raw: &str) -> AppResult<String> {
    let value = match kind {
        RegistryKind::Plate => validate_plate(raw)?,
        RegistryKind::Driver | RegistryKind::Vehicle => raw.trim().to_string(),
    };

    if value.is_empty() {
        return Err(AppError::InvalidInput(kind.invalid_notice().to_string()));
    }
    Ok(value)
}

/// Comparación sin distinguir mayúsculas
pub fn contains_value<T: RegistryEntry>(items: &[T], value: &str) -> bool {
    let needle = value.to_lowercase();
    items.iter().any(|item| item.value().to_lowercase() == needle)
}

#[derive(Clone)]
pub struct RegistryService<T: RegistryEntry> {
    store: Arc<dyn DocumentStore>,
    items: watch::Receiver<Arc<Vec<T>>>,
}

impl<T: RegistryEntry> RegistryService<T> {
    pub fn new(store: Arc<dyn DocumentStore>, items: watch::Receiver<Arc<Vec<T>>>) -> Self {
        Self { store, items }
    }

    pub fn kind(&self) -> RegistryKind {
        T::KIND
    }

    /// Lista actual, en orden ascendente de nombre/número
    pub fn list(&self) -> Arc<Vec<T>> {
        self.items.borrow().clone()
    }

    /// Agregar un elemento. Devuelve el elemento creado cuando el almacén confirma la escritura.
    pub async fn add(&self, raw: &str) -> AppResult<T> {
        let kind = T::KIND;
        let value = prepare_value(kind, raw)?;

        if contains_value(&self.list(), &value) {
            return Err(AppError::Conflict(kind.invalid_notice().to_string()));
        }

        let mut fields = Fields::new();
        fields.insert(kind.value_field().to_string(), DocumentValue::from(value.as_str()));

        let id = self.store.create(kind.collection(), fields).await.map_err(|e| {
            error!("Error adding {:?} '{}': {}", kind, value, e);
            AppError::remote_write(kind.add_failed_notice(), e)
        })?;

        info!("✅ {:?} '{}' creado ({})", kind, value, id);
        Ok(T::from_parts(id, value))
    }

    /// Quitar un elemento. Nunca deja el registro vacío.
    pub async fn remove(&self, id: &str) -> AppResult<()> {
        let kind = T::KIND;
        if self.list().len() <= 1 {
            return Err(AppError::Guard(kind.minimum_notice().to_string()));
        }

        self.store.delete(kind.collection(), id).await.map_err(|e| {
            error!("Error removing {:?} {}: {}", kind, id, e);
            AppError::remote_write(kind.remove_failed_notice(), e)
        })?;

        info!("🗑️ {:?} {} eliminado", kind, id);
        Ok(())
    }
}
