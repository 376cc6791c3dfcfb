//! Sistema de manejo de errores
//!
//! Este módulo define los errores de la aplicación y su conversión a respuestas
//! HTTP. Cada error queda acotado a la acción del usuario que lo provocó; ninguno
//! es fatal para el proceso.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Entrada rechazada localmente antes de cualquier escritura remota
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    /// Violación de una guarda (p. ej. quitar el último elemento de un registro)
    #[error("{0}")]
    Guard(String),

    /// Fallo de una escritura remota, con el aviso genérico para el usuario
    #[error("{notice}")]
    RemoteWrite {
        notice: String,
        #[source]
        source: StoreError,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn remote_write(notice: &str, source: StoreError) -> Self {
        AppError::RemoteWrite {
            notice: notice.to_string(),
            source,
        }
    }

    /// Texto que se muestra al usuario
    pub fn notice(&self) -> String {
        match self {
            AppError::Validation(_) => "Os dados informados são inválidos.".to_string(),
            AppError::Store(_) | AppError::Internal(_) | AppError::Configuration(_) => {
                "Ocorreu um erro inesperado.".to_string()
            }
            other => other.to_string(),
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error", "VALIDATION_ERROR"),
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid Input", "INVALID_INPUT"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "Conflict", "CONFLICT"),
            AppError::Guard(_) => (StatusCode::CONFLICT, "Guard Violation", "GUARD_VIOLATION"),
            AppError::RemoteWrite { .. } => (StatusCode::BAD_GATEWAY, "Remote Write Failed", "REMOTE_WRITE_FAILED"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found", "NOT_FOUND"),
            AppError::Store(_) => (StatusCode::SERVICE_UNAVAILABLE, "Store Error", "STORE_ERROR"),
            AppError::Configuration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration Error", "CONFIGURATION_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", "INTERNAL_ERROR"),
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, code) = self.status_and_code();

        let details = match &self {
            AppError::Validation(e) => Some(json!(e)),
            AppError::RemoteWrite { source, .. } => Some(json!({ "store_error": source.to_string() })),
            _ => None,
        };

        if status.is_server_error() {
            tracing::error!("{}: {}", code, self);
        } else {
            tracing::debug!("{}: {}", code, self);
        }

        let body = ErrorResponse {
            error: error.to_string(),
            message: self.notice(),
            details,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación de un campo
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.add_param("message".into(), &message);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_write_notice_hides_store_details() {
        let error = AppError::remote_write(
            "Falha ao adicionar viagem.",
            StoreError::Unavailable("connection reset".to_string()),
        );
        assert_eq!(error.notice(), "Falha ao adicionar viagem.");
        assert_eq!(error.status_and_code().0, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_guard_maps_to_conflict_status() {
        let error = AppError::Guard("É necessário ter pelo menos um motorista.".to_string());
        assert_eq!(error.status_and_code().0, StatusCode::CONFLICT);
        assert_eq!(error.notice(), "É necessário ter pelo menos um motorista.");
    }

    #[test]
    fn test_validation_error_helper() {
        let error = validation_error("text", "must not be blank");
        assert!(matches!(error, AppError::Validation(_)));
        assert_eq!(error.status_and_code().0, StatusCode::BAD_REQUEST);
    }
}
