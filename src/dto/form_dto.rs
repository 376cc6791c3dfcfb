use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_not_blank;

// Actualización parcial del formulario. Solo se aplican los campos presentes.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormRequest {
    pub driver: Option<String>,
    pub vehicle: Option<String>,
    pub plate: Option<String>,
    pub km: Option<String>,
    #[validate(length(max = 200))]
    pub origin: Option<String>,
    #[validate(length(max = 200))]
    pub destination: Option<String>,
    /// RFC 3339 o `YYYY-MM-DDTHH:MM` local
    pub departure_time: Option<String>,
}

// Request para agregar un elemento al checklist del formulario
#[derive(Debug, Deserialize, Validate)]
pub struct AddChecklistItemRequest {
    #[validate(custom = "validate_not_blank", length(max = 200))]
    pub text: String,
}

// Request para editar un elemento del checklist del formulario
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateChecklistItemRequest {
    #[validate(length(max = 200))]
    pub text: Option<String>,
    #[serde(default)]
    pub toggle: bool,
}
