use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_not_blank;

// Request para crear o renombrar un elemento del modelo de checklist
#[derive(Debug, Deserialize, Validate)]
pub struct ChecklistModelItemRequest {
    #[validate(custom = "validate_not_blank", length(max = 200))]
    pub text: String,
}
