//! Modelo del checklist de viaje

use serde::{Deserialize, Serialize};

use crate::store::{DocumentValue, Fields};

/// Plantilla por defecto al iniciar la aplicación
pub const DEFAULT_CHECKLIST: [(&str, &str); 7] = [
    ("1", "Verificar combustível"),
    ("2", "Verificar pneus"),
    ("3", "Verificar óleo"),
    ("4", "Documentos do veículo"),
    ("5", "CNH do motorista"),
    ("6", "Rota planejada"),
    ("7", "Meios de comunicação"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub checked: bool,
}

impl ChecklistItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            checked: false,
        }
    }

    pub fn to_document_value(&self) -> DocumentValue {
        let mut fields = Fields::new();
        fields.insert("id".to_string(), DocumentValue::from(self.id.as_str()));
        fields.insert("text".to_string(), DocumentValue::from(self.text.as_str()));
        fields.insert("checked".to_string(), DocumentValue::from(self.checked));
        DocumentValue::Map(fields)
    }
}

/// Elemento persistido del modelo de checklist (colección `checklistModel`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistModelItem {
    pub id: String,
    pub text: String,
}

pub fn default_checklist() -> Vec<ChecklistItem> {
    DEFAULT_CHECKLIST
        .iter()
        .map(|(id, text)| ChecklistItem::new(*id, *text))
        .collect()
}
