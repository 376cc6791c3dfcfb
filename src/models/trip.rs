//! Modelo de Trip
//!
//! Un viaje guarda los nombres de motorista, vehículo y placa por valor, no por id:
//! los viajes son instantáneas históricas, no claves foráneas vivas. Borrar un
//! motorista del registro no altera los viajes que ya lo registraron.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::checklist::ChecklistItem;
use crate::store::{DocumentValue, Fields};

/// Viaje normalizado, listo para el estado local
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub driver: String,
    pub vehicle: String,
    pub plate: String,
    pub km: u64,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
}

/// Viaje a crear, tal como sale del formulario validado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub driver: String,
    pub vehicle: String,
    pub plate: String,
    pub km: u64,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
}

impl NewTrip {
    /// Campos del documento remoto. La hora de salida viaja como timestamp nativo.
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("driver".to_string(), DocumentValue::from(self.driver.as_str()));
        fields.insert("vehicle".to_string(), DocumentValue::from(self.vehicle.as_str()));
        fields.insert("plate".to_string(), DocumentValue::from(self.plate.as_str()));
        fields.insert("km".to_string(), DocumentValue::from(self.km));
        fields.insert("origin".to_string(), DocumentValue::from(self.origin.as_str()));
        fields.insert("destination".to_string(), DocumentValue::from(self.destination.as_str()));
        fields.insert("departureTime".to_string(), DocumentValue::Timestamp(self.departure_time));
        fields.insert(
            "checklist".to_string(),
            DocumentValue::Array(self.checklist.iter().map(|item| item.to_document_value()).collect()),
        );
        fields
    }
}
