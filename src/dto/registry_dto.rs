use serde::Deserialize;
use validator::Validate;

// Request para agregar un motorista, vehículo o placa.
// El valor llega crudo: se recorta (y canonicaliza, para placas) en el servicio.
#[derive(Debug, Deserialize, Validate)]
pub struct AddRegistryEntryRequest {
    #[validate(length(max = 120))]
    pub value: String,
}
