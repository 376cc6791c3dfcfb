//! Modelos de los registros de referencia
//!
//! Motoristas, vehículos y placas: conjuntos pequeños de valores con nombre,
//! únicos sin distinguir mayúsculas, que nunca deben quedar vacíos por acción
//! del usuario.

use serde::{Deserialize, Serialize};

use crate::store::{Collection, OrderBy};

/// Tipo de registro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    Driver,
    Vehicle,
    Plate,
}

impl RegistryKind {
    pub fn collection(self) -> Collection {
        match self {
            RegistryKind::Driver => Collection::Drivers,
            RegistryKind::Vehicle => Collection::Vehicles,
            RegistryKind::Plate => Collection::Plates,
        }
    }

    /// Campo del documento que guarda el valor del registro
    pub fn value_field(self) -> &'static str {
        match self {
            RegistryKind::Driver | RegistryKind::Vehicle => "name",
            RegistryKind::Plate => "number",
        }
    }

    /// Los registros siempre se presentan en orden ascendente de nombre/número
    pub fn order(self) -> OrderBy {
        OrderBy::ascending(self.value_field())
    }

    pub fn invalid_notice(self) -> &'static str {
        match self {
            RegistryKind::Driver => "Motorista já existe ou o nome é inválido.",
            RegistryKind::Vehicle => "Veículo já existe ou o nome é inválido.",
            RegistryKind::Plate => "Placa já existe ou o número é inválido.",
        }
    }

    pub fn add_failed_notice(self) -> &'static str {
        match self {
            RegistryKind::Driver => "Falha ao adicionar motorista.",
            RegistryKind::Vehicle => "Falha ao adicionar veículo.",
            RegistryKind::Plate => "Falha ao adicionar placa.",
        }
    }

    pub fn remove_failed_notice(self) -> &'static str {
        match self {
            RegistryKind::Driver => "Falha ao remover motorista.",
            RegistryKind::Vehicle => "Falha ao remover veículo.",
            RegistryKind::Plate => "Falha ao remover placa.",
        }
    }

    pub fn minimum_notice(self) -> &'static str {
        match self {
            RegistryKind::Driver => "É necessário ter pelo menos um motorista.",
            RegistryKind::Vehicle => "É necessário ter pelo menos um veículo.",
            RegistryKind::Plate => "É necessário ter pelo menos uma placa.",
        }
    }
}

/// Elemento de un registro: id asignado por el almacén y su valor
pub trait RegistryEntry: Clone + Send + Sync + 'static {
    const KIND: RegistryKind;

    fn from_parts(id: String, value: String) -> Self;

    /// Nombre (motorista/vehículo) o número (placa)
    fn value(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plate {
    pub id: String,
    pub number: String,
}

impl RegistryEntry for Driver {
    const KIND: RegistryKind = RegistryKind::Driver;

    fn from_parts(id: String, value: String) -> Self {
        Self { id, name: value }
    }

    fn value(&self) -> &str {
        &self.name
    }
}

impl RegistryEntry for Vehicle {
    const KIND: RegistryKind = RegistryKind::Vehicle;

    fn from_parts(id: String, value: String) -> Self {
        Self { id, name: value }
    }

    fn value(&self) -> &str {
        &self.name
    }
}

impl RegistryEntry for Plate {
    const KIND: RegistryKind = RegistryKind::Plate;

    fn from_parts(id: String, value: String) -> Self {
        Self { id, number: value }
    }

    fn value(&self) -> &str {
        &self.number
    }
}
