//! Filtro del historial de viajes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Trip;

/// Criterios del filtro. Los campos vacíos no restringen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripFilter {
    pub driver: Option<String>,
    pub vehicle: Option<String>,
    pub plate: Option<String>,
    /// Límite inferior inclusivo de la hora de salida
    pub from: Option<DateTime<Utc>>,
    /// Límite superior inclusivo de la hora de salida
    pub to: Option<DateTime<Utc>>,
    /// Búsqueda en origen o destino, sin distinguir mayúsculas
    pub search: Option<String>,
}

fn constraint(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl TripFilter {
    pub fn is_empty(&self) -> bool {
        constraint(&self.driver).is_none()
            && constraint(&self.vehicle).is_none()
            && constraint(&self.plate).is_none()
            && self.from.is_none()
            && self.to.is_none()
            && constraint(&self.search).is_none()
    }

    pub fn matches(&self, trip: &Trip) -> bool {
        if let Some(driver) = constraint(&self.driver) {
            if trip.driver != driver {
                return false;
            }
        }
        if let Some(vehicle) = constraint(&self.vehicle) {
            if trip.vehicle != vehicle {
                return false;
            }
        }
        if let Some(plate) = constraint(&self.plate) {
            if trip.plate != plate {
                return false;
            }
        }
        if self.from.is_some_and(|from| trip.departure_time < from) {
            return false;
        }
        if self.to.is_some_and(|to| trip.departure_time > to) {
            return false;
        }
        if let Some(search) = constraint(&self.search) {
            let needle = search.to_lowercase();
            let hit = trip.origin.to_lowercase().contains(&needle)
                || trip.destination.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }

    /// Aplicar el filtro conservando el orden (más reciente primero)
    pub fn apply(&self, trips: &[Trip]) -> Vec<Trip> {
        trips.iter().filter(|trip| self.matches(trip)).cloned().collect()
    }
}
