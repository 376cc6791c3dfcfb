use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::services::TripFilter;
use crate::utils::errors::AppResult;
use crate::utils::validation::parse_departure_time;

// Query del listado de viajes. Los límites de fecha aceptan RFC 3339 o
// `YYYY-MM-DDTHH:MM` en el desfase local.
#[derive(Debug, Default, Deserialize)]
pub struct TripListQuery {
    pub driver: Option<String>,
    pub vehicle: Option<String>,
    pub plate: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub search: Option<String>,
}

fn parse_bound(raw: Option<&str>, offset: FixedOffset) -> AppResult<Option<chrono::DateTime<chrono::Utc>>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(Some(parse_departure_time(value, offset)?)),
        None => Ok(None),
    }
}

impl TripListQuery {
    pub fn into_filter(self, offset: FixedOffset) -> AppResult<TripFilter> {
        Ok(TripFilter {
            from: parse_bound(self.from.as_deref(), offset)?,
            to: parse_bound(self.to.as_deref(), offset)?,
            driver: self.driver,
            vehicle: self.vehicle,
            plate: self.plate,
            search: self.search,
        })
    }
}

// Query del borrado de un viaje
#[derive(Debug, Default, Deserialize)]
pub struct DeleteTripQuery {
    #[serde(default)]
    pub confirm: bool,
}

// Response de creación de un viaje
#[derive(Debug, Serialize)]
pub struct CreatedTripResponse {
    pub id: String,
}
