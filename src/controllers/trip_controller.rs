use chrono::FixedOffset;

use crate::dto::trip_dto::{DeleteTripQuery, TripListQuery};
use crate::dto::ApiResponse;
use crate::models::Trip;
use crate::services::{TripExport, TripService};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct TripController {
    trips: TripService,
    offset: FixedOffset,
}

impl TripController {
    pub fn new(state: &AppState) -> Self {
        Self {
            trips: state.trips.clone(),
            offset: state.config.display_offset,
        }
    }

    /// Historial filtrado, el más reciente primero
    pub fn list(&self, query: TripListQuery) -> AppResult<Vec<Trip>> {
        let filter = query.into_filter(self.offset)?;
        Ok(self.trips.filter(&filter))
    }

    pub fn get(&self, id: &str) -> AppResult<Trip> {
        self.trips.find(id)
    }

    pub fn export(&self, id: &str) -> AppResult<TripExport> {
        let trip = self.trips.find(id)?;
        Ok(TripExport::build(&trip, self.offset))
    }

    pub async fn delete(&self, id: &str, query: DeleteTripQuery) -> AppResult<ApiResponse<()>> {
        self.trips.delete_trip(id, query.confirm).await?;
        Ok(ApiResponse::message("Viagem excluída."))
    }
}
