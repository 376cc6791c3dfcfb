//! Servicio de viajes
//!
//! Lectura del historial sincronizado y escrituras remotas de viajes. Las
//! escrituras solo esperan la confirmación del almacén; el estado local cambia
//! cuando llega el siguiente snapshot.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

use super::trip_filter::TripFilter;
use crate::models::{NewTrip, Trip};
use crate::store::{Collection, DocumentStore};
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub const ADD_TRIP_FAILED_NOTICE: &str = "Falha ao adicionar viagem.";
pub const DELETE_TRIP_FAILED_NOTICE: &str = "Falha ao excluir viagem.";
pub const DELETE_TRIP_CONFIRM_NOTICE: &str = "Confirme a exclusão da viagem.";

#[derive(Clone)]
pub struct TripService {
    store: Arc<dyn DocumentStore>,
    trips: watch::Receiver<Arc<Vec<Trip>>>,
}

impl TripService {
    pub fn new(store: Arc<dyn DocumentStore>, trips: watch::Receiver<Arc<Vec<Trip>>>) -> Self {
        Self { store, trips }
    }

    /// Historial actual, el más reciente primero
    pub fn list(&self) -> Arc<Vec<Trip>> {
        self.trips.borrow().clone()
    }

    pub fn find(&self, id: &str) -> AppResult<Trip> {
        self.list()
            .iter()
            .find(|trip| trip.id == id)
            .cloned()
            .ok_or_else(|| not_found_error("Trip", id))
    }

    pub fn filter(&self, filter: &TripFilter) -> Vec<Trip> {
        filter.apply(&self.list())
    }

    /// Crear un viaje. Devuelve el id asignado por el almacén.
    pub async fn create_trip(&self, trip: NewTrip) -> AppResult<String> {
        let id = self
            .store
            .create(Collection::Trips, trip.to_fields())
            .await
            .map_err(|e| {
                error!("Error adding trip for driver '{}': {}", trip.driver, e);
                AppError::remote_write(ADD_TRIP_FAILED_NOTICE, e)
            })?;

        info!(
            "🚐 Viaje {} registrado: {} / {} / {} ({} km)",
            id, trip.driver, trip.vehicle, trip.plate, trip.km
        );
        Ok(id)
    }

    /// Borrar un viaje. Sin confirmación explícita no se hace ninguna llamada remota.
    pub async fn delete_trip(&self, id: &str, confirmed: bool) -> AppResult<()> {
        if !confirmed {
            return Err(AppError::InvalidInput(DELETE_TRIP_CONFIRM_NOTICE.to_string()));
        }

        self.store.delete(Collection::Trips, id).await.map_err(|e| {
            error!("Error deleting trip {}: {}", id, e);
            AppError::remote_write(DELETE_TRIP_FAILED_NOTICE, e)
        })?;

        info!("🗑️ Viaje {} eliminado", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use chrono::{TimeZone, Utc};

    fn new_trip() -> NewTrip {
        NewTrip {
            driver: "Ana".to_string(),
            vehicle: "Van1".to_string(),
            plate: "ABC-1234".to_string(),
            km: 150,
            origin: "A".to_string(),
            destination: "B".to_string(),
            departure_time: Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap(),
            checklist: Vec::new(),
        }
    }

    fn service(store: &MemoryDocumentStore) -> (TripService, watch::Sender<Arc<Vec<Trip>>>) {
        let (sender, receiver) = watch::channel(Arc::new(Vec::new()));
        (TripService::new(Arc::new(store.clone()), receiver), sender)
    }

    #[tokio::test]
    async fn test_create_trip_stores_document() {
        let store = MemoryDocumentStore::new();
        let (service, _sender) = service(&store);

        let id = service.create_trip(new_trip()).await.unwrap();
        let docs = store.fetch(Collection::Trips).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        // el estado local solo cambia con el snapshot
        assert!(service.list().is_empty());
    }

    #[tokio::test]
    async fn test_create_trip_failure_surfaces_notice() {
        let store = MemoryDocumentStore::new();
        store.set_fail_writes(true);
        let (service, _sender) = service(&store);

        match service.create_trip(new_trip()).await {
            Err(AppError::RemoteWrite { notice, .. }) => assert_eq!(notice, ADD_TRIP_FAILED_NOTICE),
            other => panic!("expected remote write failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let store = MemoryDocumentStore::new();
        let (service, _sender) = service(&store);

        let result = service.delete_trip("t1", false).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert_eq!(store.write_attempts(), 0);
    }

    #[tokio::test]
    async fn test_delete_failure_surfaces_notice() {
        let store = MemoryDocumentStore::new();
        store.set_fail_writes(true);
        let (service, _sender) = service(&store);

        match service.delete_trip("t1", true).await {
            Err(AppError::RemoteWrite { notice, .. }) => assert_eq!(notice, DELETE_TRIP_FAILED_NOTICE),
            other => panic!("expected remote write failure, got {:?}", other),
        }
    }

    #[test]
    fn test_find_unknown_trip_is_not_found() {
        let store = MemoryDocumentStore::new();
        let (service, _sender) = service(&store);
        assert!(matches!(service.find("nope"), Err(AppError::NotFound(_))));
    }
}
