//! Capa de sincronización
//!
//! Mantiene cuatro suscripciones independientes (motoristas, vehículos, placas y
//! viajes) contra el almacén remoto. Cada snapshot recibido se normaliza completo
//! y reemplaza el estado local de esa colección, publicado en un canal `watch`.
//! No hay parches incrementales ni coordinación entre colecciones.

use chrono::Utc;
use futures::StreamExt;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::normalization::{normalize_entry, normalize_trip};
use crate::models::{Driver, Plate, RegistryEntry, Trip, Vehicle};
use crate::store::{Collection, DocumentStore, OrderBy, Subscription};
use crate::utils::errors::AppResult;

type Published<T> = Arc<watch::Sender<Arc<Vec<T>>>>;

fn published<T>() -> Published<T> {
    let (sender, _) = watch::channel(Arc::new(Vec::new()));
    Arc::new(sender)
}

/// Orden de la colección de viajes: el más reciente primero
pub fn trips_order() -> OrderBy {
    OrderBy::descending("departureTime")
}

/// Estado local sincronizado con el almacén remoto
pub struct SyncLayer {
    store: Arc<dyn DocumentStore>,
    drivers: Published<Driver>,
    vehicles: Published<Vehicle>,
    plates: Published<Plate>,
    trips: Published<Trip>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncLayer {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            drivers: published(),
            vehicles: published(),
            plates: published(),
            trips: published(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.store)
    }

    /// Abrir las cuatro suscripciones. Se llama una sola vez al arrancar.
    pub async fn start(&self) -> AppResult<()> {
        let drivers = self.subscribe_registry::<Driver>().await?;
        let vehicles = self.subscribe_registry::<Vehicle>().await?;
        let plates = self.subscribe_registry::<Plate>().await?;
        let trips = self.store.subscribe(Collection::Trips, trips_order()).await?;

        let handles = vec![
            spawn_registry_sync(drivers, Arc::clone(&self.drivers)),
            spawn_registry_sync(vehicles, Arc::clone(&self.vehicles)),
            spawn_registry_sync(plates, Arc::clone(&self.plates)),
            spawn_trip_sync(trips, Arc::clone(&self.trips)),
        ];

        match self.tasks.lock() {
            Ok(mut tasks) => tasks.extend(handles),
            Err(poisoned) => poisoned.into_inner().extend(handles),
        }

        info!("✅ Sincronización iniciada (drivers, vehicles, plates, trips)");
        Ok(())
    }

    async fn subscribe_registry<T: RegistryEntry>(&self) -> AppResult<Subscription> {
        let kind = T::KIND;
        Ok(self.store.subscribe(kind.collection(), kind.order()).await?)
    }

    /// Cancelar todas las suscripciones
    pub fn shutdown(&self) {
        let handles: Vec<JoinHandle<()>> = match self.tasks.lock() {
            Ok(mut tasks) => tasks.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        };
        for handle in &handles {
            handle.abort();
        }
        info!("🛑 Sincronización detenida ({} suscripciones)", handles.len());
    }

    pub fn drivers(&self) -> Arc<Vec<Driver>> {
        self.drivers.borrow().clone()
    }

    pub fn vehicles(&self) -> Arc<Vec<Vehicle>> {
        self.vehicles.borrow().clone()
    }

    pub fn plates(&self) -> Arc<Vec<Plate>> {
        self.plates.borrow().clone()
    }

    pub fn trips(&self) -> Arc<Vec<Trip>> {
        self.trips.borrow().clone()
    }

    pub fn watch_drivers(&self) -> watch::Receiver<Arc<Vec<Driver>>> {
        self.drivers.subscribe()
    }

    pub fn watch_vehicles(&self) -> watch::Receiver<Arc<Vec<Vehicle>>> {
        self.vehicles.subscribe()
    }

    pub fn watch_plates(&self) -> watch::Receiver<Arc<Vec<Plate>>> {
        self.plates.subscribe()
    }

    pub fn watch_trips(&self) -> watch::Receiver<Arc<Vec<Trip>>> {
        self.trips.subscribe()
    }
}

impl Drop for SyncLayer {
    fn drop(&mut self) {
        if let Ok(mut tasks) = self.tasks.lock() {
            for handle in tasks.drain(..) {
                handle.abort();
            }
        }
    }
}

fn spawn_registry_sync<T: RegistryEntry>(
    mut subscription: Subscription,
    target: Published<T>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(snapshot) = subscription.next().await {
            let items: Vec<T> = snapshot.documents.iter().map(normalize_entry::<T>).collect();
            debug!("{}: {} documentos", snapshot.collection, items.len());
            target.send_replace(Arc::new(items));
        }
        warn!("⚠️ Suscripción a {} terminada", subscription.collection());
    })
}

fn spawn_trip_sync(mut subscription: Subscription, target: Published<Trip>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(snapshot) = subscription.next().await {
            let now = Utc::now();
            let trips: Vec<Trip> = snapshot
                .documents
                .iter()
                .map(|document| normalize_trip(document, now))
                .collect();
            debug!("trips: {} documentos", trips.len());
            target.send_replace(Arc::new(trips));
        }
        warn!("⚠️ Suscripción a trips terminada");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DocumentValue, Fields, MemoryDocumentStore};
    use std::time::Duration;

    fn fields(entries: Vec<(&str, DocumentValue)>) -> Fields {
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[tokio::test]
    async fn test_snapshots_replace_local_state() {
        let store = MemoryDocumentStore::new();
        store
            .seed(Collection::Drivers, fields(vec![("name", DocumentValue::from("Bruno"))]))
            .unwrap();

        let sync = SyncLayer::new(Arc::new(store.clone()));
        sync.start().await.unwrap();

        let mut drivers = sync.watch_drivers();
        tokio::time::timeout(Duration::from_secs(2), drivers.wait_for(|d| d.len() == 1))
            .await
            .unwrap()
            .unwrap();

        store
            .seed(Collection::Drivers, fields(vec![("name", DocumentValue::from("Ana"))]))
            .unwrap();
        tokio::time::timeout(Duration::from_secs(2), drivers.wait_for(|d| d.len() == 2))
            .await
            .unwrap()
            .unwrap();

        let names: Vec<String> = sync.drivers().iter().map(|d| d.name.clone()).collect();
        assert_eq!(names, vec!["Ana", "Bruno"]);
        sync.shutdown();
    }

    #[tokio::test]
    async fn test_malformed_trip_documents_do_not_break_sync() {
        let store = MemoryDocumentStore::new();
        store
            .seed(Collection::Trips, fields(vec![("departureTime", DocumentValue::from("garbage"))]))
            .unwrap();

        let sync = SyncLayer::new(Arc::new(store));
        sync.start().await.unwrap();

        let mut trips = sync.watch_trips();
        tokio::time::timeout(Duration::from_secs(2), trips.wait_for(|t| t.len() == 1))
            .await
            .unwrap()
            .unwrap();

        let trip = &sync.trips()[0];
        assert_eq!(trip.driver, "");
        assert_eq!(trip.km, 0);
        assert!(trip.checklist.is_empty());
    }
}
