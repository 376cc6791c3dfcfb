//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Todo lo que contiene es barato de clonar.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::environment::EnvironmentConfig;
use crate::models::{Driver, Plate, RegistryEntry, Vehicle};
use crate::services::{
    ChecklistModelService, RegistryLists, RegistryService, SyncLayer, TripForm, TripService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub sync: Arc<SyncLayer>,
    pub drivers: RegistryService<Driver>,
    pub vehicles: RegistryService<Vehicle>,
    pub plates: RegistryService<Plate>,
    pub trips: TripService,
    pub checklist_model: ChecklistModelService,
    pub form: Arc<Mutex<TripForm>>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, sync: Arc<SyncLayer>, form: TripForm) -> Self {
        let store = sync.store();
        Self {
            config,
            drivers: RegistryService::new(Arc::clone(&store), sync.watch_drivers()),
            vehicles: RegistryService::new(Arc::clone(&store), sync.watch_vehicles()),
            plates: RegistryService::new(Arc::clone(&store), sync.watch_plates()),
            trips: TripService::new(Arc::clone(&store), sync.watch_trips()),
            checklist_model: ChecklistModelService::new(store),
            form: Arc::new(Mutex::new(form)),
            sync,
        }
    }

    /// Contenido actual de los tres registros
    pub fn registry_lists(&self) -> RegistryLists {
        RegistryLists {
            drivers: self.drivers.list(),
            vehicles: self.vehicles.list(),
            plates: self.plates.list(),
        }
    }
}

/// Acceso genérico a cada registro desde el estado, para compartir las rutas
pub trait HasRegistry<T: RegistryEntry> {
    fn registry(&self) -> &RegistryService<T>;
}

impl HasRegistry<Driver> for AppState {
    fn registry(&self) -> &RegistryService<Driver> {
        &self.drivers
    }
}

impl HasRegistry<Vehicle> for AppState {
    fn registry(&self) -> &RegistryService<Vehicle> {
        &self.vehicles
    }
}

impl HasRegistry<Plate> for AppState {
    fn registry(&self) -> &RegistryService<Plate> {
        &self.plates
    }
}
