#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use km_rodado::config::EnvironmentConfig;
use km_rodado::services::{spawn_selection_reconciler, SyncLayer, TripForm};
use km_rodado::state::AppState;
use km_rodado::store::{Collection, DocumentValue, Fields, MemoryDocumentStore};

pub struct TestApp {
    pub store: MemoryDocumentStore,
    pub sync: Arc<SyncLayer>,
    pub state: AppState,
    reconciler: JoinHandle<()>,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.reconciler.abort();
        self.sync.shutdown();
    }
}

pub fn fields(entries: Vec<(&str, DocumentValue)>) -> Fields {
    entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

pub fn seed_registries(store: &MemoryDocumentStore, drivers: &[&str], vehicles: &[&str], plates: &[&str]) {
    for name in drivers {
        store
            .seed(Collection::Drivers, fields(vec![("name", DocumentValue::from(*name))]))
            .unwrap();
    }
    for name in vehicles {
        store
            .seed(Collection::Vehicles, fields(vec![("name", DocumentValue::from(*name))]))
            .unwrap();
    }
    for number in plates {
        store
            .seed(Collection::Plates, fields(vec![("number", DocumentValue::from(*number))]))
            .unwrap();
    }
}

pub fn seed_trip(store: &MemoryDocumentStore, driver: &str, departure: DateTime<Utc>) -> String {
    store
        .seed(
            Collection::Trips,
            fields(vec![
                ("driver", DocumentValue::from(driver)),
                ("vehicle", DocumentValue::from("Kombi")),
                ("plate", DocumentValue::from("OLD-0001")),
                ("km", DocumentValue::Integer(10)),
                ("origin", DocumentValue::from("X")),
                ("destination", DocumentValue::from("Y")),
                ("departureTime", DocumentValue::Timestamp(departure)),
            ]),
        )
        .unwrap()
}

/// Levantar la aplicación completa sobre un almacén en memoria ya sembrado
pub async fn spawn_app(store: MemoryDocumentStore) -> TestApp {
    let sync = Arc::new(SyncLayer::new(Arc::new(store.clone())));
    sync.start().await.unwrap();

    let state = AppState::new(
        EnvironmentConfig::default(),
        Arc::clone(&sync),
        TripForm::with_default_checklist(Utc::now()),
    );
    let reconciler = spawn_selection_reconciler(
        Arc::clone(&state.form),
        sync.watch_drivers(),
        sync.watch_vehicles(),
        sync.watch_plates(),
    );

    TestApp { store, sync, state, reconciler }
}

/// Esperar hasta que se cumpla la condición (los snapshots llegan de forma asíncrona)
pub async fn eventually<F: Fn() -> bool>(check: F) {
    for _ in 0..100 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached in time");
}

/// Esperar a que el reconciliador complete las tres selecciones del formulario
pub async fn wait_for_selection(app: &TestApp) {
    for _ in 0..100 {
        {
            let form = app.state.form.lock().await;
            if !form.driver().is_empty() && !form.vehicle().is_empty() && !form.plate().is_empty() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("form selection not reconciled in time");
}
