//! Formulario de viaje
//!
//! Estado del formulario y su ciclo `Editing → Validating → Submitting → Editing`.
//! Las selecciones de motorista, vehículo y placa se reconcilian con los registros
//! cada vez que estos cambian. Un envío correcto reinicia el formulario; un envío
//! fallido vuelve a edición conservando lo escrito.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::sync_service::SyncLayer;
use super::trip_service::TripService;
use crate::models::{default_checklist, ChecklistItem, Driver, NewTrip, Plate, RegistryEntry, RegistryKind, Vehicle};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{
    canonicalize_plate, format_local_input, parse_departure_time, parse_km, sanitize_km_input,
};

pub const MISSING_DRIVER_NOTICE: &str =
    "Por favor, selecione um motorista. Se não houver nenhum, adicione um primeiro.";
pub const MISSING_VEHICLE_NOTICE: &str =
    "Por favor, selecione um veículo. Se não houver nenhum, adicione um primeiro.";
pub const MISSING_PLATE_NOTICE: &str =
    "Por favor, selecione uma placa. Se não houver nenhuma, adicione uma primeiro.";
pub const BLANK_ITEM_NOTICE: &str = "O texto do item não pode estar vazio.";
pub const SUBMIT_IN_PROGRESS_NOTICE: &str = "Já existe um envio em andamento.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormPhase {
    Editing,
    Validating,
    Submitting,
}

/// Contenido actual de los tres registros
#[derive(Debug, Clone, Default)]
pub struct RegistryLists {
    pub drivers: Arc<Vec<Driver>>,
    pub vehicles: Arc<Vec<Vehicle>>,
    pub plates: Arc<Vec<Plate>>,
}

impl RegistryLists {
    pub fn new(drivers: Vec<Driver>, vehicles: Vec<Vehicle>, plates: Vec<Plate>) -> Self {
        Self {
            drivers: Arc::new(drivers),
            vehicles: Arc::new(vehicles),
            plates: Arc::new(plates),
        }
    }

    pub fn from_sync(sync: &SyncLayer) -> Self {
        Self {
            drivers: sync.drivers(),
            vehicles: sync.vehicles(),
            plates: sync.plates(),
        }
    }
}

/// Mantener la selección si sigue existiendo; si no, el primer elemento o nada
fn reconcile_selection<T: RegistryEntry>(selected: &mut String, items: &[T]) {
    if !selected.is_empty() && items.iter().any(|item| item.value() == selected.as_str()) {
        return;
    }
    *selected = items.first().map(|item| item.value().to_string()).unwrap_or_default();
}

fn ensure_selectable<T: RegistryEntry>(value: &str, items: &[T]) -> AppResult<()> {
    if value.is_empty() || items.iter().any(|item| item.value() == value) {
        return Ok(());
    }
    let notice = match T::KIND {
        RegistryKind::Driver => "Motorista não encontrado.",
        RegistryKind::Vehicle => "Veículo não encontrado.",
        RegistryKind::Plate => "Placa não encontrada.",
    };
    Err(AppError::InvalidInput(notice.to_string()))
}

#[derive(Debug, Clone)]
pub struct TripForm {
    driver: String,
    vehicle: String,
    plate: String,
    /// Solo dígitos
    km: String,
    origin: String,
    destination: String,
    departure_time: DateTime<Utc>,
    checklist: Vec<ChecklistItem>,
    phase: FormPhase,
}

impl TripForm {
    pub fn new(checklist: Vec<ChecklistItem>, now: DateTime<Utc>) -> Self {
        Self {
            driver: String::new(),
            vehicle: String::new(),
            plate: String::new(),
            km: String::new(),
            origin: String::new(),
            destination: String::new(),
            departure_time: now,
            checklist,
            phase: FormPhase::Editing,
        }
    }

    pub fn with_default_checklist(now: DateTime<Utc>) -> Self {
        Self::new(default_checklist(), now)
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn driver(&self) -> &str {
        &self.driver
    }

    pub fn vehicle(&self) -> &str {
        &self.vehicle
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn km(&self) -> &str {
        &self.km
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn departure_time(&self) -> DateTime<Utc> {
        self.departure_time
    }

    pub fn checklist(&self) -> &[ChecklistItem] {
        &self.checklist
    }

    // --- Campos ---

    pub fn select_driver(&mut self, name: &str, lists: &RegistryLists) -> AppResult<()> {
        let name = name.trim();
        ensure_selectable(name, &lists.drivers)?;
        self.driver = name.to_string();
        Ok(())
    }

    pub fn select_vehicle(&mut self, name: &str, lists: &RegistryLists) -> AppResult<()> {
        let name = name.trim();
        ensure_selectable(name, &lists.vehicles)?;
        self.vehicle = name.to_string();
        Ok(())
    }

    /// La placa escrita se canonicaliza antes de buscarla en el registro
    pub fn select_plate(&mut self, raw: &str, lists: &RegistryLists) -> AppResult<()> {
        let plate = canonicalize_plate(raw);
        ensure_selectable(&plate, &lists.plates)?;
        self.plate = plate;
        Ok(())
    }

    pub fn set_km(&mut self, raw: &str) {
        self.km = sanitize_km_input(raw);
    }

    pub fn set_origin(&mut self, origin: &str) {
        self.origin = origin.to_string();
    }

    pub fn set_destination(&mut self, destination: &str) {
        self.destination = destination.to_string();
    }

    pub fn set_departure_time(&mut self, raw: &str, offset: FixedOffset) -> AppResult<()> {
        self.departure_time = parse_departure_time(raw, offset)?;
        Ok(())
    }

    /// Aplicar el valor por defecto de las selecciones contra los registros actuales
    pub fn reconcile(&mut self, lists: &RegistryLists) {
        reconcile_selection(&mut self.driver, &lists.drivers);
        reconcile_selection(&mut self.vehicle, &lists.vehicles);
        reconcile_selection(&mut self.plate, &lists.plates);
    }

    // --- Checklist ---

    fn item_mut(&mut self, id: &str) -> AppResult<&mut ChecklistItem> {
        self.checklist
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Checklist item with id '{}' not found", id)))
    }

    pub fn toggle_item(&mut self, id: &str) -> AppResult<bool> {
        let item = self.item_mut(id)?;
        item.checked = !item.checked;
        Ok(item.checked)
    }

    /// Agregar un elemento al final. El id se deriva del instante y se ajusta
    /// hasta que no choque con ninguno existente.
    pub fn add_item(&mut self, text: &str, now: DateTime<Utc>) -> AppResult<ChecklistItem> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::InvalidInput(BLANK_ITEM_NOTICE.to_string()));
        }

        let mut candidate = now.timestamp_millis();
        while self.checklist.iter().any(|item| item.id == candidate.to_string()) {
            candidate += 1;
        }

        let item = ChecklistItem::new(candidate.to_string(), text);
        self.checklist.push(item.clone());
        Ok(item)
    }

    pub fn remove_item(&mut self, id: &str) -> AppResult<()> {
        let before = self.checklist.len();
        self.checklist.retain(|item| item.id != id);
        if self.checklist.len() == before {
            return Err(AppError::NotFound(format!("Checklist item with id '{}' not found", id)));
        }
        Ok(())
    }

    pub fn edit_item(&mut self, id: &str, text: &str) -> AppResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::InvalidInput(BLANK_ITEM_NOTICE.to_string()));
        }
        self.item_mut(id)?.text = text.to_string();
        Ok(())
    }

    pub fn mark_all(&mut self) {
        for item in &mut self.checklist {
            item.checked = true;
        }
    }

    /// Reemplazar la plantilla del checklist (todos los elementos sin marcar)
    pub fn replace_checklist(&mut self, template: Vec<ChecklistItem>) {
        self.checklist = template
            .into_iter()
            .map(|item| ChecklistItem { checked: false, ..item })
            .collect();
    }

    // --- Envío ---

    /// Reglas en orden; la primera que falla bloquea el envío
    pub fn validate(&self) -> AppResult<()> {
        if self.driver.is_empty() {
            return Err(AppError::InvalidInput(MISSING_DRIVER_NOTICE.to_string()));
        }
        if self.vehicle.is_empty() {
            return Err(AppError::InvalidInput(MISSING_VEHICLE_NOTICE.to_string()));
        }
        if self.plate.is_empty() {
            return Err(AppError::InvalidInput(MISSING_PLATE_NOTICE.to_string()));
        }
        Ok(())
    }

    pub fn to_new_trip(&self) -> NewTrip {
        NewTrip {
            driver: self.driver.clone(),
            vehicle: self.vehicle.clone(),
            plate: self.plate.clone(),
            km: parse_km(&self.km),
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            departure_time: self.departure_time,
            checklist: self.checklist.clone(),
        }
    }

    /// Reinicio tras un envío correcto. El motorista se conserva.
    fn reset_after_submit(&mut self, now: DateTime<Utc>) {
        self.vehicle.clear();
        self.plate.clear();
        self.km.clear();
        self.origin.clear();
        self.destination.clear();
        self.departure_time = now;
        for item in &mut self.checklist {
            item.checked = false;
        }
    }

    /// Validar y pasar a `Submitting`. Devuelve el viaje que hay que crear;
    /// el formulario queda en ese estado hasta [`TripForm::finish_submit`].
    pub fn begin_submit(&mut self) -> AppResult<NewTrip> {
        if self.phase == FormPhase::Submitting {
            return Err(AppError::Conflict(SUBMIT_IN_PROGRESS_NOTICE.to_string()));
        }

        self.phase = FormPhase::Validating;
        if let Err(e) = self.validate() {
            debug!("Formulario inválido: {}", e);
            self.phase = FormPhase::Editing;
            return Err(e);
        }

        self.phase = FormPhase::Submitting;
        Ok(self.to_new_trip())
    }

    /// Cerrar el envío con la respuesta del almacén. Solo un envío correcto reinicia.
    pub fn finish_submit(
        &mut self,
        result: AppResult<String>,
        lists: &RegistryLists,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        self.phase = FormPhase::Editing;
        let id = result?;
        self.reset_after_submit(now);
        self.reconcile(lists);
        info!("📝 Formulario enviado, viaje {}", id);
        Ok(id)
    }

    /// Validar y crear el viaje con el formulario tomado todo el tiempo.
    /// Devuelve el id del viaje creado.
    pub async fn submit(
        &mut self,
        trips: &TripService,
        lists: &RegistryLists,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let trip = self.begin_submit()?;
        let result = trips.create_trip(trip).await;
        self.finish_submit(result, lists, now)
    }

    pub fn view(&self, offset: FixedOffset) -> TripFormView {
        TripFormView {
            driver: self.driver.clone(),
            vehicle: self.vehicle.clone(),
            plate: self.plate.clone(),
            km: self.km.clone(),
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            departure_time: self.departure_time,
            departure_time_local: format_local_input(self.departure_time, offset),
            checklist: self.checklist.clone(),
            phase: self.phase,
        }
    }
}

/// Vista serializable del formulario
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripFormView {
    pub driver: String,
    pub vehicle: String,
    pub plate: String,
    pub km: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    /// Valor para un input `datetime-local`
    pub departure_time_local: String,
    pub checklist: Vec<ChecklistItem>,
    pub phase: FormPhase,
}

/// Reconciliar las selecciones del formulario cada vez que cambia un registro
pub fn spawn_selection_reconciler(
    form: Arc<Mutex<TripForm>>,
    mut drivers: watch::Receiver<Arc<Vec<Driver>>>,
    mut vehicles: watch::Receiver<Arc<Vec<Vehicle>>>,
    mut plates: watch::Receiver<Arc<Vec<Plate>>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let lists = RegistryLists {
                drivers: drivers.borrow_and_update().clone(),
                vehicles: vehicles.borrow_and_update().clone(),
                plates: plates.borrow_and_update().clone(),
            };
            form.lock().await.reconcile(&lists);

            let changed = tokio::select! {
                changed = drivers.changed() => changed,
                changed = vehicles.changed() => changed,
                changed = plates.changed() => changed,
            };
            if changed.is_err() {
                break;
            }
        }
        warn!("⚠️ Reconciliador de selecciones detenido");
    })
}
