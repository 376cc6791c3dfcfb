//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: sincronización
//! con el almacén remoto, registros de referencia, viajes, formulario y
//! exportación. Los servicios reciben el almacén inyectado, nunca lo crean.

pub mod checklist_model_service;
pub mod normalization;
pub mod registry_service;
pub mod sync_service;
pub mod trip_export;
pub mod trip_filter;
pub mod trip_form;
pub mod trip_service;

pub use checklist_model_service::ChecklistModelService;
pub use registry_service::RegistryService;
pub use sync_service::SyncLayer;
pub use trip_export::TripExport;
pub use trip_filter::TripFilter;
pub use trip_form::{spawn_selection_reconciler, FormPhase, RegistryLists, TripForm, TripFormView};
pub use trip_service::TripService;
