//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos normalizados que viven en el
//! estado local: registros de referencia, viajes y checklist.

pub mod checklist;
pub mod registry;
pub mod trip;

pub use checklist::{default_checklist, ChecklistItem, ChecklistModelItem, DEFAULT_CHECKLIST};
pub use registry::{Driver, Plate, RegistryEntry, RegistryKind, Vehicle};
pub use trip::{NewTrip, Trip};
