//! Controllers
//!
//! Traducen los DTOs de la API a llamadas de servicio y arman las respuestas.

pub mod checklist_model_controller;
pub mod form_controller;
pub mod registry_controller;
pub mod trip_controller;
