//! km_rodado
//!
//! Registro de viajes de vehículos: motoristas, vehículos y placas como
//! registros de referencia, historial de viajes sincronizado con un almacén de
//! documentos remoto, formulario de viaje validado y exportación para compartir.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;
