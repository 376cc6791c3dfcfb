//! Configuración del proyecto
//!
//! Este módulo contiene la configuración del entorno y de la base de datos.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::*;
