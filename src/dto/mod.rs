//! Data Transfer Objects
//!
//! Este módulo contiene los DTOs de entrada y salida de la API.

pub mod api_response;
pub mod checklist_model_dto;
pub mod form_dto;
pub mod registry_dto;
pub mod trip_dto;

pub use api_response::ApiResponse;
