//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Los valores ausentes toman
//! su valor por defecto; los valores inválidos son un error de configuración.

use chrono::{FixedOffset, Offset, Utc};
use std::env;
use std::str::FromStr;

use crate::utils::errors::{AppError, AppResult};

/// Desfase por defecto para mostrar fechas: UTC−03:00 (pt-BR)
pub const DEFAULT_DISPLAY_UTC_OFFSET_MINUTES: i32 = -180;

/// Backend del almacén de documentos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            other => Err(AppError::Configuration(format!(
                "STORE_BACKEND must be 'memory' or 'postgres', got '{}'",
                other
            ))),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub store_backend: StoreBackend,
    pub cors_origins: Vec<String>,
    pub display_offset: FixedOffset,
    pub log_level: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            store_backend: StoreBackend::Memory,
            cors_origins: Vec::new(),
            display_offset: default_display_offset(),
            log_level: "info".to_string(),
        }
    }
}

fn default_display_offset() -> FixedOffset {
    display_offset_from_minutes(DEFAULT_DISPLAY_UTC_OFFSET_MINUTES).unwrap_or_else(|_| Utc.fix())
}

/// Desfase a partir de minutos respecto a UTC
pub fn display_offset_from_minutes(minutes: i32) -> AppResult<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            AppError::Configuration(format!(
                "DISPLAY_UTC_OFFSET_MINUTES out of range: {}",
                minutes
            ))
        })
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Configuration(format!("{} must be a valid number, got '{}'", name, raw)))
}

impl EnvironmentConfig {
    /// Leer la configuración desde el entorno (después de `dotenvy`)
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Leer la configuración con una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => parse_var("PORT", &raw)?,
            None => defaults.port,
        };

        let store_backend = match lookup("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.store_backend,
        };

        let display_offset = match lookup("DISPLAY_UTC_OFFSET_MINUTES") {
            Some(raw) => display_offset_from_minutes(parse_var("DISPLAY_UTC_OFFSET_MINUTES", &raw)?)?,
            None => defaults.display_offset,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            port,
            host: lookup("HOST").unwrap_or(defaults.host),
            store_backend,
            cors_origins,
            display_offset,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
