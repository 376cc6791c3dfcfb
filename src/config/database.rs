//! Configuración de base de datos
//!
//! Este módulo maneja la conexión y configuración de PostgreSQL con SQLx para
//! el backend `postgres` del almacén de documentos.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::env;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
        }
    }

    /// `DATABASE_URL` es obligatoria; el tamaño del pool es opcional
    pub fn from_env() -> AppResult<Self> {
        let url = env::var("DATABASE_URL").map_err(|_| {
            AppError::Configuration("DATABASE_URL must be set for the postgres backend".to_string())
        })?;

        let mut config = Self::new(url);
        if let Ok(raw) = env::var("DATABASE_MAX_CONNECTIONS") {
            config.max_connections = parse_pool_size("DATABASE_MAX_CONNECTIONS", &raw)?;
        }
        if let Ok(raw) = env::var("DATABASE_MIN_CONNECTIONS") {
            config.min_connections = parse_pool_size("DATABASE_MIN_CONNECTIONS", &raw)?;
        }
        if config.min_connections > config.max_connections {
            return Err(AppError::Configuration(format!(
                "DATABASE_MIN_CONNECTIONS ({}) exceeds DATABASE_MAX_CONNECTIONS ({})",
                config.min_connections, config.max_connections
            )));
        }
        Ok(config)
    }

    /// Crear un nuevo pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect(&self.url)
            .await
    }
}

fn parse_pool_size(name: &str, raw: &str) -> AppResult<u32> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Configuration(format!("{} must be a valid number, got '{}'", name, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_pool_sizing() {
        let config = DatabaseConfig::new("postgres://localhost/km_rodado");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
    }

    #[test]
    fn test_pool_size_must_be_numeric() {
        assert!(parse_pool_size("X", "ten").is_err());
        assert_eq!(parse_pool_size("X", " 4 ").unwrap(), 4);
    }
}
